//! OrbitQuest entry point
//!
//! Native builds run a headless demo: one scripted session per planet against
//! a recording surface, with results settled into an in-memory progress
//! store. The browser shell drives the library crate directly instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm build is driven through the library API by the page shell
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use orbitquest::hub;
    use orbitquest::planets::{BlackHole, MachSurfer, PressureDrop, StormRider};
    use orbitquest::progress::{MemoryStore, ProgressStore};
    use orbitquest::settings::Settings;
    use orbitquest::sim::{Action, Engine, Planet};
    use orbitquest::surface::RecordingSurface;

    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;
    const SEED: u64 = 0x0B17_9E57;
    /// Give up after ~5 simulated minutes if no terminal state is reached
    const MAX_TICKS: u64 = 18_000;

    pub fn run() {
        env_logger::init();
        let settings = Settings::load();
        let mut store = MemoryStore::new();

        drive(
            &mut store,
            &settings,
            BlackHole::new(),
            |tick, engine: &mut Engine<BlackHole>| {
                // Orbit the pointer around the well, ducking in and out
                let t = tick as f32 * 0.01;
                let r = 210.0 + 60.0 * (t * 0.7).sin();
                engine.set_pointer(
                    WIDTH / 2.0 + r * t.cos(),
                    HEIGHT / 2.0 + r * t.sin(),
                );
            },
        );

        drive(
            &mut store,
            &settings,
            StormRider::new(),
            |tick, engine: &mut Engine<StormRider>| {
                let phase = (tick / 90) % 2 == 0;
                engine.set_action(Action::Rise, phase);
                engine.set_action(Action::Fall, !phase);
            },
        );

        drive(
            &mut store,
            &settings,
            MachSurfer::new(),
            |tick, engine: &mut Engine<MachSurfer>| {
                // Dive in long pulses to chase the sound barrier
                engine.set_action(Action::Fall, (tick / 400) % 3 != 2);
                let t = tick as f32 * 0.02;
                engine.set_pointer(WIDTH * 0.3, HEIGHT / 2.0 + 180.0 * t.sin());
            },
        );

        drive(
            &mut store,
            &settings,
            PressureDrop::new(),
            |tick, engine: &mut Engine<PressureDrop>| {
                let t = tick as f32 * 0.015;
                engine.set_pointer(WIDTH / 2.0 + 260.0 * t.sin(), HEIGHT * 0.3);
            },
        );

        let record = store.load();
        println!("--- mission control ---");
        println!(
            "{}",
            serde_json::to_string_pretty(&record).expect("progress record serializes")
        );
    }

    fn drive<P: Planet>(
        store: &mut MemoryStore,
        settings: &Settings,
        planet: P,
        script: impl Fn(u64, &mut Engine<P>),
    ) {
        let id = planet.profile().id;
        let mut engine =
            Engine::with_particle_cap(WIDTH, HEIGHT, SEED, planet, settings.max_particles())
                .expect("demo dimensions are valid");

        let mut tick = 0u64;
        loop {
            script(tick, &mut engine);
            engine.step();
            // Auto-answer trivia so scripted runs never stall on a question
            if engine.snapshot().show_trivia {
                engine.answer_trivia(1);
            }
            tick += 1;
            if engine.snapshot().is_game_over || tick >= MAX_TICKS {
                break;
            }
        }

        // One draw pass to exercise the render path headlessly
        let mut surface = RecordingSurface::new();
        engine.draw(&mut surface);

        let snapshot = engine.snapshot();
        log::info!(
            "{}: {} after {} ticks, {} draw calls",
            id.as_str(),
            if snapshot.victory {
                "victory"
            } else if snapshot.is_game_over {
                "defeat"
            } else {
                "timeout"
            },
            snapshot.ticks,
            surface.len(),
        );
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).expect("snapshot serializes")
        );

        hub::settle_session(store, &engine.drain_events());
    }
}
