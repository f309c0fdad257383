//! Planet plugins
//!
//! One module per minigame, each implementing [`crate::sim::Planet`] with its
//! own entity vocabulary and force model:
//! - `black_hole`: radial attractor, rescue/carry/deliver
//! - `storm_rider`: lane wind, dodge-and-survive
//! - `mach_surfer`: speed lanes, supersonic threshold
//! - `pressure_drop`: descent gravity, temperature management

pub mod black_hole;
pub mod mach_surfer;
pub mod pressure_drop;
pub mod storm_rider;

pub use black_hole::BlackHole;
pub use mach_surfer::MachSurfer;
pub use pressure_drop::PressureDrop;
pub use storm_rider::StormRider;
