//! Frame timing for the game loop.
//!
//! Elapsed time is measured between consecutive idle ticks only, so time spent
//! pumping a burst of platform events advances the simulation once.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
