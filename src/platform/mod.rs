//! Platform abstraction layer
//!
//! Handles the outside world for the tick loop:
//! - Input polling (keys, mouse, discrete events)
//! - Fixed-rate tick pacing

pub mod input;
pub mod time;

pub use input::{DemoInput, InputEvent, InputSnapshot, InputSource, Key, MouseButton, ScriptedInput};
pub use time::FixedClock;
