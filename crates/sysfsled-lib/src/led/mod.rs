//! LED control: state machine, blink timing, colour palette.

mod controller;
mod palette;
mod physical;
mod state;

pub use controller::{DEASSERT, LedController};
pub use palette::{InvalidColor, Palette};
pub use physical::{LedStatus, PhysicalLed};
pub use state::{BlinkProfile, DEFAULT_DUTY_ON, DEFAULT_PERIOD_MS, LedState};
