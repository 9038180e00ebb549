//! sysfsled: tri-state (off / on / blink) control of Linux LED class devices.

pub mod config;
pub mod driver;
pub mod error;
pub mod identity;
pub mod led;
pub mod registry;

pub use error::SysfsledError;
