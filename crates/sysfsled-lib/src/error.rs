//! Unified error type for the sysfsled-lib crate.
//!
//! [`SysfsledError`] wraps module-specific errors (`DriverError`, `MalformedName`)
//! and domain-specific error kinds (`Config`, `Profile`, `UnknownLed`).
//! `From` impls allow `?` to propagate across module boundaries seamlessly.

use std::fmt;

use crate::driver::DriverError;
use crate::identity::MalformedName;

/// Unified error type for sysfsled-lib operations.
#[derive(Debug)]
pub enum SysfsledError {
    /// sysfs attribute access failed.
    Driver(DriverError),
    /// LED name could not be parsed into an identity.
    Name(MalformedName),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
    /// Blink profile value out of range.
    Profile(String),
    /// No registered LED matches the query.
    UnknownLed(String),
    /// Text that names no LED state.
    InvalidState(String),
}

impl fmt::Display for SysfsledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SysfsledError::Driver(e) => write!(f, "{e}"),
            SysfsledError::Name(e) => write!(f, "{e}"),
            SysfsledError::Io(e) => write!(f, "I/O error: {e}"),
            SysfsledError::Config(e) => write!(f, "Config error: {e}"),
            SysfsledError::Profile(e) => write!(f, "Blink profile error: {e}"),
            SysfsledError::UnknownLed(q) => write!(f, "No LED registered for {q}"),
            SysfsledError::InvalidState(s) => {
                write!(f, "Invalid LED state: {s:?} (use off, on or blink)")
            }
        }
    }
}

impl std::error::Error for SysfsledError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SysfsledError::Driver(e) => Some(e),
            SysfsledError::Name(e) => Some(e),
            SysfsledError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DriverError> for SysfsledError {
    fn from(e: DriverError) -> Self {
        SysfsledError::Driver(e)
    }
}

impl From<MalformedName> for SysfsledError {
    fn from(e: MalformedName) -> Self {
        SysfsledError::Name(e)
    }
}

impl From<std::io::Error> for SysfsledError {
    fn from(e: std::io::Error) -> Self {
        SysfsledError::Io(e)
    }
}

/// Crate-level Result alias using [`SysfsledError`].
pub type Result<T> = std::result::Result<T, SysfsledError>;
