//! Logical LED states and blink timing.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, SysfsledError};

/// Logical state requested on the bus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum LedState {
    #[default]
    Off,
    On,
    Blink,
}

impl fmt::Display for LedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LedState::Off => "Off",
            LedState::On => "On",
            LedState::Blink => "Blink",
        };
        f.write_str(s)
    }
}

impl FromStr for LedState {
    type Err = SysfsledError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(LedState::Off),
            "on" => Ok(LedState::On),
            "blink" => Ok(LedState::Blink),
            _ => Err(SysfsledError::InvalidState(s.into())),
        }
    }
}

pub const DEFAULT_DUTY_ON: u8 = 50;
pub const DEFAULT_PERIOD_MS: u32 = 1000;

/// Blink duty cycle and period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlinkProfile {
    /// Percentage of the period the LED is lit (0–100).
    pub duty_on: u8,
    /// Full on+off period in milliseconds, never zero.
    pub period_ms: u32,
}

impl Default for BlinkProfile {
    fn default() -> Self {
        BlinkProfile {
            duty_on: DEFAULT_DUTY_ON,
            period_ms: DEFAULT_PERIOD_MS,
        }
    }
}

impl BlinkProfile {
    pub fn new(duty_on: u8, period_ms: u32) -> Result<Self> {
        validate_duty_on(duty_on)?;
        validate_period(period_ms)?;
        Ok(BlinkProfile { duty_on, period_ms })
    }

    /// Convert the percent duty into `(delay_on, delay_off)` milliseconds.
    pub fn delays(&self) -> (u32, u32) {
        let factor = f64::from(self.period_ms) / 100.0;
        let duty = f64::from(self.duty_on.min(100));
        let on = (duty * factor).round() as u32;
        let off = ((100.0 - duty) * factor).round() as u32;
        (on, off)
    }

    /// Recover a profile from the delays a timer trigger is running with.
    ///
    /// Returns `None` when the period is too short to express a percentage
    /// (under 100 ms, including zero).
    pub fn from_delays(delay_on: u32, delay_off: u32) -> Option<Self> {
        let period_ms = delay_on.saturating_add(delay_off);
        let percent_scale = period_ms / 100;
        if percent_scale == 0 {
            return None;
        }
        let duty_on = (delay_on / percent_scale).min(100) as u8;
        Some(BlinkProfile { duty_on, period_ms })
    }
}

pub(crate) fn validate_duty_on(duty_on: u8) -> Result<()> {
    if duty_on > 100 {
        return Err(SysfsledError::Profile(format!(
            "duty_on {duty_on} out of range (0-100)"
        )));
    }
    Ok(())
}

pub(crate) fn validate_period(period_ms: u32) -> Result<()> {
    if period_ms == 0 {
        return Err(SysfsledError::Profile("period must be non-zero".into()));
    }
    Ok(())
}
