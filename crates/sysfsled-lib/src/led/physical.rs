//! Property interface the bus backend dispatches get/set calls through.

use serde::Serialize;

use crate::error::Result;

use super::palette::Palette;
use super::state::LedState;

/// Properties of one physical LED as seen from the bus.
pub trait PhysicalLed {
    fn state(&self) -> LedState;
    /// Drive the LED into `requested`. The recorded state only changes on success.
    fn set_state(&mut self, requested: LedState) -> Result<LedState>;
    fn color(&self) -> Palette;
    /// Set the colour from a free-form name; names outside the palette are ignored.
    fn set_color(&mut self, color: &str);
    fn duty_on(&self) -> u8;
    fn set_duty_on(&mut self, percent: u8) -> Result<u8>;
    fn period(&self) -> u32;
    fn set_period(&mut self, ms: u32) -> Result<u32>;

    /// Snapshot of every property.
    fn status(&self) -> LedStatus {
        LedStatus {
            state: self.state(),
            color: self.color(),
            duty_on: self.duty_on(),
            period_ms: self.period(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedStatus {
    pub state: LedState,
    pub color: Palette,
    pub duty_on: u8,
    pub period_ms: u32,
}
