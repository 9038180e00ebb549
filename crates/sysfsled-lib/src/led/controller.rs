//! LED controller: logical state tracking and the sysfs write sequences.
//!
//! Reaching a state is a short ordered series of attribute writes. The order
//! is imposed by the LED class: `brightness` only sticks once the trigger is
//! `none`, and `delay_on`/`delay_off` only exist after `timer` is selected.
//! A failure part-way through leaves the hardware between states; nothing
//! rolls it back, and the logical state keeps its previous value.

use crate::driver::{self, LedDriver, Trigger};
use crate::error::Result;

use super::palette::Palette;
use super::physical::PhysicalLed;
use super::state::{self, BlinkProfile, LedState};

/// Brightness written for [`LedState::Off`].
pub const DEASSERT: u32 = 0;

/// State machine for one LED, owning its driver.
pub struct LedController<D: LedDriver> {
    driver: D,
    state: LedState,
    blink: BlinkProfile,
    /// `max_brightness`, once read.
    assert_value: Option<u32>,
    color: Palette,
}

impl<D: LedDriver> LedController<D> {
    /// A controller that assumes the LED is off. Call
    /// [`derive_initial_state`](Self::derive_initial_state) to sync with hardware.
    pub fn new(driver: D) -> Self {
        LedController {
            driver,
            state: LedState::Off,
            blink: BlinkProfile::default(),
            assert_value: None,
            color: Palette::Unknown,
        }
    }

    /// Replace the blink profile used for the next transition into `Blink`.
    pub fn with_blink_profile(mut self, profile: BlinkProfile) -> Self {
        self.blink = profile;
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn blink_profile(&self) -> BlinkProfile {
        self.blink
    }

    pub fn assert_value(&self) -> Option<u32> {
        self.assert_value
    }

    /// Read the hardware and adopt whatever state it is in.
    ///
    /// A timer trigger whose period is too short to yield a duty cycle is
    /// treated as `Off`.
    pub fn derive_initial_state(&mut self) -> driver::Result<LedState> {
        let trigger = self.driver.trigger()?;
        let state = if trigger == Trigger::Timer.as_str() {
            let delay_on = self.driver.delay_on()?;
            let delay_off = self.driver.delay_off()?;
            match BlinkProfile::from_delays(delay_on, delay_off) {
                Some(profile) => {
                    self.blink = profile;
                    LedState::Blink
                }
                None => {
                    log::warn!(
                        "timer trigger with delays {delay_on}/{delay_off} ms has no usable period, assuming Off"
                    );
                    LedState::Off
                }
            }
        } else {
            let brightness = self.driver.brightness()?;
            let assert = self.driver.max_brightness()?;
            self.assert_value = Some(assert);
            if brightness != 0 && assert != 0 {
                LedState::On
            } else {
                LedState::Off
            }
        };
        log::debug!("initial state {state} (trigger {trigger})");
        self.state = state;
        Ok(state)
    }

    /// Issue the writes that take the LED from `current` to `requested`.
    ///
    /// Does not touch the recorded state; see [`PhysicalLed::set_state`].
    pub fn drive_led(&mut self, current: LedState, requested: LedState) -> driver::Result<()> {
        if current == requested {
            return Ok(());
        }
        match requested {
            LedState::On | LedState::Off => self.stable_state_operation(requested),
            LedState::Blink => self.blink_operation(),
        }
    }

    fn assert(&mut self) -> driver::Result<u32> {
        match self.assert_value {
            Some(v) => Ok(v),
            None => {
                let v = self.driver.max_brightness()?;
                self.assert_value = Some(v);
                Ok(v)
            }
        }
    }

    fn stable_state_operation(&mut self, action: LedState) -> driver::Result<()> {
        let value = if action == LedState::On {
            self.assert()?
        } else {
            DEASSERT
        };
        self.driver.set_trigger(Trigger::None)?;
        self.driver.set_brightness(value)
    }

    fn blink_operation(&self) -> driver::Result<()> {
        let (delay_on, delay_off) = self.blink.delays();
        self.driver.set_trigger(Trigger::Timer)?;
        self.driver.set_delay_on(delay_on)?;
        self.driver.set_delay_off(delay_off)
    }

    /// Publish the palette entry for a kernel colour word.
    ///
    /// Names outside the palette leave the current colour unchanged.
    pub fn set_led_color(&mut self, color: &str) {
        if color.is_empty() {
            return;
        }
        match Palette::from_name(color) {
            Ok(palette) => self.color = palette,
            Err(e) => log::debug!("{e}, keeping {}", self.color),
        }
    }

    /// Hand back the driver, ending control of the LED.
    pub fn release(self) -> D {
        log::debug!("releasing LED controller in state {}", self.state);
        self.driver.release();
        self.driver
    }
}

impl<D: LedDriver> PhysicalLed for LedController<D> {
    fn state(&self) -> LedState {
        self.state
    }

    fn set_state(&mut self, requested: LedState) -> Result<LedState> {
        let current = self.state;
        self.drive_led(current, requested)?;
        if current != requested {
            log::info!("LED {current} -> {requested}");
        }
        self.state = requested;
        Ok(requested)
    }

    fn color(&self) -> Palette {
        self.color
    }

    fn set_color(&mut self, color: &str) {
        self.set_led_color(color);
    }

    fn duty_on(&self) -> u8 {
        self.blink.duty_on
    }

    fn set_duty_on(&mut self, percent: u8) -> Result<u8> {
        state::validate_duty_on(percent)?;
        self.blink.duty_on = percent;
        Ok(percent)
    }

    fn period(&self) -> u32 {
        self.blink.period_ms
    }

    fn set_period(&mut self, ms: u32) -> Result<u32> {
        state::validate_period(ms)?;
        self.blink.period_ms = ms;
        Ok(ms)
    }
}
