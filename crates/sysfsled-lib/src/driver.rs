//! sysfs LED driver: trait + LED class attribute backend.
//!
//! Every call is a single blocking read or write of one attribute file.
//! Nothing is cached and nothing is retried.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

// ── Error type ──

/// Attribute access errors.
///
/// String payloads follow the convention **"context: details"** where *context*
/// is the attribute path and *details* describes what went wrong.
#[derive(Debug)]
pub enum DriverError {
    NotFound(String),
    PermissionDenied(String),
    InvalidValue(String),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::NotFound(e) => write!(f, "Attribute not found: {e}"),
            DriverError::PermissionDenied(e) => write!(f, "Permission denied: {e}"),
            DriverError::InvalidValue(e) => write!(f, "Invalid value: {e}"),
        }
    }
}

impl std::error::Error for DriverError {}

pub type Result<T> = std::result::Result<T, DriverError>;

// ── Attributes ──

pub const ATTR_MAX_BRIGHTNESS: &str = "max_brightness";
pub const ATTR_BRIGHTNESS: &str = "brightness";
pub const ATTR_TRIGGER: &str = "trigger";
pub const ATTR_DELAY_ON: &str = "delay_on";
pub const ATTR_DELAY_OFF: &str = "delay_off";

/// Trigger sources this daemon drives LEDs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Static brightness.
    None,
    /// Software blink; exposes `delay_on` / `delay_off` once selected.
    Timer,
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::None => "none",
            Trigger::Timer => "timer",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract the active trigger from the contents of a `trigger` attribute.
///
/// The kernel lists every available trigger and brackets the active one:
/// `none [timer] heartbeat`. Contents without brackets are returned trimmed.
pub fn parse_trigger(contents: &str) -> String {
    if let Some(start) = contents.find('[')
        && let Some(len) = contents[start + 1..].find(']')
    {
        return contents[start + 1..start + 1 + len].to_string();
    }
    contents.trim().to_string()
}

// ── Trait ──

pub trait LedDriver {
    /// Brightness value that asserts the LED.
    fn max_brightness(&self) -> Result<u32>;
    fn brightness(&self) -> Result<u32>;
    fn set_brightness(&self, value: u32) -> Result<()>;
    /// Name of the active trigger.
    fn trigger(&self) -> Result<String>;
    fn set_trigger(&self, trigger: Trigger) -> Result<()>;
    /// Milliseconds on per blink period. Only present while the timer trigger is active.
    fn delay_on(&self) -> Result<u32>;
    fn set_delay_on(&self, ms: u32) -> Result<()>;
    /// Milliseconds off per blink period. Only present while the timer trigger is active.
    fn delay_off(&self) -> Result<u32>;
    fn set_delay_off(&self, ms: u32) -> Result<()>;

    /// Called once when the owning controller gives the LED up.
    fn release(&self) {}
}

// ── sysfs implementation ──

fn map_io_error(path: &Path, e: io::Error) -> DriverError {
    let context = format!("{}: {e}", path.display());
    match e.kind() {
        io::ErrorKind::NotFound => DriverError::NotFound(context),
        io::ErrorKind::PermissionDenied => DriverError::PermissionDenied(context),
        _ => DriverError::InvalidValue(context),
    }
}

/// LED backed by an attribute directory, e.g. `/sys/class/leds/<name>`.
#[derive(Debug, Clone)]
pub struct SysfsLed {
    root: PathBuf,
}

impl SysfsLed {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SysfsLed { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_attr(&self, attr: &str) -> Result<String> {
        let path = self.root.join(attr);
        std::fs::read_to_string(&path).map_err(|e| map_io_error(&path, e))
    }

    fn write_attr(&self, attr: &str, value: &str) -> Result<()> {
        let path = self.root.join(attr);
        log::debug!("write {} <- {value}", path.display());
        // Attributes are never created: one that is absent is NotFound.
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| map_io_error(&path, e))?;
        file.write_all(value.as_bytes())
            .map_err(|e| map_io_error(&path, e))
    }

    fn read_u32(&self, attr: &str) -> Result<u32> {
        let contents = self.read_attr(attr)?;
        contents.trim().parse().map_err(|_| {
            DriverError::InvalidValue(format!(
                "{}: {:?} is not a number",
                self.root.join(attr).display(),
                contents.trim()
            ))
        })
    }

    fn write_u32(&self, attr: &str, value: u32) -> Result<()> {
        self.write_attr(attr, &value.to_string())
    }
}

impl LedDriver for SysfsLed {
    fn max_brightness(&self) -> Result<u32> {
        self.read_u32(ATTR_MAX_BRIGHTNESS)
    }

    fn brightness(&self) -> Result<u32> {
        self.read_u32(ATTR_BRIGHTNESS)
    }

    fn set_brightness(&self, value: u32) -> Result<()> {
        self.write_u32(ATTR_BRIGHTNESS, value)
    }

    fn trigger(&self) -> Result<String> {
        self.read_attr(ATTR_TRIGGER).map(|c| parse_trigger(&c))
    }

    fn set_trigger(&self, trigger: Trigger) -> Result<()> {
        self.write_attr(ATTR_TRIGGER, trigger.as_str())
    }

    fn delay_on(&self) -> Result<u32> {
        self.read_u32(ATTR_DELAY_ON)
    }

    fn set_delay_on(&self, ms: u32) -> Result<()> {
        self.write_u32(ATTR_DELAY_ON, ms)
    }

    fn delay_off(&self) -> Result<u32> {
        self.read_u32(ATTR_DELAY_OFF)
    }

    fn set_delay_off(&self, ms: u32) -> Result<()> {
        self.write_u32(ATTR_DELAY_OFF, ms)
    }
}

// ── Mock ──

/// In-memory mock LED for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    /// One driver call, in the order it was issued.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        MaxBrightness,
        Brightness,
        SetBrightness(u32),
        Trigger,
        SetTrigger(Trigger),
        DelayOn,
        SetDelayOn(u32),
        DelayOff,
        SetDelayOff(u32),
    }

    impl Call {
        pub fn is_write(&self) -> bool {
            matches!(
                self,
                Call::SetBrightness(_)
                    | Call::SetTrigger(_)
                    | Call::SetDelayOn(_)
                    | Call::SetDelayOff(_)
            )
        }
    }

    /// Attribute store that behaves like the LED class: selecting the timer
    /// trigger creates `delay_on`/`delay_off` (500 ms each), selecting `none`
    /// removes them again.
    pub struct MockLed {
        /// Attribute storage: name → file contents.
        pub attrs: RefCell<HashMap<&'static str, String>>,
        /// Recorded calls, reads included.
        pub calls: RefCell<Vec<Call>>,
        /// If set, any access to this attribute fails with `PermissionDenied`.
        pub fail_attr: RefCell<Option<&'static str>>,
        /// Set by [`LedDriver::release`]; shared so it outlives the mock.
        released: Rc<Cell<bool>>,
    }

    impl Default for MockLed {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockLed {
        /// An LED that is off, with `max_brightness` 255.
        pub fn new() -> Self {
            let attrs = HashMap::from([
                (ATTR_MAX_BRIGHTNESS, "255".to_string()),
                (ATTR_BRIGHTNESS, "0".to_string()),
                (ATTR_TRIGGER, "[none] timer heartbeat".to_string()),
            ]);
            MockLed {
                attrs: RefCell::new(attrs),
                calls: RefCell::new(Vec::new()),
                fail_attr: RefCell::new(None),
                released: Rc::new(Cell::new(false)),
            }
        }

        /// An LED already blinking with the given delays.
        pub fn blinking(delay_on: u32, delay_off: u32) -> Self {
            let led = Self::new();
            led.set_attr(ATTR_TRIGGER, "none [timer] heartbeat");
            led.set_attr(ATTR_DELAY_ON, &delay_on.to_string());
            led.set_attr(ATTR_DELAY_OFF, &delay_off.to_string());
            led
        }

        pub fn set_attr(&self, attr: &'static str, value: &str) {
            self.attrs.borrow_mut().insert(attr, value.to_string());
        }

        pub fn attr(&self, attr: &str) -> Option<String> {
            self.attrs.borrow().get(attr).cloned()
        }

        /// Handle that reads `true` once the mock has been released.
        pub fn released_flag(&self) -> Rc<Cell<bool>> {
            Rc::clone(&self.released)
        }

        /// Make every access to `attr` fail.
        pub fn fail_on(&self, attr: &'static str) {
            *self.fail_attr.borrow_mut() = Some(attr);
        }

        /// Recorded writes, in order.
        pub fn writes(&self) -> Vec<Call> {
            self.calls
                .borrow()
                .iter()
                .filter(|c| c.is_write())
                .cloned()
                .collect()
        }

        pub fn clear_calls(&self) {
            self.calls.borrow_mut().clear();
        }

        fn check(&self, attr: &str) -> Result<()> {
            if self.fail_attr.borrow().is_some_and(|a| a == attr) {
                return Err(DriverError::PermissionDenied(format!(
                    "mock/{attr}: failure injected"
                )));
            }
            if !self.attrs.borrow().contains_key(attr) {
                return Err(DriverError::NotFound(format!("mock/{attr}: no such file")));
            }
            Ok(())
        }

        fn read_u32(&self, attr: &str) -> Result<u32> {
            self.check(attr)?;
            let value = self.attr(attr).unwrap_or_default();
            value
                .trim()
                .parse()
                .map_err(|_| DriverError::InvalidValue(format!("mock/{attr}: {value:?}")))
        }

        fn write(&self, attr: &'static str, value: u32) -> Result<()> {
            self.check(attr)?;
            self.set_attr(attr, &value.to_string());
            Ok(())
        }
    }

    impl LedDriver for MockLed {
        fn max_brightness(&self) -> Result<u32> {
            self.calls.borrow_mut().push(Call::MaxBrightness);
            self.read_u32(ATTR_MAX_BRIGHTNESS)
        }

        fn brightness(&self) -> Result<u32> {
            self.calls.borrow_mut().push(Call::Brightness);
            self.read_u32(ATTR_BRIGHTNESS)
        }

        fn set_brightness(&self, value: u32) -> Result<()> {
            self.calls.borrow_mut().push(Call::SetBrightness(value));
            self.write(ATTR_BRIGHTNESS, value)
        }

        fn trigger(&self) -> Result<String> {
            self.calls.borrow_mut().push(Call::Trigger);
            self.check(ATTR_TRIGGER)?;
            Ok(parse_trigger(&self.attr(ATTR_TRIGGER).unwrap_or_default()))
        }

        fn set_trigger(&self, trigger: Trigger) -> Result<()> {
            self.calls.borrow_mut().push(Call::SetTrigger(trigger));
            self.check(ATTR_TRIGGER)?;
            let mut attrs = self.attrs.borrow_mut();
            match trigger {
                Trigger::None => {
                    attrs.insert(ATTR_TRIGGER, "[none] timer heartbeat".into());
                    attrs.remove(ATTR_DELAY_ON);
                    attrs.remove(ATTR_DELAY_OFF);
                }
                Trigger::Timer => {
                    attrs.insert(ATTR_TRIGGER, "none [timer] heartbeat".into());
                    attrs.entry(ATTR_DELAY_ON).or_insert_with(|| "500".into());
                    attrs.entry(ATTR_DELAY_OFF).or_insert_with(|| "500".into());
                }
            }
            Ok(())
        }

        fn delay_on(&self) -> Result<u32> {
            self.calls.borrow_mut().push(Call::DelayOn);
            self.read_u32(ATTR_DELAY_ON)
        }

        fn set_delay_on(&self, ms: u32) -> Result<()> {
            self.calls.borrow_mut().push(Call::SetDelayOn(ms));
            self.write(ATTR_DELAY_ON, ms)
        }

        fn delay_off(&self) -> Result<u32> {
            self.calls.borrow_mut().push(Call::DelayOff);
            self.read_u32(ATTR_DELAY_OFF)
        }

        fn set_delay_off(&self, ms: u32) -> Result<()> {
            self.calls.borrow_mut().push(Call::SetDelayOff(ms));
            self.write(ATTR_DELAY_OFF, ms)
        }

        fn release(&self) {
            self.released.set(true);
        }
    }
}
