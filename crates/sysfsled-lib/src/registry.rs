//! LED registry: one controller per object path.
//!
//! Owned by whoever runs the daemon and passed to the property backend; there
//! is no process-wide instance.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::Config;
use crate::driver::{LedDriver, SysfsLed};
use crate::error::{Result, SysfsledError};
use crate::identity::LedName;
use crate::led::{BlinkProfile, LedController, PhysicalLed};

/// A registered LED: its derived names and its controller.
pub struct RegisteredLed<D: LedDriver> {
    pub name: LedName,
    pub controller: LedController<D>,
}

impl<D: LedDriver> RegisteredLed<D> {
    fn matches(&self, query: &str) -> bool {
        self.name.object_path == query
            || self.name.raw == query
            || self.name.sysfs_dir == query
            || self.name.canonical_name() == query
    }
}

pub struct Registry<D: LedDriver> {
    base: String,
    leds: BTreeMap<String, RegisteredLed<D>>,
}

impl<D: LedDriver> Registry<D> {
    /// Empty registry publishing under `base`.
    pub fn new(base: impl Into<String>) -> Self {
        Registry {
            base: base.into(),
            leds: BTreeMap::new(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Register an LED with the default blink profile. See [`register_with_profile`].
    ///
    /// [`register_with_profile`]: Self::register_with_profile
    pub fn register(&mut self, raw: &str, open: impl FnOnce(&str) -> D) -> Result<String> {
        self.register_with_profile(raw, BlinkProfile::default(), open)
    }

    /// Parse `raw`, open its driver via `open(sysfs_dir)` and bind a controller
    /// to the derived object path, which is returned.
    ///
    /// The controller adopts the hardware's current state. If that cannot be
    /// read the LED is still registered, as `Off`. An LED already registered
    /// at the same path is released first.
    pub fn register_with_profile(
        &mut self,
        raw: &str,
        profile: BlinkProfile,
        open: impl FnOnce(&str) -> D,
    ) -> Result<String> {
        let name = LedName::new(raw, &self.base)?;
        let mut controller = LedController::new(open(&name.sysfs_dir)).with_blink_profile(profile);
        if let Err(e) = controller.derive_initial_state() {
            log::warn!("{}: cannot read initial state, assuming Off: {e}", name.raw);
        }
        controller.set_led_color(&name.identity.color);

        let path = name.object_path.clone();
        if let Some(old) = self.leds.remove(&path) {
            log::info!("{path}: replacing LED {:?} with {:?}", old.name.raw, name.raw);
            drop(old.controller.release());
        }
        log::info!("{path}: registered {:?} ({})", name.raw, controller.state());
        self.leds.insert(path.clone(), RegisteredLed { name, controller });
        Ok(path)
    }

    pub fn get(&self, path: &str) -> Option<&RegisteredLed<D>> {
        self.leds.get(path)
    }

    /// Property interface of the LED at `path`.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut dyn PhysicalLed> {
        self.leds
            .get_mut(path)
            .map(|led| &mut led.controller as &mut dyn PhysicalLed)
    }

    /// Look an LED up by object path, raw name, sysfs directory or canonical
    /// name. Canonical names can collide across devices; the first path in
    /// order wins.
    pub fn find(&self, query: &str) -> Option<&RegisteredLed<D>> {
        self.leds
            .get(query)
            .or_else(|| self.leds.values().find(|led| led.matches(query)))
    }

    /// [`find`](Self::find), returning the property interface.
    pub fn find_mut(&mut self, query: &str) -> Result<&mut dyn PhysicalLed> {
        let path = self
            .find(query)
            .map(|led| led.name.object_path.clone())
            .ok_or_else(|| SysfsledError::UnknownLed(query.into()))?;
        self.get_mut(&path)
            .ok_or_else(|| SysfsledError::UnknownLed(query.into()))
    }

    /// Unregister the LED at `path`, handing back its driver.
    pub fn remove(&mut self, path: &str) -> Option<D> {
        self.leds.remove(path).map(|led| led.controller.release())
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.leds.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredLed<D>> {
        self.leds.values()
    }

    pub fn len(&self) -> usize {
        self.leds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leds.is_empty()
    }
}

impl Registry<SysfsLed> {
    /// Register every configured LED against the configured LED class root.
    ///
    /// LEDs that fail to register are logged and returned alongside the
    /// registry; they never prevent the others from being served.
    pub fn from_config(config: &Config) -> (Self, Vec<SysfsledError>) {
        let mut registry = Registry::new(config.object_path.clone());
        let root = Path::new(&config.sysfs_root);
        let profile = config.blink_profile().unwrap_or_default();
        let mut errors = Vec::new();
        for raw in &config.leds {
            if let Err(e) =
                registry.register_with_profile(raw, profile, |dir| SysfsLed::new(root.join(dir)))
            {
                log::warn!("skipping LED {raw:?}: {e}");
                errors.push(e);
            }
        }
        (registry, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::ATTR_BRIGHTNESS;
    use crate::driver::mock::MockLed;
    use crate::led::{LedState, Palette};

    const BASE: &str = "/xyz/openbmc_project/led/physical";

    #[test]
    fn register_derives_object_path() {
        let mut reg = Registry::new(BASE);
        let path = reg.register("group1:blue:power1", |_| MockLed::new()).unwrap();
        assert_eq!(path, "/xyz/openbmc_project/led/physical/group1/power1_blue");
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn register_passes_sysfs_dir_to_opener() {
        let mut reg = Registry::new(BASE);
        let mut seen = String::new();
        reg.register("i2c/led:Green", |dir| {
            seen = dir.to_string();
            MockLed::new()
        })
        .unwrap();
        assert_eq!(seen, "i2c-led:Green");
    }

    #[test]
    fn register_applies_identity_color() {
        let mut reg = Registry::new(BASE);
        let path = reg.register("group1:yellow:system1", |_| MockLed::new()).unwrap();
        assert_eq!(reg.get(&path).unwrap().controller.color(), Palette::Yellow);
    }

    #[test]
    fn register_unknown_color_keeps_default() {
        let mut reg = Registry::new(BASE);
        let path = reg.register("group1:purple:fault", |_| MockLed::new()).unwrap();
        assert_eq!(reg.get(&path).unwrap().controller.color(), Palette::Unknown);
    }

    #[test]
    fn register_adopts_hardware_state() {
        let mut reg = Registry::new(BASE);
        let path = reg
            .register("group2", |_| {
                let led = MockLed::new();
                led.set_attr(ATTR_BRIGHTNESS, "10");
                led
            })
            .unwrap();
        assert_eq!(reg.get(&path).unwrap().controller.state(), LedState::On);
    }

    #[test]
    fn register_tolerates_unreadable_led() {
        let mut reg = Registry::new(BASE);
        let path = reg
            .register("group3", |_| {
                let led = MockLed::new();
                led.fail_on(crate::driver::ATTR_TRIGGER);
                led
            })
            .unwrap();
        assert_eq!(reg.get(&path).unwrap().controller.state(), LedState::Off);
    }

    #[test]
    fn register_malformed_name_inserts_nothing() {
        let mut reg = Registry::new(BASE);
        let err = reg.register("", |_| MockLed::new()).unwrap_err();
        assert!(matches!(err, SysfsledError::Name(_)));
        assert!(reg.is_empty());
    }

    #[test]
    fn reregister_replaces_and_releases() {
        let mut reg = Registry::new(BASE);
        let mut first_released = None;
        let first = reg
            .register("group1:blue:power1", |_| {
                let led = MockLed::new();
                first_released = Some(led.released_flag());
                led
            })
            .unwrap();
        let first_released = first_released.unwrap();
        reg.get_mut(&first).unwrap().set_state(LedState::On).unwrap();
        assert!(!first_released.get());

        let mut second_released = None;
        let second = reg
            .register("Group1:Blue:Power1", |_| {
                let led = MockLed::new();
                second_released = Some(led.released_flag());
                led
            })
            .unwrap();
        assert_eq!(first, second);
        assert!(first_released.get(), "old controller was not released");
        assert!(!second_released.unwrap().get());

        assert_eq!(reg.len(), 1);
        let led = reg.get(&second).unwrap();
        assert_eq!(led.name.raw, "Group1:Blue:Power1");
        assert_eq!(led.controller.state(), LedState::Off);
    }

    #[test]
    fn find_by_every_name() {
        let mut reg = Registry::new(BASE);
        let path = reg.register("group1:blue:power1", |_| MockLed::new()).unwrap();
        for query in [path.as_str(), "group1:blue:power1", "power1_blue"] {
            let led = reg.find(query).unwrap_or_else(|| panic!("no match for {query}"));
            assert_eq!(led.name.object_path, path);
        }
        assert!(reg.find("power2_blue").is_none());
    }

    #[test]
    fn find_mut_dispatches_set_state() {
        let mut reg = Registry::new(BASE);
        let path = reg.register("group4:blue:power4", |_| MockLed::new()).unwrap();
        reg.find_mut("power4_blue").unwrap().set_state(LedState::Blink).unwrap();
        assert_eq!(reg.get(&path).unwrap().controller.state(), LedState::Blink);
    }

    #[test]
    fn find_mut_unknown_is_error() {
        let mut reg: Registry<MockLed> = Registry::new(BASE);
        let err = reg.find_mut("nope").err().unwrap();
        assert!(matches!(err, SysfsledError::UnknownLed(_)));
    }

    #[test]
    fn one_failing_led_does_not_block_others() {
        let mut reg = Registry::new(BASE);
        let bad = reg
            .register("group1:blue:power1", |_| {
                let led = MockLed::new();
                led.fail_on(ATTR_BRIGHTNESS);
                led
            })
            .unwrap();
        let good = reg.register("group2:blue:power2", |_| MockLed::new()).unwrap();
        assert!(reg.get_mut(&bad).unwrap().set_state(LedState::On).is_err());
        assert!(reg.get_mut(&good).unwrap().set_state(LedState::On).is_ok());
    }

    #[test]
    fn remove_returns_driver() {
        let mut reg = Registry::new(BASE);
        let path = reg.register("group2", |_| MockLed::new()).unwrap();
        let led = reg.remove(&path).unwrap();
        assert!(led.released_flag().get());
        assert!(reg.is_empty());
        assert!(reg.remove(&path).is_none());
    }

    #[test]
    fn paths_are_sorted() {
        let mut reg = Registry::new("/leds");
        reg.register("b", |_| MockLed::new()).unwrap();
        reg.register("a", |_| MockLed::new()).unwrap();
        let paths: Vec<&str> = reg.paths().collect();
        assert_eq!(paths, vec!["/leds/a/a", "/leds/b/b"]);
    }

    #[test]
    fn configured_profile_applies_to_new_leds() {
        let mut reg = Registry::new(BASE);
        let profile = BlinkProfile::new(10, 200).unwrap();
        let path = reg
            .register_with_profile("group2", profile, |_| MockLed::new())
            .unwrap();
        assert_eq!(reg.get(&path).unwrap().controller.blink_profile(), profile);
    }
}
