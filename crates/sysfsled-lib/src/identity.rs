//! LED identity: parse kernel LED names and derive bus object paths.
//!
//! The LED class names its devices `devicename:colour:function`, with the
//! colour and function parts optional. The identity derived from that name
//! decides the object path an LED is published under.

use std::fmt;

use serde::Serialize;

/// Object path prefix under which physical LEDs are published.
pub const DEFAULT_OBJECT_PATH: &str = "/xyz/openbmc_project/led/physical";

/// Parsed `device[:color[:function]]` LED name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedIdentity {
    pub device: String,
    pub color: String,
    pub function: String,
}

/// The LED name had no device component.
///
/// Parsing is non-fatal: [`MalformedName::identity`] yields the (fully empty)
/// partial identity for callers that prefer to carry on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedName {
    raw: String,
}

impl MalformedName {
    pub fn new(raw: &str) -> Self {
        MalformedName { raw: raw.into() }
    }

    /// The name that failed to parse.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Partial identity left behind by the failed parse.
    pub fn identity(&self) -> LedIdentity {
        LedIdentity::default()
    }
}

impl fmt::Display for MalformedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Malformed LED name: {:?}", self.raw)
    }
}

impl std::error::Error for MalformedName {}

/// Parse a raw LED name into its identity.
///
/// Fields past the third are ignored; missing trailing fields stay empty.
pub fn parse(raw: &str) -> Result<LedIdentity, MalformedName> {
    let mut fields = raw.split(':');
    let device = fields.next().unwrap_or_default();
    if device.is_empty() {
        return Err(MalformedName::new(raw));
    }
    Ok(LedIdentity {
        device: device.into(),
        color: fields.next().unwrap_or_default().into(),
        function: fields.next().unwrap_or_default().into(),
    })
}

/// Name an LED is published under: `function_color`, else whichever of the
/// two is set, else the device name.
pub fn canonical_name(identity: &LedIdentity) -> String {
    let words: Vec<&str> = [identity.function.as_str(), identity.color.as_str()]
        .into_iter()
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        identity.device.clone()
    } else {
        words.join("_")
    }
}

/// Directory name of an LED under the LED class root.
pub fn sysfs_dir_name(raw: &str) -> String {
    raw.replace('/', "-")
}

/// Path-safe form of a raw LED name: lower-case, no `/` or `-`.
pub fn normalize(raw: &str) -> String {
    sysfs_dir_name(raw).to_lowercase().replace('-', "_")
}

/// `<base>/<device>/<canonical name>`.
pub fn object_path(base: &str, identity: &LedIdentity) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        identity.device,
        canonical_name(identity)
    )
}

/// Everything derived from one raw LED name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedName {
    /// Name as supplied by the discovery side.
    pub raw: String,
    /// Attribute directory name under the LED class root.
    pub sysfs_dir: String,
    pub identity: LedIdentity,
    pub object_path: String,
}

impl LedName {
    pub fn new(raw: &str, base: &str) -> Result<Self, MalformedName> {
        let identity = parse(&normalize(raw)).map_err(|_| MalformedName::new(raw))?;
        Ok(LedName {
            raw: raw.into(),
            sysfs_dir: sysfs_dir_name(raw),
            object_path: object_path(base, &identity),
            identity,
        })
    }

    pub fn canonical_name(&self) -> String {
        canonical_name(&self.identity)
    }
}
