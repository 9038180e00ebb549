//! CLI subcommands: list, query and drive registered LEDs.

mod config_cmd;
mod get;
mod list;
mod set;

use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;

pub(super) use sysfsled_lib::SysfsledError;
pub(super) use sysfsled_lib::config::Config;
pub(super) use sysfsled_lib::driver::SysfsLed;
pub(super) use sysfsled_lib::error::Result;
pub(super) use sysfsled_lib::led::{LedState, LedStatus, PhysicalLed};
pub(super) use sysfsled_lib::registry::{RegisteredLed, Registry};

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w - 2);
}

pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    let json_str = serde_json::to_string_pretty(value)
        .map_err(|e| SysfsledError::Config(format!("JSON serialization failed: {e}")))?;
    println!("{json_str}");
    Ok(())
}

// ── Run context ──

/// Effective configuration for one invocation.
pub struct Context {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load the config file and apply command-line overrides.
    pub fn load(path: Option<PathBuf>, sysfs_root: Option<String>, leds: Vec<String>) -> Self {
        let config_path = path.or_else(Config::path);
        let (mut config, warnings) = match &config_path {
            Some(p) => Config::load_from(p),
            None => (Config::default(), vec![]),
        };
        for w in &warnings {
            log::warn!("{w}");
        }
        if let Some(root) = sysfs_root {
            config.sysfs_root = root;
        }
        if !leds.is_empty() {
            config.leds = leds;
        }
        if let Err(errors) = config.validate() {
            for e in &errors {
                log::warn!("[config] {e}");
            }
        }
        Context {
            config,
            config_path,
        }
    }

    /// Register every configured LED.
    pub fn registry(&self) -> Registry<SysfsLed> {
        let (registry, errors) = Registry::from_config(&self.config);
        if !errors.is_empty() {
            log::warn!("{} LED(s) could not be registered", errors.len());
        }
        registry
    }
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct LedJson {
    pub object_path: String,
    pub name: String,
    pub sysfs_path: String,
    #[serde(flatten)]
    pub status: LedStatus,
}

impl LedJson {
    pub fn from_led(led: &RegisteredLed<SysfsLed>) -> Self {
        LedJson {
            object_path: led.name.object_path.clone(),
            name: led.name.raw.clone(),
            sysfs_path: led.controller.driver().root().display().to_string(),
            status: led.controller.status(),
        }
    }
}

#[derive(Serialize)]
pub(super) struct ListOutput {
    pub count: usize,
    pub leds: Vec<LedJson>,
}

#[derive(Serialize)]
pub(super) struct SetOutput {
    pub object_path: String,
    pub previous: LedState,
    #[serde(flatten)]
    pub status: LedStatus,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
}

#[derive(Subcommand)]
pub enum Command {
    /// List registered LEDs with their object paths and current state
    List,

    /// Show the state of one LED
    Get {
        /// Object path, raw LED name or canonical name
        led: String,
    },

    /// Drive one LED to off, on or blink
    Set {
        /// Object path, raw LED name or canonical name
        led: String,
        /// Requested state: off, on or blink
        state: LedState,
        /// Blink duty cycle in percent (0-100)
        #[arg(long)]
        duty_on: Option<u8>,
        /// Blink period in milliseconds
        #[arg(long)]
        period: Option<u32>,
    },

    /// Show the effective configuration and file path
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

pub fn run(cmd: Command, ctx: &Context, json: bool) -> Result<()> {
    match cmd {
        Command::List => list::cmd_list(ctx, json),
        Command::Get { led } => get::cmd_get(ctx, &led, json),
        Command::Set {
            led,
            state,
            duty_on,
            period,
        } => set::cmd_set(ctx, &led, state, duty_on, period, json),
        Command::Config { write } => config_cmd::cmd_config(ctx, write, json),
    }
}
