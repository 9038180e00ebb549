//! `config` subcommand: show the effective configuration.

use super::{ConfigOutput, Context, Result, SysfsledError, kv, kv_width, print_json};

pub(super) fn cmd_config(ctx: &Context, write: bool, json: bool) -> Result<()> {
    if write {
        let path = ctx
            .config_path
            .as_ref()
            .ok_or_else(|| SysfsledError::Config("no config directory".into()))?;
        ctx.config.save_to(path)?;
        log::info!("wrote {}", path.display());
    }

    let config_file = ctx.config_path.as_ref().map(|p| p.display().to_string());
    let config_file_exists = ctx.config_path.as_ref().is_some_and(|p| p.exists());

    if json {
        return print_json(&ConfigOutput {
            config_file,
            config_file_exists,
            settings: ctx.config.clone(),
        });
    }

    let c = &ctx.config;
    let w = kv_width(
        &[
            "Config file:",
            "Sysfs root:",
            "Object path:",
            "Blink:",
            "LEDs:",
        ],
        &[],
    );
    let file_display = match &config_file {
        Some(p) if config_file_exists => p.clone(),
        Some(p) => format!("{p} (not found, using defaults)"),
        None => "(no config directory)".into(),
    };
    kv("Config file:", file_display, w);
    kv("Sysfs root:", &c.sysfs_root, w);
    kv("Object path:", &c.object_path, w);
    kv("Blink:", format!("{}% of {} ms", c.duty_on, c.period_ms), w);
    if c.leds.is_empty() {
        kv("LEDs:", "(none)", w);
    } else {
        kv("LEDs:", c.leds.join(", "), w);
    }
    Ok(())
}
