//! `list` subcommand: show every registered LED.

use super::{Context, LedJson, ListOutput, PhysicalLed, Result, kv_indent, kv_width, print_json};

pub(super) fn cmd_list(ctx: &Context, json: bool) -> Result<()> {
    let registry = ctx.registry();
    let leds: Vec<LedJson> = registry.iter().map(LedJson::from_led).collect();

    if json {
        return print_json(&ListOutput {
            count: leds.len(),
            leds,
        });
    }

    if registry.is_empty() {
        println!("No LEDs configured (use --led NAME or `leds` in the config file).");
        return Ok(());
    }

    let w = kv_width(&[], &["Name:", "Sysfs:", "Color:", "State:", "Blink:"]);
    for led in registry.iter() {
        let status = led.controller.status();
        println!("{}", led.name.object_path);
        kv_indent("Name:", &led.name.raw, w);
        kv_indent("Sysfs:", led.controller.driver().root().display(), w);
        kv_indent("Color:", status.color, w);
        kv_indent("State:", status.state, w);
        kv_indent(
            "Blink:",
            format!("{}% of {} ms", status.duty_on, status.period_ms),
            w,
        );
    }
    Ok(())
}
