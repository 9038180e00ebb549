//! `get` subcommand: show the state of one LED.

use super::{Context, LedJson, LedState, Result, SysfsledError, kv, kv_width, print_json};

pub(super) fn cmd_get(ctx: &Context, query: &str, json: bool) -> Result<()> {
    let registry = ctx.registry();
    let led = registry
        .find(query)
        .ok_or_else(|| SysfsledError::UnknownLed(query.into()))?;
    let out = LedJson::from_led(led);

    if json {
        return print_json(&out);
    }

    let w = kv_width(&["Object path:", "State:", "Color:", "Blink:"], &[]);
    kv("Object path:", &out.object_path, w);
    kv("State:", out.status.state, w);
    kv("Color:", out.status.color, w);
    if out.status.state == LedState::Blink {
        kv(
            "Blink:",
            format!("{}% of {} ms", out.status.duty_on, out.status.period_ms),
            w,
        );
    }
    Ok(())
}
