//! `set` subcommand: drive one LED to off, on or blink.

use super::{Context, LedState, Result, SetOutput, SysfsledError, print_json};

pub(super) fn cmd_set(
    ctx: &Context,
    query: &str,
    state: LedState,
    duty_on: Option<u8>,
    period: Option<u32>,
    json: bool,
) -> Result<()> {
    let mut registry = ctx.registry();
    let object_path = registry
        .find(query)
        .map(|led| led.name.object_path.clone())
        .ok_or_else(|| SysfsledError::UnknownLed(query.into()))?;
    let led = registry.find_mut(&object_path)?;
    let previous = led.state();

    let timing = (led.duty_on(), led.period());
    if let Some(d) = duty_on {
        led.set_duty_on(d)?;
    }
    if let Some(p) = period {
        led.set_period(p)?;
    }

    // A blinking LED only picks up new delays on entry into Blink, so
    // leave it first.
    if previous == LedState::Blink
        && state == LedState::Blink
        && timing != (led.duty_on(), led.period())
    {
        log::info!("{object_path}: restarting blink with new timing");
        led.set_state(LedState::Off)?;
    }
    led.set_state(state)?;

    if json {
        return print_json(&SetOutput {
            object_path,
            previous,
            status: led.status(),
        });
    }
    println!("{object_path}: {previous} -> {state}");
    Ok(())
}
