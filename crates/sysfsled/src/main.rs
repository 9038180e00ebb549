//! sysfsled: inspect and drive Linux LED class devices as off / on / blink.

use std::path::PathBuf;

use clap::Parser;

mod cli;

#[derive(Parser)]
#[command(
    name = "sysfsled",
    version,
    about = "Tri-state (off/on/blink) control of Linux LED class devices"
)]
struct Args {
    /// Output as JSON (for list, get, set, config)
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// LED class directory (overrides `sysfs_root` from the config)
    #[arg(long, global = true)]
    sysfs_root: Option<String>,

    /// Raw LED name to register; repeatable (overrides `leds` from the config)
    #[arg(long = "led", global = true)]
    leds: Vec<String>,

    #[command(subcommand)]
    command: cli::Command,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let ctx = cli::Context::load(args.config, args.sysfs_root, args.leds);

    if let Err(e) = cli::run(args.command, &ctx, args.json) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
