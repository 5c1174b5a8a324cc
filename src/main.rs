//! j2k - joystick to keyboard emulator
//!
//! Main entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use j2k::keymap::key_name;
use j2k::poll::{self, PollSettings, ShutdownToken};
use j2k::{Config, Error, KeyMapping, KeyStateMachine, Profile, VirtualKeyboard};
use j2k_transport::HidDiscovery;

mod cli;
use cli::{Cli, Commands, RunArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)?;

    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            args.apply(&mut config);
            config.validate()?;
            run(&config)
        }
        Commands::Devices => list_devices(&config),
        Commands::Mappings { profile } => print_mappings(profile.unwrap_or(config.profile)),
        Commands::Config { save } => {
            print!("{}", toml::to_string_pretty(&config)?);
            if save {
                config
                    .save(&config_path)
                    .with_context(|| format!("saving {}", config_path.display()))?;
                println!("# saved to {}", config_path.display());
            }
            Ok(())
        }
    }
}

/// Open the controller and translate input until interrupted
fn run(config: &Config) -> Result<()> {
    let mapping = KeyMapping::for_profile(config.profile).map_err(Error::from)?;

    let shutdown = ShutdownToken::new();
    shutdown.install_signal_handler()?;

    let mut keyboard = VirtualKeyboard::new(&config.keyboard_name, mapping.keys())
        .map_err(Error::Initialization)?;
    info!("Created virtual keyboard: {}", config.keyboard_name);
    if let Some(path) = keyboard.device_path() {
        info!("Device path: {}", path.display());
    }

    let discovery = HidDiscovery::with_devices(&[(config.vendor_id, config.product_id)]);
    let mut controller = discovery
        .open_first(config.read_timeout())
        .map_err(Error::DeviceUnavailable)?;
    info!("Controller connected. Starting keyboard emulation...");

    info!("Profile: {}", config.profile);
    for (input, key) in mapping.iter() {
        info!("  {:<18} -> {}", input, key_name(key));
    }

    let engine = KeyStateMachine::new(mapping, keyboard);

    info!("Entering main loop. Press Ctrl+C to exit.");
    let stats = poll::run(
        &mut controller,
        &engine,
        &PollSettings::from(config),
        &shutdown,
    );
    info!(
        "Emitted {} key events from {} reports ({} short reads)",
        stats.key_events, stats.reports, stats.short_reads
    );

    Ok(())
}

/// Print every HID device, marking the configured controller
fn list_devices(config: &Config) -> Result<()> {
    let devices = HidDiscovery::new()
        .list_all()
        .context("enumerating HID devices")?;

    if devices.is_empty() {
        println!("No HID devices found");
        return Ok(());
    }

    for device in devices {
        let info = &device.info;
        let marker = if (info.vid, info.pid) == (config.vendor_id, config.product_id) {
            "*"
        } else if j2k_transport::is_known_controller(info.vid, info.pid) {
            "+"
        } else {
            " "
        };
        println!("{marker} {info}");
    }
    println!();
    println!("* = configured controller, + = other supported controller");
    Ok(())
}

fn print_mappings(profile: Profile) -> Result<()> {
    let mapping = KeyMapping::for_profile(profile)?;
    println!("Profile: {profile}");
    for (input, key) in mapping.iter() {
        println!("  {:<18} -> {}", input.name(), key_name(key));
    }
    Ok(())
}
