// CLI definitions using clap

use clap::{Args, Parser, Subcommand};
use j2k::{Config, Profile};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "j2k")]
#[command(author, version, about = "Joystick to keyboard emulator")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/j2k/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate controller input into key presses (default)
    Run(RunArgs),

    /// List HID devices and mark supported controllers
    #[command(visible_aliases = ["list", "ls"])]
    Devices,

    /// Show the input-to-key table of a profile
    #[command(visible_alias = "map")]
    Mappings {
        /// Profile to show (defaults to the configured one)
        #[arg(short, long)]
        profile: Option<Profile>,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Mapping profile (full, movement)
    #[arg(short, long)]
    pub profile: Option<Profile>,

    /// Stick deadzone (0.0-1.0)
    #[arg(short, long)]
    pub deadzone: Option<f64>,

    /// Controller vendor ID in hex (e.g. 0x045e)
    #[arg(long, value_parser = parse_hex_u16)]
    pub vid: Option<u16>,

    /// Controller product ID in hex (e.g. 0x028e)
    #[arg(long, value_parser = parse_hex_u16)]
    pub pid: Option<u16>,

    /// Poll interval in milliseconds
    #[arg(long)]
    pub poll_ms: Option<u64>,
}

impl RunArgs {
    /// Override config values given on the command line
    pub fn apply(&self, config: &mut Config) {
        if let Some(profile) = self.profile {
            config.profile = profile;
        }
        if let Some(deadzone) = self.deadzone {
            config.deadzone = deadzone;
        }
        if let Some(vid) = self.vid {
            config.vendor_id = vid;
        }
        if let Some(pid) = self.pid {
            config.product_id = pid;
        }
        if let Some(ms) = self.poll_ms {
            config.poll_interval_ms = ms;
        }
    }
}

/// Parse a u16 given as hex, with or without `0x` (`0x045e`, `045e`)
fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let s = s.trim();
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(hex, 16).map_err(|e| format!("invalid hex ID \"{s}\": {e}"))
}
