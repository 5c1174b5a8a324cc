//! Emulator configuration
//!
//! Loaded from an optional TOML file; every field has a default so partial
//! files are valid. Key mappings are not configurable here, only the choice
//! of built-in profile.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use j2k_transport::{DEFAULT_READ_TIMEOUT_MS, PID_XBOX360_WIRED, VENDOR_MICROSOFT};
use serde::{Deserialize, Serialize};

use crate::axis::DEFAULT_DEADZONE;
use crate::keymap::Profile;

/// Complete emulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// USB vendor ID of the controller
    pub vendor_id: u16,
    /// USB product ID of the controller
    pub product_id: u16,
    /// Radial stick deadzone (0.0-1.0)
    pub deadzone: f64,
    /// Delay between poll cycles
    pub poll_interval_ms: u64,
    /// Blocking read timeout for a single report
    pub read_timeout_ms: u32,
    /// Built-in key mapping
    pub profile: Profile,
    /// Name of the virtual keyboard device
    pub keyboard_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vendor_id: VENDOR_MICROSOFT,
            product_id: PID_XBOX360_WIRED,
            deadzone: DEFAULT_DEADZONE,
            poll_interval_ms: 16,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            profile: Profile::Full,
            keyboard_name: "j2k Virtual Keyboard".to_string(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("j2k")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..1.0).contains(&self.deadzone) {
            bail!("deadzone must be in [0.0, 1.0), got {}", self.deadzone);
        }
        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than 0");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Read timeout in the form hidapi expects
    pub fn read_timeout(&self) -> i32 {
        i32::try_from(self.read_timeout_ms).unwrap_or(i32::MAX)
    }
}
