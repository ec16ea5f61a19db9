use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, VoxError};

/// Bundle identifier of the editor whose `@` picker accepts with Return.
pub const DEFAULT_ENTER_CONFIRM_APP_ID: &str = "com.todesktop.230313mzl4w4u92";

/// Bundle identifier of the editor whose `#` picker accepts with Tab.
pub const DEFAULT_TAB_CONFIRM_APP_ID: &str = "com.microsoft.VSCode";

/// Top-level configuration for Vox.
///
/// Loaded from `~/.vox/config.toml` by default. Every section falls back to
/// its defaults when absent, so a partial file is always valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoxConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub editors: EditorConfig,
    #[serde(default)]
    pub automation: AutomationConfig,
}

impl VoxConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VoxConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| VoxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Delivery behaviour and settle pauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Default for `autoPaste` when the caller does not specify one.
    pub auto_paste: bool,
    /// Settle pauses between automation actions.
    pub pauses: PauseConfig,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            auto_paste: true,
            pauses: PauseConfig::default(),
        }
    }
}

/// Fixed settle pauses, in milliseconds.
///
/// There is no event telling us the target caught up, so every action is
/// followed by a wait sized to the slowest UI reaction observed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PauseConfig {
    /// After a clipboard write, before the paste chord.
    pub paste_settle_ms: u64,
    /// After a plain-text paste inside a mention protocol.
    pub segment_settle_ms: u64,
    /// After the trigger character, for the picker dropdown to render.
    pub picker_open_ms: u64,
    /// After the filename is entered, for the picker to filter and highlight.
    pub picker_filter_ms: u64,
    /// After the confirm key, before the next segment.
    pub confirm_settle_ms: u64,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            paste_settle_ms: 50,
            segment_settle_ms: 100,
            picker_open_ms: 400,
            picker_filter_ms: 600,
            confirm_settle_ms: 150,
        }
    }
}

impl PauseConfig {
    pub fn paste_settle(&self) -> Duration {
        Duration::from_millis(self.paste_settle_ms)
    }

    pub fn segment_settle(&self) -> Duration {
        Duration::from_millis(self.segment_settle_ms)
    }

    pub fn picker_open(&self) -> Duration {
        Duration::from_millis(self.picker_open_ms)
    }

    pub fn picker_filter(&self) -> Duration {
        Duration::from_millis(self.picker_filter_ms)
    }

    pub fn confirm_settle(&self) -> Duration {
        Duration::from_millis(self.confirm_settle_ms)
    }
}

/// Supported editors and per-editor tagging switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Identifier of the `@` / Return editor family.
    pub enter_confirm_app_id: String,
    /// Identifier of the `#` / Tab editor family.
    pub tab_confirm_app_id: String,
    /// Render file references as chips in the `@` / Return editor.
    pub enter_confirm_tagging: bool,
    /// Render file references as chips in the `#` / Tab editor.
    pub tab_confirm_tagging: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            enter_confirm_app_id: DEFAULT_ENTER_CONFIRM_APP_ID.to_string(),
            tab_confirm_app_id: DEFAULT_TAB_CONFIRM_APP_ID.to_string(),
            enter_confirm_tagging: true,
            tab_confirm_tagging: true,
        }
    }
}

/// Platform automation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Script runner used for key synthesis.
    pub osascript_path: String,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            osascript_path: "/usr/bin/osascript".to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
