//! CLI argument definitions for the `vox` binary.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use vox_core::error::Result;
use vox_core::types::DeliveryOptions;

/// Vox — delivers dictated text into the focused application.
#[derive(Parser, Debug)]
#[command(name = "vox", version, about)]
pub struct CliArgs {
    /// Text to deliver. Read from stdin when omitted.
    #[arg(short = 't', long = "text")]
    pub text: Option<String>,

    /// Detected file reference; repeat for several, in detection order.
    #[arg(short = 'f', long = "file")]
    pub files: Vec<String>,

    /// Identifier of the application focused when dictation began.
    #[arg(long = "target")]
    pub target: Option<String>,

    /// Only copy the text to the clipboard.
    #[arg(long = "no-auto-paste")]
    pub no_auto_paste: bool,

    /// Delivery options as camelCase JSON (`autoPaste`, `fileReferences`,
    /// `targetAppId`), replacing the individual option flags.
    #[arg(long = "options-json", conflicts_with_all = ["files", "target", "no_auto_paste"])]
    pub options_json: Option<String>,

    /// Print the action plan instead of executing it.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > VOX_CONFIG env var > platform default (~/.vox/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("VOX_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Build the per-call delivery options.
    ///
    /// `--options-json` is taken as given. Otherwise `--no-auto-paste` forces
    /// clipboard-only and the configured default applies.
    pub fn delivery_options(&self, default_auto_paste: bool) -> Result<DeliveryOptions> {
        if let Some(ref json) = self.options_json {
            return DeliveryOptions::from_json(json);
        }
        Ok(DeliveryOptions {
            auto_paste: default_auto_paste && !self.no_auto_paste,
            file_references: self.files.clone(),
            target_app_id: self.target.clone(),
        })
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".vox").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".vox").join("config.toml");
    }
    PathBuf::from("config.toml")
}
