//! System automation backend.
//!
//! Clipboard writes go through `arboard`. Keys are synthesized by launching
//! `osascript` with a one-line System Events script. The process is awaited
//! for its exit but its status is only logged; whether the focused app
//! reacted to the keystroke is never observable from here.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use vox_core::config::AutomationConfig;
use vox_core::error::{Result, VoxError};

use crate::backend::{AutomationBackend, ConfirmKey, KeyScript};

/// AppleScript key code for Return.
const KEY_CODE_RETURN: u8 = 36;
/// AppleScript key code for Tab.
const KEY_CODE_TAB: u8 = 48;

/// Backend driving the real clipboard and keyboard.
#[derive(Debug, Clone)]
pub struct SystemBackend {
    osascript: PathBuf,
}

impl SystemBackend {
    pub fn new(config: &AutomationConfig) -> Self {
        Self {
            osascript: PathBuf::from(&config.osascript_path),
        }
    }
}

/// Render a key-synthesis command as an AppleScript one-liner.
pub fn applescript(script: &KeyScript) -> String {
    let action = match script {
        KeyScript::PasteChord => r#"keystroke "v" using command down"#.to_string(),
        KeyScript::Type(text) => format!(r#"keystroke "{}""#, escape_applescript(text)),
        KeyScript::Confirm(ConfirmKey::Primary) => format!("key code {}", KEY_CODE_RETURN),
        KeyScript::Confirm(ConfirmKey::Secondary) => format!("key code {}", KEY_CODE_TAB),
    };
    format!(r#"tell application "System Events" to {}"#, action)
}

/// Escape a string for use inside an AppleScript string literal.
pub fn escape_applescript(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out
}

#[async_trait]
impl AutomationBackend for SystemBackend {
    async fn write_clipboard(&self, text: &str) -> Result<()> {
        let text = text.to_string();
        let text_len = text.len();
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| VoxError::Clipboard(format!("clipboard unavailable: {}", e)))?;
            clipboard
                .set_text(text)
                .map_err(|e| VoxError::Clipboard(format!("failed to write clipboard: {}", e)))
        })
        .await
        .map_err(|e| VoxError::Clipboard(format!("clipboard task failed: {}", e)))??;

        debug!(text_len, "Clipboard written");
        Ok(())
    }

    async fn synthesize(&self, script: &KeyScript) -> Result<()> {
        let source = applescript(script);
        let mut child = Command::new(&self.osascript)
            .arg("-e")
            .arg(&source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| VoxError::Launch {
                program: self.osascript.display().to_string(),
                source,
            })?;

        match child.wait().await {
            Ok(status) => debug!(script = %script, exit = ?status.code(), "Key script exited"),
            Err(e) => warn!(script = %script, error = %e, "Lost track of key script"),
        }
        Ok(())
    }
}
