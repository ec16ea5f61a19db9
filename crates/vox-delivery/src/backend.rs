//! Automation backend trait and the recording backend used in tests.
//!
//! The backend is the only thing that touches the operating system. It is
//! fire-and-forget: a call either fails to launch (error) or returns once the
//! underlying effector has finished, with no word on whether the focused
//! application actually reacted.

use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use vox_core::error::{Result, VoxError};

/// Key used to accept the highlighted entry in a mention picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmKey {
    /// Return.
    Primary,
    /// Tab, for targets that submit the whole input on Return.
    Secondary,
}

impl fmt::Display for ConfirmKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmKey::Primary => write!(f, "Return"),
            ConfirmKey::Secondary => write!(f, "Tab"),
        }
    }
}

/// One key-synthesis command handed to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyScript {
    /// The platform paste chord (Cmd+V).
    PasteChord,
    /// Type the given characters as individual keystrokes.
    Type(String),
    /// Press a confirm key.
    Confirm(ConfirmKey),
}

impl fmt::Display for KeyScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyScript::PasteChord => write!(f, "paste"),
            KeyScript::Type(text) => write!(f, "type {} chars", text.chars().count()),
            KeyScript::Confirm(key) => write!(f, "confirm {}", key),
        }
    }
}

/// Effector over the system clipboard and synthetic keyboard input.
#[async_trait]
pub trait AutomationBackend: Send + Sync {
    /// Replace the clipboard contents with `text`, returning once written.
    async fn write_clipboard(&self, text: &str) -> Result<()>;

    /// Launch a key-synthesis command and wait for it to exit.
    ///
    /// Errors only when the command cannot be launched. Exit status is not
    /// inspected: a script that runs and fails looks exactly like success.
    async fn synthesize(&self, script: &KeyScript) -> Result<()>;
}

#[async_trait]
impl<B: AutomationBackend + ?Sized> AutomationBackend for Arc<B> {
    async fn write_clipboard(&self, text: &str) -> Result<()> {
        (**self).write_clipboard(text).await
    }

    async fn synthesize(&self, script: &KeyScript) -> Result<()> {
        (**self).synthesize(script).await
    }
}

// =============================================================================
// Recording backend
// =============================================================================

/// A call observed by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Clipboard(String),
    Keys(KeyScript),
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<BackendCall>,
    attempts: usize,
}

/// Deterministic backend that records every call instead of touching the OS.
///
/// Clones share the same log, so a test can hand one clone to a deliverer and
/// inspect another afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    state: Arc<Mutex<RecordingState>>,
    fail_at: Option<usize>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a launch failure on the `attempt`-th call (zero based).
    ///
    /// The failing call is not recorded.
    pub fn with_launch_failure_at(mut self, attempt: usize) -> Self {
        self.fail_at = Some(attempt);
        self
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Recorded clipboard writes, in order.
    pub fn clipboard_writes(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::Clipboard(text) => Some(text.clone()),
                BackendCall::Keys(_) => None,
            })
            .collect()
    }

    /// Recorded key-synthesis commands, in order.
    pub fn key_scripts(&self) -> Vec<KeyScript> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::Keys(script) => Some(script.clone()),
                BackendCall::Clipboard(_) => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RecordingState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record(&self, call: BackendCall) -> Result<()> {
        let mut state = self.lock();
        let attempt = state.attempts;
        state.attempts += 1;
        if self.fail_at == Some(attempt) {
            return Err(VoxError::Launch {
                program: "recording-backend".to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("simulated launch failure on call {}", attempt),
                ),
            });
        }
        state.calls.push(call);
        Ok(())
    }
}

#[async_trait]
impl AutomationBackend for RecordingBackend {
    async fn write_clipboard(&self, text: &str) -> Result<()> {
        self.record(BackendCall::Clipboard(text.to_string()))
    }

    async fn synthesize(&self, script: &KeyScript) -> Result<()> {
        self.record(BackendCall::Keys(script.clone()))
    }
}
