//! Delivery protocols.
//!
//! A protocol turns text (or segments) into a flat action plan: clipboard
//! writes, key scripts and settle pauses, in the exact order they must run.
//! The mention protocols share one shape and differ only in their
//! [`MentionStyle`].

use std::fmt;
use std::time::Duration;

use vox_core::config::PauseConfig;
use vox_core::types::{ProtocolKind, SegmentKind, TextSegment};

use crate::backend::{ConfirmKey, KeyScript};

/// One step of a delivery plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    WriteClipboard(String),
    Keys(KeyScript),
    Pause(Duration),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::WriteClipboard(text) => write!(f, "clipboard {:?}", text),
            Action::Keys(KeyScript::Type(text)) => write!(f, "type {:?}", text),
            Action::Keys(script) => write!(f, "{}", script),
            Action::Pause(d) => write!(f, "pause {}ms", d.as_millis()),
        }
    }
}

/// How a filename reaches the picker's filter box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameInput {
    /// Clipboard write plus paste chord.
    Paste,
    /// Live keystrokes; some pickers only filter on typed input.
    Keystrokes,
}

/// Per-editor customisation of the mention protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionStyle {
    pub trigger: char,
    pub filename_input: FilenameInput,
    pub confirm: ConfirmKey,
}

impl MentionStyle {
    pub const ENTER_CONFIRM: MentionStyle = MentionStyle {
        trigger: '@',
        filename_input: FilenameInput::Paste,
        confirm: ConfirmKey::Primary,
    };

    // Return submits the whole chat input in this editor, so the picker is
    // accepted with Tab.
    pub const TAB_CONFIRM: MentionStyle = MentionStyle {
        trigger: '#',
        filename_input: FilenameInput::Keystrokes,
        confirm: ConfirmKey::Secondary,
    };

    /// The style for a mention protocol, `None` for the generic one.
    pub fn for_protocol(kind: ProtocolKind) -> Option<MentionStyle> {
        match kind {
            ProtocolKind::GenericPaste => None,
            ProtocolKind::MentionWithEnterConfirm => Some(Self::ENTER_CONFIRM),
            ProtocolKind::MentionWithTabConfirm => Some(Self::TAB_CONFIRM),
        }
    }
}

/// Plan for the generic protocol over the whole, unsegmented text.
pub fn generic_plan(text: &str, auto_paste: bool, pauses: &PauseConfig) -> Vec<Action> {
    let mut plan = vec![Action::WriteClipboard(text.to_string())];
    if auto_paste {
        plan.push(Action::Pause(pauses.paste_settle()));
        plan.push(Action::Keys(KeyScript::PasteChord));
    }
    plan
}

/// Plan for a mention protocol over already-segmented text.
pub fn mention_plan(
    segments: &[TextSegment],
    style: MentionStyle,
    pauses: &PauseConfig,
) -> Vec<Action> {
    let mut plan = Vec::new();
    for segment in segments {
        match segment.kind {
            SegmentKind::PlainText => {
                if segment.value.is_empty() {
                    continue;
                }
                plan.push(Action::WriteClipboard(segment.value.clone()));
                plan.push(Action::Pause(pauses.paste_settle()));
                plan.push(Action::Keys(KeyScript::PasteChord));
                plan.push(Action::Pause(pauses.segment_settle()));
            }
            SegmentKind::FileReference => {
                plan.push(Action::Keys(KeyScript::Type(style.trigger.to_string())));
                plan.push(Action::Pause(pauses.picker_open()));
                match style.filename_input {
                    FilenameInput::Paste => {
                        plan.push(Action::WriteClipboard(segment.value.clone()));
                        plan.push(Action::Pause(pauses.paste_settle()));
                        plan.push(Action::Keys(KeyScript::PasteChord));
                    }
                    FilenameInput::Keystrokes => {
                        plan.push(Action::Keys(KeyScript::Type(segment.value.clone())));
                    }
                }
                plan.push(Action::Pause(pauses.picker_filter()));
                plan.push(Action::Keys(KeyScript::Confirm(style.confirm)));
                plan.push(Action::Pause(pauses.confirm_settle()));
            }
        }
    }
    plan
}

// =============================================================================
// Tests
// =============================================================================
