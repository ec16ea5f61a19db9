use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// The kind of a segment produced by the reference segmenter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Ordinary dictated text, pasted as-is.
    PlainText,
    /// A detected filename, placed through the editor's mention picker.
    FileReference,
}

/// The delivery protocol used for one call.
///
/// Closed set: one generic protocol and one per supported editor family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolKind {
    /// Clipboard write plus a single paste chord (or clipboard only).
    GenericPaste,
    /// `@` picker, filename pasted, accepted with the primary confirm key.
    MentionWithEnterConfirm,
    /// `#` picker, filename typed key by key, accepted with the secondary key.
    MentionWithTabConfirm,
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolKind::GenericPaste => write!(f, "generic_paste"),
            ProtocolKind::MentionWithEnterConfirm => write!(f, "mention_with_enter_confirm"),
            ProtocolKind::MentionWithTabConfirm => write!(f, "mention_with_tab_confirm"),
        }
    }
}

// =============================================================================
// Structs
// =============================================================================

/// Per-call delivery options supplied by the dictation pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOptions {
    /// When false, the text is only written to the clipboard.
    pub auto_paste: bool,
    /// Detected filenames, in detection order. Duplicates are allowed.
    #[serde(default)]
    pub file_references: Vec<String>,
    /// Identifier of the application focused when dictation began.
    #[serde(default)]
    pub target_app_id: Option<String>,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            auto_paste: true,
            file_references: Vec::new(),
            target_app_id: None,
        }
    }
}

impl DeliveryOptions {
    pub fn new(auto_paste: bool) -> Self {
        Self {
            auto_paste,
            ..Self::default()
        }
    }

    pub fn with_file_references<I, S>(mut self, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_references = refs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_target_app(mut self, app_id: impl Into<String>) -> Self {
        self.target_app_id = Some(app_id.into());
        self
    }

    /// Parse options in the camelCase JSON shape the dictation pipeline sends.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One piece of the final text, tagged with how it must be delivered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    pub kind: SegmentKind,
    pub value: String,
}

impl TextSegment {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::PlainText,
            value: value.into(),
        }
    }

    pub fn file_reference(value: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::FileReference,
            value: value.into(),
        }
    }

    pub fn is_file_reference(&self) -> bool {
        self.kind == SegmentKind::FileReference
    }
}
