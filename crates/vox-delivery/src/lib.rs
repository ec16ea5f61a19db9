//! Vox Delivery crate - places dictated text into the focused application.
//!
//! Splits the final text around detected filenames, picks a delivery protocol
//! for the focused editor, and drives the clipboard and synthetic keyboard
//! through it. Two editor families get their filenames placed as mention
//! chips; everything else receives a single paste.

pub mod backend;
pub mod deliver;
pub mod platform;
pub mod protocol;
pub mod segmenter;
pub mod state;

pub use backend::{AutomationBackend, BackendCall, ConfirmKey, KeyScript, RecordingBackend};
pub use deliver::{select_protocol, Deliverer, DeliveryPlan};
pub use platform::SystemBackend;
pub use protocol::{Action, FilenameInput, MentionStyle};
pub use segmenter::{segment, ReferenceMatcher};
pub use state::DeliveryState;
