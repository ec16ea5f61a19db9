//! Protocol selection and the delivery entry point.
//!
//! `Deliverer::deliver` picks a protocol for the focused application, builds
//! the action plan and drives the backend through it one action at a time.
//! Nothing is retried and nothing is rolled back: the first launch failure
//! ends the call and whatever was already typed stays typed.

use uuid::Uuid;

use vox_core::config::{EditorConfig, PauseConfig, VoxConfig};
use vox_core::error::Result;
use vox_core::types::{DeliveryOptions, ProtocolKind};

use crate::backend::AutomationBackend;
use crate::protocol::{generic_plan, mention_plan, Action, MentionStyle};
use crate::segmenter::segment;
use crate::state::{DeliveryState, StateMachine};

/// Choose the protocol for a call.
///
/// Mention protocols need auto-paste, at least one file reference, and a
/// target that is a supported editor with tagging switched on. Everything
/// else goes through the generic protocol.
pub fn select_protocol(options: &DeliveryOptions, editors: &EditorConfig) -> ProtocolKind {
    if !options.auto_paste || options.file_references.is_empty() {
        return ProtocolKind::GenericPaste;
    }
    match options.target_app_id.as_deref() {
        Some(id) if id == editors.enter_confirm_app_id && editors.enter_confirm_tagging => {
            ProtocolKind::MentionWithEnterConfirm
        }
        Some(id) if id == editors.tab_confirm_app_id && editors.tab_confirm_tagging => {
            ProtocolKind::MentionWithTabConfirm
        }
        _ => ProtocolKind::GenericPaste,
    }
}

/// A fully resolved delivery: the protocol that will run and its actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryPlan {
    pub protocol: ProtocolKind,
    pub actions: Vec<Action>,
}

/// Delivers final text into the focused application.
pub struct Deliverer {
    backend: Box<dyn AutomationBackend>,
    editors: EditorConfig,
    pauses: PauseConfig,
    state: StateMachine,
}

impl std::fmt::Debug for Deliverer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deliverer")
            .field("editors", &self.editors)
            .field("pauses", &self.pauses)
            .field("state", &self.state)
            .finish()
    }
}

impl Deliverer {
    pub fn new(backend: impl AutomationBackend + 'static, config: &VoxConfig) -> Self {
        Self {
            backend: Box::new(backend),
            editors: config.editors.clone(),
            pauses: config.delivery.pauses.clone(),
            state: StateMachine::new(),
        }
    }

    /// Returns the current delivery state.
    pub fn state(&self) -> DeliveryState {
        self.state.current()
    }

    /// Build the plan for `text` without touching the backend.
    ///
    /// A mention protocol whose references never occur in the text falls back
    /// to the generic protocol, so the reported protocol is the one that runs.
    pub fn plan(&self, text: &str, options: &DeliveryOptions) -> DeliveryPlan {
        let selected = select_protocol(options, &self.editors);
        if let Some(style) = MentionStyle::for_protocol(selected) {
            let segments = segment(text, &options.file_references);
            if segments.iter().any(|s| s.is_file_reference()) {
                tracing::debug!(
                    protocol = %selected,
                    segments = segments.len(),
                    "Text segmented for mentions"
                );
                return DeliveryPlan {
                    protocol: selected,
                    actions: mention_plan(&segments, style, &self.pauses),
                };
            }
            tracing::debug!(
                protocol = %selected,
                "No references found in text, using generic paste"
            );
        }
        DeliveryPlan {
            protocol: ProtocolKind::GenericPaste,
            actions: generic_plan(text, options.auto_paste, &self.pauses),
        }
    }

    /// Deliver `text` according to `options`.
    ///
    /// Fails with `DeliveryInFlight` if another call on this deliverer has not
    /// finished, or with the backend's error if an action cannot be launched.
    pub async fn deliver(&self, text: &str, options: &DeliveryOptions) -> Result<()> {
        let _guard = self.state.begin()?;

        let delivery_id = Uuid::new_v4();
        let plan = self.plan(text, options);
        tracing::info!(
            %delivery_id,
            protocol = %plan.protocol,
            text_len = text.len(),
            references = options.file_references.len(),
            target_app = options.target_app_id.as_deref().unwrap_or("<none>"),
            actions = plan.actions.len(),
            "Delivery started"
        );

        self.execute(delivery_id, &plan.actions).await?;

        tracing::info!(%delivery_id, protocol = %plan.protocol, "Delivery finished");
        Ok(())
    }

    async fn execute(&self, delivery_id: Uuid, actions: &[Action]) -> Result<()> {
        for (step, action) in actions.iter().enumerate() {
            tracing::trace!(%delivery_id, step, action = %action, "Delivery step");
            let outcome = match action {
                Action::WriteClipboard(text) => self.backend.write_clipboard(text).await,
                Action::Keys(script) => self.backend.synthesize(script).await,
                Action::Pause(duration) => {
                    tokio::time::sleep(*duration).await;
                    Ok(())
                }
            };
            if let Err(e) = outcome {
                tracing::warn!(
                    %delivery_id,
                    step,
                    remaining = actions.len() - step - 1,
                    error = %e,
                    "Delivery aborted, target may hold partial text"
                );
                return Err(e);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
