//! Delivery state machine with thread-safe transitions.
//!
//! A deliverer is either `Idle` or `Delivering`. Starting a delivery takes a
//! [`DeliveryGuard`]; dropping the guard returns the machine to `Idle`, so an
//! aborted plan never leaves the deliverer stuck.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use vox_core::error::{Result, VoxError};

/// Operational state of a deliverer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryState {
    /// Ready to accept a delivery.
    Idle,
    /// Driving the clipboard and keyboard for one call.
    Delivering,
}

impl fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryState::Idle => write!(f, "Idle"),
            DeliveryState::Delivering => write!(f, "Delivering"),
        }
    }
}

impl DeliveryState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &DeliveryState) -> bool {
        matches!(
            (self, target),
            (DeliveryState::Idle, DeliveryState::Delivering)
                | (DeliveryState::Delivering, DeliveryState::Idle)
        )
    }
}

/// Shared, validated delivery state.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: Arc<Mutex<DeliveryState>>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine initialized to `Idle`.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(DeliveryState::Idle)),
        }
    }

    /// Returns the current state.
    pub fn current(&self) -> DeliveryState {
        *self.lock()
    }

    /// Attempt to transition to the target state.
    pub fn transition(&self, target: DeliveryState) -> Result<()> {
        let mut state = self.lock();
        if state.can_transition_to(&target) {
            tracing::debug!("Delivery state: {} -> {}", *state, target);
            *state = target;
            Ok(())
        } else {
            Err(VoxError::InvalidTransition {
                from: state.to_string(),
                to: target.to_string(),
            })
        }
    }

    /// Enter `Delivering`, or fail with `DeliveryInFlight` if already there.
    pub fn begin(&self) -> Result<DeliveryGuard> {
        match self.transition(DeliveryState::Delivering) {
            Ok(()) => Ok(DeliveryGuard {
                machine: self.clone(),
            }),
            Err(_) => Err(VoxError::DeliveryInFlight),
        }
    }

    /// Force the state machine back to Idle.
    pub fn reset(&self) {
        let mut state = self.lock();
        if *state != DeliveryState::Idle {
            tracing::warn!("Delivery state machine reset to Idle from {}", *state);
        }
        *state = DeliveryState::Idle;
    }

    fn lock(&self) -> MutexGuard<'_, DeliveryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the machine in `Delivering` for as long as it lives.
#[derive(Debug)]
pub struct DeliveryGuard {
    machine: StateMachine,
}

impl Drop for DeliveryGuard {
    fn drop(&mut self) {
        if self.machine.transition(DeliveryState::Idle).is_err() {
            self.machine.reset();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
