//! Checkpoint and resume functionality for state machines.
//!
//! A checkpoint is a serializable snapshot of a machine's current state and
//! history. Handlers are code and are not part of it: resuming pairs a
//! checkpoint with a specification again, and only succeeds when the
//! checkpoint could have been produced by a machine built from that
//! specification. Storing the encoded bytes is left to the caller.

use crate::core::{StateHistory, StateId};
use crate::machine::StateMachine;
use crate::spec::StateMachineSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a running machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Checkpoint<S: StateId> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Initial state of the specification the machine ran
    pub initial_state: S,

    /// Current state of the machine
    pub current_state: S,

    /// Transitions taken so far
    pub history: StateHistory<S>,
}

impl<S: StateId> Checkpoint<S> {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    /// Serialize to binary (bincode)
    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from binary (bincode)
    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }
}

impl<S: StateId> StateMachine<S> {
    /// Snapshot the machine's current state and history.
    pub fn checkpoint(&self) -> Checkpoint<S> {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            initial_state: self.spec().initial_state,
            current_state: self.current_state(),
            history: self.history().clone(),
        }
    }

    /// Recreate a machine from a checkpoint.
    ///
    /// The specification is validated first. The checkpoint must use the
    /// current format version, start from the specification's initial state,
    /// and rest in a state the specification knows. Its history is replayed
    /// against the specification: every record must follow a declared edge,
    /// pick up where the previous one left off, and the last one must end in
    /// the checkpoint's current state.
    pub fn resume(
        spec: impl Into<Arc<StateMachineSpec<S>>>,
        checkpoint: Checkpoint<S>,
    ) -> Result<Self, CheckpointError> {
        let spec = spec.into();
        spec.validate()
            .map_err(|e| CheckpointError::InvalidSpecification(e.to_string()))?;

        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: checkpoint.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        if checkpoint.initial_state != spec.initial_state {
            return Err(CheckpointError::ValidationFailed(format!(
                "checkpoint starts in state {} but the specification starts in state {}",
                checkpoint.initial_state, spec.initial_state
            )));
        }

        if !spec.has_handler(checkpoint.current_state) {
            return Err(CheckpointError::ValidationFailed(format!(
                "state {} is not part of the specification",
                checkpoint.current_state
            )));
        }

        verify_history(&spec, &checkpoint)?;

        debug!(
            checkpoint = %checkpoint.id,
            current = %checkpoint.current_state,
            "resuming state machine"
        );

        Ok(Self::from_parts(
            spec,
            checkpoint.current_state,
            checkpoint.history,
        ))
    }
}

/// Check that the recorded transitions form a walk the machine could have
/// taken from the initial state to the checkpoint's current state.
fn verify_history<S: StateId>(
    spec: &StateMachineSpec<S>,
    checkpoint: &Checkpoint<S>,
) -> Result<(), CheckpointError> {
    let mut at = spec.initial_state;

    for transition in checkpoint.history.transitions() {
        if transition.from != at {
            return Err(CheckpointError::ValidationFailed(format!(
                "history leaves state {} while the machine was in state {}",
                transition.from, at
            )));
        }
        if !spec.is_valid_transition(transition.from, transition.requested) {
            return Err(CheckpointError::ValidationFailed(format!(
                "history records undeclared transition from state {} to state {}",
                transition.from, transition.requested
            )));
        }
        at = transition.to;
    }

    if at != checkpoint.current_state {
        return Err(CheckpointError::ValidationFailed(format!(
            "history ends in state {} but the checkpoint is in state {}",
            at, checkpoint.current_state
        )));
    }

    Ok(())
}
