//! Errors surfaced to the batch-assembly layer.
//!
//! Boundary cases (bootstrap or current index past the recorded data) are
//! not errors; the builder resolves them locally. Everything here means the
//! episode or the call cannot produce trustworthy targets, and the caller
//! should drop it or sample another episode.

use thiserror::Error;

/// Target construction errors.
#[derive(Error, Debug)]
pub enum TargetError {
    #[error("assertion violated: policy_targets.len() ({policy_targets}) != actions.len() ({actions})")]
    InvariantViolation { policy_targets: usize, actions: usize },

    #[error("{playout_policy} playout policies recorded for {plies} plies")]
    PlayoutMismatch { playout_policy: usize, plies: usize },

    #[error("no bootstrap horizon accepted for position {current_index} (horizon bound {horizon})")]
    NoSampleMatch { current_index: usize, horizon: usize },

    #[error("action {action} rejected while replaying ply {ply}")]
    IllegalAction { ply: usize, action: usize },

    #[error("failed to encode episode: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode episode: {0}")]
    Decode(#[source] bincode::Error),
}

pub type Result<T> = std::result::Result<T, TargetError>;
