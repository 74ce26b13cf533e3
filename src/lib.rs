//! # zero-targets
//!
//! Training-target construction for MuZero-style self-play on
//! deterministic, perfect-information board games.
//!
//! ## Design Principles
//!
//! 1. **Pure per-episode computation**: The builder borrows an episode
//!    read-only and returns fresh `Target` values. Many episodes can be
//!    processed on independent threads without synchronization.
//!
//! 2. **Explicit randomness**: Off-policy horizon sampling draws from a
//!    caller-owned, seedable `TargetRng`, never from a global generator.
//!
//! 3. **Errors, not repairs**: Inconsistent episodes and exhausted
//!    acceptance scans surface as `TargetError` so the batch-assembly layer
//!    can drop the episode. Boundary plies are handled by fallbacks.
//!
//! ## Architecture
//!
//! - **Variable-depth TD targets**: Value labels blend a bootstrap anchor
//!   (search or network root value) with discounted, perspective-adjusted
//!   rewards.
//!
//! - **Off-policy correction**: Hybrid positions choose their bootstrap depth
//!   by rejection sampling on the ratio between search and playout policy.
//!
//! - **Persistent Data Structures**: Episode forks and prefix copies share
//!   structure via `im-rs`.
//!
//! ## Modules
//!
//! - `core`: Configuration, errors, RNG
//! - `training`: Episodes, TD-step selection, value resolution, targets,
//!   re-analysis
//! - `rules`: GameRules capability trait for game implementations
//! - `games`: Reference games
//! - `nn`: Network boundary (observations, initial inference)

pub mod core;
pub mod games;
pub mod nn;
pub mod rules;
pub mod training;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{PlayerMode, Result, TargetConfig, TargetError, TargetRng};

pub use crate::training::{
    make_batch_targets, product_path_max, reanalyse_with_initial_inference, Episode, Perspective,
    Target, TargetBuilder, TargetMode, TdStepSelector, ValueResolver,
};

pub use crate::rules::{ActionList, GameResult, GameRules};

pub use crate::nn::{ConstantValue, EncodedState, ErrorCapture, FallibleInference, InitialInference};
