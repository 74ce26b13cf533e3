//! Training target construction.
//!
//! This module turns recorded self-play episodes into per-ply
//! (value, reward, policy) labels for MuZero-style unrolled training.
//!
//! ## Overview
//!
//! - **Episode**: Actions, rewards, search statistics and flags of one game
//! - **Perspective**: Sign alternation and discount powers
//! - **TdStepSelector**: Off-policy bootstrap depth by rejection sampling
//! - **ValueResolver**: Bootstrap anchor plus discounted rewards
//! - **TargetBuilder**: One `Target` per ply of an unroll window
//! - **make_batch_targets**: Windows for many samples, one RNG fork each
//! - **reanalyse_with_initial_inference**: Refresh network root values
//!
//! ## Usage
//!
//! ```rust
//! use zero_targets::core::{TargetConfig, TargetRng};
//! use zero_targets::training::{Episode, TargetBuilder, TargetMode};
//!
//! let episode = Episode::new(2)
//!     .with_actions([0, 1, 0])
//!     .with_rewards([0.0, 0.0, 1.0])
//!     .with_policy_targets(vec![vec![0.5, 0.5]; 3])
//!     .with_root_value_targets([0.2, -0.4, 0.9]);
//!
//! let config = TargetConfig::new(2).with_discount(0.997);
//! let builder = TargetBuilder::new(&episode, &config)?;
//!
//! let mut rng = TargetRng::new(42);
//! let targets = builder.make_targets(0, 5, TargetMode::Fresh, &mut rng)?;
//! assert_eq!(targets.len(), 6);
//! # Ok::<(), zero_targets::core::TargetError>(())
//! ```

pub mod episode;
pub mod perspective;
pub mod ratio;
pub mod reanalyse;
pub mod target;
pub mod td_steps;
pub mod value;

// Re-export main types
pub use episode::Episode;
pub use perspective::Perspective;
pub use ratio::product_path_max;
pub use reanalyse::reanalyse_with_initial_inference;
pub use target::{make_batch_targets, Target, TargetBuilder, TargetMode};
pub use td_steps::TdStepSelector;
pub use value::ValueResolver;
