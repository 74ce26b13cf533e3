//! Game capability interface.
//!
//! Games implement `GameRules` to define:
//! - Legal actions for each position
//! - How actions modify state
//! - Win/loss conditions and observations
//!
//! The training core calls into `GameRules` but never interprets
//! game-specific concepts directly.

pub mod engine;

pub use engine::{ActionList, GameResult, GameRules};
