//! Core types: configuration, errors, and the seedable random source.
//!
//! Everything in here is game-agnostic. Games plug in through
//! `rules::GameRules`; the training core only sees these types and
//! `training::Episode`.

pub mod config;
pub mod error;
pub mod rng;

pub use config::{PlayerMode, TargetConfig};
pub use error::{Result, TargetError};
pub use rng::TargetRng;
