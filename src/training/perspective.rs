//! Perspective sign and discount powers.

use crate::core::{PlayerMode, TargetConfig};

/// Sign and discount applied to every value and reward term.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Perspective {
    mode: PlayerMode,
    discount: f64,
}

impl Perspective {
    pub fn new(mode: PlayerMode, discount: f64) -> Self {
        Self { mode, discount }
    }

    pub fn from_config(config: &TargetConfig) -> Self {
        Self::new(config.player_mode, config.discount)
    }

    /// `(-1)^delta` in two-player games, `+1` otherwise.
    ///
    /// Negative offsets follow the same parity.
    pub fn sign(&self, delta: i64) -> f64 {
        match self.mode {
            PlayerMode::SinglePlayer => 1.0,
            PlayerMode::TwoPlayers => {
                if delta.rem_euclid(2) == 0 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }

    /// `discount^steps`.
    pub fn discount_pow(&self, steps: usize) -> f64 {
        self.discount.powi(steps as i32)
    }

    /// `discount^steps * sign(delta)`.
    pub fn scale(&self, steps: usize, delta: i64) -> f64 {
        self.discount_pow(steps) * self.sign(delta)
    }
}

/// Signed distance `to - from` between two ply indices.
///
/// Wraps instead of overflowing; only its parity feeds `sign`.
pub(crate) fn offset(to: usize, from: usize) -> i64 {
    (to as i64).wrapping_sub(from as i64)
}
