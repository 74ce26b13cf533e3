//! Target construction configuration.
//!
//! Callers load these values however they like (the types are serde
//! serializable) and hand a `TargetConfig` to the builder. Nothing here
//! reads files or environment variables.

use serde::{Deserialize, Serialize};

/// Whether value signs alternate between plies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerMode {
    /// Puzzles and other one-agent games. Perspective is always `+1`.
    SinglePlayer,
    /// Alternating-turn games. Values are expressed from the mover's side,
    /// so the sign flips every ply.
    #[default]
    TwoPlayers,
}

/// Configuration for building training targets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Per-ply discount factor, in `(0, 1]`.
    pub discount: f64,

    /// Perspective handling for value and reward terms.
    pub player_mode: PlayerMode,

    /// Size of the action space (length of every policy vector).
    pub action_space_size: usize,

    /// Enable importance-sampling horizon selection for hybrid positions.
    pub off_policy_correction: bool,

    /// Upper bound on the episode-level ratio normalizer.
    pub off_policy_ratio_limit: f64,

    /// True when the network predicts rewards itself. Board games usually
    /// run without a reward head, in which case the ply after the last move
    /// carries the terminal reward as its value.
    pub network_with_reward_head: bool,

    /// Keep the policy label on hybrid positions whose bootstrap depth is 0.
    pub td_step0_policy_training: bool,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            discount: 1.0,
            player_mode: PlayerMode::TwoPlayers,
            action_space_size: 9,
            off_policy_correction: false,
            off_policy_ratio_limit: 10.0,
            network_with_reward_head: false,
            td_step0_policy_training: false,
        }
    }
}

impl TargetConfig {
    /// Create a config for the given action space size.
    pub fn new(action_space_size: usize) -> Self {
        Self {
            action_space_size,
            ..Self::default()
        }
    }

    /// Set the discount factor.
    ///
    /// # Panics
    ///
    /// Panics unless `0 < discount <= 1`.
    #[must_use]
    pub fn with_discount(mut self, discount: f64) -> Self {
        assert!(
            discount > 0.0 && discount <= 1.0,
            "Discount must be in (0, 1]"
        );
        self.discount = discount;
        self
    }

    /// Set the player mode.
    #[must_use]
    pub fn with_player_mode(mut self, mode: PlayerMode) -> Self {
        self.player_mode = mode;
        self
    }

    /// Enable or disable off-policy correction.
    #[must_use]
    pub fn with_off_policy_correction(mut self, enabled: bool) -> Self {
        self.off_policy_correction = enabled;
        self
    }

    /// Set the ratio limit used to cap the episode normalizer.
    #[must_use]
    pub fn with_off_policy_ratio_limit(mut self, limit: f64) -> Self {
        self.off_policy_ratio_limit = limit;
        self
    }

    /// Declare whether the network has a reward head.
    #[must_use]
    pub fn with_reward_head(mut self, reward_head: bool) -> Self {
        self.network_with_reward_head = reward_head;
        self
    }

    /// Keep policy supervision at zero bootstrap depth in hybrid mode.
    #[must_use]
    pub fn with_td_step0_policy_training(mut self, enabled: bool) -> Self {
        self.td_step0_policy_training = enabled;
        self
    }
}
