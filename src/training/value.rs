//! Bootstrap value resolution and discounted reward accumulation.

use super::episode::Episode;
use super::perspective::{offset, Perspective};

/// Computes n-step value targets for one episode.
#[derive(Clone, Copy, Debug)]
pub struct ValueResolver<'a> {
    episode: &'a Episode,
    perspective: Perspective,
}

impl<'a> ValueResolver<'a> {
    pub fn new(episode: &'a Episode, perspective: Perspective) -> Self {
        Self { episode, perspective }
    }

    /// Full n-step value: bootstrap anchor plus rewards up to it.
    pub fn n_step_value(&self, current_index: usize, td_steps: usize) -> f64 {
        let value = self.bootstrap_value(current_index, td_steps);
        self.add_rewards(current_index, td_steps, value)
    }

    /// Value anchor at `current_index + td_steps`, scaled by
    /// `discount^td_steps * perspective(td_steps)`.
    ///
    /// Past the recorded root values the position counts as terminal and
    /// contributes 0. In hybrid mode the anchor is the network-inferred root
    /// value, and it also contributes 0 once `current_index` runs past the
    /// inference record.
    pub fn bootstrap_value(&self, current_index: usize, td_steps: usize) -> f64 {
        let episode = self.episode;
        let bootstrap_index = current_index.saturating_add(td_steps);
        if bootstrap_index >= episode.root_value_targets.len() {
            return 0.0;
        }

        let anchor = if episode.hybrid {
            if current_index < episode.root_values_from_initial_inference.len() {
                episode.root_values_from_initial_inference.get(bootstrap_index).copied()
            } else {
                None
            }
        } else {
            episode.root_value_targets.get(bootstrap_index).copied()
        };

        match anchor {
            Some(v) => f64::from(v) * self.perspective.scale(td_steps, td_steps as i64),
            None => 0.0,
        }
    }

    /// Add discounted, perspective-adjusted rewards between `current_index`
    /// and the bootstrap index to `value`.
    ///
    /// Rewards are discounted by their absolute ply index. Once
    /// `current_index` is past the last reward, the final reward is folded
    /// in on its own: the game ended there and its outcome persists.
    pub fn add_rewards(&self, current_index: usize, td_steps: usize, mut value: f64) -> f64 {
        let rewards = &self.episode.rewards;
        let Some(last) = rewards.len().checked_sub(1) else {
            return value;
        };

        if current_index > last {
            value += self.terminal_reward_value(current_index);
        } else {
            let bootstrap_index = current_index.saturating_add(td_steps);
            for (i, reward) in rewards
                .iter()
                .enumerate()
                .take(bootstrap_index.min(rewards.len()))
                .skip(current_index)
            {
                value += f64::from(*reward) * self.perspective.scale(i, offset(i, current_index));
            }
        }
        value
    }

    /// Final reward seen from `current_index`, or 0 without rewards.
    pub fn terminal_reward_value(&self, current_index: usize) -> f64 {
        let rewards = &self.episode.rewards;
        match rewards.len().checked_sub(1) {
            Some(last) => {
                let scale = self.perspective.scale(last, offset(last, current_index));
                f64::from(rewards[last]) * scale
            }
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerMode;

    fn two_player(discount: f64) -> Perspective {
        Perspective::new(PlayerMode::TwoPlayers, discount)
    }

    #[test]
    fn test_alternating_rewards_sum() {
        let episode = Episode::new(3)
            .with_actions([0, 1, 0])
            .with_rewards([1.0, -1.0, 1.0])
            .with_policy_targets(vec![vec![1.0, 0.0]; 3]);
        let resolver = ValueResolver::new(&episode, two_player(1.0));

        // 1 - (-1) + 1, no root values so the anchor is 0
        assert_eq!(resolver.n_step_value(0, 3), 3.0);
    }

    #[test]
    fn test_bootstrap_from_search_values() {
        let episode = Episode::new(1)
            .with_actions([0, 1, 0])
            .with_rewards([0.0, 0.0, 1.0])
            .with_root_value_targets([0.2, 0.4, 0.8]);
        let resolver = ValueResolver::new(&episode, two_player(0.5));

        let v = resolver.bootstrap_value(0, 2);
        assert!((v - 0.8 * 0.25).abs() < 1e-6);

        let v = resolver.bootstrap_value(0, 1);
        assert!((v + 0.4 * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_bootstrap_past_root_values_is_zero() {
        let episode = Episode::new(5).with_root_value_targets([0.5, 0.5]);
        let resolver = ValueResolver::new(&episode, two_player(1.0));
        assert_eq!(resolver.bootstrap_value(0, 2), 0.0);
        assert_eq!(resolver.bootstrap_value(1, 5), 0.0);
    }

    #[test]
    fn test_hybrid_bootstrap_uses_inference() {
        let episode = Episode::new(1)
            .with_root_value_targets([0.1, 0.2, 0.3])
            .with_initial_inference_values([0.7, 0.6, 0.5])
            .with_hybrid(3);
        let resolver = ValueResolver::new(&episode, two_player(1.0));
        assert!((resolver.bootstrap_value(0, 2) - 0.5).abs() < 1e-6);
        assert!((resolver.bootstrap_value(1, 0) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_hybrid_bootstrap_with_exhausted_inference_is_zero() {
        let episode = Episode::new(0)
            .with_root_value_targets([0.1, 0.2, 0.3])
            .with_initial_inference_values([0.7])
            .with_hybrid(2);
        let resolver = ValueResolver::new(&episode, two_player(1.0));

        assert!((resolver.bootstrap_value(0, 0) - 0.7).abs() < 1e-6);
        // Inside the record by current_index but the anchor index is past it.
        assert_eq!(resolver.bootstrap_value(0, 2), 0.0);
        assert_eq!(resolver.bootstrap_value(1, 0), 0.0);
    }

    #[test]
    fn test_rewards_stop_at_bootstrap_index() {
        let episode = Episode::new(1).with_rewards([1.0, 1.0, 1.0]);
        let single = Perspective::new(PlayerMode::SinglePlayer, 1.0);
        let resolver = ValueResolver::new(&episode, single);
        assert_eq!(resolver.add_rewards(0, 2, 0.0), 2.0);
        assert_eq!(resolver.add_rewards(1, 0, 0.0), 0.0);
        assert_eq!(resolver.add_rewards(1, 10, 0.0), 2.0);
    }

    #[test]
    fn test_rewards_discounted_by_absolute_index() {
        let episode = Episode::new(1).with_rewards([0.0, 0.0, 1.0]);
        let single = Perspective::new(PlayerMode::SinglePlayer, 0.5);
        let resolver = ValueResolver::new(&episode, single);
        assert_eq!(resolver.add_rewards(2, 1, 0.0), 0.25);
    }

    #[test]
    fn test_terminal_reward_past_last_reward() {
        let episode = Episode::new(0).with_rewards([1.0]);
        let resolver = ValueResolver::new(&episode, two_player(1.0));

        assert_eq!(resolver.add_rewards(2, 0, 0.0), 1.0);
        assert_eq!(resolver.add_rewards(3, 0, 0.0), -1.0);
        assert_eq!(resolver.terminal_reward_value(1), -1.0);
    }

    #[test]
    fn test_no_rewards_adds_nothing() {
        let episode = Episode::new(0);
        let resolver = ValueResolver::new(&episode, two_player(1.0));
        assert_eq!(resolver.add_rewards(0, 3, 0.5), 0.5);
        assert_eq!(resolver.terminal_reward_value(4), 0.0);
    }
}
