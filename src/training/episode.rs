//! Episode record produced by self-play and consumed by the target builder.
//!
//! An episode records, per ply:
//! - The action actually played
//! - The reward the environment returned
//! - The search policy (supervised label and importance-sampling target)
//! - The playout policy actually used to sample the action (behavior policy)
//! - The search root value and, after re-analysis, the network's root value
//!
//! Per-ply sequences are persistent vectors, so forks and prefix copies
//! share structure with the source and never mutate it.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{Result, TargetError};

use super::ratio::product_path_max;

/// A single self-play episode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Action indices, one per ply played.
    pub actions: Vector<usize>,

    /// Rewards, one per ply. Board games without a reward head may record
    /// fewer entries; the last one then stands in for the terminal value.
    pub rewards: Vector<f32>,

    /// Search policies, one per ply (length = action space size).
    pub policy_targets: Vector<Vec<f32>>,

    /// Behavior policies used to sample each action. Empty means the
    /// episode needs no off-policy correction.
    pub playout_policy: Vector<Vec<f32>>,

    /// Search-derived root values, one per ply.
    pub root_value_targets: Vector<f32>,

    /// Root values from network initial inference (filled by re-analysis).
    pub root_values_from_initial_inference: Vector<f32>,

    /// Blend network-inferred values for positions before `t_hybrid`.
    pub hybrid: bool,

    /// Ply boundary for hybrid blending.
    pub t_hybrid: usize,

    /// Fixed bootstrap depth.
    pub td_steps: usize,
}

impl Episode {
    /// Create an empty episode with a fixed bootstrap depth.
    pub fn new(td_steps: usize) -> Self {
        Self {
            td_steps,
            ..Self::default()
        }
    }

    /// Set the played actions.
    #[must_use]
    pub fn with_actions(mut self, actions: impl IntoIterator<Item = usize>) -> Self {
        self.actions = actions.into_iter().collect();
        self
    }

    /// Set the recorded rewards.
    #[must_use]
    pub fn with_rewards(mut self, rewards: impl IntoIterator<Item = f32>) -> Self {
        self.rewards = rewards.into_iter().collect();
        self
    }

    /// Set the search policies.
    #[must_use]
    pub fn with_policy_targets(mut self, policies: impl IntoIterator<Item = Vec<f32>>) -> Self {
        self.policy_targets = policies.into_iter().collect();
        self
    }

    /// Set the behavior policies.
    #[must_use]
    pub fn with_playout_policy(mut self, policies: impl IntoIterator<Item = Vec<f32>>) -> Self {
        self.playout_policy = policies.into_iter().collect();
        self
    }

    /// Set the search root values.
    #[must_use]
    pub fn with_root_value_targets(mut self, values: impl IntoIterator<Item = f32>) -> Self {
        self.root_value_targets = values.into_iter().collect();
        self
    }

    /// Set the network-inferred root values.
    #[must_use]
    pub fn with_initial_inference_values(mut self, values: impl IntoIterator<Item = f32>) -> Self {
        self.root_values_from_initial_inference = values.into_iter().collect();
        self
    }

    /// Enable hybrid mode with the given boundary.
    #[must_use]
    pub fn with_hybrid(mut self, t_hybrid: usize) -> Self {
        self.hybrid = true;
        self.t_hybrid = t_hybrid;
        self
    }

    /// Number of plies played.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if no ply has been played.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Verify the record is consistent enough to build targets from.
    pub fn check_assumptions(&self) -> Result<()> {
        if self.policy_targets.len() != self.actions.len() {
            log::warn!(
                "episode rejected: {} policy targets for {} actions",
                self.policy_targets.len(),
                self.actions.len()
            );
            return Err(TargetError::InvariantViolation {
                policy_targets: self.policy_targets.len(),
                actions: self.actions.len(),
            });
        }
        if !self.playout_policy.is_empty() && self.playout_policy.len() != self.actions.len() {
            log::warn!(
                "episode rejected: {} playout policies for {} actions",
                self.playout_policy.len(),
                self.actions.len()
            );
            return Err(TargetError::PlayoutMismatch {
                playout_policy: self.playout_policy.len(),
                plies: self.actions.len(),
            });
        }
        Ok(())
    }

    /// Record a played ply.
    pub fn apply(&mut self, action: usize, reward: f32) {
        self.actions.push_back(action);
        self.rewards.push_back(reward);
    }

    /// Record the search statistics for the position about to be played.
    ///
    /// A behavior policy is either recorded for every ply or for none. Mixing
    /// is rejected before anything is appended, since a skipped slot would
    /// shift every later playout policy onto the wrong ply.
    pub fn record_search(
        &mut self,
        policy_target: Vec<f32>,
        playout_policy: Option<Vec<f32>>,
        root_value: f32,
    ) -> Result<()> {
        let plies = self.policy_targets.len();
        let consistent = match playout_policy {
            Some(_) => self.playout_policy.len() == plies,
            None => self.playout_policy.is_empty(),
        };
        if !consistent {
            return Err(TargetError::PlayoutMismatch {
                playout_policy: self.playout_policy.len(),
                plies,
            });
        }

        self.policy_targets.push_back(policy_target);
        if let Some(playout) = playout_policy {
            self.playout_policy.push_back(playout);
        }
        self.root_value_targets.push_back(root_value);
        Ok(())
    }

    /// The final recorded reward, if any.
    pub fn last_reward(&self) -> Option<f32> {
        self.rewards.last().copied()
    }

    /// Whether a behavior policy was recorded.
    pub fn has_playout_policy(&self) -> bool {
        !self.playout_policy.is_empty()
    }

    /// Search-policy probability of the action played at `ply`.
    pub fn target_prob(&self, ply: usize) -> f64 {
        taken_prob(&self.policy_targets, &self.actions, ply)
    }

    /// Behavior-policy probability of the action played at `ply`.
    pub fn playout_prob(&self, ply: usize) -> f64 {
        taken_prob(&self.playout_policy, &self.actions, ply)
    }

    /// Episode-level importance-ratio normalizer.
    ///
    /// Per ply, the ratio between search and behavior probability of the
    /// played action (1 without a behavior policy), reduced to the largest
    /// product over any contiguous run of plies.
    pub fn p_ratio_max(&self) -> f64 {
        let ratios: Vec<f64> = (0..self.actions.len())
            .map(|i| {
                if self.playout_policy.is_empty() {
                    1.0
                } else {
                    self.target_prob(i) / self.playout_prob(i)
                }
            })
            .collect();
        product_path_max(&ratios)
    }

    /// Copy keeping only the first `plies` entries of every per-ply record.
    #[must_use]
    pub fn truncated(&self, plies: usize) -> Self {
        Self {
            actions: prefix(&self.actions, plies),
            rewards: prefix(&self.rewards, plies),
            policy_targets: prefix(&self.policy_targets, plies),
            playout_policy: prefix(&self.playout_policy, plies),
            root_value_targets: prefix(&self.root_value_targets, plies),
            root_values_from_initial_inference: prefix(
                &self.root_values_from_initial_inference,
                plies,
            ),
            ..self.clone()
        }
    }

    /// Fork for replaying the episode through a fresh game.
    ///
    /// The fork has no action history, rewards, or inferred values. Search
    /// statistics and flags are kept, since replay only regenerates what the
    /// game and the network produce.
    #[must_use]
    pub fn fork_without_actions(&self) -> Self {
        Self {
            actions: Vector::new(),
            rewards: Vector::new(),
            root_values_from_initial_inference: Vector::new(),
            ..self.clone()
        }
    }

    /// Sum of squared differences between two episodes' inferred root values.
    pub fn squared_value_drift(&self, other: &Episode) -> f64 {
        self.root_values_from_initial_inference
            .iter()
            .zip(other.root_values_from_initial_inference.iter())
            .map(|(a, b)| {
                let d = f64::from(*a) - f64::from(*b);
                d * d
            })
            .sum()
    }

    /// Serialize to bytes for the replay store.
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(TargetError::Encode)
    }

    /// Deserialize from replay-store bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(TargetError::Decode)
    }
}

fn taken_prob(policies: &Vector<Vec<f32>>, actions: &Vector<usize>, ply: usize) -> f64 {
    match (policies.get(ply), actions.get(ply)) {
        (Some(policy), Some(&action)) => policy.get(action).map_or(0.0, |&p| f64::from(p)),
        _ => 0.0,
    }
}

fn prefix<T: Clone>(values: &Vector<T>, len: usize) -> Vector<T> {
    let mut out = values.clone();
    if len < out.len() {
        out.truncate(len);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played_episode() -> Episode {
        Episode::new(2)
            .with_actions([0, 1, 2])
            .with_rewards([0.0, 0.0, 1.0])
            .with_policy_targets([vec![0.5, 0.5, 0.0], vec![0.2, 0.8, 0.0], vec![0.0, 0.0, 1.0]])
            .with_playout_policy([vec![0.5, 0.5, 0.0], vec![0.4, 0.4, 0.2], vec![0.0, 0.5, 0.5]])
            .with_root_value_targets([0.1, 0.2, 0.3])
            .with_initial_inference_values([0.0, 0.5, 1.0])
    }

    #[test]
    fn test_check_assumptions() {
        assert!(played_episode().check_assumptions().is_ok());

        let broken = played_episode().with_policy_targets([vec![1.0, 0.0, 0.0]]);
        let err = broken.check_assumptions().unwrap_err();
        assert!(matches!(
            err,
            TargetError::InvariantViolation {
                policy_targets: 1,
                actions: 3
            }
        ));
    }

    #[test]
    fn test_apply_and_record() {
        let mut episode = Episode::new(1);
        assert!(episode.is_empty());
        assert_eq!(episode.last_reward(), None);

        episode.record_search(vec![1.0, 0.0], None, 0.3).unwrap();
        episode.apply(0, 0.5);

        assert_eq!(episode.len(), 1);
        assert_eq!(episode.last_reward(), Some(0.5));
        assert!(!episode.has_playout_policy());
        assert!(episode.check_assumptions().is_ok());
    }

    #[test]
    fn test_playout_length_checked() {
        let short = played_episode()
            .with_playout_policy([vec![0.5, 0.5, 0.0], vec![0.4, 0.4, 0.2]]);
        let err = short.check_assumptions().unwrap_err();
        assert!(matches!(
            err,
            TargetError::PlayoutMismatch {
                playout_policy: 2,
                plies: 3
            }
        ));
    }

    #[test]
    fn test_record_search_rejects_mixed_playout() {
        let mut episode = Episode::new(0);
        episode.record_search(vec![1.0, 0.0], None, 0.0).unwrap();
        episode.apply(0, 0.0);

        let err = episode
            .record_search(vec![0.0, 1.0], Some(vec![0.5, 0.5]), 0.0)
            .unwrap_err();
        assert!(matches!(
            err,
            TargetError::PlayoutMismatch {
                playout_policy: 0,
                plies: 1
            }
        ));
        // Nothing appended by the rejected call.
        assert_eq!(episode.policy_targets.len(), 1);
        assert_eq!(episode.root_value_targets.len(), 1);
        assert!(episode.check_assumptions().is_ok());

        let mut episode = Episode::new(0);
        episode.record_search(vec![1.0, 0.0], Some(vec![0.5, 0.5]), 0.0).unwrap();
        episode.apply(0, 0.0);
        assert!(episode.record_search(vec![1.0, 0.0], None, 0.0).is_err());
        assert_eq!(episode.policy_targets.len(), 1);
    }

    #[test]
    fn test_taken_probabilities() {
        let episode = played_episode();
        assert!((episode.target_prob(1) - 0.8).abs() < 1e-6);
        assert!((episode.playout_prob(1) - 0.4).abs() < 1e-6);
        assert_eq!(episode.target_prob(10), 0.0);
    }

    #[test]
    fn test_p_ratio_max_without_playout() {
        let episode = played_episode().with_playout_policy(Vec::<Vec<f32>>::new());
        assert_eq!(episode.p_ratio_max(), 1.0);
    }

    #[test]
    fn test_p_ratio_max_with_playout() {
        // ratios: 1.0, 2.0, 2.0 -> best run 4.0
        let episode = played_episode();
        assert!((episode.p_ratio_max() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_truncated_keeps_prefix() {
        let episode = played_episode();
        let short = episode.truncated(2);

        assert_eq!(short.len(), 2);
        assert_eq!(short.rewards.len(), 2);
        assert_eq!(short.policy_targets.len(), 2);
        assert_eq!(short.root_value_targets.len(), 2);
        assert_eq!(short.td_steps, 2);
        // Source untouched
        assert_eq!(episode.len(), 3);

        let same = episode.truncated(10);
        assert_eq!(same, episode);
    }

    #[test]
    fn test_fork_without_actions() {
        let episode = played_episode().with_hybrid(2);
        let fork = episode.fork_without_actions();

        assert!(fork.is_empty());
        assert!(fork.rewards.is_empty());
        assert!(fork.root_values_from_initial_inference.is_empty());
        assert_eq!(fork.policy_targets, episode.policy_targets);
        assert_eq!(fork.root_value_targets, episode.root_value_targets);
        assert!(fork.hybrid);
        assert_eq!(fork.t_hybrid, 2);

        // Source untouched
        assert_eq!(episode.len(), 3);
        assert_eq!(episode.root_values_from_initial_inference.len(), 3);
    }

    #[test]
    fn test_squared_value_drift() {
        let a = played_episode();
        let b = played_episode().with_initial_inference_values([1.0, 0.5]);
        assert!((a.squared_value_drift(&b) - 1.0).abs() < 1e-9);
        assert_eq!(a.squared_value_drift(&a), 0.0);
    }

    #[test]
    fn test_encode_decode() {
        let episode = played_episode().with_hybrid(1);
        let bytes = episode.encode().unwrap();
        let decoded = Episode::decode(&bytes).unwrap();
        assert_eq!(decoded, episode);
    }

    #[test]
    fn test_decode_garbage() {
        let err = Episode::decode(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, TargetError::Decode(_)));
    }
}
