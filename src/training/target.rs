//! Per-ply training targets for an unroll window.
//!
//! For every ply in `state_index ..= state_index + num_unroll_steps` the
//! builder emits one [`Target`]:
//! - **value**: n-step return (bootstrap anchor plus discounted rewards), or
//!   the re-analysis shortcut
//! - **reward**: the reward that led into this ply
//! - **policy**: the recorded search policy, or zeros where the network
//!   should not be pushed towards any action

use serde::{Deserialize, Serialize};

use crate::core::{Result, TargetConfig, TargetRng};

use super::episode::Episode;
use super::perspective::Perspective;
use super::td_steps::TdStepSelector;
use super::value::ValueResolver;

/// Training labels for one unrolled ply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Value-head label.
    pub value: f32,

    /// Reward-head label.
    pub reward: f32,

    /// Policy-head label. All zeros means "no policy signal".
    pub policy: Vec<f32>,
}

impl Target {
    /// Whether this target carries policy supervision.
    pub fn has_policy(&self) -> bool {
        self.policy.iter().any(|&p| p != 0.0)
    }
}

/// How the episode is being turned into targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMode {
    /// Regular training on a (possibly off-policy) self-play episode.
    #[default]
    Fresh,
    /// Recomputing targets for an already played episode from its reward
    /// tail and recorded root values only.
    Reanalyse,
}

/// Builds targets from a borrowed episode.
#[derive(Clone, Debug)]
pub struct TargetBuilder<'a> {
    episode: &'a Episode,
    config: &'a TargetConfig,
    perspective: Perspective,
}

impl<'a> TargetBuilder<'a> {
    /// Create a builder, rejecting episodes that violate the record invariant.
    pub fn new(episode: &'a Episode, config: &'a TargetConfig) -> Result<Self> {
        episode.check_assumptions()?;
        Ok(Self {
            episode,
            config,
            perspective: Perspective::from_config(config),
        })
    }

    /// Targets for plies `state_index ..= state_index + num_unroll_steps`, in order.
    pub fn make_targets(
        &self,
        state_index: usize,
        num_unroll_steps: usize,
        mode: TargetMode,
        rng: &mut TargetRng,
    ) -> Result<Vec<Target>> {
        (state_index..=state_index.saturating_add(num_unroll_steps))
            .map(|current_index| self.make_target(current_index, mode, rng))
            .collect()
    }

    /// Target for a single ply.
    pub fn make_target(
        &self,
        current_index: usize,
        mode: TargetMode,
        rng: &mut TargetRng,
    ) -> Result<Target> {
        let episode = self.episode;
        let resolver = ValueResolver::new(episode, self.perspective);

        let mut td_steps = 0;
        let value = match mode {
            TargetMode::Reanalyse => {
                let past_last_reward = episode
                    .rewards
                    .len()
                    .checked_sub(1)
                    .is_some_and(|last| current_index > last);
                if !self.config.network_with_reward_head && past_last_reward {
                    resolver.terminal_reward_value(current_index)
                } else {
                    episode.root_value_targets.last().map_or(0.0, |&v| f64::from(v))
                }
            }
            TargetMode::Fresh => {
                td_steps = if episode.hybrid && current_index < episode.t_hybrid {
                    let horizon = episode.rewards.len().saturating_sub(1);
                    TdStepSelector::new(episode, self.config).select(current_index, horizon, rng)?
                } else {
                    episode.td_steps
                };
                resolver.n_step_value(current_index, td_steps)
            }
        };

        let withhold_policy =
            episode.hybrid && td_steps == 0 && !self.config.td_step0_policy_training;
        let policy = match episode.policy_targets.get(current_index) {
            Some(policy) if !withhold_policy => policy.clone(),
            // Recorded position with policy withheld, the terminal slot that
            // carries the final reward as value when there is no reward head,
            // or padding past the end of the episode.
            _ => self.zero_policy(),
        };

        Ok(Target {
            value: value as f32,
            reward: self.reward_label(current_index),
            policy,
        })
    }

    /// The reward that led into `current_index`.
    fn reward_label(&self, current_index: usize) -> f32 {
        let rewards = &self.episode.rewards;
        if current_index > 0 && current_index <= rewards.len() {
            rewards[current_index - 1]
        } else {
            0.0
        }
    }

    fn zero_policy(&self) -> Vec<f32> {
        vec![0.0; self.config.action_space_size]
    }
}

/// One window per `(episode, state_index)` sample, each drawing from its own
/// fork of `rng`.
///
/// Sample `i` always gets the `i`-th fork, so results match workers that
/// pre-fork the same way and build samples in any order. Samples fail
/// independently; the batch-assembly layer drops the failed ones.
pub fn make_batch_targets(
    samples: &[(&Episode, usize)],
    config: &TargetConfig,
    num_unroll_steps: usize,
    mode: TargetMode,
    rng: &mut TargetRng,
) -> Vec<Result<Vec<Target>>> {
    samples
        .iter()
        .map(|&(episode, state_index)| {
            let mut sample_rng = rng.fork();
            TargetBuilder::new(episode, config)?.make_targets(
                state_index,
                num_unroll_steps,
                mode,
                &mut sample_rng,
            )
        })
        .collect()
}
