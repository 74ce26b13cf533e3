//! Off-policy bootstrap depth selection.
//!
//! Episodes in the replay buffer were generated by an older playout policy.
//! For hybrid positions the bootstrap horizon is drawn by rejection
//! sampling: the longest horizon `t` whose importance ratio
//!
//! ```text
//! Π_{i=current}^{t-1} policy_target[i][a_i] / Π_{i=current}^{t-1} playout[i][a_i]
//! ```
//!
//! beats `b * min(p_ratio_max, ratio_limit)` for a uniform `b` is accepted.
//! Stretches where the current policy has drifted away from the behavior
//! policy shorten the horizon.

use crate::core::{Result, TargetConfig, TargetError, TargetRng};

use super::episode::Episode;

/// Chooses how many plies ahead to bootstrap.
#[derive(Clone, Copy, Debug)]
pub struct TdStepSelector<'a> {
    episode: &'a Episode,
    config: &'a TargetConfig,
}

impl<'a> TdStepSelector<'a> {
    pub fn new(episode: &'a Episode, config: &'a TargetConfig) -> Self {
        Self { episode, config }
    }

    /// Select a bootstrap depth for `current_index` with horizon bound `horizon`.
    ///
    /// Returns the episode's fixed depth when off-policy correction is off or
    /// no behavior policy was recorded, and 0 for `current_index >= horizon`.
    /// Only the remaining case consumes a draw from `rng`.
    pub fn select(
        &self,
        current_index: usize,
        horizon: usize,
        rng: &mut TargetRng,
    ) -> Result<usize> {
        if !self.config.off_policy_correction || !self.episode.has_playout_policy() {
            return Ok(self.episode.td_steps);
        }
        if current_index >= horizon {
            return Ok(0);
        }
        let b = rng.uniform();
        self.select_with_draw(b, current_index, horizon)
    }

    /// Run the acceptance scan with an explicit draw `b` in `[0, 1)`.
    ///
    /// The result lies in `[0, horizon - current_index]`.
    pub fn select_with_draw(&self, b: f64, current_index: usize, horizon: usize) -> Result<usize> {
        if current_index >= horizon {
            return Ok(0);
        }

        let ratio_max = self.episode.p_ratio_max().min(self.config.off_policy_ratio_limit);
        let threshold = b * ratio_max;

        // prefix[k] = products over plies current_index..current_index + k
        let span = horizon - current_index;
        let mut p_base = Vec::with_capacity(span + 1);
        let mut p = Vec::with_capacity(span + 1);
        p_base.push(1.0_f64);
        p.push(1.0_f64);
        for i in current_index..horizon {
            p_base.push(p_base[p_base.len() - 1] * self.episode.playout_prob(i));
            p.push(p[p.len() - 1] * self.episode.target_prob(i));
        }

        for t in (current_index..=horizon).rev() {
            let k = t - current_index;
            let ratio = p[k] / p_base[k];
            if ratio > threshold {
                log::debug!(
                    "position {}: accepted bootstrap depth {} (ratio {:.4} > {:.4})",
                    current_index,
                    k,
                    ratio,
                    threshold
                );
                return Ok(k);
            }
        }

        log::warn!(
            "position {}: no bootstrap depth accepted (threshold {:.4}, ratio max {:.4})",
            current_index,
            threshold,
            ratio_max
        );
        Err(TargetError::NoSampleMatch {
            current_index,
            horizon,
        })
    }
}
