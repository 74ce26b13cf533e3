//! Replay re-analysis with a newer network.
//!
//! Hybrid targets bootstrap from the network's own root values. When the
//! network moves on, those values are refreshed by replaying the recorded
//! actions through a fresh game and running initial inference on every
//! position. The source episode is only borrowed; the refreshed episode is
//! a new value built from a fork.

use crate::core::{Result, TargetError};
use crate::nn::InitialInference;
use crate::rules::GameRules;

use super::episode::Episode;

/// Replay `episode` from `game` (the start position) and return a copy whose
/// `root_values_from_initial_inference` come from `network`.
///
/// One value is recorded per played position, before its action is applied.
/// Rewards are regenerated by the game; search statistics and flags are
/// carried over unchanged.
pub fn reanalyse_with_initial_inference<G, N>(
    episode: &Episode,
    mut game: G,
    network: &N,
) -> Result<Episode>
where
    G: GameRules,
    N: InitialInference + ?Sized,
{
    let mut replay = episode.fork_without_actions();

    for (ply, &action) in episode.actions.iter().enumerate() {
        let value = network.root_value(&game.observation());
        replay.root_values_from_initial_inference.push_back(value);

        if !game.is_legal(action) {
            log::warn!("replay diverged at ply {}: action {} is not legal", ply, action);
            return Err(TargetError::IllegalAction { ply, action });
        }
        let reward = game.apply_action(action);
        replay.apply(action, reward);
    }

    log::debug!(
        "re-analysed {} positions, squared value drift {:.6}",
        replay.len(),
        episode.squared_value_drift(&replay)
    );
    Ok(replay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::{TicTacToe, CELLS};
    use crate::nn::{ConstantValue, EncodedState};

    fn uniform() -> Vec<f32> {
        vec![1.0 / CELLS as f32; CELLS]
    }

    fn played(moves: &[usize]) -> Episode {
        let mut episode = Episode::new(0).with_hybrid(moves.len());
        let mut game = TicTacToe::new();
        for &action in moves {
            episode.record_search(uniform(), Some(uniform()), 0.0).unwrap();
            episode.root_values_from_initial_inference.push_back(0.0);
            let reward = game.apply_action(action);
            episode.apply(action, reward);
        }
        episode
    }

    #[test]
    fn test_fills_one_value_per_position() {
        let episode = played(&[0, 3, 1, 4, 2]);
        let network = ConstantValue(0.5);
        let refreshed =
            reanalyse_with_initial_inference(&episode, TicTacToe::new(), &network).unwrap();

        assert_eq!(refreshed.len(), 5);
        assert_eq!(refreshed.root_values_from_initial_inference.len(), 5);
        assert!(refreshed.root_values_from_initial_inference.iter().all(|&v| v == 0.5));
        assert_eq!(refreshed.rewards, episode.rewards);
        assert_eq!(refreshed.policy_targets, episode.policy_targets);
        assert!(refreshed.hybrid);

        // Source untouched
        assert!(episode.root_values_from_initial_inference.iter().all(|&v| v == 0.0));
        assert!((episode.squared_value_drift(&refreshed) - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_values_follow_positions() {
        let episode = played(&[4, 0, 8]);
        // Value = number of stones on the board.
        let network = |obs: &EncodedState| obs.tensor[..2 * CELLS].iter().sum::<f32>();
        let refreshed =
            reanalyse_with_initial_inference(&episode, TicTacToe::new(), &network).unwrap();

        let values: Vec<f32> = refreshed
            .root_values_from_initial_inference
            .iter()
            .copied()
            .collect();
        assert_eq!(values, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_illegal_action_is_reported() {
        let episode = Episode::new(0)
            .with_actions([4, 4])
            .with_rewards([0.0, 0.0])
            .with_policy_targets(vec![uniform(); 2]);
        let network = ConstantValue(0.0);
        let err =
            reanalyse_with_initial_inference(&episode, TicTacToe::new(), &network).unwrap_err();
        assert!(matches!(err, TargetError::IllegalAction { ply: 1, action: 4 }));
    }
}
