//! Game capability trait.
//!
//! Games implement `GameRules` to define their rules:
//! - What actions are legal
//! - How actions modify state (and what reward they yield)
//! - Win/loss conditions
//! - How a position is presented to the network

use smallvec::SmallVec;

use crate::nn::EncodedState;

/// Legal action indices. Board games rarely exceed a few dozen, so the
/// common case stays on the stack.
pub type ActionList = SmallVec<[usize; 16]>;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner, by player index.
    Winner(usize),
    /// Draw (no winner).
    Draw,
}

/// Rules of a deterministic, perfect-information game.
///
/// Target construction never depends on a concrete game; replay
/// re-analysis drives games only through this trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: Return empty if the game is over
/// - `apply_action`: Only called with legal actions; must be deterministic
/// - `is_terminal`: Return None if game continues
pub trait GameRules {
    /// Number of distinct action indices.
    fn action_space_size(&self) -> usize;

    /// Legal action indices in the current position.
    fn legal_actions(&self) -> ActionList;

    /// Play `action` for the player to move and return the reward it earned.
    fn apply_action(&mut self, action: usize) -> f32;

    /// Check if the game is over.
    fn is_terminal(&self) -> Option<GameResult>;

    /// Index of the player to move.
    fn to_play(&self) -> usize;

    /// Network input for the current position, from the mover's view.
    fn observation(&self) -> EncodedState;

    /// Check whether `action` is legal in the current position.
    fn is_legal(&self, action: usize) -> bool {
        self.legal_actions().contains(&action)
    }
}

