//! Tic-tac-toe implementation.

use crate::nn::EncodedState;
use crate::rules::{ActionList, GameResult, GameRules};

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Number of cells, which is also the action space size.
pub const CELLS: usize = 9;

/// Tic-tac-toe position.
///
/// Cells are numbered row-major from the top left. Player 0 moves first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TicTacToe {
    /// Cell owners: `None` for empty, `Some(player)` otherwise.
    board: [Option<usize>; CELLS],
    to_play: usize,
    moves: usize,
}

impl TicTacToe {
    /// Empty board, player 0 to move.
    pub fn new() -> Self {
        Self::default()
    }

    /// Play a sequence of moves from the empty board.
    ///
    /// Returns `None` if any move is illegal.
    pub fn from_moves(moves: &[usize]) -> Option<Self> {
        let mut game = Self::new();
        for &action in moves {
            if !game.is_legal(action) {
                return None;
            }
            game.apply_action(action);
        }
        Some(game)
    }

    /// Owner of a cell.
    pub fn cell(&self, index: usize) -> Option<usize> {
        self.board.get(index).copied().flatten()
    }

    /// Number of moves played.
    pub fn moves(&self) -> usize {
        self.moves
    }

    fn winner(&self) -> Option<usize> {
        LINES.iter().find_map(|line| {
            let owner = self.board[line[0]]?;
            if line.iter().all(|&i| self.board[i] == Some(owner)) {
                Some(owner)
            } else {
                None
            }
        })
    }
}

impl GameRules for TicTacToe {
    fn action_space_size(&self) -> usize {
        CELLS
    }

    fn legal_actions(&self) -> ActionList {
        if self.is_terminal().is_some() {
            return ActionList::new();
        }
        (0..CELLS).filter(|&i| self.board[i].is_none()).collect()
    }

    fn apply_action(&mut self, action: usize) -> f32 {
        debug_assert!(self.board[action].is_none(), "Cell {} is occupied", action);

        self.board[action] = Some(self.to_play);
        self.moves += 1;

        let reward = if self.winner() == Some(self.to_play) { 1.0 } else { 0.0 };
        self.to_play = 1 - self.to_play;
        reward
    }

    fn is_terminal(&self) -> Option<GameResult> {
        if let Some(winner) = self.winner() {
            Some(GameResult::Winner(winner))
        } else if self.moves == CELLS {
            Some(GameResult::Draw)
        } else {
            None
        }
    }

    fn to_play(&self) -> usize {
        self.to_play
    }

    /// Three 3x3 planes: mover's stones, opponent's stones, and a constant
    /// plane marking whether player 0 is to move.
    fn observation(&self) -> EncodedState {
        let mut state = EncodedState::zeros(vec![3, 3, 3]);
        let tensor = &mut state.tensor;
        for (i, cell) in self.board.iter().enumerate() {
            match cell {
                Some(p) if *p == self.to_play => tensor[i] = 1.0,
                Some(_) => tensor[CELLS + i] = 1.0,
                None => {}
            }
        }
        if self.to_play == 0 {
            for v in &mut tensor[2 * CELLS..] {
                *v = 1.0;
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let game = TicTacToe::new();
        assert_eq!(game.to_play(), 0);
        assert_eq!(game.legal_actions().len(), CELLS);
        assert!(game.is_terminal().is_none());
        assert_eq!(game.action_space_size(), 9);
    }

    #[test]
    fn test_apply_alternates_players() {
        let mut game = TicTacToe::new();
        assert_eq!(game.apply_action(4), 0.0);
        assert_eq!(game.to_play(), 1);
        assert_eq!(game.cell(4), Some(0));
        assert!(!game.is_legal(4));
        assert_eq!(game.legal_actions().len(), 8);
    }

    #[test]
    fn test_winning_move_rewards_mover() {
        // X: 0, 1, 2 (top row); O: 3, 4
        let mut game = TicTacToe::from_moves(&[0, 3, 1, 4]).unwrap();
        assert_eq!(game.apply_action(2), 1.0);
        assert_eq!(game.is_terminal(), Some(GameResult::Winner(0)));
        assert!(game.legal_actions().is_empty());
    }

    #[test]
    fn test_draw() {
        // X O X / X O O / O X X
        let game = TicTacToe::from_moves(&[0, 1, 2, 4, 3, 5, 7, 6, 8]).unwrap();
        assert_eq!(game.is_terminal(), Some(GameResult::Draw));
    }

    #[test]
    fn test_from_moves_rejects_illegal() {
        assert!(TicTacToe::from_moves(&[0, 0]).is_none());
        assert!(TicTacToe::from_moves(&[0, 3, 1, 4, 2, 5]).is_none());
    }

    #[test]
    fn test_observation_planes() {
        let game = TicTacToe::from_moves(&[4]).unwrap();
        let obs = game.observation();

        assert_eq!(obs.shape, vec![3, 3, 3]);
        // Player 1 to move: the centre stone belongs to the opponent.
        assert_eq!(obs.get(4), Some(0.0));
        assert_eq!(obs.get(CELLS + 4), Some(1.0));
        assert!(obs.tensor[2 * CELLS..].iter().all(|&v| v == 0.0));
    }
}
