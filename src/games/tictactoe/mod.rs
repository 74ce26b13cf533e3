//! Tic-tac-toe for exercising replay and target construction.
//!
//! - Two players alternate placing stones on a 3x3 board
//! - The move completing a line earns reward 1, every other move 0
//! - A full board without a line is a draw
//!
//! Action indices are cell indices (0-8, row-major).

mod game;

pub use game::{TicTacToe, CELLS};
