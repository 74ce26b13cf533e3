//! Reference game implementations.

pub mod tictactoe;
