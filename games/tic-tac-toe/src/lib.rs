//! Tic-tac-toe for two bots on the botarena platform.
//!
//! Two modules are supported: the classic 3x3 board (three in a row) and
//! a 5x5 board where four in a row wins.

mod board;
mod game;

pub use board::{Board, Module, Outcome};
pub use game::{MoveRequest, TicTacToe};
