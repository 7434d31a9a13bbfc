//! In-memory minesweeper game engine.
//!
//! A [`Game`] owns a [`Board`] of [`Cell`]s and drives it through reveal and
//! flag moves until a mine is revealed (loss) or every non-mine cell is
//! accounted for (win). The crate is pure game logic: no storage, no
//! transport, no routing. An embedding system constructs a game fresh (or
//! rehydrates one from a [`GameSnapshot`]), applies moves, and reads back the
//! visible board and terminal flags for reporting or persistence.

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use snapshot::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod snapshot;
mod types;
