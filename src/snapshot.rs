use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{Board, Cell, Game, GameError, Result};

/// One cell of the full-board export.
///
/// `has_mine` is ground truth for the embedding system's persistence and
/// must not be shown to an end user except through the visible-state
/// projection. `adjacent_mine_count` is included on export and ignored on
/// import, where it is recomputed from the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub x: usize,
    pub y: usize,
    pub has_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    #[serde(default)]
    pub adjacent_mine_count: u8,
}

/// Full game export, sufficient to reconstruct the game byte-for-byte
/// observable state. The board is grouped column-major: `board[x][y]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub columns: usize,
    pub rows: usize,
    pub mines: usize,
    pub was_won: bool,
    pub was_lost: bool,
    pub board: Vec<Vec<CellSnapshot>>,
}

impl Game {
    pub fn to_snapshot(&self) -> GameSnapshot {
        let board = (0..self.columns())
            .map(|x| {
                (0..self.rows())
                    .map(|y| {
                        // (x, y) ranges over the board, lookup can not fail
                        let cell = self.board().cell((x, y)).expect("position is in bounds");
                        CellSnapshot {
                            x,
                            y,
                            has_mine: cell.has_mine(),
                            is_revealed: cell.is_revealed(),
                            is_flagged: cell.is_flagged(),
                            adjacent_mine_count: self.board().adjacent_mine_count((x, y)),
                        }
                    })
                    .collect()
            })
            .collect();
        GameSnapshot {
            columns: self.columns(),
            rows: self.rows(),
            mines: self.mines(),
            was_won: self.was_won(),
            was_lost: self.was_lost(),
            board,
        }
    }

    /// Rebuilds a game from a snapshot. Mine placement and cell state come
    /// from the snapshot as-is; the mine count is recounted from the cells
    /// and the terminal latches are taken from the snapshot unchanged.
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Result<Game> {
        if snapshot.board.len() != snapshot.columns {
            return Err(GameError::InvalidBoardShape);
        }

        let mut cells = Array2::from_shape_fn((snapshot.columns, snapshot.rows), |(x, y)| {
            Cell::new((x, y))
        });
        for (x, column) in snapshot.board.iter().enumerate() {
            if column.len() != snapshot.rows {
                return Err(GameError::InvalidBoardShape);
            }
            for (y, cell) in column.iter().enumerate() {
                if (cell.x, cell.y) != (x, y) {
                    return Err(GameError::InvalidBoardShape);
                }
                cells[(x, y)] =
                    Cell::with_state((x, y), cell.has_mine, cell.is_revealed, cell.is_flagged);
            }
        }

        let board = Board::from_cells(cells)?;
        if board.mine_count() != snapshot.mines {
            log::warn!(
                "Snapshot mine count mismatch, stored: {}, counted: {}",
                snapshot.mines,
                board.mine_count()
            );
        }
        Ok(Game::from_board(board, snapshot.was_won, snapshot.was_lost))
    }
}
