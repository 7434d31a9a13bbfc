use std::collections::VecDeque;

use crate::{
    Board, BoardGenerator, Coord2, GameError, RandomBoardGenerator, Result, VisibleCellState,
};

/// A single game from construction to its terminal state.
///
/// Owns the board and the two terminal latches. `was_won` and `was_lost`
/// start false, at most one ever becomes true, and neither ever resets;
/// once [`Game::is_over`] all mutators fail with [`GameError::GameOver`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    board: Board,
    columns: usize,
    rows: usize,
    mines: usize,
    was_won: bool,
    was_lost: bool,
}

impl Game {
    /// Starts a fresh game with entropy-seeded random mine placement.
    pub fn new(columns: usize, rows: usize, mines: usize) -> Result<Self> {
        Self::with_generator(columns, rows, mines, RandomBoardGenerator::from_entropy())
    }

    /// Starts a fresh game with an explicit placement strategy, which keeps
    /// construction deterministic under a seeded generator.
    pub fn with_generator<G: BoardGenerator>(
        columns: usize,
        rows: usize,
        mines: usize,
        generator: G,
    ) -> Result<Self> {
        if mines > columns.saturating_mul(rows) {
            return Err(GameError::TooManyMines);
        }
        let board = Board::generate(columns, rows, mines, generator);
        Ok(Self::from_board(board, false, false))
    }

    /// Wraps an existing board, deriving dimensions and mine count from it.
    ///
    /// The terminal latches are supplied by the caller and trusted as-is;
    /// the engine does not infer history from cell state, so an
    /// already-solved board handed in as "not over" is accepted.
    pub fn from_board(board: Board, was_won: bool, was_lost: bool) -> Self {
        let (columns, rows) = board.size();
        let mines = board.mine_count();
        Self {
            board,
            columns,
            rows,
            mines,
            was_won,
            was_lost,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn mines(&self) -> usize {
        self.mines
    }

    pub fn was_won(&self) -> bool {
        self.was_won
    }

    pub fn was_lost(&self) -> bool {
        self.was_lost
    }

    pub fn is_over(&self) -> bool {
        self.was_won || self.was_lost
    }

    /// Reveals the cell at `(x, y)`, spreading through contiguous
    /// zero-adjacent-mine cells until the fill hits a bordered region.
    ///
    /// Revealing a mine latches `was_lost` without visiting neighbors. A
    /// flagged cell reached by the fill aborts the whole call with
    /// [`GameError::FlaggedCell`]; reveals already applied by the same call
    /// stay committed. Revealing an already-revealed, unflagged cell is a
    /// harmless no-op returning its current visible state. Returns the
    /// visible state of the targeted cell, not of cells revealed
    /// transitively.
    pub fn reveal_cell_position(&mut self, x: usize, y: usize) -> Result<VisibleCellState> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let origin = self.board.validate_coords((x, y))?;

        if self.board.cell(origin)?.is_revealed() {
            return self.board.visible_state(origin);
        }

        let origin_state = self.reveal_single_cell(origin)?;

        if origin_state == VisibleCellState::Empty(0) {
            let mut to_visit: VecDeque<Coord2> = self.board.iter_neighbors(origin).collect();

            while let Some(coords) = to_visit.pop_front() {
                // already-revealed cells terminate the fill here, which is
                // what keeps the cyclic neighbor graph from looping
                if self.board.cell(coords)?.is_revealed() {
                    continue;
                }

                let state = self.reveal_single_cell(coords)?;
                if state == VisibleCellState::Empty(0) {
                    to_visit.extend(self.board.iter_neighbors(coords));
                }
            }
        }

        self.evaluate_win();
        Ok(origin_state)
    }

    /// Sets or clears the flag at `(x, y)`, then re-evaluates the win
    /// condition. Fails with [`GameError::AlreadyRevealed`] on a revealed
    /// cell and [`GameError::GameOver`] once the game ended.
    pub fn set_flag_on_cell_position(&mut self, x: usize, y: usize, is_flagged: bool) -> Result<()> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let coords = self.board.validate_coords((x, y))?;
        self.board.cell_mut(coords)?.set_flag(is_flagged)?;
        self.evaluate_win();
        Ok(())
    }

    /// The visible projection of the whole board, grouped column-major so
    /// that `visible_board()[x][y]` mirrors `(x, y)`.
    pub fn visible_board(&self) -> Vec<Vec<VisibleCellState>> {
        let mut columns = vec![Vec::with_capacity(self.rows); self.columns];
        for ((x, _), state) in self.board.iter_visible() {
            columns[x].push(state);
        }
        columns
    }

    fn reveal_single_cell(&mut self, coords: Coord2) -> Result<VisibleCellState> {
        let adjacent_mines = self.board.adjacent_mine_count(coords);
        let state = self.board.cell_mut(coords)?.reveal(adjacent_mines)?;
        log::trace!("Revealed cell at {:?}: {}", coords, state);
        if state == VisibleCellState::Mine {
            self.was_lost = true;
        }
        Ok(state)
    }

    /// The game is won when the visible board holds only empty cells and
    /// flags, and the flag count equals the mine count. Deliberately
    /// permissive: it does not check that flags sit on mines. Also
    /// deliberately not short-circuited by `was_lost`; a revealed mine
    /// simply fails the all-clear test.
    fn evaluate_win(&mut self) {
        let mut flag_count = 0;
        for (_, state) in self.board.iter_visible() {
            match state {
                VisibleCellState::Empty(_) => {}
                VisibleCellState::Flagged => flag_count += 1,
                VisibleCellState::Hidden | VisibleCellState::Mine => return,
            }
        }
        if flag_count == self.mines {
            log::debug!("Game won with {} flags on {} mines", flag_count, self.mines);
            self.was_won = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(columns: usize, rows: usize, mines: &[Coord2]) -> Game {
        Game::from_board(Board::with_mines(columns, rows, mines).unwrap(), false, false)
    }

    #[test]
    fn more_mines_than_cells_is_rejected() {
        assert_eq!(Game::new(10, 10, 101).unwrap_err(), GameError::TooManyMines);
        assert!(Game::new(10, 10, 100).is_ok());
    }

    #[test]
    fn fresh_game_is_fully_hidden_and_not_over() {
        let game = Game::new(4, 5, 3).unwrap();
        assert_eq!(game.columns(), 4);
        assert_eq!(game.rows(), 5);
        assert_eq!(game.mines(), 3);
        assert!(!game.is_over());
        for column in game.visible_board() {
            assert_eq!(column.len(), 5);
            for state in column {
                assert_eq!(state, VisibleCellState::Hidden);
            }
        }
    }

    #[test]
    fn revealing_a_mine_loses_the_game() {
        let mut game = game(2, 2, &[(0, 0)]);

        assert_eq!(
            game.reveal_cell_position(0, 0).unwrap(),
            VisibleCellState::Mine
        );
        assert!(game.was_lost());
        assert!(!game.was_won());
        assert!(game.is_over());

        assert_eq!(
            game.reveal_cell_position(1, 1).unwrap_err(),
            GameError::GameOver
        );
        assert_eq!(
            game.set_flag_on_cell_position(1, 1, true).unwrap_err(),
            GameError::GameOver
        );
    }

    #[test]
    fn flood_fill_saturates_a_mine_free_board_and_wins() {
        let mut game = game(5, 5, &[]);

        assert_eq!(
            game.reveal_cell_position(2, 2).unwrap(),
            VisibleCellState::Empty(0)
        );
        for column in game.visible_board() {
            for state in column {
                assert_eq!(state, VisibleCellState::Empty(0));
            }
        }
        assert!(game.was_won());
        assert!(!game.was_lost());
    }

    #[test]
    fn bordered_cell_does_not_propagate() {
        let mut game = game(3, 3, &[(0, 0)]);

        assert_eq!(
            game.reveal_cell_position(1, 1).unwrap(),
            VisibleCellState::Empty(1)
        );
        let board = game.visible_board();
        assert_eq!(board[1][1], VisibleCellState::Empty(1));
        assert_eq!(board[0][0], VisibleCellState::Hidden);
        assert_eq!(board[2][2], VisibleCellState::Hidden);
    }

    #[test]
    fn revealed_count_matches_adjacent_mines() {
        let mut game = game(3, 3, &[(0, 0), (2, 0)]);
        assert_eq!(
            game.reveal_cell_position(1, 0).unwrap(),
            VisibleCellState::Empty(2)
        );
    }

    #[test]
    fn flag_blocks_reveal_and_reveal_blocks_flag() {
        let mut game = game(3, 3, &[(0, 0)]);

        game.set_flag_on_cell_position(1, 1, true).unwrap();
        assert_eq!(
            game.reveal_cell_position(1, 1).unwrap_err(),
            GameError::FlaggedCell
        );

        game.reveal_cell_position(2, 2).unwrap();
        assert_eq!(
            game.set_flag_on_cell_position(2, 2, true).unwrap_err(),
            GameError::AlreadyRevealed
        );
        assert!(!game.is_over());
    }

    #[test]
    fn flagging_all_mines_and_revealing_the_rest_wins() {
        let mut game = game(2, 2, &[(0, 0)]);

        game.set_flag_on_cell_position(0, 0, true).unwrap();
        game.reveal_cell_position(1, 0).unwrap();
        game.reveal_cell_position(0, 1).unwrap();
        assert!(!game.was_won());
        game.reveal_cell_position(1, 1).unwrap();

        assert!(game.was_won());
        assert!(!game.was_lost());
    }

    #[test]
    fn misplaced_flag_with_a_hidden_mine_never_wins() {
        let mut game = game(2, 2, &[(0, 0)]);

        game.set_flag_on_cell_position(0, 1, true).unwrap();
        game.reveal_cell_position(1, 0).unwrap();
        game.reveal_cell_position(1, 1).unwrap();

        assert!(!game.was_won());
        assert!(!game.is_over());
    }

    #[test]
    fn flood_fill_aborts_on_flagged_cell_keeping_prior_reveals() {
        let mut game = game(5, 1, &[(4, 0)]);
        game.set_flag_on_cell_position(2, 0, true).unwrap();

        assert_eq!(
            game.reveal_cell_position(0, 0).unwrap_err(),
            GameError::FlaggedCell
        );

        // reveals applied before the abort stay committed
        let board = game.visible_board();
        assert_eq!(board[0][0], VisibleCellState::Empty(0));
        assert_eq!(board[1][0], VisibleCellState::Empty(0));
        assert_eq!(board[2][0], VisibleCellState::Flagged);
        assert_eq!(board[3][0], VisibleCellState::Hidden);
        assert!(!game.is_over());

        // the game stays playable to a win
        game.set_flag_on_cell_position(2, 0, false).unwrap();
        game.reveal_cell_position(2, 0).unwrap();
        assert!(!game.was_won());
        game.set_flag_on_cell_position(4, 0, true).unwrap();
        assert!(game.was_won());
    }

    #[test]
    fn redundant_reveal_is_a_harmless_no_op() {
        let mut game = game(3, 3, &[(0, 0)]);

        assert_eq!(
            game.reveal_cell_position(1, 1).unwrap(),
            VisibleCellState::Empty(1)
        );
        assert_eq!(
            game.reveal_cell_position(1, 1).unwrap(),
            VisibleCellState::Empty(1)
        );
        assert!(!game.is_over());
    }

    #[test]
    fn out_of_bounds_positions_are_rejected() {
        let mut game = game(2, 2, &[]);
        assert_eq!(
            game.reveal_cell_position(2, 0).unwrap_err(),
            GameError::InvalidCoords
        );
        assert_eq!(
            game.set_flag_on_cell_position(0, 2, true).unwrap_err(),
            GameError::InvalidCoords
        );
    }

    #[test]
    fn from_board_derives_counts_and_trusts_latches() {
        let board = Board::with_mines(3, 2, &[(0, 0), (2, 1)]).unwrap();
        let game = Game::from_board(board.clone(), false, false);
        assert_eq!(game.mines(), 2);
        assert_eq!((game.columns(), game.rows()), (3, 2));

        let mut finished = Game::from_board(board, true, false);
        assert!(finished.is_over());
        assert_eq!(
            finished.reveal_cell_position(1, 1).unwrap_err(),
            GameError::GameOver
        );
    }
}
