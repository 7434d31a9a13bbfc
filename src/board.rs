use ndarray::Array2;

use crate::{BoardGenerator, Cell, Coord2, GameError, NeighborIter, Result, VisibleCellState};

/// A `columns × rows` grid of [`Cell`]s, constructed once and never resized.
///
/// The board owns every cell; the mutual-adjacency relation is not stored as
/// references but recomputed on demand from bounds-checked offsets, which
/// keeps the cyclic neighbor graph out of the ownership picture entirely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: usize,
}

impl Board {
    /// Builds a fresh board with all cells hidden and mines placed by
    /// `generator`. Expects `mines <= columns * rows`; the engine checks
    /// this before calling.
    pub fn generate<G: BoardGenerator>(
        columns: usize,
        rows: usize,
        mines: usize,
        generator: G,
    ) -> Self {
        let mine_mask = generator.generate(columns, rows, mines);
        let cells = Array2::from_shape_fn((columns, rows), |(x, y)| {
            let mut cell = Cell::new((x, y));
            if mine_mask[(x, y)] {
                cell.place_mine();
            }
            cell
        });
        Self::from_populated_cells(cells)
    }

    /// Rehydration path: accepts an already-populated grid with mine, reveal
    /// and flag state set, and only validates its shape. Mine placement is
    /// never re-randomized; the mine count is recounted from the cells.
    pub fn from_cells(cells: Array2<Cell>) -> Result<Self> {
        for ((x, y), cell) in cells.indexed_iter() {
            if cell.position() != (x, y) {
                return Err(GameError::InvalidBoardShape);
            }
        }
        Ok(Self::from_populated_cells(cells))
    }

    /// Deterministic constructor for tests and fixtures: mines at exactly
    /// the given coordinates, everything else clear.
    pub fn with_mines(columns: usize, rows: usize, mine_coords: &[Coord2]) -> Result<Self> {
        let mut cells = Array2::from_shape_fn((columns, rows), |(x, y)| Cell::new((x, y)));
        for &(x, y) in mine_coords {
            if x >= columns || y >= rows {
                return Err(GameError::InvalidCoords);
            }
            cells[(x, y)].place_mine();
        }
        Ok(Self::from_populated_cells(cells))
    }

    fn from_populated_cells(cells: Array2<Cell>) -> Self {
        let mine_count = cells.iter().filter(|cell| cell.has_mine()).count();
        Self { cells, mine_count }
    }

    pub fn size(&self) -> Coord2 {
        self.cells.dim()
    }

    pub fn columns(&self) -> usize {
        self.size().0
    }

    pub fn rows(&self) -> usize {
        self.size().1
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (columns, rows) = self.size();
        if coords.0 < columns && coords.1 < rows {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&self.cells[coords])
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> Result<&mut Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&mut self.cells[coords])
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// Count of mined neighbors, recomputed on demand; bounded by 8.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self.cells[pos].has_mine())
            .count() as u8
    }

    pub fn visible_state(&self, coords: Coord2) -> Result<VisibleCellState> {
        let cell = self.cell(coords)?;
        Ok(cell.visible_state(self.adjacent_mine_count(coords)))
    }

    /// Visible projection of every cell, in `x`-major order.
    pub fn iter_visible(&self) -> impl Iterator<Item = (Coord2, VisibleCellState)> + '_ {
        self.cells
            .indexed_iter()
            .map(|(pos, cell)| (pos, cell.visible_state(self.adjacent_mine_count(pos))))
    }
}
