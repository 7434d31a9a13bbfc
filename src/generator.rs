use ndarray::Array2;

/// Mine-placement strategy, producing a `columns × rows` mine mask.
pub trait BoardGenerator {
    fn generate(self, columns: usize, rows: usize, mines: usize) -> Array2<bool>;
}

/// Purely random placement: `mines` distinct positions drawn uniformly
/// without replacement from the whole board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        use rand::RngExt;
        Self {
            seed: rand::rng().random(),
        }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, columns: usize, rows: usize, mines: usize) -> Array2<bool> {
        use rand::prelude::*;

        let total_cells = columns * rows;

        // optimize for full boards
        if mines >= total_cells {
            if mines > total_cells {
                log::warn!(
                    "Board already full, generated anyway, requested {} but only fits {}",
                    mines,
                    total_cells
                );
            }
            return Array2::from_elem((columns, rows), true);
        }

        let mut mask: Array2<bool> = Array2::default((columns, rows));
        let mut rng = SmallRng::seed_from_u64(self.seed);
        {
            let cells = mask.as_slice_mut().expect("layout should be standard");
            for index in rand::seq::index::sample(&mut rng, total_cells, mines) {
                cells[index] = true;
            }
        }

        log::debug!("Placed {} mines on a {}x{} board", mines, columns, rows);
        mask
    }
}
