use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Coord2, GameError, Result};

/// Player-facing projection of a cell's hidden state.
///
/// Never stored; always recomputed from the cell's flags and its adjacent
/// mine count. Rendered as the literal tokens `"hidden"`, `"flag"`, `"mine"`
/// or the adjacent mine count `"0"`–`"8"`, which is the stable textual
/// contract an embedding API reproduces verbatim.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VisibleCellState {
    Hidden,
    Flagged,
    Mine,
    Empty(u8),
}

impl fmt::Display for VisibleCellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => f.write_str("hidden"),
            Self::Flagged => f.write_str("flag"),
            Self::Mine => f.write_str("mine"),
            Self::Empty(adjacent_mines) => write!(f, "{adjacent_mines}"),
        }
    }
}

impl FromStr for VisibleCellState {
    type Err = GameError;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "hidden" => Ok(Self::Hidden),
            "flag" => Ok(Self::Flagged),
            "mine" => Ok(Self::Mine),
            _ => match token.parse::<u8>() {
                Ok(adjacent_mines) if adjacent_mines <= 8 => Ok(Self::Empty(adjacent_mines)),
                _ => Err(GameError::InvalidBoardShape),
            },
        }
    }
}

impl Serialize for VisibleCellState {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VisibleCellState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("unknown cell token {token:?}")))
    }
}

/// One grid square; the atomic unit of mine/reveal/flag state.
///
/// The position is fixed at construction. `has_mine` is set once during
/// board generation; `is_revealed` only ever goes false to true; a cell is
/// never flagged and revealed at the same time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    position: Coord2,
    has_mine: bool,
    is_revealed: bool,
    is_flagged: bool,
}

impl Cell {
    pub fn new(position: Coord2) -> Self {
        Self {
            position,
            has_mine: false,
            is_revealed: false,
            is_flagged: false,
        }
    }

    /// Rehydration constructor: all flags supplied by the caller.
    pub fn with_state(position: Coord2, has_mine: bool, is_revealed: bool, is_flagged: bool) -> Self {
        Self {
            position,
            has_mine,
            is_revealed,
            is_flagged,
        }
    }

    pub fn position(&self) -> Coord2 {
        self.position
    }

    pub fn has_mine(&self) -> bool {
        self.has_mine
    }

    pub fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    pub fn is_flagged(&self) -> bool {
        self.is_flagged
    }

    pub(crate) fn place_mine(&mut self) {
        self.has_mine = true;
    }

    /// Reveals the cell and returns its now-current visible state.
    ///
    /// A flagged cell must be unflagged first; revealing it fails with
    /// [`GameError::FlaggedCell`] and leaves the cell untouched.
    pub fn reveal(&mut self, adjacent_mines: u8) -> Result<VisibleCellState> {
        if self.is_flagged {
            return Err(GameError::FlaggedCell);
        }
        self.is_revealed = true;
        Ok(self.visible_state(adjacent_mines))
    }

    /// Sets or clears the flag. Fails with [`GameError::AlreadyRevealed`]
    /// on a revealed cell; otherwise assigns unconditionally, so repeating
    /// the same value is idempotent.
    pub fn set_flag(&mut self, is_flagged: bool) -> Result<()> {
        if self.is_revealed {
            return Err(GameError::AlreadyRevealed);
        }
        self.is_flagged = is_flagged;
        Ok(())
    }

    pub fn visible_state(&self, adjacent_mines: u8) -> VisibleCellState {
        if self.is_revealed {
            if self.has_mine {
                VisibleCellState::Mine
            } else {
                VisibleCellState::Empty(adjacent_mines)
            }
        } else if self.is_flagged {
            VisibleCellState::Flagged
        } else {
            VisibleCellState::Hidden
        }
    }
}
