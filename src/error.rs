use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("The board can not have more mines than cells")]
    TooManyMines,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("The game is over, no new moves are accepted")]
    GameOver,
    #[error("Can not reveal cell, it is flagged")]
    FlaggedCell,
    #[error("Can not flag cell, it is already revealed")]
    AlreadyRevealed,
}

pub type Result<T> = std::result::Result<T, GameError>;
