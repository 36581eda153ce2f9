//! Error types for parsing and solving positions

/// Errors raised while building or solving a position
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A move was not a decimal digit
    #[error("could not parse '{character}' as a valid move (move {index})")]
    InvalidCharacter { index: usize, character: char },

    /// A move named a column outside the board
    #[error("invalid move {index}: column {column} out of range, columns must be between 1 and {}", crate::WIDTH)]
    ColumnOutOfRange { index: usize, column: usize },

    /// A move was played into a full column
    #[error("invalid move {index}: column {column} full")]
    ColumnFull { index: usize, column: usize },

    /// A move ended the game, so the sequence is not an open position
    #[error("invalid move {index}: column {column} wins the game, sequences must not contain winning moves")]
    WinningMove { index: usize, column: usize },

    /// An input line held no move sequence
    #[error("line {line} contains no move sequence")]
    EmptyLine { line: usize },

    /// `negamax` was entered with `alpha >= beta`
    #[error("search window is empty: alpha {alpha} >= beta {beta}")]
    InvalidWindow { alpha: i32, beta: i32 },
}

impl Error {
    /// Returns true for malformed or illegal input, false for search invariant violations
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Error::InvalidWindow { .. })
    }
}

/// Result type for parsing and solving
pub type Result<T> = std::result::Result<T, Error>;
