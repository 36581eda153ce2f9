use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::{HEIGHT, WIDTH};

mod static_masks {
    use crate::{HEIGHT, WIDTH};

    pub const fn bottom_mask() -> u64 {
        let mut mask = 0;
        let mut column = 0;
        while column < WIDTH {
            mask |= 1 << (column * (HEIGHT + 1));
            column += 1;
        }
        mask
    }
    pub const fn full_board_mask() -> u64 {
        bottom_mask() * ((1 << HEIGHT as u64) - 1)
    }
}

/// Bit shifts between neighbouring cells: horizontal, both diagonals, vertical
const ALIGNMENT_SHIFTS: [usize; 4] = [HEIGHT + 1, HEIGHT, HEIGHT + 2, 1];

/// A Connect 4 position packed into two bitboards
///
/// Each column takes `HEIGHT + 1` bits, bottom cell first, with an always-empty
/// sentinel bit on top so that adding a column's bottom bit to the board mask
/// carries into the next free cell without spilling into the next column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    // mask of the tiles of the player to move
    current_player_mask: u64,
    // mask of all tiles
    board_mask: u64,
    moves: usize,
}

impl Position {
    pub fn new() -> Self {
        Self {
            current_player_mask: 0,
            board_mask: 0,
            moves: 0,
        }
    }

    /// Replays a sequence of 1-indexed columns, e.g. `"4453"`
    ///
    /// Fails on the first character that is not a column, names a full column,
    /// or would win the game.
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut position = Self::new();

        for (i, column_char) in moves.as_ref().chars().enumerate() {
            let index = i + 1;
            let column = match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => column - 1,
                Some(column) => return Err(Error::ColumnOutOfRange { index, column }),
                None => {
                    return Err(Error::InvalidCharacter {
                        index,
                        character: column_char,
                    })
                }
            };
            if !position.is_legal(column) {
                return Err(Error::ColumnFull {
                    index,
                    column: column + 1,
                });
            }
            if position.is_winning_move(column) {
                return Err(Error::WinningMove {
                    index,
                    column: column + 1,
                });
            }
            position.play(column);
        }
        Ok(position)
    }

    pub fn from_masks(current_player_mask: u64, board_mask: u64, moves: usize) -> Self {
        Self {
            current_player_mask,
            board_mask,
            moves,
        }
    }

    pub fn current_player_mask(&self) -> u64 {
        self.current_player_mask
    }

    pub fn board_mask(&self) -> u64 {
        self.board_mask
    }

    pub fn opponent_mask(&self) -> u64 {
        self.current_player_mask ^ self.board_mask
    }

    pub fn num_moves(&self) -> usize {
        self.moves
    }

    pub fn top_mask(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1) + (HEIGHT - 1))
    }

    pub fn bottom_mask(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1))
    }

    pub fn column_mask(column: usize) -> u64 {
        ((1 << HEIGHT) - 1) << (column * (HEIGHT + 1))
    }

    pub fn is_legal(&self, column: usize) -> bool {
        Self::top_mask(column) & self.board_mask == 0
    }

    /// Drops a tile for the player to move, who then becomes the opponent
    ///
    /// The column must be legal.
    pub fn play(&mut self, column: usize) {
        // the old opponent's tiles become the current player's tiles
        self.current_player_mask ^= self.board_mask;
        // the carry lands on the lowest free cell of the column
        self.board_mask |= self.board_mask + Self::bottom_mask(column);
        self.moves += 1;
    }

    pub fn is_winning_move(&self, column: usize) -> bool {
        let pos = self.current_player_mask
            | ((self.board_mask + Self::bottom_mask(column)) & Self::column_mask(column));
        Self::is_alignment(pos)
    }

    /// Checks a tile mask for four in a row in any direction
    pub fn is_alignment(pos: u64) -> bool {
        ALIGNMENT_SHIFTS.iter().any(|&shift| {
            // runs of 2
            let m = pos & (pos >> shift);
            // two runs of 2 back to back
            m & (m >> (2 * shift)) != 0
        })
    }

    /// Cells a tile can be dropped into right now, one per open column
    pub fn playable_cells(&self) -> u64 {
        (self.board_mask + static_masks::bottom_mask()) & static_masks::full_board_mask()
    }

    /// Empty cells, reachable or not, that would complete four in a row for the player to move
    pub fn winning_cells(&self) -> u64 {
        let player_mask = self.current_player_mask;

        // vertical: only the cell on top of a run of 3
        let mut r = (player_mask << 1) & (player_mask << 2) & (player_mask << 3);

        for &shift in &ALIGNMENT_SHIFTS[..3] {
            let mut p = (player_mask << shift) & (player_mask << (2 * shift));
            // right ends of 3-alignments
            r |= p & (player_mask << (3 * shift));
            // holes of the type O O _ O
            r |= p & (player_mask >> shift);

            p = (player_mask >> shift) & (player_mask >> (2 * shift));
            // left ends of 3-alignments
            r |= p & (player_mask >> (3 * shift));
            // holes of the type O _ O O
            r |= p & (player_mask << shift);
        }

        r & (static_masks::full_board_mask() ^ self.board_mask)
    }

    /// Key for the transposition table
    ///
    /// The board mask never reaches the sentinel row, so adding the player mask
    /// cannot carry between columns and the sum is unique per position.
    pub fn key(&self) -> u64 {
        self.current_player_mask + self.board_mask
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(moves: &str) -> Result<Self> {
        Self::from_moves(moves)
    }
}

/// Draws the board top row first: `X` for the player to move, `O` for the opponent
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..HEIGHT).rev() {
            for column in 0..WIDTH {
                let cell = Self::bottom_mask(column) << row;
                let c = if self.current_player_mask & cell != 0 {
                    'X'
                } else if self.board_mask & cell != 0 {
                    'O'
                } else {
                    '.'
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
