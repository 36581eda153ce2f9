//! An agent to solve positions of the game of Connect 4

use log::{debug, trace};

use crate::{error::*, position::*, transposition_table::*, HEIGHT, WIDTH};

use std::cmp::Ordering;

const BOARD_SIZE: i32 = (WIDTH * HEIGHT) as i32;

/// The minimum possible score of a position
pub const MIN_SCORE: i32 = -BOARD_SIZE / 2 + 3;
/// The maximum possible score of a postion
pub const MAX_SCORE: i32 = (BOARD_SIZE + 1) / 2 - 3;

/// Returns the columns ordered from the middle outwards, left before right,
/// as the middle columns are often better moves
pub const fn column_order() -> [usize; WIDTH] {
    let mut order = [0; WIDTH];
    let mut i = 0;
    while i < WIDTH {
        let offset = (1 - 2 * (i as i32 % 2)) * (i as i32 + 1) / 2;
        order[i] = (WIDTH as i32 / 2 + offset) as usize;
        i += 1;
    }
    order
}

/// How precisely `Solver::solve` pins down the score
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SolveMode {
    /// Find the exact score
    Exact,
    /// Only find out whether the position is won, drawn or lost
    Weak,
}

impl Default for SolveMode {
    fn default() -> Self {
        SolveMode::Exact
    }
}

/// An agent to solve Connect 4 positions
///
/// # Notes
/// This agent uses a classical game tree search to compute the score of a
/// position under perfect play. Each call to [`solve`] starts a fresh search
/// session: the node counter, transposition table and column order are reset,
/// so repeated calls give identical results.
///
/// # Position Scoring
/// Scores are from the point of view of the player to move. A win with that
/// player's final tile (their 21st on a 7x6 board) scores 1, and earlier wins
/// score higher, up to `(43 - moves) / 2` for a win on the very next tile.
/// Losses mirror this with negative scores. A draw scores 0.
///
/// [`solve`]: #method.solve
#[derive(Clone)]
pub struct Solver {
    position: Position,
    node_count: usize,
    transposition_table: TranspositionTable,
    column_order: [usize; WIDTH],
}

impl Solver {
    /// Creates a new `Solver` for a position
    pub fn new(position: Position) -> Self {
        Self {
            position,
            node_count: 0,
            transposition_table: TranspositionTable::new(),
            column_order: column_order(),
        }
    }

    /// The number of nodes searched by the last call to `solve`
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Performs game tree search
    ///
    /// Returns the score of the position (see [Position Scoring]) if it lies
    /// within `(alpha, beta)`, otherwise a bound on the side of the window the
    /// score lies on.
    ///
    /// [Position Scoring]: #position-scoring
    pub(crate) fn negamax(
        &mut self,
        position: Position,
        mut alpha: i32,
        mut beta: i32,
    ) -> Result<i32> {
        if alpha >= beta {
            return Err(Error::InvalidWindow { alpha, beta });
        }
        self.node_count += 1;

        // check for draw
        if position.num_moves() == WIDTH * HEIGHT {
            return Ok(0);
        }

        // check for next-move win for current player
        for column in 0..WIDTH {
            if position.is_legal(column) && position.is_winning_move(column) {
                return Ok((BOARD_SIZE + 1 - position.num_moves() as i32) / 2);
            }
        }

        // upper bound of score as we cannot win immediately
        let mut max = (BOARD_SIZE + 1 - position.num_moves() as i32) / 2;

        let key = position.key();
        let value = self.transposition_table.get(key);
        if value != 0 {
            max = value + MIN_SCORE - 1;
        }

        if beta > max {
            // clamp beta to calculated upper bound
            beta = max;
            // if the upper bound is lower than alpha, we can prune the exploration
            if alpha >= beta {
                return Ok(beta);
            }
        }

        for i in 0..WIDTH {
            let column = self.column_order[i];
            if !position.is_legal(column) {
                continue;
            }
            let mut next = position;
            next.play(column);
            // the search window is flipped for the other player
            let score = -self.negamax(next, -beta, -alpha)?;
            // only a lower bound is known here, which the table cannot hold
            if score >= beta {
                return Ok(score);
            }
            if score > alpha {
                alpha = score;
            }
        }

        // offset of one to prevent putting a 0, which represents an empty entry
        self.transposition_table.set(key, alpha - MIN_SCORE + 1);
        Ok(alpha)
    }

    /// Calculates the score of the position by narrowing a null window around it
    ///
    /// With [`SolveMode::Weak`] the search stops once the sign of the score is
    /// known, so only win, draw or loss is guaranteed.
    pub fn solve(&mut self, mode: SolveMode) -> Result<i32> {
        self.node_count = 0;
        self.transposition_table.clear();
        self.column_order = column_order();

        let moves = self.position.num_moves() as i32;
        let (mut min, mut max) = match mode {
            SolveMode::Exact => (-(BOARD_SIZE - moves) / 2, (BOARD_SIZE + 1 - moves) / 2),
            SolveMode::Weak => (-1, 1),
        };

        while min < max {
            let mut mid = min + (max - min) / 2;
            // keep the probe close to 0, where null-window searches are cheapest
            if mid <= 0 && min / 2 < mid {
                mid = min / 2;
            } else if mid >= 0 && max / 2 > mid {
                mid = max / 2;
            }
            trace!("probing score {} in [{}, {}]", mid, min, max);

            // r is not necessarily the exact score, but it tells us which
            // side of mid the score is on
            let r = self.negamax(self.position, mid, mid + 1)?;
            if r <= mid {
                max = r;
            } else {
                min = r;
            }
        }

        debug!(
            "solved with score {} after {} nodes, {} table entries",
            min,
            self.node_count,
            self.transposition_table.len()
        );
        Ok(min)
    }

    /// Converts a position score to the number of tiles the winning player
    /// still has to place, or the number of empty cells for a draw
    pub fn win_distance(&self, score: i32) -> usize {
        let moves = self.position.num_moves();
        let tiles_per_player = WIDTH * HEIGHT / 2;
        match score.cmp(&0) {
            Ordering::Equal => WIDTH * HEIGHT - moves,
            // the player to move has placed moves / 2 tiles
            Ordering::Greater => (tiles_per_player + 1)
                .saturating_sub(score as usize)
                .saturating_sub(moves / 2),
            // the opponent has placed (moves + 1) / 2 tiles
            Ordering::Less => (tiles_per_player + 1)
                .saturating_sub(score.unsigned_abs() as usize)
                .saturating_sub((moves + 1) / 2),
        }
    }
}

impl std::ops::Deref for Solver {
    type Target = Position;

    fn deref(&self) -> &Self::Target {
        &self.position
    }
}
