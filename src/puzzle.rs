use std::collections::BTreeMap;
use std::fmt;

use log::trace;

use crate::config::OutOfBoundsPolicy;
use crate::error::{Error, Result};
use crate::solvability;

/// Direction the blank slides in. The tile it swaps with moves the opposite way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All moves, ordered by their discrete action id.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// `(row, col)` delta applied to the blank.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Move::Up => 0,
            Move::Down => 1,
            Move::Left => 2,
            Move::Right => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// An N×N sliding-tile board holding `1..=N²`, where `N²` is the blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Puzzle {
    size: usize,
    board: Vec<Vec<u32>>,
    blank_row: usize,
    blank_col: usize,
}

impl Puzzle {
    /// The solved board of the given side length.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidSize { size });
        }

        let mut board = Vec::with_capacity(size);
        let mut value = 1;
        for _ in 0..size {
            let mut row = Vec::with_capacity(size);
            for _ in 0..size {
                row.push(value);
                value += 1;
            }
            board.push(row);
        }

        Ok(Self {
            size,
            board,
            blank_row: size - 1,
            blank_col: size - 1,
        })
    }

    /// Builds a board from its row-major values. The side length is inferred
    /// and no solvability check is made.
    pub fn from_permutation(values: &[u32]) -> Result<Self> {
        let size = side_length(values.len())?;
        let mut puzzle = Self::new(size)?;
        puzzle.assign_permutation(values)?;
        Ok(puzzle)
    }

    /// Replaces the whole board with `values`, which must be a permutation of
    /// `1..=size²`. On error the board is left untouched.
    pub(crate) fn assign_permutation(&mut self, values: &[u32]) -> Result<()> {
        validate_permutation(values, self.size)?;
        self.install(values);
        Ok(())
    }

    /// Installs an already validated permutation of `1..=size²`, board and
    /// blank position together.
    pub(crate) fn install(&mut self, values: &[u32]) {
        let blank = self.blank_value();
        let mut blank_at = (0, 0);
        let board: Vec<Vec<u32>> = values
            .chunks(self.size)
            .enumerate()
            .map(|(i, row)| {
                if let Some(j) = row.iter().position(|&v| v == blank) {
                    blank_at = (i, j);
                }
                row.to_vec()
            })
            .collect();

        self.board = board;
        (self.blank_row, self.blank_col) = blank_at;
        debug_assert!(self.verify_blank().is_ok());
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn blank_value(&self) -> u32 {
        (self.size * self.size) as u32
    }

    /// `(row, col)` of the blank.
    pub fn blank(&self) -> (usize, usize) {
        (self.blank_row, self.blank_col)
    }

    pub fn grid(&self) -> &[Vec<u32>] {
        &self.board
    }

    /// Checks that the cached blank position really holds the blank.
    pub fn verify_blank(&self) -> Result<()> {
        let found = self.board[self.blank_row][self.blank_col];
        if found != self.blank_value() {
            return Err(Error::InvariantViolation {
                row: self.blank_row,
                col: self.blank_col,
                found,
            });
        }
        Ok(())
    }

    fn target(&self, movement: Move) -> Option<(usize, usize)> {
        let (dr, dc) = movement.as_offset();
        let new_row = self.blank_row.checked_add_signed(dr)?;
        let new_col = self.blank_col.checked_add_signed(dc)?;

        if new_row < self.size && new_col < self.size {
            Some((new_row, new_col))
        } else {
            None
        }
    }

    pub fn is_legal(&self, movement: Move) -> bool {
        self.target(movement).is_some()
    }

    /// Slides the blank. Returns whether the board changed; an out-of-bounds
    /// move is a no-op under [`OutOfBoundsPolicy::Ignore`] and an error under
    /// [`OutOfBoundsPolicy::Strict`].
    pub fn apply_move(&mut self, movement: Move, policy: OutOfBoundsPolicy) -> Result<bool> {
        let Some((new_row, new_col)) = self.target(movement) else {
            return match policy {
                OutOfBoundsPolicy::Ignore => Ok(false),
                OutOfBoundsPolicy::Strict => Err(Error::OutOfBounds {
                    action: movement,
                    row: self.blank_row,
                    col: self.blank_col,
                }),
            };
        };

        self.board[self.blank_row][self.blank_col] = self.board[new_row][new_col];
        self.board[new_row][new_col] = self.blank_value();
        self.blank_row = new_row;
        self.blank_col = new_col;

        trace!("{movement}: blank now at ({new_row}, {new_col})");
        debug_assert!(self.verify_blank().is_ok());
        Ok(true)
    }

    /// Non-mutating move. `None` when the blank would leave the board.
    pub fn try_move(&self, dir: Move) -> Option<Self> {
        let mut new_puzzle = self.clone();
        match new_puzzle.apply_move(dir, OutOfBoundsPolicy::Ignore) {
            Ok(true) => Some(new_puzzle),
            _ => None,
        }
    }

    /// Every legal move mapped to the board it produces. Illegal moves are absent.
    pub fn neighbors(&self) -> BTreeMap<Move, Puzzle> {
        Move::ALL
            .iter()
            .filter_map(|&dir| self.try_move(dir).map(|next| (dir, next)))
            .collect()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        Move::ALL
            .into_iter()
            .filter(|&dir| self.is_legal(dir))
            .collect()
    }

    /// True only for `1, 2, ..., N²` in row-major order.
    pub fn is_solved(&self) -> bool {
        self.board
            .iter()
            .flatten()
            .zip(1..)
            .all(|(&value, expected)| value == expected)
    }

    pub fn is_solvable(&self) -> bool {
        solvability::is_solvable(&self.to_permutation(), self.size)
    }

    /// Row-major values.
    pub fn to_permutation(&self) -> Vec<u32> {
        self.board.iter().flatten().copied().collect()
    }

    /// `N²` blocks of `N²` entries; block `i` has a 1 at `value - 1` for the
    /// tile at row-major position `i`.
    pub fn to_one_hot(&self) -> Vec<u8> {
        let cells = self.size * self.size;
        let mut encoded = vec![0; cells * cells];
        for (position, &value) in self.board.iter().flatten().enumerate() {
            encoded[position * cells + value as usize - 1] = 1;
        }
        encoded
    }

    /// Inverse of [`Puzzle::to_one_hot`].
    pub fn from_one_hot(size: usize, encoded: &[u8]) -> Result<Self> {
        let cells = size.checked_mul(size).unwrap_or(0);
        if cells == 0 || cells.checked_mul(cells) != Some(encoded.len()) {
            return Err(Error::InvalidPermutation {
                reason: format!(
                    "one-hot vector of length {} does not encode a {size}x{size} board",
                    encoded.len()
                ),
            });
        }

        let values = encoded
            .chunks(cells)
            .enumerate()
            .map(|(position, block)| {
                let mut hot = block.iter().enumerate().filter(|&(_, &bit)| bit != 0);
                match (hot.next(), hot.next()) {
                    (Some((offset, &1)), None) => Ok(offset as u32 + 1),
                    _ => Err(Error::InvalidPermutation {
                        reason: format!("block {position} is not one-hot"),
                    }),
                }
            })
            .collect::<Result<Vec<u32>>>()?;

        Self::from_permutation(&values)
    }

    /// Entry `v - 1` is the row-major index where tile `v` sits.
    pub fn tile_positions(&self) -> Vec<usize> {
        let mut locations = vec![0; self.size * self.size];
        for (index, &value) in self.board.iter().flatten().enumerate() {
            locations[value as usize - 1] = index;
        }
        locations
    }
}

fn side_length(len: usize) -> Result<usize> {
    let size = (len as f64).sqrt().round() as usize;
    if size == 0 || size * size != len {
        return Err(Error::InvalidPermutation {
            reason: format!("length {len} is not a positive perfect square"),
        });
    }
    Ok(size)
}

fn validate_permutation(values: &[u32], size: usize) -> Result<()> {
    let cells = size * size;
    if values.len() != cells {
        return Err(Error::InvalidPermutation {
            reason: format!("expected {cells} values, got {}", values.len()),
        });
    }

    let mut seen = vec![false; cells];
    for &value in values {
        if value == 0 || value as usize > cells {
            return Err(Error::InvalidPermutation {
                reason: format!("value {value} is outside 1..={cells}"),
            });
        }
        if std::mem::replace(&mut seen[value as usize - 1], true) {
            return Err(Error::InvalidPermutation {
                reason: format!("value {value} appears more than once"),
            });
        }
    }
    Ok(())
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blank = self.blank_value();
        let width = blank.to_string().len();
        for row in &self.board {
            for &val in row {
                if val == blank {
                    write!(f, "[{}]", "_".repeat(width))?;
                } else {
                    write!(f, "[{:>width$}]", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
