//! Common types for the tafl client: coordinates, sides, terminal status and
//! the errors shared across modules.

use core::fmt;

use crate::config::BOARD_SIZE;

/// A board coordinate. `row` is the first value of a server pair, `col` the
/// second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Build a coordinate, checking it lies on the board.
    pub fn try_new(row: usize, col: usize) -> Result<Self, BoardError> {
        if row >= BOARD_SIZE as usize || col >= BOARD_SIZE as usize {
            return Err(BoardError::OutOfBounds { row, col });
        }
        Ok(Self::new(row as u8, col as u8))
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn col(&self) -> usize {
        self.col as usize
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The two sides of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// Black, the besieging side. Moves first.
    Attackers,
    /// White, the king's side.
    Defenders,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Attackers => Side::Defenders,
            Side::Defenders => Side::Attackers,
        }
    }

    /// Side-to-move from the final character of a CHFEN string.
    pub fn from_marker(marker: char) -> Self {
        if marker == 'b' {
            Side::Attackers
        } else {
            Side::Defenders
        }
    }

    pub fn marker(self) -> char {
        match self {
            Side::Attackers => 'b',
            Side::Defenders => 'w',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Attackers => write!(f, "Attackers"),
            Side::Defenders => write!(f, "Defenders"),
        }
    }
}

/// Whether the game has concluded and who won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    #[default]
    InProgress,
    DefendersWon,
    AttackersWon,
}

impl GameStatus {
    /// Map the server's winner marker: `x` in progress, `w` defenders, `b` attackers.
    pub fn from_winner(marker: char) -> Option<Self> {
        match marker {
            'x' => Some(GameStatus::InProgress),
            'w' => Some(GameStatus::DefendersWon),
            'b' => Some(GameStatus::AttackersWon),
            _ => None,
        }
    }

    pub fn winner_marker(self) -> char {
        match self {
            GameStatus::InProgress => 'x',
            GameStatus::DefendersWon => 'w',
            GameStatus::AttackersWon => 'b',
        }
    }

    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::DefendersWon => Some(Side::Defenders),
            GameStatus::AttackersWon => Some(Side::Attackers),
        }
    }
}

/// Errors returned by coordinate construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Coordinate lies outside the 11×11 board.
    OutOfBounds { row: usize, col: usize },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::OutOfBounds { row, col } => {
                write!(f, "Coordinate ({}, {}) is off the board", row, col)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
