//! The legal-destination payload: a bracketed list of `(x, y)` pairs such as
//! `"[(1, 2), (3, 4)]"`. Parsed into a [`TileSet`] at the API boundary and
//! validated rather than trusted.

use alloc::string::String;
use core::fmt::{self, Write};

use crate::bitboard::TileSet;
use crate::common::Coord;
use crate::config::BOARD_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordListError {
    /// Missing brackets, parentheses or commas. `at` is the byte offset.
    Malformed { at: usize },
    /// A pair component that is not a decimal integer.
    NotANumber { at: usize },
    /// A pair with a component off the board.
    OutOfRange { x: u64, y: u64 },
}

impl fmt::Display for CoordListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordListError::Malformed { at } => {
                write!(f, "malformed coordinate list at byte {}", at)
            }
            CoordListError::NotANumber { at } => {
                write!(f, "expected a number at byte {}", at)
            }
            CoordListError::OutOfRange { x, y } => {
                write!(f, "coordinate ({}, {}) is off the board", x, y)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CoordListError {}

/// Parse a destination list. `[]` is the empty set; duplicates collapse.
pub fn parse_coord_list(payload: &str) -> Result<TileSet, CoordListError> {
    let mut cursor = Cursor::new(payload);
    let mut set = TileSet::new();

    cursor.skip_ws();
    cursor.expect('[')?;
    cursor.skip_ws();
    if cursor.eat(']') {
        return cursor.finish().map(|_| set);
    }

    loop {
        cursor.expect('(')?;
        let x = cursor.number()?;
        cursor.expect(',')?;
        let y = cursor.number()?;
        cursor.expect(')')?;

        if x >= BOARD_SIZE as u64 || y >= BOARD_SIZE as u64 {
            return Err(CoordListError::OutOfRange { x, y });
        }
        // in range, so the insert cannot fail
        let _ = set.insert(Coord::new(x as u8, y as u8));

        cursor.skip_ws();
        if cursor.eat(']') {
            break;
        }
        cursor.expect(',')?;
        cursor.skip_ws();
    }
    cursor.finish().map(|_| set)
}

/// Render a set in the server's list format, row-major.
pub fn format_coord_list(set: &TileSet) -> String {
    let mut out = String::from("[");
    for (i, coord) in set.coords().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "({}, {})", coord.row, coord.col);
    }
    out.push(']');
    out
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn skip_ws(&mut self) {
        while self.bytes.get(self.pos).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.bytes.get(self.pos) == Some(&(ch as u8)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ch: char) -> Result<(), CoordListError> {
        self.skip_ws();
        if self.eat(ch) {
            Ok(())
        } else {
            Err(CoordListError::Malformed { at: self.pos })
        }
    }

    fn number(&mut self) -> Result<u64, CoordListError> {
        self.skip_ws();
        let start = self.pos;
        let mut value: u64 = 0;
        while let Some(b) = self.bytes.get(self.pos).filter(|b| b.is_ascii_digit()) {
            value = value.saturating_mul(10).saturating_add(u64::from(b - b'0'));
            self.pos += 1;
        }
        if self.pos == start {
            return Err(CoordListError::NotANumber { at: start });
        }
        Ok(value)
    }

    fn finish(&mut self) -> Result<(), CoordListError> {
        self.skip_ws();
        if self.pos == self.bytes.len() {
            Ok(())
        } else {
            Err(CoordListError::Malformed { at: self.pos })
        }
    }
}
