//! CHFEN: the compact board notation sent by the game server.
//!
//! A CHFEN string is eleven rows joined by `/`, followed by a four character
//! status suffix. Rows mix piece markers (`b` attacker, `w` defender,
//! `k` king) with run-length tokens for empty cells: a decimal count
//! `1`..=`11`, or the letters `A` (10) and `B` (11). The suffix is a
//! separator, the white and black bot markers, and the side to move:
//!
//! ```text
//! 3bbbbb3/5b5/B/b4w4b/b3www3b/bb1wwkww1bb/b3www3b/b4w4b/B/5b5/3bbbbb3/ppb
//! ```

use alloc::string::String;
use core::fmt::{self, Write};
use core::iter::Peekable;
use core::str::Chars;

use crate::common::Side;
use crate::config::{
    ATTACKER_MARKER, BOARD_SIZE, DEFENDER_MARKER, KING_MARKER, ROW_SEPARATOR, RUN_ELEVEN,
    RUN_TEN, SUFFIX_LEN,
};
use crate::grid::{Cell, Grid};

const N: usize = BOARD_SIZE as usize;

/// Canonical opening position, attackers to move, no bots.
pub const START_POSITION: &str =
    "3bbbbb3/5b5/B/b4w4b/b3www3b/bb1wwkww1bb/b3www3b/b4w4b/B/5b5/3bbbbb3/ppb";

/// Errors produced by [`decode`]. Rows and columns are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer characters than the status suffix needs.
    TooShort { len: usize },
    /// The board part does not hold exactly eleven rows.
    RowCount { found: usize },
    /// A run-length count outside 1..=11.
    BadRunLength { row: usize, col: usize, value: u32 },
    /// A character that is neither a marker nor a run-length token.
    UnexpectedChar { row: usize, col: usize, ch: char },
    /// The row describes more than eleven cells; `col` is the first cell past the edge.
    RowOverflow { row: usize, col: usize },
    /// The row describes fewer than eleven cells.
    RowUnderflow { row: usize, width: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::TooShort { len } => {
                write!(f, "notation of {} characters has no status suffix", len)
            }
            DecodeError::RowCount { found } => {
                write!(f, "expected {} rows, found {}", N, found)
            }
            DecodeError::BadRunLength { row, col, value } => {
                write!(f, "row {} col {}: run length {} is outside 1..={}", row, col, value, N)
            }
            DecodeError::UnexpectedChar { row, col, ch } => {
                write!(f, "row {} col {}: unexpected character {:?}", row, col, ch)
            }
            DecodeError::RowOverflow { row, col } => {
                write!(f, "row {} col {}: row is wider than {} cells", row, col, N)
            }
            DecodeError::RowUnderflow { row, width } => {
                write!(f, "row {}: only {} of {} cells described", row, width, N)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// The trailing status field of a CHFEN string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusSuffix {
    reserved: [char; 3],
    side_to_move: Side,
}

impl StatusSuffix {
    /// Suffix for a human-vs-human game with `side` to move.
    pub fn new(side: Side) -> Self {
        Self {
            reserved: [ROW_SEPARATOR, 'p', 'p'],
            side_to_move: side,
        }
    }

    pub fn with_bots(side: Side, white_bot: bool, black_bot: bool) -> Self {
        let marker = |bot: bool| if bot { 'b' } else { 'p' };
        Self {
            reserved: [ROW_SEPARATOR, marker(white_bot), marker(black_bot)],
            side_to_move: side,
        }
    }

    fn from_chars(chars: [char; SUFFIX_LEN]) -> Self {
        Self {
            reserved: [chars[0], chars[1], chars[2]],
            side_to_move: Side::from_marker(chars[3]),
        }
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// `Some(true)` if the server drives white, `None` if the marker is unknown.
    pub fn white_bot(&self) -> Option<bool> {
        bot_marker(self.reserved[1])
    }

    pub fn black_bot(&self) -> Option<bool> {
        bot_marker(self.reserved[2])
    }
}

impl fmt::Display for StatusSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.reserved {
            write!(f, "{}", ch)?;
        }
        write!(f, "{}", self.side_to_move.marker())
    }
}

fn bot_marker(ch: char) -> Option<bool> {
    match ch {
        'b' => Some(true),
        'p' => Some(false),
        _ => None,
    }
}

/// A decoded notation string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedPosition {
    pub grid: Grid,
    pub suffix: StatusSuffix,
}

impl DecodedPosition {
    pub fn turn(&self) -> Side {
        self.suffix.side_to_move()
    }
}

/// Decode a notation string, rejecting anything that does not describe
/// exactly eleven rows of eleven cells.
pub fn decode(notation: &str) -> Result<DecodedPosition, DecodeError> {
    let (board, suffix) = split_suffix(notation)?;

    let found = board.split(ROW_SEPARATOR).count();
    if found != N {
        return Err(DecodeError::RowCount { found });
    }

    let mut grid = Grid::new();
    for (row, text) in board.split(ROW_SEPARATOR).enumerate() {
        let mut col = 0usize;
        for token in Tokens::new(text) {
            match token {
                Token::Piece(cell) => {
                    if col >= N {
                        return Err(DecodeError::RowOverflow { row, col });
                    }
                    grid.set(row, col, cell);
                    col += 1;
                }
                Token::Run(value) => {
                    if value == 0 || value as usize > N {
                        return Err(DecodeError::BadRunLength { row, col, value });
                    }
                    if col + value as usize > N {
                        return Err(DecodeError::RowOverflow { row, col: N });
                    }
                    col += value as usize;
                }
                Token::Other(ch) => return Err(DecodeError::UnexpectedChar { row, col, ch }),
                // split() already consumed separators
                Token::Separator => {}
            }
        }
        if col < N {
            return Err(DecodeError::RowUnderflow { row, width: col });
        }
    }

    Ok(DecodedPosition {
        grid,
        suffix: StatusSuffix::from_chars(suffix),
    })
}

/// Decode without validation, the way historical clients read boards. Every
/// digit is a run of its own, so `55` is ten empty cells and `11` is two.
/// `0` and unknown characters are skipped without moving the cursor. Writes
/// past the board edge are dropped. Never fails; a malformed row simply comes
/// out misaligned.
pub fn decode_lenient(notation: &str) -> Grid {
    let board = match split_suffix(notation) {
        Ok((board, _)) => board,
        Err(_) => "",
    };
    let mut grid = Grid::new();
    let (mut row, mut col) = (0usize, 0usize);
    for token in Tokens::per_digit(board) {
        match token {
            Token::Separator => {
                row += 1;
                col = 0;
            }
            Token::Piece(cell) => {
                grid.set(row, col, cell);
                col += 1;
            }
            Token::Run(value) if (1..=N as u32).contains(&value) => col += value as usize,
            Token::Run(_) | Token::Other(_) => {}
        }
    }
    grid
}

/// Side to move from the last character, without decoding the board.
pub fn side_to_move(notation: &str) -> Option<Side> {
    notation.chars().last().map(Side::from_marker)
}

/// Encode a grid back into notation. Restricted cells without the king are
/// written as empty.
pub fn encode(grid: &Grid, suffix: StatusSuffix) -> String {
    let mut out = String::new();
    for (r, row) in grid.rows().iter().enumerate() {
        if r > 0 {
            out.push(ROW_SEPARATOR);
        }
        let mut run = 0usize;
        for cell in row {
            let marker = match cell {
                Cell::Attacker => ATTACKER_MARKER,
                Cell::Defender => DEFENDER_MARKER,
                Cell::King => KING_MARKER,
                Cell::Empty | Cell::Restricted => {
                    run += 1;
                    continue;
                }
            };
            push_run(&mut out, run);
            run = 0;
            out.push(marker);
        }
        push_run(&mut out, run);
    }
    let _ = write!(out, "{}", suffix);
    out
}

fn push_run(out: &mut String, run: usize) {
    match run {
        0 => {}
        10 => out.push(RUN_TEN),
        11 => out.push(RUN_ELEVEN),
        n => {
            if let Some(digit) = char::from_digit(n as u32, 10) {
                out.push(digit);
            }
        }
    }
}

fn split_suffix(notation: &str) -> Result<(&str, [char; SUFFIX_LEN]), DecodeError> {
    let len = notation.chars().count();
    if len < SUFFIX_LEN {
        return Err(DecodeError::TooShort { len });
    }
    let split = notation
        .char_indices()
        .rev()
        .nth(SUFFIX_LEN - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let (board, tail) = notation.split_at(split);
    let mut suffix = ['\0'; SUFFIX_LEN];
    for (slot, ch) in suffix.iter_mut().zip(tail.chars()) {
        *slot = ch;
    }
    Ok((board, suffix))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Separator,
    Piece(Cell),
    Run(u32),
    Other(char),
}

/// Splits a board string into tokens. By default consecutive digits form one
/// count.
struct Tokens<'a> {
    chars: Peekable<Chars<'a>>,
    group_digits: bool,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            group_digits: true,
        }
    }

    /// Every digit is its own count.
    fn per_digit(text: &'a str) -> Self {
        Self {
            group_digits: false,
            ..Self::new(text)
        }
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let ch = self.chars.next()?;
        let token = match ch {
            ROW_SEPARATOR => Token::Separator,
            ATTACKER_MARKER => Token::Piece(Cell::Attacker),
            DEFENDER_MARKER => Token::Piece(Cell::Defender),
            KING_MARKER => Token::Piece(Cell::King),
            RUN_TEN => Token::Run(10),
            RUN_ELEVEN => Token::Run(11),
            _ => match ch.to_digit(10) {
                Some(first) => {
                    let mut value = first;
                    while let Some(d) = self
                        .chars
                        .peek()
                        .filter(|_| self.group_digits)
                        .and_then(|c| c.to_digit(10))
                    {
                        value = value.saturating_mul(10).saturating_add(d);
                        self.chars.next();
                    }
                    Token::Run(value)
                }
                None => Token::Other(ch),
            },
        };
        Some(token)
    }
}
