#![cfg(feature = "std")]

//! Terminal front-end helpers: reading tiles typed by the player and drawing
//! the board.

use std::fmt::Write;

use crate::client_node::{ClientSnapshot, UiEvent};
use crate::common::{Coord, GameStatus};
use crate::config::BOARD_SIZE;
use crate::controller::Phase;

const N: usize = BOARD_SIZE as usize;

/// Parse a tile typed as `F6` (column letter, 1-based row) or `5 5` / `5,5`
/// (zero-based row and column, as the engine numbers them).
pub fn parse_tile(input: &str) -> Option<Coord> {
    let input = input.trim();
    let mut numbers = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty());
    if let (Some(a), Some(b), None) = (numbers.next(), numbers.next(), numbers.next()) {
        if let (Ok(row), Ok(col)) = (a.parse::<usize>(), b.parse::<usize>()) {
            return Coord::try_new(row, col).ok();
        }
    }

    let mut chars = input.chars();
    let col_ch = chars.next()?.to_ascii_uppercase();
    if !col_ch.is_ascii_uppercase() {
        return None;
    }
    let col = (col_ch as u8 - b'A') as usize;
    let row: usize = chars.as_str().parse().ok()?;
    if row == 0 {
        return None;
    }
    Coord::try_new(row - 1, col).ok()
}

/// Parse one line of player input.
pub fn parse_command(line: &str) -> Option<UiEvent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "q" | "quit" | "abort" => Some(UiEvent::Abort),
        "r" | "refresh" => Some(UiEvent::Refresh),
        _ => parse_tile(line).map(UiEvent::Click),
    }
}

/// Render a snapshot as text: column letters, row numbers, one symbol per cell.
pub fn render(snapshot: &ClientSnapshot) -> String {
    let mut out = String::new();
    match snapshot.phase {
        Phase::Idle | Phase::Loading => {
            out.push_str("Loading game...\n");
            return out;
        }
        Phase::Invalid => {
            out.push_str("Game not found.\n");
            return out;
        }
        Phase::Aborted => {
            out.push_str("Game aborted.\n");
            return out;
        }
        Phase::Ready => {}
    }

    let grid = match snapshot.grid {
        Some(grid) => grid,
        None => return out,
    };
    let view = match &snapshot.selection {
        Some(sel) => grid.view(Some(sel.origin), &sel.destinations),
        None => grid.view(None, &Default::default()),
    };

    out.push_str("   ");
    for c in 0..N {
        let _ = write!(out, " {}", (b'A' + c as u8) as char);
    }
    out.push('\n');
    for (r, row) in view.iter().enumerate() {
        let _ = write!(out, "{:2} ", r + 1);
        for cell in row {
            let _ = write!(out, " {}", cell.symbol());
        }
        out.push('\n');
    }

    match snapshot.status {
        GameStatus::InProgress => {
            if let Some(turn) = snapshot.turn {
                let _ = writeln!(out, "{} to move", turn);
            }
        }
        status => {
            if let Some(winner) = status.winner() {
                let _ = writeln!(out, "Game over: {} won", winner);
            }
        }
    }
    out
}
