//! Board interaction controller.
//!
//! Turns tile clicks into engine requests and folds the engine's answers back
//! into the displayed board. The controller performs no I/O: each transition
//! hands back a [`Command`] for the caller to execute, and the outcome is fed
//! back through [`BoardController::apply`] together with the command's
//! [`Ticket`]. Tickets come from a monotonic counter, so a late answer to a
//! superseded request is recognised and dropped instead of overwriting newer
//! state.

use alloc::string::String;
use core::fmt;

use log::{debug, warn};

use crate::bitboard::TileSet;
use crate::common::{Coord, GameStatus, Side};
use crate::config::BOARD_SIZE;
use crate::coord_list::{parse_coord_list, CoordListError};
use crate::domain::{ApiError, PositionResponse};
use crate::grid::{CellView, Grid};
use crate::notation::{decode, DecodeError};

const N: usize = BOARD_SIZE as usize;

/// Identifies one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A remote call the caller must perform on the controller's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FetchPosition { ticket: Ticket },
    LegalMoves { ticket: Ticket, from: Coord },
    MakeMove { ticket: Ticket, from: Coord, to: Coord },
}

impl Command {
    pub fn ticket(&self) -> Ticket {
        match self {
            Command::FetchPosition { ticket }
            | Command::LegalMoves { ticket, .. }
            | Command::MakeMove { ticket, .. } => *ticket,
        }
    }
}

/// Result of a remote call, keyed by the kind of payload it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Answer to `FetchPosition` or `MakeMove`.
    Position(Result<PositionResponse, ApiError>),
    /// Answer to `LegalMoves`.
    Destinations(Result<String, ApiError>),
}

/// Why a response could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    Api(ApiError),
    Notation(DecodeError),
    UnknownWinner(char),
    Destinations(CoordListError),
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseError::Api(e) => write!(f, "{}", e),
            ResponseError::Notation(e) => write!(f, "bad notation: {}", e),
            ResponseError::UnknownWinner(c) => write!(f, "unknown winner marker {:?}", c),
            ResponseError::Destinations(e) => write!(f, "bad destination list: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ResponseError {}

/// What [`BoardController::apply`] did with a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A new position replaced the board.
    Position,
    /// A piece is now selected with its legal destinations.
    Selected,
    /// The response was a failure or malformed; state is unchanged.
    Rejected(ResponseError),
    /// A newer request superseded this one; the response was ignored.
    Stale,
    /// The initial fetch failed; the owning session must be cleared.
    SessionInvalid(ResponseError),
    /// The response was a failure, and an answer to an earlier position
    /// request was dropped in its favour. The board may be out of date; the
    /// caller must run the attached fetch.
    Resync(ResponseError, Command),
}

/// A chosen piece and the destinations the engine allows for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub origin: Coord,
    pub destinations: TileSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not yet activated.
    Idle,
    /// Waiting for the first position.
    Loading,
    /// A position is on display.
    Ready,
    /// The initial fetch failed.
    Invalid,
    /// Torn down by the session.
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Board {
    grid: Grid,
    turn: Side,
    status: GameStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardController {
    phase: Phase,
    board: Option<Board>,
    selection: Option<Selection>,
    next_ticket: u64,
    /// Latest fetch or move request whose answer may still replace the board.
    pending_position: Option<Ticket>,
    /// A position request was issued while another was still unanswered.
    superseded: bool,
    /// Latest legal-moves request and the piece it was issued for.
    pending_selection: Option<(Ticket, Coord)>,
}

impl Default for BoardController {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardController {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            board: None,
            selection: None,
            next_ticket: 0,
            pending_position: None,
            superseded: false,
            pending_selection: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.board.as_ref().map(|b| &b.grid)
    }

    pub fn turn(&self) -> Option<Side> {
        self.board.map(|b| b.turn)
    }

    pub fn status(&self) -> GameStatus {
        self.board.map(|b| b.status).unwrap_or_default()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Board as it should be drawn, with the selection overlaid.
    pub fn view(&self) -> Option<[[CellView; N]; N]> {
        let grid = self.grid()?;
        Some(match &self.selection {
            Some(sel) => grid.view(Some(sel.origin), &sel.destinations),
            None => grid.view(None, &TileSet::new()),
        })
    }

    /// Start the session by fetching the current position.
    pub fn activate(&mut self) -> Option<Command> {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Loading;
                Some(self.issue_fetch())
            }
            _ => None,
        }
    }

    /// Re-fetch the position, e.g. to pick up an opponent's move.
    pub fn refresh(&mut self) -> Option<Command> {
        match self.phase {
            Phase::Ready | Phase::Loading => Some(self.issue_fetch()),
            _ => None,
        }
    }

    /// Handle a click on `at`.
    pub fn click(&mut self, at: Coord) -> Option<Command> {
        let board = match (self.phase, self.board) {
            (Phase::Ready, Some(board)) => board,
            _ => return None,
        };
        if board.status.is_over() {
            debug!("click at {} ignored: game is over ({:?})", at, board.status);
            return None;
        }

        // Every click starts from a clean slate, and any destinations still
        // in flight belong to an earlier click.
        let previous = self.selection.take();
        self.pending_selection = None;

        if let Some(sel) = previous {
            if sel.destinations.contains(at) {
                let ticket = self.issue_position();
                debug!("submitting move {} -> {} ({:?})", sel.origin, at, ticket);
                return Some(Command::MakeMove {
                    ticket,
                    from: sel.origin,
                    to: at,
                });
            }
        }

        let side = match board.grid.get(at).and_then(|cell| cell.side()) {
            Some(side) => side,
            None => {
                debug!("click at {} selects nothing", at);
                return None;
            }
        };
        if side != board.turn {
            debug!("click at {} ignored: {} piece, {} to move", at, side, board.turn);
            return None;
        }

        let ticket = self.issue();
        self.pending_selection = Some((ticket, at));
        Some(Command::LegalMoves { ticket, from: at })
    }

    /// Fold the answer to a previously returned command into the state.
    pub fn apply(&mut self, ticket: Ticket, completion: Completion) -> Applied {
        match completion {
            Completion::Position(res) => self.apply_position(ticket, res),
            Completion::Destinations(res) => self.apply_destinations(ticket, res),
        }
    }

    pub fn apply_position(
        &mut self,
        ticket: Ticket,
        res: Result<PositionResponse, ApiError>,
    ) -> Applied {
        if !self.accepts_responses() || self.pending_position != Some(ticket) {
            debug!("dropping stale position response {:?}", ticket);
            return Applied::Stale;
        }
        self.pending_position = None;
        let superseded = core::mem::take(&mut self.superseded);

        match read_position(res) {
            Ok(board) => {
                self.board = Some(board);
                self.selection = None;
                self.pending_selection = None;
                self.phase = Phase::Ready;
                Applied::Position
            }
            Err(err) if self.board.is_none() => {
                warn!("initial position unavailable: {}", err);
                self.phase = Phase::Invalid;
                Applied::SessionInvalid(err)
            }
            Err(err) if superseded => {
                warn!("position update rejected after an earlier one was dropped: {}", err);
                Applied::Resync(err, self.issue_fetch())
            }
            Err(err) => {
                warn!("position update rejected: {}", err);
                Applied::Rejected(err)
            }
        }
    }

    pub fn apply_destinations(&mut self, ticket: Ticket, res: Result<String, ApiError>) -> Applied {
        let origin = match self.pending_selection {
            Some((pending, origin)) if pending == ticket && self.accepts_responses() => origin,
            _ => {
                debug!("dropping stale destinations response {:?}", ticket);
                return Applied::Stale;
            }
        };
        self.pending_selection = None;

        let parsed = res
            .map_err(ResponseError::Api)
            .and_then(|list| parse_coord_list(&list).map_err(ResponseError::Destinations));
        match parsed {
            Ok(destinations) => {
                self.selection = Some(Selection {
                    origin,
                    destinations,
                });
                Applied::Selected
            }
            Err(err) => {
                warn!("legal moves for {} unavailable: {}", origin, err);
                Applied::Rejected(err)
            }
        }
    }

    /// Discard everything. Later completions are reported as stale.
    pub fn abort(&mut self) {
        *self = Self {
            phase: Phase::Aborted,
            next_ticket: self.next_ticket,
            ..Self::new()
        };
    }

    fn accepts_responses(&self) -> bool {
        matches!(self.phase, Phase::Loading | Phase::Ready)
    }

    fn issue(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    fn issue_position(&mut self) -> Ticket {
        let ticket = self.issue();
        self.superseded |= self.pending_position.is_some();
        self.pending_position = Some(ticket);
        ticket
    }

    fn issue_fetch(&mut self) -> Command {
        let ticket = self.issue_position();
        Command::FetchPosition { ticket }
    }
}

fn read_position(res: Result<PositionResponse, ApiError>) -> Result<Board, ResponseError> {
    let res = res.map_err(ResponseError::Api)?;
    let status = res
        .status()
        .ok_or(ResponseError::UnknownWinner(res.winner))?;
    let decoded = decode(&res.fen).map_err(ResponseError::Notation)?;
    Ok(Board {
        grid: decoded.grid,
        turn: decoded.turn(),
        status,
    })
}
