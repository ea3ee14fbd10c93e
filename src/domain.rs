//! Payloads exchanged with the remote game engine.

use alloc::string::String;
use core::fmt;

use crate::common::GameStatus;

/// Body of a successful fetch-position or submit-move call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionResponse {
    /// CHFEN notation of the board and side to move.
    pub fen: String,
    /// `x` in progress, `w` defenders won, `b` attackers won.
    pub winner: char,
}

impl PositionResponse {
    pub fn new(fen: impl Into<String>, status: GameStatus) -> Self {
        Self {
            fen: fen.into(),
            winner: status.winner_marker(),
        }
    }

    /// Terminal status, or `None` for an unknown marker.
    pub fn status(&self) -> Option<GameStatus> {
        GameStatus::from_winner(self.winner)
    }
}

/// A failed remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ApiError {
    /// The engine answered with a non-success status.
    Status { code: u16, reason: String },
    /// The request never got a well-formed answer.
    Transport(String),
}

impl ApiError {
    pub fn status(code: u16, reason: impl Into<String>) -> Self {
        ApiError::Status {
            code,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Status { code, reason } => write!(f, "engine returned {}: {}", code, reason),
            ApiError::Transport(msg) => write!(f, "transport failure: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ApiError {}

#[cfg(feature = "std")]
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Transport(std::format!("{:#}", err))
    }
}
