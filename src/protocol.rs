#![cfg(feature = "std")]

use crate::common::Coord;
use crate::domain::{ApiError, PositionResponse};

pub use crate::config::PROTOCOL_VERSION;

/// The three calls the client makes against the remote rules engine.
#[async_trait::async_trait]
pub trait GameApi: Send + Sync {
    /// Current position of `game_id`.
    async fn fetch_position(&self, game_id: &str) -> Result<PositionResponse, ApiError>;

    /// Legal destinations for the piece at `from`, as the engine's raw
    /// `"[(x, y), ...]"` list.
    async fn legal_moves(&self, game_id: &str, player: &str, from: Coord)
        -> Result<String, ApiError>;

    /// Submit a move. The response is authoritative even when the engine
    /// also played a reply move.
    async fn make_move(
        &self,
        game_id: &str,
        player: &str,
        from: Coord,
        to: Coord,
    ) -> Result<PositionResponse, ApiError>;
}

#[async_trait::async_trait]
impl<A: GameApi + ?Sized> GameApi for std::sync::Arc<A> {
    async fn fetch_position(&self, game_id: &str) -> Result<PositionResponse, ApiError> {
        (**self).fetch_position(game_id).await
    }

    async fn legal_moves(
        &self,
        game_id: &str,
        player: &str,
        from: Coord,
    ) -> Result<String, ApiError> {
        (**self).legal_moves(game_id, player, from).await
    }

    async fn make_move(
        &self,
        game_id: &str,
        player: &str,
        from: Coord,
        to: Coord,
    ) -> Result<PositionResponse, ApiError> {
        (**self).make_move(game_id, player, from, to).await
    }
}

/// Frames exchanged between a [`crate::Stub`] and a [`crate::Skeleton`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Message {
    Handshake { version: u8 },
    HandshakeAck { version: u8 },
    FetchPosition { seq: u64, game_id: String },
    LegalMoves { seq: u64, game_id: String, player: String, from: Coord },
    MakeMove { seq: u64, game_id: String, player: String, from: Coord, to: Coord },
    /// Reply to `FetchPosition` or `MakeMove`.
    Position { seq: u64, fen: String, winner: char },
    /// Reply to `LegalMoves`.
    Destinations { seq: u64, list: String },
    /// Non-success reply to any request.
    Failure { seq: u64, status: u16, reason: String },
}

impl Message {
    /// Sequence number of a request or reply; handshakes carry none.
    pub fn seq(&self) -> Option<u64> {
        match self {
            Message::Handshake { .. } | Message::HandshakeAck { .. } => None,
            Message::FetchPosition { seq, .. }
            | Message::LegalMoves { seq, .. }
            | Message::MakeMove { seq, .. }
            | Message::Position { seq, .. }
            | Message::Destinations { seq, .. }
            | Message::Failure { seq, .. } => Some(*seq),
        }
    }

    pub(crate) fn from_position(seq: u64, res: Result<PositionResponse, ApiError>) -> Self {
        match res {
            Ok(PositionResponse { fen, winner }) => Message::Position { seq, fen, winner },
            Err(err) => Message::failure(seq, err),
        }
    }

    pub(crate) fn failure(seq: u64, err: ApiError) -> Self {
        match err {
            ApiError::Status { code, reason } => Message::Failure {
                seq,
                status: code,
                reason,
            },
            ApiError::Transport(reason) => Message::Failure {
                seq,
                status: 502,
                reason,
            },
        }
    }
}
