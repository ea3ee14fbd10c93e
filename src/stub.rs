use log::{debug, warn};
use tokio::sync::Mutex;

use crate::common::Coord;
use crate::domain::{ApiError, PositionResponse};
use crate::protocol::{GameApi, Message, PROTOCOL_VERSION};
use crate::transport::Transport;

/// Client side of the engine protocol: a [`GameApi`] that forwards every call
/// over a [`Transport`]. Calls may be issued concurrently; they are serialized
/// on the transport, one request and its reply at a time.
///
/// Replies left over from an earlier call (a lower sequence number) are
/// skipped. Any transport failure, or a reply from the future, leaves the
/// stream position unknown: the stub is then broken and every later call
/// fails immediately until a new one is built on a fresh connection.
pub struct Stub<T: Transport> {
    link: Mutex<Link<T>>,
}

struct Link<T> {
    transport: T,
    next_seq: u64,
    handshaken: bool,
    broken: Option<String>,
}

impl<T: Transport> Link<T> {
    fn poison(&mut self, reason: String) -> ApiError {
        warn!("[Stub] connection unusable: {}", reason);
        self.broken = Some(reason.clone());
        ApiError::Transport(reason)
    }

    async fn handshake(&mut self) -> Result<(), ApiError> {
        if self.handshaken {
            return Ok(());
        }
        let sent = self
            .transport
            .send(Message::Handshake {
                version: PROTOCOL_VERSION,
            })
            .await;
        if let Err(err) = sent {
            return Err(self.poison(format!("{:#}", err)));
        }
        match self.transport.recv().await {
            Ok(Message::HandshakeAck { version }) if version == PROTOCOL_VERSION => {
                self.handshaken = true;
                Ok(())
            }
            Ok(Message::HandshakeAck { version }) => Err(self.poison(format!(
                "Protocol version mismatch in HandshakeAck: expected {}, got {}",
                PROTOCOL_VERSION, version
            ))),
            Ok(other) => Err(self.poison(format!("Expected HandshakeAck, got {:?}", other))),
            Err(err) => Err(self.poison(format!("{:#}", err))),
        }
    }

    async fn call(&mut self, make: impl FnOnce(u64) -> Message) -> Result<Message, ApiError> {
        if let Some(reason) = &self.broken {
            return Err(ApiError::Transport(format!("Connection broken: {}", reason)));
        }
        self.handshake().await?;

        let seq = self.next_seq;
        self.next_seq += 1;
        let request = make(seq);
        debug!("[Stub] -> {:?}", request);
        if let Err(err) = self.transport.send(request).await {
            return Err(self.poison(format!("{:#}", err)));
        }

        loop {
            let reply = match self.transport.recv().await {
                Ok(reply) => reply,
                Err(err) => return Err(self.poison(format!("{:#}", err))),
            };
            match reply.seq() {
                Some(got) if got == seq => return Ok(reply),
                Some(got) if got < seq => {
                    warn!("[Stub] skipping late reply {} while waiting for {}", got, seq);
                }
                got => {
                    return Err(self.poison(format!(
                        "Sequence mismatch: expected {}, got {:?}",
                        seq, got
                    )))
                }
            }
        }
    }
}

impl<T: Transport> Stub<T> {
    pub fn new(transport: T) -> Self {
        Self {
            link: Mutex::new(Link {
                transport,
                next_seq: 0,
                handshaken: false,
                broken: None,
            }),
        }
    }

    /// Whether an earlier failure has made this connection unusable.
    pub async fn is_broken(&self) -> bool {
        self.link.lock().await.broken.is_some()
    }

    /// Send one request and wait for the reply carrying the same sequence number.
    async fn call(&self, make: impl FnOnce(u64) -> Message) -> Result<Message, ApiError> {
        self.link.lock().await.call(make).await
    }
}

fn expect_position(reply: Message) -> Result<PositionResponse, ApiError> {
    match reply {
        Message::Position { fen, winner, .. } => Ok(PositionResponse { fen, winner }),
        Message::Failure { status, reason, .. } => Err(ApiError::status(status, reason)),
        other => Err(ApiError::Transport(format!("Expected Position, got {:?}", other))),
    }
}

#[async_trait::async_trait]
impl<T: Transport> GameApi for Stub<T> {
    async fn fetch_position(&self, game_id: &str) -> Result<PositionResponse, ApiError> {
        let game_id = game_id.to_string();
        let reply = self
            .call(|seq| Message::FetchPosition { seq, game_id })
            .await?;
        expect_position(reply)
    }

    async fn legal_moves(
        &self,
        game_id: &str,
        player: &str,
        from: Coord,
    ) -> Result<String, ApiError> {
        let (game_id, player) = (game_id.to_string(), player.to_string());
        let reply = self
            .call(|seq| Message::LegalMoves {
                seq,
                game_id,
                player,
                from,
            })
            .await?;
        match reply {
            Message::Destinations { list, .. } => Ok(list),
            Message::Failure { status, reason, .. } => Err(ApiError::status(status, reason)),
            other => Err(ApiError::Transport(format!(
                "Expected Destinations, got {:?}",
                other
            ))),
        }
    }

    async fn make_move(
        &self,
        game_id: &str,
        player: &str,
        from: Coord,
        to: Coord,
    ) -> Result<PositionResponse, ApiError> {
        let (game_id, player) = (game_id.to_string(), player.to_string());
        let reply = self
            .call(|seq| Message::MakeMove {
                seq,
                game_id,
                player,
                from,
                to,
            })
            .await?;
        expect_position(reply)
    }
}
