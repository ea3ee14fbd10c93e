use anyhow::anyhow;
use log::{debug, warn};

use crate::domain::ApiError;
use crate::protocol::{GameApi, Message, PROTOCOL_VERSION};
use crate::transport::{is_closed, Transport};

/// Server side of the engine protocol: answers requests arriving on a
/// [`Transport`] by calling into a local [`GameApi`] implementation.
pub struct Skeleton<E: GameApi, T: Transport> {
    engine: E,
    transport: T,
}

impl<E: GameApi, T: Transport> Skeleton<E, T> {
    pub fn new(engine: E, transport: T) -> Self {
        Self { engine, transport }
    }

    /// Serve until the peer disconnects. A broken stream (bad frame, timeout)
    /// is returned as an error; only a closed connection ends cleanly.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        match self.transport.recv().await? {
            Message::Handshake { version } if version == PROTOCOL_VERSION => {
                self.transport
                    .send(Message::HandshakeAck {
                        version: PROTOCOL_VERSION,
                    })
                    .await?;
            }
            Message::Handshake { version } => {
                warn!(
                    "[Skeleton] Handshake protocol version mismatch: expected {}, peer sent {}",
                    PROTOCOL_VERSION, version
                );
                self.transport
                    .send(Message::HandshakeAck {
                        version: PROTOCOL_VERSION,
                    })
                    .await?;
                return Err(anyhow!(
                    "Protocol version mismatch in Handshake: expected {}, got {}",
                    PROTOCOL_VERSION,
                    version
                ));
            }
            other => return Err(anyhow!("Expected Handshake, got {:?}", other)),
        }

        loop {
            let msg = match self.transport.recv().await {
                Ok(msg) => msg,
                Err(err) if is_closed(&err) => {
                    debug!("[Skeleton] peer disconnected");
                    return Ok(());
                }
                Err(err) => return Err(err),
            };
            debug!("[Skeleton] <- {:?}", msg);
            let reply = self.handle(msg).await;
            self.transport.send(reply).await?;
        }
    }

    async fn handle(&self, msg: Message) -> Message {
        match msg {
            Message::FetchPosition { seq, game_id } => {
                Message::from_position(seq, self.engine.fetch_position(&game_id).await)
            }
            Message::LegalMoves {
                seq,
                game_id,
                player,
                from,
            } => match self.engine.legal_moves(&game_id, &player, from).await {
                Ok(list) => Message::Destinations { seq, list },
                Err(err) => Message::failure(seq, err),
            },
            Message::MakeMove {
                seq,
                game_id,
                player,
                from,
                to,
            } => Message::from_position(seq, self.engine.make_move(&game_id, &player, from, to).await),
            other => {
                warn!("[Skeleton] unexpected message {:?}", other);
                Message::failure(
                    other.seq().unwrap_or_default(),
                    ApiError::status(400, "unexpected message"),
                )
            }
        }
    }
}
