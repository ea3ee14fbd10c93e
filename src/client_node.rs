use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};

use crate::common::{Coord, GameStatus, Side};
use crate::controller::{Applied, BoardController, Command, Completion, Phase, Selection, Ticket};
use crate::grid::Grid;
use crate::protocol::GameApi;
use crate::session::{SessionContext, SessionHost};

/// Input from the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Click(Coord),
    Refresh,
    Abort,
}

/// Why [`ClientNode::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeExit {
    /// The player aborted the game.
    Aborted,
    /// The engine did not recognise the session.
    SessionInvalid,
    /// The UI event channel closed.
    Closed,
}

/// What a front-end needs to draw after each change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSnapshot {
    pub phase: Phase,
    pub grid: Option<Grid>,
    pub turn: Option<Side>,
    pub status: GameStatus,
    pub selection: Option<Selection>,
}

impl From<&BoardController> for ClientSnapshot {
    fn from(controller: &BoardController) -> Self {
        Self {
            phase: controller.phase(),
            grid: controller.grid().copied(),
            turn: controller.turn(),
            status: controller.status(),
            selection: controller.selection().copied(),
        }
    }
}

/// Perform one controller command against the engine.
pub async fn execute<A: GameApi + ?Sized>(
    api: &A,
    session: &SessionContext,
    command: Command,
) -> Completion {
    let game_id = session.game_id();
    let player = session.player_name();
    match command {
        Command::FetchPosition { .. } => Completion::Position(api.fetch_position(game_id).await),
        Command::LegalMoves { from, .. } => {
            Completion::Destinations(api.legal_moves(game_id, player, from).await)
        }
        Command::MakeMove { from, to, .. } => {
            Completion::Position(api.make_move(game_id, player, from, to).await)
        }
    }
}

/// Drives a [`BoardController`] against a remote engine.
///
/// All controller state lives on the task calling [`ClientNode::run`]. Each
/// command runs on its own spawned task so the player can keep clicking while
/// a request is outstanding; completions come back over a channel and the
/// controller's tickets decide which of them still apply.
pub struct ClientNode<A: GameApi + 'static> {
    api: Arc<A>,
    session: Arc<SessionContext>,
    host: Box<dyn SessionHost>,
    controller: BoardController,
    snapshots: watch::Sender<ClientSnapshot>,
}

impl<A: GameApi + 'static> ClientNode<A> {
    pub fn new(
        api: Arc<A>,
        session: SessionContext,
        host: Box<dyn SessionHost>,
    ) -> (Self, watch::Receiver<ClientSnapshot>) {
        let controller = BoardController::new();
        let (snapshots, rx) = watch::channel(ClientSnapshot::from(&controller));
        let node = Self {
            api,
            session: Arc::new(session),
            host,
            controller,
            snapshots,
        };
        (node, rx)
    }

    pub fn controller(&self) -> &BoardController {
        &self.controller
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub async fn run(&mut self, mut events: mpsc::Receiver<UiEvent>) -> NodeExit {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(Ticket, Completion)>();

        if let Some(command) = self.controller.activate() {
            self.dispatch(command, &done_tx);
        }
        self.publish();

        loop {
            tokio::select! {
                Some((ticket, completion)) = done_rx.recv() => {
                    match self.controller.apply(ticket, completion) {
                        Applied::SessionInvalid(err) => {
                            warn!("[ClientNode] session {} invalid: {}", self.session.game_id(), err);
                            self.host.clear_session();
                            self.publish();
                            return NodeExit::SessionInvalid;
                        }
                        Applied::Position => {
                            if let Some(side) = self.controller.status().winner() {
                                info!("[ClientNode] game over: {} won", side);
                            }
                        }
                        Applied::Resync(_, command) => self.dispatch(command, &done_tx),
                        Applied::Selected | Applied::Rejected(_) | Applied::Stale => {}
                    }
                    self.publish();
                }
                event = events.recv() => {
                    let command = match event {
                        Some(UiEvent::Click(at)) => self.controller.click(at),
                        Some(UiEvent::Refresh) => self.controller.refresh(),
                        Some(UiEvent::Abort) => {
                            info!("[ClientNode] player aborted session {}", self.session.game_id());
                            self.controller.abort();
                            self.host.clear_session();
                            self.publish();
                            return NodeExit::Aborted;
                        }
                        None => return NodeExit::Closed,
                    };
                    if let Some(command) = command {
                        self.dispatch(command, &done_tx);
                    }
                    self.publish();
                }
            }
        }
    }

    fn dispatch(&self, command: Command, done: &mpsc::UnboundedSender<(Ticket, Completion)>) {
        debug!("[ClientNode] dispatching {:?}", command);
        let api = Arc::clone(&self.api);
        let session = Arc::clone(&self.session);
        let done = done.clone();
        tokio::spawn(async move {
            let completion = execute(api.as_ref(), &session, command).await;
            // the node may already have exited
            let _ = done.send((command.ticket(), completion));
        });
    }

    fn publish(&self) {
        let snapshot = ClientSnapshot::from(&self.controller);
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}
