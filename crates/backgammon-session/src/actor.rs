//! Session actor: an isolated Tokio task that owns one game.
//!
//! The actor holds the board, the dice RNG, and both participants'
//! outbound channels. Everything else talks to it through a
//! [`SessionHandle`], so commands for one session are applied one at a
//! time in arrival order without any lock.

use backgammon_engine::{BoardState, Snapshot};
use backgammon_protocol::{Color, Recipient, ServerEvent, SessionId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};

use crate::dispatch::{self, Command, MATCHED_MESSAGE, Outbound};
use crate::{SessionConfig, SessionError};

/// Channel sender for delivering events to one participant's connection.
pub type PlayerSender = mpsc::UnboundedSender<Outbound>;

/// Commands sent to a session actor through its channel.
pub(crate) enum SessionCommand {
    /// Attach a participant's outbound channel to a color.
    Seat { color: Color, sender: PlayerSender },

    /// Announce the pairing: colors, matched status, initial state.
    Start,

    /// Re-send the color and current state to a participant who joined
    /// again.
    Rejoin { color: Color },

    /// A game action from the participant playing `color`.
    Submit { color: Color, command: Command },

    Snapshot { reply: oneshot::Sender<Snapshot> },

    Shutdown,
}

/// Handle to a running session actor.
///
/// Cheap to clone: it's just an `mpsc::Sender` wrapper. The
/// [`SessionStore`](crate::SessionStore) holds one per session.
#[derive(Clone)]
pub struct SessionHandle {
    session_id: SessionId,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    async fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))
    }

    pub(crate) async fn seat(
        &self,
        color: Color,
        sender: PlayerSender,
    ) -> Result<(), SessionError> {
        self.send(SessionCommand::Seat { color, sender }).await
    }

    pub(crate) async fn start(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Start).await
    }

    pub(crate) async fn rejoin(&self, color: Color) -> Result<(), SessionError> {
        self.send(SessionCommand::Rejoin { color }).await
    }

    /// Queues a game action (fire-and-forget). The outcome arrives on the
    /// participants' outbound channels.
    pub async fn submit(&self, color: Color, command: Command) -> Result<(), SessionError> {
        self.send(SessionCommand::Submit { color, command }).await
    }

    /// Requests a copy of the current board.
    pub async fn snapshot(&self) -> Result<Snapshot, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SessionCommand::Snapshot { reply: reply_tx }).await?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))
    }

    /// Tells the actor to stop. Commands already queued ahead of this are
    /// still applied.
    pub(crate) async fn shutdown(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Shutdown).await
    }
}

struct SessionActor {
    session_id: SessionId,
    board: BoardState,
    /// Outbound channels indexed by [`Color::index`].
    seats: [Option<PlayerSender>; 2],
    rng: StdRng,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl SessionActor {
    async fn run(mut self) {
        tracing::info!(session_id = %self.session_id, "session actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::Seat { color, sender } => {
                    self.seats[color.index()] = Some(sender);
                }
                SessionCommand::Start => self.start(),
                SessionCommand::Rejoin { color } => {
                    tracing::debug!(session_id = %self.session_id, %color, "participant rejoined");
                    self.send_to(color, ServerEvent::Assigned { color });
                    self.deliver(vec![(Recipient::All, dispatch::state(&self.board))]);
                }
                SessionCommand::Submit { color, command } => {
                    let events = dispatch::dispatch(&mut self.board, color, command, &mut self.rng);
                    self.deliver(events);
                }
                SessionCommand::Snapshot { reply } => {
                    let _ = reply.send(self.board.snapshot());
                }
                SessionCommand::Shutdown => break,
            }
        }

        tracing::info!(session_id = %self.session_id, "session actor stopped");
    }

    fn start(&mut self) {
        for color in Color::ALL {
            self.send_to(color, ServerEvent::Assigned { color });
        }
        self.deliver(vec![
            (Recipient::All, dispatch::status(MATCHED_MESSAGE)),
            (Recipient::All, dispatch::state(&self.board)),
        ]);
        tracing::info!(session_id = %self.session_id, "game started");
    }

    fn deliver(&self, events: Vec<(Recipient, Outbound)>) {
        for (recipient, event) in events {
            match recipient {
                Recipient::All => {
                    for color in Color::ALL {
                        self.send_to(color, event.clone());
                    }
                }
                Recipient::Only(color) => self.send_to(color, event),
            }
        }
    }

    /// Drops the event silently if the participant's connection is gone.
    fn send_to(&self, color: Color, event: Outbound) {
        if let Some(sender) = &self.seats[color.index()] {
            let _ = sender.send(event);
        }
    }
}

/// Spawns a session actor on a fresh board and returns its handle.
pub(crate) fn spawn_session(session_id: SessionId, config: &SessionConfig) -> SessionHandle {
    let (tx, rx) = mpsc::channel(config.command_channel_size);

    let rng = match config.dice_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let actor = SessionActor {
        session_id,
        board: BoardState::new(),
        seats: [None, None],
        rng,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    SessionHandle {
        session_id,
        sender: tx,
    }
}
