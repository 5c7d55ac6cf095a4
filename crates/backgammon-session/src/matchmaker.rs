//! Matchmaking: the single waiting slot that pairs players two at a time.

use backgammon_protocol::{Color, PlayerId, ServerEvent, SessionId};

use crate::dispatch::{WAITING_MESSAGE, status};
use crate::{PlayerSender, SessionConfig, SessionError, SessionHandle, SessionStore};

/// The first player of a future session, not yet paired.
struct WaitingPlayer {
    player_id: PlayerId,
    sender: PlayerSender,
}

/// What a `join` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The player now holds (or still holds) the waiting slot as White.
    Waiting,
    /// The player was paired with the waiting player as Black.
    Matched { session_id: SessionId },
    /// The player was already bound; its color and state were re-sent.
    Rejoined { session_id: SessionId, color: Color },
}

/// Pairs arriving players and tracks who is playing where.
///
/// At most one player waits at a time. The server keeps this behind one
/// mutex, which makes join, disconnect, and lookup mutually exclusive.
pub struct MatchmakingService {
    waiting: Option<WaitingPlayer>,
    store: SessionStore,
}

impl MatchmakingService {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            waiting: None,
            store: SessionStore::new(config),
        }
    }

    /// Handles a `join` from `player_id`.
    ///
    /// - already bound: re-sends the player's color and the board
    /// - nobody waiting, or this player already waiting: takes the slot as
    ///   White and is told to wait
    /// - someone else waiting: creates a session with the waiting player
    ///   as White and this one as Black, then starts it
    pub async fn join(
        &mut self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<JoinOutcome, SessionError> {
        if let Some(binding) = self.store.lookup(player_id) {
            let handle = self
                .store
                .handle(binding.session_id)
                .ok_or(SessionError::NotFound(binding.session_id))?;
            handle.rejoin(binding.color).await?;
            return Ok(JoinOutcome::Rejoined {
                session_id: binding.session_id,
                color: binding.color,
            });
        }

        match self.waiting.take() {
            Some(white) if white.player_id != player_id => {
                let session_id = self.store.create_session();
                if let Err(err) = self.pair(session_id, &white, player_id, sender).await {
                    let _ = self.store.destroy_session(session_id).await;
                    // Pairing never happened, so the first player keeps waiting.
                    self.waiting = Some(white);
                    return Err(err);
                }
                tracing::info!(%session_id, black = %player_id, "players matched");
                Ok(JoinOutcome::Matched { session_id })
            }
            _ => {
                let _ = sender.send(ServerEvent::Assigned {
                    color: Color::White,
                });
                let _ = sender.send(status(WAITING_MESSAGE));
                self.waiting = Some(WaitingPlayer { player_id, sender });
                tracing::info!(%player_id, "player waiting");
                Ok(JoinOutcome::Waiting)
            }
        }
    }

    async fn pair(
        &mut self,
        session_id: SessionId,
        white: &WaitingPlayer,
        black: PlayerId,
        sender: PlayerSender,
    ) -> Result<(), SessionError> {
        self.store
            .bind(white.player_id, session_id, Color::White, white.sender.clone())
            .await?;
        self.store
            .bind(black, session_id, Color::Black, sender)
            .await?;
        self.store
            .handle(session_id)
            .ok_or(SessionError::NotFound(session_id))?
            .start()
            .await
    }

    /// Cleans up after a lost connection.
    ///
    /// Clears the waiting slot if this player held it. Otherwise destroys
    /// the player's session, which unbinds the opponent as well. Returns
    /// the destroyed session, if any.
    pub async fn disconnect(&mut self, player_id: PlayerId) -> Option<SessionId> {
        if self
            .waiting
            .as_ref()
            .is_some_and(|w| w.player_id == player_id)
        {
            self.waiting = None;
            tracing::info!(%player_id, "waiting player left");
            return None;
        }

        let binding = self.store.lookup(player_id)?;
        // Only fails if the session is already gone.
        let _ = self.store.destroy_session(binding.session_id).await;
        tracing::info!(%player_id, session_id = %binding.session_id, "participant disconnected");
        Some(binding.session_id)
    }

    /// The session and color `player_id` plays, if bound.
    pub fn lookup(&self, player_id: PlayerId) -> Option<(SessionHandle, Color)> {
        self.store.resolve(player_id)
    }

    pub fn waiting_player(&self) -> Option<PlayerId> {
        self.waiting.as_ref().map(|w| w.player_id)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}

impl Default for MatchmakingService {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
