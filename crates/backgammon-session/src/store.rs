//! Session store: owns every live session and the player → session index.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use backgammon_protocol::{Color, PlayerId, SessionId};

use crate::actor::spawn_session;
use crate::{PlayerSender, SessionConfig, SessionError, SessionHandle};

/// Counter for generating unique session IDs.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Which session a player belongs to, and as which color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub session_id: SessionId,
    pub color: Color,
}

/// All live sessions, plus the binding of each paired player.
///
/// A player is bound to at most one session, and every binding points at
/// a session that still exists: [`destroy_session`](Self::destroy_session)
/// removes the session and its bindings together.
pub struct SessionStore {
    sessions: HashMap<SessionId, SessionHandle>,
    bindings: HashMap<PlayerId, Binding>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            bindings: HashMap::new(),
            config,
        }
    }

    /// Spawns a session on the opening position and returns its ID.
    pub fn create_session(&mut self) -> SessionId {
        let session_id = SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed));
        let handle = spawn_session(session_id, &self.config);
        self.sessions.insert(session_id, handle);
        tracing::info!(%session_id, "session created");
        session_id
    }

    /// Binds `player_id` to `color` in a session and hands the session the
    /// player's outbound channel.
    pub async fn bind(
        &mut self,
        player_id: PlayerId,
        session_id: SessionId,
        color: Color,
        sender: PlayerSender,
    ) -> Result<(), SessionError> {
        if let Some(existing) = self.bindings.get(&player_id) {
            return Err(SessionError::AlreadyBound(player_id, existing.session_id));
        }
        let handle = self
            .sessions
            .get(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;

        handle.seat(color, sender).await?;
        self.bindings
            .insert(player_id, Binding { session_id, color });
        tracing::debug!(%player_id, %session_id, %color, "player bound");
        Ok(())
    }

    /// Removes a single binding. The session itself is left running.
    pub fn unbind(&mut self, player_id: PlayerId) -> Option<Binding> {
        self.bindings.remove(&player_id)
    }

    pub fn lookup(&self, player_id: PlayerId) -> Option<Binding> {
        self.bindings.get(&player_id).copied()
    }

    /// The session a player is bound to, with the player's color.
    pub fn resolve(&self, player_id: PlayerId) -> Option<(SessionHandle, Color)> {
        let binding = self.lookup(player_id)?;
        let handle = self.sessions.get(&binding.session_id)?;
        Some((handle.clone(), binding.color))
    }

    pub fn handle(&self, session_id: SessionId) -> Option<&SessionHandle> {
        self.sessions.get(&session_id)
    }

    /// Shuts a session down and removes every binding that pointed at it.
    pub async fn destroy_session(&mut self, session_id: SessionId) -> Result<(), SessionError> {
        let handle = self
            .sessions
            .remove(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;

        self.bindings.retain(|_, b| b.session_id != session_id);
        let _ = handle.shutdown().await;

        tracing::info!(%session_id, "session destroyed");
        Ok(())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
