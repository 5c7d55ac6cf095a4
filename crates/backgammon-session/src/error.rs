//! Error types for the session layer.

use backgammon_engine::MoveError;
use backgammon_protocol::{PlayerId, SessionId};

/// A rejected game action. The `Display` text goes to the caller as a
/// `status` event and nothing else changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The caller has no session binding.
    #[error("Not in a game.")]
    NotInSession,

    #[error("Not your turn.")]
    NotYourTurn,

    #[error("Roll dice first.")]
    MustRollFirst,

    #[error("You already rolled this turn.")]
    AlreadyRolled,

    #[error("Nothing to undo.")]
    NothingToUndo,

    /// The rules engine refused the move.
    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Infrastructure failures in the session layer.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session does not exist (never created, or already destroyed).
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The player already holds a binding to another session.
    #[error("player {0} already bound to session {1}")]
    AlreadyBound(PlayerId, SessionId),

    /// The session actor's command channel is closed.
    #[error("session {0} is unavailable")]
    Unavailable(SessionId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_error_display_texts() {
        assert_eq!(GameError::NotInSession.to_string(), "Not in a game.");
        assert_eq!(GameError::NotYourTurn.to_string(), "Not your turn.");
        assert_eq!(GameError::MustRollFirst.to_string(), "Roll dice first.");
        assert_eq!(
            GameError::AlreadyRolled.to_string(),
            "You already rolled this turn."
        );
        assert_eq!(GameError::NothingToUndo.to_string(), "Nothing to undo.");
    }

    #[test]
    fn test_game_error_move_is_transparent() {
        let err = GameError::from(MoveError::Blocked);
        assert_eq!(err.to_string(), "Blocked.");
    }
}
