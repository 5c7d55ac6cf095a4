//! Turn-guarded event dispatch.
//!
//! [`dispatch`] is the whole policy of a running session: it checks the
//! caller against the turn and roll state, runs the engine, and says who
//! should hear about the result. It never touches a channel, so the actor
//! stays a thin loop and the policy is testable without a runtime.

use backgammon_engine::{BoardState, Snapshot, roll_dice, rules};
use backgammon_protocol::{Color, Destination, Recipient, ServerEvent};
use rand::Rng;

use crate::GameError;

/// Sent to the first participant while nobody else is waiting.
pub const WAITING_MESSAGE: &str = "Waiting for opponent…";

/// Sent to both participants when a session starts.
pub const MATCHED_MESSAGE: &str = "Matched ✅";

/// An event as it leaves a session, carrying the board snapshot.
pub type Outbound = ServerEvent<Snapshot>;

/// A game action from a bound participant. `join` is handled by the
/// matchmaker and never reaches a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Roll,
    SelectSource { source: Destination },
    Move { source: Destination, dest: Destination },
    EndTurn,
    Undo,
}

pub(crate) fn status(msg: impl Into<String>) -> Outbound {
    ServerEvent::Status { msg: msg.into() }
}

pub(crate) fn state(board: &BoardState) -> Outbound {
    ServerEvent::State {
        state: board.snapshot(),
    }
}

/// The text announced to both participants when `color` bears off its last
/// checker.
pub fn win_message(color: Color) -> String {
    format!("{} wins! 🎉", color.name())
}

/// Applies `command` for the participant playing `caller`.
///
/// A rejected command produces exactly one `status` event for the caller
/// and leaves the board as it was. Accepted commands broadcast the new
/// state, except `select-source`, which answers the caller alone.
pub fn dispatch<R: Rng + ?Sized>(
    board: &mut BoardState,
    caller: Color,
    command: Command,
    rng: &mut R,
) -> Vec<(Recipient, Outbound)> {
    match try_dispatch(board, caller, command, rng) {
        Ok(events) => events,
        Err(err) => {
            tracing::debug!(%caller, ?command, %err, "command rejected");
            vec![(Recipient::Only(caller), status(err.to_string()))]
        }
    }
}

fn try_dispatch<R: Rng + ?Sized>(
    board: &mut BoardState,
    caller: Color,
    command: Command,
    rng: &mut R,
) -> Result<Vec<(Recipient, Outbound)>, GameError> {
    if board.turn != caller {
        return Err(GameError::NotYourTurn);
    }

    match command {
        Command::Roll => {
            if board.rolled {
                return Err(GameError::AlreadyRolled);
            }
            board.record_roll(roll_dice(rng));
            Ok(vec![(Recipient::All, state(board))])
        }
        Command::SelectSource { source } => {
            require_roll(board)?;
            let targets = rules::legal_targets(board, caller, source);
            Ok(vec![(
                Recipient::Only(caller),
                ServerEvent::SelectResult { source, targets },
            )])
        }
        Command::Move { source, dest } => {
            require_roll(board)?;
            rules::apply_move(board, caller, source, dest)?;

            let mut events = Vec::with_capacity(2);
            if board.has_won(caller) {
                tracing::info!(winner = %caller, "game won");
                events.push((Recipient::All, status(win_message(caller))));
            }
            events.push((Recipient::All, state(board)));
            Ok(events)
        }
        Command::EndTurn => {
            board.end_turn();
            Ok(vec![(Recipient::All, state(board))])
        }
        Command::Undo => {
            if !board.undo() {
                return Err(GameError::NothingToUndo);
            }
            Ok(vec![(Recipient::All, state(board))])
        }
    }
}

fn require_roll(board: &BoardState) -> Result<(), GameError> {
    if board.rolled {
        Ok(())
    } else {
        Err(GameError::MustRollFirst)
    }
}
