//! Game sessions for the backgammon server.
//!
//! Each session runs as an isolated Tokio task (actor model) that owns its
//! board and dice. The [`MatchmakingService`] pairs players and indexes
//! who plays where; [`dispatch()`] is the turn-guard policy a session applies
//! to every action.
//!
//! # Key types
//!
//! - [`MatchmakingService`] — waiting slot + session store; join/disconnect
//! - [`SessionStore`] — creates/destroys sessions, tracks bindings
//! - [`SessionHandle`] — send commands to a running session actor
//! - [`Command`] — a game action from a bound participant
//! - [`GameError`] — why an action was rejected

mod actor;
mod config;
mod dispatch;
mod error;
mod matchmaker;
mod store;

pub use actor::{PlayerSender, SessionHandle};
pub use config::{DEFAULT_COMMAND_CHANNEL_SIZE, SessionConfig};
pub use dispatch::{Command, MATCHED_MESSAGE, Outbound, WAITING_MESSAGE, dispatch, win_message};
pub use error::{GameError, SessionError};
pub use matchmaker::{JoinOutcome, MatchmakingService};
pub use store::{Binding, SessionStore};
