//! Per-connection handler: frame decoding and event routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The task multiplexes with `select!`:
//!   - inbound frames from the browser, decoded into `ClientEvent`s
//!   - outbound events pushed by the matchmaker or the player's session
//!   - a heartbeat that pings the peer and drops it once it goes quiet
//!
//! When the task ends for any reason, a drop guard runs the disconnect
//! cleanup.

use std::sync::Arc;

use backgammon_protocol::{ClientEvent, Codec, PlayerId, ServerEvent};
use backgammon_session::{Command, GameError, Outbound};
use backgammon_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::BackgammonError;
use crate::server::ServerState;

/// Drop guard that removes a player from matchmaking and from its session
/// when the handler exits.
///
/// `Drop` is synchronous, so the async cleanup is spawned as a
/// fire-and-forget task.
struct LobbyGuard<C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for LobbyGuard<C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut lobby = state.lobby.lock().await;
            lobby.disconnect(player_id).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), BackgammonError> {
    let conn_id = conn.id();
    // A connection is a participant: a reconnecting browser is a new one.
    let player_id = PlayerId(conn_id.into_inner());
    tracing::info!(%conn_id, %player_id, "player connected");

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Outbound>();
    let _guard = LobbyGuard {
        player_id,
        state: Arc::clone(&state),
    };

    let mut deadline = state.idle_timeout.map(|t| Instant::now() + t);
    let mut heartbeat =
        tokio::time::interval_at(Instant::now() + state.ping_interval, state.ping_interval);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            inbound = conn.recv() => {
                let data = match inbound {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%player_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "recv error");
                        break;
                    }
                };
                if let Some(timeout) = state.idle_timeout {
                    deadline = Some(Instant::now() + timeout);
                }
                handle_frame(&state, player_id, &outbound_tx, &data).await;
            }
            Some(event) = outbound_rx.recv() => {
                let text = state.codec.encode(&event)?;
                conn.send(&text).await?;
            }
            _ = heartbeat.tick() => {
                if conn.last_heard().elapsed() > state.ping_timeout {
                    tracing::info!(%player_id, "no answer to pings, closing");
                    // A dead peer may never drain the close frame.
                    let _ = tokio::time::timeout(state.ping_interval, conn.close()).await;
                    break;
                }
                conn.ping().await?;
            }
            () = idle(deadline) => {
                tracing::info!(%player_id, "connection idle, closing");
                let _ = conn.close().await;
                break;
            }
        }
    }

    // _guard drops here → disconnect cleanup fires.
    Ok(())
}

/// Resolves at `deadline`, or never when there is none.
async fn idle(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Decodes one frame and routes it. Every problem the player can cause is
/// answered with a `status` event on the player's own channel.
async fn handle_frame<C: Codec>(
    state: &ServerState<C>,
    player_id: PlayerId,
    outbound: &mpsc::UnboundedSender<Outbound>,
    data: &[u8],
) {
    let event: ClientEvent = match state.codec.decode(data) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(%player_id, error = %e, "failed to decode event");
            reply(outbound, format!("invalid message: {e}"));
            return;
        }
    };

    let command = match event {
        ClientEvent::Join => {
            // The lock is held across the join so pairing is atomic.
            let result = state
                .lobby
                .lock()
                .await
                .join(player_id, outbound.clone())
                .await;
            match result {
                Ok(outcome) => tracing::debug!(%player_id, ?outcome, "join handled"),
                Err(e) => {
                    tracing::warn!(%player_id, error = %e, "join failed");
                    reply(outbound, e.to_string());
                }
            }
            return;
        }
        ClientEvent::Roll => Command::Roll,
        ClientEvent::SelectSource { source } => Command::SelectSource { source },
        ClientEvent::Move { source, dest } => Command::Move { source, dest },
        ClientEvent::EndTurn => Command::EndTurn,
        ClientEvent::Undo => Command::Undo,
    };

    // Resolve under the lock, submit after releasing it.
    let target = state.lobby.lock().await.lookup(player_id);
    let submitted = match target {
        Some((session, color)) => session.submit(color, command).await.is_ok(),
        None => false,
    };
    if !submitted {
        tracing::debug!(%player_id, ?command, "event from unbound player");
        reply(outbound, GameError::NotInSession.to_string());
    }
}

fn reply(outbound: &mpsc::UnboundedSender<Outbound>, msg: String) {
    let _ = outbound.send(ServerEvent::Status { msg });
}
