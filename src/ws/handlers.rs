//! WebSocket message dispatch
//!
//! Connection setup resolves the streamer and loads its data; after that every
//! client message is applied to the connection's own `GameSession`.

use crate::game::GameSession;
use crate::loader::expected_paths;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;

/// Resolve the streamer for a new connection and start its session.
///
/// On failure returns the message to send before closing the socket.
pub async fn open_session(
    state: &AppState,
    requested: Option<&str>,
) -> Result<(String, GameSession), ServerMessage> {
    let streamer = match state.config.resolve_streamer(requested) {
        Ok(name) => name.to_string(),
        Err(e) => {
            tracing::warn!("Rejecting connection: {}", e);
            return Err(ServerMessage::error("CONFIGURATION_ERROR", e.to_string()));
        }
    };

    match state.get_corpus(&streamer).await {
        Ok(corpus) => Ok((streamer, GameSession::new(&corpus))),
        Err(e) => {
            tracing::error!("Failed to load data for {}: {}", streamer, e);
            Err(ServerMessage::LoadFailed {
                expected: expected_paths(&streamer),
                streamer,
                msg: e.to_string(),
            })
        }
    }
}

/// Handle client messages and return optional response
pub fn handle_message(msg: ClientMessage, session: &mut GameSession) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Select { slot } => match session.select_slot(slot) {
            Ok(Some(reveal)) => {
                tracing::debug!(
                    "Slot {} picked, correct={}, streak={}",
                    slot,
                    reveal.correct,
                    session.streak()
                );
                Some(ServerMessage::from_view(&session.view()))
            }
            Ok(None) => {
                tracing::debug!("Ignoring selection outside of an open round");
                None
            }
            Err(e) => Some(ServerMessage::error("INVALID_SLOT", e.to_string())),
        },

        ClientMessage::NextRound => match session.next_round() {
            Ok(_) => Some(ServerMessage::from_view(&session.view())),
            Err(e) => Some(ServerMessage::error("NOT_ANSWERED", e.to_string())),
        },

        ClientMessage::ResetGame => {
            session.reset_game();
            tracing::debug!("Game reset, {} AI messages back in play", session.active_len());
            Some(ServerMessage::from_view(&session.view()))
        }
    }
}
