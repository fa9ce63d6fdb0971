pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::SessionId;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Streamer whose chat the game is played on
    pub name: Option<String>,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!("WebSocket connection request: name={:?}", params.name);

    ws.on_upgrade(move |socket| handle_socket(socket, params, state))
}

/// Send a message as JSON text; false means the connection should close
async fn send_json<S, T>(sender: &mut S, msg: &T) -> bool
where
    S: futures::Sink<Message> + Unpin,
    T: Serialize,
{
    match serde_json::to_string(msg) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to serialize message: {}", e);
            false
        }
    }
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, params: WsQuery, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let session_id: SessionId = ulid::Ulid::new().to_string();

    let (streamer, mut session) = match handlers::open_session(&state, params.name.as_deref()).await
    {
        Ok(opened) => opened,
        Err(msg) => {
            send_json(&mut sender, &msg).await;
            let _ = sender.send(Message::Close(None)).await;
            return;
        }
    };

    tracing::info!("Session {} started for {}", session_id, streamer);

    if !send_json(&mut sender, &ServerMessage::welcome(&streamer)).await
        || !send_json(&mut sender, &ServerMessage::from_view(&session.view())).await
    {
        tracing::error!("Failed to send welcome message");
        return;
    }

    while let Some(ws_msg) = receiver.next().await {
        match ws_msg {
            Ok(Message::Text(text)) => {
                tracing::debug!("Received message: {}", text);

                let response = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => handlers::handle_message(client_msg, &mut session),
                    Err(e) => {
                        tracing::error!("Failed to parse client message: {}", e);
                        Some(ServerMessage::error(
                            "PARSE_ERROR",
                            format!("Invalid message format: {}", e),
                        ))
                    }
                };

                if let Some(response) = response {
                    if !send_json(&mut sender, &response).await {
                        tracing::error!("Failed to send response");
                        break;
                    }
                }
            }
            Ok(Message::Close(_)) => {
                tracing::info!("WebSocket closed");
                break;
            }
            Ok(Message::Ping(data)) => {
                if sender.send(Message::Pong(data)).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
        }
    }

    tracing::info!(
        "Session {} for {} ended after {} rounds (best streak {})",
        session_id,
        streamer,
        session.round_no(),
        session.best_streak()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not representable"))
        }
    }

    #[tokio::test]
    async fn test_send_json_writes_text_frame() {
        let (mut tx, mut rx) = mpsc::unbounded::<Message>();

        assert!(send_json(&mut tx, &ServerMessage::error("X", "y")).await);
        match rx.next().await {
            Some(Message::Text(text)) => {
                let json: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
                assert_eq!(json["t"], "error");
                assert_eq!(json["code"], "X");
            }
            other => panic!("Expected text frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_json_serialize_failure_closes() {
        let (mut tx, mut rx) = mpsc::unbounded::<Message>();

        assert!(!send_json(&mut tx, &Unserializable).await);
        drop(tx);
        assert!(rx.next().await.is_none());
    }

    #[tokio::test]
    async fn test_send_json_closed_sink() {
        let (mut tx, rx) = mpsc::unbounded::<Message>();
        drop(rx);

        assert!(!send_json(&mut tx, &ServerMessage::error("X", "y")).await);
    }
}
