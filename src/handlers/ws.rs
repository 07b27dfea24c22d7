//! Real-time suggestion gateway over WebSocket.
//!
//! One connection serves one client; frames are JSON messages tagged by
//! `type`. A malformed frame produces an `error` frame and keeps the
//! connection open. Disconnecting resets the session that was last used on
//! the connection.

use crate::catalog::Suggestion;
use crate::state::AppState;
use crate::suggest::SuggestionEngine;
use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Submit {
        session_id: String,
        text: String,
    },
    Feed {
        session_id: String,
        delta: String,
    },
    Reset {
        session_id: String,
    },
    Ping {
        #[allow(dead_code)]
        session_id: Option<String>,
        timestamp: Option<Value>,
    },
}

impl ClientMessage {
    fn session_id(&self) -> Option<&str> {
        match self {
            ClientMessage::Submit { session_id, .. }
            | ClientMessage::Feed { session_id, .. }
            | ClientMessage::Reset { session_id } => Some(session_id),
            ClientMessage::Ping { .. } => None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Suggestions {
        session_id: String,
        suggestions: Vec<Suggestion>,
    },
    Pong {
        timestamp: Option<Value>,
    },
    Error {
        error: String,
    },
}

/// Apply one protocol message to the engine. `reset` has no reply frame.
pub fn dispatch(engine: &SuggestionEngine, message: ClientMessage) -> Option<ServerMessage> {
    match message {
        ClientMessage::Submit { session_id, text } => {
            let suggestions = engine.submit(&text, &session_id);
            Some(ServerMessage::Suggestions {
                session_id,
                suggestions,
            })
        }
        ClientMessage::Feed { session_id, delta } => {
            let suggestions = engine.feed(&delta, &session_id);
            Some(ServerMessage::Suggestions {
                session_id,
                suggestions,
            })
        }
        ClientMessage::Reset { session_id } => {
            engine.reset(&session_id);
            None
        }
        ClientMessage::Ping { timestamp, .. } => Some(ServerMessage::Pong { timestamp }),
    }
}

/// GET /ws/suggest - Upgrade to the suggestion protocol.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    tracing::info!("WebSocket client connected");
    let mut last_session: Option<String> = None;

    while let Some(frame) = socket.recv().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!(error = %e, "WebSocket receive error");
                break;
            }
        };
        let text = match frame {
            Message::Text(text) => text,
            Message::Close(_) => break,
            // pings/pongs are handled by the protocol layer
            _ => continue,
        };

        metrics::counter!("ws_messages_total").increment(1);

        let reply = match serde_json::from_str::<ClientMessage>(&text) {
            Ok(message) => {
                if let Some(session_id) = message.session_id() {
                    last_session = Some(session_id.to_string());
                }
                dispatch(&state.engine(), message)
            }
            Err(e) => Some(ServerMessage::Error {
                error: format!("Malformed message: {}", e),
            }),
        };

        if let Some(reply) = reply {
            let payload = match serde_json::to_string(&reply) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize reply frame");
                    continue;
                }
            };
            if socket.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    }

    if let Some(session_id) = last_session.take() {
        state.engine().reset(&session_id);
        tracing::info!(session_id = %session_id, "WebSocket client disconnected");
    } else {
        tracing::info!("WebSocket client disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ToolSpec;
    use crate::suggest::EngineOptions;

    fn engine() -> SuggestionEngine {
        SuggestionEngine::new(
            vec![ToolSpec::new("export_csv", "Export data to CSV format")
                .with_keywords(["export", "csv"])],
            EngineOptions::default(),
        )
        .unwrap()
    }

    fn parse(raw: &str) -> ClientMessage {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn submit_yields_a_suggestions_frame() {
        let engine = engine();
        let reply = dispatch(
            &engine,
            parse(r#"{"type":"submit","session_id":"s1","text":"export data to csv"}"#),
        )
        .unwrap();
        match reply {
            ServerMessage::Suggestions {
                session_id,
                suggestions,
            } => {
                assert_eq!(session_id, "s1");
                assert_eq!(suggestions[0].id, "export_csv");
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn feed_appends_and_replies() {
        let engine = engine();
        dispatch(
            &engine,
            parse(r#"{"type":"feed","session_id":"s1","delta":"exp"}"#),
        );
        let reply = dispatch(
            &engine,
            parse(r#"{"type":"feed","session_id":"s1","delta":"ort"}"#),
        )
        .unwrap();
        assert_eq!(engine.session_buffer("s1").as_deref(), Some("export"));
        assert!(matches!(reply, ServerMessage::Suggestions { .. }));
    }

    #[test]
    fn reset_is_silent() {
        let engine = engine();
        engine.feed("export", "s1");
        let reply = dispatch(&engine, parse(r#"{"type":"reset","session_id":"s1"}"#));
        assert!(reply.is_none());
        assert!(engine.session_buffer("s1").is_none());
    }

    #[test]
    fn ping_echoes_the_timestamp() {
        let engine = engine();
        let reply = dispatch(
            &engine,
            parse(r#"{"type":"ping","session_id":"s1","timestamp":1234}"#),
        )
        .unwrap();
        match reply {
            ServerMessage::Pong { timestamp } => {
                assert_eq!(timestamp, Some(serde_json::json!(1234)));
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn unknown_type_fails_to_parse() {
        let result = serde_json::from_str::<ClientMessage>(r#"{"type":"nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn frames_serialize_with_stable_field_names() {
        let frame = ServerMessage::Suggestions {
            session_id: "s1".to_string(),
            suggestions: Vec::new(),
        };
        let json: Value = serde_json::from_str(&serde_json::to_string(&frame).unwrap()).unwrap();
        assert_eq!(json["type"], "suggestions");
        assert_eq!(json["session_id"], "s1");
        assert!(json["suggestions"].is_array());
    }
}
