//! WebSocket streaming of published routes and countries.
use crate::publisher::Published;
use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use serde::Serialize;
use std::sync::Arc;
use travelsmart_core::{RouteSet, VisitedCountrySet};

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StreamMessage<'a> {
    Routes(&'a Published<RouteSet>),
    Countries(&'a Published<VisitedCountrySet>),
}

/// Handler for WebSocket connections.
pub async fn stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

fn encode(message: &StreamMessage<'_>) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(text) => Some(text),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to encode stream message");
            None
        }
    }
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut routes_rx = state.subscribe_routes();
    let mut countries_rx = state.subscribe_countries();

    // Current values first, so a fresh client can render immediately.
    let initial = [
        encode(&StreamMessage::Routes(&routes_rx.borrow_and_update())),
        encode(&StreamMessage::Countries(&countries_rx.borrow_and_update())),
    ];
    for text in initial.into_iter().flatten() {
        if socket.send(Message::Text(text)).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }
            changed = routes_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let text = encode(&StreamMessage::Routes(&routes_rx.borrow_and_update()));
                if let Some(text) = text {
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
            }
            changed = countries_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let text = encode(&StreamMessage::Countries(&countries_rx.borrow_and_update()));
                if let Some(text) = text {
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    tracing::debug!("Stream client disconnected");
}
