//! WebSocket command channel: `GET /ws?instance=<id>[:<app>]`
//!
//! One reader loop per socket processes messages strictly in receipt order;
//! a separate writer task drains the outbound queue, so replies to one
//! socket keep the order their actions arrived in.

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::HeaderMap,
    response::Response,
};
use futures::{SinkExt, StreamExt};
use sdui::ActionError;
use sdui_types::InstanceAddress;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::raw_instance;
use crate::connections::Outbound;
use crate::state::ServerState;

const OUTBOUND_CAPACITY: usize = 64;

#[derive(Debug, Default, Deserialize)]
pub struct SocketParams {
    pub instance: Option<String>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<ServerState>,
    Query(params): Query<SocketParams>,
    headers: HeaderMap,
) -> Response {
    // The URL names the socket's instance; the header is only a fallback.
    let raw = match params.instance.filter(|i| !i.is_empty()) {
        Some(instance) => instance,
        None => raw_instance(&headers, None),
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, raw))
}

async fn handle_socket(socket: WebSocket, state: ServerState, raw: String) {
    let address = InstanceAddress::parse(&raw);
    state.dispatcher.sessions().resolve(&address).await;

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Outbound>(OUTBOUND_CAPACITY);
    let connection_id = state.connections.register(&raw, tx.clone()).await;
    info!("WebSocket connected: {} (connection {})", raw, connection_id);

    let writer = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            let result = match outbound {
                Outbound::Commands(commands) => match serde_json::to_string(&commands) {
                    Ok(json) => ws_tx.send(Message::Text(json)).await,
                    Err(e) => {
                        error!("Failed to serialize commands: {}", e);
                        continue;
                    }
                },
                Outbound::Close { code, reason } => {
                    let frame = CloseFrame {
                        code,
                        reason: reason.into(),
                    };
                    let _ = ws_tx.send(Message::Close(Some(frame))).await;
                    break;
                }
            };
            if result.is_err() {
                break;
            }
        }
    });

    while let Some(message) = ws_rx.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(_)) => {
                let warn = ActionError::MalformedMessage("binary frames are not supported".into())
                    .into_command();
                if tx.send(Outbound::Commands(vec![warn])).await.is_err() {
                    break;
                }
                continue;
            }
            // The protocol layer already answers pings.
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                warn!("WebSocket error for {}: {}", raw, e);
                break;
            }
        };

        let commands = state.dispatcher.dispatch_message(&address, &text).await;
        debug!("Replying to {} with {} command(s)", raw, commands.len());
        if tx.send(Outbound::Commands(commands)).await.is_err() {
            break;
        }
    }

    state.connections.deregister(&raw, connection_id).await;
    drop(tx);
    let _ = writer.await;
    info!("WebSocket disconnected: {} (connection {})", raw, connection_id);
}
