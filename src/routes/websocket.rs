use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{stream::SplitStream, SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    core::{engine, MAX_MESSAGE_BYTES, CITY_CATALOG},
    models::{ClientMessage, ServerMessage},
    state::AppState,
};

/// WebSocket endpoint carrying the whole game protocol
///
/// Every game event (create-room, join-room, make-move) arrives as a
/// tagged JSON text frame on this connection; replies go back on the same
/// socket and accepted moves fan out through the room's broadcast channel.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one client connection until either side hangs up
async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4().to_string();
    tracing::info!("WebSocket connected: connection={}", connection_id);

    let (mut ws_sender, ws_receiver) = socket.split();

    // Single writer per socket: direct replies and room broadcasts both
    // funnel through this channel, which keeps frame ordering sane
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();

    let mut send_task = tokio::spawn(async move {
        while let Some(text) = out_rx.recv().await {
            if ws_sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let conn = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        handle_messages(ws_receiver, out_tx, conn, state).await;
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    tracing::info!("WebSocket closed: connection={}", connection_id);
}

/// Read client frames and dispatch parsed messages
async fn handle_messages(
    mut receiver: SplitStream<WebSocket>,
    out_tx: mpsc::UnboundedSender<String>,
    connection_id: String,
    state: AppState,
) {
    // Forwarding tasks for rooms this connection has entered
    let mut room_tasks: Vec<JoinHandle<()>> = Vec::new();

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => {
                if text.len() > MAX_MESSAGE_BYTES {
                    tracing::warn!(
                        "Frame too large from connection={}: {} bytes",
                        connection_id,
                        text.len()
                    );
                    continue;
                }

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(message) => {
                        dispatch(message, &out_tx, &connection_id, &state, &mut room_tasks).await;
                    }
                    Err(err) => {
                        tracing::debug!(
                            "Dropping unparseable frame from connection={}: {}",
                            connection_id,
                            err
                        );
                    }
                }
            }
            Message::Close(_) => {
                tracing::debug!("Close frame from connection={}", connection_id);
                break;
            }
            Message::Ping(_) | Message::Pong(_) => {
                // Axum answers WebSocket pings automatically
            }
            Message::Binary(_) => {
                tracing::warn!("Unexpected binary frame from connection={}", connection_id);
            }
        }
    }

    for task in room_tasks {
        task.abort();
    }
}

/// Apply one client message against the registry
async fn dispatch(
    message: ClientMessage,
    out_tx: &mpsc::UnboundedSender<String>,
    connection_id: &str,
    state: &AppState,
    room_tasks: &mut Vec<JoinHandle<()>>,
) {
    match message {
        ClientMessage::CreateRoom => {
            let mut registry = state.registry.write().await;
            let room_id = registry.create_room(connection_id.to_string());
            let broadcast_rx = registry
                .get_room(&room_id)
                .map(|session| session.broadcast_tx.subscribe());
            drop(registry);

            tracing::info!("Room {} created by connection={}", room_id, connection_id);

            send(out_tx, &ServerMessage::RoomCreated { room_id, player_id: 0 });
            if let Some(rx) = broadcast_rx {
                room_tasks.push(forward_broadcasts(rx, out_tx.clone()));
            }
        }
        ClientMessage::JoinRoom { room_id } => {
            let mut registry = state.registry.write().await;
            match registry.join_room(&room_id, connection_id.to_string()) {
                Ok(player_id) => {
                    // Subscribe before game-start goes out so the joiner
                    // receives it along with the creator
                    let broadcast_rx = registry.get_room(&room_id).map(|session| {
                        let rx = session.broadcast_tx.subscribe();
                        session.broadcast(&ServerMessage::GameStart);
                        rx
                    });
                    drop(registry);

                    tracing::info!(
                        "Room {} joined by connection={}, game starting",
                        room_id,
                        connection_id
                    );

                    send(out_tx, &ServerMessage::RoomJoined { player_id });
                    if let Some(rx) = broadcast_rx {
                        room_tasks.push(forward_broadcasts(rx, out_tx.clone()));
                    }
                }
                Err(err) => {
                    drop(registry);
                    tracing::debug!(
                        "Join of room {} by connection={} failed: {:?}",
                        room_id,
                        connection_id,
                        err
                    );
                    send(
                        out_tx,
                        &ServerMessage::JoinFailed {
                            error: err.to_string(),
                        },
                    );
                }
            }
        }
        ClientMessage::MakeMove {
            room_id,
            city,
            player_id,
        } => {
            let mut registry = state.registry.write().await;
            let Some(session) = registry.get_room_mut(&room_id) else {
                // Unknown room: silent drop, matching out-of-turn handling
                tracing::debug!(
                    "Move for unknown room {} from connection={}",
                    room_id,
                    connection_id
                );
                return;
            };

            match engine::submit_move(session, player_id, &city, &CITY_CATALOG) {
                Ok(accepted) => {
                    session.broadcast(&ServerMessage::Move {
                        city: accepted.city,
                        player_id: accepted.player_index,
                        next_turn: accepted.next_turn,
                    });
                }
                Err(err) if err.is_silent() => {
                    tracing::debug!(
                        "Out-of-turn move dropped: room={} claimed_player={}",
                        room_id,
                        player_id
                    );
                }
                Err(err) => {
                    send(
                        out_tx,
                        &ServerMessage::Error {
                            message: err.to_string(),
                        },
                    );
                }
            }
        }
    }
}

/// Queue a direct reply for this connection
fn send(out_tx: &mpsc::UnboundedSender<String>, message: &ServerMessage) {
    if let Ok(text) = serde_json::to_string(message) {
        let _ = out_tx.send(text);
    }
}

/// Pump room broadcasts into this connection's outgoing queue
fn forward_broadcasts(
    mut rx: broadcast::Receiver<String>,
    out_tx: mpsc::UnboundedSender<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(text) => {
                    if out_tx.send(text).is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Broadcast receiver lagged, skipped {} messages", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
