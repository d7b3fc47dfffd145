use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::{ClientMessage, ServerMessage},
    services::room_service,
    state::{SharedState, room::ClientTx},
};

/// Handle the full lifecycle of a game client's WebSocket connection.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let connection = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerMessage>();
    let (control_tx, mut control_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        loop {
            let frame = tokio::select! {
                Some(message) = outbound_rx.recv() => match encode(&message) {
                    Some(frame) => frame,
                    None => continue,
                },
                Some(frame) = control_rx.recv() => frame,
                else => break,
            };
            if sender.send(frame).await.is_err() {
                break;
            }
        }
    });

    info!(%connection, "client connected");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                debug!(%connection, payload = %text, "received client message");
                match ClientMessage::from_json_str(&text) {
                    Ok(message) => room_service::dispatch(&state, connection, &outbound_tx, message),
                    Err(err) => {
                        warn!(%connection, error = %err, "failed to parse or validate client message");
                    }
                }
            }
            Ok(Message::Ping(payload)) => {
                let _ = control_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(%connection, "client closed");
                let _ = control_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(%connection, error = %err, "websocket error");
                break;
            }
        }
    }

    room_service::remove_connection(&state, connection);
    info!(%connection, "client disconnected");

    finalize(writer_task, outbound_tx, control_tx).await;
}

/// Serialize an outbound message into a text frame.
///
/// Serialization failure is a bug rather than a transport problem, so the
/// message is logged and skipped instead of tearing the connection down.
fn encode(message: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(message) {
        Ok(payload) => Some(Message::Text(payload.into())),
        Err(err) => {
            warn!(error = %err, "failed to serialize message `{message:?}`");
            None
        }
    }
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(
    writer_task: JoinHandle<()>,
    outbound_tx: ClientTx,
    control_tx: mpsc::UnboundedSender<Message>,
) {
    drop(outbound_tx);
    drop(control_tx);
    let _ = writer_task.await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_tagged_text_frames() {
        let frame = encode(&ServerMessage::error("room `x` not found")).unwrap();
        match frame {
            Message::Text(text) => assert_eq!(
                text.as_str(),
                r#"{"event":"error","data":{"message":"room `x` not found"}}"#
            ),
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}
