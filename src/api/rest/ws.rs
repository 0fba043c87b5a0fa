use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct WsParams {
    /// Only forward notifications for this form. All forms when absent.
    pub form_id: Option<Uuid>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, params.form_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, form_id: Option<Uuid>) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.notifications_tx.subscribe();

    info!(form_id = ?form_id, "notification client connected");

    let send_task = tokio::spawn(async move {
        loop {
            let notification = match rx.recv().await {
                Ok(notification) => notification,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "notification client lagging; messages dropped");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            if form_id.is_some_and(|id| id != notification.form_id) {
                continue;
            }

            let json = match serde_json::to_string(&notification) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize notification for ws");
                    continue;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    close_on_first(send_task, recv_task).await;

    info!(form_id = ?form_id, "notification client disconnected");
}

/// Waits for either half of the connection to finish and aborts the other.
async fn close_on_first(mut send_task: JoinHandle<()>, mut recv_task: JoinHandle<()>) {
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::oneshot;

    use super::close_on_first;

    #[tokio::test]
    async fn finished_half_aborts_the_other() {
        let (held_tx, held_rx) = oneshot::channel::<()>();
        let pending = tokio::spawn(async move {
            let _held = held_tx;
            std::future::pending::<()>().await;
        });
        let finished = tokio::spawn(async {});

        close_on_first(pending, finished).await;

        assert!(held_rx.await.is_err());
    }
}
