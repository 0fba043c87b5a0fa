//! Seams between the booking form and the world around it.
//!
//! The form controller never reaches for ambient state: the signed-in user,
//! the toast channel and the booking backend are all handed to it when the
//! form is mounted.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::SubmissionError;
use crate::models::booking::BookingPayload;
use crate::models::notification::Notification;
use crate::models::session::Session;

pub trait SessionProvider: Send + Sync {
    /// The signed-in user, or `None` when nobody is authenticated.
    fn current_session(&self) -> Option<Session>;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Creates the booking. Any 2xx response is success; the body is ignored.
    async fn create_booking(&self, payload: &BookingPayload) -> Result<(), SubmissionError>;
}

/// Session captured once at mount time.
#[derive(Debug, Clone, Default)]
pub struct FixedSession(Option<Session>);

impl FixedSession {
    pub fn new(session: Option<Session>) -> Self {
        Self(session)
    }
}

impl SessionProvider for FixedSession {
    fn current_session(&self) -> Option<Session> {
        self.0.clone()
    }
}

/// Fans notifications out to every websocket subscriber.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(tx: broadcast::Sender<Notification>) -> Self {
        Self { tx }
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, notification: Notification) {
        let form_id = notification.form_id;
        if self.tx.send(notification).is_err() {
            debug!(form_id = %form_id, "notification dropped: no subscribers");
        }
    }
}
