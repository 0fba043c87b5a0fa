use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::collaborators::{BookingApi, BroadcastNotifier, FixedSession};
use crate::form::controller::{BookingFormController, ValidationMode};
use crate::models::notification::Notification;
use crate::models::session::Session;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub forms: DashMap<Uuid, Arc<BookingFormController>>,
    pub notifications_tx: broadcast::Sender<Notification>,
    pub booking_api: Arc<dyn BookingApi>,
    pub validation_mode: ValidationMode,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        booking_api: Arc<dyn BookingApi>,
        validation_mode: ValidationMode,
        notification_buffer_size: usize,
    ) -> Self {
        let (notifications_tx, _unused_rx) = broadcast::channel(notification_buffer_size);

        Self {
            forms: DashMap::new(),
            notifications_tx,
            booking_api,
            validation_mode,
            metrics: Metrics::new(),
        }
    }

    /// Creates a fresh form for one visitor and registers it.
    pub fn mount_form(&self, session: Option<Session>) -> Arc<BookingFormController> {
        let form = Arc::new(BookingFormController::new(
            self.validation_mode,
            Arc::new(FixedSession::new(session)),
            Arc::new(BroadcastNotifier::new(self.notifications_tx.clone())),
            self.booking_api.clone(),
        ));

        self.forms.insert(form.id(), form.clone());
        self.metrics.forms_mounted.set(self.forms.len() as i64);
        form
    }

    pub fn form(&self, id: &Uuid) -> Option<Arc<BookingFormController>> {
        self.forms.get(id).map(|entry| entry.value().clone())
    }

    pub fn unmount_form(&self, id: &Uuid) -> bool {
        let removed = self.forms.remove(id).is_some();
        self.metrics.forms_mounted.set(self.forms.len() as i64);
        removed
    }
}
