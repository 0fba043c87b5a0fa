use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum NotificationVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub form_id: Uuid,
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
    pub issued_at: DateTime<Utc>,
}

impl Notification {
    pub fn booked(form_id: Uuid) -> Self {
        Self::new(
            form_id,
            "Parcel Booked",
            "Your parcel has been successfully booked.",
            NotificationVariant::Default,
        )
    }

    pub fn booking_failed(form_id: Uuid) -> Self {
        Self::new(
            form_id,
            "Error",
            "Failed to book the parcel. Please try again.",
            NotificationVariant::Destructive,
        )
    }

    pub fn not_signed_in(form_id: Uuid) -> Self {
        Self::new(
            form_id,
            "Not signed in",
            "Please sign in to book a parcel.",
            NotificationVariant::Destructive,
        )
    }

    fn new(form_id: Uuid, title: &str, description: &str, variant: NotificationVariant) -> Self {
        Self {
            form_id,
            title: title.to_string(),
            description: description.to_string(),
            variant,
            issued_at: Utc::now(),
        }
    }
}
