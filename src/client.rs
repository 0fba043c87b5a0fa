use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::collaborators::BookingApi;
use crate::error::{AppError, SubmissionError};
use crate::models::booking::BookingPayload;

pub const CREATE_BOOKING_PATH: &str = "/api/parcel/create";

pub struct HttpBookingApi {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBookingApi {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|err| AppError::Internal(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), CREATE_BOOKING_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn create_booking(&self, payload: &BookingPayload) -> Result<(), SubmissionError> {
        let response = self.client.post(&self.endpoint).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::Status(status.as_u16()));
        }

        debug!(status = status.as_u16(), endpoint = %self.endpoint, "booking accepted");
        Ok(())
    }
}
