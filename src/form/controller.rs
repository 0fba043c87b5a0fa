use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::collaborators::{BookingApi, Notifier, SessionProvider};
use crate::engine::pricing::{price_for_input, price_for_weight};
use crate::engine::schedule::approximate_delivery_date;
use crate::engine::validation::{validate_field, validate_form, FieldErrors};
use crate::error::AppError;
use crate::models::booking::{BookingFormInput, BookingPayload, FormField};
use crate::models::notification::Notification;

/// When field edits are checked against their rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Quiet until the first submit attempt, then every edit is re-checked.
    #[default]
    OnSubmit,
    OnChange,
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on_submit" | "onsubmit" => Ok(ValidationMode::OnSubmit),
            "on_change" | "onchange" => Ok(ValidationMode::OnChange),
            other => Err(format!(
                "unknown validation mode: {other}, expected on_submit/on_change"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Booked { payload: BookingPayload },
    Failed,
    Invalid { errors: FieldErrors },
    /// A submission for this form was already in flight.
    Suppressed,
    Unauthenticated,
}

impl SubmitOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            SubmitOutcome::Booked { .. } => "booked",
            SubmitOutcome::Failed => "failed",
            SubmitOutcome::Invalid { .. } => "invalid",
            SubmitOutcome::Suppressed => "suppressed",
            SubmitOutcome::Unauthenticated => "unauthenticated",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub values: BookingFormInput,
    pub errors: FieldErrors,
    pub price: u32,
    pub submitting: bool,
}

#[derive(Debug, Default)]
struct FormState {
    input: BookingFormInput,
    errors: FieldErrors,
    price: u32,
    submit_attempted: bool,
}

/// Holds the form's in-flight flag for one submit attempt and clears it on
/// drop, so the form returns to Idle even when the attempt is abandoned.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    form_id: Uuid,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, form_id: Uuid) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag,
                form_id,
                settled: false,
            })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(form_id = %self.form_id, "submit abandoned before it settled");
        }
        self.flag.store(false, Ordering::Release);
    }
}

pub struct BookingFormController {
    id: Uuid,
    mode: ValidationMode,
    session: Arc<dyn SessionProvider>,
    notifier: Arc<dyn Notifier>,
    api: Arc<dyn BookingApi>,
    state: Mutex<FormState>,
    submitting: AtomicBool,
}

impl BookingFormController {
    pub fn new(
        mode: ValidationMode,
        session: Arc<dyn SessionProvider>,
        notifier: Arc<dyn Notifier>,
        api: Arc<dyn BookingApi>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            session,
            notifier,
            api,
            state: Mutex::new(FormState::default()),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn view(&self) -> FormView {
        let state = self.state.lock().await;
        self.snapshot(&state)
    }

    /// Replaces the text of a field. The date field is set through
    /// [`Self::set_delivery_date`].
    pub async fn set_text(
        &self,
        field: FormField,
        value: impl Into<String>,
    ) -> Result<FormView, AppError> {
        let mut state = self.state.lock().await;
        let slot = state
            .input
            .text_mut(field)
            .ok_or_else(|| AppError::BadRequest(format!("{field} is not a text field")))?;
        *slot = value.into();

        self.after_edit(&mut state, field);
        Ok(self.snapshot(&state))
    }

    pub async fn set_delivery_date(&self, date: Option<NaiveDate>) -> FormView {
        let mut state = self.state.lock().await;
        state.input.delivery_date = date;

        self.after_edit(&mut state, FormField::DeliveryDate);
        self.snapshot(&state)
    }

    /// Runs one submit attempt to completion. The form lock is released while
    /// the backend call is pending; the in-flight flag keeps a second attempt
    /// from sending another request in the meantime.
    pub async fn submit(&self) -> SubmitOutcome {
        let (payload, mut in_flight) = {
            let mut state = self.state.lock().await;
            let Some(mut in_flight) = InFlight::acquire(&self.submitting, self.id) else {
                debug!(form_id = %self.id, "submit ignored: already submitting");
                return SubmitOutcome::Suppressed;
            };

            state.submit_attempted = true;
            let booking = match validate_form(&state.input) {
                Ok(booking) => booking,
                Err(errors) => {
                    debug!(
                        form_id = %self.id,
                        invalid_fields = errors.len(),
                        "submit blocked by validation"
                    );
                    state.errors = errors.clone();
                    in_flight.settled = true;
                    return SubmitOutcome::Invalid { errors };
                }
            };
            state.errors.clear();

            let Some(session) = self.session.current_session() else {
                warn!(form_id = %self.id, "submit blocked: no session");
                self.notifier.notify(Notification::not_signed_in(self.id));
                in_flight.settled = true;
                return SubmitOutcome::Unauthenticated;
            };

            let price = price_for_weight(booking.parcel_weight);
            state.price = price;

            let approximate = approximate_delivery_date(booking.delivery_date);
            let payload = BookingPayload::assemble(&session.user, booking, price, approximate);
            (payload, in_flight)
        };

        info!(form_id = %self.id, price = payload.price, "submitting booking");
        let result = self.api.create_booking(&payload).await;

        let mut state = self.state.lock().await;
        let outcome = match result {
            Ok(()) => {
                *state = FormState::default();
                self.notifier.notify(Notification::booked(self.id));
                info!(form_id = %self.id, "parcel booked");
                SubmitOutcome::Booked { payload }
            }
            Err(err) => {
                self.notifier.notify(Notification::booking_failed(self.id));
                warn!(form_id = %self.id, error = %err, "booking submission failed");
                SubmitOutcome::Failed
            }
        };
        in_flight.settled = true;

        outcome
    }

    fn after_edit(&self, state: &mut FormState, field: FormField) {
        if field == FormField::ParcelWeight {
            state.price = price_for_input(&state.input.parcel_weight);
        }

        if self.mode == ValidationMode::OnChange || state.submit_attempted {
            let result = validate_field(&state.input, field);
            state.errors.record(field, result);
        }
    }

    fn snapshot(&self, state: &FormState) -> FormView {
        let user = self.session.current_session().map(|session| session.user);

        FormView {
            id: self.id,
            user_name: user.as_ref().map(|u| u.name.clone()).unwrap_or_default(),
            user_email: user.map(|u| u.email).unwrap_or_default(),
            values: state.input.clone(),
            errors: state.errors.clone(),
            price: state.price,
            submitting: self.submitting.load(Ordering::Acquire),
        }
    }
}
