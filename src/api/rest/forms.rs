use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Html;
use axum::routing::{get, patch, post};
use axum::{Form, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::engine::pricing::price_for_input;
use crate::error::AppError;
use crate::form::controller::{BookingFormController, FormView, SubmitOutcome};
use crate::form::render::{render_form, READ_ONLY_INPUTS};
use crate::models::booking::FormField;
use crate::models::notification::Notification;
use crate::models::session::{Session, SessionUser};
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/forms", post(mount_form))
        .route("/forms/:id", get(get_form).delete(unmount_form))
        .route("/forms/:id/fields", patch(update_fields))
        .route("/forms/:id/submit", post(submit_form))
        .route("/forms/:id/book", post(book_from_form))
        .route("/forms/:id/render", get(render))
        .route("/price", get(quote_price))
}

#[derive(Deserialize)]
pub struct FieldEdit {
    pub field: String,
    pub value: String,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub outcome: SubmitOutcome,
    pub form: FormView,
}

#[derive(Deserialize)]
pub struct PriceQuery {
    pub weight: Option<String>,
}

#[derive(Serialize)]
pub struct PriceQuote {
    pub weight: String,
    pub price: u32,
}

enum ParsedEdit {
    Text(FormField, String),
    Date(Option<NaiveDate>),
}

async fn mount_form(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<FormView> {
    let session = session_from_headers(&headers);
    let signed_in = session.is_some();
    let form = state.mount_form(session);

    info!(form_id = %form.id(), signed_in, "booking form mounted");
    Json(form.view().await)
}

async fn get_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FormView>, AppError> {
    let form = lookup(&state, &id)?;
    Ok(Json(form.view().await))
}

async fn unmount_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.unmount_form(&id) {
        return Err(AppError::NotFound(format!("form {} not found", id)));
    }

    info!(form_id = %id, "booking form unmounted");
    Ok(StatusCode::NO_CONTENT)
}

async fn update_fields(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(edits): Json<Vec<FieldEdit>>,
) -> Result<Json<FormView>, AppError> {
    let form = lookup(&state, &id)?;

    // Reject the whole batch before touching the form if any edit is malformed.
    let parsed = edits
        .into_iter()
        .map(parse_edit)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(apply_edits(&form, parsed).await?))
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let form = lookup(&state, &id)?;
    let (status, outcome) = submit_recorded(&state, &form).await;

    let form = form.view().await;
    Ok((status, Json(SubmitResponse { outcome, form })))
}

/// Target of the rendered form: applies the posted inputs, submits, and
/// answers with the re-rendered form carrying the outcome as a notice.
async fn book_from_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(inputs): Form<Vec<(String, String)>>,
) -> Result<(StatusCode, Html<String>), AppError> {
    let form = lookup(&state, &id)?;

    let parsed = inputs
        .into_iter()
        .filter(|(name, _)| !READ_ONLY_INPUTS.contains(&name.as_str()))
        .map(|(field, value)| parse_edit(FieldEdit { field, value }))
        .collect::<Result<Vec<_>, _>>()?;
    apply_edits(&form, parsed).await?;

    let (status, outcome) = submit_recorded(&state, &form).await;
    let notice = match outcome {
        SubmitOutcome::Booked { .. } => Some(Notification::booked(id)),
        SubmitOutcome::Failed => Some(Notification::booking_failed(id)),
        SubmitOutcome::Unauthenticated => Some(Notification::not_signed_in(id)),
        SubmitOutcome::Invalid { .. } | SubmitOutcome::Suppressed => None,
    };

    let view = form.view().await;
    Ok((status, Html(render_form(&view, notice.as_ref()))))
}

async fn render(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let form = lookup(&state, &id)?;
    Ok(Html(render_form(&form.view().await, None)))
}

async fn quote_price(Query(query): Query<PriceQuery>) -> Json<PriceQuote> {
    let weight = query.weight.unwrap_or_default();
    let price = price_for_input(&weight);
    Json(PriceQuote { weight, price })
}

fn lookup(state: &AppState, id: &Uuid) -> Result<Arc<BookingFormController>, AppError> {
    state
        .form(id)
        .ok_or_else(|| AppError::NotFound(format!("form {} not found", id)))
}

async fn apply_edits(
    form: &BookingFormController,
    edits: Vec<ParsedEdit>,
) -> Result<FormView, AppError> {
    let mut view = form.view().await;
    for edit in edits {
        view = match edit {
            ParsedEdit::Text(field, value) => form.set_text(field, value).await?,
            ParsedEdit::Date(date) => form.set_delivery_date(date).await,
        };
    }
    Ok(view)
}

async fn submit_recorded(
    state: &AppState,
    form: &BookingFormController,
) -> (StatusCode, SubmitOutcome) {
    let start = Instant::now();
    let outcome = form.submit().await;
    state
        .metrics
        .record_submission(outcome.label(), start.elapsed().as_secs_f64());

    let status = match &outcome {
        SubmitOutcome::Booked { .. } => StatusCode::OK,
        SubmitOutcome::Failed => StatusCode::BAD_GATEWAY,
        SubmitOutcome::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitOutcome::Suppressed => StatusCode::CONFLICT,
        SubmitOutcome::Unauthenticated => StatusCode::UNAUTHORIZED,
    };
    (status, outcome)
}

fn parse_edit(edit: FieldEdit) -> Result<ParsedEdit, AppError> {
    let field = edit.field.parse::<FormField>().map_err(AppError::BadRequest)?;

    if field != FormField::DeliveryDate {
        return Ok(ParsedEdit::Text(field, edit.value));
    }

    let raw = edit.value.trim();
    if raw.is_empty() {
        return Ok(ParsedEdit::Date(None));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| ParsedEdit::Date(Some(date)))
        .map_err(|err| AppError::BadRequest(format!("invalid deliveryDate {raw:?}: {err}")))
}

/// Reads the signed-in user forwarded by the auth proxy. All three headers
/// must be present and non-empty, otherwise the visitor has no session.
pub fn session_from_headers(headers: &HeaderMap) -> Option<Session> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    Some(Session {
        user: SessionUser {
            id: header(USER_ID_HEADER)?,
            name: header(USER_NAME_HEADER)?,
            email: header(USER_EMAIL_HEADER)?,
        },
    })
}
