//! Intake wizard API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::dto::{
    parse_toggle, parse_update, AppendPhotosRequest, FieldPathError, SelectDaysRequest, SessionView,
    StartSessionRequest, ToggleFieldRequest, UpdateFieldRequest,
};
use crate::application::services::IntakeError;
use crate::domain::value_objects::SessionId;
use crate::infrastructure::device_sensor::{DeviceFixReport, ReportedFixSensor};
use crate::infrastructure::state::AppState;

type RouteResult<T> = Result<T, (StatusCode, String)>;

fn parse_session_id(id: &str) -> RouteResult<SessionId> {
    Uuid::parse_str(id)
        .map(SessionId::from_uuid)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid session ID".to_string()))
}

fn intake_error(e: IntakeError) -> (StatusCode, String) {
    let status = match e {
        IntakeError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        IntakeError::CaptureInProgress(_)
        | IntakeError::SubmissionInProgress(_)
        | IntakeError::NotAtFinalStep(_) => StatusCode::CONFLICT,
    };
    (status, e.to_string())
}

fn field_error(e: FieldPathError) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

/// Open a new wizard
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartSessionRequest>,
) -> (StatusCode, Json<SessionView>) {
    let view = state.intake_service.start(req.flow).await;
    (StatusCode::CREATED, Json(view))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> RouteResult<Json<SessionView>> {
    let session_id = parse_session_id(&id)?;
    state
        .intake_service
        .view(session_id)
        .await
        .map(Json)
        .map_err(intake_error)
}

/// Abandon a wizard and its draft
pub async fn discard_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> RouteResult<StatusCode> {
    let session_id = parse_session_id(&id)?;
    state
        .intake_service
        .discard(session_id)
        .await
        .map_err(intake_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_field(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateFieldRequest>,
) -> RouteResult<Json<SessionView>> {
    let session_id = parse_session_id(&id)?;
    let update = parse_update(&req.path, req.value).map_err(field_error)?;
    state
        .intake_service
        .update_field(session_id, update)
        .await
        .map(Json)
        .map_err(intake_error)
}

pub async fn toggle_field(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ToggleFieldRequest>,
) -> RouteResult<Json<SessionView>> {
    let session_id = parse_session_id(&id)?;
    let day = parse_toggle(&req.path).map_err(field_error)?;
    state
        .intake_service
        .toggle_day(session_id, day)
        .await
        .map(Json)
        .map_err(intake_error)
}

pub async fn select_days(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SelectDaysRequest>,
) -> RouteResult<Json<SessionView>> {
    let session_id = parse_session_id(&id)?;
    state
        .intake_service
        .select_days(session_id, req.preset)
        .await
        .map(Json)
        .map_err(intake_error)
}

pub async fn append_photos(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AppendPhotosRequest>,
) -> RouteResult<Json<SessionView>> {
    let session_id = parse_session_id(&id)?;
    state
        .intake_service
        .append_photos(session_id, req.references)
        .await
        .map(Json)
        .map_err(intake_error)
}

/// "Next"; submits when on the final step
pub async fn advance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> RouteResult<Json<SessionView>> {
    let session_id = parse_session_id(&id)?;
    state
        .intake_service
        .advance(session_id)
        .await
        .map(Json)
        .map_err(intake_error)
}

pub async fn retreat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> RouteResult<Json<SessionView>> {
    let session_id = parse_session_id(&id)?;
    state
        .intake_service
        .retreat(session_id)
        .await
        .map(Json)
        .map_err(intake_error)
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> RouteResult<Json<SessionView>> {
    let session_id = parse_session_id(&id)?;
    state
        .intake_service
        .submit(session_id)
        .await
        .map(Json)
        .map_err(intake_error)
}

/// Feed the device's position report through location capture
pub async fn capture_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(report): Json<DeviceFixReport>,
) -> RouteResult<Json<SessionView>> {
    let session_id = parse_session_id(&id)?;
    let sensor = ReportedFixSensor::new(report);
    state
        .intake_service
        .capture_location(session_id, &sensor)
        .await
        .map(Json)
        .map_err(intake_error)
}
