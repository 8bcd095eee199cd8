use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::checker;
use crate::config::ServerConfig;
use crate::daily::{self, DailyPlacement};
use crate::data::{
    ConflictResult, DailyAvailability, Day, EntryId, FacultyId, SlotIndex, Snapshot, TimetableEntry,
};
use crate::error::{Error, Result};
use crate::grid;
use crate::solver;
use crate::substitution::{self, RankedFaculty, SlotRef};
use crate::workload::{self, FacultyWorkload};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub entries: Vec<TimetableEntry>,
    pub conflicts: ConflictResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckRequest {
    entries: Vec<TimetableEntry>,
    snapshot: Snapshot,
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloneRequest {
    date: String,
    #[serde(default)]
    day: Option<Day>,
    snapshot: Snapshot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubstitutesRequest {
    target: SlotRef,
    #[serde(default)]
    availability: Vec<DailyAvailability>,
    #[serde(default)]
    daily_schedule: Vec<TimetableEntry>,
    snapshot: Snapshot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkloadRequest {
    entries: Vec<TimetableEntry>,
    snapshot: Snapshot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AbsenceRequest {
    daily: Vec<TimetableEntry>,
    faculty_id: FacultyId,
    /// Absent for this period only; the whole day when omitted.
    #[serde(default)]
    slot_index: Option<SlotIndex>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceResponse {
    pub entries: Vec<TimetableEntry>,
    pub removed: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyPlaceRequest {
    daily: Vec<TimetableEntry>,
    date: String,
    #[serde(default)]
    day: Option<Day>,
    placement: DailyPlacement,
    snapshot: Snapshot,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResizeRequest {
    entries: Vec<TimetableEntry>,
    total_slots: SlotIndex,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeResponse {
    pub entries: Vec<TimetableEntry>,
    pub total_slots: SlotIndex,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManualEntryRequest {
    entries: Vec<TimetableEntry>,
    entry: TimetableEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryRequest {
    entries: Vec<TimetableEntry>,
    id: EntryId,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLockResponse {
    pub entries: Vec<TimetableEntry>,
    pub is_locked: bool,
}

fn resolve_day(date: &str, day: Option<Day>) -> Result<Day> {
    match day {
        Some(day) => Ok(day),
        None => daily::weekday_for_date(date),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn generate_handler(Json(snapshot): Json<Snapshot>) -> Json<GenerateResponse> {
    let entries = solver::generate(&snapshot);
    let conflicts = checker::check(&entries, &snapshot, None);
    Json(GenerateResponse { entries, conflicts })
}

async fn check_handler(Json(request): Json<CheckRequest>) -> Json<ConflictResult> {
    Json(checker::check(
        &request.entries,
        &request.snapshot,
        request.date.as_deref(),
    ))
}

async fn clone_handler(
    Json(request): Json<CloneRequest>,
) -> std::result::Result<Json<Vec<TimetableEntry>>, ApiError> {
    let day = resolve_day(&request.date, request.day)?;
    Ok(Json(daily::clone_master(&request.date, day, &request.snapshot)))
}

async fn substitutes_handler(Json(request): Json<SubstitutesRequest>) -> Json<Vec<RankedFaculty>> {
    Json(substitution::rank_substitutes(
        &request.target,
        &request.availability,
        &request.daily_schedule,
        &request.snapshot,
    ))
}

async fn workload_handler(Json(request): Json<WorkloadRequest>) -> Json<Vec<FacultyWorkload>> {
    Json(workload::faculty_workload(&request.entries, &request.snapshot))
}

async fn absence_handler(Json(request): Json<AbsenceRequest>) -> Json<AbsenceResponse> {
    let mut entries = request.daily;
    let removed = match request.slot_index {
        Some(slot) => daily::mark_unavailable_slot(&mut entries, &request.faculty_id, slot),
        None => daily::mark_absent(&mut entries, &request.faculty_id),
    };
    Json(AbsenceResponse { entries, removed })
}

async fn daily_place_handler(
    Json(request): Json<DailyPlaceRequest>,
) -> std::result::Result<Json<Vec<TimetableEntry>>, ApiError> {
    let day = resolve_day(&request.date, request.day)?;
    let mut entries = request.daily;
    daily::place_daily_entry(&mut entries, day, request.placement, &request.snapshot);
    Ok(Json(entries))
}

async fn resize_handler(Json(request): Json<ResizeRequest>) -> Json<ResizeResponse> {
    let mut entries = request.entries;
    let total_slots = grid::resize_grid(&mut entries, request.total_slots);
    Json(ResizeResponse {
        entries,
        total_slots,
    })
}

async fn manual_entry_handler(Json(request): Json<ManualEntryRequest>) -> Json<Vec<TimetableEntry>> {
    let mut entries = request.entries;
    grid::place_manual_entry(&mut entries, request.entry);
    Json(entries)
}

async fn toggle_lock_handler(
    Json(request): Json<EntryRequest>,
) -> std::result::Result<Json<ToggleLockResponse>, ApiError> {
    let mut entries = request.entries;
    let is_locked = grid::toggle_lock(&mut entries, &request.id)
        .ok_or_else(|| ApiError::not_found(format!("no entry with id {}", request.id)))?;
    Ok(Json(ToggleLockResponse { entries, is_locked }))
}

async fn remove_entry_handler(
    Json(request): Json<EntryRequest>,
) -> std::result::Result<Json<Vec<TimetableEntry>>, ApiError> {
    let mut entries = request.entries;
    if !grid::remove_entry(&mut entries, &request.id) {
        return Err(ApiError::not_found(format!("no entry with id {}", request.id)));
    }
    Ok(Json(entries))
}

/// Every request carries its own snapshot, so handlers share no state.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/timetable/generate", post(generate_handler))
        .route("/v1/timetable/check", post(check_handler))
        .route("/v1/daily/clone", post(clone_handler))
        .route("/v1/daily/substitutes", post(substitutes_handler))
        .route("/v1/daily/absence", post(absence_handler))
        .route("/v1/daily/place", post(daily_place_handler))
        .route("/v1/master/resize", post(resize_handler))
        .route("/v1/master/place", post(manual_entry_handler))
        .route("/v1/master/toggle-lock", post(toggle_lock_handler))
        .route("/v1/master/remove", post(remove_entry_handler))
        .route("/v1/faculty/workload", post(workload_handler))
}

pub async fn run_server(config: &ServerConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router()).await?;
    Ok(())
}
