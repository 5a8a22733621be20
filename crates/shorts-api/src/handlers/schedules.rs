//! Schedule handlers.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use shorts_models::{Schedule, ScheduleFrequency};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ScheduleListQuery {
    #[serde(default)]
    pub active: bool,
}

/// GET /api/schedules
pub async fn list_schedules(
    State(state): State<AppState>,
    Query(query): Query<ScheduleListQuery>,
) -> ApiResult<Json<Vec<Schedule>>> {
    let schedules = state.store.list_schedules(query.active).await?;
    Ok(Json(schedules))
}

/// Creation request. `name` and `frequency` are required.
#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    pub name: String,
    pub frequency: ScheduleFrequency,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub script_source: Option<String>,
    #[serde(default)]
    pub auto_upload: bool,
}

/// Creation response.
#[derive(Serialize)]
pub struct CreateScheduleResponse {
    pub schedule_id: String,
    pub message: String,
}

/// POST /api/schedules/create
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(request): Json<CreateScheduleRequest>,
) -> ApiResult<Json<CreateScheduleResponse>> {
    if request.name.trim().is_empty() {
        return Err(ApiError::validation("Schedule name is required"));
    }

    let mut schedule = Schedule::new(request.name.trim(), request.frequency);
    schedule.time = request.time;
    schedule.days = request.days;
    schedule.script_source = request.script_source;
    schedule.auto_upload = request.auto_upload;

    state.store.create_schedule(&schedule).await?;

    Ok(Json(CreateScheduleResponse {
        schedule_id: schedule.id,
        message: "Schedule created successfully".to_string(),
    }))
}
