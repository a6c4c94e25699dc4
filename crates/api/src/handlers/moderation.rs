//! Handlers for the moderation console.
//!
//! Editable fields are writable in any state; status changes go
//! through the state machine, with a repeat of the current status
//! treated as an idempotent no-op.

use axum::extract::{Path, State};
use axum::Json;
use vitrine_core::error::CoreError;
use vitrine_core::moderation::ModerationStatus;
use vitrine_core::types::DbId;
use vitrine_db::models::moderation::{ModerationRecord, UpsertModerationRecord};
use vitrine_db::repositories::ModerationRepo;
use vitrine_events::StudioEvent;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/moderation/subjects
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ModerationRecord>>>> {
    let records = ModerationRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/moderation/subjects/{subject_id}
pub async fn get_by_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ModerationRecord>>> {
    let record = ModerationRepo::find_by_subject(&state.pool, subject_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Moderation record",
            id: subject_id,
        }))?;
    Ok(Json(DataResponse { data: record }))
}

/// PUT /api/v1/moderation/subjects/{subject_id}
///
/// Upserts the editable fields (bio, handles, caption, notes) without
/// touching the review status. The record is created lazily on first
/// write.
pub async fn upsert(
    State(state): State<AppState>,
    Path(subject_id): Path<DbId>,
    Json(input): Json<UpsertModerationRecord>,
) -> AppResult<Json<DataResponse<ModerationRecord>>> {
    let record = ModerationRepo::upsert_fields(&state.pool, subject_id, &input).await?;
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/moderation/subjects/{subject_id}/approve
pub async fn approve(
    State(state): State<AppState>,
    Path(subject_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ModerationRecord>>> {
    let (record, changed) = transition(&state, subject_id, ModerationStatus::Approved).await?;
    if changed {
        state.event_bus.publish(
            StudioEvent::new("subject.approved").with_source("moderation_subject", subject_id),
        );
    }
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/moderation/subjects/{subject_id}/reject
pub async fn reject(
    State(state): State<AppState>,
    Path(subject_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ModerationRecord>>> {
    let (record, changed) = transition(&state, subject_id, ModerationStatus::Rejected).await?;
    if changed {
        state.event_bus.publish(
            StudioEvent::new("subject.rejected").with_source("moderation_subject", subject_id),
        );
    }
    Ok(Json(DataResponse { data: record }))
}

/// Drive a status transition, mapping a refused write to either an
/// idempotent repeat (the record is already at the target) or a state
/// conflict. The returned flag says whether the row actually changed.
async fn transition(
    state: &AppState,
    subject_id: DbId,
    to: ModerationStatus,
) -> AppResult<(ModerationRecord, bool)> {
    if let Some(record) = ModerationRepo::set_status(&state.pool, subject_id, to).await? {
        return Ok((record, true));
    }

    // The guarded update matched nothing; inspect the row to say why.
    let record = ModerationRepo::find_by_subject(&state.pool, subject_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!(
                "Moderation record for subject {subject_id} missing after status write"
            ))
        })?;
    let current = record.status_kind()?;

    if current == to {
        return Ok((record, false));
    }
    match current.transition(to) {
        // The row changed between our UPDATE and this read.
        Ok(_) => Err(AppError::Core(CoreError::Conflict(format!(
            "Moderation status for subject {subject_id} changed concurrently, retry"
        )))),
        Err(e) => Err(AppError::Core(e)),
    }
}
