use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::modules::auth::service::Claims;
use crate::modules::impact::entities::impact::EntityType;
use crate::modules::verifications::entities::verification::{self, TaskKind, TaskStatus};
use crate::modules::verifications::repository::VerificationRepository;
use crate::modules::verifications::service::{CreateTaskInput, VerificationService};
use crate::shared::{
    error::{AppError, AppResult},
    policy::{self, Action},
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub kind: TaskKind,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub due_date: chrono::NaiveDateTime,
    pub assigned_to: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TaskStatus,
}

#[derive(Deserialize)]
pub struct AddEvidenceRequest {
    pub evidence: String,
}

#[derive(Deserialize)]
pub struct ListTasksQuery {
    pub entity_type: EntityType,
    pub entity_id: i32,
}

#[derive(Serialize)]
pub struct TaskResponse {
    pub id: i32,
    pub kind: TaskKind,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub status: TaskStatus,
    pub due_date: chrono::NaiveDateTime,
    pub evidence: Vec<String>,
    pub assigned_to: Option<i32>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<verification::Model> for TaskResponse {
    fn from(task: verification::Model) -> Self {
        let evidence = task.evidence_list();
        Self {
            id: task.id,
            kind: task.kind,
            entity_type: task.entity_type,
            entity_id: task.entity_id,
            status: task.status,
            due_date: task.due_date,
            evidence,
            assigned_to: task.assigned_to,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

fn task_repo(state: &AppState) -> AppResult<&Arc<dyn VerificationRepository>> {
    state
        .repo_manager
        .get::<Arc<dyn VerificationRepository>>()
        .ok_or(AppError::InternalServerError(
            "VerificationRepository not registered".to_string(),
        ))
}

pub async fn create_task(
    State(state): State<AppState>,
    claims: Claims,
    Json(req): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<TaskResponse>)> {
    policy::require(&claims.role, Action::CreateVerification)?;

    let task = VerificationService::create(
        task_repo(&state)?.as_ref(),
        state.repo_manager.as_ref(),
        CreateTaskInput {
            kind: req.kind,
            entity_type: req.entity_type,
            entity_id: req.entity_id,
            due_date: req.due_date,
            assigned_to: req.assigned_to,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task.into())))
}

pub async fn get_task(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<i32>,
) -> AppResult<Json<TaskResponse>> {
    let task = task_repo(&state)?
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(task.into()))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    _claims: Claims,
    Query(query): Query<ListTasksQuery>,
) -> AppResult<Json<Vec<TaskResponse>>> {
    let tasks = task_repo(&state)?
        .list_for_entity(query.entity_type, query.entity_id)
        .await?;
    Ok(Json(tasks.into_iter().map(Into::into).collect()))
}

pub async fn update_status(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<Json<TaskResponse>> {
    policy::require(&claims.role, Action::UpdateVerification)?;

    let task =
        VerificationService::update_status(task_repo(&state)?.as_ref(), id, req.status).await?;
    Ok(Json(task.into()))
}

pub async fn add_evidence(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(req): Json<AddEvidenceRequest>,
) -> AppResult<Json<TaskResponse>> {
    policy::require(&claims.role, Action::AddEvidence)?;

    let task =
        VerificationService::add_evidence(task_repo(&state)?.as_ref(), id, req.evidence).await?;
    Ok(Json(task.into()))
}
