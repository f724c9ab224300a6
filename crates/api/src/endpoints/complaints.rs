//! Complaint endpoints.

#![allow(missing_docs)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware::from_fn_with_state,
    routing::{delete, get, patch},
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use yellowshield_common::{AppError, AppResult};
use yellowshield_core::{
    Category, ComplaintFilter, ComplaintRole, ComplaintStats, ComplaintStatus,
    CreateComplaintInput,
};
use yellowshield_db::entities::complaint;

use crate::{
    extractors::{AdminGuard, AppJson, JsonOrDefault, MaybeSession, Session},
    middleware::AppState,
    rate_limit::{RateLimiterState, rate_limit_lookup_middleware},
    response::{Created, CsvFile, MessageResponse},
};

/// Shown in status lookups before a reviewer has responded.
const NO_UPDATES: &str = "No updates yet";

/// Complaint as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    pub id: String,
    #[serde(rename = "_id")]
    pub legacy_id: String,
    pub name: String,
    /// Withheld for anonymous complaints.
    pub role: Option<ComplaintRole>,
    pub department: String,
    pub category: Category,
    pub description: String,
    pub is_anonymous: bool,
    pub has_attachment: bool,
    pub user_id: Option<String>,
    pub status: ComplaintStatus,
    pub admin_response: Option<String>,
    pub date: DateTime<FixedOffset>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl From<complaint::Model> for ComplaintResponse {
    fn from(c: complaint::Model) -> Self {
        Self {
            legacy_id: c.id.clone(),
            name: c.visible_name().to_string(),
            role: c.visible_role(),
            id: c.id,
            department: c.department,
            category: c.category,
            description: c.description,
            is_anonymous: c.is_anonymous,
            has_attachment: c.has_attachment,
            user_id: c.user_id,
            status: c.status,
            admin_response: c.admin_response,
            date: c.date,
            updated_at: c.updated_at,
        }
    }
}

/// Public status projection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub id: String,
    #[serde(rename = "_id")]
    pub legacy_id: String,
    pub status: ComplaintStatus,
    pub category: Category,
    pub date: DateTime<FixedOffset>,
    pub admin_response: String,
}

impl From<complaint::Model> for StatusResponse {
    fn from(c: complaint::Model) -> Self {
        Self {
            legacy_id: c.id.clone(),
            id: c.id,
            status: c.status,
            category: c.category,
            date: c.date,
            admin_response: c
                .admin_response
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| NO_UPDATES.to_string()),
        }
    }
}

/// Create complaint request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub has_attachment: bool,
    pub user_id: Option<String>,
}

/// Dashboard filter query.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> AppResult<ComplaintFilter> {
        let status = match non_blank(self.status.as_deref()) {
            Some(label) => Some(
                ComplaintStatus::parse(label)
                    .ok_or_else(|| AppError::BadRequest(format!("Invalid status: {label}")))?,
            ),
            None => None,
        };
        let category = match non_blank(self.category.as_deref()) {
            Some(label) => Some(
                Category::parse(label)
                    .ok_or_else(|| AppError::BadRequest(format!("Invalid category: {label}")))?,
            ),
            None => None,
        };

        Ok(ComplaintFilter {
            status,
            category,
            search: non_blank(self.search.as_deref()).map(ToString::to_string),
        })
    }
}

/// Respond request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    #[serde(default)]
    pub admin_response: Option<String>,
}

/// History query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub user_id: Option<String>,
}

/// Clear history request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearHistoryRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Clear history response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearHistoryResponse {
    pub message: String,
    pub deleted: u64,
}

/// File a complaint.
async fn create(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    AppJson(req): AppJson<CreateComplaintRequest>,
) -> AppResult<Created<ComplaintResponse>> {
    // With enforcement on, ownership comes from the session alone so nobody
    // can file into someone else's history.
    let user_id = if state.enforce_admin {
        session.map(|s| s.user.id)
    } else {
        non_blank(req.user_id.as_deref())
            .map(ToString::to_string)
            .or_else(|| session.map(|s| s.user.id))
    };

    let input = CreateComplaintInput {
        name: req.name,
        role: req.role,
        department: req.department,
        category: req.category,
        description: req.description,
        is_anonymous: req.is_anonymous,
        has_attachment: req.has_attachment,
        user_id,
    };

    let created = state.complaint_service.create(input).await?;
    Ok(Created(created.into()))
}

/// List complaints for the dashboard.
async fn list(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ComplaintResponse>>> {
    let filter = query.into_filter()?;
    let complaints = state.complaint_service.list_filtered(&filter).await?;

    Ok(Json(complaints.into_iter().map(Into::into).collect()))
}

/// Download the (filtered) complaint list as CSV.
async fn export(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<CsvFile> {
    let filter = query.into_filter()?;
    let body = state.complaint_service.export_csv(&filter).await?;

    Ok(CsvFile {
        filename: format!("complaints-{}.csv", chrono::Utc::now().format("%Y%m%d")),
        body,
    })
}

/// Categories a complaint may be filed under.
async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.complaint_service.categories().to_vec())
}

/// Dashboard counts.
async fn stats(
    _admin: AdminGuard,
    State(state): State<AppState>,
) -> AppResult<Json<ComplaintStats>> {
    Ok(Json(state.complaint_service.stats().await?))
}

/// Public status lookup by ticket ID or ticket suffix.
async fn public_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    let complaint = state.complaint_service.get_by_id(&id).await?;
    Ok(Json(complaint.into()))
}

/// Record a response and close the complaint.
async fn respond(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonOrDefault(req): JsonOrDefault<RespondRequest>,
) -> AppResult<Json<ComplaintResponse>> {
    let text = req.admin_response.unwrap_or_default();
    let updated = state.complaint_service.respond(&id, &text).await?;

    Ok(Json(updated.into()))
}

/// Close without a response.
async fn close(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ComplaintResponse>> {
    let updated = state.complaint_service.close(&id).await?;
    Ok(Json(updated.into()))
}

/// Delete a complaint.
async fn remove(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<MessageResponse> {
    state.complaint_service.delete(&id).await?;
    Ok(MessageResponse::new("Complaint deleted successfully"))
}

/// A user's own complaints.
async fn my_history(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<ComplaintResponse>>> {
    let user_id = require_user_id(query.user_id.as_deref())?;
    authorize_history(&state, session.as_ref(), user_id)?;

    let complaints = state.complaint_service.list_by_user(user_id).await?;
    Ok(Json(complaints.into_iter().map(Into::into).collect()))
}

/// Delete a user's own complaints.
async fn clear_history(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    JsonOrDefault(req): JsonOrDefault<ClearHistoryRequest>,
) -> AppResult<Json<ClearHistoryResponse>> {
    let user_id = require_user_id(req.user_id.as_deref())?;
    authorize_history(&state, session.as_ref(), user_id)?;

    let deleted = state.complaint_service.clear_by_user(user_id).await?;
    Ok(Json(ClearHistoryResponse {
        message: "History cleared successfully".to_string(),
        deleted,
    }))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require_user_id(user_id: Option<&str>) -> AppResult<&str> {
    non_blank(user_id).ok_or_else(|| AppError::BadRequest("User ID required".to_string()))
}

fn authorize_history(state: &AppState, session: Option<&Session>, user_id: &str) -> AppResult<()> {
    if !state.enforce_admin {
        return Ok(());
    }

    match session {
        None => Err(AppError::Unauthorized),
        Some(s) if s.can_access_user(user_id) => Ok(()),
        Some(_) => Err(AppError::Forbidden(
            "Cannot access another user's history".to_string(),
        )),
    }
}

pub fn router(limiter: RateLimiterState) -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/categories", get(categories))
        .route("/export", get(export))
        .route("/stats", get(stats))
        .route(
            "/public/status/{id}",
            get(public_status).layer(from_fn_with_state(limiter, rate_limit_lookup_middleware)),
        )
        .route("/my-history", get(my_history))
        .route("/my-history/clear", delete(clear_history))
        .route("/{id}/respond", patch(respond))
        .route("/{id}/close", patch(close))
        .route("/{id}", delete(remove))
}
