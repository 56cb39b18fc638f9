//! Complaint API handlers
//!
//! Role checks happen in the router; visibility and assignment rules live in
//! `ComplaintService`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    parse_optional, AnalyticsDto, AssignComplaintRequest, ComplaintDto, ComplaintListParams,
    CreateComplaintRequest, CreateNoteRequest, NoteDto, UpdateStatusRequest,
};
use crate::application::complaints::{AnalyticsService, ComplaintDraft, ComplaintService};
use crate::domain::complaint::ComplaintStatus;
use crate::interfaces::http::common::{ApiQuery, ApiResponse, PaginatedResponse, ValidatedJson};
use crate::interfaces::http::error::ApiResult;
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::PageRequest;

/// Default page size of the scoped listing
pub const DEFAULT_LIST_LIMIT: u32 = 5;
/// Default page size of the admin listing
pub const DEFAULT_ADMIN_LIST_LIMIT: u32 = 10;

#[derive(Clone)]
pub struct ComplaintHandlerState {
    pub complaints: Arc<ComplaintService>,
    pub analytics: Arc<AnalyticsService>,
}

#[utoipa::path(
    post,
    path = "/api/complaints",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    request_body = CreateComplaintRequest,
    responses(
        (status = 201, description = "Complaint filed", body = ApiResponse<ComplaintDto>),
        (status = 400, description = "Missing fields or unknown category/priority"),
        (status = 403, description = "Customers only")
    )
)]
pub async fn create_complaint(
    State(state): State<ComplaintHandlerState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateComplaintRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ComplaintDto>>)> {
    let draft = ComplaintDraft {
        title: request.title,
        description: request.description,
        category: parse_optional(request.category.as_deref())?,
        priority: parse_optional(request.priority.as_deref())?,
    };

    let complaint = state.complaints.create(&user.actor(), draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ComplaintDto::from(complaint))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/complaints",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    params(ComplaintListParams),
    responses(
        (status = 200, description = "Complaints visible to the caller, newest first", body = ApiResponse<PaginatedResponse<ComplaintDto>>),
        (status = 400, description = "Unknown filter value")
    )
)]
pub async fn list_complaints(
    State(state): State<ComplaintHandlerState>,
    user: AuthenticatedUser,
    ApiQuery(params): ApiQuery<ComplaintListParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<ComplaintDto>>>> {
    let query = params.query()?;
    let page = PageRequest::new(params.page, params.limit, DEFAULT_LIST_LIMIT);

    let result = state.complaints.list(&user.actor(), query, page).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        ComplaintDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/complaints/all",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    params(ComplaintListParams),
    responses(
        (status = 200, description = "Every complaint with customer and technician", body = ApiResponse<PaginatedResponse<ComplaintDto>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_all_complaints(
    State(state): State<ComplaintHandlerState>,
    ApiQuery(params): ApiQuery<ComplaintListParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<ComplaintDto>>>> {
    let query = params.query()?;
    let page = PageRequest::new(params.page, params.limit, DEFAULT_ADMIN_LIST_LIMIT);

    let result = state.complaints.list_all(query, page).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        ComplaintDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Complaint", body = ApiResponse<ComplaintDto>),
        (status = 404, description = "Not found or not visible to the caller")
    )
)]
pub async fn get_complaint(
    State(state): State<ComplaintHandlerState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ComplaintDto>>> {
    let details = state.complaints.get(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(ComplaintDto::from(details))))
}

#[utoipa::path(
    put,
    path = "/api/complaints/{id}/assign",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Complaint ID")),
    request_body = AssignComplaintRequest,
    responses(
        (status = 200, description = "Assigned; status is now in-progress", body = ApiResponse<ComplaintDto>),
        (status = 400, description = "Assignee is not an active technician"),
        (status = 404, description = "Complaint not found")
    )
)]
pub async fn assign_complaint(
    State(state): State<ComplaintHandlerState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<AssignComplaintRequest>,
) -> ApiResult<Json<ApiResponse<ComplaintDto>>> {
    let details = state
        .complaints
        .assign(&user.actor(), &id, request.technician_id.trim())
        .await?;
    Ok(Json(ApiResponse::success(ComplaintDto::from(details))))
}

#[utoipa::path(
    put,
    path = "/api/complaints/{id}/status",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Complaint ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ComplaintDto>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Not found or not assigned to the caller")
    )
)]
pub async fn update_complaint_status(
    State(state): State<ComplaintHandlerState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<Json<ApiResponse<ComplaintDto>>> {
    let status: ComplaintStatus = request.status.trim().parse()?;

    let details = state
        .complaints
        .update_status(&user.actor(), &id, status, request.remarks)
        .await?;
    Ok(Json(ApiResponse::success(ComplaintDto::from(details))))
}

#[utoipa::path(
    get,
    path = "/api/complaints/analytics",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard figures", body = ApiResponse<AnalyticsDto>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn get_analytics(
    State(state): State<ComplaintHandlerState>,
) -> ApiResult<Json<ApiResponse<AnalyticsDto>>> {
    let analytics = state.analytics.summary().await?;
    Ok(Json(ApiResponse::success(AnalyticsDto::from(analytics))))
}

#[utoipa::path(
    get,
    path = "/api/complaints/{id}/notes",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Notes, oldest first", body = ApiResponse<Vec<NoteDto>>),
        (status = 404, description = "Not found or not visible to the caller")
    )
)]
pub async fn list_notes(
    State(state): State<ComplaintHandlerState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<NoteDto>>>> {
    let notes = state.complaints.list_notes(&user.actor(), &id).await?;
    Ok(Json(ApiResponse::success(
        notes.into_iter().map(NoteDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/complaints/{id}/notes",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Complaint ID")),
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note added", body = ApiResponse<NoteDto>),
        (status = 400, description = "Empty content"),
        (status = 404, description = "Not found or not visible to the caller")
    )
)]
pub async fn add_note(
    State(state): State<ComplaintHandlerState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<NoteDto>>)> {
    let note = state
        .complaints
        .add_note(&user.actor(), &id, &request.content)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(NoteDto::from(note))),
    ))
}
