use crate::{
    auth::Caller,
    dtos::resource::{ResourceQueryParams, ResourceRequest, ResourceResponse},
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use database::services::{enrollment::EnrollmentService, resource::ResourceService};
use log::{info, warn};
use models::{access::authorize_download, resource_kind::content_type_for, role::Requester};
use uuid::Uuid;

/// `Content-Disposition` value for a download, with characters that would
/// break the quoted file name dropped
fn attachment_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();

    format!("attachment; filename=\"{safe}\"")
}

/// List resources
#[utoipa::path(
    get,
    path = "/resources",
    params(ResourceQueryParams),
    responses(
        (status = 200, description = "Resources in display order", body = Vec<ResourceResponse>),
        (status = 403, description = "Administrator access required")
    ),
    security(("jwt" = [])),
    tag = "Resources"
)]
pub async fn list_resources(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<ResourceQueryParams>,
) -> Result<Json<Vec<ResourceResponse>>, ApiError> {
    caller.require_admin()?;
    let resources = ResourceService::list(&state.db, params.into()).await?;

    Ok(Json(resources.into_iter().map(Into::into).collect()))
}

/// Get a resource by ID
#[utoipa::path(
    get,
    path = "/resources/{id}",
    params(("id" = Uuid, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Resource found", body = ResourceResponse),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Resource not found")
    ),
    security(("jwt" = [])),
    tag = "Resources"
)]
pub async fn get_resource(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<ResourceResponse>, ApiError> {
    caller.require_admin()?;
    let resource = ResourceService::get(&state.db, id).await?;

    Ok(Json(resource.into()))
}

/// Create a resource
#[utoipa::path(
    post,
    path = "/resources",
    request_body = ResourceRequest,
    responses(
        (status = 201, description = "Resource created", body = ResourceResponse),
        (status = 400, description = "Invalid file reference or name"),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Cohort not found")
    ),
    security(("jwt" = [])),
    tag = "Resources"
)]
pub async fn create_resource(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<ResourceRequest>,
) -> Result<(StatusCode, Json<ResourceResponse>), ApiError> {
    caller.require_admin()?;
    let resource = ResourceService::create(&state.db, request.into()).await?;

    Ok((StatusCode::CREATED, Json(resource.into())))
}

/// Replace a resource
#[utoipa::path(
    put,
    path = "/resources/{id}",
    params(("id" = Uuid, Path, description = "Resource ID")),
    request_body = ResourceRequest,
    responses(
        (status = 200, description = "Resource updated", body = ResourceResponse),
        (status = 400, description = "Invalid file reference or name"),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Resource or cohort not found")
    ),
    security(("jwt" = [])),
    tag = "Resources"
)]
pub async fn update_resource(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(request): Json<ResourceRequest>,
) -> Result<Json<ResourceResponse>, ApiError> {
    caller.require_admin()?;
    let resource = ResourceService::update(&state.db, id, request.into()).await?;

    Ok(Json(resource.into()))
}

/// Delete a resource
#[utoipa::path(
    delete,
    path = "/resources/{id}",
    params(("id" = Uuid, Path, description = "Resource ID")),
    responses(
        (status = 204, description = "Resource deleted"),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Resource not found")
    ),
    security(("jwt" = [])),
    tag = "Resources"
)]
pub async fn delete_resource(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    ResourceService::delete(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Download the file attached to a resource.
///
/// Students need an active enrollment in the resource's cohort, and the
/// resource must be published and available on the current date.
#[utoipa::path(
    get,
    path = "/resources/{id}/download",
    params(("id" = Uuid, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 403, description = "NotEnrolled, NotAvailable or NotYetAvailable"),
        (status = 404, description = "ResourceNotFound, StudentProfileNotFound, NoFileAttached or FileMissing")
    ),
    security(("jwt" = [])),
    tag = "Resources"
)]
pub async fn download_resource(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (resource, cohort) = ResourceService::get_with_cohort(&state.db, id).await?;
    let requester = caller.requester(&state.db).await?;

    let enrollments = match requester {
        Requester::Admin => Vec::new(),
        Requester::Student { student_id } => {
            EnrollmentService::snapshots_for(&state.db, student_id, cohort.id).await?
        }
    };

    let snapshot = ResourceService::snapshot(&resource, &cohort);
    let handle = authorize_download(requester, &snapshot, &enrollments, state.today())
        .inspect_err(|denial| {
            info!(
                "Download of resource {id} by {} denied: {denial}",
                caller.account_id
            )
        })?;

    let bytes = tokio::fs::read(state.media_root.join(handle.path()))
        .await
        .map_err(|err| {
            warn!("File {} of resource {id} unreadable: {err}", handle.path());
            ApiError::FileMissing
        })?;

    let headers = [
        (header::CONTENT_TYPE, content_type_for(handle.path()).to_owned()),
        (
            header::CONTENT_DISPOSITION,
            attachment_disposition(handle.file_name()),
        ),
    ];

    Ok((headers, bytes))
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_attachment_disposition_is_a_valid_header() {
        assert_eq!(
            attachment_disposition("intro.pdf"),
            "attachment; filename=\"intro.pdf\""
        );

        let value = attachment_disposition("we\"ird\\na\nme.pdf");
        assert_eq!(value, "attachment; filename=\"weirdname.pdf\"");
        assert!(HeaderValue::from_str(&value).is_ok());
    }
}
