use chrono::NaiveDateTime;
use database::{
    entities::resource,
    services::resource::{ResourceFilter, ResourceInput},
};
use models::resource_kind::ResourceKind;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Full resource as seen by administrators
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResourceResponse {
    pub id: Uuid,
    pub cohort_id: Uuid,
    #[schema(value_type = String, example = "pdf")]
    pub kind: ResourceKind,
    pub kind_label: String,
    pub access_previous: bool,
    pub draft: bool,
    pub name: String,
    pub description: String,
    pub file: Option<String>,
    pub url: Option<String>,
    pub order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<resource::Model> for ResourceResponse {
    fn from(resource: resource::Model) -> Self {
        Self {
            id: resource.id,
            cohort_id: resource.cohort_id,
            kind: resource.kind,
            kind_label: resource.kind.label().to_owned(),
            access_previous: resource.access_previous,
            draft: resource.draft,
            name: resource.name,
            description: resource.description,
            file: resource.file,
            url: resource.url,
            order: resource.order,
            created_at: resource.created_at,
            updated_at: resource.updated_at,
        }
    }
}

/// Resource as shown to students, without the gating flags
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentResourceResponse {
    pub id: Uuid,
    #[schema(value_type = String, example = "video")]
    pub kind: ResourceKind,
    pub kind_label: String,
    pub name: String,
    pub description: String,
    pub file: Option<String>,
    pub url: Option<String>,
    pub order: i32,
}

impl From<resource::Model> for StudentResourceResponse {
    fn from(resource: resource::Model) -> Self {
        Self {
            id: resource.id,
            kind: resource.kind,
            kind_label: resource.kind.label().to_owned(),
            name: resource.name,
            description: resource.description,
            file: resource.file,
            url: resource.url,
            order: resource.order,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResourceRequest {
    pub cohort_id: Uuid,
    #[schema(value_type = String, example = "pdf")]
    pub kind: ResourceKind,
    #[serde(default)]
    pub access_previous: bool,
    #[serde(default)]
    pub draft: bool,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Path relative to the media root
    pub file: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub order: i32,
}

impl From<ResourceRequest> for ResourceInput {
    fn from(request: ResourceRequest) -> Self {
        Self {
            cohort_id: request.cohort_id,
            kind: request.kind,
            access_previous: request.access_previous,
            draft: request.draft,
            name: request.name,
            description: request.description,
            file: request.file,
            url: request.url,
            order: request.order,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ResourceQueryParams {
    pub cohort: Option<Uuid>,
    #[param(value_type = Option<String>)]
    pub kind: Option<ResourceKind>,
    pub access_previous: Option<bool>,
    pub draft: Option<bool>,
}

impl From<ResourceQueryParams> for ResourceFilter {
    fn from(params: ResourceQueryParams) -> Self {
        Self {
            cohort: params.cohort,
            kind: params.kind,
            access_previous: params.access_previous,
            draft: params.draft,
        }
    }
}
