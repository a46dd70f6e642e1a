//! Handler functions for the content API endpoints.
//!
//! All six collections share one handler set, keyed by the resource slug in
//! the path. Reads are public; mutations are mounted behind the session and
//! admin middleware by the admin router.

use crate::api::common::{
    ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http,
    validation_error_response,
};
use crate::errors::ServiceError;
use crate::services::backend_client::BackendClient;
use crate::services::content_service::{ContentService, ResourceKind};
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use validator::Validate;

/// Query parameters for collection listings
#[derive(Debug, Deserialize, Validate)]
pub struct ListQuery {
    /// Case-insensitive substring search over the record's text fields
    pub q: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub per_page: Option<u32>,
}

fn parse_kind(raw: &str) -> Result<ResourceKind, (StatusCode, String)> {
    ResourceKind::from_str(raw)
        .map_err(|_| service_error_to_http(ServiceError::not_found("Resource", raw)))
}

/// List a collection with optional search and pagination
#[axum::debug_handler]
pub async fn list(
    Extension(backend): Extension<BackendClient>,
    Path(kind): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Value>>>, (StatusCode, String)> {
    let kind = parse_kind(&kind)?;

    if let Err(validation_errors) = query.validate() {
        return Err(validation_error_response(validation_errors));
    }

    let pagination = PaginationFilter {
        page: query.page,
        per_page: query.per_page,
    };

    let service = ContentService::new(&backend);
    match service.list(kind, query.q.as_deref(), &pagination).await {
        Ok((items, total)) => Ok(ResponseJson(ApiResponse::ok_paginated(
            items,
            PaginationMeta::from_filter(&pagination, total),
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Fetch a single record
#[axum::debug_handler]
pub async fn fetch_one(
    Extension(backend): Extension<BackendClient>,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<ResponseJson<ApiResponse<Value>>, (StatusCode, String)> {
    let kind = parse_kind(&kind)?;

    let service = ContentService::new(&backend);
    match service.fetch_one(kind, id).await {
        Ok(item) => Ok(ResponseJson(ApiResponse::ok(item))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Create a record (admin console)
#[axum::debug_handler]
pub async fn create(
    Extension(backend): Extension<BackendClient>,
    Path(kind): Path<String>,
    Json(body): Json<Value>,
) -> Result<ResponseJson<ApiResponse<Value>>, (StatusCode, String)> {
    let kind = parse_kind(&kind)?;

    let service = ContentService::new(&backend);
    match service.create(kind, body).await {
        Ok(created) => Ok(ResponseJson(ApiResponse::success(
            created,
            format!("{} created", kind.entity()),
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Update a record (admin console)
#[axum::debug_handler]
pub async fn update(
    Extension(backend): Extension<BackendClient>,
    Path((kind, id)): Path<(String, i64)>,
    Json(body): Json<Value>,
) -> Result<ResponseJson<ApiResponse<Value>>, (StatusCode, String)> {
    let kind = parse_kind(&kind)?;

    let service = ContentService::new(&backend);
    match service.update(kind, id, body).await {
        Ok(updated) => Ok(ResponseJson(ApiResponse::success(
            updated,
            format!("{} updated", kind.entity()),
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Delete a record (admin console)
#[axum::debug_handler]
pub async fn remove(
    Extension(backend): Extension<BackendClient>,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<ResponseJson<ApiResponse<Value>>, (StatusCode, String)> {
    let kind = parse_kind(&kind)?;

    let service = ContentService::new(&backend);
    match service.remove(kind, id).await {
        Ok(result) => Ok(ResponseJson(ApiResponse::success(
            result,
            format!("{} deleted", kind.entity()),
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
