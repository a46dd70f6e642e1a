//! Handler functions for the catalog deep-link endpoints.
//!
//! These back the "view in catalog" actions on the public pages and the
//! URL fields in the admin book forms. All URL knowledge lives in
//! `crate::catalog`; handlers only translate between HTTP and the adapter.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::catalog::{
    CatalogDeepLink, extract_bib_id, extract_bib_id_lenient, validate_catalog_url,
};
use crate::errors::ServiceError;
use crate::services::backend_client::BackendClient;
use crate::services::content_service::ContentService;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::{Deserialize, Serialize};

/// Generated deep link for a bibID
#[derive(Debug, Serialize)]
pub struct DeepLinkResponse {
    pub bib_id: String,
    pub url: String,
}

/// Pasted-URL inspection request from an admin form
#[derive(Debug, Deserialize)]
pub struct InspectUrlRequest {
    pub url: String,
}

/// Inspection result: structural validity plus the extracted bibID
#[derive(Debug, Serialize)]
pub struct InspectUrlResponse {
    pub valid: bool,
    pub bib_id: Option<String>,
}

/// Generate the canonical catalog deep link for a bibID
#[axum::debug_handler]
pub async fn deep_link(
    Path(bib_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<DeepLinkResponse>>, (StatusCode, String)> {
    if bib_id.is_empty() || !bib_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(service_error_to_http(ServiceError::validation(
            "bibID must be a numeric string",
        )));
    }

    let link = CatalogDeepLink::new(bib_id);
    Ok(ResponseJson(ApiResponse::success(
        DeepLinkResponse {
            bib_id: link.bib_id().to_string(),
            url: link.to_url().into(),
        },
        "Deep link generated",
    )))
}

/// Resolve a book record to its catalog deep link
#[axum::debug_handler]
pub async fn book_deep_link(
    Extension(backend): Extension<BackendClient>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<DeepLinkResponse>>, (StatusCode, String)> {
    let service = ContentService::new(&backend);
    match service.book_deep_link(id).await {
        Ok(url) => {
            // The generated URL always carries its bibID
            let bib_id = extract_bib_id(&url).unwrap_or_default();
            Ok(ResponseJson(ApiResponse::success(
                DeepLinkResponse { bib_id, url },
                "Deep link generated",
            )))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Inspect a catalog URL pasted into an admin form.
///
/// Tries the strict structured extractor first, then the lenient scan. A
/// string with no bibID at all becomes a validation message the form shows
/// as a toast.
#[axum::debug_handler]
pub async fn inspect(
    Json(payload): Json<InspectUrlRequest>,
) -> Result<ResponseJson<ApiResponse<InspectUrlResponse>>, (StatusCode, String)> {
    let valid = validate_catalog_url(&payload.url);

    let bib_id = match extract_bib_id(&payload.url) {
        Some(bib_id) => Some(bib_id),
        None => match extract_bib_id_lenient(&payload.url) {
            Ok(bib_id) => Some(bib_id),
            Err(error) => {
                return Err(service_error_to_http(ServiceError::validation(
                    error.to_string(),
                )));
            }
        },
    };

    Ok(ResponseJson(ApiResponse::success(
        InspectUrlResponse { valid, bib_id },
        "URL inspected",
    )))
}
