//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for the login flow, parse
//! request data, validate input, and interact with the `auth::service` for
//! core business logic.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::services::backend_client::BackendClient;
use crate::session::{SESSION_SLOT_KEY, SessionCodec, UserSession};
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(backend): Extension<BackendClient>,
    Extension(codec): Extension<SessionCodec>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<ApiResponse<LoginResponse>>, (StatusCode, String)> {
    let auth_service = AuthService::new(&backend, &codec);

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(ApiResponse::success(
            response,
            "Login successful",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request.
///
/// The portal keeps no session state; the authoritative logout is the client
/// clearing its `userSession` slot. This endpoint only acknowledges.
#[axum::debug_handler]
pub async fn logout() -> ResponseJson<ApiResponse<serde_json::Value>> {
    ResponseJson(ApiResponse::success(
        serde_json::json!({ "cleared": SESSION_SLOT_KEY }),
        "Session cleared",
    ))
}

/// Return the authenticated user's info
#[axum::debug_handler]
pub async fn me(
    Extension(session): Extension<UserSession>,
) -> ResponseJson<ApiResponse<UserInfo>> {
    ResponseJson(ApiResponse::ok(UserInfo::from_session(&session)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_payload_is_enveloped() {
        // Login responds with the same envelope as every other endpoint.
        let response = ApiResponse::success(
            LoginResponse {
                token: "sealed".to_string(),
                user: UserInfo {
                    id: 7,
                    school_id: "S1".to_string(),
                    name: "Ana Cruz".to_string(),
                    role: "admin".to_string(),
                },
                next: None,
            },
            "Login successful",
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["token"], "sealed");
        assert_eq!(json["data"]["user"]["name"], "Ana Cruz");
    }
}
