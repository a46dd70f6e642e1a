//! Core business logic for the authentication flow.
//!
//! Authentication itself happens in the PHP backend; this service validates
//! input, forwards credentials, and turns a successful backend response into
//! a sealed session token plus the user info the client displays.

use crate::auth::models::*;
use crate::errors::{ServiceError, ServiceResult};
use crate::services::backend_client::BackendClient;
use crate::session::{SessionCodec, UserSession};
use validator::Validate;

pub struct AuthService<'a> {
    backend: &'a BackendClient,
    codec: &'a SessionCodec,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance over the shared backend client and
    /// session codec
    pub fn new(backend: &'a BackendClient, codec: &'a SessionCodec) -> Self {
        AuthService { backend, codec }
    }

    /// Authenticate against the backend and seal the resulting session.
    pub async fn login(&self, login_request: LoginRequest) -> ServiceResult<LoginResponse> {
        // Validate input
        if let Err(validation_errors) = login_request.validate() {
            let error_messages: Vec<String> = validation_errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| {
                        format!(
                            "{}: {}",
                            field,
                            error.message.as_ref().unwrap_or(&"Invalid value".into())
                        )
                    })
                })
                .collect();
            return Err(ServiceError::validation(error_messages.join(", ")));
        }

        let record = self
            .backend
            .login(&login_request.school_id, &login_request.password)
            .await?;

        // Backend record plus authenticated = true is the session the guard
        // stores; overwrites any session the client already held.
        let session = UserSession::from(record);
        let token = self.codec.seal(&session)?;

        Ok(LoginResponse {
            token,
            user: UserInfo::from_session(&session),
            next: login_request.next,
        })
    }
}
