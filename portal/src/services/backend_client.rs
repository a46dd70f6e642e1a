//! HTTP client for the external PHP content backend.
//!
//! Every piece of persistence — accounts, books, events, FAQs, scholars,
//! services, unit libraries — lives behind these endpoints. The portal holds
//! no state of its own; this client is the only code that speaks the
//! backend's wire format.

use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};
use crate::session::UserSession;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Standard response envelope of the backend's content endpoints.
#[derive(Debug, Deserialize)]
struct BackendEnvelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

/// User record as returned by the backend's login endpoint.
#[derive(Debug, Deserialize)]
pub struct BackendUserRecord {
    pub id: i64,
    pub school_id: String,
    pub fname: String,
    #[serde(default)]
    pub mname: String,
    pub lname: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub extension: String,
    pub status: i32,
}

impl From<BackendUserRecord> for UserSession {
    /// The caller-side augmentation the session guard expects: the backend
    /// record plus `authenticated` forced to true.
    fn from(record: BackendUserRecord) -> Self {
        UserSession {
            id: record.id,
            school_id: record.school_id,
            fname: record.fname,
            mname: record.mname,
            lname: record.lname,
            suffix: record.suffix,
            extension: record.extension,
            status: record.status,
            authenticated: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BackendLoginResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    user: Option<BackendUserRecord>,
}

/// Shared client for the PHP backend, cloned into request handlers.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &Config) -> ServiceResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.backend_timeout_seconds))
            .build()?;

        Ok(BackendClient {
            http,
            base_url: config.backend_api_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Authenticate against the backend's login endpoint.
    ///
    /// A `status != "success"` response is a credential problem, not a
    /// transport failure, and maps to a validation error.
    pub async fn login(&self, school_id: &str, password: &str) -> ServiceResult<BackendUserRecord> {
        let response = self
            .http
            .post(self.endpoint("login.php"))
            .json(&serde_json::json!({
                "school_id": school_id,
                "password": password,
            }))
            .send()
            .await?;

        let body: BackendLoginResponse = response.json().await?;
        if body.status == "success" {
            body.user
                .ok_or_else(|| ServiceError::external_service("Login response missing user record"))
        } else {
            Err(ServiceError::validation(
                body.message
                    .unwrap_or_else(|| "Invalid credentials".to_string()),
            ))
        }
    }

    /// GET a content endpoint and unwrap the response envelope.
    pub async fn fetch(&self, path: &str) -> ServiceResult<Value> {
        let response = self.http.get(self.endpoint(path)).send().await?;
        Self::unwrap_envelope(response).await
    }

    /// POST a new record to a content endpoint.
    pub async fn create(&self, path: &str, body: &Value) -> ServiceResult<Value> {
        let response = self
            .http
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await?;
        Self::unwrap_envelope(response).await
    }

    /// PUT an updated record to a content endpoint.
    pub async fn update(&self, path: &str, body: &Value) -> ServiceResult<Value> {
        let response = self.http.put(self.endpoint(path)).json(body).send().await?;
        Self::unwrap_envelope(response).await
    }

    /// DELETE a record at a content endpoint.
    pub async fn delete(&self, path: &str) -> ServiceResult<Value> {
        let response = self.http.delete(self.endpoint(path)).send().await?;
        Self::unwrap_envelope(response).await
    }

    async fn unwrap_envelope(response: reqwest::Response) -> ServiceResult<Value> {
        let envelope: BackendEnvelope = response.json().await?;
        if envelope.status == "success" {
            Ok(envelope.data.unwrap_or(Value::Null))
        } else {
            Err(ServiceError::external_service(
                envelope
                    .message
                    .unwrap_or_else(|| "Backend request failed".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_becomes_authenticated_session() {
        let record = BackendUserRecord {
            id: 3,
            school_id: "S1".to_string(),
            fname: "Ana".to_string(),
            mname: String::new(),
            lname: "Cruz".to_string(),
            suffix: String::new(),
            extension: String::new(),
            status: 1,
        };

        let session = UserSession::from(record);
        assert!(session.authenticated);
        assert!(session.is_admin());
        assert_eq!(session.username(), "Ana Cruz");
    }

    #[test]
    fn test_login_response_parses_without_optional_names() {
        // The backend omits middle name/suffix/extension for most accounts.
        let body = r#"{
            "status": "success",
            "user": {"id": 9, "school_id": "02-1111", "fname": "Ben",
                     "lname": "Reyes", "status": 2}
        }"#;
        let parsed: BackendLoginResponse = serde_json::from_str(body).unwrap();
        let user = parsed.user.unwrap();
        assert_eq!(user.mname, "");
        assert_eq!(user.status, 2);
    }
}
