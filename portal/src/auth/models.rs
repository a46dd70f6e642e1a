//! Data structures for authentication-related entities.
//!
//! Request/response payloads for the login flow. The sealed session record
//! itself lives in `crate::session`.

use crate::session::UserSession;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "School ID is required"))]
    pub school_id: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Location the user originally requested before being sent to the
    /// login screen; round-tripped verbatim so the client can finish the
    /// redirect after login.
    #[serde(default)]
    pub next: Option<String>,
}

/// Login response containing the sealed session token and user info
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Opaque token the browser keeps in its `userSession` slot.
    pub token: String,
    pub user: UserInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// User information returned in login response
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub school_id: String,
    pub name: String,
    pub role: String,
}

impl UserInfo {
    pub fn from_session(session: &UserSession) -> Self {
        UserInfo {
            id: session.id,
            school_id: session.school_id.clone(),
            name: session.username(),
            role: session.role().as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_info_reflects_session() {
        let session = UserSession {
            id: 7,
            school_id: "S1".to_string(),
            fname: "Ana".to_string(),
            mname: String::new(),
            lname: "Cruz".to_string(),
            suffix: String::new(),
            extension: String::new(),
            status: 1,
            authenticated: true,
        };

        let info = UserInfo::from_session(&session);
        assert_eq!(info.name, "Ana Cruz");
        assert_eq!(info.role, "admin");
        assert_eq!(info.school_id, "S1");
    }
}
