//! Authentication types for JWT and admin sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::AdminId;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin ID).
    pub sub: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an admin.
    #[must_use]
    pub fn new(admin_id: AdminId, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: admin_id.into_inner(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the admin ID from claims.
    #[must_use]
    pub const fn admin_id(&self) -> AdminId {
        AdminId::from_uuid(self.sub)
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Admin email.
    pub email: String,
    /// Admin password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Admin email.
    pub email: String,
    /// Admin password.
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated admin.
    pub admin: AdminInfo,
    /// Access token, also set as the `bearer-token` cookie.
    pub access_token: String,
    /// Token expiration in seconds.
    pub expires_in: u64,
}

/// Admin info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct AdminInfo {
    /// Admin ID.
    pub id: AdminId,
    /// Display name.
    pub name: String,
    /// Admin email.
    pub email: String,
}
