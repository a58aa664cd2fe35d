use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User record in the database.
///
/// Invariant: `otp` and `otp_expires` are set together and cleared together.
/// None of the secret-bearing columns are ever serialized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    #[serde(skip_serializing)]
    pub otp_expires: Option<OffsetDateTime>,
    pub last_login: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}
