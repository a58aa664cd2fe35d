use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "contact_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    New,
    Read,
    Resolved,
}

impl std::str::FromStr for ContactStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "read" => Ok(Self::Read),
            "resolved" => Ok(Self::Resolved),
            _ => Err(()),
        }
    }
}

/// A message from the contact form. The user_* columns are stamped when the
/// sender happened to be logged in; the form itself never requires it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub user_id: Option<Uuid>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
