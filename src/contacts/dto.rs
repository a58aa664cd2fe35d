use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::{Role, User};
use crate::error::ApiError;
use crate::validate::{is_valid_email, Validator};

use super::repo_types::{Contact, ContactStatus};

#[derive(Debug, Deserialize)]
pub struct CreateContact {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
}

impl CreateContact {
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check(
            (2..=100).contains(&self.name.chars().count()),
            "name",
            "Name must be between 2 and 100 characters",
        );
        v.check(is_valid_email(&self.email), "email", "Valid email is required");
        v.check(
            !self.message.trim().is_empty(),
            "message",
            "Message is required",
        );
        v.check(
            self.message.chars().count() <= 2000,
            "message",
            "Message cannot exceed 2000 characters",
        );
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateContactStatus {
    pub status: ContactStatus,
}

/// Identity echoed back on public endpoints when the caller was logged in.
#[derive(Debug, Serialize)]
pub struct CallerInfo {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

impl From<&User> for CallerInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactList {
    pub items: Vec<Contact>,
    pub count: usize,
    pub user: Option<CallerInfo>,
}

#[derive(Debug, Serialize)]
pub struct ContactsByStatus {
    pub items: Vec<Contact>,
    pub count: usize,
    pub status: ContactStatus,
}

#[derive(Debug, Serialize)]
pub struct CreatedContact {
    pub contact: Contact,
    pub user: Option<CallerInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_contact_requires_name_email_message() {
        let req = CreateContact {
            name: "J".into(),
            email: "not-an-email".into(),
            phone: String::new(),
            subject: String::new(),
            message: "   ".into(),
        };
        let err = req.validate().unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field).collect();
                assert_eq!(names, vec!["name", "email", "message"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn create_contact_accepts_minimal_valid_form() {
        let req = CreateContact {
            name: "Jane".into(),
            email: "jane@x.com".into(),
            phone: String::new(),
            subject: String::new(),
            message: "Do you take large group bookings?".into(),
        };
        assert!(req.validate().is_ok());
    }
}
