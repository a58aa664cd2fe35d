use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::validate::{is_valid_email, Validator};

use super::otp::OTP_DIGITS;
use super::repo_types::{Role, User};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

impl RegisterRequest {
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.phone = self.phone.trim().to_string();
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
            self.password.len() >= 8,
            "password",
            "Password must be at least 8 characters",
        );
        v.check(
            (10..=20).contains(&self.phone.len()),
            "phone",
            "Phone must be between 10 and 20 characters",
        );
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn normalize(&mut self) {
        self.email = self.email.trim().to_lowercase();
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check(is_valid_email(&self.email), "email", "Valid email is required");
        v.check(!self.password.is_empty(), "password", "Password is required");
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

impl VerifyOtpRequest {
    pub fn normalize(&mut self) {
        self.email = self.email.trim().to_lowercase();
        self.otp = self.otp.trim().to_string();
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check(is_valid_email(&self.email), "email", "Valid email is required");
        v.check(
            self.otp.len() == OTP_DIGITS && self.otp.bytes().all(|b| b.is_ascii_digit()),
            "otp",
            "OTP must be a 6-digit code",
        );
        v.finish()
    }
}

/// Public part of the user returned to clients. Never carries password or
/// OTP material.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: String,
    pub is_verified: bool,
    pub last_login: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
            is_verified: user.is_verified,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredData {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct VerifiedData {
    pub token: String,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_normalizes_email_case_and_whitespace() {
        let mut req = RegisterRequest {
            name: "  Jane ".into(),
            email: " Jane@X.COM ".into(),
            password: "Passw0rd!".into(),
            phone: "5551234567".into(),
        };
        req.normalize();
        assert_eq!(req.name, "Jane");
        assert_eq!(req.email, "jane@x.com");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn register_rejects_short_password_and_bad_phone() {
        let req = RegisterRequest {
            name: "Jane".into(),
            email: "jane@x.com".into(),
            password: "short".into(),
            phone: "123".into(),
        };
        let err = req.validate().unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field).collect();
                assert_eq!(names, vec!["password", "phone"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn verify_otp_requires_six_digits() {
        let base = |otp: &str| VerifyOtpRequest {
            email: "jane@x.com".into(),
            otp: otp.into(),
        };
        assert!(base("042137").validate().is_ok());
        assert!(base("42137").validate().is_err());
        assert!(base("0421370").validate().is_err());
        assert!(base("04213a").validate().is_err());
    }

    #[test]
    fn public_user_serializes_camel_case_without_secrets() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Jane".into(),
            email: "jane@x.com".into(),
            phone: "5551234567".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::Customer,
            is_verified: true,
            // Not a substring of any public field, so a leak is unambiguous.
            otp: Some("987604".into()),
            otp_expires: Some(OffsetDateTime::now_utc()),
            last_login: None,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(json.contains("\"isVerified\":true"));
        assert!(json.contains("\"role\":\"customer\""));
        assert!(json.contains("5551234567"));
        assert!(!json.contains("secret"));
        assert!(!json.contains("987604"));
        assert!(!json.contains("otp"));
        assert!(!json.contains("password"));
    }
}
