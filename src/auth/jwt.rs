use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::state::AppState;

use super::repo_types::{Role, User};

/// Claim set embedded in the bearer token. Possession of a valid, unexpired
/// token is the sole session proof; nothing is stored server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
}

/// Signing/verification keys derived from the process-wide secret,
/// read-only after startup.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let jwt = &state.config.jwt;
        Self::new(&jwt.secret, jwt.ttl_hours)
    }
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs((ttl_hours as u64) * 3600),
        }
    }

    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::default();
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Jane".into(),
            email: "jane@x.com".into(),
            phone: "5551234567".into(),
            password_hash: "$argon2id$fake".into(),
            role: Role::Customer,
            is_verified: true,
            otp: None,
            otp_expires: None,
            last_login: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn sign_and_verify_roundtrip_preserves_identity() {
        let keys = JwtKeys::new("dev-secret", 24);
        let user = test_user();
        let token = keys.sign(&user).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.name, user.name);
        assert_eq!(claims.role, Role::Customer);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = JwtKeys::new("dev-secret", 24);
        // Hand-roll claims whose expiry is well past the default leeway.
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "old@x.com".into(),
            name: "Old".into(),
            role: Role::Customer,
            iat: (now - TimeDuration::hours(2)).unix_timestamp() as usize,
            exp: (now - TimeDuration::hours(1)).unix_timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .expect("encode");
        assert_eq!(keys.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn verify_rejects_token_signed_with_other_secret() {
        let keys = JwtKeys::new("dev-secret", 24);
        let other = JwtKeys::new("not-the-secret", 24);
        let token = other.sign(&test_user()).expect("sign");
        assert_eq!(keys.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = JwtKeys::new("dev-secret", 24);
        assert_eq!(keys.verify("not.a.jwt"), Err(TokenError::Invalid));
    }
}
