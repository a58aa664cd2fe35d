use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::convert::Infallible;
use tracing::debug;

use crate::{error::ApiError, state::AppState};

use super::{
    jwt::{JwtKeys, TokenError},
    repo_types::{Role, User},
};

/// Single token-resolution path shared by required and optional modes:
/// parse the Authorization header, verify the token, and confirm the
/// subject still exists in the store.
async fn resolve_user(parts: &Parts, state: &AppState) -> Result<User, ApiError> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::NoToken)?;

    let token = header.strip_prefix("Bearer ").ok_or(ApiError::NoToken)?;
    if token.is_empty() {
        return Err(ApiError::InvalidTokenFormat);
    }

    let keys = JwtKeys::from_ref(state);
    let claims = keys.verify(token).map_err(|e| match e {
        TokenError::Expired => ApiError::TokenExpired,
        TokenError::Invalid => ApiError::InvalidToken,
    })?;

    // A store failure here is a real 500, never treated as anonymous.
    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(ApiError::AuthInternal)?
        .ok_or(ApiError::TokenUserNotFound)?;

    Ok(user)
}

/// Role-gate. Fails AUTH_REQUIRED when no identity was resolved first,
/// INSUFFICIENT_PERMISSIONS when the role is not in the allow-list.
pub fn authorize(user: Option<&User>, allowed: &[Role]) -> Result<(), ApiError> {
    let user = user.ok_or(ApiError::AuthRequired)?;
    if !allowed.contains(&user.role) {
        return Err(ApiError::InsufficientPermissions {
            required: allowed
                .iter()
                .map(Role::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            actual: user.role.to_string(),
        });
    }
    Ok(())
}

/// Verified-gate, analogous to [`authorize`].
pub fn require_verified(user: Option<&User>) -> Result<(), ApiError> {
    let user = user.ok_or(ApiError::AuthRequired)?;
    if !user.is_verified {
        return Err(ApiError::NotVerified);
    }
    Ok(())
}

/// Required authentication: rejects with 401/500 unless a valid token
/// resolves to an existing user.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state).await.map(Self)
    }
}

/// Optional authentication: any failure resolves to an anonymous caller,
/// never a rejection. Public endpoints use this to personalize responses.
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_user(parts, state).await {
            Ok(user) => Ok(Self(Some(user))),
            Err(e) => {
                debug!(reason = %e, "optional auth resolved to anonymous");
                Ok(Self(None))
            }
        }
    }
}

/// Required authentication plus the admin role-gate. Admin accounts must
/// also have completed email verification.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve_user(parts, state).await?;
        authorize(Some(&user), &[Role::Admin])?;
        require_verified(Some(&user))?;
        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use http_body_util::BodyExt;
    use time::OffsetDateTime;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn user_with_role(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Jane".into(),
            email: "jane@x.com".into(),
            phone: "5551234567".into(),
            password_hash: "$argon2id$fake".into(),
            role,
            is_verified: true,
            otp: None,
            otp_expires: None,
            last_login: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn authorize_rejects_anonymous_with_auth_required() {
        let err = authorize(None, &[Role::Admin]).unwrap_err();
        assert!(matches!(err, ApiError::AuthRequired));
    }

    #[test]
    fn authorize_rejects_customer_for_admin_only() {
        let user = user_with_role(Role::Customer);
        let err = authorize(Some(&user), &[Role::Admin]).unwrap_err();
        match err {
            ApiError::InsufficientPermissions { required, actual } => {
                assert_eq!(required, "admin");
                assert_eq!(actual, "customer");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn authorize_accepts_admin_for_admin_only() {
        let user = user_with_role(Role::Admin);
        assert!(authorize(Some(&user), &[Role::Admin]).is_ok());
    }

    #[test]
    fn authorize_accepts_any_listed_role() {
        let user = user_with_role(Role::Customer);
        assert!(authorize(Some(&user), &[Role::Admin, Role::Customer]).is_ok());
    }

    #[test]
    fn require_verified_gates_unverified_accounts() {
        let mut user = user_with_role(Role::Customer);
        user.is_verified = false;
        assert!(matches!(
            require_verified(Some(&user)).unwrap_err(),
            ApiError::NotVerified
        ));
        user.is_verified = true;
        assert!(require_verified(Some(&user)).is_ok());
        assert!(matches!(
            require_verified(None).unwrap_err(),
            ApiError::AuthRequired
        ));
    }

    fn test_router() -> Router {
        Router::new()
            .route(
                "/required",
                get(|AuthUser(user): AuthUser| async move { user.email }),
            )
            .route(
                "/optional",
                get(|MaybeUser(user): MaybeUser| async move {
                    match user {
                        Some(u) => u.email,
                        None => "anonymous".to_string(),
                    }
                }),
            )
            .with_state(AppState::fake())
    }

    #[tokio::test]
    async fn required_mode_rejects_missing_header_with_no_token() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/required")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "NO_TOKEN");
    }

    #[tokio::test]
    async fn required_mode_rejects_non_bearer_scheme() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/required")
                    .header("Authorization", "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "NO_TOKEN");
    }

    #[tokio::test]
    async fn required_mode_rejects_empty_bearer_token() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/required")
                    .header("Authorization", "Bearer ")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "INVALID_TOKEN_FORMAT");
    }

    #[tokio::test]
    async fn required_mode_rejects_garbage_token() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/required")
                    .header("Authorization", "Bearer not.a.jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn optional_mode_proceeds_anonymously_without_header() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/optional")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"anonymous");
    }

    #[tokio::test]
    async fn optional_mode_proceeds_anonymously_on_bad_token() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/optional")
                    .header("Authorization", "Bearer expired.or.garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"anonymous");
    }
}
