use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    email,
    error::ApiError,
    response::{created, ok, ok_message, Envelope},
    state::AppState,
};

use super::{
    dto::{
        LoginData, LoginRequest, PublicUser, RegisterRequest, RegisteredData, VerifiedData,
        VerifyOtpRequest,
    },
    extractors::AuthUser,
    jwt::JwtKeys,
    otp::{self, OtpError},
    password::{hash_password, verify_password},
    repo_types::User,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/profile", get(profile))
        .route("/auth/logout", post(logout))
}

/// POST /api/auth/register — create an unverified account and start the
/// first OTP cycle.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<RegisteredData>>), ApiError> {
    payload.normalize();
    payload.validate()?;

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict(
            "User already exists with this email".into(),
        ));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        &payload.name,
        &payload.email,
        &payload.phone,
        &hash,
    )
    .await?;

    let (code, expires) = otp::generate(state.config.otp_ttl_minutes);
    User::set_otp(&state.db, user.id, &code, expires).await?;
    email::spawn_otp_email(
        state.mailer.clone(),
        user.email.clone(),
        user.name.clone(),
        code,
    );

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(created(
        "Registration successful. OTP sent to email.",
        RegisteredData {
            user_id: user.id,
            email: user.email,
            name: user.name,
        },
    ))
}

/// POST /api/auth/login — password check, then a fresh OTP cycle. A new
/// code always overwrites any outstanding one.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<Envelope<LoginData>>, ApiError> {
    payload.normalize();
    payload.validate()?;

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let (code, expires) = otp::generate(state.config.otp_ttl_minutes);
    User::set_otp(&state.db, user.id, &code, expires).await?;
    email::spawn_otp_email(
        state.mailer.clone(),
        user.email.clone(),
        user.name.clone(),
        code,
    );

    info!(user_id = %user.id, email = %user.email, "login otp issued");
    Ok(ok(
        "OTP sent to email",
        LoginData {
            user_id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        },
    ))
}

/// POST /api/auth/verify-otp — consume the pending code exactly once and
/// issue a bearer token.
#[instrument(skip(state, payload))]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(mut payload): Json<VerifyOtpRequest>,
) -> Result<Json<Envelope<VerifiedData>>, ApiError> {
    payload.normalize();
    payload.validate()?;

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    otp::check(user.otp.as_deref(), user.otp_expires, &payload.otp).map_err(|e| match e {
        OtpError::Missing => ApiError::OtpMissing,
        OtpError::Expired => ApiError::OtpExpired,
        OtpError::Mismatch => ApiError::OtpMismatch,
    })?;

    // Conditional update clears the code, flips is_verified and stamps
    // last_login as one persisted unit. Zero rows means a concurrent
    // submission consumed the code first.
    let user = User::consume_otp(&state.db, user.id, &payload.otp)
        .await?
        .ok_or(ApiError::OtpMissing)?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user)?;

    info!(user_id = %user.id, "otp verified, token issued");
    Ok(ok(
        "OTP verified successfully",
        VerifiedData {
            token,
            user: user.into(),
        },
    ))
}

/// GET /api/auth/profile — the caller's own record, sans secrets.
pub async fn profile(
    AuthUser(user): AuthUser,
) -> Json<Envelope<PublicUser>> {
    ok("Profile fetched successfully", PublicUser::from(user))
}

/// POST /api/auth/logout — advisory only; tokens are stateless so the
/// client simply discards its copy.
pub async fn logout() -> Json<Envelope<()>> {
    ok_message("Logged out successfully (clear token on client)")
}
