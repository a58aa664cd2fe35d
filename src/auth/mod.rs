use crate::state::AppState;
use axum::Router;

mod dto;
pub(crate) mod extractors;
pub mod handlers;
mod jwt;
mod otp;
mod password;
pub mod repo;
pub mod repo_types;

pub use extractors::{AdminUser, MaybeUser};

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
