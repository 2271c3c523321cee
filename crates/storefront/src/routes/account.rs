//! Account route handlers.
//!
//! Sign-in and registration report only success or failure to the client;
//! the reason is logged by the auth store.

use aurora_core::{ProfileUpdate, User};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::state::AppState;

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Registration request body.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn signed_in(user: User) -> Json<User> {
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Json(user)
}

/// The signed-in user.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<User>> {
    let user = state
        .auth()
        .current_user()
        .ok_or_else(|| AppError::Unauthorized("Not signed in".to_string()))?;
    Ok(signed_in(user))
}

/// Update the signed-in user's profile.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>> {
    Ok(Json(state.auth().update_profile(update)?))
}

/// Sign in.
#[instrument(skip(state))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>> {
    let user = state
        .auth()
        .sign_in(&request.email, &request.password)
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;
    Ok(signed_in(user))
}

/// Create an account and sign in as it.
#[instrument(skip(state))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>)> {
    if request.password != request.confirm_password {
        return Err(AppError::BadRequest("Passwords do not match".to_string()));
    }

    let user = state
        .auth()
        .sign_up(&request.name, &request.email, &request.password)
        .ok_or_else(|| AppError::BadRequest("Registration failed".to_string()))?;
    Ok((StatusCode::CREATED, signed_in(user)))
}

/// Sign out. Always succeeds.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.auth().logout();
    clear_sentry_user();
    StatusCode::NO_CONTENT
}
