//! Account endpoints: registration, login and profile management
//!
//! Registration and login issue a signed bearer token; the remaining
//! endpoints operate on the authenticated user. Usernames and emails are
//! unique across all accounts, and a conflicting value is rejected even when
//! it already belongs to the requesting user.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::core::auth::{AuthUser, hash_password, verify_password};
use crate::core::error::ApiError;
use crate::core::extractors::JsonPayload;
use crate::core::response::{RecordEnvelope, TokenEnvelope};
use crate::core::validation::{PayloadRules, email, length, required, text};
use crate::models::User;
use crate::server::AppState;

#[derive(Deserialize)]
struct RegisterWire {
    username: String,
    password: String,
    email: String,
}

#[derive(Deserialize)]
struct LoginWire {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct PasswordWire {
    current_password: String,
    new_password: String,
}

#[derive(Deserialize)]
struct DataWire {
    username: String,
    email: String,
}

fn parse<T: serde::de::DeserializeOwned>(body: &Value) -> Result<T, ApiError> {
    serde_json::from_value(body.clone())
        .map_err(|e| ApiError::Internal(format!("validated payload failed to parse: {e}")))
}

/// Reject a username already held by any account
async fn check_username_free(state: &AppState, username: &str) -> Result<(), ApiError> {
    if state.users.find_by_username(username).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "User with username {username} already exists"
        )));
    }
    Ok(())
}

/// Reject an email already held by any account
async fn check_email_free(state: &AppState, email: &str) -> Result<(), ApiError> {
    if state.users.find_by_email(email).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "User with email {email} already exists"
        )));
    }
    Ok(())
}

async fn current_user(state: &AppState, auth: AuthUser) -> Result<User, ApiError> {
    state
        .users
        .get(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Auth("Invalid token. Please login or register".to_string()))
}

/// `POST /api/v1/auth/register`
pub async fn register(
    State(state): State<AppState>,
    JsonPayload(body): JsonPayload,
) -> Result<impl IntoResponse, ApiError> {
    PayloadRules::new()
        .field("username", vec![required(), text(), length(1, 255)])
        .field("password", vec![required(), text(), length(6, 255)])
        .field("email", vec![required(), text(), email()])
        .validate(&body)?;
    let wire: RegisterWire = parse(&body)?;

    check_username_free(&state, &wire.username).await?;
    check_email_free(&state, &wire.email).await?;

    let user = User {
        id: 0,
        username: wire.username,
        email: wire.email,
        password_hash: hash_password(&wire.password)?,
        creation_date: Utc::now(),
    };
    let user = state.users.insert(user).await?;

    let token = state.signer.issue(user.id)?;
    Ok((StatusCode::CREATED, Json(TokenEnvelope::new(token))))
}

/// `POST /api/v1/auth/login`
pub async fn login(
    State(state): State<AppState>,
    JsonPayload(body): JsonPayload,
) -> Result<impl IntoResponse, ApiError> {
    PayloadRules::new()
        .field("username", vec![required(), text()])
        .field("password", vec![required(), text()])
        .validate(&body)?;
    let wire: LoginWire = parse(&body)?;

    let user = state
        .users
        .find_by_username(&wire.username)
        .await?
        .ok_or_else(|| ApiError::Auth("Invalid credentials".to_string()))?;

    if !verify_password(&wire.password, &user.password_hash) {
        return Err(ApiError::Auth("Invalid credentials".to_string()));
    }

    let token = state.signer.issue(user.id)?;
    Ok(Json(TokenEnvelope::new(token)))
}

/// `GET /api/v1/auth/me`
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = current_user(&state, auth).await?;
    Ok(Json(RecordEnvelope::new(Value::Object(user.public_json()))))
}

/// `PUT /api/v1/auth/update/password`
pub async fn update_password(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonPayload(body): JsonPayload,
) -> Result<impl IntoResponse, ApiError> {
    PayloadRules::new()
        .field("current_password", vec![required(), text()])
        .field("new_password", vec![required(), text(), length(6, 255)])
        .validate(&body)?;
    let wire: PasswordWire = parse(&body)?;

    let mut user = current_user(&state, auth).await?;
    if !verify_password(&wire.current_password, &user.password_hash) {
        return Err(ApiError::Auth("Invalid password".to_string()));
    }

    user.password_hash = hash_password(&wire.new_password)?;
    let user = state
        .users
        .update(user.id, user)
        .await?
        .ok_or_else(|| ApiError::Internal("authenticated user vanished".to_string()))?;

    Ok(Json(RecordEnvelope::new(Value::Object(user.public_json()))))
}

/// `PUT /api/v1/auth/update/data`
pub async fn update_data(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonPayload(body): JsonPayload,
) -> Result<impl IntoResponse, ApiError> {
    PayloadRules::new()
        .field("username", vec![required(), text(), length(1, 255)])
        .field("email", vec![required(), text(), email()])
        .validate(&body)?;
    let wire: DataWire = parse(&body)?;

    let mut user = current_user(&state, auth).await?;
    check_username_free(&state, &wire.username).await?;
    check_email_free(&state, &wire.email).await?;

    user.username = wire.username;
    user.email = wire.email;
    let user = state
        .users
        .update(user.id, user)
        .await?
        .ok_or_else(|| ApiError::Internal("authenticated user vanished".to_string()))?;

    Ok(Json(RecordEnvelope::new(Value::Object(user.public_json()))))
}
