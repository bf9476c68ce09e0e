//! Credential issuance and the bearer-token guard
//!
//! Tokens are HS256-signed JWTs carrying the user's id and an expiry taken
//! from configuration. Validation is a pure function of token, server secret
//! and clock: signature mismatch, tampering and expiry all reject with a 401
//! before any handler logic runs.
//!
//! [`AuthUser`] is the axum extractor protected handlers take as an
//! argument; it parses the `Authorization: Bearer <token>` header (scheme
//! match is case-insensitive) and attaches the authenticated user id.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::core::error::ApiError;
use crate::server::AppState;

/// JWT claims: subject (user id), issued-at and expiry, seconds since epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies signed, time-limited bearer credentials
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_minutes: i64,
}

impl TokenSigner {
    pub fn new(secret: &str, expiry_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_minutes,
        }
    }

    /// Sign a token for `user_id`, valid for the configured expiry window
    pub fn issue(&self, user_id: i64) -> Result<String, ApiError> {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    fn issue_at(&self, user_id: i64, now: i64) -> Result<String, ApiError> {
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + self.expiry_minutes * 60,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
    }

    /// Verify signature and expiry, returning the claims on success
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::Auth("Expired token. Please login to get new token".to_string())
                }
                _ => ApiError::Auth("Invalid token. Please login or register".to_string()),
            })
    }
}

/// Hash a password with argon2id and a fresh random salt
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Check a password against a stored argon2 hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Authenticated-identity context attached by the bearer guard
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Auth("Missing token. Please login or register".to_string()))?;

        let mut segments = header_value.splitn(2, ' ');
        let scheme = segments.next().unwrap_or_default();
        let token = segments.next().filter(|t| !t.is_empty()).ok_or_else(|| {
            ApiError::Auth("Invalid token. Please login or register".to_string())
        })?;

        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(ApiError::Auth(
                "Invalid token. Please login or register".to_string(),
            ));
        }

        let claims = state.signer.verify(token)?;
        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
