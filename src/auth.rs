//! Credential service: password hashing, bearer-token issuance/decoding and
//! the extractor that resolves a bearer token to a live user row.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use model::entities::user;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::schemas::AppState;

/// Verification links stay valid for a day; access tokens use the
/// configured TTL.
const VERIFICATION_TTL_SECONDS: i64 = 24 * 60 * 60;

/// What a token is good for. Access tokens and mailed verification links
/// share the secret and claim shape, so the purpose claim is what keeps a
/// verification link from doubling as a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Access,
    Verification,
}

/// Claims carried by both access and verification tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i32,
    pub purpose: TokenPurpose,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

/// Hash a password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Password hashing failed: {e}");
            ApiError::Internal
        })
}

/// Verify a password against a stored PHC hash string.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

pub fn encode_token(
    secret: &str,
    user_id: i32,
    purpose: TokenPurpose,
    ttl_seconds: i64,
) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user_id,
        purpose,
        exp: (Utc::now() + Duration::seconds(ttl_seconds)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!("Failed to encode token: {e}");
        ApiError::Internal
    })
}

/// Token embedded in the verification link mailed out at registration.
pub fn encode_verification_token(secret: &str, user_id: i32) -> Result<String, ApiError> {
    encode_token(
        secret,
        user_id,
        TokenPurpose::Verification,
        VERIFICATION_TTL_SECONDS,
    )
}

/// Decode and validate a token for the expected purpose. Tampered,
/// malformed, expired and wrong-purpose tokens all collapse into the same
/// 401; the caller learns nothing about which.
pub fn decode_token(
    secret: &str,
    token: &str,
    expected: TokenPurpose,
) -> Result<Claims, ApiError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::invalid_token())?;

    if claims.purpose != expected {
        return Err(ApiError::invalid_token());
    }
    Ok(claims)
}

/// Check a username/password pair and issue an access token for the user.
pub async fn authenticate(
    db: &DatabaseConnection,
    config: &AppConfig,
    username: &str,
    password: &str,
) -> Result<String, ApiError> {
    let user = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
        .ok_or_else(ApiError::invalid_credentials)?;

    if !verify_password(password, &user.password_hash) {
        debug!("Password mismatch for username: {username}");
        return Err(ApiError::invalid_credentials());
    }

    encode_token(
        &config.jwt_secret,
        user.id,
        TokenPurpose::Access,
        config.token_ttl_seconds,
    )
}

/// The authenticated caller, resolved from the `Authorization: Bearer`
/// header. Rejects with 401 if the token is invalid or the referenced user
/// no longer exists.
pub struct CurrentUser(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Auth("Missing bearer token".to_string()))?;

        let claims = decode_token(&state.config.jwt_secret, token, TokenPurpose::Access)?;

        let user = user::Entity::find_by_id(claims.sub)
            .one(&state.db)
            .await?
            .ok_or_else(ApiError::invalid_token)?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn hashing_salts_every_time() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn token_round_trip() {
        let token = encode_token(SECRET, 42, TokenPurpose::Access, 3600).unwrap();
        let claims = decode_token(SECRET, &token, TokenPurpose::Access).unwrap();
        assert_eq!(claims.sub, 42);
    }

    #[test]
    fn tampered_token_rejected() {
        let token = encode_token(SECRET, 42, TokenPurpose::Access, 3600).unwrap();
        let mut tampered = token.into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(decode_token(SECRET, &tampered, TokenPurpose::Access).is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = encode_token(SECRET, 42, TokenPurpose::Access, 3600).unwrap();
        assert!(decode_token("other-secret", &token, TokenPurpose::Access).is_err());
    }

    #[test]
    fn expired_token_rejected() {
        // Well past the default validation leeway
        let token = encode_token(SECRET, 42, TokenPurpose::Access, -7200).unwrap();
        assert!(decode_token(SECRET, &token, TokenPurpose::Access).is_err());
    }

    #[test]
    fn verification_token_is_not_an_access_token() {
        let token = encode_verification_token(SECRET, 42).unwrap();
        assert!(decode_token(SECRET, &token, TokenPurpose::Access).is_err());
        assert!(decode_token(SECRET, &token, TokenPurpose::Verification).is_ok());
    }

    #[test]
    fn access_token_does_not_verify_an_email() {
        let token = encode_token(SECRET, 42, TokenPurpose::Access, 3600).unwrap();
        assert!(decode_token(SECRET, &token, TokenPurpose::Verification).is_err());
    }
}
