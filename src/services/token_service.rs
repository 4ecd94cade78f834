use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::errors::{AuthError, InternalError};
use crate::types::db::user;
use crate::types::internal::auth::Claims;

/// Bytes of entropy behind every refresh token secret
const REFRESH_TOKEN_BYTES: usize = 48;

/// Signs and verifies access tokens, and generates/digests the opaque
/// refresh secrets. Decoding is a pure function of the token, the secret
/// and the clock; all I/O lives in the stores.
pub struct TokenService {
    jwt_secret: String,
    algorithm: Algorithm,
    access_expiration_minutes: i64,
    refresh_expiration_days: i64,
}

impl TokenService {
    /// Create a new TokenService
    ///
    /// # Arguments
    /// * `jwt_secret` - Shared signing secret
    /// * `algorithm` - Signing algorithm (HS256 in the default config)
    /// * `access_expiration_minutes` - Access token TTL
    /// * `refresh_expiration_days` - Refresh token TTL
    pub fn new(
        jwt_secret: String,
        algorithm: Algorithm,
        access_expiration_minutes: i64,
        refresh_expiration_days: i64,
    ) -> Self {
        Self {
            jwt_secret,
            algorithm,
            access_expiration_minutes,
            refresh_expiration_days,
        }
    }

    /// Sign an access token for the given user
    ///
    /// Embeds the role both as `role` and as the singleton `roles` list,
    /// plus whichever profile id applies.
    ///
    /// # Returns
    /// * The encoded token and its expiry instant
    pub fn issue_access_token(
        &self,
        user: &user::Model,
        worker_id: Option<String>,
        facility_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), InternalError> {
        let expires_at = self.access_expires_at(now);

        let claims = Claims {
            sub: user.id.clone(),
            role: user.role.as_str().to_string(),
            roles: vec![user.role.as_str().to_string()],
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            token_type: "access".to_string(),
            worker_id,
            facility_id,
        };

        let token = encode(
            &Header::new(self.algorithm),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("encode_access_token", e.to_string()))?;

        Ok((token, expires_at))
    }

    /// Validate an access token and return the claims
    ///
    /// Rejects bad signatures, malformed structure and expired `exp`
    /// (checked against current UTC time by the decoder); never returns
    /// partial claims.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(self.algorithm);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::expired_token(),
            _ => AuthError::invalid_token(),
        })?;

        Ok(token_data.claims)
    }

    /// Generate a cryptographically random refresh token secret
    ///
    /// URL-safe base64 over 48 random bytes. The plaintext is handed to
    /// the caller exactly once and never stored or logged.
    pub fn generate_refresh_token(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rand::rng().fill(&mut bytes[..]);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Digest a refresh token secret for storage or lookup
    ///
    /// # Returns
    /// * Hex-encoded SHA-256 of the plaintext secret
    pub fn hash_refresh_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Access token expiry for a pair issued at `now`
    pub fn access_expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::minutes(self.access_expiration_minutes)
    }

    /// Refresh token expiry for a pair issued at `now`
    pub fn refresh_expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::days(self.refresh_expiration_days)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_expiration_minutes", &self.access_expiration_minutes)
            .field("refresh_expiration_days", &self.refresh_expiration_days)
            .finish()
    }
}
