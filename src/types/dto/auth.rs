use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for worker registration
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct RegisterWorkerRequest {
    /// Email address (compared case-insensitively)
    pub email: String,

    /// Plaintext password, hashed before storage
    pub password: String,

    /// Worker's full name
    pub full_name: String,

    /// Job title, e.g. "Registered Nurse"
    pub title: String,

    /// Short biography
    pub bio: Option<String>,

    /// Profile image URL
    pub profile_image_url: Option<String>,

    /// Resume URL
    pub resume_url: Option<String>,

    pub city: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub education_level: Option<String>,
}

/// Request model for facility registration
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct RegisterFacilityRequest {
    /// Email address (compared case-insensitively)
    pub email: String,

    /// Plaintext password, hashed before storage
    pub password: String,

    /// Registered legal name of the facility
    pub legal_name: String,

    /// Industry segment, e.g. "Hospital"
    pub industry: String,

    /// Short description
    pub bio: Option<String>,

    /// Profile image URL
    pub profile_image_url: Option<String>,

    /// Contact phone in E.164 format
    pub phone_e164: Option<String>,

    pub company_size_min: Option<i32>,
    pub company_size_max: Option<i32>,
    pub founded_year: Option<i32>,

    pub hq_address_line1: Option<String>,
    pub hq_address_line2: Option<String>,
    pub hq_city: Option<String>,
    pub hq_state_province: Option<String>,
    pub hq_postal_code: Option<String>,
    pub hq_country: Option<String>,
}

/// Request model for login
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address for authentication
    pub email: String,

    /// Password for authentication
    pub password: String,
}

/// Request model for token refresh
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token to exchange for a new token pair
    pub refresh_token: String,
}

/// Request model for logout
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token to revoke
    pub refresh_token: String,
}

/// Response model carrying a freshly issued token pair
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairResponse {
    /// Signed JWT access token
    pub access_token: String,

    /// Opaque refresh token; returned exactly once in plaintext
    pub refresh_token: String,

    /// Token type (always "bearer")
    pub token_type: String,

    /// Access token expiry (RFC 3339, UTC)
    pub expires_at: String,

    /// Refresh token expiry (RFC 3339, UTC)
    pub refresh_expires_at: String,

    /// Account id (UUID)
    pub user_id: String,

    /// Role enum value
    pub role: String,

    /// Worker profile id, when the account is a worker
    pub worker_id: Option<String>,

    /// Facility profile id, when the account is a facility
    pub facility_id: Option<String>,
}

/// Response model for logout
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Response model for the bearer-identity endpoint
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    /// Account id (UUID)
    pub user_id: String,

    /// Role enum value
    pub role: String,

    /// Worker profile id, when present in the token
    pub worker_id: Option<String>,

    /// Facility profile id, when present in the token
    pub facility_id: Option<String>,

    /// Token expiration time (Unix timestamp)
    pub expires_at: i64,
}
