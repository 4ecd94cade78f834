use serde::{Deserialize, Serialize};

/// Access-token claims.
///
/// Fixed-shape record rather than an open claim bag so missing or renamed
/// claims fail at deserialization, while still serializing to the same
/// wire JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Role enum value (`WORKER` / `FACILITY` / `ADMIN`)
    pub role: String,

    /// Singleton list containing `role`, kept for multi-role forward
    /// compatibility on the wire.
    pub roles: Vec<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Always `"access"` for tokens minted here
    #[serde(rename = "type")]
    pub token_type: String,

    /// Worker profile id, present for WORKER subjects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,

    /// Facility profile id, present for FACILITY subjects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<String>,
}
