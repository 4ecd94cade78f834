use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::refresh_token;

/// Why a refresh token stopped being redeemable. Stored as free text on
/// the row; this enum is the single source of the reason strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationReason {
    /// Superseded by a newer token during refresh rotation
    Rotated,
    /// Explicitly revoked by the owner logging out
    UserLogout,
    /// Found expired at a redemption attempt
    ExpiredDetected,
}

impl RevocationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rotated => "rotated",
            Self::UserLogout => "user_logout",
            Self::ExpiredDetected => "expired-detected",
        }
    }
}

/// Store for refresh token rows.
///
/// Rows are revoked, never deleted; the rotation chain
/// (`replaced_by_token_id`) stays queryable indefinitely for forensics.
pub struct RefreshTokenStore;

impl RefreshTokenStore {
    pub fn new() -> Self {
        Self
    }

    /// Persist a new refresh token row
    ///
    /// Only the digest of the secret is stored; the caller keeps the
    /// plaintext for the single hand-off to the client.
    pub async fn issue(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        token_hash: String,
        expires_at: DateTime<Utc>,
        ip_address: Option<String>,
        user_agent: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<refresh_token::Model, InternalError> {
        let new_token = refresh_token::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_owned()),
            token_hash: Set(token_hash),
            expires_at: Set(expires_at),
            revoked_at: Set(None),
            revoked_reason: Set(None),
            replaced_by_token_id: Set(None),
            ip_address: Set(ip_address),
            user_agent: Set(user_agent),
            created_at: Set(now),
        };

        new_token
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_refresh_token", e))
    }

    /// Look up a token row by the digest of a presented secret
    pub async fn find_by_hash(
        &self,
        conn: &impl ConnectionTrait,
        token_hash: &str,
    ) -> Result<Option<refresh_token::Model>, InternalError> {
        refresh_token::Entity::find()
            .filter(refresh_token::Column::TokenHash.eq(token_hash))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_refresh_token_by_hash", e))
    }

    /// Mark a token revoked with the given reason
    pub async fn revoke(
        &self,
        conn: &impl ConnectionTrait,
        token: &refresh_token::Model,
        reason: RevocationReason,
        now: DateTime<Utc>,
    ) -> Result<(), InternalError> {
        let mut active: refresh_token::ActiveModel = token.clone().into();
        active.revoked_at = Set(Some(now));
        active.revoked_reason = Set(Some(reason.as_str().to_string()));
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("revoke_refresh_token", e))?;

        Ok(())
    }

    /// Revoke a redeemed token and chain it to its replacement
    ///
    /// Must run inside the same transaction that inserted the new row:
    /// if that insert rolls back, this revocation rolls back with it and
    /// the old token stays valid (no partial rotation).
    pub async fn rotate(
        &self,
        conn: &impl ConnectionTrait,
        old_token: &refresh_token::Model,
        new_token_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), InternalError> {
        let mut active: refresh_token::ActiveModel = old_token.clone().into();
        active.revoked_at = Set(Some(now));
        active.revoked_reason = Set(Some(RevocationReason::Rotated.as_str().to_string()));
        active.replaced_by_token_id = Set(Some(new_token_id.to_owned()));
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("rotate_refresh_token", e))?;

        Ok(())
    }
}

impl Default for RefreshTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::UserStore;
    use crate::types::db::user::UserRole;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    async fn seed_user(db: &DatabaseConnection) -> String {
        UserStore::new()
            .create_user(db, "owner@x.com", "$2b$04$hash".to_string(), UserRole::Worker, Utc::now())
            .await
            .expect("Failed to seed user")
            .id
    }

    #[tokio::test]
    async fn test_issue_and_find_by_hash() {
        let db = setup_test_db().await;
        let user_id = seed_user(&db).await;
        let store = RefreshTokenStore::new();
        let now = Utc::now();

        let issued = store
            .issue(
                &db,
                &user_id,
                "digest-1".to_string(),
                now + chrono::Duration::days(7),
                Some("10.0.0.1".to_string()),
                Some("test-agent".to_string()),
                now,
            )
            .await
            .unwrap();

        let found = store.find_by_hash(&db, "digest-1").await.unwrap().unwrap();
        assert_eq!(found.id, issued.id);
        assert_eq!(found.user_id, user_id);
        assert!(found.is_active(now));

        assert!(store.find_by_hash(&db, "digest-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_sets_timestamp_and_reason() {
        let db = setup_test_db().await;
        let user_id = seed_user(&db).await;
        let store = RefreshTokenStore::new();
        let now = Utc::now();

        let token = store
            .issue(&db, &user_id, "digest-1".to_string(), now + chrono::Duration::days(7), None, None, now)
            .await
            .unwrap();

        store
            .revoke(&db, &token, RevocationReason::UserLogout, now)
            .await
            .unwrap();

        let reloaded = store.find_by_hash(&db, "digest-1").await.unwrap().unwrap();
        assert!(reloaded.revoked_at.is_some());
        assert_eq!(reloaded.revoked_reason.as_deref(), Some("user_logout"));
        assert!(!reloaded.is_active(now));
        // Revoked, not deleted
        assert!(reloaded.replaced_by_token_id.is_none());
    }

    #[tokio::test]
    async fn test_rotate_chains_old_row_to_replacement() {
        let db = setup_test_db().await;
        let user_id = seed_user(&db).await;
        let store = RefreshTokenStore::new();
        let now = Utc::now();
        let expiry = now + chrono::Duration::days(7);

        let old = store
            .issue(&db, &user_id, "digest-old".to_string(), expiry, None, None, now)
            .await
            .unwrap();
        let new = store
            .issue(&db, &user_id, "digest-new".to_string(), expiry, None, None, now)
            .await
            .unwrap();

        store.rotate(&db, &old, &new.id, now).await.unwrap();

        let old_reloaded = store.find_by_hash(&db, "digest-old").await.unwrap().unwrap();
        assert_eq!(old_reloaded.revoked_reason.as_deref(), Some("rotated"));
        assert_eq!(old_reloaded.replaced_by_token_id.as_deref(), Some(new.id.as_str()));
        assert!(!old_reloaded.is_active(now));

        let new_reloaded = store.find_by_hash(&db, "digest-new").await.unwrap().unwrap();
        assert!(new_reloaded.is_active(now));
    }

    #[tokio::test]
    async fn test_expired_token_is_not_active_even_when_unrevoked() {
        let db = setup_test_db().await;
        let user_id = seed_user(&db).await;
        let store = RefreshTokenStore::new();
        let now = Utc::now();

        let token = store
            .issue(
                &db,
                &user_id,
                "digest-expired".to_string(),
                now - chrono::Duration::hours(1),
                None,
                None,
                now - chrono::Duration::days(7),
            )
            .await
            .unwrap();

        assert!(token.revoked_at.is_none());
        assert!(!token.is_active(now));
    }
}
