use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::auth_audit_log::{self, AuthEventType};

/// A pending audit record. `user_id` stays `None` for events where the
/// subject could not be resolved (e.g. logout with an unknown token).
#[derive(Debug, Clone)]
pub struct NewAuditEvent {
    pub user_id: Option<String>,
    pub event_type: AuthEventType,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub refresh_token_id: Option<String>,
    pub detail: Option<String>,
}

impl NewAuditEvent {
    pub fn new(event_type: AuthEventType) -> Self {
        Self {
            user_id: None,
            event_type,
            ip_address: None,
            user_agent: None,
            refresh_token_id: None,
            detail: None,
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn client(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }

    pub fn refresh_token_id(mut self, token_id: impl Into<String>) -> Self {
        self.refresh_token_id = Some(token_id.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Append-only store for authentication audit events. Rows are never
/// mutated or deleted.
pub struct AuditStore;

impl AuditStore {
    pub fn new() -> Self {
        Self
    }

    /// Append an audit event
    ///
    /// Runs on whatever connection the caller provides: inside the
    /// operation's transaction for register/login/refresh (so audit and
    /// token issuance commit together), or on a bare connection for the
    /// tolerant logout path.
    pub async fn record(
        &self,
        conn: &impl ConnectionTrait,
        event: NewAuditEvent,
        now: DateTime<Utc>,
    ) -> Result<(), InternalError> {
        let row = auth_audit_log::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(event.user_id),
            event_type: Set(event.event_type),
            ip_address: Set(event.ip_address),
            user_agent: Set(event.user_agent),
            refresh_token_id: Set(event.refresh_token_id),
            detail: Set(event.detail),
            created_at: Set(now),
        };

        row.insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_audit_event", e))?;

        Ok(())
    }
}

impl Default for AuditStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ColumnTrait, Database, EntityTrait, QueryFilter};

    #[tokio::test]
    async fn test_record_allows_null_user_id() {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let store = AuditStore::new();
        let event = NewAuditEvent::new(AuthEventType::Logout)
            .client(Some("10.0.0.1".to_string()), None)
            .detail("Attempted logout with unknown refresh token");

        store.record(&db, event, Utc::now()).await.unwrap();

        let rows = auth_audit_log::Entity::find()
            .filter(auth_audit_log::Column::EventType.eq(AuthEventType::Logout))
            .all(&db)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert!(rows[0].user_id.is_none());
        assert_eq!(
            rows[0].detail.as_deref(),
            Some("Attempted logout with unknown refresh token")
        );
    }
}
