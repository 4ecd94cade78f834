use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::types::db::user::{self, UserRole};
use crate::types::db::{facility, worker};
use crate::types::dto::auth::{RegisterFacilityRequest, RegisterWorkerRequest};

/// Store for user identities and their role profiles.
///
/// Methods take `conn: &impl ConnectionTrait` so a caller-owned
/// transaction spans every multi-row write.
pub struct UserStore;

impl UserStore {
    pub fn new() -> Self {
        Self
    }

    /// Look up a user by email, case-insensitively
    ///
    /// Emails are stored lowercased; the lookup normalizes the same way.
    pub async fn get_by_email(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(Self::normalize_email(email)))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_user_by_email", e))
    }

    /// Look up a user by id
    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(user_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_user_by_id", e))
    }

    /// Insert a new user row
    ///
    /// The unique index on `email` is the final authority against
    /// concurrent registrations; a violation surfaces as
    /// `InternalError::UniqueViolation`.
    pub async fn create_user(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
        password_hash: String,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> Result<user::Model, InternalError> {
        let new_user = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(Self::normalize_email(email)),
            password_hash: Set(password_hash),
            role: Set(role),
            is_active: Set(true),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_user.insert(conn).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                InternalError::UniqueViolation { field: "email" }
            } else {
                InternalError::database("insert_user", e)
            }
        })
    }

    /// Insert the worker profile linked 1:1 to a new WORKER user
    pub async fn create_worker_profile(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        payload: &RegisterWorkerRequest,
        now: DateTime<Utc>,
    ) -> Result<worker::Model, InternalError> {
        let profile = worker::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_owned()),
            full_name: Set(payload.full_name.clone()),
            title: Set(payload.title.clone()),
            bio: Set(payload.bio.clone()),
            profile_image_url: Set(payload.profile_image_url.clone()),
            resume_url: Set(payload.resume_url.clone()),
            city: Set(payload.city.clone()),
            state_province: Set(payload.state_province.clone()),
            postal_code: Set(payload.postal_code.clone()),
            phone: Set(payload.phone.clone()),
            education_level: Set(payload.education_level.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        profile
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_worker_profile", e))
    }

    /// Insert the facility profile linked 1:1 to a new FACILITY user
    pub async fn create_facility_profile(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        payload: &RegisterFacilityRequest,
        now: DateTime<Utc>,
    ) -> Result<facility::Model, InternalError> {
        let profile = facility::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_owned()),
            legal_name: Set(payload.legal_name.clone()),
            industry: Set(payload.industry.clone()),
            bio: Set(payload.bio.clone()),
            profile_image_url: Set(payload.profile_image_url.clone()),
            phone_e164: Set(payload.phone_e164.clone()),
            company_size_min: Set(payload.company_size_min),
            company_size_max: Set(payload.company_size_max),
            founded_year: Set(payload.founded_year),
            hq_address_line1: Set(payload.hq_address_line1.clone()),
            hq_address_line2: Set(payload.hq_address_line2.clone()),
            hq_city: Set(payload.hq_city.clone()),
            hq_state_province: Set(payload.hq_state_province.clone()),
            hq_postal_code: Set(payload.hq_postal_code.clone()),
            hq_country: Set(payload.hq_country.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        profile
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_facility_profile", e))
    }

    /// Fetch the worker profile for a user, if any
    pub async fn get_worker_for_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<Option<worker::Model>, InternalError> {
        worker::Entity::find()
            .filter(worker::Column::UserId.eq(user_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_worker_for_user", e))
    }

    /// Fetch the facility profile for a user, if any
    pub async fn get_facility_for_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<Option<facility::Model>, InternalError> {
        facility::Entity::find()
            .filter(facility::Column::UserId.eq(user_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_facility_for_user", e))
    }

    /// Resolve the user's current profile ids, reloaded fresh
    ///
    /// Refresh flows must never trust ids embedded in an old token.
    pub async fn profile_ids(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<(Option<String>, Option<String>), InternalError> {
        let worker_id = self
            .get_worker_for_user(conn, user_id)
            .await?
            .map(|w| w.id);
        let facility_id = self
            .get_facility_for_user(conn, user_id)
            .await?
            .map(|f| f.id);
        Ok((worker_id, facility_id))
    }

    /// Stamp the user's last successful login
    pub async fn set_last_login(
        &self,
        conn: &impl ConnectionTrait,
        user: &user::Model,
        now: DateTime<Utc>,
    ) -> Result<(), InternalError> {
        let mut active: user::ActiveModel = user.clone().into();
        active.last_login_at = Set(Some(now));
        active.updated_at = Set(now);
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_last_login", e))?;

        Ok(())
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
