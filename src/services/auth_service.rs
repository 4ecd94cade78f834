use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::errors::{AuthError, InternalError};
use crate::services::{PasswordService, TokenService};
use crate::stores::{AuditStore, NewAuditEvent, RefreshTokenStore, RevocationReason, UserStore};
use crate::types::db::auth_audit_log::AuthEventType;
use crate::types::db::user::{self, UserRole};
use crate::types::db::refresh_token;
use crate::types::dto::auth::{
    LoginRequest, RegisterFacilityRequest, RegisterWorkerRequest, TokenPairResponse,
};
use crate::types::internal::auth::Claims;

/// Orchestrates registration, login, refresh and logout.
///
/// Every operation that writes more than one row runs inside a single
/// transaction; rollback happens automatically when the transaction is
/// dropped on an error path. Audit events for register/login/refresh are
/// part of that same transaction so audit and token issuance commit
/// together.
pub struct AuthService {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    refresh_token_store: Arc<RefreshTokenStore>,
    audit_store: Arc<AuditStore>,
    password_service: Arc<PasswordService>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        db: DatabaseConnection,
        user_store: Arc<UserStore>,
        refresh_token_store: Arc<RefreshTokenStore>,
        audit_store: Arc<AuditStore>,
        password_service: Arc<PasswordService>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            db,
            user_store,
            refresh_token_store,
            audit_store,
            password_service,
            token_service,
        }
    }

    /// Register a worker account with its profile and issue a token pair
    ///
    /// User, Worker profile, refresh token and REGISTER audit event all
    /// commit atomically or not at all.
    pub async fn register_worker(
        &self,
        payload: RegisterWorkerRequest,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<TokenPairResponse, AuthError> {
        Self::validate_registration(&payload.email, &payload.password)?;
        if payload.full_name.trim().is_empty() {
            return Err(AuthError::validation_error("full_name must not be empty"));
        }

        let password_hash = self.hash_password(payload.password.clone()).await?;
        let now = Utc::now();

        let txn = self.begin().await?;

        if self
            .user_store
            .get_by_email(&txn, &payload.email)
            .await?
            .is_some()
        {
            return Err(AuthError::email_already_registered());
        }

        let new_user = self
            .user_store
            .create_user(&txn, &payload.email, password_hash, UserRole::Worker, now)
            .await?;
        let profile = self
            .user_store
            .create_worker_profile(&txn, &new_user.id, &payload, now)
            .await?;

        let (pair, refresh_row) = self
            .issue_token_pair(
                &txn,
                &new_user,
                Some(profile.id.clone()),
                None,
                ip_address.clone(),
                user_agent.clone(),
            )
            .await?;

        self.audit_store
            .record(
                &txn,
                NewAuditEvent::new(AuthEventType::Register)
                    .user_id(&new_user.id)
                    .client(ip_address, user_agent)
                    .refresh_token_id(&refresh_row.id),
                now,
            )
            .await?;

        self.commit(txn).await?;
        tracing::info!(user_id = %new_user.id, role = "WORKER", "account registered");
        Ok(pair)
    }

    /// Register a facility account; mirrors worker registration
    pub async fn register_facility(
        &self,
        payload: RegisterFacilityRequest,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<TokenPairResponse, AuthError> {
        Self::validate_registration(&payload.email, &payload.password)?;
        if payload.legal_name.trim().is_empty() {
            return Err(AuthError::validation_error("legal_name must not be empty"));
        }

        let password_hash = self.hash_password(payload.password.clone()).await?;
        let now = Utc::now();

        let txn = self.begin().await?;

        if self
            .user_store
            .get_by_email(&txn, &payload.email)
            .await?
            .is_some()
        {
            return Err(AuthError::email_already_registered());
        }

        let new_user = self
            .user_store
            .create_user(&txn, &payload.email, password_hash, UserRole::Facility, now)
            .await?;
        let profile = self
            .user_store
            .create_facility_profile(&txn, &new_user.id, &payload, now)
            .await?;

        let (pair, refresh_row) = self
            .issue_token_pair(
                &txn,
                &new_user,
                None,
                Some(profile.id.clone()),
                ip_address.clone(),
                user_agent.clone(),
            )
            .await?;

        self.audit_store
            .record(
                &txn,
                NewAuditEvent::new(AuthEventType::Register)
                    .user_id(&new_user.id)
                    .client(ip_address, user_agent)
                    .refresh_token_id(&refresh_row.id),
                now,
            )
            .await?;

        self.commit(txn).await?;
        tracing::info!(user_id = %new_user.id, role = "FACILITY", "account registered");
        Ok(pair)
    }

    /// Authenticate a worker and issue a token pair
    pub async fn login_worker(
        &self,
        credentials: LoginRequest,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<TokenPairResponse, AuthError> {
        let user = self
            .authenticate(&credentials, ip_address.clone(), user_agent.clone())
            .await?;

        if user.role != UserRole::Worker {
            return Err(AuthError::wrong_account_type());
        }
        let profile = self
            .user_store
            .get_worker_for_user(&self.db, &user.id)
            .await?
            .ok_or_else(AuthError::profile_missing)?;

        self.complete_login(&user, Some(profile.id), None, ip_address, user_agent)
            .await
    }

    /// Authenticate a facility and issue a token pair
    pub async fn login_facility(
        &self,
        credentials: LoginRequest,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<TokenPairResponse, AuthError> {
        let user = self
            .authenticate(&credentials, ip_address.clone(), user_agent.clone())
            .await?;

        if user.role != UserRole::Facility {
            return Err(AuthError::wrong_account_type());
        }
        let profile = self
            .user_store
            .get_facility_for_user(&self.db, &user.id)
            .await?
            .ok_or_else(AuthError::profile_missing)?;

        self.complete_login(&user, None, Some(profile.id), ip_address, user_agent)
            .await
    }

    /// Redeem a refresh token for a brand-new pair
    ///
    /// Single-use under rotation: the old row is revoked with reason
    /// `rotated` and chained to its replacement in the same transaction
    /// that creates the new row, so no interleaving request can see one
    /// without the other. A second redemption of the same token fails as
    /// invalid.
    pub async fn refresh_session(
        &self,
        refresh_token_plaintext: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<TokenPairResponse, AuthError> {
        let token_hash = self.token_service.hash_refresh_token(refresh_token_plaintext);
        let now = Utc::now();

        let txn = self.begin().await?;

        let stored = self
            .refresh_token_store
            .find_by_hash(&txn, &token_hash)
            .await?;
        let stored = match stored {
            Some(row) if row.revoked_at.is_none() => row,
            _ => return Err(AuthError::invalid_refresh_token()),
        };

        if stored.expires_at < now {
            // Lazy expiry: make the terminal state visible on the row
            self.refresh_token_store
                .revoke(&txn, &stored, RevocationReason::ExpiredDetected, now)
                .await?;
            self.commit(txn).await?;
            return Err(AuthError::refresh_token_expired());
        }

        let user = self
            .user_store
            .get_by_id(&txn, &stored.user_id)
            .await?
            .ok_or_else(|| {
                tracing::error!(token_id = %stored.id, "refresh token without owning user");
                AuthError::internal_error()
            })?;
        if !user.is_active {
            return Err(AuthError::account_disabled());
        }

        // Profiles may have changed since issuance; never trust the ids
        // embedded in the old token.
        let (worker_id, facility_id) = self.user_store.profile_ids(&txn, &user.id).await?;

        let (pair, new_row) = self
            .issue_token_pair(
                &txn,
                &user,
                worker_id,
                facility_id,
                ip_address.clone(),
                user_agent.clone(),
            )
            .await?;

        self.refresh_token_store
            .rotate(&txn, &stored, &new_row.id, now)
            .await?;

        self.audit_store
            .record(
                &txn,
                NewAuditEvent::new(AuthEventType::Refresh)
                    .user_id(&user.id)
                    .client(ip_address, user_agent)
                    .refresh_token_id(&new_row.id),
                now,
            )
            .await?;

        self.commit(txn).await?;
        Ok(pair)
    }

    /// Revoke a refresh token on logout
    ///
    /// Idempotent and deliberately tolerant: unknown or already-revoked
    /// tokens still succeed, so the endpoint leaks nothing about token
    /// validity. The anomaly is recorded in the audit log instead.
    pub async fn logout(
        &self,
        refresh_token_plaintext: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<(), AuthError> {
        let token_hash = self.token_service.hash_refresh_token(refresh_token_plaintext);
        let now = Utc::now();

        let stored = self
            .refresh_token_store
            .find_by_hash(&self.db, &token_hash)
            .await?;

        let Some(stored) = stored else {
            let event = NewAuditEvent::new(AuthEventType::Logout)
                .client(ip_address, user_agent)
                .detail("Attempted logout with unknown refresh token");
            if let Err(audit_err) = self.audit_store.record(&self.db, event, now).await {
                tracing::error!(error = %audit_err, "failed to record unknown-token logout");
            }
            return Ok(());
        };

        let txn = self.begin().await?;

        if stored.revoked_at.is_none() {
            self.refresh_token_store
                .revoke(&txn, &stored, RevocationReason::UserLogout, now)
                .await?;
        }

        self.audit_store
            .record(
                &txn,
                NewAuditEvent::new(AuthEventType::Logout)
                    .user_id(&stored.user_id)
                    .client(ip_address, user_agent)
                    .refresh_token_id(&stored.id),
                now,
            )
            .await?;

        self.commit(txn).await?;
        Ok(())
    }

    /// Decode a bearer access token for downstream identity resolution
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.token_service.validate_access_token(token)
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    fn validate_registration(email: &str, password: &str) -> Result<(), AuthError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') || email.starts_with('@') || email.ends_with('@')
        {
            return Err(AuthError::validation_error("email is not a valid address"));
        }
        if password.is_empty() {
            return Err(AuthError::validation_error("password must not be empty"));
        }
        Ok(())
    }

    /// Shared credential check for both login flows.
    ///
    /// Unknown email and wrong password produce the identical error so
    /// responses cannot be used to enumerate accounts. Failures are
    /// audited best-effort outside the (failed) operation.
    async fn authenticate(
        &self,
        credentials: &LoginRequest,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<user::Model, AuthError> {
        let user = self
            .user_store
            .get_by_email(&self.db, &credentials.email)
            .await?;

        let Some(user) = user else {
            self.audit_login_failure(None, "unknown email", ip_address, user_agent)
                .await;
            return Err(AuthError::invalid_credentials());
        };

        if !user.is_active {
            return Err(AuthError::account_disabled());
        }

        let verified = self
            .verify_password(credentials.password.clone(), user.password_hash.clone())
            .await?;
        if !verified {
            self.audit_login_failure(Some(user.id.clone()), "wrong password", ip_address, user_agent)
                .await;
            return Err(AuthError::invalid_credentials());
        }

        Ok(user)
    }

    /// Transactional tail of a successful login: token pair, last-login
    /// stamp and LOGIN audit event commit together.
    async fn complete_login(
        &self,
        user: &user::Model,
        worker_id: Option<String>,
        facility_id: Option<String>,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<TokenPairResponse, AuthError> {
        let now = Utc::now();
        let txn = self.begin().await?;

        let (pair, refresh_row) = self
            .issue_token_pair(
                &txn,
                user,
                worker_id,
                facility_id,
                ip_address.clone(),
                user_agent.clone(),
            )
            .await?;

        self.user_store.set_last_login(&txn, user, now).await?;

        self.audit_store
            .record(
                &txn,
                NewAuditEvent::new(AuthEventType::Login)
                    .user_id(&user.id)
                    .client(ip_address, user_agent)
                    .refresh_token_id(&refresh_row.id),
                now,
            )
            .await?;

        self.commit(txn).await?;
        Ok(pair)
    }

    /// Mint an access token, persist a refresh row, and build the wire
    /// response. The refresh plaintext appears only in the response.
    async fn issue_token_pair(
        &self,
        conn: &impl ConnectionTrait,
        user: &user::Model,
        worker_id: Option<String>,
        facility_id: Option<String>,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<(TokenPairResponse, refresh_token::Model), AuthError> {
        let now = Utc::now();

        let (access_token, access_expires_at) = self.token_service.issue_access_token(
            user,
            worker_id.clone(),
            facility_id.clone(),
            now,
        )?;

        let refresh_plaintext = self.token_service.generate_refresh_token();
        let refresh_hash = self.token_service.hash_refresh_token(&refresh_plaintext);
        let refresh_expires_at = self.token_service.refresh_expires_at(now);

        let refresh_row = self
            .refresh_token_store
            .issue(
                conn,
                &user.id,
                refresh_hash,
                refresh_expires_at,
                ip_address,
                user_agent,
                now,
            )
            .await?;

        let pair = TokenPairResponse {
            access_token,
            refresh_token: refresh_plaintext,
            token_type: "bearer".to_string(),
            expires_at: access_expires_at.to_rfc3339(),
            refresh_expires_at: refresh_expires_at.to_rfc3339(),
            user_id: user.id.clone(),
            role: user.role.as_str().to_string(),
            worker_id,
            facility_id,
        };

        Ok((pair, refresh_row))
    }

    /// Best-effort audit of a failed login; never fails the caller.
    async fn audit_login_failure(
        &self,
        user_id: Option<String>,
        reason: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) {
        let mut event = NewAuditEvent::new(AuthEventType::Login)
            .client(ip_address, user_agent)
            .detail(format!("login failed: {reason}"));
        event.user_id = user_id;

        if let Err(audit_err) = self.audit_store.record(&self.db, event, Utc::now()).await {
            tracing::error!(error = %audit_err, "failed to record login failure");
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let service = Arc::clone(&self.password_service);
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing task failed");
                AuthError::internal_error()
            })?
            .map_err(AuthError::from)
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let service = Arc::clone(&self.password_service);
        tokio::task::spawn_blocking(move || service.verify(&password, &hash))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "password verification task failed");
                AuthError::internal_error()
            })?
            .map_err(AuthError::from)
    }

    async fn begin(&self) -> Result<DatabaseTransaction, AuthError> {
        self.db
            .begin()
            .await
            .map_err(|e| AuthError::from(InternalError::database("begin_transaction", e)))
    }

    async fn commit(&self, txn: DatabaseTransaction) -> Result<(), AuthError> {
        txn.commit()
            .await
            .map_err(|e| AuthError::from(InternalError::database("commit_transaction", e)))
    }
}
