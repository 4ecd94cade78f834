use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Settings;
use crate::services::{AuthService, PasswordService, TokenService};
use crate::stores::{AuditStore, RefreshTokenStore, UserStore};

/// Centralized application data following the main-owned stores pattern.
///
/// All dependencies are created once in `main` and shared via `Arc`;
/// settings are injected here rather than read from globals.
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: Arc<Settings>,
    pub user_store: Arc<UserStore>,
    pub refresh_token_store: Arc<RefreshTokenStore>,
    pub audit_store: Arc<AuditStore>,
    pub password_service: Arc<PasswordService>,
    pub token_service: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database connection should already be migrated.
    pub fn init(db: DatabaseConnection, settings: Settings) -> Self {
        tracing::debug!("Creating stores and services...");

        let settings = Arc::new(settings);

        let user_store = Arc::new(UserStore::new());
        let refresh_token_store = Arc::new(RefreshTokenStore::new());
        let audit_store = Arc::new(AuditStore::new());

        let password_service = Arc::new(PasswordService::new(settings.bcrypt_cost));
        let token_service = Arc::new(TokenService::new(
            settings.jwt_secret_key.clone(),
            settings.jwt_algorithm,
            settings.access_token_expire_minutes,
            settings.refresh_token_expire_days,
        ));

        let auth_service = Arc::new(AuthService::new(
            db.clone(),
            Arc::clone(&user_store),
            Arc::clone(&refresh_token_store),
            Arc::clone(&audit_store),
            Arc::clone(&password_service),
            Arc::clone(&token_service),
        ));

        tracing::info!("AppData initialization complete");

        Self {
            db,
            settings,
            user_store,
            refresh_token_store,
            audit_store,
            password_service,
            token_service,
            auth_service,
        }
    }
}
