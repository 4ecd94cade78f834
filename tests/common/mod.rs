// Common test utilities for integration tests

use std::sync::Arc;

use jsonwebtoken::Algorithm;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use medboard_backend::services::{AuthService, PasswordService, TokenService};
use medboard_backend::stores::{AuditStore, RefreshTokenStore, UserStore};

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Builds an AuthService wired against the given database
///
/// Uses a low bcrypt cost so the test suite stays fast.
pub fn build_auth_service(db: &DatabaseConnection) -> AuthService {
    let password_service = Arc::new(PasswordService::new(4));
    let token_service = Arc::new(TokenService::new(
        "integration-test-secret-at-least-32-chars".to_string(),
        Algorithm::HS256,
        15,
        7,
    ));

    AuthService::new(
        db.clone(),
        Arc::new(UserStore::new()),
        Arc::new(RefreshTokenStore::new()),
        Arc::new(AuditStore::new()),
        password_service,
        token_service,
    )
}
