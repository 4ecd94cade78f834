// End-to-end session lifecycle against a real (in-memory) database

mod common;

use medboard_backend::errors::AuthError;
use medboard_backend::types::dto::auth::{LoginRequest, RegisterFacilityRequest, RegisterWorkerRequest};

fn worker_payload() -> RegisterWorkerRequest {
    RegisterWorkerRequest {
        email: "nurse@example.com".to_string(),
        password: "correct-horse-battery".to_string(),
        full_name: "Ana Rivera".to_string(),
        title: "Registered Nurse".to_string(),
        bio: Some("Ten years in acute care".to_string()),
        profile_image_url: None,
        resume_url: None,
        city: Some("Portland".to_string()),
        state_province: Some("OR".to_string()),
        postal_code: Some("97201".to_string()),
        phone: None,
        education_level: Some("Bachelor".to_string()),
    }
}

fn facility_payload() -> RegisterFacilityRequest {
    RegisterFacilityRequest {
        email: "admin@evergreen.example".to_string(),
        password: "facility-password".to_string(),
        legal_name: "Evergreen Care Home".to_string(),
        industry: "Long-term care".to_string(),
        bio: None,
        profile_image_url: None,
        phone_e164: Some("+15035550100".to_string()),
        company_size_min: Some(50),
        company_size_max: Some(200),
        founded_year: Some(1998),
        hq_address_line1: Some("100 Main St".to_string()),
        hq_address_line2: None,
        hq_city: Some("Seattle".to_string()),
        hq_state_province: Some("WA".to_string()),
        hq_postal_code: Some("98101".to_string()),
        hq_country: Some("US".to_string()),
    }
}

#[tokio::test]
async fn worker_session_lifecycle() {
    let db = common::setup_test_db().await;
    let service = common::build_auth_service(&db);

    // Register
    let registered = service
        .register_worker(worker_payload(), Some("203.0.113.7".to_string()), Some("app/1.0".to_string()))
        .await
        .expect("registration should succeed");
    assert_eq!(registered.role, "WORKER");
    let worker_id = registered.worker_id.clone().expect("worker id present");

    // The access token identifies the caller for downstream routers
    let claims = service
        .validate_access_token(&registered.access_token)
        .expect("fresh access token decodes");
    assert_eq!(claims.sub, registered.user_id);
    assert_eq!(claims.worker_id.as_deref(), Some(worker_id.as_str()));

    // Login again with the same credentials
    let logged_in = service
        .login_worker(
            LoginRequest {
                email: "NURSE@example.com".to_string(),
                password: "correct-horse-battery".to_string(),
            },
            None,
            None,
        )
        .await
        .expect("login should succeed with case-differing email");
    assert_eq!(logged_in.worker_id.as_deref(), Some(worker_id.as_str()));

    // Rotate the session twice; each refresh token is single-use
    let second = service
        .refresh_session(&logged_in.refresh_token, None, None)
        .await
        .expect("first refresh succeeds");
    let third = service
        .refresh_session(&second.refresh_token, None, None)
        .await
        .expect("second refresh succeeds");

    let replay = service
        .refresh_session(&logged_in.refresh_token, None, None)
        .await;
    assert!(matches!(replay, Err(AuthError::InvalidRefreshToken(_))));

    // Logout twice; both succeed, the token stays dead
    service.logout(&third.refresh_token, None, None).await.unwrap();
    service.logout(&third.refresh_token, None, None).await.unwrap();

    let after_logout = service.refresh_session(&third.refresh_token, None, None).await;
    assert!(matches!(after_logout, Err(AuthError::InvalidRefreshToken(_))));
}

#[tokio::test]
async fn facility_and_worker_roles_stay_separate() {
    let db = common::setup_test_db().await;
    let service = common::build_auth_service(&db);

    let facility = service
        .register_facility(facility_payload(), None, None)
        .await
        .expect("facility registration should succeed");
    assert_eq!(facility.role, "FACILITY");
    assert!(facility.facility_id.is_some());
    assert!(facility.worker_id.is_none());

    // A facility account cannot use the worker login
    let result = service
        .login_worker(
            LoginRequest {
                email: "admin@evergreen.example".to_string(),
                password: "facility-password".to_string(),
            },
            None,
            None,
        )
        .await;
    assert!(matches!(result, Err(AuthError::WrongAccountType(_))));

    // The correct login works and the claims carry the facility id
    let logged_in = service
        .login_facility(
            LoginRequest {
                email: "admin@evergreen.example".to_string(),
                password: "facility-password".to_string(),
            },
            None,
            None,
        )
        .await
        .expect("facility login should succeed");

    let claims = service
        .validate_access_token(&logged_in.access_token)
        .unwrap();
    assert_eq!(claims.role, "FACILITY");
    assert_eq!(claims.facility_id, logged_in.facility_id);
    assert_eq!(claims.worker_id, None);
}
