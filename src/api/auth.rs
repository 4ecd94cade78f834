use poem::Request;
use poem_openapi::{auth::Bearer, payload::Json, OpenApi, SecurityScheme, Tags};
use std::sync::Arc;

use crate::api::helpers;
use crate::errors::AuthError;
use crate::services::AuthService;
use crate::types::dto::auth::{
    LoginRequest, LogoutRequest, LogoutResponse, RefreshRequest, RegisterFacilityRequest,
    RegisterWorkerRequest, TokenPairResponse, WhoAmIResponse,
};

/// Authentication API endpoints
pub struct AuthApi {
    auth_service: Arc<AuthService>,
}

impl AuthApi {
    /// Create a new AuthApi backed by the given AuthService
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(Bearer);

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a worker account and receive a token pair
    #[oai(path = "/register/worker", method = "post", tag = "AuthTags::Authentication")]
    async fn register_worker(
        &self,
        req: &Request,
        body: Json<RegisterWorkerRequest>,
    ) -> Result<Json<TokenPairResponse>, AuthError> {
        let pair = self
            .auth_service
            .register_worker(body.0, helpers::client_ip(req), helpers::user_agent(req))
            .await?;
        Ok(Json(pair))
    }

    /// Register a facility account and receive a token pair
    #[oai(path = "/register/facility", method = "post", tag = "AuthTags::Authentication")]
    async fn register_facility(
        &self,
        req: &Request,
        body: Json<RegisterFacilityRequest>,
    ) -> Result<Json<TokenPairResponse>, AuthError> {
        let pair = self
            .auth_service
            .register_facility(body.0, helpers::client_ip(req), helpers::user_agent(req))
            .await?;
        Ok(Json(pair))
    }

    /// Login as a worker
    #[oai(path = "/login/worker", method = "post", tag = "AuthTags::Authentication")]
    async fn login_worker(
        &self,
        req: &Request,
        body: Json<LoginRequest>,
    ) -> Result<Json<TokenPairResponse>, AuthError> {
        let pair = self
            .auth_service
            .login_worker(body.0, helpers::client_ip(req), helpers::user_agent(req))
            .await?;
        Ok(Json(pair))
    }

    /// Login as a facility
    #[oai(path = "/login/facility", method = "post", tag = "AuthTags::Authentication")]
    async fn login_facility(
        &self,
        req: &Request,
        body: Json<LoginRequest>,
    ) -> Result<Json<TokenPairResponse>, AuthError> {
        let pair = self
            .auth_service
            .login_facility(body.0, helpers::client_ip(req), helpers::user_agent(req))
            .await?;
        Ok(Json(pair))
    }

    /// Exchange a refresh token for a brand-new token pair
    ///
    /// The presented token is revoked and chained to its replacement;
    /// redeeming it a second time fails.
    #[oai(path = "/refresh", method = "post", tag = "AuthTags::Authentication")]
    async fn refresh(
        &self,
        req: &Request,
        body: Json<RefreshRequest>,
    ) -> Result<Json<TokenPairResponse>, AuthError> {
        let pair = self
            .auth_service
            .refresh_session(
                &body.0.refresh_token,
                helpers::client_ip(req),
                helpers::user_agent(req),
            )
            .await?;
        Ok(Json(pair))
    }

    /// Revoke a refresh token
    ///
    /// Succeeds for unknown tokens too; possession of the token is the
    /// only authority required.
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(
        &self,
        req: &Request,
        body: Json<LogoutRequest>,
    ) -> Result<Json<LogoutResponse>, AuthError> {
        self.auth_service
            .logout(
                &body.0.refresh_token,
                helpers::client_ip(req),
                helpers::user_agent(req),
            )
            .await?;

        Ok(Json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }))
    }

    /// Resolve the caller's identity from a bearer access token
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, auth: BearerAuth) -> Result<Json<WhoAmIResponse>, AuthError> {
        let claims = self.auth_service.validate_access_token(&auth.0.token)?;

        Ok(Json(WhoAmIResponse {
            user_id: claims.sub,
            role: claims.role,
            worker_id: claims.worker_id,
            facility_id: claims.facility_id,
            expires_at: claims.exp,
        }))
    }
}
