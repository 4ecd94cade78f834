use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Authentication-relevant event kinds recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AuthEventType {
    #[sea_orm(string_value = "REGISTER")]
    Register,
    #[sea_orm(string_value = "LOGIN")]
    Login,
    #[sea_orm(string_value = "LOGOUT")]
    Logout,
    #[sea_orm(string_value = "REFRESH")]
    Refresh,
}

impl AuthEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Register => "REGISTER",
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::Refresh => "REFRESH",
        }
    }
}

/// Append-only audit record. `user_id` is nullable so failed lookups
/// (e.g. logout with an unknown token) still leave a trace.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "auth_audit_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub user_id: Option<String>,
    pub event_type: AuthEventType,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub refresh_token_id: Option<String>,
    pub detail: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::refresh_token::Entity",
        from = "Column::RefreshTokenId",
        to = "super::refresh_token::Column::Id"
    )]
    RefreshToken,
}

impl ActiveModelBehavior for ActiveModel {}
