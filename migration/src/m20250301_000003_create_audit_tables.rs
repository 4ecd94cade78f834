use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create auth_audit_logs table (append-only)
        manager
            .create_table(
                Table::create()
                    .table(AuthAuditLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuthAuditLogs::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(AuthAuditLogs::UserId).string().null())
                    .col(ColumnDef::new(AuthAuditLogs::EventType).string_len(16).not_null())
                    .col(ColumnDef::new(AuthAuditLogs::IpAddress).string_len(64).null())
                    .col(ColumnDef::new(AuthAuditLogs::UserAgent).string_len(255).null())
                    .col(ColumnDef::new(AuthAuditLogs::RefreshTokenId).string().null())
                    .col(ColumnDef::new(AuthAuditLogs::Detail).text().null())
                    .col(ColumnDef::new(AuthAuditLogs::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_auth_audit_logs_user_id")
                            .from(AuthAuditLogs::Table, AuthAuditLogs::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_auth_audit_logs_refresh_token_id")
                            .from(AuthAuditLogs::Table, AuthAuditLogs::RefreshTokenId)
                            .to(RefreshTokens::Table, RefreshTokens::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_auth_audit_logs_user_id")
                    .table(AuthAuditLogs::Table)
                    .col(AuthAuditLogs::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_auth_audit_logs_event_type")
                    .table(AuthAuditLogs::Table)
                    .col(AuthAuditLogs::EventType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthAuditLogs::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum RefreshTokens {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum AuthAuditLogs {
    Table,
    Id,
    UserId,
    EventType,
    IpAddress,
    UserAgent,
    RefreshTokenId,
    Detail,
    CreatedAt,
}
