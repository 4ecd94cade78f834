use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create workers table (one profile per WORKER user)
        manager
            .create_table(
                Table::create()
                    .table(Workers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Workers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Workers::UserId).string().not_null().unique_key())
                    .col(ColumnDef::new(Workers::FullName).string_len(160).not_null())
                    .col(ColumnDef::new(Workers::Title).string_len(120).not_null())
                    .col(ColumnDef::new(Workers::Bio).text().null())
                    .col(ColumnDef::new(Workers::ProfileImageUrl).string_len(512).null())
                    .col(ColumnDef::new(Workers::ResumeUrl).string_len(512).null())
                    .col(ColumnDef::new(Workers::City).string_len(120).null())
                    .col(ColumnDef::new(Workers::StateProvince).string_len(120).null())
                    .col(ColumnDef::new(Workers::PostalCode).string_len(20).null())
                    .col(ColumnDef::new(Workers::Phone).string_len(32).null())
                    .col(ColumnDef::new(Workers::EducationLevel).string_len(64).null())
                    .col(ColumnDef::new(Workers::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Workers::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workers_user_id")
                            .from(Workers::Table, Workers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create facilities table (one profile per FACILITY user)
        manager
            .create_table(
                Table::create()
                    .table(Facilities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Facilities::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Facilities::UserId).string().not_null().unique_key())
                    .col(ColumnDef::new(Facilities::LegalName).string_len(255).not_null())
                    .col(ColumnDef::new(Facilities::Industry).string_len(120).not_null())
                    .col(ColumnDef::new(Facilities::Bio).text().null())
                    .col(ColumnDef::new(Facilities::ProfileImageUrl).string_len(512).null())
                    .col(ColumnDef::new(Facilities::PhoneE164).string_len(32).null())
                    .col(ColumnDef::new(Facilities::CompanySizeMin).integer().null())
                    .col(ColumnDef::new(Facilities::CompanySizeMax).integer().null())
                    .col(ColumnDef::new(Facilities::FoundedYear).integer().null())
                    .col(ColumnDef::new(Facilities::HqAddressLine1).string_len(255).null())
                    .col(ColumnDef::new(Facilities::HqAddressLine2).string_len(255).null())
                    .col(ColumnDef::new(Facilities::HqCity).string_len(120).null())
                    .col(ColumnDef::new(Facilities::HqStateProvince).string_len(120).null())
                    .col(ColumnDef::new(Facilities::HqPostalCode).string_len(20).null())
                    .col(ColumnDef::new(Facilities::HqCountry).string_len(120).null())
                    .col(ColumnDef::new(Facilities::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Facilities::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_facilities_user_id")
                            .from(Facilities::Table, Facilities::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Workers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Facilities::Table).to_owned())
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
enum Workers {
    Table,
    Id,
    UserId,
    FullName,
    Title,
    Bio,
    ProfileImageUrl,
    ResumeUrl,
    City,
    StateProvince,
    PostalCode,
    Phone,
    EducationLevel,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Facilities {
    Table,
    Id,
    UserId,
    LegalName,
    Industry,
    Bio,
    ProfileImageUrl,
    PhoneE164,
    CompanySizeMin,
    CompanySizeMax,
    FoundedYear,
    HqAddressLine1,
    HqAddressLine2,
    HqCity,
    HqStateProvince,
    HqPostalCode,
    HqCountry,
    CreatedAt,
    UpdatedAt,
}
