//! Create pending verification table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PendingVerification::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PendingVerification::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PendingVerification::Email).string_len(254).not_null())
                    .col(ColumnDef::new(PendingVerification::OtpCode).string_len(8).not_null())
                    .col(
                        ColumnDef::new(PendingVerification::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: email - one outstanding code per address
        manager
            .create_index(
                Index::create()
                    .name("idx_pending_verification_email")
                    .table(PendingVerification::Table)
                    .col(PendingVerification::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PendingVerification::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PendingVerification {
    Table,
    Id,
    Email,
    OtpCode,
    CreatedAt,
}
