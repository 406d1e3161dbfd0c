//! Create voter table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Voter::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Voter::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Voter::FirstName).string_len(128).not_null())
                    .col(ColumnDef::new(Voter::LastName).string_len(128).not_null())
                    .col(ColumnDef::new(Voter::GovId).string_len(16).not_null())
                    .col(ColumnDef::new(Voter::Email).string_len(254).not_null())
                    .col(ColumnDef::new(Voter::PasswordHash).string_len(256).not_null())
                    .col(ColumnDef::new(Voter::ConstituencyId).integer().not_null())
                    .col(ColumnDef::new(Voter::IsAdmin).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Voter::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_voter_constituency")
                            .from(Voter::Table, Voter::ConstituencyId)
                            .to(Constituency::Table, Constituency::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: gov_id - the login identifier
        manager
            .create_index(
                Index::create()
                    .name("idx_voter_gov_id")
                    .table(Voter::Table)
                    .col(Voter::GovId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: email - one registration per address
        manager
            .create_index(
                Index::create()
                    .name("idx_voter_email")
                    .table(Voter::Table)
                    .col(Voter::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: constituency_id (for enrolment listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_voter_constituency_id")
                    .table(Voter::Table)
                    .col(Voter::ConstituencyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Voter::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Voter {
    Table,
    Id,
    FirstName,
    LastName,
    GovId,
    Email,
    PasswordHash,
    ConstituencyId,
    IsAdmin,
    CreatedAt,
}

#[derive(Iden)]
enum Constituency {
    Table,
    Id,
}
