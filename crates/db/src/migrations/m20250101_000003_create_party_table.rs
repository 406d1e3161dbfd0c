//! Create party table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Party::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Party::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Party::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Party::Image).string_len(1024).not_null())
                    .col(ColumnDef::new(Party::Manifesto).text().not_null())
                    .col(
                        ColumnDef::new(Party::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: name - party names are unique across the election
        manager
            .create_index(
                Index::create()
                    .name("idx_party_name")
                    .table(Party::Table)
                    .col(Party::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Party::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Party {
    Table,
    Id,
    Name,
    Image,
    Manifesto,
    CreatedAt,
}
