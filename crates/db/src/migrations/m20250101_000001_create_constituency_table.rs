//! Create constituency table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Constituency::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Constituency::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Constituency::Name).string_len(128).not_null())
                    .to_owned(),
            )
            .await?;

        // Unique index: name
        manager
            .create_index(
                Index::create()
                    .name("idx_constituency_name")
                    .table(Constituency::Table)
                    .col(Constituency::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Constituency::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Constituency {
    Table,
    Id,
    Name,
}
