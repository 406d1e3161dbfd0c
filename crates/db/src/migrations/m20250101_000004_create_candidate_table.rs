//! Create candidate table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Candidate::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Candidate::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Candidate::FirstName).string_len(128).not_null())
                    .col(ColumnDef::new(Candidate::LastName).string_len(128).not_null())
                    .col(ColumnDef::new(Candidate::PartyId).string_len(32).not_null())
                    .col(ColumnDef::new(Candidate::ConstituencyId).integer().not_null())
                    .col(ColumnDef::new(Candidate::Image).string_len(1024).not_null())
                    .col(ColumnDef::new(Candidate::Statement).text().not_null())
                    .col(ColumnDef::new(Candidate::VoteCount).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Candidate::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_candidate_party")
                            .from(Candidate::Table, Candidate::PartyId)
                            .to(Party::Table, Party::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_candidate_constituency")
                            .from(Candidate::Table, Candidate::ConstituencyId)
                            .to(Constituency::Table, Constituency::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: party_id (for party rosters)
        manager
            .create_index(
                Index::create()
                    .name("idx_candidate_party_id")
                    .table(Candidate::Table)
                    .col(Candidate::PartyId)
                    .to_owned(),
            )
            .await?;

        // Index: constituency_id (for ballot listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_candidate_constituency_id")
                    .table(Candidate::Table)
                    .col(Candidate::ConstituencyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Candidate::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Candidate {
    Table,
    Id,
    FirstName,
    LastName,
    PartyId,
    ConstituencyId,
    Image,
    Statement,
    VoteCount,
    CreatedAt,
}

#[derive(Iden)]
enum Party {
    Table,
    Id,
}

#[derive(Iden)]
enum Constituency {
    Table,
    Id,
}
