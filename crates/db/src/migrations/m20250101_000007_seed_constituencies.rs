//! Seed the constituency table.
//!
//! Ids must stay in step with the postcode lookup table shipped in
//! `config/constituencies.json`.

use sea_orm_migration::prelude::*;

const CONSTITUENCIES: [(i32, &str); 8] = [
    (1, "Ashford North"),
    (2, "Bexley Central"),
    (3, "Camden Riverside"),
    (4, "Dunmore East"),
    (5, "Eastleigh"),
    (6, "Farnworth"),
    (7, "Granton"),
    (8, "Harlow Vale"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Constituency::Table)
            .columns([Constituency::Id, Constituency::Name]);

        for (id, name) in CONSTITUENCIES {
            insert.values_panic([id.into(), name.into()]);
        }

        manager.exec_stmt(insert.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(Constituency::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Constituency {
    Table,
    Id,
    Name,
}
