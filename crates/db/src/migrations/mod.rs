//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_constituency_table;
mod m20250101_000002_create_voter_table;
mod m20250101_000003_create_party_table;
mod m20250101_000004_create_candidate_table;
mod m20250101_000005_create_vote_table;
mod m20250101_000006_create_pending_verification_table;
mod m20250101_000007_seed_constituencies;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_constituency_table::Migration),
            Box::new(m20250101_000002_create_voter_table::Migration),
            Box::new(m20250101_000003_create_party_table::Migration),
            Box::new(m20250101_000004_create_candidate_table::Migration),
            Box::new(m20250101_000005_create_vote_table::Migration),
            Box::new(m20250101_000006_create_pending_verification_table::Migration),
            Box::new(m20250101_000007_seed_constituencies::Migration),
        ]
    }
}
