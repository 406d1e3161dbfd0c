//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Setup test database:
//!   docker-compose -f docker-compose.test.yml up -d test-db
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `hustings_test`)
//!   `TEST_DB_PASSWORD` (default: `hustings_test`)
//!   `TEST_DB_NAME` (default: `hustings_test`)

#![allow(clippy::unwrap_used)]

use hustings_db::test_utils::{TestDatabase, TestDbConfig};

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_cleanup() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = db.cleanup().await;
    assert!(result.is_ok(), "Cleanup failed: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_apply() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = hustings_db::migrate(db.connection()).await;
    assert!(result.is_ok(), "Migrations failed: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_execute_query() {
    let db = TestDatabase::new().await.expect("Failed to connect");

    // Connection should be valid
    use sea_orm::ConnectionTrait;
    let result = db
        .connection()
        .execute(sea_orm::Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT 1".to_string(),
        ))
        .await;

    assert!(result.is_ok(), "Query failed: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_concurrent_submits_respect_positive_cap() {
    use hustings_common::AppError;
    use hustings_db::entities::{candidate, party, vote::VoteType, voter};
    use hustings_db::repositories::{CandidateRepository, VoteRepository};
    use sea_orm::{ActiveModelTrait, Set};
    use std::sync::Arc;

    let db = TestDatabase::create_unique()
        .await
        .expect("Failed to create test database");
    hustings_db::migrate(db.connection())
        .await
        .expect("Migrations failed");

    // `DatabaseConnection` is not `Clone` with sea-orm's `mock` feature on, so
    // re-wrap the same underlying pool to get an owned handle.
    let conn = Arc::new(sea_orm::SqlxPostgresConnector::from_sqlx_postgres_pool(
        db.connection().get_postgres_connection_pool().clone(),
    ));

    party::ActiveModel {
        id: Set("p1".to_string()),
        name: Set("Unity".to_string()),
        image: Set("https://example.com/rose.png".to_string()),
        manifesto: Set("Fairness first.".to_string()),
        created_at: Set(chrono::Utc::now().into()),
    }
    .insert(conn.as_ref())
    .await
    .expect("Failed to seed party");

    candidate::ActiveModel {
        id: Set("c1".to_string()),
        first_name: Set("Grace".to_string()),
        last_name: Set("Hopper".to_string()),
        party_id: Set("p1".to_string()),
        constituency_id: Set(1),
        image: Set("https://example.com/grace.png".to_string()),
        statement: Set("Count what counts.".to_string()),
        vote_count: Set(0),
        created_at: Set(chrono::Utc::now().into()),
    }
    .insert(conn.as_ref())
    .await
    .expect("Failed to seed candidate");

    voter::ActiveModel {
        id: Set("v1".to_string()),
        first_name: Set("Ada".to_string()),
        last_name: Set("Lovelace".to_string()),
        gov_id: Set("12345678".to_string()),
        email: Set("ada@example.com".to_string()),
        password_hash: Set("hash".to_string()),
        constituency_id: Set(1),
        is_admin: Set(false),
        created_at: Set(chrono::Utc::now().into()),
    }
    .insert(conn.as_ref())
    .await
    .expect("Failed to seed voter");

    let votes = VoteRepository::new(Arc::clone(&conn));
    votes
        .submit("b1", "v1", "c1", VoteType::Positive, 2)
        .await
        .expect("First vote should land");

    // One positive slot remains; two submissions race for it. The voter row
    // lock serializes them, so exactly one commits.
    let (a, b) = tokio::join!(
        votes.submit("b2", "v1", "c1", VoteType::Positive, 2),
        votes.submit("b3", "v1", "c1", VoteType::Positive, 2),
    );
    assert_ne!(
        a.is_ok(),
        b.is_ok(),
        "exactly one racing vote must land: {a:?} / {b:?}"
    );
    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(loser, Err(AppError::CapExceeded(_))));

    let tally = CandidateRepository::new(Arc::clone(&conn))
        .find_by_id("c1")
        .await
        .expect("Failed to load candidate")
        .expect("Candidate should exist")
        .vote_count;
    assert_eq!(tally, 2);

    db.drop_database().await.expect("Failed to drop database");
}

#[test]
fn test_config_from_env() {
    // Test that default config is valid
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}

#[test]
fn test_postgres_url_format() {
    let config = TestDbConfig::default();
    let url = config.postgres_url();
    assert!(url.ends_with("/postgres"));
}
