//! Candidate management.

use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use hustings_common::{AppError, AppResult, IdGenerator};
use hustings_db::{
    entities::candidate,
    repositories::{CandidateRepository, ConstituencyRepository, PartyRepository},
};

/// Input for creating or updating a candidate. Field names follow the wire
/// format used by the admin frontend.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CandidateInput {
    #[validate(length(min = 1, message = "first name is required"))]
    pub candidate_firstname: String,

    #[validate(length(min = 1, message = "last name is required"))]
    pub candidate_lastname: String,

    #[validate(length(min = 1, message = "party id is required"))]
    pub party_id: String,

    pub constituency_id: i32,

    #[validate(length(min = 1, message = "image is required"))]
    pub image: String,

    #[validate(length(min = 1, message = "statement is required"))]
    pub statement: String,
}

/// Candidate row joined with its party name, as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateWithParty {
    pub candidate_id: String,
    pub candidate_firstname: String,
    pub candidate_lastname: String,
    pub party_id: String,
    pub image: String,
    pub statement: String,
    pub party_name: String,
}

/// Full candidate view for the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateDetail {
    pub candidate_id: String,
    pub candidate_firstname: String,
    pub candidate_lastname: String,
    pub party_id: String,
    pub image: String,
    pub statement: String,
    pub party_name: String,
    pub party_image: String,
    pub constituency_name: String,
}

/// Candidate CRUD. The first and last name pair is the natural key.
#[derive(Clone)]
pub struct CandidateService {
    candidate_repo: CandidateRepository,
    party_repo: PartyRepository,
    constituency_repo: ConstituencyRepository,
    id_gen: IdGenerator,
}

impl CandidateService {
    /// Create a new candidate service.
    pub fn new(
        candidate_repo: CandidateRepository,
        party_repo: PartyRepository,
        constituency_repo: ConstituencyRepository,
    ) -> Self {
        Self {
            candidate_repo,
            party_repo,
            constituency_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// All candidates with their party names, in candidate id order.
    pub async fn list(&self) -> AppResult<Vec<CandidateWithParty>> {
        let candidates = self.candidate_repo.find_all().await?;
        let parties = self.party_repo.find_all().await?;
        let party_names: std::collections::HashMap<&str, &str> = parties
            .iter()
            .map(|p| (p.id.as_str(), p.name.as_str()))
            .collect();

        Ok(candidates
            .into_iter()
            .filter_map(|c| {
                let party_name = party_names.get(c.party_id.as_str())?;
                Some(CandidateWithParty {
                    candidate_id: c.id,
                    candidate_firstname: c.first_name,
                    candidate_lastname: c.last_name,
                    party_id: c.party_id,
                    image: c.image,
                    statement: c.statement,
                    party_name: (*party_name).to_string(),
                })
            })
            .collect())
    }

    /// A single candidate with party and constituency details resolved.
    pub async fn get(&self, id: &str) -> AppResult<CandidateDetail> {
        let candidate = self.require_candidate(id).await?;

        let party = self
            .party_repo
            .find_by_id(&candidate.party_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "party {} missing for candidate {}",
                    candidate.party_id, candidate.id
                ))
            })?;
        let constituency = self
            .constituency_repo
            .find_by_id(candidate.constituency_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "constituency {} missing for candidate {}",
                    candidate.constituency_id, candidate.id
                ))
            })?;

        Ok(CandidateDetail {
            candidate_id: candidate.id,
            candidate_firstname: candidate.first_name,
            candidate_lastname: candidate.last_name,
            party_id: party.id,
            image: candidate.image,
            statement: candidate.statement,
            party_name: party.name,
            party_image: party.image,
            constituency_name: constituency.name,
        })
    }

    /// Stand a new candidate. The tally starts at zero.
    pub async fn create(&self, input: CandidateInput) -> AppResult<candidate::Model> {
        input.validate()?;
        self.require_references(&input).await?;

        if self
            .candidate_repo
            .exists_by_name(&input.candidate_firstname, &input.candidate_lastname)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "candidate {} {} already exists",
                input.candidate_firstname, input.candidate_lastname
            )));
        }

        let model = candidate::ActiveModel {
            id: Set(self.id_gen.generate()),
            first_name: Set(input.candidate_firstname.clone()),
            last_name: Set(input.candidate_lastname.clone()),
            party_id: Set(input.party_id.clone()),
            constituency_id: Set(input.constituency_id),
            image: Set(input.image.clone()),
            statement: Set(input.statement.clone()),
            vote_count: Set(0),
            created_at: Set(Utc::now().into()),
        };
        let created = self.candidate_repo.create(model).await?;

        tracing::info!(candidate_id = %created.id, "Candidate created");
        Ok(created)
    }

    /// Replace a candidate's details. The tally is left untouched.
    pub async fn update(&self, id: &str, input: CandidateInput) -> AppResult<candidate::Model> {
        input.validate()?;

        let candidate = self.require_candidate(id).await?;
        self.require_references(&input).await?;

        let renamed = input.candidate_firstname != candidate.first_name
            || input.candidate_lastname != candidate.last_name;
        if renamed
            && self
                .candidate_repo
                .exists_by_name(&input.candidate_firstname, &input.candidate_lastname)
                .await?
        {
            return Err(AppError::Conflict(format!(
                "candidate {} {} already exists",
                input.candidate_firstname, input.candidate_lastname
            )));
        }

        let model = candidate::ActiveModel {
            id: sea_orm::Unchanged(candidate.id.clone()),
            first_name: Set(input.candidate_firstname.clone()),
            last_name: Set(input.candidate_lastname.clone()),
            party_id: Set(input.party_id.clone()),
            constituency_id: Set(input.constituency_id),
            image: Set(input.image.clone()),
            statement: Set(input.statement.clone()),
            ..Default::default()
        };
        let updated = self.candidate_repo.update(model).await?;

        tracing::info!(candidate_id = %updated.id, "Candidate updated");
        Ok(updated)
    }

    /// Withdraw a candidate, removing their votes from the ledger.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.candidate_repo.delete_with_votes(id).await?;
        tracing::info!(candidate_id = %id, "Candidate deleted");
        Ok(())
    }

    async fn require_candidate(&self, id: &str) -> AppResult<candidate::Model> {
        self.candidate_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::CandidateNotFound(id.to_string()))
    }

    /// Check the party and constituency a candidate stands for exist.
    async fn require_references(&self, input: &CandidateInput) -> AppResult<()> {
        if self.party_repo.find_by_id(&input.party_id).await?.is_none() {
            return Err(AppError::NotFound(format!("party {}", input.party_id)));
        }
        if self
            .constituency_repo
            .find_by_id(input.constituency_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "constituency {}",
                input.constituency_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hustings_db::entities::{constituency, party};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_candidate(id: &str, first: &str, last: &str, party_id: &str) -> candidate::Model {
        candidate::Model {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            party_id: party_id.to_string(),
            constituency_id: 1,
            image: "https://example.com/c.png".to_string(),
            statement: "Count what counts.".to_string(),
            vote_count: 0,
            created_at: Utc::now().into(),
        }
    }

    fn test_party(id: &str, name: &str) -> party::Model {
        party::Model {
            id: id.to_string(),
            name: name.to_string(),
            image: "https://example.com/p.png".to_string(),
            manifesto: "Forward.".to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn test_constituency(id: i32, name: &str) -> constituency::Model {
        constituency::Model {
            id,
            name: name.to_string(),
        }
    }

    fn empty_conn() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn service(
        candidate_db: Arc<DatabaseConnection>,
        party_db: Arc<DatabaseConnection>,
        constituency_db: Arc<DatabaseConnection>,
    ) -> CandidateService {
        CandidateService::new(
            CandidateRepository::new(candidate_db),
            PartyRepository::new(party_db),
            ConstituencyRepository::new(constituency_db),
        )
    }

    fn valid_input() -> CandidateInput {
        CandidateInput {
            candidate_firstname: "Grace".to_string(),
            candidate_lastname: "Hopper".to_string(),
            party_id: "p1".to_string(),
            constituency_id: 1,
            image: "https://example.com/c.png".to_string(),
            statement: "Count what counts.".to_string(),
        }
    }

    #[tokio::test]
    async fn list_joins_party_names() {
        let candidate_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    test_candidate("c1", "Grace", "Hopper", "p1"),
                    test_candidate("c2", "Alan", "Turing", "p2"),
                ]])
                .into_connection(),
        );
        let party_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_party("p1", "Unity"), test_party("p2", "Reform")]])
                .into_connection(),
        );

        let service = service(candidate_db, party_db, empty_conn());
        let listed = service.list().await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].party_name, "Unity");
        assert_eq!(listed[1].party_name, "Reform");
    }

    #[tokio::test]
    async fn get_resolves_party_and_constituency() {
        let candidate_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_candidate("c1", "Grace", "Hopper", "p1")]])
                .into_connection(),
        );
        let party_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_party("p1", "Unity")]])
                .into_connection(),
        );
        let constituency_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_constituency(1, "Eastleigh")]])
                .into_connection(),
        );

        let service = service(candidate_db, party_db, constituency_db);
        let detail = service.get("c1").await.unwrap();

        assert_eq!(detail.party_name, "Unity");
        assert_eq!(detail.constituency_name, "Eastleigh");
    }

    #[tokio::test]
    async fn get_unknown_candidate_fails() {
        let candidate_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<candidate::Model>::new()])
                .into_connection(),
        );

        let service = service(candidate_db, empty_conn(), empty_conn());
        let err = service.get("ghost").await.unwrap_err();

        assert!(matches!(err, AppError::CandidateNotFound(_)));
    }

    #[tokio::test]
    async fn create_rejects_unknown_party() {
        let party_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<party::Model>::new()])
                .into_connection(),
        );

        let service = service(empty_conn(), party_db, empty_conn());
        let err = service.create(valid_input()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_name() {
        let party_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_party("p1", "Unity")]])
                .into_connection(),
        );
        let constituency_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_constituency(1, "Eastleigh")]])
                .into_connection(),
        );
        let candidate_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_candidate("c0", "Grace", "Hopper", "p1")]])
                .into_connection(),
        );

        let service = service(candidate_db, party_db, constituency_db);
        let err = service.create(valid_input()).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn create_persists_candidate() {
        let party_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_party("p1", "Unity")]])
                .into_connection(),
        );
        let constituency_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_constituency(1, "Eastleigh")]])
                .into_connection(),
        );
        let candidate_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<candidate::Model>::new()])
                .append_query_results([[test_candidate("c1", "Grace", "Hopper", "p1")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service(candidate_db, party_db, constituency_db);
        let created = service.create(valid_input()).await.unwrap();

        assert_eq!(created.vote_count, 0);
    }

    #[tokio::test]
    async fn update_unknown_candidate_fails() {
        let candidate_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<candidate::Model>::new()])
                .into_connection(),
        );

        let service = service(candidate_db, empty_conn(), empty_conn());
        let err = service.update("ghost", valid_input()).await.unwrap_err();

        assert!(matches!(err, AppError::CandidateNotFound(_)));
    }
}
