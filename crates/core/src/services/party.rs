//! Party management.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use hustings_common::{AppError, AppResult, IdGenerator};
use hustings_db::{entities::party, repositories::PartyRepository};

/// Input for creating or updating a party.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PartyInput {
    #[validate(length(min = 1, message = "party name is required"))]
    pub party_name: String,

    #[validate(length(min = 1, message = "image is required"))]
    pub image: String,

    #[validate(length(min = 1, message = "manifesto is required"))]
    pub manifesto: String,
}

/// Party CRUD. Party names are unique.
#[derive(Clone)]
pub struct PartyService {
    party_repo: PartyRepository,
    id_gen: IdGenerator,
}

impl PartyService {
    /// Create a new party service.
    pub fn new(party_repo: PartyRepository) -> Self {
        Self {
            party_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// All parties in id order.
    pub async fn list(&self) -> AppResult<Vec<party::Model>> {
        self.party_repo.find_all().await
    }

    /// A single party by id.
    pub async fn get(&self, id: &str) -> AppResult<party::Model> {
        self.party_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("party {id}")))
    }

    /// Register a new party.
    pub async fn create(&self, input: PartyInput) -> AppResult<party::Model> {
        input.validate()?;

        if self.party_repo.exists_by_name(&input.party_name).await? {
            return Err(AppError::Conflict(format!(
                "party {} already exists",
                input.party_name
            )));
        }

        let model = party::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.party_name.clone()),
            image: Set(input.image.clone()),
            manifesto: Set(input.manifesto.clone()),
            created_at: Set(Utc::now().into()),
        };
        let created = self.party_repo.create(model).await?;

        tracing::info!(party_id = %created.id, name = %created.name, "Party created");
        Ok(created)
    }

    /// Replace a party's name, image, and manifesto.
    pub async fn update(&self, id: &str, input: PartyInput) -> AppResult<party::Model> {
        input.validate()?;

        let party = self.get(id).await?;

        if input.party_name != party.name
            && self.party_repo.exists_by_name(&input.party_name).await?
        {
            return Err(AppError::Conflict(format!(
                "party {} already exists",
                input.party_name
            )));
        }

        let model = party::ActiveModel {
            id: sea_orm::Unchanged(party.id.clone()),
            name: Set(input.party_name.clone()),
            image: Set(input.image.clone()),
            manifesto: Set(input.manifesto.clone()),
            ..Default::default()
        };
        let updated = self.party_repo.update(model).await?;

        tracing::info!(party_id = %updated.id, "Party updated");
        Ok(updated)
    }

    /// Delete a party along with its candidates and their votes.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.party_repo.delete_with_candidates(id).await?;
        tracing::info!(party_id = %id, "Party deleted");
        Ok(())
    }
}
