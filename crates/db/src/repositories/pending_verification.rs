//! Pending verification repository.

use std::sync::Arc;

use crate::entities::{PendingVerification, pending_verification};
use crate::map_db_err;
use hustings_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    TransactionTrait,
};

/// Pending verification repository for database operations.
#[derive(Clone)]
pub struct PendingVerificationRepository {
    db: Arc<DatabaseConnection>,
}

impl PendingVerificationRepository {
    /// Create a new pending verification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the outstanding code for an email address.
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<pending_verification::Model>> {
        PendingVerification::find()
            .filter(pending_verification::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a pending row matching both the address and the submitted code.
    pub async fn find_by_email_and_code(
        &self,
        email: &str,
        otp_code: &str,
    ) -> AppResult<Option<pending_verification::Model>> {
        PendingVerification::find()
            .filter(pending_verification::Column::Email.eq(email))
            .filter(pending_verification::Column::OtpCode.eq(otp_code))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Store a fresh code for an address, replacing any previous one.
    ///
    /// Runs in a transaction so the old code is gone before the new row
    /// lands; only the newest issued code is ever valid.
    pub async fn replace(
        &self,
        model: pending_verification::ActiveModel,
        email: &str,
    ) -> AppResult<pending_verification::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        PendingVerification::delete_many()
            .filter(pending_verification::Column::Email.eq(email))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let created = model.insert(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(created)
    }

    /// Delete a consumed verification row.
    pub async fn delete(&self, model: pending_verification::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}
