//! Voter registration and email verification.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use hustings_common::{AppError, AppResult, IdGenerator};
use hustings_db::{
    entities::{pending_verification, voter},
    repositories::{PendingVerificationRepository, VoterRepository},
};

use super::auth::hash_password;
use super::constituency::ConstituencyDirectory;
use super::email::EmailService;

/// How many times a colliding government ID is regenerated before giving up.
const MAX_GOV_ID_ATTEMPTS: u32 = 5;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid email regex")
});

/// UK-style postcode with the outward code captured. Accepts the outward code
/// alone or a full postcode with an optional space before the three-character
/// inward code.
static POSTCODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z0-9]{3,4})\s*(?:[A-Z0-9]{3})?$").expect("Invalid postcode regex")
});

/// Input for registering a voter.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,

    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "postcode is required"))]
    pub postcode: String,

    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "verification code is required"))]
    pub otp: String,
}

/// Result of a completed registration.
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub voter_id: String,
    /// Newly issued 8-digit government ID; also the login identifier.
    pub gov_id: String,
    /// Set when the government ID could not be emailed. The registration
    /// itself is already committed.
    pub warning: Option<String>,
}

/// Handles verification code issuance and voter registration.
#[derive(Clone)]
pub struct RegistrationService {
    voter_repo: VoterRepository,
    pending_repo: PendingVerificationRepository,
    directory: ConstituencyDirectory,
    email: EmailService,
    id_gen: IdGenerator,
    /// When set, every registrant receives this code instead of a random one.
    /// Test environments only.
    fixed_code: Option<String>,
}

impl RegistrationService {
    /// Create a new registration service.
    pub fn new(
        voter_repo: VoterRepository,
        pending_repo: PendingVerificationRepository,
        directory: ConstituencyDirectory,
        email: EmailService,
        fixed_code: Option<String>,
    ) -> Self {
        Self {
            voter_repo,
            pending_repo,
            directory,
            email,
            id_gen: IdGenerator::new(),
            fixed_code,
        }
    }

    /// Issue a verification code for an address and email it.
    ///
    /// A second request for the same address replaces the outstanding code.
    /// The code is persisted before dispatch, so a delivery failure leaves a
    /// valid code behind and surfaces as `DeliveryError`.
    pub async fn request_verification(&self, email: &str) -> AppResult<()> {
        if !EMAIL_PATTERN.is_match(email) {
            return Err(AppError::BadRequest("Invalid email address".to_string()));
        }

        if self.voter_repo.email_exists(email).await? {
            return Err(AppError::Conflict(
                "a voter with this email already exists".to_string(),
            ));
        }

        let code = self
            .fixed_code
            .clone()
            .unwrap_or_else(|| self.id_gen.generate_verification_code());

        let model = pending_verification::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email.to_string()),
            otp_code: Set(code.clone()),
            created_at: Set(Utc::now().into()),
        };
        self.pending_repo.replace(model, email).await?;

        self.email.send_verification_code(email, &code).await?;

        tracing::info!(%email, "Verification code issued");
        Ok(())
    }

    /// Register a voter using a previously issued verification code.
    ///
    /// On success the consumed code is removed and the new government ID is
    /// emailed to the voter; a failed email is reported as a warning on the
    /// outcome rather than rolling back the registration.
    pub async fn register(&self, input: RegisterInput) -> AppResult<RegistrationOutcome> {
        input.validate()?;

        if !EMAIL_PATTERN.is_match(&input.email) {
            return Err(AppError::BadRequest("Invalid email address".to_string()));
        }

        let Some(outward_code) = outward_code(&input.postcode) else {
            return Err(AppError::BadRequest("Invalid postcode".to_string()));
        };

        let pending = self
            .pending_repo
            .find_by_email_and_code(&input.email, &input.otp)
            .await?
            .ok_or(AppError::InvalidOtp)?;

        if self.voter_repo.email_exists(&input.email).await? {
            return Err(AppError::Conflict(
                "a voter with this email already exists".to_string(),
            ));
        }

        let constituency_id = self.directory.lookup(&outward_code).ok_or_else(|| {
            AppError::BadRequest(format!(
                "postcode {outward_code} does not map to a constituency"
            ))
        })?;

        let gov_id = self.unique_gov_id().await?;
        let password_hash = hash_password(&input.password)?;

        let model = voter::ActiveModel {
            id: Set(self.id_gen.generate()),
            first_name: Set(input.first_name.clone()),
            last_name: Set(input.last_name.clone()),
            gov_id: Set(gov_id.clone()),
            email: Set(input.email.clone()),
            password_hash: Set(password_hash),
            constituency_id: Set(constituency_id),
            is_admin: Set(false),
            created_at: Set(Utc::now().into()),
        };
        let created = self.voter_repo.create(model).await?;

        self.pending_repo.delete(pending).await?;

        let warning = match self.email.send_gov_id(&input.email, &gov_id).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(voter_id = %created.id, error = %e, "Government ID email failed");
                Some("registration succeeded but the government ID email could not be sent".to_string())
            }
        };

        tracing::info!(voter_id = %created.id, constituency_id, "Voter registered");
        Ok(RegistrationOutcome {
            voter_id: created.id,
            gov_id,
            warning,
        })
    }

    /// Generate a government ID not yet held by any voter.
    ///
    /// Collisions over the 9 x 10^7 value space are rare; a few retries make
    /// them invisible to callers.
    async fn unique_gov_id(&self) -> AppResult<String> {
        for _ in 0..MAX_GOV_ID_ATTEMPTS {
            let gov_id = self.id_gen.generate_gov_id();
            if !self.voter_repo.gov_id_exists(&gov_id).await? {
                return Ok(gov_id);
            }
        }
        Err(AppError::Internal(
            "could not generate an unused government ID".to_string(),
        ))
    }
}

/// Extract the outward code from a postcode, if the postcode is well formed.
fn outward_code(postcode: &str) -> Option<String> {
    POSTCODE_PATTERN
        .captures(postcode)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maplit::hashmap;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_directory() -> ConstituencyDirectory {
        ConstituencyDirectory::from_map(hashmap! {
            "AN1".to_string() => 1,
            "BX2A".to_string() => 2,
        })
    }

    fn test_pending(email: &str, otp: &str) -> pending_verification::Model {
        pending_verification::Model {
            id: "pv1".to_string(),
            email: email.to_string(),
            otp_code: otp.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn test_voter_row(email: &str) -> voter::Model {
        voter::Model {
            id: "v1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            gov_id: "12345678".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            constituency_id: 1,
            is_admin: false,
            created_at: Utc::now().into(),
        }
    }

    fn service(
        voter_db: Arc<DatabaseConnection>,
        pending_db: Arc<DatabaseConnection>,
        fixed_code: Option<String>,
    ) -> RegistrationService {
        RegistrationService::new(
            VoterRepository::new(voter_db),
            PendingVerificationRepository::new(pending_db),
            test_directory(),
            EmailService::disabled(),
            fixed_code,
        )
    }

    fn valid_input() -> RegisterInput {
        RegisterInput {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password: "analytical-engine".to_string(),
            postcode: "AN1 2CD".to_string(),
            email: "ada@example.com".to_string(),
            otp: "123456".to_string(),
        }
    }

    #[test]
    fn outward_code_extraction() {
        assert_eq!(outward_code("AN1 2CD"), Some("AN1".to_string()));
        assert_eq!(outward_code("AN12CD"), Some("AN1".to_string()));
        assert_eq!(outward_code("BX2A 3EF"), Some("BX2A".to_string()));
        assert_eq!(outward_code("BX2A"), Some("BX2A".to_string()));
        assert_eq!(outward_code("an1 2cd"), None);
        assert_eq!(outward_code("A 2CD"), None);
        assert_eq!(outward_code(""), None);
    }

    #[tokio::test]
    async fn request_verification_rejects_malformed_email() {
        let service = service(
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
            None,
        );

        let err = service.request_verification("not-an-email").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn request_verification_rejects_registered_email() {
        let voter_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_voter_row("ada@example.com")]])
                .into_connection(),
        );
        let service = service(
            voter_db,
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
            None,
        );

        let err = service
            .request_verification("ada@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn request_verification_persists_fixed_code() {
        let voter_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<voter::Model>::new()])
                .into_connection(),
        );
        let pending_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_pending("ada@example.com", "123456")]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let service = service(voter_db, pending_db, Some("123456".to_string()));
        service.request_verification("ada@example.com").await.unwrap();
    }

    #[tokio::test]
    async fn register_rejects_missing_fields() {
        let service = service(
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
            None,
        );

        let input = RegisterInput {
            first_name: String::new(),
            ..valid_input()
        };
        let err = service.register(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let service = service(
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
            None,
        );

        let input = RegisterInput {
            password: "short".to_string(),
            ..valid_input()
        };
        let err = service.register(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn register_rejects_malformed_postcode() {
        let service = service(
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
            None,
        );

        let input = RegisterInput {
            postcode: "??".to_string(),
            ..valid_input()
        };
        let err = service.register(input).await.unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Invalid postcode"),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn register_rejects_wrong_otp() {
        let pending_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<pending_verification::Model>::new()])
                .into_connection(),
        );
        let service = service(
            Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
            pending_db,
            None,
        );

        let err = service.register(valid_input()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidOtp));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let pending_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_pending("ada@example.com", "123456")]])
                .into_connection(),
        );
        let voter_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_voter_row("ada@example.com")]])
                .into_connection(),
        );

        let service = service(voter_db, pending_db, None);
        let err = service.register(valid_input()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_rejects_unresolvable_postcode() {
        let pending_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_pending("ada@example.com", "123456")]])
                .into_connection(),
        );
        let voter_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<voter::Model>::new()])
                .into_connection(),
        );

        let service = service(voter_db, pending_db, None);
        let input = RegisterInput {
            // Well formed, but not in the lookup table.
            postcode: "ZZ9 9ZZ".to_string(),
            ..valid_input()
        };
        let err = service.register(input).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn register_creates_voter_and_consumes_code() {
        let pending = test_pending("ada@example.com", "123456");
        let pending_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let voter_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // Email uniqueness check, then gov_id collision check.
                .append_query_results([Vec::<voter::Model>::new()])
                .append_query_results([Vec::<voter::Model>::new()])
                .append_query_results([[test_voter_row("ada@example.com")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service(voter_db, pending_db, None);
        let outcome = service.register(valid_input()).await.unwrap();

        assert_eq!(outcome.gov_id.len(), 8);
        assert!(outcome.warning.is_none());
    }
}
