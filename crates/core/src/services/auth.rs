//! Login and access token handling.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use hustings_common::{AppError, AppResult};
use hustings_db::{entities::voter, repositories::VoterRepository};

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Government ID of the authenticated voter.
    pub sub: String,
    /// Whether the voter held the admin role when the token was issued.
    pub admin: bool,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Checks voter credentials and issues signed access tokens.
#[derive(Clone)]
pub struct AuthService {
    voter_repo: VoterRepository,
    jwt_secret: String,
    token_ttl_minutes: i64,
}

impl AuthService {
    /// Create a new auth service.
    pub fn new(voter_repo: VoterRepository, jwt_secret: String, token_ttl_minutes: i64) -> Self {
        Self {
            voter_repo,
            jwt_secret,
            token_ttl_minutes,
        }
    }

    /// Check a voter's credentials and issue an access token.
    ///
    /// Fails with `VoterNotFound` for an unknown government ID and
    /// `Unauthorized` for a wrong password.
    pub async fn login(&self, gov_id: &str, password: &str) -> AppResult<(String, voter::Model)> {
        let voter = self
            .voter_repo
            .find_by_gov_id(gov_id)
            .await?
            .ok_or_else(|| AppError::VoterNotFound(gov_id.to_string()))?;

        if !verify_password(password, &voter.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let token = self.issue_token(&voter)?;
        tracing::debug!(voter_id = %voter.id, "Voter logged in");
        Ok((token, voter))
    }

    /// Issue an access token for a voter.
    pub fn issue_token(&self, voter: &voter::Model) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: voter.gov_id.clone(),
            admin: voter.is_admin,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.token_ttl_minutes)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify an access token signature and expiry, returning its claims.
    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let data = decode::<Claims>(token, &key, &Validation::default())
            .map_err(|_| AppError::Unauthorized)?;
        Ok(data.claims)
    }

    /// Verify a bearer token and load the voter it names.
    ///
    /// The admin flag is read from the voter row, not the token, so a role
    /// change takes effect on the next request rather than at token expiry.
    pub async fn authenticate(&self, token: &str) -> AppResult<voter::Model> {
        let claims = self.verify_token(token)?;
        self.voter_repo
            .find_by_gov_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

/// Hash a password using Argon2.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
