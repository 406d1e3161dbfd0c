//! ID generation utilities.

use rand::Rng;
use ulid::Ulid;

/// Inclusive range for government-issued voter numbers (always 8 digits).
const GOV_ID_MIN: u32 = 10_000_000;
const GOV_ID_MAX: u32 = 99_999_999;

/// Inclusive range for email verification codes (always 6 digits).
const VERIFICATION_CODE_MIN: u32 = 100_000;
const VERIFICATION_CODE_MAX: u32 = 999_999;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a candidate government ID: an 8-digit decimal string.
    ///
    /// Uniqueness is not guaranteed here; callers must check the pool of
    /// issued IDs and retry on collision.
    #[must_use]
    pub fn generate_gov_id(&self) -> String {
        rand::thread_rng()
            .gen_range(GOV_ID_MIN..=GOV_ID_MAX)
            .to_string()
    }

    /// Generate a 6-digit email verification code.
    #[must_use]
    pub fn generate_verification_code(&self) -> String {
        rand::thread_rng()
            .gen_range(VERIFICATION_CODE_MIN..=VERIFICATION_CODE_MAX)
            .to_string()
    }
}
