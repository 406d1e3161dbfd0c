//! Postcode to constituency resolution.

use std::collections::HashMap;
use std::path::Path;

use hustings_common::{AppError, AppResult};

/// Maps postcode outward codes (the leading block, e.g. `SW1A`) to
/// constituency ids.
///
/// The table is loaded once at startup from a JSON object of
/// `"OUTWARD_CODE": constituency_id` pairs and shared by clone.
#[derive(Debug, Clone, Default)]
pub struct ConstituencyDirectory {
    prefixes: HashMap<String, i32>,
}

impl ConstituencyDirectory {
    /// Load the lookup table from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("failed to read {}: {e}", path.display())))?;
        let prefixes: HashMap<String, i32> = serde_json::from_str(&raw)
            .map_err(|e| AppError::Config(format!("failed to parse {}: {e}", path.display())))?;

        tracing::info!(
            entries = prefixes.len(),
            path = %path.display(),
            "Loaded constituency lookup table"
        );
        Ok(Self { prefixes })
    }

    /// Build a directory from an in-memory table.
    #[must_use]
    pub fn from_map(prefixes: HashMap<String, i32>) -> Self {
        Self { prefixes }
    }

    /// Resolve an outward code to a constituency id.
    #[must_use]
    pub fn lookup(&self, outward_code: &str) -> Option<i32> {
        self.prefixes.get(&outward_code.to_uppercase()).copied()
    }

    /// Number of outward codes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maplit::hashmap;

    #[test]
    fn lookup_resolves_known_outward_codes() {
        let directory = ConstituencyDirectory::from_map(hashmap! {
            "AN1".to_string() => 1,
            "BX2".to_string() => 2,
        });

        assert_eq!(directory.lookup("AN1"), Some(1));
        assert_eq!(directory.lookup("an1"), Some(1));
        assert_eq!(directory.lookup("ZZ9"), None);
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn from_file_fails_on_missing_table() {
        let err = ConstituencyDirectory::from_file("/nonexistent/constituencies.json").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
