use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, DocumentTypeId};

/// Configuration for the tier and document editor.
///
/// This struct holds the settings that shape edits made in a workspace: the
/// width given to a tier when it stops being the open-ended one, and the known
/// document types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Versions", into = "Versions")]
pub struct EditorConfig {
    /// The width assigned to the open-ended tier when a new tier is added
    /// after it.
    ///
    /// The closed tier spans `min_balance ..= min_balance + gap`.
    default_tier_gap: Amount,

    /// The universe of KYC document types.
    ///
    /// If this is empty, any document type identifier is accepted.
    document_types: Vec<DocumentTypeId>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_tier_gap: Amount::new(default_tier_gap()).unwrap_or(Amount::ONE),
            document_types: Vec::new(),
        }
    }
}

impl EditorConfig {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the width given to a tier when a new tier is added after it.
    #[must_use]
    pub const fn default_tier_gap(&self) -> Amount {
        self.default_tier_gap
    }

    /// Sets the tier gap.
    ///
    /// # Errors
    ///
    /// Returns [`ZeroGapError`] if the gap is zero.
    pub fn set_default_tier_gap(&mut self, gap: Amount) -> Result<(), ZeroGapError> {
        if gap == Amount::ZERO {
            return Err(ZeroGapError);
        }
        self.default_tier_gap = gap;
        Ok(())
    }

    /// Returns the known document types. Empty means unrestricted.
    #[must_use]
    pub fn document_types(&self) -> &[DocumentTypeId] {
        &self.document_types
    }

    /// Replaces the known document types.
    ///
    /// Identifiers are sorted and deduplicated.
    pub fn set_document_types(&mut self, ids: impl IntoIterator<Item = DocumentTypeId>) {
        let mut ids: Vec<_> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        self.document_types = ids;
    }
}

/// Error returned when a tier gap of zero is configured.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("the default tier gap must be greater than zero")]
pub struct ZeroGapError;

const fn default_tier_gap() -> f64 {
    50_000.0
}

/// The serialized versions of the configuration.
///
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_tier_gap")]
        default_tier_gap: f64,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        document_types: Vec<DocumentTypeId>,
    },
}

/// Error returned when a serialized configuration holds invalid values.
#[derive(Debug, thiserror::Error)]
enum InvalidConfig {
    #[error("default_tier_gap: {0}")]
    Gap(#[from] crate::domain::InvalidAmountError),
    #[error("default_tier_gap: {0}")]
    ZeroGap(#[from] ZeroGapError),
}

impl TryFrom<Versions> for EditorConfig {
    type Error = InvalidConfig;

    fn try_from(versions: Versions) -> Result<Self, Self::Error> {
        match versions {
            Versions::V1 {
                default_tier_gap,
                document_types,
            } => {
                let mut config = Self::default();
                config.set_default_tier_gap(Amount::new(default_tier_gap)?)?;
                config.set_document_types(document_types);
                Ok(config)
            }
        }
    }
}

impl From<EditorConfig> for Versions {
    fn from(config: EditorConfig) -> Self {
        Self::V1 {
            default_tier_gap: config.default_tier_gap.get(),
            document_types: config.document_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ndefault_tier_gap = 25000\ndocument_types = [3, 1, 2]\n")
            .unwrap();

        let config = EditorConfig::load(file.path()).unwrap();

        assert_eq!(config.default_tier_gap(), Amount::new(25_000.0).unwrap());
        assert_eq!(
            config.document_types(),
            &[
                DocumentTypeId::new(1),
                DocumentTypeId::new(2),
                DocumentTypeId::new(3)
            ]
        );
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = EditorConfig::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ndefault_tier_gap = \"wide\"\n")
            .unwrap();

        let error = EditorConfig::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn zero_gap_is_rejected() {
        let result: Result<EditorConfig, _> = toml::from_str("_version = \"1\"\ndefault_tier_gap = 0\n");
        assert!(result.is_err());

        let mut config = EditorConfig::default();
        assert_eq!(config.set_default_tier_gap(Amount::ZERO), Err(ZeroGapError));
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn empty_file_returns_default() {
        // Tests that deserialising an empty file returns the default configuration.
        let expected = EditorConfig::default();
        let actual: EditorConfig = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(actual.default_tier_gap().get(), 50_000.0);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = EditorConfig::default();
        config.set_default_tier_gap(Amount::new(1000.0).unwrap()).unwrap();
        config.set_document_types([DocumentTypeId::new(4)]);
        config.save(&path).unwrap();

        assert_eq!(EditorConfig::load(&path).unwrap(), config);
    }
}
