//! A filesystem backed product configuration.
//!
//! A [`Workspace`] keeps the wire shapes exchanged with the persistence service
//! on disk:
//!
//! ```text
//! <root>/
//!   product.json          product record, including the document sets
//!   tiers.json            interest tiers
//!   .savings/config.toml  editor configuration
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    domain::{ConfigurationSnapshot, EditorConfig, InvariantViolation},
    wire::{self, SavePayload, WireError, WireProduct, WireTier},
};

const PRODUCT_FILE: &str = "product.json";
const TIERS_FILE: &str = "tiers.json";
const CONFIG_DIR: &str = ".savings";
const CONFIG_FILE: &str = "config.toml";

/// Errors that can occur when loading a workspace.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The workspace has not been initialised.
    #[error("no product configuration found in {}", .0.display())]
    NotInitialized(PathBuf),
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A file could not be parsed as JSON.
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        /// The file that failed to parse.
        path: PathBuf,
        /// The parse error.
        source: serde_json::Error,
    },
    /// The editor configuration could not be loaded.
    #[error("{0}")]
    Config(String),
    /// The loaded configuration was rejected.
    #[error(transparent)]
    Wire(#[from] WireError),
    /// The document sets reference unknown document types.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Errors that can occur when saving a workspace.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The workspace already holds a product configuration.
    #[error("a product configuration already exists in {}", .0.display())]
    AlreadyInitialized(PathBuf),
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A payload could not be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The editor configuration could not be saved.
    #[error("{0}")]
    Config(String),
}

/// A directory holding one product configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Opens a workspace at the given path.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The root directory of the workspace.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The path of the editor configuration file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Whether the workspace holds a product configuration.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.product_path().exists()
    }

    /// Creates a new workspace holding a default product with a single
    /// open-ended tier, and a default editor configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::AlreadyInitialized`] if a product configuration
    /// already exists, or an I/O error if the files cannot be written.
    pub fn init(&self, today: NaiveDate) -> Result<ConfigurationSnapshot, SaveError> {
        if self.is_initialized() {
            return Err(SaveError::AlreadyInitialized(self.root.clone()));
        }

        let snapshot = ConfigurationSnapshot::initial(today);

        self.save_config(&EditorConfig::default())?;
        self.save(&snapshot)?;
        tracing::info!("Initialized product configuration in {}", self.root.display());

        Ok(snapshot)
    }

    /// Loads the editor configuration, falling back to the default if there is
    /// no configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Config`] if the file exists but cannot be read or
    /// parsed.
    pub fn config(&self) -> Result<EditorConfig, LoadError> {
        let path = self.config_path();
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(EditorConfig::default());
        }
        EditorConfig::load(&path).map_err(LoadError::Config)
    }

    /// Saves the editor configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration directory cannot be created or the
    /// file cannot be written.
    pub fn save_config(&self, config: &EditorConfig) -> Result<(), SaveError> {
        fs::create_dir_all(self.root.join(CONFIG_DIR))?;
        config.save(&self.config_path()).map_err(SaveError::Config)
    }

    /// Loads and validates the product configuration.
    ///
    /// If the editor configuration lists known document types, the document
    /// sets are restricted to them.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the files are missing or unreadable, or if
    /// any loaded value is malformed or violates an invariant. A single bad
    /// record rejects the whole load.
    pub fn load(&self, today: NaiveDate) -> Result<ConfigurationSnapshot, LoadError> {
        if !self.is_initialized() {
            return Err(LoadError::NotInitialized(self.root.clone()));
        }

        let config = self.config()?;
        let product: WireProduct = read_json(&self.product_path())?;
        let tiers: Vec<WireTier> = if self.tiers_path().exists() {
            read_json(&self.tiers_path())?
        } else {
            Vec::new()
        };

        let snapshot = wire::decode(product, tiers, today)?;
        tracing::debug!(
            "Loaded {} tiers from {}",
            snapshot.tiers().len(),
            self.root.display()
        );

        if config.document_types().is_empty() {
            return Ok(snapshot);
        }

        let documents = snapshot
            .documents()
            .clone()
            .with_universe(config.document_types().iter().copied())?;
        Ok(snapshot.with_documents(documents))
    }

    /// Writes the snapshot in its wire form, replacing what was there.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized or written.
    pub fn save(&self, snapshot: &ConfigurationSnapshot) -> Result<(), SaveError> {
        let SavePayload { product, tiers } = wire::encode(snapshot);

        fs::create_dir_all(&self.root)?;
        write_json(&self.product_path(), &product)?;
        write_json(&self.tiers_path(), &tiers)?;
        tracing::debug!("Saved {} tiers to {}", tiers.len(), self.root.display());

        Ok(())
    }

    fn product_path(&self) -> PathBuf {
        self.root.join(PRODUCT_FILE)
    }

    fn tiers_path(&self) -> PathBuf {
        self.root.join(TIERS_FILE)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SaveError> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::domain::{DocumentSet, DocumentTypeId, Edit, RangeValue};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn workspace() -> (TempDir, Workspace) {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::new(tmp.path().to_path_buf());
        (tmp, workspace)
    }

    #[test]
    fn init_creates_default_product() {
        let (_tmp, workspace) = workspace();

        let snapshot = workspace.init(today()).unwrap();

        assert!(workspace.is_initialized());
        assert!(workspace.config_path().exists());
        assert_eq!(snapshot.tiers().len(), 1);
        assert_eq!(workspace.load(today()).unwrap(), snapshot);
    }

    #[test]
    fn init_twice_fails() {
        let (_tmp, workspace) = workspace();
        workspace.init(today()).unwrap();

        assert!(matches!(
            workspace.init(today()),
            Err(SaveError::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn load_uninitialized_fails() {
        let (_tmp, workspace) = workspace();
        assert!(matches!(
            workspace.load(today()),
            Err(LoadError::NotInitialized(_))
        ));
    }

    #[test]
    fn save_then_load() {
        let (_tmp, workspace) = workspace();
        let snapshot = workspace
            .init(today())
            .unwrap()
            .apply(Edit::AddTier {
                gap: workspace.config().unwrap().default_tier_gap(),
                today: today(),
            })
            .unwrap()
            .apply(Edit::ToggleDocument {
                id: DocumentTypeId::new(5),
                set: DocumentSet::Alternative,
            })
            .unwrap();

        workspace.save(&snapshot).unwrap();
        let loaded = workspace.load(today()).unwrap();

        assert_eq!(loaded, snapshot);
        assert_eq!(
            loaded.tiers().first().max_balance,
            RangeValue::finite(50_000.0).unwrap()
        );
    }

    #[test]
    fn tiers_file_writes_null_for_open_bound() {
        let (tmp, workspace) = workspace();
        workspace.init(today()).unwrap();

        let content = fs::read_to_string(tmp.path().join(TIERS_FILE)).unwrap();
        assert!(content.contains("\"maxBalance\": null"));
    }

    #[test]
    fn malformed_file_rejects_load() {
        let (tmp, workspace) = workspace();
        workspace.init(today()).unwrap();
        fs::write(
            tmp.path().join(TIERS_FILE),
            r#"[{"minBalance": -1, "maxBalance": null, "ratePercentage": 1,
                 "effectiveDate": "2025-01-01", "isActive": true}]"#,
        )
        .unwrap();

        assert!(matches!(workspace.load(today()), Err(LoadError::Wire(_))));
    }

    #[test]
    fn invalid_json_names_the_file() {
        let (tmp, workspace) = workspace();
        workspace.init(today()).unwrap();
        fs::write(tmp.path().join(PRODUCT_FILE), "{ not json").unwrap();

        let error = workspace.load(today()).unwrap_err();
        assert!(error.to_string().contains(PRODUCT_FILE));
    }

    #[test]
    fn configured_universe_is_enforced() {
        let (_tmp, workspace) = workspace();
        let snapshot = workspace
            .init(today())
            .unwrap()
            .apply(Edit::ToggleDocument {
                id: DocumentTypeId::new(9),
                set: DocumentSet::Required,
            })
            .unwrap();
        workspace.save(&snapshot).unwrap();

        let mut config = workspace.config().unwrap();
        config.set_document_types([DocumentTypeId::new(1), DocumentTypeId::new(2)]);
        workspace.save_config(&config).unwrap();

        assert!(matches!(
            workspace.load(today()),
            Err(LoadError::Invariant(InvariantViolation::UnknownDocumentType(_)))
        ));
    }
}
