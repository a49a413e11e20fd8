use std::path::Path;

use clap::Parser;
use savings_config::{Amount, DocumentTypeId, Workspace};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Show or modify editor settings")]
pub struct Config {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Set the width given to a tier when a new one is added after it
    SetGap {
        /// The gap, greater than zero
        amount: Amount,
    },

    /// Set the known document types (none to allow any)
    SetDocumentTypes {
        /// Document type IDs
        ids: Vec<DocumentTypeId>,
    },
}

impl Config {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let workspace = Workspace::new(root.to_path_buf());
        let mut config = workspace.config()?;

        match self.command {
            ConfigCommand::Show => {
                println!("Configuration:");
                println!("  default_tier_gap: {}", config.default_tier_gap());
                if config.document_types().is_empty() {
                    println!("  document_types: {}", "any".dim());
                } else {
                    println!("  document_types: {:?}", config.document_types());
                }
            }
            ConfigCommand::SetGap { amount } => {
                config.set_default_tier_gap(amount)?;
                workspace.save_config(&config)?;
                println!("{}", format!("Default tier gap: {amount}").success());
            }
            ConfigCommand::SetDocumentTypes { ids } => {
                config.set_document_types(ids);
                workspace.save_config(&config)?;
                if config.document_types().is_empty() {
                    println!("{}", "Any document type is accepted".success());
                } else {
                    println!(
                        "{}",
                        format!("Known document types: {:?}", config.document_types()).success()
                    );
                }

                if workspace.is_initialized() {
                    if let Err(error) = workspace.load(super::today()) {
                        println!("\n{} {error}", "Warning:".warning());
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn set_gap_persists() {
        let tmp = tempdir().unwrap();

        Config {
            command: ConfigCommand::SetGap {
                amount: Amount::new(1000.0).unwrap(),
            },
        }
        .run(tmp.path())
        .unwrap();

        let config = Workspace::new(tmp.path().to_path_buf()).config().unwrap();
        assert_eq!(config.default_tier_gap(), Amount::new(1000.0).unwrap());
    }

    #[test]
    fn zero_gap_is_rejected() {
        let tmp = tempdir().unwrap();

        let result = Config {
            command: ConfigCommand::SetGap {
                amount: Amount::ZERO,
            },
        }
        .run(tmp.path());

        assert!(result.is_err());
        assert!(!Workspace::new(tmp.path().to_path_buf()).config_path().exists());
    }
}
