use std::path::Path;

use clap::Parser;
use savings_config::{DocumentSet, DocumentTypeId, Edit};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Edit the KYC document requirements")]
pub struct Docs {
    #[command(subcommand)]
    command: DocsCommand,
}

#[derive(Debug, clap::Subcommand)]
enum DocsCommand {
    /// Add a document type to a set, or remove it if already there
    ///
    /// A document type cannot be both required and alternative; remove it
    /// from one set before adding it to the other.
    #[command(group = clap::ArgGroup::new("set").required(true))]
    Toggle {
        /// The document type ID
        id: DocumentTypeId,

        /// Toggle in the required set
        #[arg(long, group = "set")]
        required: bool,

        /// Toggle in the alternative set
        #[arg(long, group = "set")]
        alternative: bool,
    },
}

impl Docs {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let DocsCommand::Toggle {
            id,
            required,
            alternative: _,
        } = self.command;
        let set = if required {
            DocumentSet::Required
        } else {
            DocumentSet::Alternative
        };

        let snapshot = super::edit(root, |_, _| Edit::ToggleDocument { id, set })?;

        let message = if snapshot.documents().contains(id, set) {
            format!("Document type {id} is now {set}")
        } else {
            format!("Document type {id} is no longer {set}")
        };
        println!("{}", message.success());

        Ok(())
    }
}
