use std::path::{Path, PathBuf};

use clap::Parser;
use savings_config::{Workspace, wire};
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Print the save payload for the persistence service")]
pub struct Export {
    /// Write the payload to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

impl Export {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let workspace = Workspace::new(root.to_path_buf());
        let snapshot = workspace.load(super::today())?;
        let payload = wire::encode(&snapshot);

        let json = if self.compact {
            serde_json::to_string(&payload)?
        } else {
            serde_json::to_string_pretty(&payload)?
        };

        match self.output {
            Some(path) => {
                std::fs::write(&path, json + "\n")?;
                tracing::info!("Wrote save payload to {}", path.display());
            }
            None => println!("{json}"),
        }

        Ok(())
    }
}
