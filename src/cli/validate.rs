use std::path::Path;

use clap::Parser;
use savings_config::{Amount, ConfigurationSnapshot, Workspace};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Check the product configuration against every invariant")]
pub struct Validate {
    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,
}

impl Validate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let workspace = Workspace::new(root.to_path_buf());

        let snapshot = match workspace.load(super::today()) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                println!("{} {error}", "✗".error());
                anyhow::bail!("product configuration is invalid");
            }
        };

        let warnings = warnings(&snapshot);
        for warning in &warnings {
            println!("{} {warning}", "!".warning());
        }

        if warnings.is_empty() {
            println!(
                "{}",
                format!(
                    "✓ {} tiers, {} required and {} alternative document types",
                    snapshot.tiers().len(),
                    snapshot.documents().required().count(),
                    snapshot.documents().alternative().count()
                )
                .success()
            );
        } else if self.strict {
            anyhow::bail!("{} warning(s) found", warnings.len());
        }

        Ok(())
    }
}

/// Findings that do not break an invariant but are probably mistakes.
fn warnings(snapshot: &ConfigurationSnapshot) -> Vec<String> {
    let mut warnings = Vec::new();
    let tiers = snapshot.tiers();

    let first = tiers.first().min_balance;
    if first != Amount::ZERO {
        warnings.push(format!(
            "The first tier starts at {first}; balances below it have no rate"
        ));
    }

    if tiers.iter().all(|tier| !tier.is_active) {
        warnings.push("Every tier is inactive".to_string());
    }

    if snapshot.settings().min_deposit_amount < first {
        warnings.push(format!(
            "The minimum deposit ({}) is below the first tier",
            snapshot.settings().min_deposit_amount
        ));
    }

    warnings
}
