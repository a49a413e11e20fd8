use std::path::Path;

use chrono::NaiveDate;
use clap::Parser;
use savings_config::{
    Amount, ConfigurationSnapshot, Edit, RangeValue, Rate,
    domain::{BoundaryEdit, DetailEdit},
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Add, remove or edit interest tiers")]
pub struct Tier {
    #[command(subcommand)]
    command: TierCommand,
}

#[derive(Debug, clap::Subcommand)]
enum TierCommand {
    /// Append a tier above the open-ended one
    ///
    /// The current open-ended tier is closed at its minimum plus the gap, and
    /// the new tier starts one above that.
    Add {
        /// Width of the tier being closed (defaults to the configured gap)
        #[arg(long, value_name = "AMOUNT", value_parser = parse_gap)]
        gap: Option<Amount>,
    },

    /// Remove a tier
    ///
    /// The tiers either side are rejoined so the ranges stay contiguous.
    Remove {
        /// Index of the tier to remove
        index: usize,
    },

    /// Set a field of a tier
    Set {
        /// Index of the tier to edit
        index: usize,

        /// The field to set
        field: Field,

        /// The new value ("open" clears the upper bound of the last tier)
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Field {
    /// Lower bound (first tier only)
    MinBalance,
    /// Upper bound; later tiers are moved to stay contiguous
    MaxBalance,
    /// Interest rate percentage
    Rate,
    /// Date from which the rate applies (YYYY-MM-DD)
    EffectiveDate,
    /// Whether the tier is active (true or false)
    Active,
    /// Free-text description
    Description,
}

/// Parse a tier gap, which must be greater than zero.
fn parse_gap(s: &str) -> Result<Amount, String> {
    let gap: Amount = s.parse().map_err(|e| format!("{e}"))?;
    if gap == Amount::ZERO {
        return Err("the gap must be greater than zero".to_string());
    }
    Ok(gap)
}

impl Field {
    fn edit(self, index: usize, value: &str) -> anyhow::Result<Edit> {
        let edit = match self {
            Self::MinBalance => Edit::UpdateBoundary {
                index,
                edit: BoundaryEdit::MinBalance(value.parse::<Amount>()?),
            },
            Self::MaxBalance => Edit::UpdateBoundary {
                index,
                edit: BoundaryEdit::MaxBalance(value.parse::<RangeValue>()?),
            },
            Self::Rate => Edit::UpdateBoundary {
                index,
                edit: BoundaryEdit::RatePercentage(value.parse::<Rate>()?),
            },
            Self::EffectiveDate => Edit::UpdateDetail {
                index,
                edit: DetailEdit::EffectiveDate(
                    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
                        anyhow::anyhow!("Invalid date '{value}': {e} (expected YYYY-MM-DD)")
                    })?,
                ),
            },
            Self::Active => Edit::UpdateDetail {
                index,
                edit: DetailEdit::Active(
                    value
                        .parse::<bool>()
                        .map_err(|_| anyhow::anyhow!("Value must be 'true' or 'false'"))?,
                ),
            },
            Self::Description => Edit::UpdateDetail {
                index,
                edit: DetailEdit::Description(value.to_string()),
            },
        };
        Ok(edit)
    }
}

impl Tier {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let snapshot = match self.command {
            TierCommand::Add { gap } => {
                let snapshot = super::edit(root, |config, today| Edit::AddTier {
                    gap: gap.unwrap_or_else(|| config.default_tier_gap()),
                    today,
                })?;
                let added = snapshot.tiers().len() - 1;
                println!("{}", format!("Added tier {added}").success());
                snapshot
            }
            TierCommand::Remove { index } => {
                let snapshot = super::edit(root, |_, _| Edit::RemoveTier { index })?;
                println!("{}", format!("Removed tier {index}").success());
                snapshot
            }
            TierCommand::Set {
                index,
                field,
                value,
            } => {
                let edit = field.edit(index, &value)?;
                let snapshot = super::edit(root, |_, _| edit)?;
                println!("{}", format!("Updated tier {index}").success());
                snapshot
            }
        };

        print_ranges(&snapshot);
        Ok(())
    }
}

fn print_ranges(snapshot: &ConfigurationSnapshot) {
    for (index, tier) in snapshot.tiers().iter().enumerate() {
        let line = format!(
            "  [{index}] {} .. {} @ {}",
            tier.min_balance, tier.max_balance, tier.rate_percentage
        );
        println!("{}", line.dim());
    }
}
