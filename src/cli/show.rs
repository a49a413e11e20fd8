use std::{collections::BTreeSet, path::Path};

use clap::Parser;
use savings_config::{
    Amount, ConfigurationSnapshot, DocumentSet, DocumentTypeId, InterestTier, RangeValue,
    Workspace, domain::ExclusiveMembership,
};
use tracing::instrument;

use super::terminal::{self, Colorize};

#[derive(Debug, Default, Parser)]
#[command(about = "Display the interest tiers and document requirements")]
pub struct Show {
    /// Only show the tier that applies to this balance
    #[arg(long, value_name = "AMOUNT")]
    balance: Option<Amount>,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let workspace = Workspace::new(root.to_path_buf());
        let config = workspace.config()?;
        let snapshot = workspace.load(super::today())?;

        if let Some(balance) = self.balance {
            return show_balance(&snapshot, balance);
        }

        print_settings(&snapshot);
        println!();
        print_tiers(&snapshot);
        println!();
        print_documents(&snapshot, config.document_types());

        Ok(())
    }
}

fn show_balance(snapshot: &ConfigurationSnapshot, balance: Amount) -> anyhow::Result<()> {
    let tiers = snapshot.tiers();
    let Some((index, tier)) = tiers
        .position_for_balance(balance)
        .and_then(|index| Some((index, tiers.get(index)?)))
    else {
        anyhow::bail!(
            "No tier covers a balance of {balance} (the first tier starts at {})",
            tiers.first().min_balance
        );
    };

    println!(
        "Balance {balance} falls in tier {index}: {} at {}",
        range(tier),
        tier.rate_percentage.to_string().info()
    );
    if !tier.contains(balance) {
        println!(
            "{}",
            format!("  {balance} lies between tier {index} and the next; the lower tier applies")
                .dim()
        );
    }
    if !tier.is_active {
        println!("{}", "  This tier is inactive".warning());
    }

    Ok(())
}

fn print_settings(snapshot: &ConfigurationSnapshot) {
    let settings = snapshot.settings();

    println!("{}", "Settings".dim());
    println!("  Minimum deposit:  {}", settings.min_deposit_amount);
    println!(
        "  Maximum deposit:  {}",
        settings
            .max_deposit_amount
            .map_or_else(|| "unlimited".to_string(), |max| max.to_string())
    );
    println!(
        "  Withdrawal fee:   {}",
        settings
            .withdrawal_fee_percentage
            .map_or_else(|| "none".to_string(), |fee| fee.to_string())
    );
    println!(
        "  Accrues interest: {}",
        if settings.accrue_interest { "yes" } else { "no" }
    );
}

fn print_tiers(snapshot: &ConfigurationSnapshot) {
    let tiers = snapshot.tiers();
    println!("{} ({})", "Interest tiers".dim(), tiers.len());

    let narrow = terminal::is_narrow();
    for (index, tier) in tiers.iter().enumerate() {
        let status = if tier.is_active {
            String::new()
        } else {
            format!(" {}", "inactive".warning())
        };

        if narrow {
            println!(
                "  [{index}] {} @ {}{status}",
                range(tier),
                tier.rate_percentage
            );
            continue;
        }

        println!(
            "  [{index}] {:<28} {:>8}  from {}{status}",
            range(tier),
            tier.rate_percentage.to_string().info(),
            tier.effective_date
        );
        if !tier.description.is_empty() {
            println!("      {}", tier.description.dim());
        }
    }
}

fn print_documents(snapshot: &ConfigurationSnapshot, universe: &[DocumentTypeId]) {
    let documents = snapshot.documents();
    println!("{}", "KYC documents".dim());

    let ids: BTreeSet<DocumentTypeId> = if universe.is_empty() {
        documents.required().chain(documents.alternative()).collect()
    } else {
        universe.iter().copied().collect()
    };

    if ids.is_empty() {
        println!("  {}", "none".dim());
        return;
    }

    println!("  {:>6}  required  alternative", "id");
    for id in ids {
        println!(
            "  {id:>6}  {:<8}  {}",
            styled(checkbox(documents, id, DocumentSet::Required)),
            styled(checkbox(documents, id, DocumentSet::Alternative))
        );
    }
    println!("  {}", "[-] cannot be selected while in the other set".dim());
}

/// `[x]` for a member, `[ ]` for an id that can be added, and `[-]` for an id
/// the set refuses.
fn checkbox(documents: &ExclusiveMembership, id: DocumentTypeId, set: DocumentSet) -> &'static str {
    if documents.contains(id, set) {
        "[x]"
    } else if documents.can_toggle(id, set) {
        "[ ]"
    } else {
        "[-]"
    }
}

fn styled(checkbox: &str) -> String {
    match checkbox {
        "[x]" => checkbox.success(),
        "[-]" => checkbox.dim(),
        _ => checkbox.to_string(),
    }
}

fn range(tier: &InterestTier) -> String {
    match tier.max_balance {
        RangeValue::Finite(max) => format!("{} to {max}", tier.min_balance),
        RangeValue::Open => format!("{} and above", tier.min_balance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkboxes_follow_the_toggle_guard() {
        let required = DocumentTypeId::new(1);
        let unused = DocumentTypeId::new(2);
        let documents = ExclusiveMembership::default()
            .toggle(required, DocumentSet::Required)
            .unwrap();

        assert_eq!(checkbox(&documents, required, DocumentSet::Required), "[x]");
        assert_eq!(checkbox(&documents, required, DocumentSet::Alternative), "[-]");
        assert_eq!(checkbox(&documents, unused, DocumentSet::Required), "[ ]");
        assert_eq!(checkbox(&documents, unused, DocumentSet::Alternative), "[ ]");
    }

    #[test]
    fn ids_outside_the_universe_cannot_be_selected() {
        let documents = ExclusiveMembership::default()
            .with_universe([DocumentTypeId::new(1)])
            .unwrap();

        assert_eq!(
            checkbox(&documents, DocumentTypeId::new(9), DocumentSet::Required),
            "[-]"
        );
    }
}
