use std::path::{Path, PathBuf};

mod config;
mod docs;
mod export;
mod response;
mod show;
mod terminal;
mod tier;
mod validate;

use chrono::NaiveDate;
use clap::ArgAction;
use config::Config;
use docs::Docs;
use export::Export;
use response::Response;
use savings_config::{ConfigurationSnapshot, Edit, EditSession, EditorConfig, Workspace};
use show::Show;
use tier::Tier;
use tracing::instrument;
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the directory holding the product configuration
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Show(Show::default()))
            .run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Create a product configuration with a single open-ended tier
    Init,

    /// Show the interest tiers and document requirements (default)
    Show(Show),

    /// Check the product configuration against every invariant
    Validate(Validate),

    /// Print the save payload as JSON
    Export(Export),

    /// Check the persistence service's reply to a save
    Response(Response),

    /// Add, remove or edit interest tiers
    Tier(Tier),

    /// Edit the KYC document requirements
    Docs(Docs),

    /// Show or modify editor settings
    Config(Config),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Init => Init::run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::Validate(command) => command.run(root)?,
            Self::Export(command) => command.run(root)?,
            Self::Response(command) => command.run(root)?,
            Self::Tier(command) => command.run(root)?,
            Self::Docs(command) => command.run(root)?,
            Self::Config(command) => command.run(root)?,
        }
        Ok(())
    }
}

struct Init;

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        use terminal::Colorize;

        let workspace = Workspace::new(root.to_path_buf());
        if workspace.is_initialized() {
            anyhow::bail!(
                "Product configuration already initialized (found existing product.json)"
            );
        }

        workspace.init(today())?;

        println!(
            "{}",
            format!("Initialized product configuration in {}", root.display()).success()
        );
        println!("  Created: .savings/config.toml");
        println!("  Created: product.json");
        println!("  Created: tiers.json");
        println!();
        println!("Next steps:");
        println!("  savings tier set 0 rate 1.5");
        println!("  savings tier add");

        Ok(())
    }
}

/// The date stamped on newly created tiers.
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Loads the product configuration, applies a single edit and saves the
/// result if anything changed.
///
/// A rejected edit is returned as an error and nothing is written.
fn edit(
    root: &Path,
    build: impl FnOnce(&EditorConfig, NaiveDate) -> Edit,
) -> anyhow::Result<ConfigurationSnapshot> {
    let workspace = Workspace::new(root.to_path_buf());
    let today = today();
    let config = workspace.config()?;

    let mut session = EditSession::new(workspace.load(today)?);
    session.apply(build(&config, today))?;

    if session.is_dirty() {
        workspace.save(session.current())?;
    } else {
        tracing::info!("Nothing changed, not saving");
    }

    Ok(session.into_snapshot())
}
