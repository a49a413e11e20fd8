//! `savings`: edit the interest tiers and document requirements of a savings
//! product from the command line.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
