// Path: crates/cli/src/main.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # idkeys CLI
//!
//! Operator tools for identity keys: generate and inspect keys, build identity
//! entries, and replay an exported entry log to answer key-history queries.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::*;

#[derive(Parser, Debug)]
#[clap(
    name = "idkeys",
    version,
    about = "Identity key tooling.",
    long_about = "Generates and inspects identity keys, builds identity chain entries, and resolves the active keys of an identity from an exported entry log."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate and inspect identity keys.
    Keys(keys::KeysArgs),

    /// Build identity chain entries ready for submission.
    Entry(entry::EntryArgs),

    /// Print the active keys of an identity at a height.
    Resolve(resolve::ResolveArgs),

    /// Print the name declared by an identity's first entry.
    Name(resolve::NameArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    idkeys_telemetry::init::init_tracing_with_default("warn")?;

    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::Keys(args) => keys::run(args, &mut out),
        Commands::Entry(args) => entry::run(args, &mut out).await,
        Commands::Resolve(args) => resolve::run(args, &mut out).await,
        Commands::Name(args) => resolve::run_name(args, &mut out).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "idkeys",
            "resolve",
            "--entries",
            "log.json",
            "--chain-id",
            "abcd",
            "--height",
            "10",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Resolve(ref a) if a.height == Some(10)));

        let cli = Cli::try_parse_from(["idkeys", "keys", "generate", "--count", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Keys(_)));

        assert!(Cli::try_parse_from(["idkeys", "resolve"]).is_err());
    }
}
