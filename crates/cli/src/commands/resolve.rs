// Path: crates/cli/src/commands/resolve.rs

use anyhow::{Context, Result};
use clap::Parser;
use idkeys_identity::persist::{load_snapshot, JsonFileSink};
use idkeys_identity::source::{EntryLog, MemoryEntrySource};
use idkeys_identity::IdentityResolver;
use idkeys_types::app::IdentityChainId;
use idkeys_types::config::IdentityConfig;
use std::io::Write;
use std::path::PathBuf;

/// Where entries come from and which identity to look at.
#[derive(Parser, Debug, Clone)]
pub struct SourceArgs {
    /// JSON entry log exported from the chain.
    #[clap(long)]
    pub entries: PathBuf,
    /// The identity chain id.
    #[clap(long)]
    pub chain_id: String,
    /// Optional TOML configuration file.
    #[clap(long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ResolveArgs {
    #[clap(flatten)]
    pub source: SourceArgs,
    /// Height to resolve at. Defaults to the latest entry.
    #[clap(long)]
    pub height: Option<u64>,
    /// Print collected metrics after the query.
    #[clap(long)]
    pub metrics: bool,
}

#[derive(Parser, Debug)]
pub struct NameArgs {
    #[clap(flatten)]
    pub source: SourceArgs,
}

/// Builds a resolver over the entry log in `args`, restoring the persisted cache
/// when the configuration names one.
pub fn open_resolver(args: &SourceArgs) -> Result<IdentityResolver<MemoryEntrySource>> {
    let config = match &args.config {
        Some(path) => IdentityConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => IdentityConfig::default(),
    };
    let log = EntryLog::load(&args.entries).context("Failed to load entry log")?;
    let cache_path = config.cache_path.clone();
    let mut resolver = IdentityResolver::new(MemoryEntrySource::from_log(log), config);

    if let Some(path) = cache_path {
        if let Some(snapshot) = load_snapshot(&path)
            .with_context(|| format!("Failed to read cache {}", path.display()))?
        {
            tracing::info!(
                target: "cli",
                path = %path.display(),
                identities = snapshot.keys.len(),
                "restored identity cache"
            );
            resolver = resolver.with_snapshot(snapshot)?;
        }
        resolver = resolver.with_sink(JsonFileSink::new(path));
    }
    Ok(resolver)
}

pub async fn run(args: ResolveArgs, out: &mut impl Write) -> Result<()> {
    if args.metrics {
        idkeys_telemetry::prometheus::install()?;
    }
    let chain_id = IdentityChainId::new(args.source.chain_id.clone());
    let mut resolver = open_resolver(&args.source)?;
    let keys = resolver
        .active_keys_at_height(&chain_id, args.height)
        .await
        .with_context(|| format!("Failed to resolve identity {}", chain_id))?;

    match args.height {
        Some(h) => writeln!(out, "Active keys of {} at height {}:", chain_id, h)?,
        None => writeln!(out, "Active keys of {}:", chain_id)?,
    }
    for (priority, key) in keys.iter().enumerate() {
        writeln!(out, "  {}: {}", priority, key)?;
    }
    if args.metrics {
        write!(out, "{}", idkeys_telemetry::prometheus::gather_text()?)?;
    }
    Ok(())
}

pub async fn run_name(args: NameArgs, out: &mut impl Write) -> Result<()> {
    let chain_id = IdentityChainId::new(args.source.chain_id.clone());
    let mut resolver = open_resolver(&args.source)?;
    let name = resolver
        .identity_name(&chain_id)
        .await
        .with_context(|| format!("Failed to read the name of identity {}", chain_id))?;
    for part in name {
        writeln!(out, "{} ({})", String::from_utf8_lossy(&part), hex::encode(&part))?;
    }
    Ok(())
}
