// Path: crates/cli/src/commands/entry.rs

use super::resolve::{open_resolver, SourceArgs};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use idkeys_identity::management::{
    prepare_identity, prepare_key_replacement, KeyReplacementRequest, KeySpec, NewEntry,
};
use idkeys_types::app::IdentityChainId;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct EntryArgs {
    #[clap(subcommand)]
    pub command: EntryCommands,
}

#[derive(Subcommand, Debug)]
pub enum EntryCommands {
    /// Build the first entry of a new identity chain.
    Identity {
        /// Name parts, in order.
        #[clap(long = "name", required = true)]
        name: Vec<String>,
        /// Generate this many fresh keys.
        #[clap(long, conflicts_with = "key")]
        generate: Option<usize>,
        /// Use an existing key (public or secret form). Repeat in priority order.
        #[clap(long = "key")]
        key: Vec<String>,
    },
    /// Build a signed entry replacing one active key, after checking it against the log.
    ReplaceKey {
        #[clap(flatten)]
        source: SourceArgs,
        /// The key to retire.
        #[clap(long)]
        old: String,
        /// The key taking its place.
        #[clap(long)]
        new: String,
        /// Secret key of the active key authorizing the change.
        #[clap(long)]
        signer_secret: String,
    },
}

pub async fn run(args: EntryArgs, out: &mut impl Write) -> Result<()> {
    match args.command {
        EntryCommands::Identity {
            name,
            generate,
            key,
        } => {
            let spec = match generate {
                Some(count) => KeySpec::Generate(count),
                None if key.is_empty() => {
                    return Err(anyhow!("either --generate or --key is required"))
                }
                None => KeySpec::Existing(key),
            };
            let name: Vec<Vec<u8>> = name.into_iter().map(String::into_bytes).collect();
            let prepared = prepare_identity(&name, spec)?;
            for (i, key) in prepared.keys.iter().enumerate() {
                writeln!(out, "Key {}: {}", i, key.public)?;
                if let Some(secret) = &key.secret {
                    writeln!(out, "Secret {}: {}", i, secret)?;
                }
            }
            write_entry(&prepared.entry, out)
        }
        EntryCommands::ReplaceKey {
            source,
            old,
            new,
            signer_secret,
        } => {
            let chain_id = IdentityChainId::new(source.chain_id.clone());
            let mut resolver = open_resolver(&source)?;
            let request = KeyReplacementRequest {
                old_key: old,
                new_key: new,
                signing_secret: signer_secret,
            };
            let entry = prepare_key_replacement(&mut resolver, &chain_id, &request)
                .await
                .context("Key replacement refused")?;
            write_entry(&entry, out)
        }
    }
}

fn write_entry(entry: &NewEntry, out: &mut impl Write) -> Result<()> {
    let json = serde_json::json!({
        "chainId": entry.chain_id.as_ref().map(IdentityChainId::as_str),
        "extIds": entry.ext_ids.iter().map(hex::encode).collect::<Vec<_>>(),
        "content": hex::encode(&entry.content),
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
    Ok(())
}
