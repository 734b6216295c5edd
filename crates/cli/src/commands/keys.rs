// Path: crates/cli/src/commands/keys.rs

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use idkeys_crypto::keys::server::{
    extract_server_key_material, is_valid_server_key, server_key_from_material, ServerKeyKind,
};
use idkeys_crypto::keys::{
    generate_random_identity_key_pair, is_valid_public_identity_key,
    is_valid_secret_identity_key, public_identity_key,
};
use idkeys_crypto::sign::preimage::secret_to_public_key;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct KeysArgs {
    #[clap(subcommand)]
    pub command: KeysCommands,
}

#[derive(Subcommand, Debug)]
pub enum KeysCommands {
    /// Generate random identity key pairs.
    Generate {
        /// How many pairs to generate.
        #[clap(long, default_value_t = 1)]
        count: usize,
    },
    /// Check an identity or server key and show its public form.
    Inspect { key: String },
}

pub fn run(args: KeysArgs, out: &mut impl Write) -> Result<()> {
    match args.command {
        KeysCommands::Generate { count } => {
            if count == 0 {
                return Err(anyhow!("--count must be at least 1"));
            }
            for i in 0..count {
                let pair = generate_random_identity_key_pair()?;
                writeln!(out, "--- Identity key {} ---", i)?;
                writeln!(out, "Public: {}", pair.public)?;
                writeln!(out, "Secret: {}", pair.secret)?;
            }
        }
        KeysCommands::Inspect { key } => inspect(&key, out)?,
    }
    Ok(())
}

fn inspect(key: &str, out: &mut impl Write) -> Result<()> {
    if is_valid_public_identity_key(key) {
        writeln!(out, "Kind:   public identity key")?;
        writeln!(out, "Public: {}", key)?;
        return Ok(());
    }
    if is_valid_secret_identity_key(key) {
        writeln!(out, "Kind:   secret identity key")?;
        writeln!(out, "Public: {}", public_identity_key(key)?)?;
        return Ok(());
    }
    if let Some(kind) = ServerKeyKind::ALL
        .into_iter()
        .find(|kind| is_valid_server_key(*kind, key))
    {
        writeln!(out, "Kind:   {} server key", kind.tag())?;
        if let Some(public_kind) = server_public_kind(kind) {
            let seed = extract_server_key_material(kind, key)?;
            let public = server_key_from_material(public_kind, &secret_to_public_key(&seed));
            writeln!(out, "Public: {}", public)?;
        }
        return Ok(());
    }
    Err(anyhow!("{} is not a valid identity or server key", redact(key)))
}

fn server_public_kind(kind: ServerKeyKind) -> Option<ServerKeyKind> {
    match kind {
        ServerKeyKind::Sk1 => Some(ServerKeyKind::Id1),
        ServerKeyKind::Sk2 => Some(ServerKeyKind::Id2),
        ServerKeyKind::Sk3 => Some(ServerKeyKind::Id3),
        ServerKeyKind::Sk4 => Some(ServerKeyKind::Id4),
        _ => None,
    }
}

fn redact(key: &str) -> &str {
    if key.starts_with("idsec") || key.starts_with("sk") {
        "<secret key>"
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idkeys_test_utils::fixtures::identity_key;

    fn inspect_output(key: &str) -> Result<String> {
        let mut out = Vec::new();
        inspect(key, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_generate_prints_pairs() {
        let mut out = Vec::new();
        run(
            KeysArgs {
                command: KeysCommands::Generate { count: 2 },
            },
            &mut out,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Public: idpub").count(), 2);
        assert_eq!(text.matches("Secret: idsec").count(), 2);
    }

    #[test]
    fn test_generate_rejects_zero() {
        let mut out = Vec::new();
        let args = KeysArgs {
            command: KeysCommands::Generate { count: 0 },
        };
        assert!(run(args, &mut out).is_err());
    }

    #[test]
    fn test_inspect_identity_keys() {
        let pair = identity_key(9);
        let public = inspect_output(&pair.public).unwrap();
        assert!(public.contains("public identity key"));

        let secret = inspect_output(&pair.secret).unwrap();
        assert!(secret.contains("secret identity key"));
        assert!(secret.contains(&pair.public));
        assert!(!secret.contains(&pair.secret));
    }

    #[test]
    fn test_inspect_server_key() {
        let seed = [3u8; 32];
        let sk = server_key_from_material(ServerKeyKind::Sk2, &seed);
        let text = inspect_output(&sk).unwrap();
        assert!(text.contains("sk2 server key"));
        let id = server_key_from_material(ServerKeyKind::Id2, &secret_to_public_key(&seed));
        assert!(text.contains(&id));
    }

    #[test]
    fn test_inspect_rejects_garbage_without_echoing_secrets() {
        let err = inspect_output("idsecXYZ").unwrap_err();
        assert!(!err.to_string().contains("idsecXYZ"));
        assert!(inspect_output("hello").is_err());
    }
}
