//! SECDROP - CLI
//!
//! Seal an API key under a passphrase, open it again, or inspect a payload.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use secdrop::{LogConfig, SecDropConfig};

#[derive(Parser)]
#[command(name = "secdrop")]
#[command(version = secdrop::VERSION)]
#[command(about = "Seal short secrets into portable SECDROP-P: payloads")]
struct Cli {
    /// Config file (defaults to <config dir>/secdrop/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a secret into a SECDROP-P: payload
    Encrypt {
        /// Secret to seal (read from stdin when omitted)
        #[arg(short, long)]
        secret: Option<String>,

        /// Passphrase (prompted when omitted)
        #[arg(short, long, conflicts_with = "generate")]
        passphrase: Option<String>,

        /// Generate a random passphrase and print it to stderr
        #[arg(short, long)]
        generate: bool,
    },

    /// Decrypt a SECDROP-P: payload
    Decrypt {
        payload: String,

        /// Passphrase (prompted when omitted)
        #[arg(short, long)]
        passphrase: Option<String>,
    },

    /// Show the structure of a payload without decrypting it
    Inspect {
        payload: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a random passphrase
    Generate {
        /// Length in characters (defaults to the configured length)
        #[arg(short, long)]
        length: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(log: &LogConfig, verbose: bool) {
    let fallback = if verbose { "secdrop=debug" } else { log.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = SecDropConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    init_logging(&config.log, cli.verbose);

    match cli.command {
        Commands::Encrypt {
            secret,
            passphrase,
            generate,
        } => {
            let secret = match secret {
                Some(s) => Zeroizing::new(s),
                None => read_secret_from_stdin()?,
            };

            let passphrase = if generate {
                let generated = secdrop::generate_passphrase(config.passphrase_length)?;
                eprintln!("Passphrase: {}", generated.as_str());
                generated
            } else {
                match passphrase {
                    Some(p) => Zeroizing::new(p),
                    None => prompt_new_passphrase()?,
                }
            };

            let payload = secdrop::encrypt_secure_drop_async(
                secret.to_string(),
                passphrase.to_string(),
            )
            .await
            .context("encryption failed")?;
            println!("{}", payload);
        }

        Commands::Decrypt {
            payload,
            passphrase,
        } => {
            let passphrase = match passphrase {
                Some(p) => Zeroizing::new(p),
                None => Zeroizing::new(
                    rpassword::prompt_password("Passphrase: ").context("failed to read passphrase")?,
                ),
            };

            let secret = secdrop::decrypt_secure_drop_async(
                payload.trim().to_string(),
                passphrase.to_string(),
            )
            .await
            .context("decryption failed")?;
            println!("{}", secret.as_str());
        }

        Commands::Inspect { payload, json } => {
            let Some(fields) = secdrop::parse_payload(payload.trim()) else {
                eprintln!("not a SECDROP payload");
                return Ok(ExitCode::from(2));
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&fields)?);
            } else {
                println!("format version : 0x{:02x}", fields.format_version);
                println!("algo version   : 0x{:02x}", fields.algo_version);
                println!("salt           : {}", hex::encode(fields.salt));
                println!("nonce          : {}", hex::encode(fields.nonce));
                println!("ciphertext     : {} bytes", fields.ciphertext_len);
                if !fields.is_current_format() {
                    println!("note           : not produced by this version");
                }
            }
        }

        Commands::Generate { length } => {
            let length = length.unwrap_or(config.passphrase_length);
            let passphrase = secdrop::generate_passphrase(length)?;
            println!("{}", passphrase.as_str());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn read_secret_from_stdin() -> anyhow::Result<Zeroizing<String>> {
    let mut input = Zeroizing::new(String::new());
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read secret from stdin")?;

    let trimmed = input.trim_end_matches(['\r', '\n']);
    Ok(Zeroizing::new(trimmed.to_string()))
}

fn prompt_new_passphrase() -> anyhow::Result<Zeroizing<String>> {
    let first = Zeroizing::new(
        rpassword::prompt_password("Passphrase: ").context("failed to read passphrase")?,
    );
    let second = Zeroizing::new(
        rpassword::prompt_password("Repeat passphrase: ").context("failed to read passphrase")?,
    );

    if first != second {
        bail!("passphrases do not match");
    }
    Ok(first)
}
