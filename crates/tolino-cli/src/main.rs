//! Tolino uploader CLI - inspect configuration and store account credentials
//!
//! Credentials are written to the same encrypted files the download service
//! reads, so logging in here makes them available to uploads there.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use tolino_core::{CredentialCache, LogConfig, TolinoConfig};

/// Tolino uploader - encrypted credential storage for Tolino cloud uploads
#[derive(Parser, Debug)]
#[command(name = "tolino-uploader")]
#[command(version)]
#[command(about = "Manage the stored Tolino credentials used for cloud uploads")]
struct Args {
    /// Encrypted credentials file (overrides TOLINO_CREDENTIALS_FILE)
    #[arg(long, global = true)]
    credentials_file: Option<PathBuf>,

    /// Encryption key file (overrides ENCRYPTION_KEY_FILE)
    #[arg(long, global = true)]
    key_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show configuration and whether credentials are stored
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encrypt and store Tolino account credentials
    Login {
        /// Account username (usually the email address)
        #[arg(long, env = "TOLINO_USERNAME")]
        username: String,

        /// Account password; prompted for when not given
        #[arg(long, env = "TOLINO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

/// Status output; never includes the password
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport<'a> {
    #[serde(flatten)]
    config: &'a TolinoConfig,
    webreader_url: String,
    key_file_exists: bool,
    has_credentials: bool,
    username: Option<&'a str>,
}

fn init_logging(log: &LogConfig) {
    if !log.enabled {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    init_logging(&LogConfig::from_env());

    let mut config = TolinoConfig::from_env();
    if let Some(path) = args.credentials_file {
        config.credentials_file = path;
    }
    if let Some(path) = args.key_file {
        config.key_file = path;
    }

    match args.command {
        Command::Status { json } => {
            let mut cache = CredentialCache::from_config(&config);
            cache.load();

            let report = StatusReport {
                config: &config,
                webreader_url: config.webreader_url(),
                key_file_exists: cache.key_file().exists(),
                has_credentials: cache.has_credentials(),
                username: cache.credentials().map(|c| c.username()),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Tolino enabled:    {}", config.enabled);
                println!("Webreader:         {}", report.webreader_url);
                println!("Credentials file:  {}", config.credentials_file.display());
                println!("Key file:          {}", config.key_file.display());
                match report.username {
                    Some(username) => println!("Stored account:    {}", username),
                    None => println!("Stored account:    (none)"),
                }
            }
        }
        Command::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => rpassword::prompt_password("Tolino password: ")?,
            };

            let mut cache = CredentialCache::from_config(&config);
            cache
                .try_save(&username, &password)
                .map_err(|e| format!("Failed to save credentials: {}", e))?;

            info!("Credentials stored for {}", username);
            println!("Saved Tolino credentials for {}", username);
        }
    }

    Ok(())
}
