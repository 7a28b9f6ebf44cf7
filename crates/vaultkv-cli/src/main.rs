//! `vaultkv` CLI, a demonstration client for a HashiCorp Vault KV v2
//! secrets engine.
//!
//! The vault server does the hard part: encryption at rest, versioning,
//! authentication, and auditing. This binary only performs authenticated
//! round trips against its REST API: write a message, read it back, and a
//! couple of diagnostics.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod env_file;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use vaultkv_client::{HealthStatus, KvSecret, SecretData, VaultClient, VaultConfig};

use env_file::EnvFile;

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const DEFAULT_ADDR: &str = "http://127.0.0.1:8200";
const DEFAULT_MOUNT: &str = "secret";

// ── CLI structure ────────────────────────────────────────────────────

/// vaultkv, store and retrieve secrets in a vault server.
#[derive(Parser)]
#[command(
    name = "vaultkv",
    version,
    about = "vaultkv CLI — write and read versioned secrets in a vault server",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         VAULT_ADDR    Server address (default: http://127.0.0.1:8200)\n  \
         VAULT_TOKEN   Authentication token (required for everything but status)\n  \
         VAULT_MOUNT   KV v2 mount path (default: secret)\n\n\
         Variables may also come from a .env file in the working directory;\n\
         values already set in the environment win.\n\n\
         {DIM}Examples:{RESET}\n  \
         vaultkv write \"Hello from Vault\" --path my-secret\n  \
         vaultkv read --path my-secret --field message\n  \
         vaultkv status"
    ),
)]
struct Cli {
    /// Vault server address.
    #[arg(long, env = "VAULT_ADDR")]
    addr: Option<String>,

    /// Authentication token.
    #[arg(long, env = "VAULT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// KV v2 mount path.
    #[arg(long, env = "VAULT_MOUNT")]
    mount: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a message in the vault.
    Write {
        /// The message to store.
        message: String,
        /// Secret path under the KV mount.
        #[arg(long, default_value = "my-secret")]
        path: String,
        /// Payload key the message is stored under.
        #[arg(long, default_value = "message")]
        key: String,
        /// Extra key=value pairs to store alongside the message.
        #[arg(long = "data", value_name = "KEY=VALUE")]
        data: Vec<String>,
    },
    /// Read a secret from the vault.
    Read {
        /// Secret path under the KV mount.
        #[arg(long, default_value = "my-secret")]
        path: String,
        /// Version to read (default: latest).
        #[arg(long)]
        version: Option<u64>,
        /// Print only this field's raw value.
        #[arg(long)]
        field: Option<String>,
    },
    /// Soft-delete the latest version of a secret.
    Delete {
        /// Secret path under the KV mount.
        #[arg(long, default_value = "my-secret")]
        path: String,
    },
    /// List secret keys under a prefix.
    List {
        /// Path prefix (default: mount root).
        #[arg(default_value = "")]
        prefix: String,
    },
    /// Show vault server health (no token required).
    Status,
    /// Run diagnostics on server reachability and token validity.
    Doctor,
}

// ── Pretty output helpers ────────────────────────────────────────────

fn header(icon: &str, title: &str) {
    println!("{BOLD}{CYAN}{icon} {title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn kv_line(key: &str, value: &str) {
    println!("  {DIM}{key:<14}{RESET} {WHITE}{value}{RESET}");
}

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

fn print_secret(path: &str, secret: &KvSecret) {
    header("📦", &format!("Secret: {path}"));

    for (key, value) in &secret.data {
        let display = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        kv_line(key, &display);
    }

    println!();
    kv_line("Version", &format!("v{}", secret.metadata.version));
    if !secret.metadata.created_time.is_empty() {
        kv_line("Created", &secret.metadata.created_time);
    }
    if !secret.metadata.deletion_time.is_empty() {
        kv_line(
            "Deleted",
            &format!("{YELLOW}{}{RESET}", secret.metadata.deletion_time),
        );
    }
    println!();
}

fn print_list(prefix: &str, keys: &[String]) {
    let shown = if prefix.is_empty() { "/" } else { prefix };
    header("📂", &format!("Keys: {shown}"));

    if keys.is_empty() {
        println!("  {DIM}(empty){RESET}");
    } else {
        for key in keys {
            println!("  {CYAN}├─{RESET} {key}");
        }
    }

    println!();
}

fn print_health(health: &HealthStatus) {
    header("🔐", "Vault Status");

    let init = if health.initialized {
        format!("{GREEN}yes{RESET}")
    } else {
        format!("{RED}no{RESET}")
    };
    kv_line("Initialized", &init);

    let seal = if health.sealed {
        format!("{YELLOW}sealed{RESET}")
    } else {
        format!("{GREEN}unsealed{RESET}")
    };
    kv_line("Seal Status", &seal);

    if !health.version.is_empty() {
        kv_line("Version", &health.version);
    }
    if let Some(ref cluster) = health.cluster_name {
        kv_line("Cluster", cluster);
    }

    println!();
}

// ── Command dispatch ─────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    // .env must be loaded before settings are resolved.
    let dotenv = EnvFile::load_default();
    let cli = Cli::parse();

    let addr = resolve(cli.addr, &dotenv, "VAULT_ADDR")
        .unwrap_or_else(|| DEFAULT_ADDR.to_owned());
    let token = resolve(cli.token, &dotenv, "VAULT_TOKEN").unwrap_or_default();
    let mount = resolve(cli.mount, &dotenv, "VAULT_MOUNT")
        .unwrap_or_else(|| DEFAULT_MOUNT.to_owned());
    let token_set = !token.is_empty();

    let client = match VaultClient::with_config(VaultConfig {
        addr,
        token,
        mount,
        timeout: Duration::ZERO,
    }) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, token_set, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

/// Command line and process environment first (clap merges those), then the
/// `.env` file.
fn resolve(flag_or_env: Option<String>, dotenv: &EnvFile, key: &str) -> Option<String> {
    flag_or_env
        .filter(|v| !v.is_empty())
        .or_else(|| dotenv.get(key).map(str::to_owned))
}

async fn run(client: &VaultClient, token_set: bool, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Write {
            message,
            path,
            key,
            data,
        } => {
            ensure_authenticated(client, token_set).await?;
            cmd_write(client, &message, &path, &key, &data).await
        }
        Commands::Read {
            path,
            version,
            field,
        } => {
            ensure_authenticated(client, token_set).await?;
            cmd_read(client, &path, version, field.as_deref()).await
        }
        Commands::Delete { path } => {
            ensure_authenticated(client, token_set).await?;
            cmd_delete(client, &path).await
        }
        Commands::List { prefix } => {
            ensure_authenticated(client, token_set).await?;
            cmd_list(client, &prefix).await
        }
        Commands::Status => cmd_status(client).await,
        Commands::Doctor => cmd_doctor(client, token_set).await,
    }
}

/// A token must be present and accepted by the server before any KV call.
async fn ensure_authenticated(client: &VaultClient, token_set: bool) -> Result<()> {
    if !token_set {
        bail!("VAULT_TOKEN must be set in the environment or in a .env file");
    }
    let authenticated = client
        .is_authenticated()
        .await
        .context("authentication check failed")?;
    if !authenticated {
        bail!("failed to authenticate with the vault server; check your VAULT_TOKEN");
    }
    Ok(())
}

// ── KV commands ──────────────────────────────────────────────────────

async fn cmd_write(
    client: &VaultClient,
    message: &str,
    path: &str,
    key: &str,
    extra: &[String],
) -> Result<()> {
    let mut data = SecretData::new();
    data.insert(key.to_owned(), Value::String(message.to_owned()));
    for (k, v) in parse_kv_pairs(extra)? {
        data.insert(k, Value::String(v));
    }

    let written = client
        .put(path, &data)
        .await
        .context("failed to write secret")?;

    println!();
    success(&format!(
        "Secret written to {BOLD}{path}{RESET} (version {CYAN}v{}{RESET})",
        written.version
    ));
    println!();
    Ok(())
}

async fn cmd_read(
    client: &VaultClient,
    path: &str,
    version: Option<u64>,
    field: Option<&str>,
) -> Result<()> {
    let secret = client
        .get_version(path, version)
        .await
        .context("failed to read secret")?;

    if let Some(field) = field {
        let Some(value) = secret.data.get(field) else {
            bail!("field '{field}' not present at path: {path}");
        };
        match value {
            Value::String(s) => println!("{s}"),
            other => println!("{other}"),
        }
        return Ok(());
    }

    println!();
    print_secret(path, &secret);
    Ok(())
}

async fn cmd_delete(client: &VaultClient, path: &str) -> Result<()> {
    client
        .delete(path)
        .await
        .context("failed to delete secret")?;
    println!();
    success(&format!("Secret at {BOLD}{path}{RESET} deleted."));
    println!();
    Ok(())
}

async fn cmd_list(client: &VaultClient, prefix: &str) -> Result<()> {
    let keys = client
        .list(prefix)
        .await
        .context("failed to list secrets")?;
    println!();
    print_list(prefix, &keys);
    Ok(())
}

// ── Diagnostics ──────────────────────────────────────────────────────

async fn cmd_status(client: &VaultClient) -> Result<()> {
    println!();
    let health = client
        .health()
        .await
        .context("failed to fetch server health")?;
    print_health(&health);
    Ok(())
}

async fn cmd_doctor(client: &VaultClient, token_set: bool) -> Result<()> {
    println!();
    header("🩺", "Vault Doctor");
    println!();

    let mut pass = 0u32;
    let mut warn = 0u32;
    let mut fail = 0u32;

    print!("  Vault server ({})... ", client.addr());
    match client.health().await {
        Ok(health) if !health.initialized => {
            println!("{YELLOW}not initialized{RESET}");
            warn = warn.saturating_add(1);
        }
        Ok(health) if health.sealed => {
            println!("{YELLOW}sealed{RESET}");
            warn = warn.saturating_add(1);
        }
        Ok(_) => {
            println!("{GREEN}healthy (unsealed){RESET}");
            pass = pass.saturating_add(1);
        }
        Err(_) => {
            println!("{RED}unreachable{RESET}");
            fail = fail.saturating_add(1);
        }
    }

    print!("  Auth token... ");
    if token_set {
        match client.lookup_token().await {
            Ok(info) => {
                println!("{GREEN}valid ({} policies){RESET}", info.policies.len());
                pass = pass.saturating_add(1);
            }
            Err(_) => {
                println!("{YELLOW}set but invalid/expired{RESET}");
                warn = warn.saturating_add(1);
            }
        }
    } else {
        println!("{YELLOW}not set (VAULT_TOKEN){RESET}");
        warn = warn.saturating_add(1);
    }

    println!();
    println!(
        "  {GREEN}{pass} passed{RESET} · {YELLOW}{warn} warnings{RESET} · {RED}{fail} failed{RESET}"
    );
    println!();
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────────

fn parse_kv_pairs(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .ok_or_else(|| anyhow::anyhow!("invalid key=value pair: '{pair}'"))
        })
        .collect()
}
