//! Sandgit CLI - inspect and edit the persisted git credential cache
//!
//! Usage:
//!   sandgit list                              # Hosts with a cached credential
//!   sandgit get https://github.com/o/r.git    # Show the cached username
//!   sandgit set https://github.com/o/r.git me # Cache a credential (password on stdin)
//!   sandgit forget https://github.com/o/r.git # Drop a cached credential
//!   sandgit relative /a/b /a/c/d              # Path algebra, for debugging

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use sandgit::{Credential, CredentialCache, JsonFileStore};

const DEFAULT_STORE: &str = "sandgit-credentials.json";

/// Sandgit - git credential cache for sandboxed projects
#[derive(Parser, Debug)]
#[command(name = "sandgit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Credential store file
    #[arg(long, env = "SANDGIT_STORE", default_value = DEFAULT_STORE)]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List hosts with a cached credential
    List,
    /// Show the credential cached for a remote URL
    Get {
        url: String,
        /// Print the credential as JSON, password included
        #[arg(long)]
        json: bool,
    },
    /// Cache a credential for a remote URL
    Set {
        url: String,
        username: String,
        /// Password or token; read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Remove the credential cached for a remote URL
    Forget { url: String },
    /// Print the relative path from one path to another
    Relative { from: String, to: String },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(args, &mut stdin.lock(), &mut stdout.lock())
}

fn run(args: Args, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<()> {
    let cache = CredentialCache::new(Arc::new(JsonFileStore::new(&args.store)));
    let store_name = args.store.display().to_string();

    match args.command {
        Command::List => {
            let hosts = cache
                .hosts()
                .with_context(|| format!("Failed to read credential store: {}", store_name))?;
            for host in hosts {
                writeln!(out, "{}", host)?;
            }
        }
        Command::Get { url, json } => match cache.lookup(&url) {
            Some(credential) if json => {
                writeln!(out, "{}", serde_json::to_string(&credential)?)?;
            }
            Some(credential) => writeln!(out, "{}", credential.username)?,
            None => bail!("no credential cached for {}", host_label(&url)),
        },
        Command::Set {
            url,
            username,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => {
                    let mut line = String::new();
                    input
                        .read_line(&mut line)
                        .context("Failed to read password from stdin")?;
                    line.trim_end_matches(['\r', '\n']).to_string()
                }
            };
            if username.is_empty() {
                bail!("username must not be empty");
            }
            cache
                .save(&url, &Credential::new(username, password))
                .with_context(|| format!("Failed to write credential store: {}", store_name))?;
            writeln!(out, "saved credential for {}", host_label(&url))?;
        }
        Command::Forget { url } => {
            cache
                .forget(&url)
                .with_context(|| format!("Failed to write credential store: {}", store_name))?;
            writeln!(out, "forgot credential for {}", host_label(&url))?;
        }
        Command::Relative { from, to } => {
            writeln!(out, "{}", sandgit::path::relative(&from, &to))?;
        }
    }
    Ok(())
}

fn host_label(url: &str) -> &str {
    sandgit::host_of(url).unwrap_or(url)
}
