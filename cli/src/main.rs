mod optimize;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nfg")]
#[command(about = "NFG site maintenance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print an Argon2 hash suitable for ADMIN_PASSWORD_HASH
    HashPassword {
        /// Password to hash (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Shrink JPEG/PNG files under a directory in place
    OptimizeImages {
        /// Directory to walk, e.g. static/uploads
        dir: PathBuf,
    },
    /// Check that a running server and its database answer
    Ping {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::HashPassword { password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password()?,
            };
            println!("{}", hash_password(&password)?);
        }
        Commands::OptimizeImages { dir } => {
            let summary = optimize::optimize_dir(&dir, &mut io::stdout())?;
            println!(
                "{} optimized, {} skipped, {} bytes saved",
                summary.optimized, summary.skipped, summary.bytes_saved
            );
        }
        Commands::Ping { server } => {
            ping(&server).await?;
        }
    }

    Ok(())
}

fn prompt_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn hash_password(password: &str) -> Result<String> {
    if password.is_empty() {
        bail!("password must not be empty");
    }
    nfg_core::password::hash_password(password).map_err(|e| anyhow::anyhow!("hashing failed: {e}"))
}

async fn ping(server: &str) -> Result<()> {
    let url = format!("{}/healthz", server.trim_end_matches('/'));
    let response = reqwest::get(&url)
        .await
        .with_context(|| format!("requesting {url}"))?;

    let status = response.status();
    let body: serde_json::Value = response.json().await.context("decoding /healthz body")?;
    println!("{status} {body}");

    if body.get("db").and_then(|v| v.as_str()) != Some("up") {
        bail!("database is not reachable from the server");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_verifies() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(nfg_core::password::verify_password("hunter2", &hash));
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(hash_password("").is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["nfg", "ping"]).unwrap();
        assert!(matches!(cli.command, Commands::Ping { server } if server == "http://localhost:3000"));

        let cli = Cli::try_parse_from(["nfg", "optimize-images", "static/uploads"]).unwrap();
        assert!(matches!(cli.command, Commands::OptimizeImages { dir } if dir == PathBuf::from("static/uploads")));

        let cli = Cli::try_parse_from(["nfg", "hash-password", "--password", "pw"]).unwrap();
        assert!(matches!(cli.command, Commands::HashPassword { password: Some(p) } if p == "pw"));
    }
}
