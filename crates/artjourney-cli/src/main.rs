//! ArtJourney CLI - session frontend for the ArtJourney API
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`ARTJOURNEY_*`)
//! 3. Global config (`~/.artjourney/config.toml`)
//! 4. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `ARTJOURNEY_API_URL`: API origin
//! - `ARTJOURNEY_TIMEOUT_SECS`: Request timeout in seconds
//! - `ARTJOURNEY_SNAPSHOT_PATH`: Custom session snapshot path

use anyhow::{Context, Result};
use artjourney_auth::SurveyGate;
use artjourney_client::{
    AuthApi, AuthGateway, ClientConfig, ConfigLoader, RegisterRequest, SessionStore,
    SignInRequest, SnapshotError, SnapshotStore,
};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// ArtJourney CLI - session frontend for the ArtJourney API
#[derive(Parser, Debug)]
#[command(name = "artjourney")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the API origin (also: ARTJOURNEY_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Override the request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Use a custom global config file instead of ~/.artjourney/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the session snapshot path (also: ARTJOURNEY_SNAPSHOT_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    snapshot_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session
    Login {
        /// Account email
        email: String,

        /// Password; prompted on stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out and clear the persisted session
    Logout,

    /// Show the locally persisted session without contacting the server
    Status,

    /// Ask the server whether the persisted session is still accepted
    Validate,

    /// Create a new account
    Register {
        /// Account email
        email: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Password; prompted on stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

/// Merges file/env config via [`ConfigLoader`] and applies CLI argument
/// overrides as the highest-priority layer.
fn resolve_config(args: &Args) -> Result<ClientConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(ref path) = args.config {
        loader = loader.with_global_config(path.clone());
    }
    let mut config = loader.load().context("failed to load configuration")?;

    if let Some(ref url) = args.api_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(ref path) = args.snapshot_path {
        config.snapshot_path = path.clone();
    }

    Ok(config)
}

/// Terminal filter: --debug > --verbose > RUST_LOG env > default "warn".
///
/// HTTP/TLS crates are suppressed at WARN on the debug level to keep
/// request noise out of the output.
fn terminal_filter(debug: bool, verbose: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("debug,hyper=warn,h2=warn,reqwest=warn,rustls=warn,tokio=warn")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn prompt_password(provided: Option<String>) -> Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }
    print!("Password: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(terminal_filter(args.debug, args.verbose))
        .init();

    let config = resolve_config(&args)?;
    info!(base_url = %config.base_url, "resolved configuration");

    let snapshots = SnapshotStore::new(config.snapshot_path.clone());
    let gateway = AuthGateway::new(&config).context("failed to build HTTP client")?;
    let store = SessionStore::new(gateway, snapshots.clone());

    match args.command {
        Command::Login { email, password } => {
            let password = prompt_password(password)?;
            let response = store
                .api()
                .sign_in(&SignInRequest { email, password })
                .await
                .context("sign-in failed")?;

            store.login(&response.token).await;
            let current = store.current_user();
            let Some(user) = current.user else {
                anyhow::bail!("sign-in succeeded but the credential token was unusable");
            };

            println!("Signed in as {} <{}>", user.name, user.email);
            if let Some(role) = current.role {
                println!("Role: {role}");
            }
            if SurveyGate::needs_survey(&store.view().session) {
                println!("First login: please complete the onboarding survey.");
            }
        }

        Command::Logout => {
            // Restore the persisted credential first so the server-side
            // session is actually invalidated, not just the local one.
            store.rehydrate().await;
            store.logout().await;
            println!("Signed out.");
        }

        Command::Status => match snapshots.load().await {
            Ok(snapshot) if snapshot.is_authenticated => {
                if let Some(user) = snapshot.user {
                    println!("Signed in as {} <{}>", user.name, user.email);
                    println!("Login count: {}", user.login_count);
                }
                if let Some(role) = snapshot.role {
                    println!("Role: {role}");
                }
            }
            Ok(_) | Err(SnapshotError::NotFound(_)) => {
                println!("Not signed in.");
            }
            Err(e) => return Err(e).context("failed to read session snapshot"),
        },

        Command::Validate => {
            store.rehydrate().await;
            let current = store.current_user();
            if current.is_authenticated {
                println!("Session is valid.");
            } else {
                println!("Session is not valid; sign in again.");
            }
        }

        Command::Register {
            email,
            name,
            password,
        } => {
            let password = prompt_password(password)?;
            store
                .api()
                .register(&RegisterRequest {
                    email,
                    name,
                    password,
                })
                .await
                .context("registration failed")?;
            println!("Account created. Check your inbox for the verification email.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).expect("argv should parse")
    }

    #[test]
    fn parses_login_with_password_flag() {
        let args = parse(&["artjourney", "login", "ada@example.com", "--password", "pw"]);
        match args.command {
            Command::Login { email, password } => {
                assert_eq!(email, "ada@example.com");
                assert_eq!(password.as_deref(), Some("pw"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let args = parse(&["artjourney", "status", "--debug", "--api-url", "http://x"]);
        assert!(args.debug);
        assert_eq!(args.api_url.as_deref(), Some("http://x"));
        assert!(matches!(args.command, Command::Status));
    }

    #[test]
    fn rejects_missing_subcommand() {
        assert!(Args::try_parse_from(["artjourney"]).is_err());
    }

    #[test]
    fn resolve_config_applies_cli_overrides() {
        let args = parse(&[
            "artjourney",
            "status",
            "--config",
            "/nonexistent/config.toml",
            "--api-url",
            "http://localhost:9000/",
            "--timeout",
            "5",
            "--snapshot-path",
            "/tmp/aj-session.json",
        ]);
        let config = resolve_config(&args).expect("resolve should succeed");

        // Trailing slash normalized, like the loader does
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.snapshot_path, PathBuf::from("/tmp/aj-session.json"));
    }

    #[test]
    fn resolve_config_keeps_loader_values_without_overrides() {
        let args = parse(&["artjourney", "status", "--config", "/nonexistent/c.toml"]);
        let config = resolve_config(&args).expect("resolve should succeed");
        assert_eq!(config.timeout_secs, artjourney_client::DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn debug_filter_takes_precedence_over_verbose() {
        let rendered = terminal_filter(true, true).to_string();
        assert!(rendered.contains("debug"), "got: {rendered}");
        assert!(rendered.contains("hyper=warn"), "got: {rendered}");
    }

    #[test]
    fn verbose_filter_is_info() {
        assert_eq!(terminal_filter(false, true).to_string(), "info");
    }
}
