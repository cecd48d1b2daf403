//! alumnet server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus
//! `ALUMNET_*` environment overrides, opens an in-process SQLite store, seeds
//! the built-in roles and serves the JSON API over HTTP.
//!
//! # Bootstrapping the first admin
//!
//! ```text
//! cargo run -p alumnet-server -- --create-admin root root@example.com
//! ```
//!
//! The password is read from stdin.

use std::{path::PathBuf, sync::Arc};

use alumnet_server::{ServerConfig, app, create_admin, seed_roles};
use alumnet_store_sqlite::SqliteStore;
use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "alumnet employment-record API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Create an admin account with the password entered on stdin and exit.
  #[arg(long, num_args = 2, value_names = ["USERNAME", "EMAIL"])]
  create_admin: Option<Vec<String>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ALUMNET"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.validate()?;

  let store_path = server_cfg.prepare_store_path()?;

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let state = server_cfg.app_state(Arc::new(store));

  // Helper mode: create an admin and exit.
  if let Some(args) = cli.create_admin {
    let [username, email] = <[String; 2]>::try_from(args)
      .map_err(|_| anyhow::anyhow!("--create-admin takes a username and an email"))?;
    let password = read_password()?;
    let account = create_admin(&state, username, email, password).await?;
    println!("{}", account.id);
    return Ok(());
  }

  let admin = seed_roles(&state).await?;
  tracing::info!(role = %admin.name, "roles ready");

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app(state)).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
