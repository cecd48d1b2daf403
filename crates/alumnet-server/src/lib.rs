//! Server assembly for alumnet: configuration, the top-level router, and the
//! bootstrap steps run before serving.

pub mod error;

pub use error::Error;

use std::{
  fmt,
  path::{Path, PathBuf},
  sync::Arc,
};

use alumnet_api::{AppState, api_router};
use alumnet_core::{
  account::{Account, Role},
  accounts::NewAccount,
  authorize::ADMIN_ROLE,
  credential::DEFAULT_TOKEN_TTL_HOURS,
  deadline::Deadline,
  store::AlumnetStore,
};
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Role given to self-service alumni accounts.
pub const ALUMNI_ROLE: &str = "alumni";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ALUMNET_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  #[serde(default = "default_store_path")]
  pub store_path:       PathBuf,
  pub jwt_secret:       String,
  #[serde(default = "default_token_ttl_hours")]
  pub token_ttl_hours:  i64,
  #[serde(default = "default_store_timeout_ms")]
  pub store_timeout_ms: u64,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 3000 }
fn default_store_path() -> PathBuf { PathBuf::from("alumnet.db") }
fn default_token_ttl_hours() -> i64 { DEFAULT_TOKEN_TTL_HOURS }
fn default_store_timeout_ms() -> u64 { 5_000 }

impl fmt::Debug for ServerConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ServerConfig")
      .field("host", &self.host)
      .field("port", &self.port)
      .field("store_path", &self.store_path)
      .field("jwt_secret", &"<redacted>")
      .field("token_ttl_hours", &self.token_ttl_hours)
      .field("store_timeout_ms", &self.store_timeout_ms)
      .finish()
  }
}

impl ServerConfig {
  pub fn validate(&self) -> Result<(), Error> {
    if self.jwt_secret.trim().is_empty() {
      return Err(Error::Config("jwt_secret must not be empty".into()));
    }
    if self.token_ttl_hours <= 0 {
      return Err(Error::Config("token_ttl_hours must be positive".into()));
    }
    if self.store_timeout_ms == 0 {
      return Err(Error::Config("store_timeout_ms must be positive".into()));
    }
    Ok(())
  }

  /// The store path with a leading `~` expanded. Its parent directory is
  /// created if missing.
  pub fn prepare_store_path(&self) -> Result<PathBuf, Error> {
    let path = expand_tilde(&self.store_path);
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)
        .map_err(|source| Error::StoreDir { path: parent.to_path_buf(), source })?;
    }
    Ok(path)
  }

  pub fn deadline(&self) -> Deadline { Deadline::from_millis(self.store_timeout_ms) }

  pub fn token_ttl(&self) -> chrono::Duration { chrono::Duration::hours(self.token_ttl_hours) }

  /// Build handler state over `store` from this configuration.
  pub fn app_state<S: AlumnetStore>(&self, store: Arc<S>) -> AppState<S> {
    AppState::new(store, self.jwt_secret.as_bytes(), self.token_ttl(), self.deadline())
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the API mounted under `/api` with request tracing.
pub fn app<S: AlumnetStore + 'static>(state: AppState<S>) -> Router {
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Bootstrap ───────────────────────────────────────────────────────────────

/// Make sure an admin role and the alumni role exist. An existing legacy-named
/// admin role is reused rather than shadowed. Returns the admin role.
pub async fn seed_roles<S: AlumnetStore>(state: &AppState<S>) -> Result<Role, Error> {
  let admin = match state.authorizer.resolve_admin().await? {
    Some(role) => role,
    None => state.accounts.ensure_role(ADMIN_ROLE).await?,
  };
  state.accounts.ensure_role(ALUMNI_ROLE).await?;
  Ok(admin)
}

/// Create an account holding the admin role.
pub async fn create_admin<S: AlumnetStore>(
  state: &AppState<S>,
  username: String,
  email: String,
  password: String,
) -> Result<Account, Error> {
  let role = seed_roles(state).await?;
  let account = state
    .accounts
    .create(NewAccount { username, email, password, role_id: role.id, alumni_id: None })
    .await?;
  tracing::info!(id = %account.id, username = %account.username, "admin account created");
  Ok(account)
}
