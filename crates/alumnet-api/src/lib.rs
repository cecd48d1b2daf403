//! JSON REST API for alumnet.
//!
//! Exposes an axum [`Router`] backed by any [`alumnet_core::store::AlumnetStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", alumnet_api::api_router(state))
//! ```

pub mod accounts;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod jobs;
pub mod me;

use std::sync::Arc;

use alumnet_core::{
  accounts::AccountService,
  authorize::RoleAuthorizer,
  credential::{CredentialIssuer, CredentialVerifier},
  deadline::Deadline,
  jobs::JobLifecycle,
  ownership::OwnershipGuard,
  store::AlumnetStore,
};
use axum::{
  Router,
  routing::{delete, get, patch, post, put},
};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers. Every component holds the same
/// store.
pub struct AppState<S> {
  pub verifier:   Arc<CredentialVerifier>,
  pub issuer:     Arc<CredentialIssuer>,
  pub authorizer: RoleAuthorizer<S>,
  pub guard:      OwnershipGuard<S>,
  pub jobs:       JobLifecycle<S>,
  pub accounts:   AccountService<S>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      verifier:   Arc::clone(&self.verifier),
      issuer:     Arc::clone(&self.issuer),
      authorizer: self.authorizer.clone(),
      guard:      self.guard.clone(),
      jobs:       self.jobs.clone(),
      accounts:   self.accounts.clone(),
    }
  }
}

impl<S: AlumnetStore> AppState<S> {
  /// Wire every component to `store`. Tokens are signed and verified with
  /// `secret`; issued tokens live for `token_ttl`.
  pub fn new(
    store: Arc<S>,
    secret: &[u8],
    token_ttl: chrono::Duration,
    deadline: Deadline,
  ) -> Self {
    Self {
      verifier:   Arc::new(CredentialVerifier::new(secret)),
      issuer:     Arc::new(CredentialIssuer::new(secret, token_ttl)),
      authorizer: RoleAuthorizer::new(Arc::clone(&store), deadline),
      guard:      OwnershipGuard::new(Arc::clone(&store), deadline),
      jobs:       JobLifecycle::new(Arc::clone(&store), deadline),
      accounts:   AccountService::new(store, deadline),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: AlumnetStore + 'static,
{
  Router::new()
    // Accounts
    .route("/login", post(accounts::login::<S>))
    .route("/accounts", post(accounts::create::<S>))
    // Employment records
    .route("/jobs", get(jobs::list::<S>).post(jobs::create::<S>))
    .route("/jobs/trash", get(jobs::list_trash::<S>))
    .route("/jobs/trash/{id}", delete(jobs::purge::<S>))
    .route("/jobs/trash/{id}/restore", put(jobs::restore::<S>))
    .route("/jobs/alumni/{alumni_id}", get(jobs::list_for_alumni::<S>))
    .route(
      "/jobs/{id}",
      get(jobs::get_one::<S>).put(jobs::update::<S>).delete(jobs::trash::<S>),
    )
    .route("/jobs/{id}/lifecycle", patch(jobs::set_lifecycle::<S>))
    // Owner self-service
    .route("/me/jobs/{id}", get(me::get_one::<S>).put(me::update::<S>))
    .with_state(state)
}
