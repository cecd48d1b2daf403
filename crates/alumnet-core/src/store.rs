//! The `AlumnetStore` trait, the record and identity store every component
//! is handed at construction.
//!
//! The trait is implemented by storage backends (e.g. `alumnet-store-sqlite`).
//! Every method is a single-document operation; conditional variants carry the
//! lifecycle precondition so that the check and the write happen atomically at
//! the storage layer.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  account::{Account, Role},
  employment::{EmploymentRecord, JobPatch, Lifecycle},
};

/// Classification hook for backend errors.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// True when the backend refused a write because it would break a
  /// uniqueness or consistency constraint (duplicate email, inverted dates).
  fn is_constraint_violation(&self) -> bool { false }
}

impl StoreError for std::convert::Infallible {}

/// Abstraction over an alumnet store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AlumnetStore: Send + Sync {
  type Error: StoreError;

  // ── Roles ─────────────────────────────────────────────────────────────

  /// Create a role with the given name and return it.
  fn add_role<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Role, Self::Error>> + Send + 'a;

  /// Exact (case-sensitive) lookup by name.
  fn find_role_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + 'a;

  fn get_role(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + '_;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Persist a fully-built account. Fails if the email or username is taken.
  fn insert_account(
    &self,
    account: Account,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_account(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  /// Lookup by the already-normalised email.
  fn find_account_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + 'a;

  fn find_account_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + 'a;

  // ── Employment records ────────────────────────────────────────────────

  fn insert_job(
    &self,
    record: EmploymentRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Fetch a record in any lifecycle state.
  fn get_job(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<EmploymentRecord>, Self::Error>> + Send + '_;

  /// All records carrying `lifecycle`, oldest first.
  ///
  /// Owner references are returned as stored, malformed or not; filtering by
  /// owner is the caller's decision.
  fn list_jobs(
    &self,
    lifecycle: Lifecycle,
  ) -> impl Future<Output = Result<Vec<EmploymentRecord>, Self::Error>> + Send + '_;

  /// Apply `patch` to an `Active` record and stamp `updated_at`.
  ///
  /// Returns `None` if the record is absent or not `Active`.
  fn update_job(
    &self,
    id: Uuid,
    patch: JobPatch,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<EmploymentRecord>, Self::Error>> + Send + '_;

  /// Set the lifecycle tag and stamp `updated_at`.
  ///
  /// With `from = Some(state)` the write only happens when the record is
  /// currently in `state`. Returns the updated record, or `None` if nothing
  /// matched.
  fn set_lifecycle(
    &self,
    id: Uuid,
    to: Lifecycle,
    from: Option<Lifecycle>,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<EmploymentRecord>, Self::Error>> + Send + '_;

  /// Remove a record that is currently in `from`, returning it as it was
  /// immediately before removal.
  fn delete_job(
    &self,
    id: Uuid,
    from: Lifecycle,
  ) -> impl Future<Output = Result<Option<EmploymentRecord>, Self::Error>> + Send + '_;
}
