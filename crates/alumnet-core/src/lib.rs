//! Core types, the store trait, and the access-control and lifecycle
//! components of the alumnet record tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. Every
//! component takes its store as an `Arc<S: AlumnetStore>` at construction:
//!
//! - [`credential::CredentialVerifier`] turns a bearer header into
//!   [`credential::IdentityClaims`];
//! - [`authorize::RoleAuthorizer`] gates privileged operations;
//! - [`ownership::OwnershipGuard`] gates self-service access to one record;
//! - [`jobs::JobLifecycle`] drives the active → trashed → removed lifecycle.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod accounts;
pub mod authorize;
pub mod credential;
pub mod deadline;
pub mod employment;
pub mod error;
pub mod jobs;
pub mod ownership;
pub mod store;

#[cfg(test)]
mod testing;

pub use error::{Error, ErrorKind, Result};
