//! Error types for `alumnet-core`.
//!
//! Every component returns [`Error`]; the boundary layer picks a status code
//! from [`Error::kind`] and never from the message text.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Credential missing, malformed, expired or badly signed.
  #[error("unauthenticated: {0}")]
  Unauthenticated(&'static str),

  /// Role or ownership mismatch.
  #[error("forbidden: {0}")]
  Forbidden(&'static str),

  /// Record or account absent, or in a lifecycle state that forbids the
  /// requested transition.
  #[error("not found: {0}")]
  NotFound(String),

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// A store call did not finish within its deadline.
  #[error("store call `{op}` exceeded {limit:?}")]
  Unavailable { op: &'static str, limit: Duration },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("internal error: {0}")]
  Internal(String),
}

/// Coarse failure classification used to select a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Unauthenticated,
  Forbidden,
  NotFound,
  InvalidArgument,
  Internal,
  Unavailable,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Unauthenticated(_) => ErrorKind::Unauthenticated,
      Self::Forbidden(_) => ErrorKind::Forbidden,
      Self::NotFound(_) => ErrorKind::NotFound,
      Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
      Self::Unavailable { .. } => ErrorKind::Unavailable,
      Self::Store(_) | Self::Internal(_) => ErrorKind::Internal,
    }
  }

  pub(crate) fn invalid(msg: impl Into<String>) -> Self {
    Self::InvalidArgument(msg.into())
  }

  pub(crate) fn not_found(msg: impl Into<String>) -> Self {
    Self::NotFound(msg.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
