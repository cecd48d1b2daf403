//! Per-call deadline applied to every store operation.

use std::{future::Future, time::Duration};

use crate::{Error, Result, store::StoreError};

/// Upper bound on a single store call. Expiry surfaces as
/// [`Error::Unavailable`]; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Duration);

impl Default for Deadline {
  fn default() -> Self { Self(Duration::from_secs(5)) }
}

impl Deadline {
  pub fn new(limit: Duration) -> Self { Self(limit) }

  pub fn from_millis(ms: u64) -> Self { Self(Duration::from_millis(ms)) }

  pub fn limit(&self) -> Duration { self.0 }

  /// Run one store call under the deadline. Constraint violations become
  /// [`Error::InvalidArgument`]; any other backend error is boxed.
  pub async fn run<T, E, F>(self, op: &'static str, call: F) -> Result<T>
  where
    F: Future<Output = Result<T, E>>,
    E: StoreError,
  {
    match tokio::time::timeout(self.0, call).await {
      Ok(Ok(value)) => Ok(value),
      Ok(Err(e)) if e.is_constraint_violation() => {
        tracing::warn!(op, error = %e, "store rejected write");
        Err(Error::invalid("request conflicts with an existing record"))
      }
      Ok(Err(e)) => {
        tracing::error!(op, error = %e, "store call failed");
        Err(Error::Store(Box::new(e)))
      }
      Err(_) => {
        tracing::error!(op, limit = ?self.0, "store call timed out");
        Err(Error::Unavailable { op, limit: self.0 })
      }
    }
  }
}
