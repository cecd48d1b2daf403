//! Ownership check for self-service access to employment records.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result, credential::IdentityClaims, deadline::Deadline,
  employment::EmploymentRecord, store::AlumnetStore,
};

/// Decides whether a caller may act on one employment record.
///
/// The caller's account is loaded and cross-checked against every claim
/// field before the target record is looked up, so an unverified caller
/// learns nothing about which record ids exist.
pub struct OwnershipGuard<S> {
  store:    Arc<S>,
  deadline: Deadline,
}

impl<S> Clone for OwnershipGuard<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), deadline: self.deadline }
  }
}

impl<S: AlumnetStore> OwnershipGuard<S> {
  pub fn new(store: Arc<S>, deadline: Deadline) -> Self { Self { store, deadline } }

  /// Returns the target record (in whatever lifecycle state it is) when the
  /// caller owns it.
  pub async fn check(
    &self,
    claims: &IdentityClaims,
    record_id: Uuid,
  ) -> Result<EmploymentRecord> {
    let account = self
      .deadline
      .run("get_account", self.store.get_account(claims.subject()))
      .await?
      .ok_or_else(|| Error::not_found("account not found"))?;

    // Each field is compared on its own so a credential that matches on one
    // field but not the others is still refused.
    let id_matches = account.id == claims.subject();
    let email_matches = account.email == claims.email();
    let role_matches = account.role_id == claims.role_id();
    if !(id_matches && email_matches && role_matches) {
      tracing::warn!(
        subject = %claims.subject(),
        id_matches,
        email_matches,
        role_matches,
        "credential does not match stored account"
      );
      return Err(Error::Forbidden("credential does not match account"));
    }

    let record = self
      .deadline
      .run("get_job", self.store.get_job(record_id))
      .await?
      .ok_or_else(|| Error::not_found(format!("employment record {record_id} not found")))?;

    if record.alumni_id.id() != Some(account.id) {
      tracing::debug!(subject = %account.id, %record_id, "ownership check denied");
      return Err(Error::Forbidden("not the owner of this record"));
    }

    Ok(record)
  }
}
