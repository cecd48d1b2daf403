//! Role check for privileged operations.

use std::sync::Arc;

use crate::{
  Error, Result, account::Role, credential::IdentityClaims, deadline::Deadline,
  store::AlumnetStore,
};

/// Name of the privileged role.
pub const ADMIN_ROLE: &str = "admin";

/// Capitalised spelling found in some registries; consulted only when
/// [`ADMIN_ROLE`] is absent.
pub const ADMIN_ROLE_LEGACY: &str = "Admin";

/// Decides whether a caller holds the privileged role.
///
/// The role is re-resolved from the registry on every call, so renames and
/// re-seeding take effect immediately.
pub struct RoleAuthorizer<S> {
  store:    Arc<S>,
  deadline: Deadline,
}

impl<S> Clone for RoleAuthorizer<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), deadline: self.deadline }
  }
}

impl<S: AlumnetStore> RoleAuthorizer<S> {
  pub fn new(store: Arc<S>, deadline: Deadline) -> Self { Self { store, deadline } }

  /// Look up the privileged role, falling back to the legacy spelling.
  pub async fn resolve_admin(&self) -> Result<Option<Role>> {
    let role = self
      .deadline
      .run("find_role_by_name", self.store.find_role_by_name(ADMIN_ROLE))
      .await?;
    if role.is_some() {
      return Ok(role);
    }

    let legacy = self
      .deadline
      .run("find_role_by_name", self.store.find_role_by_name(ADMIN_ROLE_LEGACY))
      .await?;
    if legacy.is_some() {
      tracing::warn!(
        role = ADMIN_ROLE_LEGACY,
        "privileged role resolved through legacy capitalisation"
      );
    }
    Ok(legacy)
  }

  pub async fn require_admin(&self, claims: &IdentityClaims) -> Result<()> {
    let Some(admin) = self.resolve_admin().await? else {
      tracing::warn!("privileged role missing from registry");
      return Err(Error::Forbidden("admin role required"));
    };

    if claims.role_id() != admin.id {
      tracing::debug!(subject = %claims.subject(), "admin check denied");
      return Err(Error::Forbidden("admin role required"));
    }
    Ok(())
  }
}
