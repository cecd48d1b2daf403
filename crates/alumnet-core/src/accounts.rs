//! Account registration, login, and role seeding.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use chrono::Utc;
use rand_core::OsRng;
use uuid::Uuid;

use crate::{
  Error, Result,
  account::{Account, Role, normalize_email},
  deadline::Deadline,
  store::AlumnetStore,
};

const MIN_PASSWORD_LEN: usize = 5;

/// Input for [`AccountService::create`].
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub username:  String,
  pub email:     String,
  pub password:  String,
  pub role_id:   Uuid,
  pub alumni_id: Option<Uuid>,
}

pub struct AccountService<S> {
  store:    Arc<S>,
  deadline: Deadline,
}

impl<S> Clone for AccountService<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), deadline: self.deadline }
  }
}

impl<S: AlumnetStore> AccountService<S> {
  pub fn new(store: Arc<S>, deadline: Deadline) -> Self { Self { store, deadline } }

  /// Validate and persist a new account with an argon2-hashed password.
  pub async fn create(&self, input: NewAccount) -> Result<Account> {
    let username = input.username.trim().to_owned();
    let email = normalize_email(&input.email);

    if !is_valid_username(&username) {
      return Err(Error::invalid(
        "username must be 3-50 characters of letters, digits or underscore",
      ));
    }
    if !is_valid_email(&email) {
      return Err(Error::invalid("invalid email address"));
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
      return Err(Error::invalid(format!(
        "password must be at least {MIN_PASSWORD_LEN} characters"
      )));
    }
    if input.role_id.is_nil() {
      return Err(Error::invalid("role_id is required"));
    }

    self
      .deadline
      .run("get_role", self.store.get_role(input.role_id))
      .await?
      .ok_or_else(|| Error::invalid("role_id does not name a role"))?;

    if self
      .deadline
      .run("find_account_by_username", self.store.find_account_by_username(&username))
      .await?
      .is_some()
    {
      return Err(Error::invalid("username already registered"));
    }
    if self
      .deadline
      .run("find_account_by_email", self.store.find_account_by_email(&email))
      .await?
      .is_some()
    {
      return Err(Error::invalid("email already registered"));
    }

    let account = Account {
      id: Uuid::new_v4(),
      username,
      email,
      password_hash: hash_password(&input.password)?,
      role_id: input.role_id,
      alumni_id: input.alumni_id,
      created_at: Utc::now(),
    };
    self
      .deadline
      .run("insert_account", self.store.insert_account(account.clone()))
      .await?;

    tracing::info!(id = %account.id, username = %account.username, "account created");
    Ok(account)
  }

  /// Check an email/password pair. Every mismatch reports the same reason.
  pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account> {
    let email = normalize_email(email);
    let account = self
      .deadline
      .run("find_account_by_email", self.store.find_account_by_email(&email))
      .await?
      .ok_or(Error::Unauthenticated("invalid email or password"))?;

    let parsed = PasswordHash::new(&account.password_hash)
      .map_err(|_| Error::Unauthenticated("invalid email or password"))?;
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .map_err(|_| Error::Unauthenticated("invalid email or password"))?;

    Ok(account)
  }

  /// Return the role named `name`, creating it when absent.
  pub async fn ensure_role(&self, name: &str) -> Result<Role> {
    if let Some(role) = self
      .deadline
      .run("find_role_by_name", self.store.find_role_by_name(name))
      .await?
    {
      return Ok(role);
    }
    let role = self.deadline.run("add_role", self.store.add_role(name)).await?;
    tracing::info!(role = %role.name, id = %role.id, "role seeded");
    Ok(role)
  }
}

/// Produce an argon2 PHC string for `password`.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::Internal(format!("argon2 error: {e}")))
}

fn is_valid_username(username: &str) -> bool {
  (3..=50).contains(&username.len())
    && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_valid_email(email: &str) -> bool {
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  let local_ok = !local.is_empty()
    && local.chars().all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
  let Some((host, tld)) = domain.rsplit_once('.') else {
    return false;
  };
  let host_ok = !host.is_empty()
    && host.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
  let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
  local_ok && host_ok && tld_ok
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{ErrorKind, testing::MemoryStore};

  async fn service() -> (AccountService<MemoryStore>, Role) {
    let store = Arc::new(MemoryStore::default());
    let role = store.add_role("alumni").await.unwrap();
    (AccountService::new(store, Deadline::default()), role)
  }

  fn input(role_id: Uuid) -> NewAccount {
    NewAccount {
      username: "budi_s".into(),
      email: " Budi@Example.com ".into(),
      password: "Secret1".into(),
      role_id,
      alumni_id: None,
    }
  }

  #[tokio::test]
  async fn create_normalises_and_hashes() {
    let (svc, role) = service().await;
    let account = svc.create(input(role.id)).await.unwrap();
    assert_eq!(account.email, "budi@example.com");
    assert!(account.password_hash.starts_with("$argon2"));
    assert_ne!(account.password_hash, "Secret1");
  }

  #[tokio::test]
  async fn duplicate_username_or_email_is_rejected() {
    let (svc, role) = service().await;
    svc.create(input(role.id)).await.unwrap();

    let same_name = NewAccount { email: "other@example.com".into(), ..input(role.id) };
    assert_eq!(svc.create(same_name).await.unwrap_err().kind(), ErrorKind::InvalidArgument);

    let same_email = NewAccount { username: "other".into(), ..input(role.id) };
    assert_eq!(svc.create(same_email).await.unwrap_err().kind(), ErrorKind::InvalidArgument);
  }

  #[tokio::test]
  async fn create_validates_fields() {
    let (svc, role) = service().await;
    let cases = [
      NewAccount { username: "ab".into(), ..input(role.id) },
      NewAccount { username: "has space".into(), ..input(role.id) },
      NewAccount { email: "not-an-email".into(), ..input(role.id) },
      NewAccount { email: "a@b.c".into(), ..input(role.id) },
      NewAccount { password: "abc".into(), ..input(role.id) },
      NewAccount { role_id: Uuid::nil(), ..input(role.id) },
      NewAccount { role_id: Uuid::new_v4(), ..input(role.id) },
    ];
    for case in cases {
      let err = svc.create(case.clone()).await.unwrap_err();
      assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{case:?}");
    }
  }

  #[tokio::test]
  async fn authenticate_checks_password() {
    let (svc, role) = service().await;
    let created = svc.create(input(role.id)).await.unwrap();

    let account = svc.authenticate("BUDI@example.com", "Secret1").await.unwrap();
    assert_eq!(account.id, created.id);

    for (email, password) in [("budi@example.com", "wrong"), ("nobody@example.com", "Secret1")] {
      let err = svc.authenticate(email, password).await.unwrap_err();
      assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }
  }

  #[tokio::test]
  async fn ensure_role_is_idempotent() {
    let (svc, _) = service().await;
    let first = svc.ensure_role("admin").await.unwrap();
    let second = svc.ensure_role("admin").await.unwrap();
    assert_eq!(first, second);
  }
}
