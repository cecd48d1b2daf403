//! In-memory store double and fixtures shared by the unit tests.

use std::{
  convert::Infallible,
  sync::{Mutex, MutexGuard},
  time::Duration,
};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  account::{Account, Role},
  credential::{CredentialIssuer, CredentialVerifier, IdentityClaims, TokenClaims},
  employment::{EmploymentRecord, JobPatch, Lifecycle, OwnerRef},
  store::AlumnetStore,
};

const TEST_SECRET: &[u8] = b"unit-test-secret";

#[derive(Default)]
struct State {
  roles:    Vec<Role>,
  accounts: Vec<Account>,
  jobs:     Vec<EmploymentRecord>,
}

/// A `Vec`-backed [`AlumnetStore`] with an optional artificial delay on every
/// call.
#[derive(Default)]
pub struct MemoryStore {
  state: Mutex<State>,
  delay: Option<Duration>,
}

impl MemoryStore {
  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = Some(delay);
    self
  }

  /// Insert a role with a caller-chosen id.
  pub fn put_role(&self, role: Role) { self.state().roles.push(role); }

  fn state(&self) -> MutexGuard<'_, State> { self.state.lock().unwrap() }

  async fn pause(&self) {
    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }
  }
}

impl AlumnetStore for MemoryStore {
  type Error = Infallible;

  async fn add_role(&self, name: &str) -> Result<Role, Infallible> {
    self.pause().await;
    let role = Role { id: Uuid::new_v4(), name: name.to_owned() };
    self.state().roles.push(role.clone());
    Ok(role)
  }

  async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, Infallible> {
    self.pause().await;
    Ok(self.state().roles.iter().find(|r| r.name == name).cloned())
  }

  async fn get_role(&self, id: Uuid) -> Result<Option<Role>, Infallible> {
    self.pause().await;
    Ok(self.state().roles.iter().find(|r| r.id == id).cloned())
  }

  async fn insert_account(&self, account: Account) -> Result<(), Infallible> {
    self.pause().await;
    self.state().accounts.push(account);
    Ok(())
  }

  async fn get_account(&self, id: Uuid) -> Result<Option<Account>, Infallible> {
    self.pause().await;
    Ok(self.state().accounts.iter().find(|a| a.id == id).cloned())
  }

  async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, Infallible> {
    self.pause().await;
    Ok(self.state().accounts.iter().find(|a| a.email == email).cloned())
  }

  async fn find_account_by_username(
    &self,
    username: &str,
  ) -> Result<Option<Account>, Infallible> {
    self.pause().await;
    Ok(self.state().accounts.iter().find(|a| a.username == username).cloned())
  }

  async fn insert_job(&self, record: EmploymentRecord) -> Result<(), Infallible> {
    self.pause().await;
    self.state().jobs.push(record);
    Ok(())
  }

  async fn get_job(&self, id: Uuid) -> Result<Option<EmploymentRecord>, Infallible> {
    self.pause().await;
    Ok(self.state().jobs.iter().find(|j| j.id == id).cloned())
  }

  async fn list_jobs(&self, lifecycle: Lifecycle) -> Result<Vec<EmploymentRecord>, Infallible> {
    self.pause().await;
    Ok(self.state().jobs.iter().filter(|j| j.lifecycle == lifecycle).cloned().collect())
  }

  async fn update_job(
    &self,
    id: Uuid,
    patch: JobPatch,
    at: DateTime<Utc>,
  ) -> Result<Option<EmploymentRecord>, Infallible> {
    self.pause().await;
    let mut state = self.state();
    let Some(job) = state
      .jobs
      .iter_mut()
      .find(|j| j.id == id && j.lifecycle == Lifecycle::Active)
    else {
      return Ok(None);
    };
    patch.apply(job);
    job.updated_at = at;
    Ok(Some(job.clone()))
  }

  async fn set_lifecycle(
    &self,
    id: Uuid,
    to: Lifecycle,
    from: Option<Lifecycle>,
    at: DateTime<Utc>,
  ) -> Result<Option<EmploymentRecord>, Infallible> {
    self.pause().await;
    let mut state = self.state();
    let Some(job) = state
      .jobs
      .iter_mut()
      .find(|j| j.id == id && from.is_none_or(|f| j.lifecycle == f))
    else {
      return Ok(None);
    };
    job.lifecycle = to;
    job.updated_at = at;
    Ok(Some(job.clone()))
  }

  async fn delete_job(
    &self,
    id: Uuid,
    from: Lifecycle,
  ) -> Result<Option<EmploymentRecord>, Infallible> {
    self.pause().await;
    let mut state = self.state();
    let Some(pos) = state.jobs.iter().position(|j| j.id == id && j.lifecycle == from) else {
      return Ok(None);
    };
    Ok(Some(state.jobs.remove(pos)))
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

/// Build verified claims by signing and verifying a real token.
pub fn claims_for(subject: Uuid, email: &str, role_id: Uuid) -> IdentityClaims {
  let now = Utc::now();
  let payload = TokenClaims {
    sub: subject,
    email: email.to_owned(),
    role_id,
    iat: now.timestamp(),
    exp: (now + chrono::Duration::hours(1)).timestamp(),
  };
  let token = CredentialIssuer::new(TEST_SECRET, chrono::Duration::hours(1))
    .sign(&payload)
    .unwrap();
  CredentialVerifier::new(TEST_SECRET)
    .verify(&format!("Bearer {token}"))
    .unwrap()
}

pub fn account(username: &str, role_id: Uuid) -> Account {
  Account {
    id: Uuid::new_v4(),
    username: username.to_owned(),
    email: format!("{username}@example.com"),
    password_hash: String::new(),
    role_id,
    alumni_id: None,
    created_at: Utc::now(),
  }
}

/// An `Active` record owned by `owner`, bypassing validation.
pub fn record_owned_by(owner: OwnerRef) -> EmploymentRecord {
  let now = Utc::now();
  EmploymentRecord {
    id: Uuid::new_v4(),
    alumni_id: owner,
    company: "Acme".into(),
    title: "Engineer".into(),
    industry: "Software".into(),
    location: "Surabaya".into(),
    salary_range: String::new(),
    start_date: NaiveDate::from_ymd_opt(2022, 3, 1).unwrap(),
    end_date: None,
    status: "employed".into(),
    description: String::new(),
    lifecycle: Lifecycle::Active,
    created_at: now,
    updated_at: now,
  }
}
