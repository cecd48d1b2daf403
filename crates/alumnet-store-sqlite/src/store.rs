//! [`SqliteStore`]: the SQLite implementation of [`AlumnetStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use alumnet_core::{
  account::{Account, Role},
  employment::{EmploymentRecord, JobPatch, Lifecycle},
  store::AlumnetStore,
};

use crate::{
  Result,
  encode::{
    ACCOUNT_COLUMNS, JOB_COLUMNS, ROLE_COLUMNS, RawAccount, RawJob, RawRole, encode_date,
    encode_dt, encode_lifecycle, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An alumnet store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, as the tests do.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a statement expected to yield at most one employment row.
  async fn job_row(&self, sql: String, args: Vec<String>) -> Result<Option<EmploymentRecord>> {
    let raw: Option<RawJob> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(args), RawJob::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawJob::into_record).transpose()
  }

  async fn account_row(&self, column: &'static str, value: String) -> Result<Option<Account>> {
    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {column} = ?1"),
              rusqlite::params![value],
              RawAccount::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawAccount::into_account).transpose()
  }

  async fn role_row(&self, column: &'static str, value: String) -> Result<Option<Role>> {
    let raw: Option<RawRole> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ROLE_COLUMNS} FROM roles WHERE {column} = ?1"),
              rusqlite::params![value],
              RawRole::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawRole::into_role).transpose()
  }
}

// ─── AlumnetStore impl ───────────────────────────────────────────────────────

impl AlumnetStore for SqliteStore {
  type Error = crate::Error;

  // ── Roles ─────────────────────────────────────────────────────────────────

  async fn add_role(&self, name: &str) -> Result<Role> {
    let role = Role { id: Uuid::new_v4(), name: name.to_owned() };

    let id_str   = encode_uuid(role.id);
    let name_str = role.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO roles (role_id, name) VALUES (?1, ?2)",
          rusqlite::params![id_str, name_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(role)
  }

  async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>> {
    self.role_row("name", name.to_owned()).await
  }

  async fn get_role(&self, id: Uuid) -> Result<Option<Role>> {
    self.role_row("role_id", encode_uuid(id)).await
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn insert_account(&self, account: Account) -> Result<()> {
    let id_str     = encode_uuid(account.id);
    let role_str   = encode_uuid(account.role_id);
    let alumni_str = account.alumni_id.map(encode_uuid);
    let at_str     = encode_dt(account.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!("INSERT INTO accounts ({ACCOUNT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
          rusqlite::params![
            id_str,
            account.username,
            account.email,
            account.password_hash,
            role_str,
            alumni_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
    self.account_row("account_id", encode_uuid(id)).await
  }

  async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
    self.account_row("email", email.to_owned()).await
  }

  async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>> {
    self.account_row("username", username.to_owned()).await
  }

  // ── Employment records ────────────────────────────────────────────────────

  /// The owner reference is written verbatim, malformed or not.
  async fn insert_job(&self, record: EmploymentRecord) -> Result<()> {
    let id          = encode_uuid(record.id);
    let alumni_id   = record.alumni_id.as_str().to_owned();
    let company     = record.company;
    let title       = record.title;
    let industry    = record.industry;
    let location    = record.location;
    let salary      = record.salary_range;
    let start_date  = encode_date(record.start_date);
    let end_date    = record.end_date.map(encode_date);
    let status      = record.status;
    let description = record.description;
    let lifecycle   = encode_lifecycle(record.lifecycle);
    let created_at  = encode_dt(record.created_at);
    let updated_at  = encode_dt(record.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO employment_records ({JOB_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
          ),
          rusqlite::params![
            id,
            alumni_id,
            company,
            title,
            industry,
            location,
            salary,
            start_date,
            end_date,
            status,
            description,
            lifecycle,
            created_at,
            updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_job(&self, id: Uuid) -> Result<Option<EmploymentRecord>> {
    self
      .job_row(
        format!("SELECT {JOB_COLUMNS} FROM employment_records WHERE record_id = ?1"),
        vec![encode_uuid(id)],
      )
      .await
  }

  async fn list_jobs(&self, lifecycle: Lifecycle) -> Result<Vec<EmploymentRecord>> {
    let tag = encode_lifecycle(lifecycle);

    let raws: Vec<RawJob> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {JOB_COLUMNS} FROM employment_records WHERE lifecycle = ?1
           ORDER BY created_at, record_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![tag], RawJob::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawJob::into_record).collect()
  }

  async fn update_job(
    &self,
    id: Uuid,
    patch: JobPatch,
    at: DateTime<Utc>,
  ) -> Result<Option<EmploymentRecord>> {
    let id_str     = encode_uuid(id);
    let alumni_str = patch.alumni_id.map(encode_uuid);
    let start_str  = patch.start_date.map(encode_date);
    let end_str    = patch.end_date.map(encode_date);
    let at_str     = encode_dt(at);
    let active     = encode_lifecycle(Lifecycle::Active);

    let raw: Option<RawJob> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE employment_records SET
                   alumni_id    = COALESCE(?2, alumni_id),
                   company      = COALESCE(?3, company),
                   title        = COALESCE(?4, title),
                   industry     = COALESCE(?5, industry),
                   location     = COALESCE(?6, location),
                   salary_range = COALESCE(?7, salary_range),
                   start_date   = COALESCE(?8, start_date),
                   end_date     = COALESCE(?9, end_date),
                   status       = COALESCE(?10, status),
                   description  = COALESCE(?11, description),
                   updated_at   = ?12
                 WHERE record_id = ?1 AND lifecycle = ?13
                 RETURNING {JOB_COLUMNS}"
              ),
              rusqlite::params![
                id_str,
                alumni_str,
                patch.company,
                patch.title,
                patch.industry,
                patch.location,
                patch.salary_range,
                start_str,
                end_str,
                patch.status,
                patch.description,
                at_str,
                active,
              ],
              RawJob::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawJob::into_record).transpose()
  }

  async fn set_lifecycle(
    &self,
    id: Uuid,
    to: Lifecycle,
    from: Option<Lifecycle>,
    at: DateTime<Utc>,
  ) -> Result<Option<EmploymentRecord>> {
    let mut sql = String::from(
      "UPDATE employment_records SET lifecycle = ?2, updated_at = ?3 WHERE record_id = ?1",
    );
    let mut args = vec![encode_uuid(id), encode_lifecycle(to).to_owned(), encode_dt(at)];
    if let Some(from) = from {
      sql.push_str(" AND lifecycle = ?4");
      args.push(encode_lifecycle(from).to_owned());
    }
    sql.push_str(&format!(" RETURNING {JOB_COLUMNS}"));

    self.job_row(sql, args).await
  }

  async fn delete_job(&self, id: Uuid, from: Lifecycle) -> Result<Option<EmploymentRecord>> {
    self
      .job_row(
        format!(
          "DELETE FROM employment_records WHERE record_id = ?1 AND lifecycle = ?2
           RETURNING {JOB_COLUMNS}"
        ),
        vec![encode_uuid(id), encode_lifecycle(from).to_owned()],
      )
      .await
  }
}
