//! Integration tests for `SqliteStore` against an in-memory database.

use alumnet_core::{
  account::Account,
  employment::{EmploymentRecord, JobPatch, Lifecycle, OwnerRef},
  store::{AlumnetStore, StoreError as _},
};
use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn record(owner: OwnerRef) -> EmploymentRecord {
  let now = Utc::now();
  EmploymentRecord {
    id:           Uuid::new_v4(),
    alumni_id:    owner,
    company:      "Acme".into(),
    title:        "Engineer".into(),
    industry:     "Software".into(),
    location:     "Surabaya".into(),
    salary_range: "10-15M".into(),
    start_date:   NaiveDate::from_ymd_opt(2022, 3, 1).unwrap(),
    end_date:     None,
    status:       "employed".into(),
    description:  String::new(),
    lifecycle:    Lifecycle::Active,
    created_at:   now,
    updated_at:   now,
  }
}

// ─── Roles & accounts ────────────────────────────────────────────────────────

#[tokio::test]
async fn roles_are_case_sensitive() {
  let s = store().await;
  let legacy = s.add_role("Admin").await.unwrap();

  assert!(s.find_role_by_name("admin").await.unwrap().is_none());
  assert_eq!(s.find_role_by_name("Admin").await.unwrap(), Some(legacy.clone()));
  assert_eq!(s.get_role(legacy.id).await.unwrap(), Some(legacy));
}

#[tokio::test]
async fn account_lookups() {
  let s = store().await;
  let role = s.add_role("alumni").await.unwrap();
  let account = Account {
    id:            Uuid::new_v4(),
    username:      "budi_s".into(),
    email:         "budi@example.com".into(),
    password_hash: "$argon2id$stub".into(),
    role_id:       role.id,
    alumni_id:     Some(Uuid::new_v4()),
    created_at:    Utc::now(),
  };
  s.insert_account(account.clone()).await.unwrap();

  let by_id = s.get_account(account.id).await.unwrap().unwrap();
  assert_eq!(by_id.email, account.email);
  assert_eq!(by_id.password_hash, account.password_hash);
  assert_eq!(by_id.alumni_id, account.alumni_id);

  assert!(s.find_account_by_email("budi@example.com").await.unwrap().is_some());
  assert!(s.find_account_by_username("budi_s").await.unwrap().is_some());
  assert!(s.find_account_by_email("BUDI@example.com").await.unwrap().is_none());

  let dup = Account { id: Uuid::new_v4(), username: "other".into(), ..account };
  let err = s.insert_account(dup).await.unwrap_err();
  assert!(err.is_constraint_violation(), "{err}");
}

// ─── Employment records ──────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_round_trips() {
  let s = store().await;
  let job = record(OwnerRef::from(Uuid::new_v4()));
  s.insert_job(job.clone()).await.unwrap();

  let fetched = s.get_job(job.id).await.unwrap().unwrap();
  assert_eq!(fetched.alumni_id, job.alumni_id);
  assert_eq!(fetched.start_date, job.start_date);
  assert_eq!(fetched.lifecycle, Lifecycle::Active);
  assert!(s.get_job(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn inverted_dates_are_a_constraint_violation() {
  let s = store().await;
  let job = EmploymentRecord {
    end_date: Some(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()),
    ..record(OwnerRef::from(Uuid::new_v4()))
  };
  let err = s.insert_job(job.clone()).await.unwrap_err();
  assert!(err.is_constraint_violation(), "{err}");
  assert!(s.get_job(job.id).await.unwrap().is_none());
}

#[tokio::test]
async fn malformed_owner_is_stored_verbatim() {
  let s = store().await;
  let job = record(OwnerRef::from_raw("legacy-42"));
  s.insert_job(job.clone()).await.unwrap();

  let listed = s.list_jobs(Lifecycle::Active).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].alumni_id.as_str(), "legacy-42");
  assert!(!listed[0].alumni_id.is_well_formed());
}

#[tokio::test]
async fn list_filters_by_lifecycle() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let mine = record(OwnerRef::from(owner));
  let theirs = record(OwnerRef::from(Uuid::new_v4()));
  let trashed = EmploymentRecord { lifecycle: Lifecycle::Trashed, ..record(OwnerRef::from(owner)) };
  for job in [&mine, &theirs, &trashed] {
    s.insert_job(job.clone()).await.unwrap();
  }

  let active = s.list_jobs(Lifecycle::Active).await.unwrap();
  let mut active_ids: Vec<_> = active.iter().map(|j| j.id).collect();
  active_ids.sort();
  let mut expected = vec![mine.id, theirs.id];
  expected.sort();
  assert_eq!(active_ids, expected);
  let bin = s.list_jobs(Lifecycle::Trashed).await.unwrap();
  assert_eq!(bin.iter().map(|j| j.id).collect::<Vec<_>>(), vec![trashed.id]);
}

#[tokio::test]
async fn update_touches_only_present_fields() {
  let s = store().await;
  let job = record(OwnerRef::from(Uuid::new_v4()));
  s.insert_job(job.clone()).await.unwrap();

  let at = job.updated_at + Duration::seconds(5);
  let patch = JobPatch {
    title: Some("Lead Engineer".into()),
    end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
    ..JobPatch::default()
  };
  let updated = s.update_job(job.id, patch, at).await.unwrap().unwrap();

  assert_eq!(updated.title, "Lead Engineer");
  assert_eq!(updated.end_date, NaiveDate::from_ymd_opt(2024, 1, 31));
  assert_eq!(updated.company, job.company);
  assert_eq!(updated.alumni_id, job.alumni_id);
  assert_eq!(updated.created_at, job.created_at);
  assert_eq!(updated.updated_at, at);
}

#[tokio::test]
async fn update_skips_trashed_records() {
  let s = store().await;
  let job = EmploymentRecord { lifecycle: Lifecycle::Trashed, ..record(OwnerRef::from(Uuid::new_v4())) };
  s.insert_job(job.clone()).await.unwrap();

  let patch = JobPatch { title: Some("x".into()), ..JobPatch::default() };
  assert!(s.update_job(job.id, patch, Utc::now()).await.unwrap().is_none());
  assert_eq!(s.get_job(job.id).await.unwrap().unwrap().title, job.title);
}

#[tokio::test]
async fn set_lifecycle_respects_precondition() {
  let s = store().await;
  let job = record(OwnerRef::from(Uuid::new_v4()));
  s.insert_job(job.clone()).await.unwrap();

  // Restoring an active record matches nothing.
  let none = s
    .set_lifecycle(job.id, Lifecycle::Active, Some(Lifecycle::Trashed), Utc::now())
    .await
    .unwrap();
  assert!(none.is_none());

  let trashed = s
    .set_lifecycle(job.id, Lifecycle::Trashed, None, Utc::now())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(trashed.lifecycle, Lifecycle::Trashed);

  let restored = s
    .set_lifecycle(job.id, Lifecycle::Active, Some(Lifecycle::Trashed), Utc::now())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(restored.lifecycle, Lifecycle::Active);
  assert_eq!(restored.company, job.company);
}

#[tokio::test]
async fn delete_requires_matching_state() {
  let s = store().await;
  let job = record(OwnerRef::from(Uuid::new_v4()));
  s.insert_job(job.clone()).await.unwrap();

  assert!(s.delete_job(job.id, Lifecycle::Trashed).await.unwrap().is_none());
  assert!(s.get_job(job.id).await.unwrap().is_some());

  s.set_lifecycle(job.id, Lifecycle::Trashed, None, Utc::now()).await.unwrap();
  let removed = s.delete_job(job.id, Lifecycle::Trashed).await.unwrap().unwrap();
  assert_eq!(removed.id, job.id);
  assert_eq!(removed.lifecycle, Lifecycle::Trashed);
  assert!(s.get_job(job.id).await.unwrap().is_none());
  assert!(s.delete_job(job.id, Lifecycle::Trashed).await.unwrap().is_none());
}

#[tokio::test]
async fn reopening_a_file_keeps_data() {
  let dir = std::env::temp_dir().join(format!("alumnet-{}", Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("alumnet.db");

  let job = record(OwnerRef::from(Uuid::new_v4()));
  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert_job(job.clone()).await.unwrap();
  }
  let s = SqliteStore::open(&path).await.unwrap();
  assert!(s.get_job(job.id).await.unwrap().is_some());

  let _ = std::fs::remove_dir_all(&dir);
}
