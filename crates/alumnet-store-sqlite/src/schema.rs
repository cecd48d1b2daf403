//! SQL schema for the alumnet SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Names compare with BINARY collation, so 'admin' and 'Admin' are distinct.
CREATE TABLE IF NOT EXISTS roles (
    role_id TEXT PRIMARY KEY,
    name    TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS accounts (
    account_id    TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,   -- trimmed, lower-cased
    password_hash TEXT NOT NULL,          -- argon2 PHC string
    role_id       TEXT NOT NULL REFERENCES roles(role_id),
    alumni_id     TEXT,
    created_at    TEXT NOT NULL
);

-- alumni_id is free text on purpose: imported rows may carry references that
-- do not parse, and readers decide what to do with them.
CREATE TABLE IF NOT EXISTS employment_records (
    record_id    TEXT PRIMARY KEY,
    alumni_id    TEXT NOT NULL,
    company      TEXT NOT NULL,
    title        TEXT NOT NULL,
    industry     TEXT NOT NULL DEFAULT '',
    location     TEXT NOT NULL,
    salary_range TEXT NOT NULL DEFAULT '',
    start_date   TEXT NOT NULL,           -- YYYY-MM-DD
    end_date     TEXT,                    -- YYYY-MM-DD or NULL
    status       TEXT NOT NULL,
    description  TEXT NOT NULL DEFAULT '',
    lifecycle    TEXT NOT NULL DEFAULT 'active'
                 CHECK (lifecycle IN ('active', 'trashed')),
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    CHECK (end_date IS NULL OR end_date >= start_date)
);

CREATE INDEX IF NOT EXISTS records_lifecycle_idx ON employment_records(lifecycle);

PRAGMA user_version = 1;
";
