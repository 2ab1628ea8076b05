//! Schema bootstrap.
//!
//! Creates the current schema with `CREATE TABLE IF NOT EXISTS`. Schema
//! *evolution* (adding columns over time) is out of scope per spec §1/§6
//! ("new columns are added via out-of-band schema migration outside this
//! spec"); this is only the one-shot bootstrap a fresh catalog needs to
//! operate at all.

use catalog_core::errors::StorageError;
use rusqlite::Connection;

use crate::connection::sqe;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS scopes (
    scope   TEXT PRIMARY KEY,
    account TEXT NOT NULL,
    vo      TEXT
);

CREATE TABLE IF NOT EXISTS dids (
    scope           TEXT NOT NULL,
    name            TEXT NOT NULL,
    did_type        TEXT NOT NULL,
    account         TEXT NOT NULL,
    is_open         INTEGER NOT NULL DEFAULT 1,
    monotonic       INTEGER NOT NULL DEFAULT 0,
    expired_at      INTEGER,
    created_at      INTEGER NOT NULL,
    closed_at       INTEGER,
    accessed_at     INTEGER,
    access_cnt      INTEGER NOT NULL DEFAULT 0,
    bytes           INTEGER,
    length          INTEGER,
    events          INTEGER,
    md5             TEXT,
    adler32         TEXT,
    guid            TEXT,
    availability    TEXT,
    is_archive      INTEGER NOT NULL DEFAULT 0,
    constituent     INTEGER NOT NULL DEFAULT 0,
    is_new          INTEGER NOT NULL DEFAULT 0,
    purge_replicas  INTEGER NOT NULL DEFAULT 1,
    hidden          INTEGER NOT NULL DEFAULT 0,
    obsolete        INTEGER NOT NULL DEFAULT 0,
    complete        INTEGER NOT NULL DEFAULT 0,
    suppressed      INTEGER NOT NULL DEFAULT 0,
    extra_json      TEXT NOT NULL DEFAULT '{}',
    PRIMARY KEY (scope, name)
);

CREATE INDEX IF NOT EXISTS idx_dids_expired_at ON dids (expired_at);
CREATE INDEX IF NOT EXISTS idx_dids_is_new ON dids (is_new);

CREATE TABLE IF NOT EXISTS associations (
    parent_scope    TEXT NOT NULL,
    parent_name     TEXT NOT NULL,
    child_scope     TEXT NOT NULL,
    child_name      TEXT NOT NULL,
    did_type        TEXT NOT NULL,
    child_type      TEXT NOT NULL,
    bytes           INTEGER,
    adler32         TEXT,
    md5             TEXT,
    guid            TEXT,
    events          INTEGER,
    rule_evaluation INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (parent_scope, parent_name, child_scope, child_name),
    FOREIGN KEY (parent_scope, parent_name) REFERENCES dids (scope, name),
    FOREIGN KEY (child_scope, child_name) REFERENCES dids (scope, name)
);

CREATE INDEX IF NOT EXISTS idx_assoc_child ON associations (child_scope, child_name);

CREATE TABLE IF NOT EXISTS archive_constituents (
    archive_scope   TEXT NOT NULL,
    archive_name    TEXT NOT NULL,
    file_scope      TEXT NOT NULL,
    file_name       TEXT NOT NULL,
    bytes           INTEGER,
    adler32         TEXT,
    md5             TEXT,
    guid            TEXT,
    PRIMARY KEY (archive_scope, archive_name, file_scope, file_name)
);

CREATE TABLE IF NOT EXISTS association_history (
    parent_scope    TEXT NOT NULL,
    parent_name     TEXT NOT NULL,
    child_scope     TEXT NOT NULL,
    child_name      TEXT NOT NULL,
    did_type        TEXT NOT NULL,
    child_type      TEXT NOT NULL,
    bytes           INTEGER,
    adler32         TEXT,
    md5             TEXT,
    guid            TEXT,
    events          INTEGER,
    did_created_at  INTEGER,
    deleted_at      INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS deleted_dids (
    scope       TEXT NOT NULL,
    name        TEXT NOT NULL,
    did_type    TEXT NOT NULL,
    account     TEXT NOT NULL,
    is_open     INTEGER NOT NULL,
    bytes       INTEGER,
    length      INTEGER,
    events      INTEGER,
    created_at  INTEGER NOT NULL,
    closed_at   INTEGER,
    deleted_at  INTEGER NOT NULL,
    extra_json  TEXT NOT NULL DEFAULT '{}',
    PRIMARY KEY (scope, name)
);

CREATE TABLE IF NOT EXISTS updated_dids (
    scope   TEXT NOT NULL,
    name    TEXT NOT NULL,
    action  TEXT NOT NULL,
    PRIMARY KEY (scope, name, action)
);

CREATE TABLE IF NOT EXISTS follows (
    scope       TEXT NOT NULL,
    name        TEXT NOT NULL,
    account     TEXT NOT NULL,
    did_type    TEXT NOT NULL,
    PRIMARY KEY (scope, name, account)
);

CREATE TABLE IF NOT EXISTS follow_events (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    scope       TEXT NOT NULL,
    name        TEXT NOT NULL,
    account     TEXT NOT NULL,
    did_type    TEXT NOT NULL,
    event_type  TEXT NOT NULL,
    payload     TEXT NOT NULL,
    created_at  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_follow_events_account ON follow_events (account);
"#;

/// Apply the schema, idempotently.
pub fn bootstrap(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(SCHEMA).map_err(sqe)?;
    Ok(())
}
