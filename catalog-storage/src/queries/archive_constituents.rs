//! `archive_constituents` table queries — files packed inside an archive
//! file (spec §3, §4.3.2).

use catalog_core::errors::StorageError;
use catalog_core::types::{ArchiveConstituent, DidKey};
use rusqlite::{params, Row, Transaction};

use crate::connection::sqe;

fn row_to_constituent(row: &Row<'_>) -> rusqlite::Result<ArchiveConstituent> {
    Ok(ArchiveConstituent {
        archive_scope: row.get("archive_scope")?,
        archive_name: row.get("archive_name")?,
        file_scope: row.get("file_scope")?,
        file_name: row.get("file_name")?,
        bytes: row.get("bytes")?,
        adler32: row.get("adler32")?,
        md5: row.get("md5")?,
        guid: row.get("guid")?,
    })
}

const SELECT_COLUMNS: &str =
    "archive_scope, archive_name, file_scope, file_name, bytes, adler32, md5, guid";

/// Insert one archive-to-file constituent edge.
pub fn insert_constituent(
    tx: &Transaction<'_>,
    c: &ArchiveConstituent,
) -> Result<(), StorageError> {
    tx.execute(
        "INSERT OR IGNORE INTO archive_constituents (\
            archive_scope, archive_name, file_scope, file_name, bytes, adler32, md5, guid) \
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
        params![c.archive_scope, c.archive_name, c.file_scope, c.file_name, c.bytes, c.adler32, c.md5, c.guid],
    )
    .map_err(sqe)?;
    Ok(())
}

/// All files packed in one archive (spec §4.1 `list_content` on an
/// archive FILE).
pub fn list_constituents(
    tx: &Transaction<'_>,
    archive: &DidKey,
) -> Result<Vec<ArchiveConstituent>, StorageError> {
    let sql =
        format!("SELECT {SELECT_COLUMNS} FROM archive_constituents WHERE archive_scope = ?1 AND archive_name = ?2");
    let mut stmt = tx.prepare_cached(&sql).map_err(sqe)?;
    let rows = stmt
        .query_map(params![archive.scope, archive.name], row_to_constituent)
        .map_err(sqe)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(sqe)?);
    }
    Ok(out)
}

/// Remove one constituent edge (spec §4.4, archive-aware detach).
pub fn delete_constituent(
    tx: &Transaction<'_>,
    archive: &DidKey,
    file: &DidKey,
) -> Result<bool, StorageError> {
    let affected = tx
        .execute(
            "DELETE FROM archive_constituents \
             WHERE archive_scope = ?1 AND archive_name = ?2 AND file_scope = ?3 AND file_name = ?4",
            params![archive.scope, archive.name, file.scope, file.name],
        )
        .map_err(sqe)?;
    Ok(affected > 0)
}
