//! Row access for the versions table
//!
//! Lookups, the latest-payload read used for change detection, and the
//! keyset-paged iterators behind history listing. Iterators hold no
//! statement between pages, so a caller may interleave other reads.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, from_version_insert, Result};
use crate::versions::model::{from_micros, to_micros, Version, VersionInfo, VersionMatcher};
use hapnet_core::codec;
use hapnet_core::errors::{ExError, VersionError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::VecDeque;

/// A versions row with its payload still encoded
#[derive(Debug, Clone)]
pub(crate) struct VersionRow {
    pub info: VersionInfo,
    pub comment: String,
    pub payload_json: String,
}

impl VersionRow {
    /// Decode the stored payload
    ///
    /// # Errors
    /// - `CorruptPayload` naming the version id when the blob is unreadable
    pub fn decode(self) -> Result<Version> {
        let payload = codec::decode(&self.payload_json).map_err(|e| -> ExError {
            VersionError::CorruptPayload {
                version: self.info.id.to_string(),
                reason: e.message().to_string(),
            }
            .into()
        })?;
        Ok(Version::new(self.info, self.comment, payload))
    }
}

const ROW_COLUMNS: &str = "id, tag, created_at, comment, payload_json";

fn created_at_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    let micros: i64 = row.get(idx)?;
    from_micros(micros).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, micros))
}

fn map_info(row: &Row<'_>) -> rusqlite::Result<VersionInfo> {
    Ok(VersionInfo {
        id: row.get(0)?,
        tag: row.get(1)?,
        created_at: created_at_column(row, 2)?,
    })
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<VersionRow> {
    Ok(VersionRow {
        info: map_info(row)?,
        comment: row.get(3)?,
        payload_json: row.get(4)?,
    })
}

/// Fetch the row a matcher selects, if any
pub(crate) fn find_row(conn: &Connection, matcher: &VersionMatcher) -> Result<Option<VersionRow>> {
    let result = match matcher {
        VersionMatcher::Latest => conn.query_row(
            &format!(
                "SELECT {} FROM versions ORDER BY created_at DESC, id DESC LIMIT 1",
                ROW_COLUMNS
            ),
            [],
            map_row,
        ),
        VersionMatcher::Id(id) => conn.query_row(
            &format!("SELECT {} FROM versions WHERE id = ?1", ROW_COLUMNS),
            [id],
            map_row,
        ),
        VersionMatcher::Tag(tag) => conn.query_row(
            &format!("SELECT {} FROM versions WHERE tag = ?1", ROW_COLUMNS),
            [tag],
            map_row,
        ),
        VersionMatcher::CreatedAt(at) => conn.query_row(
            &format!(
                "SELECT {} FROM versions WHERE created_at = ?1 ORDER BY id LIMIT 1",
                ROW_COLUMNS
            ),
            [to_micros(*at)],
            map_row,
        ),
    };
    result.optional().map_err(from_rusqlite)
}

/// Tag and encoded payload of the latest version
pub(crate) fn latest_payload(conn: &Connection) -> Result<Option<(String, String)>> {
    conn.query_row(
        "SELECT tag, payload_json FROM versions ORDER BY created_at DESC, id DESC LIMIT 1",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
    .map_err(from_rusqlite)
}

pub(crate) fn count(conn: &Connection) -> Result<u64> {
    conn.query_row("SELECT COUNT(*) FROM versions", [], |row| row.get(0))
        .map_err(from_rusqlite)
}

pub(crate) fn max_created_at(conn: &Connection) -> Result<Option<i64>> {
    conn.query_row("SELECT MAX(created_at) FROM versions", [], |row| row.get(0))
        .map_err(from_rusqlite)
}

/// Insert a version row and return its id
///
/// # Errors
/// - `DuplicateTag` when the unique index on `tag` rejects the row
pub(crate) fn insert(
    conn: &Connection,
    tag: &str,
    created_at_micros: i64,
    comment: &str,
    payload_json: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO versions (tag, created_at, comment, payload_json) VALUES (?1, ?2, ?3, ?4)",
        params![tag, created_at_micros, comment, payload_json],
    )
    .map_err(|e| from_version_insert(e, tag))?;
    Ok(conn.last_insert_rowid())
}

fn info_page(conn: &Connection, after_id: i64, limit: usize) -> Result<Vec<VersionInfo>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, tag, created_at FROM versions WHERE id > ?1 ORDER BY id LIMIT ?2",
        )
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(params![after_id, limit as i64], map_info)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

fn row_page(conn: &Connection, after_id: i64, limit: usize) -> Result<Vec<VersionRow>> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {} FROM versions WHERE id > ?1 ORDER BY id LIMIT ?2",
            ROW_COLUMNS
        ))
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(params![after_id, limit as i64], map_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

/// Keyset pagination over `versions.id`
struct Pager<'c, T> {
    conn: &'c Connection,
    page_size: usize,
    after_id: i64,
    buffer: VecDeque<T>,
    exhausted: bool,
    fetch: fn(&Connection, i64, usize) -> Result<Vec<T>>,
    key: fn(&T) -> i64,
}

impl<'c, T> Pager<'c, T> {
    fn new(
        conn: &'c Connection,
        page_size: usize,
        fetch: fn(&Connection, i64, usize) -> Result<Vec<T>>,
        key: fn(&T) -> i64,
    ) -> Self {
        Self {
            conn,
            page_size: page_size.max(1),
            after_id: 0,
            buffer: VecDeque::new(),
            exhausted: false,
            fetch,
            key,
        }
    }

    fn next_item(&mut self) -> Option<Result<T>> {
        if self.buffer.is_empty() && !self.exhausted {
            match (self.fetch)(self.conn, self.after_id, self.page_size) {
                Ok(page) => {
                    self.exhausted = page.len() < self.page_size;
                    if let Some(last) = page.last() {
                        self.after_id = (self.key)(last);
                    }
                    self.buffer.extend(page);
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}

/// Lazy iterator over version summaries in insertion order
pub struct VersionInfos<'c> {
    pager: Pager<'c, VersionInfo>,
}

impl<'c> VersionInfos<'c> {
    pub(crate) fn new(conn: &'c Connection, page_size: usize) -> Self {
        Self {
            pager: Pager::new(conn, page_size, info_page, |info: &VersionInfo| info.id),
        }
    }
}

impl Iterator for VersionInfos<'_> {
    type Item = Result<VersionInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pager.next_item()
    }
}

/// Lazy iterator over full versions in insertion order
///
/// A version whose payload fails to decode yields `CorruptPayload` and
/// iteration continues with the next row.
pub struct Versions<'c> {
    pager: Pager<'c, VersionRow>,
}

impl<'c> Versions<'c> {
    pub(crate) fn new(conn: &'c Connection, page_size: usize) -> Self {
        Self {
            pager: Pager::new(conn, page_size, row_page, |row: &VersionRow| row.info.id),
        }
    }
}

impl Iterator for Versions<'_> {
    type Item = Result<Version>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pager.next_item().map(|row| row.and_then(VersionRow::decode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;
    use hapnet_core::ExErrorKind;

    fn setup(rows: i64) -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        let blob = codec::encode(&Default::default()).unwrap();
        for i in 1..=rows {
            insert(&conn, &format!("v{}", i), i * 1_000, "", &blob).unwrap();
        }
        conn
    }

    #[test]
    fn test_pages_cover_every_row_once() {
        let conn = setup(7);
        let ids: Vec<i64> = VersionInfos::new(&conn, 3)
            .map(|info| info.unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_exact_page_multiple() {
        let conn = setup(4);
        assert_eq!(VersionInfos::new(&conn, 2).count(), 4);
    }

    #[test]
    fn test_empty_table() {
        let conn = setup(0);
        assert_eq!(VersionInfos::new(&conn, 5).count(), 0);
        assert!(latest_payload(&conn).unwrap().is_none());
        assert_eq!(max_created_at(&conn).unwrap(), None);
    }

    #[test]
    fn test_corrupt_row_does_not_stop_iteration() {
        let conn = setup(1);
        conn.execute(
            "INSERT INTO versions (tag, created_at, comment, payload_json) VALUES ('bad', 5000, '', '{')",
            [],
        )
        .unwrap();
        insert(&conn, "v3", 9_000, "", &codec::encode(&Default::default()).unwrap()).unwrap();

        let results: Vec<_> = Versions::new(&conn, 2).collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1].as_ref().unwrap_err().kind(),
            ExErrorKind::CorruptPayload
        );
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_latest_breaks_ties_by_id() {
        let conn = setup(0);
        let blob = codec::encode(&Default::default()).unwrap();
        insert(&conn, "a", 100, "", &blob).unwrap();
        insert(&conn, "b", 100, "", &blob).unwrap();

        let row = find_row(&conn, &VersionMatcher::Latest).unwrap().unwrap();
        assert_eq!(row.info.tag, "b");
    }
}
