//! The version store
//!
//! Writes go through one `BEGIN IMMEDIATE` transaction: validate the draft,
//! compare against the latest payload, pick a timestamp and insert. Readers
//! never see a half-written version and two writers cannot interleave.

#![allow(clippy::result_large_err)]

use crate::db::{self, StoreOptions};
use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;
use crate::network::SqliteNetwork;
use crate::versions::bootstrap;
use crate::versions::model::{
    from_micros, to_micros, NewVersion, Version, VersionIdentity, VersionMatcher,
};
use crate::versions::query::{self, VersionInfos, Versions};
use hapnet_core::errors::{ExError, ExErrorKind, VersionError};
use hapnet_core::rules::validation;
use hapnet_core::{codec, log_op_end, log_op_error, log_op_start, Network};
use rusqlite::{Connection, TransactionBehavior};
use std::path::Path;
use std::time::Instant;

/// Append-only store of exploration versions
///
/// Owns its SQLite connection. The haplotype network lives in the same
/// database; [`VersionStore::save`] validates against it, while
/// [`VersionStore::create`] takes any [`Network`].
///
/// # Example
///
/// ```
/// use hapnet_core::PayloadDraft;
/// use hapnet_store::{NewVersion, VersionStore};
///
/// let mut store = VersionStore::open_in_memory().unwrap();
/// assert_eq!(store.count().unwrap(), 1); // the bootstrap version
///
/// let err = store
///     .save(NewVersion::new("v1", PayloadDraft::new()))
///     .unwrap_err();
/// assert_eq!(err.code(), "ERR_NO_CHANGE");
/// ```
pub struct VersionStore {
    conn: Connection,
    options: StoreOptions,
}

impl VersionStore {
    /// Open (or create) a store file with default options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, StoreOptions::default())
    }

    pub fn open_with_options<P: AsRef<Path>>(path: P, options: StoreOptions) -> Result<Self> {
        Self::from_connection(db::open(path)?, options)
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?, StoreOptions::default())
    }

    /// Prepare a connection: settings, migrations, then bootstrap against
    /// the network tables in the same database
    pub fn from_connection(mut conn: Connection, options: StoreOptions) -> Result<Self> {
        db::configure(&conn, &options)?;
        apply_migrations(&mut conn)?;
        bootstrap::ensure_initial_version(&mut conn, None::<&SqliteNetwork<'_>>)?;
        Ok(Self { conn, options })
    }

    /// Like [`VersionStore::from_connection`] but bootstraps against an
    /// external network
    pub fn from_connection_with_network<N: Network + ?Sized>(
        mut conn: Connection,
        options: StoreOptions,
        network: &N,
    ) -> Result<Self> {
        db::configure(&conn, &options)?;
        apply_migrations(&mut conn)?;
        bootstrap::ensure_initial_version(&mut conn, Some(network))?;
        Ok(Self { conn, options })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Mutable access for writers of the network tables (seed import)
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// The network stored alongside the versions
    pub fn network(&self) -> SqliteNetwork<'_> {
        SqliteNetwork::new(&self.conn)
    }

    /// Create a version validated against the stored network
    ///
    /// See [`VersionStore::create`] for the steps and errors.
    pub fn save(&mut self, new: NewVersion) -> Result<VersionIdentity> {
        self.create_in_tx(None::<&SqliteNetwork<'_>>, new)
    }

    /// Create a version validated against `network`
    ///
    /// 1. Reject an empty or whitespace-only tag
    /// 2. Resolve and validate the draft (defaults filled from the network)
    /// 3. Reject a payload equal to the latest stored one
    /// 4. Insert with a `created_at` later than every existing version
    ///
    /// # Errors
    /// - `InvalidInput` for an empty tag or a non-finite position
    /// - any validation kind from `rules::validation::resolve`
    /// - `NoChange` when nothing differs from the latest version
    /// - `DuplicateTag` when the tag is taken
    /// - `Persistence` when SQLite fails
    pub fn create<N: Network + ?Sized>(
        &mut self,
        network: &N,
        new: NewVersion,
    ) -> Result<VersionIdentity> {
        self.create_in_tx(Some(network), new)
    }

    /// `None` validates against the stored network, seen through the
    /// write transaction
    fn create_in_tx<N: Network + ?Sized>(
        &mut self,
        network: Option<&N>,
        new: NewVersion,
    ) -> Result<VersionIdentity> {
        let start = Instant::now();
        log_op_start!(
            "create_version",
            tag = %new.tag,
            topology_len = new.draft.topology.len(),
            environments_len = new.draft.environments.len()
        );

        let result = in_write_tx(&mut self.conn, |tx| write_version(tx, network, new));

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(identity) => log_op_end!(
                "create_version",
                duration_ms = duration_ms,
                version_id = identity.id,
                tag = %identity.tag
            ),
            Err(e) => log_op_error!("create_version", e, duration_ms = duration_ms),
        }
        result
    }

    /// Fetch one version
    ///
    /// Accepts anything convertible into a [`VersionMatcher`]: an id, a
    /// tag, a timestamp, or `None` for the latest version.
    ///
    /// # Errors
    /// - `NotFound` when nothing matches
    /// - `CorruptPayload` when the stored payload cannot be decoded
    pub fn get(&self, matcher: impl Into<VersionMatcher>) -> Result<Version> {
        let matcher = matcher.into();
        let start = Instant::now();
        log_op_start!("get_version", matcher = %matcher);

        let result = query::find_row(&self.conn, &matcher).and_then(|row| match row {
            Some(row) => row.decode(),
            None => Err(VersionError::NotFound {
                matcher: matcher.to_string(),
            }
            .into()),
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(version) => log_op_end!(
                "get_version",
                duration_ms = duration_ms,
                version_id = version.id()
            ),
            Err(e) => log_op_error!("get_version", e, duration_ms = duration_ms),
        }
        result
    }

    /// The most recently created version
    pub fn latest(&self) -> Result<Version> {
        self.get(VersionMatcher::Latest)
    }

    /// Summaries of every version in insertion order, fetched lazily
    pub fn infos(&self) -> VersionInfos<'_> {
        VersionInfos::new(&self.conn, self.options.page_size)
    }

    /// Every version with its payload in insertion order, fetched lazily
    pub fn all(&self) -> Versions<'_> {
        Versions::new(&self.conn, self.options.page_size)
    }

    pub fn count(&self) -> Result<u64> {
        query::count(&self.conn)
    }
}

/// Run `f` inside a `BEGIN IMMEDIATE` transaction, committing on success
pub(crate) fn in_write_tx<T>(
    conn: &mut Connection,
    f: impl FnOnce(&Connection) -> Result<T>,
) -> Result<T> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)?;
    let out = f(&tx)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(out)
}

/// Validate and insert one version; `None` validates against the network
/// tables visible through `conn`
pub(crate) fn write_version<N: Network + ?Sized>(
    conn: &Connection,
    network: Option<&N>,
    new: NewVersion,
) -> Result<VersionIdentity> {
    match network {
        Some(network) => insert_version(conn, network, new),
        None => insert_version(conn, &SqliteNetwork::new(conn), new),
    }
}

fn insert_version<N: Network + ?Sized>(
    conn: &Connection,
    network: &N,
    new: NewVersion,
) -> Result<VersionIdentity> {
    let NewVersion {
        tag,
        comment,
        draft,
    } = new;

    if tag.trim().is_empty() {
        return Err(VersionError::EmptyTag.into());
    }

    let payload = validation::resolve(draft, network)?;
    let blob = codec::encode(&payload)?;

    if let Some((latest_tag, latest_blob)) = query::latest_payload(conn)? {
        let unchanged =
            latest_blob == blob || codec::decode(&latest_blob).is_ok_and(|p| p == payload);
        if unchanged {
            return Err(VersionError::NoChange {
                latest_tag,
            }
            .into());
        }
    }

    let created_at = next_created_at(conn)?;
    let id = query::insert(conn, &tag, created_at, &comment, &blob)?;

    Ok(VersionIdentity {
        id,
        created_at: from_micros(created_at).ok_or_else(|| {
            ExError::new(ExErrorKind::Internal)
                .with_op("create_version")
                .with_message(format!("Timestamp out of range: {}", created_at))
        })?,
        tag,
    })
}

/// Now in microseconds, bumped past the newest stored version so
/// `created_at` is strictly increasing even when the clock is coarse or
/// steps backwards
fn next_created_at(conn: &Connection) -> Result<i64> {
    let now = to_micros(chrono::Utc::now());
    Ok(match query::max_created_at(conn)? {
        Some(latest) if now <= latest => latest + 1,
        _ => now,
    })
}
