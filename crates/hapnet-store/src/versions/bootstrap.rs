//! First-open initialization of an empty store

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::versions::model::NewVersion;
use crate::versions::query;
use crate::versions::store::{in_write_tx, write_version};
use hapnet_core::model::PayloadDraft;
use hapnet_core::Network;
use rusqlite::Connection;

/// Tag of the version created in an empty store
pub const INITIAL_TAG: &str = "init";

/// Comment of the version created in an empty store
pub const INITIAL_COMMENT: &str = "-* AUTO CREATED *-";

/// Create the initial version if the store has none
///
/// The initial payload has an empty topology, the network's full weight
/// range, no environments and an empty query. The emptiness check and the
/// insert share one write transaction, so of several concurrent openers
/// exactly one creates it.
///
/// Returns whether a version was created.
pub(crate) fn ensure_initial_version<N: Network + ?Sized>(
    conn: &mut Connection,
    network: Option<&N>,
) -> Result<bool> {
    if query::count(conn)? > 0 {
        return Ok(false);
    }

    let created = in_write_tx(conn, |tx| {
        if query::count(tx)? > 0 {
            return Ok(None);
        }
        let initial =
            NewVersion::new(INITIAL_TAG, PayloadDraft::new()).with_comment(INITIAL_COMMENT);
        write_version(tx, network, initial).map(Some)
    })?;

    if let Some(identity) = &created {
        tracing::info!(
            version_id = identity.id,
            tag = %identity.tag,
            "Created initial version"
        );
    }
    Ok(created.is_some())
}
