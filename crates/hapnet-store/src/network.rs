//! SQLite-backed view of the haplotype network
//!
//! Answers the snapshot validator's network queries from the tables created
//! by `001_network_schema`. Borrows a connection, so it can be built over a
//! `Transaction` and see that transaction's state.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use hapnet_core::errors::{ExError, ExErrorKind};
use hapnet_core::model::FactValue;
use hapnet_core::Network;
use rusqlite::{Connection, OptionalExtension};
use std::collections::BTreeSet;

/// Network queries over a borrowed SQLite connection
#[derive(Clone, Copy)]
pub struct SqliteNetwork<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteNetwork<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Number of haplotypes in the network
    pub fn haplotype_count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM haplotypes", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }

    /// Number of edges in the network
    pub fn edge_count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM edges", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }
}

impl Network for SqliteNetwork<'_> {
    fn haplotype_exists(&self, hap_id: &str) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM haplotypes WHERE hap_id = ?1",
                [hap_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;
        Ok(found.is_some())
    }

    fn edge_weight_extrema(&self) -> Result<Option<(f64, f64)>> {
        let (lo, hi): (Option<f64>, Option<f64>) = self
            .conn
            .query_row("SELECT MIN(weight), MAX(weight) FROM edges", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .map_err(from_rusqlite)?;
        Ok(lo.zip(hi))
    }

    fn fact_attribute_names(&self) -> Result<BTreeSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT name FROM fact_attributes")
            .map_err(from_rusqlite)?;
        let names = stmt
            .query_map([], |row| row.get(0))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<BTreeSet<String>, _>>()
            .map_err(from_rusqlite)?;
        Ok(names)
    }

    fn fact_attribute_values(&self, name: &str) -> Result<Vec<FactValue>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT DISTINCT value_json FROM fact_attributes
                 WHERE name = ?1 AND value_json != 'null'
                 ORDER BY value_json",
            )
            .map_err(from_rusqlite)?;
        let raw = stmt
            .query_map([name], |row| row.get::<_, String>(0))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        let mut domain: Vec<FactValue> = Vec::with_capacity(raw.len());
        for json in raw {
            let value: FactValue = serde_json::from_str(&json).map_err(|e| {
                ExError::new(ExErrorKind::Serialization)
                    .with_op("fact_attribute_values")
                    .with_entity_id(name)
                    .with_message(format!("Stored fact value is not JSON: {}", e))
            })?;
            if !domain.contains(&value) {
                domain.push(value);
            }
        }
        Ok(domain)
    }
}
