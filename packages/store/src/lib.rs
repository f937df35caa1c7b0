#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Immutable in-memory supplier farm store.
//!
//! A [`FarmStore`] is built exactly once at startup from a [`FarmSource`]
//! (the seeded [`SyntheticSource`] or a [`JsonFileSource`] fixture) and is
//! then only ever read. Every record is validated on the way in: a source
//! that produces a malformed record, a duplicate id, or the wrong number of
//! records makes construction fail instead of serving partial data.
//!
//! The store is cheap to clone (records live behind an [`Arc`]) so it can be
//! handed to HTTP workers and controllers without locking.

pub mod source;
pub mod synthetic;
mod validate;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use farm_monitor_farm_models::{FarmRecord, Region, SupplierTier};
use thiserror::Error;

pub use source::{FarmSource, JsonFileSource};
pub use synthetic::SyntheticSource;

/// Number of supplier farms in a standard session.
pub const DEFAULT_FARM_COUNT: usize = 270;

/// Errors that can occur while building a [`FarmStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record violates the farm record schema.
    #[error("Malformed farm record at index {index} ({id}): {reason}")]
    MalformedRecord {
        /// Position of the record in the source output.
        index: usize,
        /// The record id, or `"<unknown>"` if it could not be read.
        id: String,
        /// Description of what went wrong.
        reason: String,
    },

    /// Two records share the same id.
    #[error("Duplicate farm id {id} at index {index}")]
    DuplicateId {
        /// Position of the second occurrence.
        index: usize,
        /// The repeated id.
        id: String,
    },

    /// The source produced a different number of records than requested.
    #[error("Expected {expected} farm records, source produced {actual}")]
    UnexpectedCount {
        /// Requested record count.
        expected: usize,
        /// Actual record count.
        actual: usize,
    },

    /// Reading a fixture file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A fixture file is not a JSON array.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read-only collection of validated farm records.
#[derive(Debug, Clone)]
pub struct FarmStore {
    records: Arc<[FarmRecord]>,
    loaded_at: DateTime<Utc>,
}

impl FarmStore {
    /// Validates `records` and wraps them in a store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedRecord`] if any record violates the
    /// schema, or [`StoreError::DuplicateId`] if two records share an id.
    pub fn new(records: Vec<FarmRecord>) -> Result<Self, StoreError> {
        let mut seen = HashSet::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            validate::validate_record(record).map_err(|reason| StoreError::MalformedRecord {
                index,
                id: record.id.clone(),
                reason,
            })?;

            if !seen.insert(record.id.as_str()) {
                return Err(StoreError::DuplicateId {
                    index,
                    id: record.id.clone(),
                });
            }
        }

        Ok(Self {
            records: records.into(),
            loaded_at: Utc::now(),
        })
    }

    /// Loads records from `source` and builds a store from them.
    ///
    /// When `expected_count` is set the source must produce exactly that
    /// many records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the source fails, produces the wrong number
    /// of records, or produces an invalid record.
    pub fn from_source(
        source: &dyn FarmSource,
        expected_count: Option<usize>,
    ) -> Result<Self, StoreError> {
        log::info!("Loading farm records from {}...", source.describe());
        let records = source.load()?;

        if let Some(expected) = expected_count
            && records.len() != expected
        {
            return Err(StoreError::UnexpectedCount {
                expected,
                actual: records.len(),
            });
        }

        let store = Self::new(records)?;
        log::info!("Loaded {} farm records", store.len());
        Ok(store)
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[FarmRecord] {
        &self.records
    }

    /// Number of records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// When the store was built.
    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Looks up a record by its exact id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FarmRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Distinct regions in order of first appearance.
    #[must_use]
    pub fn regions(&self) -> Vec<Region> {
        distinct(self.records.iter().map(|r| r.region))
    }

    /// Distinct supplier tiers in order of first appearance.
    #[must_use]
    pub fn tiers(&self) -> Vec<SupplierTier> {
        distinct(self.records.iter().map(|r| r.supplier_tier))
    }
}

fn distinct<T: PartialEq>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
