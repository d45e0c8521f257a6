//! The version history view: given an application's deployment history and the version that is
//! currently live, produce display rows newest first and let the user roll back to an earlier
//! version after confirming.
//!
//! The view owns nothing. It borrows the caller's records for the duration of a render and every
//! render is a pure function of those records and the deployed version.

mod columns;
mod ordering;
mod rollback;

pub use self::columns::*;
pub use self::ordering::*;
pub use self::rollback::*;

use crate::models::VersionRecord;
use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;

pub const TITLE: &str = "Version History";

#[derive(Debug, Clone, Copy)]
pub struct VersionHistoryView<'a> {
    versions: &'a [VersionRecord],
    deployed_version: u64,
}

impl<'a> VersionHistoryView<'a> {
    /// `versions` is expected oldest first, the order deployments happened in.
    pub fn new(versions: &'a [VersionRecord], deployed_version: u64) -> Self {
        Self {
            versions,
            deployed_version,
        }
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// The records in the order they are displayed in.
    pub fn ordered(&self) -> Vec<&'a VersionRecord> {
        order_for_display(self.versions)
    }

    /// Formats every record into a display row, newest first.
    pub fn rows<Tz>(&self, now: DateTime<Utc>, tz: &Tz) -> Vec<VersionRow>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.ordered()
            .into_iter()
            .map(|record| VersionRow::new(record, self.deployed_version, now, tz))
            .collect()
    }

    pub fn find(&self, version: u64) -> Option<&'a VersionRecord> {
        self.versions.iter().find(|record| record.version == version)
    }

    /// Runs the rollback confirmation for `record`, see [`initiate_rollback`].
    pub fn request_rollback<C, F>(
        &self,
        record: &'a VersionRecord,
        confirmer: &mut C,
        on_requested: F,
    ) -> Result<Decision, RollbackError>
    where
        C: Confirm + ?Sized,
        F: FnOnce(&'a VersionRecord),
    {
        initiate_rollback(record, self.deployed_version, confirmer, on_requested)
    }
}
