// SPDX-License-Identifier: MIT

//! Test helpers shared by this crate's own tests and by downstream crates
//! (enabled via the `test-support` feature).

use crate::host::HostRecord;
use crate::registry::BucketAdopter;
use crate::status::BucketClass;

/// A [`BucketAdopter`] that always succeeds and records every call it
/// received, for asserting on dirty-bucket and adopt side effects in unit
/// tests without standing up a real probe backend.
#[derive(Debug, Default)]
pub struct RecordingAdopter {
    pub adopted: Vec<(BucketClass, HostRecord)>,
    pub dirtied: Vec<BucketClass>,
    pub fail_adopt: bool,
}

impl RecordingAdopter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an adopter whose `adopt` calls always report failure, for
    /// exercising the `ProbeAddFailure` paths.
    pub fn failing() -> Self {
        Self { fail_adopt: true, ..Self::default() }
    }
}

impl BucketAdopter for RecordingAdopter {
    fn adopt(&mut self, bucket: BucketClass, host: &HostRecord) -> bool {
        self.adopted.push((bucket, host.clone()));
        !self.fail_adopt
    }

    fn mark_dirty(&mut self, bucket: BucketClass) {
        self.dirtied.push(bucket);
    }
}
