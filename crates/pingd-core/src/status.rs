// SPDX-License-Identifier: MIT

//! Host status and the bucket classification derived from it.

/// Which of the three probe buckets a host currently belongs to.
///
/// A host's bucket is never stored directly — it is always derived from
/// [`Status::bucket`], which is the only place this mapping is allowed to
/// live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketClass {
    Untested,
    Active,
    Defunct,
}

impl BucketClass {
    /// All three bucket classes, in probe order (used by rebuild/tick loops).
    pub const ALL: [BucketClass; 3] =
        [BucketClass::Untested, BucketClass::Active, BucketClass::Defunct];
}

/// A host's lifecycle status.
///
/// Declaration order matches the ordinal values used by the original
/// C++ implementation's `ServerData::Status` enum (`UNTESTED=0` through
/// `INACTIVE_FLAGGED=7`). The protocol never serializes these ordinals, so
/// the order has no wire-visible effect, but it is kept for fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Untested,
    Defunct,
    Active,
    Inactive1,
    Inactive2,
    Inactive3,
    /// Reachable only if a prior deployment persisted it; no transition in
    /// this implementation ever produces it. Retained for forward
    /// compatibility with records written by an earlier escalation policy.
    Inactive4,
    InactiveFlagged,
}

impl Status {
    /// The bucket this status maps into. This is the sole definition of
    /// the status→bucket mapping.
    pub fn bucket(self) -> BucketClass {
        match self {
            Status::Untested => BucketClass::Untested,
            Status::Defunct => BucketClass::Defunct,
            Status::Active
            | Status::Inactive1
            | Status::Inactive2
            | Status::Inactive3
            | Status::Inactive4
            | Status::InactiveFlagged => BucketClass::Active,
        }
    }

    /// Whether further failures of a host in this status produce a new
    /// notification. Once flagged, escalation stays silent until the host
    /// recovers and a fresh escalation chain begins.
    pub fn escalation_silenced(self) -> bool {
        matches!(self, Status::InactiveFlagged)
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
