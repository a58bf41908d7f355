// SPDX-License-Identifier: MIT

//! Host Registry: the authoritative id → host-record map.
//!
//! The registry never talks to the probe library itself. Instead, every
//! operation that needs to move a host between buckets takes a
//! [`BucketAdopter`] — the daemon's real implementation wraps the three
//! live `ProbeBucket`s; tests can pass a trivial recording adopter. This
//! keeps the registry's add/remove/mark-defunct/transition logic (and its
//! property tests) free of async and I/O.

use std::collections::HashMap;
use std::collections::hash_map::Values;

use crate::host::{HostId, HostRecord};
use crate::state_machine::Transition;
use crate::status::BucketClass;

/// Collaborator that owns the live probe-set handles. The registry calls
/// into this whenever a host needs to join a bucket's probe-set or when a
/// bucket's membership has gone stale and needs reconciling at its next
/// tick.
pub trait BucketAdopter {
    /// Attempt to add `host` to `bucket`'s probe-set immediately. Returns
    /// `true` on success. On failure the bucket is still marked dirty by
    /// the caller so membership is reconciled at the next rebuild.
    fn adopt(&mut self, bucket: BucketClass, host: &HostRecord) -> bool;

    /// Mark `bucket` dirty: its probe-set no longer matches registry
    /// membership and must be rebuilt at the next tick.
    fn mark_dirty(&mut self, bucket: BucketClass);
}

/// Outcome of [`Registry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Ok,
    DuplicateId,
    DuplicateRequest,
    ProbeAddFailure,
}

/// Outcome of [`Registry::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Ok,
    NoSuchServer,
}

/// Outcome of [`Registry::mark_defunct`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkDefunctOutcome {
    Ok,
    NoSuchServer,
    AlreadyDefunct,
    ProbeAddFailure,
}

/// The authoritative host-id → host-record map.
#[derive(Debug, Default)]
pub struct Registry {
    hosts: HashMap<HostId, HostRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self { hosts: HashMap::new() }
    }

    pub fn get(&self, id: HostId) -> Option<&HostRecord> {
        self.hosts.get(&id)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// All hosts currently classified into `bucket`, per [`Status::bucket`].
    ///
    /// Used by a bucket's rebuild step to repopulate its membership from
    /// scratch whenever it has been marked dirty.
    pub fn hosts_in(&self, bucket: BucketClass) -> impl Iterator<Item = &HostRecord> {
        self.hosts.values().filter(move |h| h.status.bucket() == bucket)
    }

    pub fn iter(&self) -> Values<'_, HostId, HostRecord> {
        self.hosts.values()
    }

    /// Add a new host, starting it off with status UNTESTED.
    pub fn add<A: BucketAdopter>(&mut self, id: HostId, name: String, adopter: &mut A) -> AddOutcome {
        if let Some(existing) = self.hosts.get(&id) {
            return if existing.name == name {
                AddOutcome::DuplicateRequest
            } else {
                AddOutcome::DuplicateId
            };
        }

        let record = HostRecord::new(id, name);
        if adopter.adopt(BucketClass::Untested, &record) {
            self.hosts.insert(id, record);
            AddOutcome::Ok
        } else {
            // Nothing was inserted, so there is nothing to revert beyond
            // reporting the failure to the caller.
            AddOutcome::ProbeAddFailure
        }
    }

    /// Remove a host. The bucket it belonged to is marked dirty so the
    /// stale probe-set entry is reaped at that bucket's next rebuild;
    /// there is no immediate handle invalidation.
    pub fn remove<A: BucketAdopter>(&mut self, id: HostId, adopter: &mut A) -> RemoveOutcome {
        match self.hosts.remove(&id) {
            Some(host) => {
                adopter.mark_dirty(host.status.bucket());
                RemoveOutcome::Ok
            }
            None => RemoveOutcome::NoSuchServer,
        }
    }

    /// Mark a host DEFUNCT by controller request.
    pub fn mark_defunct<A: BucketAdopter>(
        &mut self,
        id: HostId,
        adopter: &mut A,
    ) -> MarkDefunctOutcome {
        let Some(host) = self.hosts.get_mut(&id) else {
            return MarkDefunctOutcome::NoSuchServer;
        };

        if host.status.bucket() == BucketClass::Defunct {
            return MarkDefunctOutcome::AlreadyDefunct;
        }

        let source_bucket = host.status.bucket();
        host.status = crate::status::Status::Defunct;
        let host_snapshot = host.clone();

        let adopted = adopter.adopt(BucketClass::Defunct, &host_snapshot);
        adopter.mark_dirty(source_bucket);

        if adopted {
            MarkDefunctOutcome::Ok
        } else {
            MarkDefunctOutcome::ProbeAddFailure
        }
    }

    /// Apply a state-machine [`Transition`] produced by probing `id` while it
    /// was a member of `probed_bucket`. Writes the new status into the
    /// record and, if the transition moves the host to a different bucket,
    /// requests that bucket adopt it and marks `probed_bucket` dirty so the
    /// stale entry is reaped at its next rebuild.
    ///
    /// Returns `false` if the host no longer exists (e.g. removed between
    /// send and iterate within the same tick — never observed in practice
    /// because the event loop serializes mutation, but handled defensively).
    pub fn apply_transition<A: BucketAdopter>(
        &mut self,
        id: HostId,
        probed_bucket: BucketClass,
        result: Transition,
        adopter: &mut A,
    ) -> bool {
        let Some(host) = self.hosts.get_mut(&id) else {
            return false;
        };

        if result.anomaly {
            tracing::warn!(
                host_id = host.id.get(),
                host_name = %host.name,
                ?probed_bucket,
                "host with mismatched status found in probe bucket; reclassifying to defunct"
            );
        }

        host.status = result.new_status;
        let new_bucket = result.new_status.bucket();
        if new_bucket != probed_bucket {
            let host_snapshot = host.clone();
            adopter.adopt(new_bucket, &host_snapshot);
            adopter.mark_dirty(probed_bucket);
        }

        true
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
