// SPDX-License-Identifier: MIT

//! Probe buckets: the three batches (UNTESTED, ACTIVE, DEFUNCT) a host moves
//! between over its lifetime, each probed together in one round.

use std::time::Duration;

use pingd_core::{transition, BucketAdopter, HostId, HostRecord, Registry};
use pingd_core::BucketClass;
use tracing::warn;

use crate::probe::ProbeBackend;

/// One bucket's membership and dirty flag. The "handle" from the original
/// design — an owned probe-set object from the ICMP library — has no
/// persistent Rust equivalent here: a plain `Vec` of current members stands
/// in for it, constructed fresh on every dirty rebuild and dropped (`None`)
/// when membership is empty.
#[derive(Debug)]
pub struct ProbeBucket {
    class: BucketClass,
    handle: Option<Vec<(HostId, String)>>,
    dirty: bool,
}

impl ProbeBucket {
    pub fn new(class: BucketClass) -> Self {
        Self { class, handle: None, dirty: false }
    }

    pub fn class(&self) -> BucketClass {
        self.class
    }

    fn adopt(&mut self, host: &HostRecord) -> bool {
        let entry = (host.id, host.name.clone());
        match &mut self.handle {
            Some(members) => {
                if members.iter().any(|(id, _)| *id == host.id) {
                    return false;
                }
                members.push(entry);
                true
            }
            None => {
                self.handle = Some(vec![entry]);
                true
            }
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn contains(&self, id: HostId) -> bool {
        match &self.handle {
            Some(members) => members.iter().any(|(member, _)| *member == id),
            None => false,
        }
    }

    fn rebuild_from(&mut self, registry: &Registry) {
        let members: Vec<(HostId, String)> =
            registry.hosts_in(self.class).map(|h| (h.id, h.name.clone())).collect();
        self.handle = if members.is_empty() { None } else { Some(members) };
        self.dirty = false;
    }
}

/// Owns all three buckets and implements [`BucketAdopter`] by dispatching to
/// whichever bucket the registry names.
#[derive(Debug)]
pub struct BucketSet {
    pub untested: ProbeBucket,
    pub active: ProbeBucket,
    pub defunct: ProbeBucket,
}

impl Default for BucketSet {
    fn default() -> Self {
        Self {
            untested: ProbeBucket::new(BucketClass::Untested),
            active: ProbeBucket::new(BucketClass::Active),
            defunct: ProbeBucket::new(BucketClass::Defunct),
        }
    }
}

impl BucketSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket_mut(&mut self, class: BucketClass) -> &mut ProbeBucket {
        match class {
            BucketClass::Untested => &mut self.untested,
            BucketClass::Active => &mut self.active,
            BucketClass::Defunct => &mut self.defunct,
        }
    }

    /// `true` if any bucket's handle still references `id`. Used by tests to
    /// confirm a removed host leaves no residual bucket entry.
    pub(crate) fn contains(&self, id: HostId) -> bool {
        self.untested.contains(id) || self.active.contains(id) || self.defunct.contains(id)
    }
}

impl BucketAdopter for BucketSet {
    fn adopt(&mut self, bucket: BucketClass, host: &HostRecord) -> bool {
        self.bucket_mut(bucket).adopt(host)
    }

    fn mark_dirty(&mut self, bucket: BucketClass) {
        self.bucket_mut(bucket).mark_dirty();
    }
}

/// Run one tick of `class`'s bucket: rebuild if dirty, send the batch,
/// apply the state-machine transition to every result, then apply the
/// bucket's own post-tick contract.
pub async fn tick_bucket(
    class: BucketClass,
    registry: &mut Registry,
    buckets: &mut BucketSet,
    backend: &dyn ProbeBackend,
    timeout: Duration,
) -> Vec<(HostId, String)> {
    {
        let bucket = buckets.bucket_mut(class);
        if bucket.dirty {
            bucket.rebuild_from(registry);
        }
    }

    let members = match &buckets.bucket_mut(class).handle {
        Some(members) => members.clone(),
        None => return Vec::new(),
    };

    let results = backend.probe_batch(&members, timeout).await;
    let mut to_notify = Vec::new();

    for (id, alive) in &results {
        let Some(host) = registry.get(*id) else { continue };
        let result = transition(host.status, class, *alive);
        if result.anomaly {
            warn!(host_id = id.get(), bucket = ?class, "reclassifying host with mismatched status");
        }
        if result.notify {
            to_notify.push((*id, host.name.clone()));
        }
        registry.apply_transition(*id, class, result, buckets);
    }

    match class {
        BucketClass::Untested => {
            // Every result above triggered a transition out of UNTESTED, so
            // the handle is already stale; drop it unconditionally rather
            // than waiting for the next dirty rebuild.
            buckets.bucket_mut(class).handle = None;
        }
        BucketClass::Defunct => {
            // Copy-forward: build the next handle directly from hosts that
            // stayed unreachable, instead of re-scanning the whole registry.
            let still_defunct: Vec<(HostId, String)> = results
                .iter()
                .zip(members.iter())
                .filter(|((_, alive), _)| !alive)
                .map(|(_, (id, name))| (*id, name.clone()))
                .collect();
            let bucket = buckets.bucket_mut(class);
            bucket.handle = if still_defunct.is_empty() { None } else { Some(still_defunct) };
            bucket.dirty = false;
        }
        BucketClass::Active => {}
    }

    to_notify
}

#[cfg(test)]
#[path = "bucket_tests.rs"]
mod tests;
