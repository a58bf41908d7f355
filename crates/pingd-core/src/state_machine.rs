// SPDX-License-Identifier: MIT

//! Pure state-machine transition rule.
//!
//! `transition` is a pure function from `(current_status, bucket, alive)` to
//! `(new_status, side effects)`. It performs no mutation and no I/O; callers
//! (the Scheduler, in `pingd-daemon`) are responsible for writing the new
//! status back into the registry and acting on the returned side-effect
//! flags (move-to-bucket is implied whenever `new_status.bucket()` differs
//! from the input `bucket`; `notify` tells the Notifier to broadcast).

use crate::status::{BucketClass, Status};

/// Result of applying one probe outcome to a host's current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub new_status: Status,
    /// Emit a single NOPING notification for this transition.
    pub notify: bool,
    /// This transition corrected a host found in the wrong bucket (a host
    /// whose status doesn't map to the bucket it was just probed in). Logged
    /// as a warning by the caller; whether this ever legitimately happens in
    /// practice or only guards against a bookkeeping bug elsewhere is unclear,
    /// so it's treated as a recoverable anomaly rather than a panic.
    pub anomaly: bool,
}

impl Transition {
    fn plain(new_status: Status) -> Self {
        Self { new_status, notify: false, anomaly: false }
    }

    fn notify(new_status: Status) -> Self {
        Self { new_status, notify: true, anomaly: false }
    }

    fn anomaly(new_status: Status) -> Self {
        Self { new_status, notify: false, anomaly: true }
    }
}

/// Apply one probe result to a host currently in `bucket` with `current`
/// status.
pub fn transition(current: Status, bucket: BucketClass, alive: bool) -> Transition {
    match bucket {
        BucketClass::Untested => {
            if alive {
                Transition::plain(Status::Active)
            } else {
                Transition::plain(Status::Defunct)
            }
        }

        BucketClass::Active => {
            if alive {
                match current {
                    Status::Active
                    | Status::Inactive1
                    | Status::Inactive2
                    | Status::Inactive3
                    | Status::Inactive4
                    | Status::InactiveFlagged => Transition::plain(Status::Active),
                    // Anomaly: a host with wrong-bucket status was probed
                    // alongside the ACTIVE bucket.
                    Status::Untested | Status::Defunct => Transition::anomaly(Status::Defunct),
                }
            } else {
                match current {
                    Status::Active => Transition::plain(Status::Inactive1),
                    Status::Inactive1 => Transition::plain(Status::Inactive2),
                    Status::Inactive2 => Transition::plain(Status::Inactive3),
                    Status::Inactive3 => Transition::notify(Status::InactiveFlagged),
                    Status::Inactive4 => Transition::notify(Status::InactiveFlagged),
                    Status::Untested | Status::Defunct => Transition::anomaly(Status::Defunct),
                    // Only InactiveFlagged reaches here; further failures
                    // stay silent per `Status::escalation_silenced`.
                    silenced => {
                        debug_assert!(silenced.escalation_silenced());
                        Transition::plain(silenced)
                    }
                }
            }
        }

        BucketClass::Defunct => {
            if alive {
                Transition::plain(Status::Active)
            } else {
                Transition::plain(Status::Defunct)
            }
        }
    }
}

#[cfg(test)]
#[path = "state_machine_tests.rs"]
mod tests;
