// SPDX-License-Identifier: MIT

//! pingd-core: host-lifecycle state machine and registry for the
//! host-liveness monitoring daemon.
//!
//! This crate has no I/O and no async runtime dependency. It models the
//! parts of the system that don't need to talk to a socket or an ICMP
//! library: the host registry, the three-bucket classification, and the
//! pure state-machine transition rule.

pub mod host;
pub mod registry;
pub mod state_machine;
pub mod status;

pub use host::{HostId, HostRecord};
pub use registry::{AddOutcome, BucketAdopter, MarkDefunctOutcome, Registry, RemoveOutcome};
pub use state_machine::{transition, Transition};
pub use status::{BucketClass, Status};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
