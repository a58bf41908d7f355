// SPDX-License-Identifier: MIT

//! The registry and bucket set bundled under one lock, so that a command
//! dispatch and a scheduler tick are never observed interleaved.
//!
//! This uses [`tokio::sync::Mutex`] rather than `parking_lot` (the choice
//! everywhere else in this crate, see [`crate::notifier::Notifier`]):
//! a scheduler tick genuinely holds this lock across the probe-send await,
//! so that no other tick or command dispatch is ever observed mid-tick. An
//! async-aware mutex makes that hold-across-await cheap instead of parking
//! an executor thread.

use pingd_core::Registry;

use crate::bucket::BucketSet;

#[derive(Default)]
pub struct SharedState {
    pub registry: Registry,
    pub buckets: BucketSet,
}
