// SPDX-License-Identifier: MIT

//! Three independent periodic tickers, one per probe bucket, decorrelated
//! by using prime-number periods so they never beat against each other.
//!
//! Each bucket gets its own `tokio::time::interval` loop in a spawned task,
//! calling [`tick_bucket`] and broadcasting any resulting NOPING
//! notifications.

use std::sync::Arc;
use std::time::Duration;

use pingd_core::BucketClass;
use pingd_wire::Response;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::bucket::tick_bucket;
use crate::env::{self, ACTIVE_TICK, UNTESTED_TICK};
use crate::notifier::Notifier;
use crate::probe::ProbeBackend;
use crate::state::SharedState;

/// Spawn the three bucket tickers as background tasks. Returns immediately;
/// the tasks run for the lifetime of the process.
pub fn spawn(
    state: Arc<Mutex<SharedState>>,
    backend: Arc<dyn ProbeBackend>,
    notifier: Arc<Notifier>,
    defunct_tick_override: Option<u64>,
) {
    let timeout = env::probe_timeout();

    spawn_ticker(
        BucketClass::Untested,
        UNTESTED_TICK,
        Arc::clone(&state),
        Arc::clone(&backend),
        Arc::clone(&notifier),
        timeout,
    );
    spawn_ticker(
        BucketClass::Active,
        ACTIVE_TICK,
        Arc::clone(&state),
        Arc::clone(&backend),
        Arc::clone(&notifier),
        timeout,
    );
    spawn_ticker(
        BucketClass::Defunct,
        env::defunct_tick(defunct_tick_override),
        state,
        backend,
        notifier,
        timeout,
    );
}

fn spawn_ticker(
    class: BucketClass,
    period: Duration,
    state: Arc<Mutex<SharedState>>,
    backend: Arc<dyn ProbeBackend>,
    notifier: Arc<Notifier>,
    timeout: Duration,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // First tick fires immediately; consume it so the first probe
        // round happens one full period in, not at task-spawn time.
        interval.tick().await;
        loop {
            interval.tick().await;
            run_one_tick(class, &state, backend.as_ref(), &notifier, timeout).await;
        }
    });
}

/// Run exactly one tick of `class`'s bucket and broadcast any notifications
/// it produced. Exposed at `pub(crate)` so integration tests (in
/// `listener_tests.rs`) can drive a bucket tick deterministically instead of
/// waiting on a real timer.
pub(crate) async fn run_one_tick(
    class: BucketClass,
    state: &Mutex<SharedState>,
    backend: &dyn ProbeBackend,
    notifier: &Notifier,
    timeout: Duration,
) {
    let to_notify = {
        let mut guard = state.lock().await;
        let SharedState { registry, buckets } = &mut *guard;
        tick_bucket(class, registry, buckets, backend, timeout).await
        // `guard` is dropped here, before broadcasting — notifying
        // controllers is not part of the mutual-exclusion contract over
        // the registry and buckets.
    };

    if !to_notify.is_empty() {
        debug!(bucket = ?class, notified = to_notify.len(), "tick produced failure notifications");
    }
    for (id, name) in to_notify {
        info!(host_id = id.get(), %name, "host escalated to flagged; broadcasting NOPING");
        notifier.broadcast(&Response::Noping { id, name });
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
