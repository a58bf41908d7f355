// SPDX-License-Identifier: MIT

//! Broadcasts NOPING notifications to every connected controller.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use pingd_wire::Response;
use tokio::sync::mpsc;
use tracing::debug;

/// A connection's outbound mailbox. Bounded and non-blocking: a slow or
/// gone controller never backs up the tick that's trying to notify it.
const OUTBOX_CAPACITY: usize = 8;

#[derive(Debug, Default)]
pub struct Notifier {
    next_id: AtomicU64,
    controllers: Mutex<HashMap<u64, mpsc::Sender<String>>>,
}

/// Handle returned to a connection task so it can receive broadcasts and
/// unregister itself on teardown.
pub struct Subscription {
    pub id: u64,
    pub receiver: mpsc::Receiver<String>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(OUTBOX_CAPACITY);
        self.controllers.lock().insert(id, tx);
        Subscription { id, receiver: rx }
    }

    pub fn unsubscribe(&self, id: u64) {
        self.controllers.lock().remove(&id);
    }

    /// Best-effort broadcast: a full or closed mailbox silently drops the
    /// message for that controller. No retry, no backlog.
    pub fn broadcast(&self, response: &Response) {
        let line = response.to_line();
        let controllers = self.controllers.lock();
        for (id, sender) in controllers.iter() {
            if sender.try_send(line.clone()).is_err() {
                debug!(controller_id = id, "dropped notification for slow or gone controller");
            }
        }
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
