// SPDX-License-Identifier: MIT

use super::*;
use crate::probe::MockProbeBackend;
use pingd_core::{AddOutcome, HostId, Status};

fn id(raw: u64) -> HostId {
    HostId::new(raw).unwrap()
}

#[tokio::test]
async fn run_one_tick_classifies_an_untested_host() {
    let state = Mutex::new(SharedState::default());
    {
        let mut guard = state.lock().await;
        let SharedState { registry, buckets } = &mut *guard;
        assert_eq!(registry.add(id(1), "host.example".to_string(), buckets), AddOutcome::Ok);
    }

    let backend = MockProbeBackend::new();
    backend.set_alive(id(1), true);
    let notifier = Notifier::new();

    run_one_tick(BucketClass::Untested, &state, &backend, &notifier, Duration::from_secs(1)).await;

    let guard = state.lock().await;
    assert_eq!(guard.registry.get(id(1)).unwrap().status, Status::Active);
}

#[tokio::test]
async fn escalation_tick_broadcasts_exactly_one_noping() {
    let state = Mutex::new(SharedState::default());
    {
        let mut guard = state.lock().await;
        let SharedState { registry, buckets } = &mut *guard;
        registry.add(id(7), "flaky.example".to_string(), buckets);
    }

    let backend = MockProbeBackend::new();
    let notifier = Notifier::new();
    let subscription = notifier.subscribe();
    let mut notifications = subscription.receiver;

    backend.set_alive(id(7), true);
    run_one_tick(BucketClass::Untested, &state, &backend, &notifier, Duration::from_secs(1)).await;

    backend.set_alive(id(7), false);
    for _ in 0..3 {
        run_one_tick(BucketClass::Active, &state, &backend, &notifier, Duration::from_secs(1)).await;
        assert!(notifications.try_recv().is_err());
    }
    run_one_tick(BucketClass::Active, &state, &backend, &notifier, Duration::from_secs(1)).await;

    let message = notifications.try_recv().expect("flagged transition should notify");
    assert_eq!(message, "NOPING 7 flaky.example\n");
    assert!(notifications.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn spawned_tickers_fire_after_their_period_elapses() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    {
        let mut guard = state.lock().await;
        let SharedState { registry, buckets } = &mut *guard;
        registry.add(id(1), "host.example".to_string(), buckets);
    }

    let mock = MockProbeBackend::new();
    mock.set_alive(id(1), true);
    let backend: Arc<dyn ProbeBackend> = Arc::new(mock);
    let notifier = Arc::new(Notifier::new());

    spawn(Arc::clone(&state), backend, Arc::clone(&notifier), None);

    tokio::time::advance(UNTESTED_TICK + Duration::from_millis(10)).await;
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    let guard = state.lock().await;
    assert_eq!(guard.registry.get(id(1)).unwrap().status, Status::Active);
}
