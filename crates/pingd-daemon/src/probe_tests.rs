// SPDX-License-Identifier: MIT

use super::*;
use pingd_core::HostId;

fn id(raw: u64) -> HostId {
    HostId::new(raw).unwrap()
}

#[tokio::test]
async fn mock_backend_reports_configured_liveness() {
    let backend = MockProbeBackend::new();
    backend.set_alive(id(1), true);
    backend.set_alive(id(2), false);

    let targets = vec![(id(1), "one".to_string()), (id(2), "two".to_string())];
    let results = backend.probe_batch(&targets, Duration::from_secs(1)).await;

    assert_eq!(results, vec![(id(1), true), (id(2), false)]);
}

#[tokio::test]
async fn mock_backend_defaults_unknown_targets_to_dead() {
    let backend = MockProbeBackend::new();

    let targets = vec![(id(9), "unknown".to_string())];
    let results = backend.probe_batch(&targets, Duration::from_secs(1)).await;

    assert_eq!(results, vec![(id(9), false)]);
}
