// SPDX-License-Identifier: MIT

//! ICMP probing backend.
//!
//! The daemon never keeps a persistent probe-set handle per bucket; instead
//! a bucket hands its whole current membership to [`ProbeBackend::probe_batch`]
//! on every tick and gets back one alive/dead result per host. This folds the
//! underlying library's construct/add-host/send/iterate/destroy sequence into
//! a single batched async call, which is the natural shape for a library
//! whose primitives are all backed by async I/O rather than blocking syscalls.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use pingd_core::HostId;
use surge_ping::{Client, Config, PingIdentifier, PingSequence};
use tracing::debug;

/// Abstraction over the ICMP send/receive mechanics, so the scheduler and
/// buckets never depend on a concrete ping library directly.
#[async_trait]
pub trait ProbeBackend: Send + Sync {
    /// Probe every `(id, name)` target concurrently and report whether each
    /// responded within `timeout`. Targets that fail to resolve are reported
    /// as unreachable rather than causing the whole batch to fail.
    async fn probe_batch(&self, targets: &[(HostId, String)], timeout: Duration) -> Vec<(HostId, bool)>;
}

/// Real backend built on `surge-ping`.
pub struct SurgePingBackend {
    client_v4: Client,
    client_v6: Client,
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to open ICMP client: {0}")]
    ClientInit(#[source] std::io::Error),
}

impl SurgePingBackend {
    pub fn new() -> Result<Self, ProbeError> {
        let client_v4 =
            Client::new(&Config::default()).map_err(ProbeError::ClientInit)?;
        let client_v6 =
            Client::new(&Config::builder().kind(surge_ping::ICMP::V6).build())
                .map_err(ProbeError::ClientInit)?;
        Ok(Self { client_v4, client_v6 })
    }

    async fn resolve(name: &str) -> Option<IpAddr> {
        if let Ok(ip) = name.parse::<IpAddr>() {
            return Some(ip);
        }
        let lookup = tokio::net::lookup_host((name, 0)).await.ok()?;
        lookup.into_iter().map(|addr| addr.ip()).next()
    }

    async fn ping_one(&self, id: HostId, name: String, timeout: Duration) -> (HostId, bool) {
        let Some(ip) = Self::resolve(&name).await else {
            debug!(host_id = id.get(), %name, "dns resolution failed");
            return (id, false);
        };

        let client = if ip.is_ipv6() { &self.client_v6 } else { &self.client_v4 };
        let mut pinger = client.pinger(ip, PingIdentifier(id.get() as u16)).await;
        let payload = [0u8; 56];

        let alive = tokio::time::timeout(timeout, pinger.ping(PingSequence(0), &payload))
            .await
            .map(|r| r.is_ok())
            .unwrap_or(false);

        (id, alive)
    }
}

#[async_trait]
impl ProbeBackend for SurgePingBackend {
    async fn probe_batch(&self, targets: &[(HostId, String)], timeout: Duration) -> Vec<(HostId, bool)> {
        let futures = targets
            .iter()
            .cloned()
            .map(|(id, name)| self.ping_one(id, name, timeout));
        futures_util::future::join_all(futures).await
    }
}

/// Deterministic backend for tests: every target's liveness is looked up in
/// a fixed table, defaulting to unreachable for anything not listed.
#[derive(Debug, Default)]
pub struct MockProbeBackend {
    alive: parking_lot::Mutex<std::collections::HashMap<HostId, bool>>,
}

impl MockProbeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_alive(&self, id: HostId, alive: bool) {
        self.alive.lock().insert(id, alive);
    }
}

#[async_trait]
impl ProbeBackend for MockProbeBackend {
    async fn probe_batch(&self, targets: &[(HostId, String)], _timeout: Duration) -> Vec<(HostId, bool)> {
        let table = self.alive.lock();
        targets
            .iter()
            .map(|(id, _)| (*id, table.get(id).copied().unwrap_or(false)))
            .collect()
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
