//! The central **abstraction** for port scanning operations.
//!
//! This module defines the [`Prober`] interface that specific probing strategies
//! (such as the [`TcpConnectProber`]) implement, and the [`Scanner`] that drives
//! a prober over a whole [`PortSet`] with a bounded pool of workers.
//!
//! **Architectural Note:**
//! The scanner never looks at *why* a port is closed. Refusals, timeouts and
//! other I/O errors are all folded into a `false` probe result, so a single
//! failing probe can never abort a scan.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use portscan_common::network::ports::PortSet;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::network::tcp::TcpConnectProber;

mod pool;

use pool::{WorkQueue, Worker};

/// Defines the strategy for probing a single transport-layer port.
///
/// Implementations must be safe to call concurrently and must honour
/// `timeout`; the scanner applies no deadline of its own.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Returns `true` if `target` accepted a connection within `timeout`.
    async fn probe(&self, target: SocketAddr, timeout: Duration) -> bool;
}

/// The outcome of probing one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub port: u16,
    pub open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// Every requested port was probed.
    Completed,
    /// The scan was cancelled before every port was probed.
    Interrupted,
}

/// Final report of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub addr: IpAddr,
    /// Open ports in ascending order.
    pub open_ports: Vec<u16>,
    /// Probes that ran to completion.
    pub ports_scanned: usize,
    pub ports_requested: usize,
    pub elapsed: Duration,
    pub status: ScanStatus,
}

impl ScanOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == ScanStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    concurrency: usize,
    pub timeout: Duration,
}

impl ScanSettings {
    /// A `concurrency` of zero is treated as one.
    pub fn new(concurrency: usize, timeout: Duration) -> Self {
        Self {
            concurrency: concurrency.max(1),
            timeout,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}

/// Drives a [`Prober`] over a port set.
pub struct Scanner<P> {
    prober: Arc<P>,
    settings: ScanSettings,
    notifier: Option<UnboundedSender<ProbeResult>>,
    cancel: CancellationToken,
    progress: Arc<AtomicUsize>,
}

impl<P> Scanner<P>
where
    P: Prober + 'static,
{
    pub fn new(prober: P, settings: ScanSettings) -> Self {
        Self::with_shared_prober(Arc::new(prober), settings)
    }

    pub fn with_shared_prober(prober: Arc<P>, settings: ScanSettings) -> Self {
        Self {
            prober,
            settings,
            notifier: None,
            cancel: CancellationToken::new(),
            progress: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Open ports are sent on `tx` as soon as their probe completes.
    /// Closed ports are never sent.
    pub fn with_notifier(mut self, tx: UnboundedSender<ProbeResult>) -> Self {
        self.notifier = Some(tx);
        self
    }

    /// Once `token` is cancelled no new probe is started and probes already
    /// in flight are abandoned. Abandoned probes do not count as scanned.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Number of probes completed so far. Reset at the start of every scan.
    pub fn progress(&self) -> Arc<AtomicUsize> {
        self.progress.clone()
    }

    /// Probes every port of `ports` on `addr` exactly once.
    pub async fn scan(&self, addr: IpAddr, ports: &PortSet) -> ScanOutcome {
        let start_time: Instant = Instant::now();
        self.progress.store(0, Ordering::Relaxed);

        let queue: Arc<WorkQueue> = Arc::new(WorkQueue::new(ports.as_slice()));
        let worker_count: usize = self.settings.concurrency().min(ports.len()).max(1);
        let (results_tx, mut results_rx) = mpsc::unbounded_channel::<ProbeResult>();

        debug!(
            "Dispatching {} ports on {addr} across {worker_count} workers",
            ports.len()
        );

        let mut handles = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            let worker = Worker {
                addr,
                timeout: self.settings.timeout,
                prober: self.prober.clone(),
                queue: queue.clone(),
                results: results_tx.clone(),
                notifier: self.notifier.clone(),
                cancel: self.cancel.clone(),
                progress: self.progress.clone(),
            };
            handles.push(tokio::spawn(worker.run()));
        }
        drop(results_tx);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Scan worker failed: {e}");
            }
        }

        let mut open_ports: Vec<u16> = Vec::new();
        let mut ports_scanned: usize = 0;
        while let Some(result) = results_rx.recv().await {
            ports_scanned += 1;
            if result.open {
                open_ports.push(result.port);
            }
        }
        open_ports.sort_unstable();

        let status = if ports_scanned < ports.len() {
            ScanStatus::Interrupted
        } else {
            ScanStatus::Completed
        };

        ScanOutcome {
            addr,
            open_ports,
            ports_scanned,
            ports_requested: ports.len(),
            elapsed: start_time.elapsed(),
            status,
        }
    }
}

/// Scans `ports` on `addr` with plain TCP connects.
pub async fn scan(
    addr: IpAddr,
    ports: &PortSet,
    concurrency: usize,
    timeout: Duration,
) -> ScanOutcome {
    Scanner::new(TcpConnectProber, ScanSettings::new(concurrency, timeout))
        .scan(addr, ports)
        .await
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
