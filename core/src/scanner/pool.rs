//! Worker pool internals for [`Scanner`](super::Scanner).
//!
//! Workers share nothing but a [`WorkQueue`]: a read-only port list and an
//! atomic cursor. Results travel back over a channel and are merged by the
//! scanner once every worker has returned.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{ProbeResult, Prober};

pub(super) struct WorkQueue {
    ports: Arc<[u16]>,
    cursor: AtomicUsize,
}

impl WorkQueue {
    pub(super) fn new(ports: &[u16]) -> Self {
        Self {
            ports: Arc::from(ports),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Hands out each port exactly once, across all workers.
    pub(super) fn claim(&self) -> Option<u16> {
        let idx: usize = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.ports.get(idx).copied()
    }
}

pub(super) struct Worker<P> {
    pub(super) addr: IpAddr,
    pub(super) timeout: Duration,
    pub(super) prober: Arc<P>,
    pub(super) queue: Arc<WorkQueue>,
    pub(super) results: UnboundedSender<ProbeResult>,
    pub(super) notifier: Option<UnboundedSender<ProbeResult>>,
    pub(super) cancel: CancellationToken,
    pub(super) progress: Arc<AtomicUsize>,
}

impl<P> Worker<P>
where
    P: Prober + 'static,
{
    pub(super) async fn run(self) {
        loop {
            if self.cancel.is_cancelled() {
                debug!("Worker stopping, scan cancelled");
                break;
            }

            let Some(port) = self.queue.claim() else {
                break;
            };

            let target: SocketAddr = SocketAddr::new(self.addr, port);
            // Dropping an abandoned probe closes its socket.
            let open: bool = tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!("Worker abandoning probe of port {port}, scan cancelled");
                    break;
                }
                open = self.prober.probe(target, self.timeout) => open,
            };
            let result = ProbeResult { port, open };

            self.progress.fetch_add(1, Ordering::Relaxed);

            if open && let Some(notifier) = &self.notifier {
                // The listener may have gone away; the scan goes on regardless.
                let _ = notifier.send(result);
            }

            if self.results.send(result).is_err() {
                break;
            }
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn queue_hands_out_ports_in_order_then_runs_dry() {
        let queue = WorkQueue::new(&[22, 80, 443]);
        assert_eq!(queue.claim(), Some(22));
        assert_eq!(queue.claim(), Some(80));
        assert_eq!(queue.claim(), Some(443));
        assert_eq!(queue.claim(), None);
        assert_eq!(queue.claim(), None);
    }

    #[test]
    fn concurrent_claims_never_repeat_a_port() {
        let ports: Vec<u16> = (1..=10_000).collect();
        let queue = Arc::new(WorkQueue::new(&ports));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || {
                    let mut claimed = Vec::new();
                    while let Some(port) = queue.claim() {
                        claimed.push(port);
                    }
                    claimed
                })
            })
            .collect();

        let mut seen: HashSet<u16> = HashSet::new();
        let mut total: usize = 0;
        for handle in handles {
            for port in handle.join().unwrap() {
                total += 1;
                seen.insert(port);
            }
        }

        assert_eq!(total, ports.len());
        assert_eq!(seen.len(), ports.len());
    }
}
