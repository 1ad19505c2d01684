use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

use crate::scanner::Prober;

/// Probes ports with a full TCP handshake.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnectProber;

#[async_trait]
impl Prober for TcpConnectProber {
    async fn probe(&self, target: SocketAddr, probe_timeout: Duration) -> bool {
        handshake_probe(target.ip(), target.port(), probe_timeout).await
    }
}

/// Attempts one TCP connect to `addr:port`.
///
/// Returns `true` only if the handshake completes before `probe_timeout`.
/// Refusals, timeouts and every other error collapse into `false`.
/// The stream is dropped before returning, whatever the outcome.
pub async fn handshake_probe(addr: IpAddr, port: u16, probe_timeout: Duration) -> bool {
    let socket_addr: SocketAddr = SocketAddr::new(addr, port);

    match timeout(probe_timeout, TcpStream::connect(socket_addr)).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(e)) => {
            trace!("{socket_addr} closed: {e}");
            false
        }
        Err(_elapsed) => {
            trace!("{socket_addr} timed out");
            false
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
    use std::net::Ipv4Addr;
    use tokio::net::TcpListener;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[tokio::test]
    async fn handshake_probe_should_find_listening_port() {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(handshake_probe(LOCALHOST, port, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn handshake_probe_should_report_closed_port() {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        assert!(!handshake_probe(LOCALHOST, port, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn prober_trait_delegates_to_handshake() {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let target = listener.local_addr().unwrap();

        assert!(TcpConnectProber.probe(target, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    #[ignore]
    async fn handshake_probe_should_timeout_on_unreachable_ip() {
        let ip: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 1));
        assert!(!handshake_probe(ip, 443, Duration::from_millis(100)).await);
    }
}
