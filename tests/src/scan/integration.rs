#![cfg(test)]
use portscan_common::config::ScanRequest;
use portscan_common::error::{ConfigError, ScanError};
use portscan_common::network::ports::{PortSet, ScanMode};
use portscan_core::network::tcp::TcpConnectProber;
use portscan_core::scanner::{self, ScanSettings, ScanStatus, Scanner};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Binds a listener on an ephemeral loopback port.
async fn listening_port() -> (TcpListener, u16) {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// A loopback port that was just released and is therefore closed.
async fn closed_port() -> u16 {
    let (listener, port) = listening_port().await;
    drop(listener);
    port
}

#[tokio::test]
async fn scan_single_listening_port_among_closed_ones() {
    let (_listener, open) = listening_port().await;
    let closed_a = closed_port().await;
    let closed_b = closed_port().await;

    let request = ScanRequest::new("127.0.0.1", ScanMode::Custom)
        .with_ports(format!("{closed_a},{open},{closed_b}"))
        .with_concurrency(8)
        .with_timeout(PROBE_TIMEOUT)
        .accept_terms(true);
    let prepared = portscan_core::prepare(&request).await.unwrap();

    let outcome = scanner::scan(
        prepared.addr,
        &prepared.ports,
        prepared.settings.concurrency(),
        prepared.settings.timeout,
    )
    .await;

    assert_eq!(outcome.open_ports, vec![open]);
    assert_eq!(outcome.ports_scanned, prepared.ports.len());
    assert_eq!(outcome.status, ScanStatus::Completed);
}

#[tokio::test]
async fn scan_range_around_listening_port() {
    let (_listener, open) = listening_port().await;
    let spec = format!("{}-{}", open - 1, open.saturating_add(1));

    let request = ScanRequest::new("localhost", ScanMode::Custom)
        .with_ports(spec)
        .with_timeout(PROBE_TIMEOUT)
        .accept_terms(true);
    let prepared = portscan_core::prepare(&request).await.unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let outcome = Scanner::new(TcpConnectProber, prepared.settings)
        .with_notifier(tx)
        .scan(prepared.addr, &prepared.ports)
        .await;

    assert!(outcome.open_ports.contains(&open));
    assert!(outcome.open_ports.iter().all(|port| prepared.ports.contains(*port)));

    let mut notified = Vec::new();
    while let Ok(result) = rx.try_recv() {
        notified.push(result.port);
    }
    notified.sort_unstable();
    assert_eq!(notified, outcome.open_ports);
}

#[tokio::test]
async fn repeated_scans_are_idempotent() {
    let (_first, port_a) = listening_port().await;
    let (_second, port_b) = listening_port().await;
    let closed = closed_port().await;
    let ports = PortSet::from_ports([port_a, port_b, closed]).unwrap();

    let first = scanner::scan(LOCALHOST, &ports, 4, PROBE_TIMEOUT).await;
    let second = scanner::scan(LOCALHOST, &ports, 0, PROBE_TIMEOUT).await;

    let mut expected = vec![port_a, port_b];
    expected.sort_unstable();
    assert_eq!(first.open_ports, expected);
    assert_eq!(second.open_ports, expected);
}

#[tokio::test]
async fn out_of_range_custom_spec_is_rejected_before_scanning() {
    let request = ScanRequest::new("127.0.0.1", ScanMode::Custom)
        .with_ports("70000")
        .accept_terms(true);

    let err = portscan_core::prepare(&request).await.unwrap_err();

    assert!(matches!(err, ScanError::Config(ConfigError::EmptyPortSet(_))));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn cancelled_scan_is_marked_interrupted() {
    let (_listener, open) = listening_port().await;
    let ports = PortSet::from_ports([open]).unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let outcome = Scanner::new(TcpConnectProber, ScanSettings::new(1, PROBE_TIMEOUT))
        .with_cancellation(token)
        .scan(LOCALHOST, &ports)
        .await;

    assert_eq!(outcome.status, ScanStatus::Interrupted);
    assert_eq!(outcome.ports_scanned, 0);
    assert!(outcome.open_ports.is_empty());
}
