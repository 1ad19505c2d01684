//! # Port Scan Engine
//!
//! * **[`network`]**: The target resolver and the TCP connect probe.
//! * **[`scanner`]**: The bounded worker pool that drives probes over a port set.
//!
//! [`prepare`] validates a [`ScanRequest`] and resolves its target. It is the
//! only place configuration and resolution errors are raised; once it
//! succeeds the scan itself cannot fail.

use std::net::IpAddr;

use portscan_common::config::ScanRequest;
use portscan_common::error::{ConfigError, ScanError};
use portscan_common::network::ports::{self, PortSet, ScanMode};
use tracing::debug;

pub mod network;
pub mod scanner;

use scanner::ScanSettings;

/// A validated scan, ready to hand to a [`scanner::Scanner`].
#[derive(Debug, Clone)]
pub struct PreparedScan {
    /// The target as the user typed it.
    pub target: String,
    pub addr: IpAddr,
    pub mode: ScanMode,
    pub ports: PortSet,
    pub settings: ScanSettings,
}

/// Checks `request` and resolves its target, failing before any probe is sent.
///
/// Order: terms, port set, then name resolution, so cheap local mistakes
/// are reported without touching the network.
pub async fn prepare(request: &ScanRequest) -> Result<PreparedScan, ScanError> {
    if !request.terms_accepted {
        return Err(ConfigError::TermsDeclined.into());
    }

    let ports: PortSet = ports::build_port_set(request.mode, request.ports.as_deref())?;
    let addr: IpAddr = network::resolver::resolve(&request.target).await?;
    debug!("{} resolved to {addr}, {} ports queued", request.target, ports.len());

    Ok(PreparedScan {
        target: request.target.clone(),
        addr,
        mode: request.mode,
        ports,
        settings: ScanSettings::new(request.effective_concurrency(), request.timeout),
    })
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
    use portscan_common::error::ResolutionError;
    use std::net::Ipv4Addr;

    fn request(mode: ScanMode) -> ScanRequest {
        ScanRequest::new("127.0.0.1", mode).accept_terms(true)
    }

    #[tokio::test]
    async fn declined_terms_stop_the_run() {
        let req = ScanRequest::new("127.0.0.1", ScanMode::Fast);
        let err = prepare(&req).await.unwrap_err();
        assert!(matches!(err, ScanError::Config(ConfigError::TermsDeclined)));
    }

    #[tokio::test]
    async fn custom_mode_without_ports_is_a_config_error() {
        let err = prepare(&request(ScanMode::Custom)).await.unwrap_err();
        assert!(matches!(err, ScanError::Config(ConfigError::MissingPortSpec)));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn out_of_range_custom_spec_is_a_config_error() {
        let req = request(ScanMode::Custom).with_ports("70000");
        let err = prepare(&req).await.unwrap_err();
        assert!(matches!(err, ScanError::Config(ConfigError::EmptyPortSet(_))));
    }

    #[tokio::test]
    async fn unresolvable_target_is_a_resolution_error() {
        let req = ScanRequest::new("no-such-host.invalid", ScanMode::Fast).accept_terms(true);
        let err = prepare(&req).await.unwrap_err();
        assert!(matches!(
            err,
            ScanError::Resolution(ResolutionError { ref target, .. }) if target == "no-such-host.invalid"
        ));
    }

    #[tokio::test]
    async fn valid_request_is_prepared() {
        let req = request(ScanMode::Custom)
            .with_ports("443,22")
            .with_concurrency(-3);
        let prepared = prepare(&req).await.unwrap();

        assert_eq!(prepared.addr, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(prepared.ports.as_slice(), &[22, 443]);
        assert_eq!(prepared.settings.concurrency(), 1);
        assert_eq!(prepared.mode, ScanMode::Custom);
    }
}
