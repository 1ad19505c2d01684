//! Turns the user-supplied target into a single connectable address.

use std::net::{IpAddr, SocketAddr};

use portscan_common::error::ResolutionError;
use tokio::net::lookup_host;
use tracing::debug;

/// Resolves `target` to one address.
///
/// IP literals are returned as-is. Hostnames go through the system resolver;
/// the first IPv4 answer wins, otherwise the first answer of any family.
pub async fn resolve(target: &str) -> Result<IpAddr, ResolutionError> {
    let host: &str = target.trim();
    if host.is_empty() {
        return Err(ResolutionError::new(target));
    }

    if let Ok(addr) = host.parse::<IpAddr>() {
        return Ok(addr);
    }

    let answers: Vec<SocketAddr> = lookup_host((host, 0))
        .await
        .map_err(|e| ResolutionError::with_source(target, e))?
        .collect();
    debug!("{host} resolved to {} address(es)", answers.len());

    preferred_address(answers).ok_or_else(|| ResolutionError::new(target))
}

fn preferred_address<I>(answers: I) -> Option<IpAddr>
where
    I: IntoIterator<Item = SocketAddr>,
{
    let mut first: Option<IpAddr> = None;
    for answer in answers {
        let ip = answer.ip();
        if ip.is_ipv4() {
            return Some(ip);
        }
        first.get_or_insert(ip);
    }
    first
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
