use std::net::IpAddr;
use std::time::Duration;

use colored::*;
use portscan_common::network::services;

use crate::terminal::colors;

const NO_SERVICE: &str = "-";

/// Live line printed as soon as a port is found open.
pub fn open_port_line(port: u16) -> String {
    let service: &str = services::service_name(port).unwrap_or(NO_SERVICE);
    format!(
        "{} {} {} {}",
        "[OPEN]".color(colors::OPEN_PORT).bold(),
        format!("{port:<5}").color(colors::ACCENT),
        "service:".color(colors::SEPARATOR),
        service.color(colors::SERVICE)
    )
}

pub fn port_list(ports: &[u16]) -> String {
    ports
        .iter()
        .map(u16::to_string)
        .collect::<Vec<String>>()
        .join(", ")
}

pub fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}

pub fn ip_addr(addr: &IpAddr) -> ColoredString {
    match addr {
        IpAddr::V4(ipv4_addr) => ipv4_addr.to_string().color(colors::IPV4_ADDR),
        IpAddr::V6(ipv6_addr) => ipv6_addr.to_string().color(colors::IPV6_ADDR),
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
