use std::time::Duration;

use crate::error::ConfigError;
use crate::network::ports::ScanMode;

pub const DEFAULT_CONCURRENCY: i64 = 300;
pub const DEFAULT_TIMEOUT_SECS: f64 = 0.6;

/// Display options for the terminal front-end.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Hides the startup banner.
    pub no_banner: bool,
    /// `0` prints everything, `1` drops headers and the banner,
    /// `2` keeps only the open-port lines and the summary line.
    pub quiet: u8,
}

/// Everything needed to prepare a scan, as supplied by the user.
///
/// Nothing here is validated yet; see `portscan_core::prepare`.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub target: String,
    pub mode: ScanMode,
    /// Port specification, only consulted in [`ScanMode::Custom`].
    pub ports: Option<String>,
    /// Requested worker count. Anything below one is clamped to one.
    pub concurrency: i64,
    pub timeout: Duration,
    /// Whether the user accepted the ethical-use terms.
    pub terms_accepted: bool,
}

impl ScanRequest {
    pub fn new(target: impl Into<String>, mode: ScanMode) -> Self {
        Self {
            target: target.into(),
            mode,
            ports: None,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            terms_accepted: false,
        }
    }

    pub fn with_ports(mut self, ports: impl Into<String>) -> Self {
        self.ports = Some(ports.into());
        self
    }

    pub fn with_concurrency(mut self, concurrency: i64) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn accept_terms(mut self, accepted: bool) -> Self {
        self.terms_accepted = accepted;
        self
    }

    /// Worker count with the lower bound applied.
    pub fn effective_concurrency(&self) -> usize {
        usize::try_from(self.concurrency).unwrap_or(0).max(1)
    }
}

/// Converts a user-supplied number of seconds into a probe timeout.
pub fn timeout_from_secs(secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTimeout(secs.to_string()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
