pub mod scan;

use clap::{ArgAction, Parser};
use portscan_common::config::{self, Config, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS, ScanRequest};
use portscan_common::error::ConfigError;
use portscan_common::network::ports::ScanMode;

#[derive(Parser, Debug)]
#[command(name = "portscan", version)]
#[command(about = "An educational TCP port scanner. Only scan hosts you are allowed to scan.")]
pub struct CommandLine {
    /// IP address or hostname of the target
    #[arg(short = 't', long)]
    pub target: String,

    /// Scan mode: fast (common ports), full (1-65535) or custom
    #[arg(short = 'm', long, default_value = "fast")]
    pub mode: String,

    /// Port specification for custom mode, e.g. 22,80,443,8000-8100
    #[arg(short = 'p', long)]
    pub ports: Option<String>,

    /// Number of concurrent connection attempts
    #[arg(short = 'T', long, default_value_t = DEFAULT_CONCURRENCY, allow_negative_numbers = true)]
    pub threads: i64,

    /// Timeout in seconds for each connection attempt
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, allow_negative_numbers = true)]
    pub timeout: f64,

    /// Accept the ethical-use terms without an interactive prompt
    #[arg(long)]
    pub accept_terms: bool,

    /// Do not print the banner
    #[arg(long)]
    pub no_banner: bool,

    /// Reduce output; repeat for less (-qq)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            no_banner: self.no_banner,
            quiet: self.quiet,
        }
    }

    /// Builds the scan request. Terms acceptance reflects `--accept-terms` only.
    pub fn to_request(&self) -> Result<ScanRequest, ConfigError> {
        let mode: ScanMode = self.mode.parse()?;
        let mut request = ScanRequest::new(self.target.clone(), mode)
            .with_concurrency(self.threads)
            .with_timeout(config::timeout_from_secs(self.timeout)?)
            .accept_terms(self.accept_terms);

        if let Some(ports) = &self.ports {
            request = request.with_ports(ports.clone());
        }
        Ok(request)
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
