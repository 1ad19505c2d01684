use std::io;

use thiserror::Error;

/// Invalid user-supplied configuration. Always fatal and always raised before
/// any probing starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid scan mode '{0}' (expected one of: fast, full, custom)")]
    InvalidMode(String),

    #[error("custom mode requires a port specification, e.g. --ports 22,80,443,8000-8100")]
    MissingPortSpec,

    #[error("malformed port token '{0}'")]
    MalformedToken(String),

    #[error("no valid ports in specification '{0}'")]
    EmptyPortSet(String),

    #[error("port set contains no ports in 1-65535")]
    NoPorts,

    #[error("invalid timeout '{0}' (expected a non-negative number of seconds)")]
    InvalidTimeout(String),

    #[error("terms of use were not accepted")]
    TermsDeclined,
}

/// The target could not be turned into a connectable address.
#[derive(Debug, Error)]
#[error("could not resolve target '{target}'")]
pub struct ResolutionError {
    pub target: String,
    #[source]
    pub source: Option<io::Error>,
}

impl ResolutionError {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: None,
        }
    }

    pub fn with_source(target: impl Into<String>, source: io::Error) -> Self {
        Self {
            target: target.into(),
            source: Some(source),
        }
    }
}

/// Every error that aborts a run before the engine starts.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl ScanError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            ScanError::Config(_) | ScanError::Resolution(_) => 2,
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
