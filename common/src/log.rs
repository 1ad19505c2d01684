//! Logging macros shared across the workspace.
//!
//! Events emitted with [`success!`](crate::success) use a dedicated target so
//! the terminal formatter can render them differently from plain `info` events.

/// Target used by [`success!`](crate::success) events.
pub const SUCCESS_TARGET: &str = "portscan::success";

/// Target used for raw reporter lines that must be printed verbatim.
pub const PRINT_TARGET: &str = "portscan::print";

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        ::tracing::info!(target: $crate::log::SUCCESS_TARGET, $($arg)*)
    };
}
