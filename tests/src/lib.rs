//! End-to-end scans against the loopback interface.

#[cfg(test)]
mod scan;
