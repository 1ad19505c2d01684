//! # Port Set Model
//!
//! Defines which TCP ports a scan will probe.
//!
//! A [`PortSet`] is built from one of three [`ScanMode`]s:
//! * **fast**: a curated list of well-known service ports.
//! * **full**: every port from 1 to 65535.
//! * **custom**: a user specification such as `22,80,443,8000-8100`.
//!
//! Custom specifications are tokenized into [`PortToken`]s first and expanded
//! afterwards. Out-of-range values are dropped per token, but a specification
//! that yields no ports at all is rejected.

use std::collections::BTreeSet;
use std::fmt;
use std::num::IntErrorKind;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::ConfigError;

pub const MIN_PORT: u16 = 1;
pub const MAX_PORT: u16 = u16::MAX;

/// Well-known service ports probed in [`ScanMode::Fast`]. Order and
/// duplicates do not matter, the set is normalized on construction.
pub const COMMON_PORTS: &[u16] = &[
    20, 21, 22, 23, 25, 53, 67, 68, 69, 80, 110, 123, 137, 138, 139, 143, 161, 162, 389, 443, 445,
    465, 514, 587, 631, 636, 873, 993, 995, 1080, 1433, 1521, 2049, 2181, 2375, 2376, 27017, 3000,
    3128, 3306, 3389, 4444, 5000, 5432, 5672, 5900, 5984, 6379, 6443, 7001, 7002, 8000, 8001, 8008,
    8080, 8081, 8088, 8443, 8888, 9200, 9300, 11211, 27017,
];

/// Strategy used to build the port set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    #[default]
    Fast,
    Full,
    Custom,
}

impl FromStr for ScanMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(ScanMode::Fast),
            "full" => Ok(ScanMode::Full),
            "custom" => Ok(ScanMode::Custom),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanMode::Fast => "fast",
            ScanMode::Full => "full",
            ScanMode::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// One comma-separated element of a custom port specification.
///
/// Values are kept wider than `u16` so out-of-range numbers can be dropped
/// during expansion instead of failing the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortToken {
    Single(u64),
    /// Always normalized so that `lo <= hi`.
    Range(u64, u64),
}

impl PortToken {
    /// Ports of this token that fall inside `1..=65535`.
    pub fn ports(&self) -> RangeInclusive<u16> {
        let (lo, hi) = match *self {
            PortToken::Single(port) => (port, port),
            PortToken::Range(lo, hi) => (lo, hi),
        };
        let lo = lo.max(MIN_PORT as u64);
        let hi = hi.min(MAX_PORT as u64);

        if lo > hi {
            // Empty range.
            return MAX_PORT..=MIN_PORT;
        }
        (lo as u16)..=(hi as u16)
    }
}

impl FromStr for PortToken {
    type Err = ConfigError;

    /// Parses `"80"` or `"8000-8100"`. Reversed ranges are swapped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();

        if let Some((start_str, end_str)) = token.split_once('-') {
            let start = parse_number(start_str, token)?;
            let end = parse_number(end_str, token)?;
            let (lo, hi) = if start > end { (end, start) } else { (start, end) };
            return Ok(PortToken::Range(lo, hi));
        }

        parse_number(token, token).map(PortToken::Single)
    }
}

fn parse_number(s: &str, token: &str) -> Result<u64, ConfigError> {
    match s.trim().parse::<u64>() {
        Ok(value) => Ok(value),
        // Still a number, just far out of range. Expansion drops or clips it.
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(u64::MAX),
        Err(_) => Err(ConfigError::MalformedToken(token.to_string())),
    }
}

/// Strictly ascending, duplicate-free, non-empty list of ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSet {
    ports: Vec<u16>,
}

impl PortSet {
    /// Normalizes `ports` into a set. Port `0` is dropped.
    pub fn from_ports<I>(ports: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = u16>,
    {
        let unique: BTreeSet<u16> = ports.into_iter().filter(|port| *port >= MIN_PORT).collect();
        if unique.is_empty() {
            return Err(ConfigError::NoPorts);
        }
        Ok(Self {
            ports: unique.into_iter().collect(),
        })
    }

    /// Every port from 1 to 65535.
    pub fn full() -> Self {
        Self {
            ports: (MIN_PORT..=MAX_PORT).collect(),
        }
    }

    /// The curated list of well-known service ports.
    pub fn common() -> Self {
        let unique: BTreeSet<u16> = COMMON_PORTS.iter().copied().collect();
        Self {
            ports: unique.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.ports
    }

    pub fn contains(&self, port: u16) -> bool {
        self.ports.binary_search(&port).is_ok()
    }
}

/// Splits a specification into tokens. Empty elements (`"22,,80"`) are skipped.
pub fn tokenize(spec: &str) -> Result<Vec<PortToken>, ConfigError> {
    spec.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(PortToken::from_str)
        .collect()
}

/// Parses a custom specification into a port set.
///
/// ```
/// use portscan_common::network::ports::parse_port_spec;
///
/// let set = parse_port_spec("80,22,22,8000-8002").unwrap();
/// assert_eq!(set.as_slice(), &[22, 80, 8000, 8001, 8002]);
/// ```
pub fn parse_port_spec(spec: &str) -> Result<PortSet, ConfigError> {
    let tokens: Vec<PortToken> = tokenize(spec)?;
    let ports: BTreeSet<u16> = tokens.iter().flat_map(PortToken::ports).collect();

    if ports.is_empty() {
        return Err(ConfigError::EmptyPortSet(spec.to_string()));
    }

    Ok(PortSet {
        ports: ports.into_iter().collect(),
    })
}

/// Builds the port set for `mode`. `spec` is only consulted in custom mode.
pub fn build_port_set(mode: ScanMode, spec: Option<&str>) -> Result<PortSet, ConfigError> {
    match mode {
        ScanMode::Fast => Ok(PortSet::common()),
        ScanMode::Full => Ok(PortSet::full()),
        ScanMode::Custom => match spec {
            Some(spec) if !spec.trim().is_empty() => parse_port_spec(spec),
            _ => Err(ConfigError::MissingPortSpec),
        },
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

    #[test]
    fn test_tokenize_keeps_singles_and_ranges_apart() {
        assert_eq!(
            tokenize("22, 80 ,8000-8002").unwrap(),
            vec![
                PortToken::Single(22),
                PortToken::Single(80),
                PortToken::Range(8000, 8002)
            ]
        );

        // Reversed ranges are normalized
        assert_eq!(tokenize("100-90").unwrap(), vec![PortToken::Range(90, 100)]);

        // Empty elements are skipped
        assert_eq!(tokenize("22,,80,").unwrap().len(), 2);

        // Whitespace around range bounds
        assert_eq!(tokenize(" 20 - 25 ").unwrap(), vec![PortToken::Range(20, 25)]);
    }

    #[test]
    fn test_tokenize_rejects_malformed_tokens() {
        assert_eq!(tokenize("abc"), Err(ConfigError::MalformedToken("abc".into())));
        assert!(tokenize("80,http").is_err());
        assert!(tokenize("-80").is_err());
        assert!(tokenize("80-").is_err());
        assert!(tokenize("1-2-3").is_err());
        assert!(tokenize("8.5").is_err());
    }

    #[test]
    fn test_token_ports_are_clipped_to_valid_range() {
        assert_eq!(PortToken::Single(80).ports(), 80..=80);
        assert_eq!(PortToken::Range(0, 3).ports(), 1..=3);
        assert_eq!(PortToken::Range(65530, 70000).ports(), 65530..=65535);
        assert!(PortToken::Single(0).ports().is_empty());
        assert!(PortToken::Single(70000).ports().is_empty());
        assert!(PortToken::Range(70000, 80000).ports().is_empty());
    }

    #[test]
    fn test_parse_port_spec_sorts_and_deduplicates() {
        let set = parse_port_spec("80,22,22,8000-8002").unwrap();
        assert_eq!(set.as_slice(), &[22, 80, 8000, 8001, 8002]);

        let overlapping = parse_port_spec("10-20,15-25,20").unwrap();
        assert_eq!(overlapping.as_slice(), (10..=25).collect::<Vec<u16>>().as_slice());
    }

    #[test]
    fn test_parse_port_spec_reversed_range_matches_forward() {
        assert_eq!(parse_port_spec("100-90"), parse_port_spec("90-100"));
    }

    #[test]
    fn test_parse_port_spec_drops_out_of_range_singles() {
        let set = parse_port_spec("0,22,70000").unwrap();
        assert_eq!(set.as_slice(), &[22]);
    }

    #[test]
    fn test_parse_port_spec_drops_numbers_wider_than_u64() {
        let set = parse_port_spec("22,99999999999999999999").unwrap();
        assert_eq!(set.as_slice(), &[22]);

        let clipped = parse_port_spec("65530-99999999999999999999").unwrap();
        assert_eq!(clipped.as_slice(), (65530..=65535).collect::<Vec<u16>>().as_slice());

        assert!(matches!(
            parse_port_spec("99999999999999999999"),
            Err(ConfigError::EmptyPortSet(_))
        ));
        assert!(tokenize("-99999999999999999999").is_err());
    }

    #[test]
    fn test_parse_port_spec_rejects_empty_results() {
        assert!(matches!(parse_port_spec(""), Err(ConfigError::EmptyPortSet(_))));
        assert!(matches!(parse_port_spec(" , "), Err(ConfigError::EmptyPortSet(_))));
        assert!(matches!(parse_port_spec("70000"), Err(ConfigError::EmptyPortSet(_))));
        assert!(matches!(parse_port_spec("abc"), Err(ConfigError::MalformedToken(_))));
    }

    #[test]
    fn test_build_port_set_full() {
        let set = build_port_set(ScanMode::Full, None).unwrap();
        assert_eq!(set.len(), 65535);
        assert_eq!(set.as_slice().first(), Some(&1));
        assert_eq!(set.as_slice().last(), Some(&65535));
        assert!(set.as_slice().windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn test_build_port_set_fast() {
        let set = build_port_set(ScanMode::Fast, Some("ignored")).unwrap();
        assert!(set.as_slice().windows(2).all(|w| w[0] < w[1]));
        assert!(set.as_slice().iter().all(|port| *port >= MIN_PORT));
        assert_eq!(set.len(), COMMON_PORTS.len() - 1);
        assert!(set.contains(22) && set.contains(443) && set.contains(27017));
    }

    #[test]
    fn test_build_port_set_custom_requires_spec() {
        assert_eq!(build_port_set(ScanMode::Custom, None), Err(ConfigError::MissingPortSpec));
        assert_eq!(build_port_set(ScanMode::Custom, Some("")), Err(ConfigError::MissingPortSpec));
        assert_eq!(
            build_port_set(ScanMode::Custom, Some("443,22")).unwrap().as_slice(),
            &[22, 443]
        );
    }

    #[test]
    fn test_scan_mode_from_str() {
        assert_eq!("fast".parse::<ScanMode>(), Ok(ScanMode::Fast));
        assert_eq!("FULL".parse::<ScanMode>(), Ok(ScanMode::Full));
        assert_eq!("custom".parse::<ScanMode>(), Ok(ScanMode::Custom));
        assert_eq!(
            "stealth".parse::<ScanMode>(),
            Err(ConfigError::InvalidMode("stealth".into()))
        );
    }

    #[test]
    fn test_port_set_from_ports_normalizes() {
        let set = PortSet::from_ports([443, 0, 22, 443]).unwrap();
        assert_eq!(set.as_slice(), &[22, 443]);
        assert_eq!(PortSet::from_ports([0]), Err(ConfigError::NoPorts));
        assert_eq!(PortSet::from_ports(Vec::new()), Err(ConfigError::NoPorts));
        assert_eq!(
            ConfigError::NoPorts.to_string(),
            "port set contains no ports in 1-65535"
        );
    }
}
