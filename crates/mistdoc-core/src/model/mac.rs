// ── MAC address identity ──
//
// Clients and access points are both keyed by MAC. The Mist API wants the
// bare 12-hex form in paths and queries; humans type every other form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, Cisco dotted, or bare hex.
    ///
    /// Input that is not 12 hex digits plus separators is kept lowercased
    /// as-is; use [`is_valid`](Self::is_valid) to reject it.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim();
        let only_hex_and_separators = raw
            .chars()
            .all(|c| c.is_ascii_hexdigit() || matches!(c, ':' | '-' | '.'));
        let hex: String = raw
            .chars()
            .filter(char::is_ascii_hexdigit)
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if only_hex_and_separators && hex.len() == 12 {
            let octets: Vec<&str> = (0..12)
                .step_by(2)
                .filter_map(|i| hex.get(i..i + 2))
                .collect();
            Self(octets.join(":"))
        } else {
            Self(raw.to_lowercase())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bare lowercase hex (`aabbccddeeff`), the form Mist uses in URLs.
    pub fn compact(&self) -> String {
        self.0.replace(':', "")
    }

    /// Whether this is a well-formed 6-octet address.
    pub fn is_valid(&self) -> bool {
        self.0.len() == 17
            && self
                .0
                .split(':')
                .all(|octet| octet.len() == 2 && octet.chars().all(|c| c.is_ascii_hexdigit()))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
