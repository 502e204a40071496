use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacParseError {
    #[error("invalid MAC address {0:?} (expected format AA:BB:CC:DD:EE:FF)")]
    Format(String),
}

/// Six-byte hardware address. Parses only the strict colon-separated form
/// `XX:XX:XX:XX:XX:XX` (hex digits in either case) and prints upper case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn is_valid(s: &str) -> bool {
        s.parse::<MacAddress>().is_ok()
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MacParseError::Format(s.to_string());

        let mut out = [0u8; 6];
        let mut parts = s.split(':');
        for byte in out.iter_mut() {
            let part = parts.next().ok_or_else(err)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(err());
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| err())?;
        }
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(MacAddress(out))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_case_and_prints_upper() {
        let mac: MacAddress = "aa:Bb:cc:01:23:ef".parse().unwrap();
        assert_eq!(mac.octets(), [0xAA, 0xBB, 0xCC, 0x01, 0x23, 0xEF]);
        assert_eq!(mac.to_string(), "AA:BB:CC:01:23:EF");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "",
            "zz:11:22:33:44:55",
            "AA:BB:CC:DD:EE",
            "AA:BB:CC:DD:EE:FF:00",
            "AA-BB-CC-DD-EE-FF",
            "A:BB:CC:DD:EE:FFF",
            " AA:BB:CC:DD:EE:FF",
            "+A:BB:CC:DD:EE:FF",
        ] {
            assert!(!MacAddress::is_valid(bad), "{bad:?} should be rejected");
        }
    }
}
