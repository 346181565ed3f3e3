/** ------------------------------------------------------------
 * Synthetic flow tags
 * ------------------------------------------------------------- */
use crate::errors::FlowtraceError;
use pnet_base::MacAddr;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/**
 * Source tag carried by every synthetic frame of a flow
 *
 * Flows are told apart by the Ethernet source address only. The
 * simulator writes this address into its logs as a 48-bit integer,
 * so flow A (`10:10:10:10:10:10`) shows up as `17661175009296`.
 */
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlowMac(pub [u8; 6]);

impl FlowMac {
    pub const A: FlowMac = FlowMac([0x10; 6]);
    pub const B: FlowMac = FlowMac([0x20; 6]);
    pub const C: FlowMac = FlowMac([0x30; 6]);
    pub const D: FlowMac = FlowMac([0x40; 6]);
    pub const E: FlowMac = FlowMac([0x50; 6]);
    pub const F: FlowMac = FlowMac([0x60; 6]);
    pub const G: FlowMac = FlowMac([0x70; 6]);

    /// Destination of every frame, and the source of unmapped ones
    pub const PLACEHOLDER: FlowMac = FlowMac([0x01; 6]);

    pub fn octets(self) -> [u8; 6] {
        self.0
    }

    /**
     * Address as the big-endian integer the simulator logs use
     */
    pub fn as_u64(self) -> u64 {
        self.0
            .iter()
            .fold(0u64, |acc, &octet| (acc << 8) | octet as u64)
    }
}

impl From<FlowMac> for MacAddr {
    fn from(mac: FlowMac) -> Self {
        let [a, b, c, d, e, f] = mac.0;
        MacAddr::new(a, b, c, d, e, f)
    }
}

impl From<MacAddr> for FlowMac {
    fn from(mac: MacAddr) -> Self {
        FlowMac(mac.octets())
    }
}

impl fmt::Display for FlowMac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for FlowMac {
    type Err = FlowtraceError;

    /// Accepts 1-2 hex digits per octet, so `1:1:1:1:1:1` is valid.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FlowtraceError::InvalidMac(s.to_string());

        let mut octets = [0u8; 6];
        let mut parts = s.split(':');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || part.len() > 2 {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(FlowMac(octets))
    }
}

impl TryFrom<String> for FlowMac {
    type Error = FlowtraceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FlowMac> for String {
    fn from(mac: FlowMac) -> Self {
        mac.to_string()
    }
}
