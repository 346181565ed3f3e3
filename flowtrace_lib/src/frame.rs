/** ------------------------------------------------------------
 * Minimal Ethernet/IPv4 frames carrying a flow tag
 * ------------------------------------------------------------- */
use crate::errors::{FlowtraceError, Result};
use crate::flow::FlowMac;
use pnet_packet::ethernet::{EtherTypes, EthernetPacket, MutableEthernetPacket};
use pnet_packet::ip::IpNextHeaderProtocols;
use pnet_packet::ipv4::{self, MutableIpv4Packet};
use std::net::Ipv4Addr;
use std::time::Duration;

pub const ETHERNET_HEADER_LEN: usize = 14;
pub const IPV4_HEADER_LEN: usize = 20;
pub const FRAME_LEN: usize = ETHERNET_HEADER_LEN + IPV4_HEADER_LEN;

/// Network-layer source and destination of every synthetic frame
pub const PLACEHOLDER_IP: Ipv4Addr = Ipv4Addr::new(1, 1, 1, 1);

/**
 * A frame to be written to a capture
 *
 * Only the source tag varies between frames; everything else is a
 * fixed placeholder, so this is all that needs to be kept around.
 */
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SyntheticFrame {
    pub timestamp: Duration,
    pub src: FlowMac,
}

impl SyntheticFrame {
    pub fn new(timestamp: Duration, src: FlowMac) -> Self {
        Self { timestamp, src }
    }

    /**
     * Serialize into Ethernet II + bare IPv4 header bytes
     */
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; FRAME_LEN];

        {
            let (eth_bytes, ip_bytes) = buffer.split_at_mut(ETHERNET_HEADER_LEN);

            // Both slices are sized to the header lengths above, so the
            // constructors cannot fail.
            if let Some(mut eth) = MutableEthernetPacket::new(eth_bytes) {
                eth.set_destination(FlowMac::PLACEHOLDER.into());
                eth.set_source(self.src.into());
                eth.set_ethertype(EtherTypes::Ipv4);
            }

            if let Some(mut ip) = MutableIpv4Packet::new(ip_bytes) {
                ip.set_version(4);
                ip.set_header_length(5);
                ip.set_total_length(IPV4_HEADER_LEN as u16);
                ip.set_ttl(64);
                ip.set_next_level_protocol(IpNextHeaderProtocols::Hopopt);
                ip.set_source(PLACEHOLDER_IP);
                ip.set_destination(PLACEHOLDER_IP);
                let checksum = ipv4::checksum(&ip.to_immutable());
                ip.set_checksum(checksum);
            }
        }

        buffer
    }
}

/**
 * Source tag of a captured frame
 */
pub fn frame_source(data: &[u8]) -> Result<FlowMac> {
    EthernetPacket::new(data)
        .map(|eth| FlowMac::from(eth.get_source()))
        .ok_or(FlowtraceError::TruncatedFrame(data.len()))
}
