//! Link counters and the stats request

use crate::message::{flags, Message, RTM_GETSTATS};

/// `if_stats_msg` size
pub const IF_STATS_MSG_LEN: usize = 12;

/// Offset of the first counter in a reply: `if_stats_msg` plus one
/// attribute header
pub const COUNTERS_OFFSET: usize = IF_STATS_MSG_LEN + 4;

/// Decoded counters: four little-endian u64 values
pub const COUNTERS_LEN: usize = 4 * 8;

/// Filter bit for `IFLA_STATS_LINK_64`
pub const FILTER_LINK_64: u32 = 1 << 0;

/// Unspecified address family
const AF_UNSPEC: u8 = 0;

/// Build the `RTM_GETSTATS` request for one interface
///
/// Payload layout: family (1), pad (1), pad (2), ifindex (4), filter mask (4).
pub fn stats_request(ifindex: u32) -> Message {
    let mut payload = [0u8; IF_STATS_MSG_LEN];
    payload[0] = AF_UNSPEC;
    payload[4..8].copy_from_slice(&ifindex.to_le_bytes());
    payload[8..12].copy_from_slice(&FILTER_LINK_64.to_le_bytes());

    Message::new(RTM_GETSTATS, flags::REQUEST | flags::DUMP_FILTERED, &payload)
}

/// Interface counters since the interface came up
///
/// Only the leading fields of `rtnl_link_stats64` are kept; error, drop
/// and collision counters are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IfStats {
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

impl IfStats {
    /// Decode counters from an `RTM_NEWSTATS` payload
    ///
    /// Returns `None` if the payload ends before the fourth counter.
    pub fn decode(payload: &[u8]) -> Option<Self> {
        let counters = payload.get(COUNTERS_OFFSET..COUNTERS_OFFSET + COUNTERS_LEN)?;
        let field = |i: usize| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&counters[i * 8..i * 8 + 8]);
            u64::from_le_bytes(raw)
        };

        Some(Self {
            rx_packets: field(0),
            tx_packets: field(1),
            rx_bytes: field(2),
            tx_bytes: field(3),
        })
    }

    /// Counter increase since `prev`
    ///
    /// A counter that went backwards (interface reset) yields 0.
    pub fn delta(&self, prev: &IfStats) -> IfStats {
        IfStats {
            rx_packets: self.rx_packets.saturating_sub(prev.rx_packets),
            tx_packets: self.tx_packets.saturating_sub(prev.tx_packets),
            rx_bytes: self.rx_bytes.saturating_sub(prev.rx_bytes),
            tx_bytes: self.tx_bytes.saturating_sub(prev.tx_bytes),
        }
    }

    /// Encode as a reply payload (used to fake kernel answers)
    #[cfg(any(test, feature = "mock"))]
    pub fn to_reply_payload(&self, ifindex: u32) -> Vec<u8> {
        let attr_len = (4 + COUNTERS_LEN) as u16;
        let mut payload = Vec::with_capacity(COUNTERS_OFFSET + COUNTERS_LEN);

        payload.extend_from_slice(&[AF_UNSPEC, 0, 0, 0]);
        payload.extend_from_slice(&ifindex.to_le_bytes());
        payload.extend_from_slice(&FILTER_LINK_64.to_le_bytes());
        payload.extend_from_slice(&attr_len.to_le_bytes());
        payload.extend_from_slice(&1u16.to_le_bytes()); // IFLA_STATS_LINK_64
        for value in [self.rx_packets, self.tx_packets, self.rx_bytes, self.tx_bytes] {
            payload.extend_from_slice(&value.to_le_bytes());
        }

        payload
    }
}
