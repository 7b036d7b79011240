//! Interface statistics reader

use crate::channel::StatsChannel;
use crate::error::StatsError;
use crate::interface;
use crate::message::Message;
use crate::stats::{stats_request, IfStats};

/// Counter reader bound to one interface
///
/// The request is built once; every [`NetifStats::read`] sends it
/// unchanged apart from the sequence number the channel assigns.
pub struct NetifStats<C> {
    channel: C,
    ifindex: u32,
    request: Message,
}

impl<C: StatsChannel> NetifStats<C> {
    /// Create a reader for the named interface
    pub fn new(channel: C, ifname: &str) -> Result<Self, StatsError<C::Error>> {
        let ifindex = interface::resolve_index(ifname)?;
        Ok(Self::with_index(channel, ifindex))
    }

    /// Create a reader for an already known interface index
    pub fn with_index(channel: C, ifindex: u32) -> Self {
        Self {
            channel,
            ifindex,
            request: stats_request(ifindex),
        }
    }

    /// Kernel index of the interface
    pub fn ifindex(&self) -> u32 {
        self.ifindex
    }

    /// Fetch the current counters
    ///
    /// Only the first reply message is decoded.
    pub fn read(&mut self) -> Result<IfStats, StatsError<C::Error>> {
        let replies = self
            .channel
            .execute(&self.request)
            .map_err(StatsError::Channel)?;

        let reply = replies.first().ok_or(StatsError::NoData)?;

        IfStats::decode(&reply.payload).ok_or(StatsError::Truncated {
            len: reply.payload.len(),
        })
    }

    /// Close the channel, consuming the reader
    pub fn close(mut self) -> Result<(), StatsError<C::Error>> {
        self.channel.close().map_err(StatsError::Channel)
    }
}

#[cfg(feature = "netlink")]
impl NetifStats<crate::netlink::NetlinkChannel> {
    /// Resolve the interface and open a kernel channel for it
    pub fn open(ifname: &str) -> Result<Self, StatsError<std::io::Error>> {
        let ifindex = interface::resolve_index(ifname)?;
        let channel = crate::netlink::NetlinkChannel::open().map_err(StatsError::Channel)?;
        log::debug!("netlink stats channel open for {ifname} (index {ifindex})");

        Ok(Self::with_index(channel, ifindex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::InterfaceError;
    use crate::message::{Message, RTM_NEWSTATS};
    use crate::mock::MockChannel;

    fn sample() -> IfStats {
        IfStats {
            rx_packets: 5,
            tx_packets: 6,
            rx_bytes: 7_000,
            tx_bytes: 8_000,
        }
    }

    #[test]
    fn test_read_decodes_first_reply() {
        let mut channel = MockChannel::new();
        channel.push_stats(2, sample());
        let mut reader = NetifStats::with_index(channel, 2);

        assert_eq!(reader.read().unwrap(), sample());
        assert_eq!(reader.ifindex(), 2);
    }

    #[test]
    fn test_request_is_reused() {
        let mut channel = MockChannel::new();
        channel.push_stats(4, sample());
        channel.push_stats(4, sample());
        let mut reader = NetifStats::with_index(channel, 4);

        reader.read().unwrap();
        reader.read().unwrap();

        let requests = reader.channel.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
        assert_eq!(requests[0].payload[4..8], 4u32.to_le_bytes());
    }

    #[test]
    fn test_empty_reply_is_no_data() {
        let mut channel = MockChannel::new();
        channel.push_reply(Vec::new());
        let mut reader = NetifStats::with_index(channel, 2);

        assert!(matches!(reader.read(), Err(StatsError::NoData)));
    }

    #[test]
    fn test_short_reply_is_truncated() {
        let mut channel = MockChannel::new();
        channel.push_reply(vec![Message::new(RTM_NEWSTATS, 0, &[0; 20])]);
        let mut reader = NetifStats::with_index(channel, 2);

        assert!(matches!(
            reader.read(),
            Err(StatsError::Truncated { len: 20 })
        ));
    }

    #[test]
    fn test_channel_error() {
        let mut channel = MockChannel::new();
        channel.push_error();
        let mut reader = NetifStats::with_index(channel, 2);

        assert!(matches!(reader.read(), Err(StatsError::Channel(_))));
    }

    #[test]
    fn test_unknown_interface() {
        let result = NetifStats::new(MockChannel::new(), "../etc");
        assert!(matches!(
            result,
            Err(StatsError::Interface(InterfaceError::InvalidName))
        ));
    }

    #[test]
    fn test_close_releases_channel() {
        let channel = MockChannel::new();
        let closed = channel.closed_flag();
        let reader = NetifStats::with_index(channel, 2);

        reader.close().unwrap();
        assert!(closed.get());
    }
}
