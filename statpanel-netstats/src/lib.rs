//! Interface statistics over rtnetlink
//!
//! Reads the 64-bit link counters of one network interface with a single
//! `RTM_GETSTATS` request per sample.
//!
//! # Message Overview
//!
//! Every request and reply is one netlink message:
//! ```text
//! ┌─────┬──────┬───────┬─────┬─────┬─────────────────┐
//! │ LEN │ TYPE │ FLAGS │ SEQ │ PID │ PAYLOAD         │
//! │ 4B  │ 2B   │ 2B    │ 4B  │ 4B  │ LEN - 16 bytes  │
//! └─────┴──────┴───────┴─────┴─────┴─────────────────┘
//! ```
//!
//! The request payload is a 12-byte `if_stats_msg` naming the interface
//! index and asking for `IFLA_STATS_LINK_64` only. The reply repeats that
//! header, then carries one attribute whose first four counters are the
//! only ones decoded.
//!
//! The kernel socket sits behind [`StatsChannel`] so the reader can be
//! driven from tests without a kernel.

#![deny(unsafe_code)]

pub mod channel;
pub mod error;
pub mod interface;
pub mod message;
pub mod reader;
pub mod reply;
pub mod stats;

#[cfg(feature = "netlink")]
pub mod netlink;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use channel::StatsChannel;
pub use error::StatsError;
pub use interface::{resolve_index, InterfaceError};
pub use message::{Header, Message, MessageError};
pub use reader::NetifStats;
pub use reply::{ReplyCollector, ReplyError, ReplyStep};
pub use stats::IfStats;

#[cfg(feature = "netlink")]
pub use netlink::NetlinkChannel;
