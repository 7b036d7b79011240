//! Kernel request channel

use crate::message::Message;

/// Request/reply channel to the kernel's routing netlink family
///
/// Implementations assign sequence numbers, send the request and collect
/// every data message of the reply. Terminating `NLMSG_DONE` and
/// acknowledgement messages are consumed, not returned.
pub trait StatsChannel {
    /// Transport error type
    type Error: core::fmt::Debug;

    /// Send one request and return the reply messages
    fn execute(&mut self, request: &Message) -> Result<Vec<Message>, Self::Error>;

    /// Release the underlying socket
    ///
    /// Later `execute` calls fail.
    fn close(&mut self) -> Result<(), Self::Error>;
}
