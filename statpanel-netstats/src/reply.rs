//! Reply collection for one request
//!
//! The kernel answers a request with one or more datagrams. Messages
//! carrying another sequence number are left over from earlier requests
//! and skipped. A reply is complete on `NLMSG_DONE`, on an `NLMSG_ERROR`
//! acknowledgement, or on the first reply message without `NLM_F_MULTI`;
//! anything after that in the same datagram is ignored.

use std::fmt;

use log::debug;

use crate::message::{Message, NLMSG_DONE, NLMSG_ERROR};

/// Outcome of feeding one datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStep {
    /// The reply is complete
    Done,
    /// More datagrams are needed
    Continue,
}

/// Failures reported inside a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyError {
    /// `NLMSG_ERROR` with a negated errno
    Kernel(i32),
    /// `NLMSG_ERROR` too short to hold an error code
    ShortError,
}

impl fmt::Display for ReplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyError::Kernel(code) => write!(f, "kernel error {code}"),
            ReplyError::ShortError => f.write_str("short netlink error message"),
        }
    }
}

impl std::error::Error for ReplyError {}

/// Accumulates the reply messages of one request
#[derive(Debug)]
pub struct ReplyCollector {
    sequence: u32,
    replies: Vec<Message>,
}

impl ReplyCollector {
    /// Collect replies for the request sent with `sequence`
    pub fn new(sequence: u32) -> Self {
        Self {
            sequence,
            replies: Vec::new(),
        }
    }

    /// Process the messages of one received datagram
    pub fn feed(&mut self, messages: Vec<Message>) -> Result<ReplyStep, ReplyError> {
        for msg in messages {
            if msg.header.sequence != self.sequence {
                debug!(
                    "dropping stale netlink message (seq {} != {})",
                    msg.header.sequence, self.sequence
                );
                continue;
            }

            match msg.header.msg_type {
                NLMSG_DONE => return Ok(ReplyStep::Done),
                NLMSG_ERROR => {
                    return match msg.error_code() {
                        Some(0) => Ok(ReplyStep::Done),
                        Some(code) => Err(ReplyError::Kernel(code)),
                        None => Err(ReplyError::ShortError),
                    };
                }
                _ => {
                    let multipart = msg.is_multipart();
                    self.replies.push(msg);
                    if !multipart {
                        return Ok(ReplyStep::Done);
                    }
                }
            }
        }

        Ok(ReplyStep::Continue)
    }

    /// Reply messages collected so far
    pub fn into_replies(self) -> Vec<Message> {
        self.replies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{flags, RTM_NEWSTATS};

    fn reply(sequence: u32, msg_type: u16, flags: u16, payload: &[u8]) -> Message {
        let mut msg = Message::new(msg_type, flags, payload);
        msg.header.sequence = sequence;
        msg
    }

    fn stats(sequence: u32, tag: u8) -> Message {
        reply(sequence, RTM_NEWSTATS, 0, &[tag])
    }

    fn part(sequence: u32, tag: u8) -> Message {
        reply(sequence, RTM_NEWSTATS, flags::MULTI, &[tag])
    }

    fn error(sequence: u32, code: i32) -> Message {
        reply(sequence, NLMSG_ERROR, 0, &code.to_le_bytes())
    }

    #[test]
    fn test_single_reply_is_done() {
        let mut collector = ReplyCollector::new(4);
        assert_eq!(collector.feed(vec![stats(4, 1)]), Ok(ReplyStep::Done));
        assert_eq!(collector.into_replies(), vec![stats(4, 1)]);
    }

    #[test]
    fn test_stale_messages_are_skipped() {
        let mut collector = ReplyCollector::new(4);
        assert_eq!(
            collector.feed(vec![stats(3, 9), stats(4, 1)]),
            Ok(ReplyStep::Done)
        );
        assert_eq!(collector.into_replies(), vec![stats(4, 1)]);
    }

    #[test]
    fn test_only_stale_messages_wait_for_more() {
        let mut collector = ReplyCollector::new(4);
        assert_eq!(collector.feed(vec![stats(3, 9)]), Ok(ReplyStep::Continue));
        assert!(collector.into_replies().is_empty());
    }

    #[test]
    fn test_stale_after_complete_reply_is_done() {
        let mut collector = ReplyCollector::new(4);
        assert_eq!(
            collector.feed(vec![stats(4, 1), stats(3, 9)]),
            Ok(ReplyStep::Done)
        );
        assert_eq!(collector.into_replies(), vec![stats(4, 1)]);
    }

    #[test]
    fn test_multipart_spans_datagrams_until_done() {
        let mut collector = ReplyCollector::new(4);
        assert_eq!(
            collector.feed(vec![part(4, 1), part(4, 2)]),
            Ok(ReplyStep::Continue)
        );
        assert_eq!(
            collector.feed(vec![part(4, 3), reply(4, NLMSG_DONE, flags::MULTI, &[0; 4])]),
            Ok(ReplyStep::Done)
        );
        assert_eq!(
            collector.into_replies(),
            vec![part(4, 1), part(4, 2), part(4, 3)]
        );
    }

    #[test]
    fn test_ack_is_done() {
        let mut collector = ReplyCollector::new(4);
        assert_eq!(collector.feed(vec![error(4, 0)]), Ok(ReplyStep::Done));
        assert!(collector.into_replies().is_empty());
    }

    #[test]
    fn test_kernel_error() {
        let mut collector = ReplyCollector::new(4);
        assert_eq!(
            collector.feed(vec![error(4, -19)]),
            Err(ReplyError::Kernel(-19))
        );
    }

    #[test]
    fn test_short_error_message() {
        let mut collector = ReplyCollector::new(4);
        assert_eq!(
            collector.feed(vec![reply(4, NLMSG_ERROR, 0, &[0; 2])]),
            Err(ReplyError::ShortError)
        );
    }

    #[test]
    fn test_stale_error_is_ignored() {
        let mut collector = ReplyCollector::new(4);
        assert_eq!(
            collector.feed(vec![error(3, -1), stats(4, 1)]),
            Ok(ReplyStep::Done)
        );
    }
}
