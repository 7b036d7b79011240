//! In-memory stats channel
//!
//! Replays queued replies in order and records every request. An empty
//! queue answers with no messages.

use std::cell::Cell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::channel::StatsChannel;
use crate::message::{Message, RTM_NEWSTATS};
use crate::stats::IfStats;

/// Error returned by [`MockChannel`] for injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockChannelError;

impl fmt::Display for MockChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("injected channel failure")
    }
}

impl std::error::Error for MockChannelError {}

/// Scripted channel used by host tests
#[derive(Debug, Default)]
pub struct MockChannel {
    replies: VecDeque<Result<Vec<Message>, MockChannelError>>,
    requests: Vec<Message>,
    closed: Rc<Cell<bool>>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw reply
    pub fn push_reply(&mut self, messages: Vec<Message>) {
        self.replies.push_back(Ok(messages));
    }

    /// Queue a well-formed stats reply
    pub fn push_stats(&mut self, ifindex: u32, stats: IfStats) {
        let payload = stats.to_reply_payload(ifindex);
        self.push_reply(vec![Message::new(RTM_NEWSTATS, 0, &payload)]);
    }

    /// Fail the next request
    pub fn push_error(&mut self) {
        self.replies.push_back(Err(MockChannelError));
    }

    /// Every request sent so far
    pub fn requests(&self) -> &[Message] {
        &self.requests
    }

    /// Shared flag set once the channel is closed
    ///
    /// Lets a test observe the close after the channel was moved.
    pub fn closed_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.closed)
    }
}

impl StatsChannel for MockChannel {
    type Error = MockChannelError;

    fn execute(&mut self, request: &Message) -> Result<Vec<Message>, MockChannelError> {
        self.requests.push(request.clone());
        if self.closed.get() {
            return Err(MockChannelError);
        }
        self.replies.pop_front().unwrap_or(Ok(Vec::new()))
    }

    fn close(&mut self) -> Result<(), MockChannelError> {
        self.closed.set(true);
        Ok(())
    }
}
