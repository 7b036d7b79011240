//! Kernel rtnetlink channel

use std::io;

use netlink_sys::{protocols::NETLINK_ROUTE, Socket, SocketAddr};

use crate::channel::StatsChannel;
use crate::message::{self, Message};
use crate::reply::{ReplyCollector, ReplyError, ReplyStep};

/// `NETLINK_ROUTE` socket connected to the kernel
pub struct NetlinkChannel {
    /// `None` once closed
    socket: Option<Socket>,
    sequence: u32,
}

impl NetlinkChannel {
    /// Open and bind a routing netlink socket
    pub fn open() -> io::Result<Self> {
        let mut socket = Socket::new(NETLINK_ROUTE)?;
        socket.bind_auto()?;
        socket.connect(&SocketAddr::new(0, 0))?;

        Ok(Self {
            socket: Some(socket),
            sequence: 0,
        })
    }

    fn socket(&self) -> io::Result<&Socket> {
        self.socket
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "netlink channel closed"))
    }
}

impl StatsChannel for NetlinkChannel {
    type Error = io::Error;

    fn execute(&mut self, request: &Message) -> io::Result<Vec<Message>> {
        self.sequence = self.sequence.wrapping_add(1);
        let sequence = self.sequence;

        let mut request = request.clone();
        request.header.sequence = sequence;

        let socket = self.socket()?;
        socket.send(&request.encode(), 0)?;

        let mut collector = ReplyCollector::new(sequence);
        loop {
            let (datagram, _) = socket.recv_from_full()?;
            let messages = message::parse(&datagram)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

            match collector.feed(messages) {
                Ok(ReplyStep::Done) => return Ok(collector.into_replies()),
                Ok(ReplyStep::Continue) => {}
                Err(ReplyError::Kernel(code)) => return Err(io::Error::from_raw_os_error(-code)),
                Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
            }
        }
    }

    fn close(&mut self) -> io::Result<()> {
        // Dropping the socket closes the descriptor
        self.socket.take();
        Ok(())
    }
}
