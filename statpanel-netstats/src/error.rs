//! Statistics reader errors

use std::fmt;

use crate::interface::InterfaceError;

/// Errors from reading interface statistics
#[derive(Debug)]
pub enum StatsError<E> {
    /// Channel transport failed
    Channel(E),
    /// The kernel answered with no messages
    NoData,
    /// Reply payload too short for the counters
    Truncated {
        /// Payload length received
        len: usize,
    },
    /// Interface name could not be resolved to an index
    Interface(InterfaceError),
}

impl<E> From<InterfaceError> for StatsError<E> {
    fn from(e: InterfaceError) -> Self {
        StatsError::Interface(e)
    }
}

impl<E: fmt::Display> fmt::Display for StatsError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::Channel(e) => write!(f, "netlink channel: {e}"),
            StatsError::NoData => f.write_str("empty response"),
            StatsError::Truncated { len } => {
                write!(f, "stats reply truncated ({len} byte payload)")
            }
            StatsError::Interface(e) => write!(f, "interface: {e}"),
        }
    }
}

impl<E> std::error::Error for StatsError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StatsError::Channel(e) => Some(e),
            StatsError::Interface(e) => Some(e),
            _ => None,
        }
    }
}
