//! Wall clock abstraction

use chrono::NaiveDateTime;

/// Source of local wall-clock time
///
/// The dimming window is expressed in local time of day, so
/// implementations return local (not UTC) timestamps.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}
