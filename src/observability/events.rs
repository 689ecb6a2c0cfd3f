//! Observable sorted-set events
//!
//! Events are explicit and typed; each carries the severity it is logged at.

use std::fmt;

use super::logger::Severity;

/// Observable events in the sorted-set engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration loaded and validated
    ConfigLoaded,
    /// First insert created a sorted set
    SetCreated,
    /// New member inserted
    MemberAdded,
    /// Existing member re-inserted with a new score or record
    MemberUpdated,
    /// Member removed by value
    MemberRemoved,
    /// Extreme member popped
    Popped,
    /// Rank range removed
    RangeRemoved,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SetCreated => "ZSET_CREATED",
            Event::MemberAdded => "ZSET_MEMBER_ADDED",
            Event::MemberUpdated => "ZSET_MEMBER_UPDATED",
            Event::MemberRemoved => "ZSET_MEMBER_REMOVED",
            Event::Popped => "ZSET_POPPED",
            Event::RangeRemoved => "ZSET_RANGE_REMOVED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded | Event::SetCreated | Event::RangeRemoved => Severity::Info,
            Event::MemberAdded | Event::MemberUpdated | Event::MemberRemoved | Event::Popped => {
                Severity::Trace
            }
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::SetCreated.as_str(), "ZSET_CREATED");
        assert_eq!(Event::RangeRemoved.to_string(), "ZSET_RANGE_REMOVED");
    }

    #[test]
    fn test_per_member_events_are_trace() {
        assert_eq!(Event::MemberAdded.severity(), Severity::Trace);
        assert_eq!(Event::Popped.severity(), Severity::Trace);
        assert_eq!(Event::SetCreated.severity(), Severity::Info);
    }
}
