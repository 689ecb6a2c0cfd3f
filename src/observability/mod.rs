//! Observability for the sorted-set engine
//!
//! Per OBSERVABILITY.md, this module provides:
//! - Structured logging (JSON)
//! - Typed lifecycle events
//! - Counter metrics
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. Logging never fails an operation
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```
//! use aerodb_zset::observability::{Event, Logger, MetricsRegistry, Severity};
//!
//! let logger = Logger::new(Severity::Warn);
//! logger.event(Event::SetCreated, &[("set", "leaderboard")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_sets_created();
//! assert_eq!(metrics.snapshot().sets_created, 1);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
