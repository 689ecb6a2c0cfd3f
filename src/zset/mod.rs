//! Sorted-set index subsystem
//!
//! In-memory ZSET primitive embedded in the storage engine: named
//! collections of (member, score) pairs with ordered traversal, rank
//! queries and range queries.
//!
//! # Design Principles
//!
//! - Derived state: records belong to storage, the index only holds handles
//! - In-memory only: no persistence
//! - Deterministic: total order by score, ties broken by member digest
//!
//! # Invariants
//!
//! - Digest table and level-0 chain always hold the same members
//! - Ranks are 1-based; rank 0 means "not found"
//! - A sorted set exists from its first insert on, even when emptied
//!
//! # Known limitation
//!
//! Members are keyed by a 32-bit digest. Two distinct members with the same
//! digest occupy one slot and the later insert wins.

mod config;
mod digest;
mod errors;
mod node;
mod options;
mod registry;
mod skiplist;

pub use config::{ZSetConfig, MAX_LEVEL_LIMIT};
pub use digest::{member_digest, Digest};
pub use errors::{Severity as ErrorSeverity, ZSetError, ZSetErrorCode, ZSetResult};
pub use node::Node;
pub use options::ScoreRangeOptions;
pub use registry::SortedSetRegistry;
pub use skiplist::{Iter, OrderedIndex};
