//! aerodb-zset - Sorted-set index for the aerodb storage engine
//!
//! Skip-list backed ZSET primitive with rank and range queries.

pub mod observability;
pub mod zset;

pub use zset::{
    member_digest, Node, OrderedIndex, ScoreRangeOptions, SortedSetRegistry, ZSetConfig,
    ZSetError, ZSetResult,
};
