//! Score range query options

use serde::{Deserialize, Serialize};

/// Options for score range scans.
///
/// Bounds are inclusive unless the matching `exclusive_*` flag is set.
/// `offset` qualifying nodes are skipped in scan order before at most
/// `limit` nodes are collected. With `reverse` the scan runs from the upper
/// bound down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRangeOptions {
    /// Exclude nodes whose score equals the lower bound
    pub exclusive_start: bool,
    /// Exclude nodes whose score equals the upper bound
    pub exclusive_end: bool,
    /// Maximum number of nodes returned; `None` is unbounded
    pub limit: Option<usize>,
    /// Number of qualifying nodes skipped before collecting
    pub offset: usize,
    /// Scan from the upper bound towards the lower bound
    pub reverse: bool,
}

impl ScoreRangeOptions {
    /// Both bounds inclusive, no limit, ascending.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclusive_start(mut self, exclusive: bool) -> Self {
        self.exclusive_start = exclusive;
        self
    }

    pub fn exclusive_end(mut self, exclusive: bool) -> Self {
        self.exclusive_end = exclusive;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Whether `score` satisfies the lower bound `lo`.
    pub(crate) fn above_lower(&self, score: f64, lo: f64) -> bool {
        if self.exclusive_start {
            score > lo
        } else {
            score >= lo
        }
    }

    /// Whether `score` satisfies the upper bound `hi`.
    pub(crate) fn below_upper(&self, score: f64, hi: f64) -> bool {
        if self.exclusive_end {
            score < hi
        } else {
            score <= hi
        }
    }

    /// Whether no score can satisfy both bounds.
    pub(crate) fn is_empty_interval(&self, lo: f64, hi: f64) -> bool {
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return true;
        }
        lo == hi && (self.exclusive_start || self.exclusive_end)
    }
}
