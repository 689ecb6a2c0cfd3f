//! Sorted-set registry
//!
//! Owns one `OrderedIndex` per sorted-set name. A name appears on its first
//! insert and stays registered even after its last member is removed, so an
//! empty set (`Empty`) is distinguishable from an unknown one (`NotFound`).
//!
//! # Concurrency
//!
//! No internal locking. Mutations take `&mut self`; the caller serializes
//! access (normally the transaction layer holds the registry).

use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;

use crate::observability::{Event, Logger, MetricsRegistry};

use super::config::ZSetConfig;
use super::digest::member_digest;
use super::errors::{ZSetError, ZSetResult};
use super::node::Node;
use super::options::ScoreRangeOptions;
use super::skiplist::OrderedIndex;

/// Named sorted sets over records of type `R`.
///
/// `R` is the storage engine's opaque record handle. It is cloned out on
/// reads and never inspected.
#[derive(Debug)]
pub struct SortedSetRegistry<R> {
    config: ZSetConfig,
    sets: HashMap<String, OrderedIndex<R>>,
    logger: Logger,
    metrics: MetricsRegistry,
}

impl<R> Default for SortedSetRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> SortedSetRegistry<R> {
    /// Creates an empty registry with the default configuration.
    pub fn new() -> Self {
        let config = ZSetConfig::default();
        Self {
            logger: Logger::new(config.log_level),
            config,
            sets: HashMap::new(),
            metrics: MetricsRegistry::new(),
        }
    }

    /// Creates an empty registry after validating `config`.
    pub fn with_config(config: ZSetConfig) -> ZSetResult<Self> {
        config.validate()?;
        Ok(Self {
            logger: Logger::new(config.log_level),
            config,
            sets: HashMap::new(),
            metrics: MetricsRegistry::new(),
        })
    }

    /// Creates an empty registry from a JSON configuration file.
    pub fn from_config_file(path: &Path) -> ZSetResult<Self> {
        let registry = Self::with_config(ZSetConfig::load(path)?)?;

        let path = path.display().to_string();
        let max_level = registry.config.max_level.to_string();
        let probability = registry.config.level_probability.to_string();
        registry.logger.event(
            Event::ConfigLoaded,
            &[
                ("path", path.as_str()),
                ("max_level", max_level.as_str()),
                ("level_probability", probability.as_str()),
            ],
        );

        Ok(registry)
    }

    pub fn config(&self) -> &ZSetConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Whether `name` has ever been inserted into.
    pub fn contains_set(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Number of registered sorted sets, empty ones included.
    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    /// Registered names in ascending order.
    pub fn set_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Direct read access to one sorted set.
    pub fn index(&self, name: &str) -> Option<&OrderedIndex<R>> {
        self.sets.get(name)
    }

    /// Insert or update a member, creating the sorted set on first use.
    pub fn add(&mut self, name: &str, score: f64, member: &[u8], record: R) -> ZSetResult<()> {
        if score.is_nan() {
            return Err(ZSetError::InvalidScore(name.to_string()));
        }

        let config = &self.config;
        let mut created = false;
        let index = self.sets.entry(name.to_string()).or_insert_with(|| {
            created = true;
            OrderedIndex::with_config(config)
        });

        let replaced = index.insert(score, member, record);

        if created {
            self.metrics.increment_sets_created();
            self.logger.event(Event::SetCreated, &[("set", name)]);
        }
        if replaced.is_some() {
            self.metrics.increment_members_updated();
            self.logger.event(Event::MemberUpdated, &[("set", name)]);
        } else {
            self.metrics.increment_members_added();
            self.logger.event(Event::MemberAdded, &[("set", name)]);
        }

        Ok(())
    }

    /// Number of members.
    pub fn card(&self, name: &str) -> ZSetResult<usize> {
        Ok(self.lookup(name)?.len())
    }

    /// Number of members `range_by_score` would return.
    pub fn count(
        &self,
        name: &str,
        lo: f64,
        hi: f64,
        opts: &ScoreRangeOptions,
    ) -> ZSetResult<usize> {
        let index = self.lookup(name)?;
        self.metrics.increment_range_queries();
        Ok(index.range_by_score(lo, hi, opts).len())
    }

    /// 1-based ascending rank of a member.
    pub fn rank(&self, name: &str, member: &[u8]) -> ZSetResult<usize> {
        let index = self.lookup(name)?;
        self.metrics.increment_rank_queries();
        match index.rank(member_digest(member)) {
            0 => Err(self.miss(ZSetError::member_not_exist(name))),
            rank => Ok(rank),
        }
    }

    /// 1-based descending rank of a member.
    pub fn rev_rank(&self, name: &str, member: &[u8]) -> ZSetResult<usize> {
        let index = self.lookup(name)?;
        self.metrics.increment_rank_queries();
        match index.rev_rank(member_digest(member)) {
            0 => Err(self.miss(ZSetError::member_not_exist(name))),
            rank => Ok(rank),
        }
    }

    pub fn score(&self, name: &str, member: &[u8]) -> ZSetResult<f64> {
        self.lookup(name)?
            .find_by_value(member)
            .map(Node::score)
            .ok_or_else(|| self.miss(ZSetError::member_not_exist(name)))
    }

    /// Whether a member is present. Never fails with `MemberNotExist`.
    pub fn exists(&self, name: &str, member: &[u8]) -> ZSetResult<bool> {
        Ok(self.lookup(name)?.contains(member_digest(member)))
    }

    /// Delete every member between two ranks (see `OrderedIndex::range_by_rank`).
    ///
    /// The removed entries are not returned; call `remove_range_by_rank_nodes`
    /// first when they are needed.
    pub fn remove_range_by_rank(&mut self, name: &str, start: i64, end: i64) -> ZSetResult<()> {
        let removed = self.lookup_mut(name)?.remove_range_by_rank(start, end);

        self.metrics.add_members_removed(removed.len() as u64);

        let (start, end, count) = (start.to_string(), end.to_string(), removed.len().to_string());
        self.logger.event(
            Event::RangeRemoved,
            &[
                ("set", name),
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("removed", count.as_str()),
            ],
        );

        Ok(())
    }

    /// Nodes a `remove_range_by_rank` call with the same arguments would delete.
    ///
    /// An unknown name yields no nodes rather than an error.
    pub fn remove_range_by_rank_nodes(&self, name: &str, start: i64, end: i64) -> Vec<&Node<R>> {
        self.sets
            .get(name)
            .map(|index| index.range_by_rank(start, end))
            .unwrap_or_default()
    }

    /// Remove a member, returning its record.
    pub fn remove(&mut self, name: &str, member: &[u8]) -> ZSetResult<R> {
        let removed = self.lookup_mut(name)?.delete_by_value(member);
        let node = removed.ok_or_else(|| self.miss(ZSetError::member_not_exist(name)))?;

        self.metrics.add_members_removed(1);
        self.logger.event(Event::MemberRemoved, &[("set", name)]);

        Ok(node.into_record())
    }

    fn lookup(&self, name: &str) -> ZSetResult<&OrderedIndex<R>> {
        self.sets
            .get(name)
            .ok_or_else(|| self.miss(ZSetError::not_found(name)))
    }

    fn lookup_mut(&mut self, name: &str) -> ZSetResult<&mut OrderedIndex<R>> {
        match self.sets.get_mut(name) {
            Some(index) => Ok(index),
            None => {
                self.metrics.increment_misses();
                Err(ZSetError::not_found(name))
            }
        }
    }

    fn miss(&self, err: ZSetError) -> ZSetError {
        self.metrics.increment_misses();
        err
    }
}

impl<R: Clone> SortedSetRegistry<R> {
    pub fn peek_min(&self, name: &str) -> ZSetResult<(R, f64)> {
        let node = self
            .lookup(name)?
            .peek_min()
            .ok_or_else(|| self.miss(ZSetError::empty(name)))?;
        Ok((node.record().clone(), node.score()))
    }

    pub fn peek_max(&self, name: &str) -> ZSetResult<(R, f64)> {
        let node = self
            .lookup(name)?
            .peek_max()
            .ok_or_else(|| self.miss(ZSetError::empty(name)))?;
        Ok((node.record().clone(), node.score()))
    }

    pub fn pop_min(&mut self, name: &str) -> ZSetResult<(R, f64)> {
        let popped = self.lookup_mut(name)?.pop_min();
        self.finish_pop(name, popped)
    }

    pub fn pop_max(&mut self, name: &str) -> ZSetResult<(R, f64)> {
        let popped = self.lookup_mut(name)?.pop_max();
        self.finish_pop(name, popped)
    }

    /// Records and scores with scores between `lo` and `hi`, as parallel vectors.
    pub fn range_by_score(
        &self,
        name: &str,
        lo: f64,
        hi: f64,
        opts: &ScoreRangeOptions,
    ) -> ZSetResult<(Vec<R>, Vec<f64>)> {
        let index = self.lookup(name)?;
        self.metrics.increment_range_queries();
        Ok(split(index.range_by_score(lo, hi, opts)))
    }

    /// Records and scores between two 1-based ranks, as parallel vectors.
    pub fn range_by_rank(&self, name: &str, start: i64, end: i64) -> ZSetResult<(Vec<R>, Vec<f64>)> {
        let index = self.lookup(name)?;
        self.metrics.increment_range_queries();
        Ok(split(index.range_by_rank(start, end)))
    }

    fn finish_pop(&self, name: &str, popped: Option<Node<R>>) -> ZSetResult<(R, f64)> {
        let node = popped.ok_or_else(|| self.miss(ZSetError::empty(name)))?;

        self.metrics.increment_pops();
        self.logger.event(Event::Popped, &[("set", name)]);

        let score = node.score();
        Ok((node.into_record(), score))
    }
}

impl<R: Clone + Eq + Hash> SortedSetRegistry<R> {
    /// Every live record with its score. Members sharing a record collapse.
    pub fn members(&self, name: &str) -> ZSetResult<HashMap<R, f64>> {
        Ok(self
            .lookup(name)?
            .iter()
            .map(|node| (node.record().clone(), node.score()))
            .collect())
    }
}

fn split<R: Clone>(nodes: Vec<&Node<R>>) -> (Vec<R>, Vec<f64>) {
    nodes
        .into_iter()
        .map(|node| (node.record().clone(), node.score()))
        .unzip()
}
