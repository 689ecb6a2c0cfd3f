//! Rank-augmented skip list
//!
//! Nodes are kept in strict `(score, digest)` order. Every forward link
//! records how many level-0 steps it covers, so rank lookups and rank ranges
//! cost O(log n) expected. A digest table gives O(1) membership lookups.
//!
//! # Invariants
//!
//! - `dict.len() == length == nodes reachable on level 0`
//! - Summing spans from the header to a node yields its 1-based rank
//! - A link with no successor spans the remaining nodes after its owner
//! - `level` is the highest level with at least one node (minimum 1)

use std::collections::HashMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{ZSetConfig, MAX_LEVEL_LIMIT};
use super::digest::{member_digest, Digest};
use super::node::{Link, Node, NodeId};
use super::options::ScoreRangeOptions;

/// Random level assignment for new nodes.
struct LevelGenerator {
    rng: StdRng,
    max_level: usize,
    probability: f64,
}

impl LevelGenerator {
    fn new(config: &ZSetConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            max_level: config.max_level.clamp(1, MAX_LEVEL_LIMIT),
            probability: config.level_probability,
        }
    }

    fn next_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.gen::<f64>() < self.probability {
            level += 1;
        }
        level
    }
}

/// Skip list holding the members of one sorted set.
pub struct OrderedIndex<R> {
    /// Header links, one per possible level
    head: Vec<Link>,
    /// Node arena; vacant slots are listed in `free`
    slots: Vec<Option<Node<R>>>,
    free: Vec<NodeId>,
    /// Digest -> node lookup table
    dict: HashMap<Digest, NodeId>,
    tail: Option<NodeId>,
    level: usize,
    length: usize,
    levels: LevelGenerator,
}

impl<R> Default for OrderedIndex<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: fmt::Debug> fmt::Debug for OrderedIndex<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedIndex")
            .field("length", &self.length)
            .field("level", &self.level)
            .field("nodes", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<R> OrderedIndex<R> {
    /// Creates an empty index with default level parameters.
    pub fn new() -> Self {
        Self::with_config(&ZSetConfig::default())
    }

    /// Creates an empty index using the level parameters of `config`.
    pub fn with_config(config: &ZSetConfig) -> Self {
        let levels = LevelGenerator::new(config);
        Self {
            head: vec![Link::default(); levels.max_level],
            slots: Vec::new(),
            free: Vec::new(),
            dict: HashMap::new(),
            tail: None,
            level: 1,
            length: 0,
            levels,
        }
    }

    /// Number of live members.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Insert a member, replacing any member with the same digest.
    ///
    /// Returns the replaced node, if any. A replacement is a delete followed
    /// by a fresh insert because the new score decides the position.
    pub fn insert(&mut self, score: f64, member: &[u8], record: R) -> Option<Node<R>> {
        let digest = member_digest(member);
        self.insert_with_digest(score, member.to_vec(), digest, record)
    }

    pub(crate) fn insert_with_digest(
        &mut self,
        score: f64,
        member: Vec<u8>,
        digest: Digest,
        record: R,
    ) -> Option<Node<R>> {
        // -0.0 and 0.0 must share a position under total_cmp
        let score = if score == 0.0 { 0.0 } else { score };

        let replaced = self.delete(digest);

        let (mut update, mut rank) = self.predecessors(score, digest);

        let level = self.levels.next_level();
        if level > self.level {
            for i in self.level..level {
                rank[i] = 0;
                update[i] = None;
                self.head[i] = Link {
                    next: None,
                    span: self.length,
                };
            }
            self.level = level;
        }

        let id = self.allocate();
        let mut node = Node::new(score, member, digest, record, level);

        for i in 0..level {
            let covered = rank[0] - rank[i];
            let prev = self.link_mut(update[i], i);
            node.levels[i] = Link {
                next: prev.next,
                span: prev.span - covered,
            };
            *prev = Link {
                next: Some(id),
                span: covered + 1,
            };
        }

        // Levels above the new node now jump over one more node
        for i in level..self.level {
            self.link_mut(update[i], i).span += 1;
        }

        node.backward = update[0];
        match node.levels[0].next {
            Some(next) => self.node_mut(next).backward = Some(id),
            None => self.tail = Some(id),
        }

        self.slots[id] = Some(node);
        self.dict.insert(digest, id);
        self.length += 1;

        replaced
    }

    /// Delete the member with `digest`, returning the detached node.
    ///
    /// Returns `None` if no member has this digest.
    pub fn delete(&mut self, digest: Digest) -> Option<Node<R>> {
        let id = *self.dict.get(&digest)?;
        let (score, node_digest) = {
            let node = self.node(id);
            (node.score(), node.digest())
        };

        let (update, _) = self.predecessors(score, node_digest);
        let mut node = self.slots[id].take()?;

        for i in 0..self.level {
            let link = self.link_mut(update[i], i);
            if link.next == Some(id) {
                link.span = link.span + node.levels[i].span - 1;
                link.next = node.levels[i].next;
            } else {
                link.span -= 1;
            }
        }

        match node.levels[0].next {
            Some(next) => self.node_mut(next).backward = node.backward,
            None => self.tail = node.backward,
        }

        while self.level > 1 && self.head[self.level - 1].next.is_none() {
            self.head[self.level - 1] = Link::default();
            self.level -= 1;
        }

        self.dict.remove(&digest);
        self.free.push(id);
        self.length -= 1;

        node.detach();
        Some(node)
    }

    /// Delete a member by value. Subject to digest collisions.
    pub fn delete_by_value(&mut self, member: &[u8]) -> Option<Node<R>> {
        self.delete(member_digest(member))
    }

    /// O(1) lookup by digest.
    pub fn find_by_digest(&self, digest: Digest) -> Option<&Node<R>> {
        self.dict.get(&digest).map(|&id| self.node(id))
    }

    /// Lookup by value. Subject to digest collisions.
    pub fn find_by_value(&self, member: &[u8]) -> Option<&Node<R>> {
        self.find_by_digest(member_digest(member))
    }

    pub fn contains(&self, digest: Digest) -> bool {
        self.dict.contains_key(&digest)
    }

    /// 1-based ascending rank of the member with `digest`, or 0 if absent.
    pub fn rank(&self, digest: Digest) -> usize {
        let Some(&id) = self.dict.get(&digest) else {
            return 0;
        };
        let target = self.node(id);
        let (score, digest) = (target.score(), target.digest());

        let mut rank = 0;
        let mut x = None;
        for i in (0..self.level).rev() {
            loop {
                let link = self.link(x, i);
                match link.next {
                    Some(next) if !self.node(next).cmp_key(score, digest).is_gt() => {
                        rank += link.span;
                        x = Some(next);
                    }
                    _ => break,
                }
            }
            if x == Some(id) {
                return rank;
            }
        }
        0
    }

    /// 1-based descending rank of the member with `digest`, or 0 if absent.
    pub fn rev_rank(&self, digest: Digest) -> usize {
        match self.rank(digest) {
            0 => 0,
            rank => self.length + 1 - rank,
        }
    }

    /// Node at a 1-based ascending rank.
    pub fn get_by_rank(&self, rank: usize) -> Option<&Node<R>> {
        self.id_at_rank(rank).map(|id| self.node(id))
    }

    /// Nodes with scores between `lo` and `hi`, shaped by `opts`.
    pub fn range_by_score(&self, lo: f64, hi: f64, opts: &ScoreRangeOptions) -> Vec<&Node<R>> {
        if self.length == 0 || opts.limit == Some(0) || opts.is_empty_interval(lo, hi) {
            return Vec::new();
        }

        let limit = opts.limit.unwrap_or(usize::MAX);
        let mut nodes = Vec::new();
        let mut skipped = 0;

        let mut cursor = if opts.reverse {
            self.last_below_upper(hi, opts)
        } else {
            self.first_above_lower(lo, opts)
        };

        while let Some(id) = cursor {
            let node = self.node(id);
            let in_range = if opts.reverse {
                opts.above_lower(node.score(), lo)
            } else {
                opts.below_upper(node.score(), hi)
            };
            if !in_range {
                break;
            }

            if skipped < opts.offset {
                skipped += 1;
            } else {
                nodes.push(node);
                if nodes.len() >= limit {
                    break;
                }
            }

            cursor = if opts.reverse {
                node.backward
            } else {
                node.levels[0].next
            };
        }

        nodes
    }

    /// Nodes between two 1-based ranks, both inclusive.
    ///
    /// Negative ranks count from the tail (-1 is the last node). Resolved
    /// ranks are clamped into `[1, len]`; an empty range yields no nodes.
    pub fn range_by_rank(&self, start: i64, end: i64) -> Vec<&Node<R>> {
        self.rank_range_ids(start, end)
            .into_iter()
            .map(|id| self.node(id))
            .collect()
    }

    /// Delete the nodes `range_by_rank(start, end)` would return.
    ///
    /// The target set is fixed before the first deletion.
    pub fn remove_range_by_rank(&mut self, start: i64, end: i64) -> Vec<Node<R>> {
        let digests: Vec<Digest> = self
            .rank_range_ids(start, end)
            .into_iter()
            .map(|id| self.node(id).digest())
            .collect();

        digests.into_iter().filter_map(|d| self.delete(d)).collect()
    }

    /// Lowest-ordered node.
    pub fn peek_min(&self) -> Option<&Node<R>> {
        self.head[0].next.map(|id| self.node(id))
    }

    /// Highest-ordered node.
    pub fn peek_max(&self) -> Option<&Node<R>> {
        self.tail.map(|id| self.node(id))
    }

    pub fn pop_min(&mut self) -> Option<Node<R>> {
        let digest = self.peek_min()?.digest();
        self.delete(digest)
    }

    pub fn pop_max(&mut self) -> Option<Node<R>> {
        let digest = self.peek_max()?.digest();
        self.delete(digest)
    }

    /// Ascending iterator over all nodes.
    pub fn iter(&self) -> Iter<'_, R> {
        Iter {
            index: self,
            cursor: self.head[0].next,
            remaining: self.length,
        }
    }

    // =========================================================================
    // Arena and traversal helpers
    // =========================================================================

    fn allocate(&mut self) -> NodeId {
        match self.free.pop() {
            Some(id) => id,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        }
    }

    fn node(&self, id: NodeId) -> &Node<R> {
        match self.slots.get(id) {
            Some(Some(node)) => node,
            _ => panic!("skip list link to vacant slot {}", id),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<R> {
        match self.slots.get_mut(id) {
            Some(Some(node)) => node,
            _ => panic!("skip list link to vacant slot {}", id),
        }
    }

    /// Link leaving `at` (the header when `None`) on `level`.
    fn link(&self, at: Option<NodeId>, level: usize) -> Link {
        match at {
            None => self.head[level],
            Some(id) => self.node(id).levels[level],
        }
    }

    fn link_mut(&mut self, at: Option<NodeId>, level: usize) -> &mut Link {
        match at {
            None => &mut self.head[level],
            Some(id) => &mut self.node_mut(id).levels[level],
        }
    }

    /// Per-level last node ordered before `(score, digest)`, with its rank.
    ///
    /// Both vectors are sized to the maximum level so an insert can raise
    /// the list height in place.
    fn predecessors(&self, score: f64, digest: Digest) -> (Vec<Option<NodeId>>, Vec<usize>) {
        let mut update = vec![None; self.head.len()];
        let mut rank = vec![0; self.head.len()];

        let mut x = None;
        for i in (0..self.level).rev() {
            rank[i] = if i + 1 == self.level { 0 } else { rank[i + 1] };
            loop {
                let link = self.link(x, i);
                match link.next {
                    Some(next) if self.node(next).precedes(score, digest) => {
                        rank[i] += link.span;
                        x = Some(next);
                    }
                    _ => break,
                }
            }
            update[i] = x;
        }

        (update, rank)
    }

    fn id_at_rank(&self, rank: usize) -> Option<NodeId> {
        if rank == 0 || rank > self.length {
            return None;
        }

        let mut traversed = 0;
        let mut x = None;
        for i in (0..self.level).rev() {
            loop {
                let link = self.link(x, i);
                match link.next {
                    Some(next) if traversed + link.span <= rank => {
                        traversed += link.span;
                        x = Some(next);
                    }
                    _ => break,
                }
            }
            if traversed == rank {
                return x;
            }
        }
        None
    }

    fn resolve_rank_range(&self, start: i64, end: i64) -> Option<(usize, usize)> {
        let len = i64::try_from(self.length).ok()?;
        if len == 0 {
            return None;
        }

        let resolve = |rank: i64| if rank < 0 { len + rank + 1 } else { rank };
        let start = resolve(start).max(1);
        let end = resolve(end).clamp(1, len);
        if start > end {
            return None;
        }

        Some((start as usize, end as usize))
    }

    fn rank_range_ids(&self, start: i64, end: i64) -> Vec<NodeId> {
        let Some((start, end)) = self.resolve_rank_range(start, end) else {
            return Vec::new();
        };

        let wanted = end - start + 1;
        let mut ids = Vec::with_capacity(wanted);
        let mut cursor = self.id_at_rank(start);
        while let Some(id) = cursor {
            if ids.len() == wanted {
                break;
            }
            ids.push(id);
            cursor = self.node(id).levels[0].next;
        }
        ids
    }

    fn first_above_lower(&self, lo: f64, opts: &ScoreRangeOptions) -> Option<NodeId> {
        let mut x = None;
        for i in (0..self.level).rev() {
            while let Some(next) = self.link(x, i).next {
                if opts.above_lower(self.node(next).score(), lo) {
                    break;
                }
                x = Some(next);
            }
        }
        self.link(x, 0).next
    }

    fn last_below_upper(&self, hi: f64, opts: &ScoreRangeOptions) -> Option<NodeId> {
        let mut x = None;
        for i in (0..self.level).rev() {
            while let Some(next) = self.link(x, i).next {
                if !opts.below_upper(self.node(next).score(), hi) {
                    break;
                }
                x = Some(next);
            }
        }
        x
    }
}

/// Ascending iterator over the nodes of an `OrderedIndex`.
pub struct Iter<'a, R> {
    index: &'a OrderedIndex<R>,
    cursor: Option<NodeId>,
    remaining: usize,
}

impl<'a, R> Iterator for Iter<'a, R> {
    type Item = &'a Node<R>;

    fn next(&mut self) -> Option<Self::Item> {
        let index: &'a OrderedIndex<R> = self.index;
        let node = index.node(self.cursor?);
        self.cursor = node.levels[0].next;
        self.remaining -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R> ExactSizeIterator for Iter<'_, R> {}

impl<'a, R> IntoIterator for &'a OrderedIndex<R> {
    type Item = &'a Node<R>;
    type IntoIter = Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
