//! Skip list nodes
//!
//! Nodes live in an arena owned by their `OrderedIndex` and refer to each
//! other by `NodeId`. A node detached from the arena (returned by a delete
//! or pop) keeps its score, member and record but no links.

use std::cmp::Ordering;

use super::digest::Digest;

/// Arena slot index of a node.
pub(crate) type NodeId = usize;

/// Forward link at one level.
///
/// `span` counts the level-0 steps the link covers, so summing spans along a
/// descent yields a rank. A link with no successor spans to the end of the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Link {
    pub(crate) next: Option<NodeId>,
    pub(crate) span: usize,
}

/// One live member of a sorted set.
#[derive(Debug, Clone)]
pub struct Node<R> {
    score: f64,
    member: Vec<u8>,
    digest: Digest,
    record: R,
    pub(crate) backward: Option<NodeId>,
    pub(crate) levels: Vec<Link>,
}

impl<R> Node<R> {
    pub(crate) fn new(score: f64, member: Vec<u8>, digest: Digest, record: R, level: usize) -> Self {
        Self {
            score,
            member,
            digest,
            record,
            backward: None,
            levels: vec![Link::default(); level],
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn member(&self) -> &[u8] {
        &self.member
    }

    pub fn digest(&self) -> Digest {
        self.digest
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    /// Consume the node, returning its record.
    pub fn into_record(self) -> R {
        self.record
    }

    /// Number of levels this node participates in.
    pub fn level(&self) -> usize {
        self.levels.len()
    }

    /// Position of this node relative to the key `(score, digest)`.
    pub(crate) fn cmp_key(&self, score: f64, digest: Digest) -> Ordering {
        self.score
            .total_cmp(&score)
            .then_with(|| self.digest.cmp(&digest))
    }

    /// Whether this node orders strictly before `(score, digest)`.
    pub(crate) fn precedes(&self, score: f64, digest: Digest) -> bool {
        self.cmp_key(score, digest) == Ordering::Less
    }

    pub(crate) fn detach(&mut self) {
        self.backward = None;
        self.levels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_has_unlinked_levels() {
        let node = Node::new(1.5, b"m".to_vec(), 9, "rec", 3);
        assert_eq!(node.level(), 3);
        assert!(node.levels.iter().all(|l| l.next.is_none() && l.span == 0));
        assert_eq!(node.backward, None);
        assert_eq!(*node.record(), "rec");
    }

    #[test]
    fn test_ordering_breaks_ties_by_digest() {
        let node = Node::new(3.0, b"b".to_vec(), 10, (), 1);
        assert!(node.precedes(3.0, 11));
        assert!(!node.precedes(3.0, 10));
        assert!(!node.precedes(3.0, 9));
        assert!(node.precedes(4.0, 0));
        assert_eq!(node.cmp_key(3.0, 10), Ordering::Equal);
    }

    #[test]
    fn test_detach_clears_links() {
        let mut node = Node::new(1.0, b"x".to_vec(), 1, 5u64, 2);
        node.backward = Some(4);
        node.levels[0].next = Some(7);
        node.detach();
        assert_eq!(node.level(), 0);
        assert_eq!(node.backward, None);
        assert_eq!(node.into_record(), 5);
    }
}
