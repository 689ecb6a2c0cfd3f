//! Sorted-Set Invariant Tests
//!
//! Tests for ordering and rank invariants:
//! - Forward scans are ordered by score, ties by digest
//! - Rank, reverse rank and rank ranges agree
//! - Updates replace, deletes remove exactly one member
//! - Score and rank range boundaries

use aerodb_zset::observability::Severity;
use aerodb_zset::{member_digest, ScoreRangeOptions, SortedSetRegistry, ZSetConfig, ZSetError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// Helper Functions
// =============================================================================

fn quiet_registry(seed: u64) -> SortedSetRegistry<u64> {
    SortedSetRegistry::with_config(ZSetConfig {
        seed: Some(seed),
        log_level: Severity::Warn,
        ..Default::default()
    })
    .unwrap()
}

fn member(i: u64) -> Vec<u8> {
    format!("member:{}", i).into_bytes()
}

/// Registry with `n` random-score members in set "k"; record i belongs to member i.
fn random_set(n: u64, seed: u64) -> SortedSetRegistry<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut registry = quiet_registry(seed);
    for i in 0..n {
        let score = rng.gen_range(-20..20) as f64;
        registry.add("k", score, &member(i), i).unwrap();
    }
    registry
}

// =============================================================================
// Order Invariant
// =============================================================================

/// Full forward scan yields non-decreasing scores, ties in ascending digest order.
#[test]
fn test_forward_scan_is_totally_ordered() {
    for seed in 0..5 {
        let registry = random_set(300, seed);
        let index = registry.index("k").unwrap();

        let keys: Vec<(f64, u32)> = index.iter().map(|n| (n.score(), n.digest())).collect();
        assert_eq!(keys.len(), 300);
        for pair in keys.windows(2) {
            let ((s1, d1), (s2, d2)) = (pair[0], pair[1]);
            assert!(s1 < s2 || (s1 == s2 && d1 < d2), "out of order: {:?}", pair);
        }
    }
}

/// Order survives interleaved updates and removals.
#[test]
fn test_order_after_updates_and_removals() {
    let mut registry = random_set(200, 9);
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..300 {
        let i = rng.gen_range(0..200u64);
        if rng.gen_bool(0.5) {
            registry
                .add("k", rng.gen_range(-5..5) as f64, &member(i), i + 1000)
                .unwrap();
        } else {
            let _ = registry.remove("k", &member(i));
        }
    }

    let (_, scores) = registry.range_by_rank("k", 1, -1).unwrap();
    assert_eq!(scores.len(), registry.card("k").unwrap());
    assert!(scores.windows(2).all(|w| w[0] <= w[1]));
}

// =============================================================================
// Rank / Count Consistency
// =============================================================================

/// rank(m) equals m's 1-based position in range_by_rank(1, count).
#[test]
fn test_rank_matches_position() {
    let registry = random_set(150, 4);
    let card = registry.card("k").unwrap() as i64;
    let (records, _) = registry.range_by_rank("k", 1, card).unwrap();

    for (position, record) in records.iter().enumerate() {
        let rank = registry.rank("k", &member(*record)).unwrap();
        assert_eq!(rank, position + 1);
    }
}

/// rev_rank(m) + rank(m) == count + 1.
#[test]
fn test_rank_plus_rev_rank() {
    let registry = random_set(120, 5);
    let card = registry.card("k").unwrap();

    for i in 0..120 {
        let rank = registry.rank("k", &member(i)).unwrap();
        let rev = registry.rev_rank("k", &member(i)).unwrap();
        assert_eq!(rank + rev, card + 1);
    }
}

/// get_by_rank inverts rank for every member.
#[test]
fn test_get_by_rank_inverts_rank() {
    let registry = random_set(100, 6);
    let index = registry.index("k").unwrap();

    for i in 0..100 {
        let digest = member_digest(&member(i));
        let node = index.get_by_rank(index.rank(digest)).unwrap();
        assert_eq!(node.digest(), digest);
        assert_eq!(*node.record(), i);
    }
}

// =============================================================================
// Update and Delete
// =============================================================================

/// Re-adding a member keeps one entry with the new score and record.
#[test]
fn test_round_trip_update() {
    let mut registry = quiet_registry(1);
    registry.add("k", 1.0, b"v", 1).unwrap();
    registry.add("k", 2.0, b"v", 2).unwrap();

    assert_eq!(registry.card("k").unwrap(), 1);
    assert_eq!(registry.score("k", b"v").unwrap(), 2.0);
    assert_eq!(registry.peek_min("k").unwrap(), (2, 2.0));
    assert_eq!(registry.members("k").unwrap().get(&2), Some(&2.0));
    assert!(registry.members("k").unwrap().get(&1).is_none());
}

/// Remove drops exactly one member; a second remove fails.
#[test]
fn test_delete_correctness() {
    let mut registry = random_set(10, 2);
    let before = registry.card("k").unwrap();

    assert_eq!(registry.remove("k", &member(3)).unwrap(), 3);
    assert!(!registry.exists("k", &member(3)).unwrap());
    assert_eq!(registry.card("k").unwrap(), before - 1);
    assert_eq!(
        registry.remove("k", &member(3)),
        Err(ZSetError::MemberNotExist("k".to_string()))
    );
}

// =============================================================================
// Range Boundaries
// =============================================================================

/// Exclusive start, inclusive end over {1,2,3} with bounds (1,3] yields {2,3}.
#[test]
fn test_range_boundary_exclusive_start() {
    let mut registry = quiet_registry(1);
    for i in 1..=3u64 {
        registry.add("k", i as f64, &member(i), i).unwrap();
    }

    let opts = ScoreRangeOptions::new().exclusive_start(true);
    let (records, scores) = registry.range_by_score("k", 1.0, 3.0, &opts).unwrap();
    assert_eq!(records, vec![2, 3]);
    assert_eq!(scores, vec![2.0, 3.0]);
    assert_eq!(registry.count("k", 1.0, 3.0, &opts).unwrap(), 2);
}

/// Reverse scans mirror forward scans.
#[test]
fn test_reverse_range_mirrors_forward() {
    let registry = random_set(80, 12);
    let forward = ScoreRangeOptions::new();
    let reverse = ScoreRangeOptions::new().reverse(true);

    let (mut fwd, _) = registry.range_by_score("k", -10.0, 10.0, &forward).unwrap();
    let (rev, _) = registry.range_by_score("k", -10.0, 10.0, &reverse).unwrap();
    fwd.reverse();
    assert_eq!(fwd, rev);
}

/// Offset and limit page through a range without gaps or overlap.
#[test]
fn test_paging_covers_range() {
    let registry = random_set(90, 13);
    let (all, _) = registry
        .range_by_score("k", f64::NEG_INFINITY, f64::INFINITY, &ScoreRangeOptions::new())
        .unwrap();

    let mut paged = Vec::new();
    let mut offset = 0;
    loop {
        let opts = ScoreRangeOptions::new().offset(offset).limit(7);
        let (page, _) = registry
            .range_by_score("k", f64::NEG_INFINITY, f64::INFINITY, &opts)
            .unwrap();
        if page.is_empty() {
            break;
        }
        offset += page.len();
        paged.extend(page);
    }

    assert_eq!(paged, all);
}

/// range_by_rank(-2, -1) on five members returns the 4th and 5th.
#[test]
fn test_negative_rank_resolution() {
    let mut registry = quiet_registry(1);
    for i in [5u64, 3, 1, 4, 2] {
        registry.add("k", i as f64, &member(i), i).unwrap();
    }

    let (records, scores) = registry.range_by_rank("k", -2, -1).unwrap();
    assert_eq!(records, vec![4, 5]);
    assert_eq!(scores, vec![4.0, 5.0]);
}
