//! Barcode LSH candidate generation and minimizer verification.
//!
//! Two barcodes within Hamming distance E share at least one mask that hides
//! every differing position, so bucketing nodes by masked barcode under all
//! `C(L, E)` masks enumerates every such pair at least once. Candidate pairs
//! are verified immediately by position-wise minimizer agreement on both
//! mates; only verified pairs become edges.
//!
//! Masks are independent, so the mask loop is parallel: worker `r` of
//! `thread_count` processes the masks whose enumeration index is congruent
//! to `r`, accumulating edges in a worker-owned buffer. Each mask's bucket
//! dictionary is dropped before the next mask is processed, bounding the
//! per-worker working set. The merge phase concatenates the worker buffers,
//! then sorts and deduplicates, so every downstream consumer sees each
//! unordered pair exactly once.

use ahash::AHashMap;
use rayon::prelude::*;

use crate::node::{Node, NodeId};

/// Character standing in for hidden barcode positions. Not part of the
/// nucleotide alphabet, so a masked position can never collide with a real
/// base.
pub const MASK_SENTINEL: u8 = b'#';

/// Parameters of the candidate generation phase.
#[derive(Debug, Clone)]
pub struct LshParams {
    /// Barcode length L.
    pub barcode_length: usize,
    /// Maximum barcode Hamming distance E.
    pub error_tolerance: usize,
    /// Minimum position-wise minimizer agreement T, required on both mates.
    pub minimizer_threshold: usize,
    /// Worker count; masks are partitioned by enumeration index modulo this.
    pub thread_count: usize,
}

/// Lazy enumeration of all size-E subsets of barcode positions, in
/// lexicographic order. Each item is the sorted list of *hidden* positions.
pub struct MaskIter {
    length: usize,
    next: Option<Vec<usize>>,
}

impl MaskIter {
    /// Enumerates the `C(length, hidden)` masks hiding exactly `hidden`
    /// positions of a length-`length` barcode.
    #[must_use]
    pub fn new(length: usize, hidden: usize) -> Self {
        let next = (hidden <= length).then(|| (0..hidden).collect());
        Self { length, next }
    }
}

impl Iterator for MaskIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let k = current.len();

        // Lexicographic successor: bump the rightmost position that still
        // has room, then repack everything after it.
        let mut successor = current.clone();
        let mut i = k;
        while i > 0 {
            i -= 1;
            if successor[i] < self.length - k + i {
                successor[i] += 1;
                for j in i + 1..k {
                    successor[j] = successor[j - 1] + 1;
                }
                self.next = Some(successor);
                return Some(current);
            }
        }
        // current was the last combination (or the single empty mask)
        Some(current)
    }
}

/// Number of masks, `C(length, hidden)`, saturating at `u64::MAX`.
#[must_use]
pub fn mask_count(length: usize, hidden: usize) -> u64 {
    if hidden > length {
        return 0;
    }
    let mut result: u128 = 1;
    for i in 0..hidden {
        result = result * (length - i) as u128 / (i as u128 + 1);
        if result > u128::from(u64::MAX) {
            return u64::MAX;
        }
    }
    u64::try_from(result).unwrap_or(u64::MAX)
}

/// Returns `barcode` with the hidden positions replaced by [`MASK_SENTINEL`].
#[must_use]
pub fn mask_barcode(barcode: &[u8], hidden: &[usize]) -> Vec<u8> {
    let mut masked = barcode.to_vec();
    for &position in hidden {
        masked[position] = MASK_SENTINEL;
    }
    masked
}

/// Character-wise Hamming distance between equal-length strings.
#[must_use]
pub fn hamming_distance(a: &[u8], b: &[u8]) -> usize {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

/// Position-wise equal-minimizer count between two vectors.
///
/// Positions where both windows produced no minimizer compare equal, the
/// same as any other pair of equal fingerprints.
#[must_use]
pub fn minimizer_agreement(a: &[u64], b: &[u64]) -> usize {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).filter(|(x, y)| x == y).count()
}

/// Whether a candidate pair survives minimizer verification: agreement of at
/// least `threshold` on mate 1 AND on mate 2.
#[must_use]
pub fn pair_verified(a: &Node, b: &Node, threshold: usize) -> bool {
    minimizer_agreement(&a.minimizers_1, &b.minimizers_1) >= threshold
        && minimizer_agreement(&a.minimizers_2, &b.minimizers_2) >= threshold
}

/// Enumerates and verifies all candidate edges.
///
/// Returns the verified edge set as `(a, b)` pairs with `a < b`, sorted and
/// deduplicated. Runs on the current rayon thread pool; callers control
/// parallelism by installing a pool sized to `params.thread_count`.
#[must_use]
pub fn discover_edges(nodes: &[Node], params: &LshParams) -> Vec<(NodeId, NodeId)> {
    let thread_count = params.thread_count.max(1);

    let per_worker: Vec<Vec<(NodeId, NodeId)>> = (0..thread_count)
        .into_par_iter()
        .map(|residue| worker_edges(nodes, params, residue, thread_count))
        .collect();

    let mut edges: Vec<(NodeId, NodeId)> = per_worker.into_iter().flatten().collect();
    edges.sort_unstable();
    edges.dedup();
    edges
}

/// Edge discovery for one residue class of masks.
fn worker_edges(
    nodes: &[Node],
    params: &LshParams,
    residue: usize,
    thread_count: usize,
) -> Vec<(NodeId, NodeId)> {
    let mut edges = Vec::new();

    for (mask_index, hidden) in
        MaskIter::new(params.barcode_length, params.error_tolerance).enumerate()
    {
        if mask_index % thread_count != residue {
            continue;
        }

        // The dictionary lives only for this mask.
        let mut buckets: AHashMap<Vec<u8>, Vec<NodeId>> = AHashMap::new();
        for (id, node) in nodes.iter().enumerate() {
            buckets.entry(mask_barcode(&node.barcode, &hidden)).or_default().push(id as NodeId);
        }

        for bucket in buckets.values() {
            if bucket.len() < 2 {
                continue;
            }
            // Node ids are ascending within a bucket, so a < b holds.
            for (i, &a) in bucket.iter().enumerate() {
                for &b in &bucket[i + 1..] {
                    debug_assert!(
                        hamming_distance(
                            &nodes[a as usize].barcode,
                            &nodes[b as usize].barcode
                        ) <= params.error_tolerance
                    );
                    if pair_verified(
                        &nodes[a as usize],
                        &nodes[b as usize],
                        params.minimizer_threshold,
                    ) {
                        edges.push((a, b));
                    }
                }
            }
        }
    }
    edges
}
