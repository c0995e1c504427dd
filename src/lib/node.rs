//! Node deduplication.
//!
//! A *node* is a unique (barcode, minimizers₁, minimizers₂) triple; many
//! reads with byte-identical features fold into one node, which is the unit
//! the clustering graph is built over. The builder records the total
//! read→node function and its inverse as it goes, so reads sharing a node
//! are in the same output cluster by construction.

use std::hash::{Hash, Hasher};

use ahash::AHashMap;

use crate::errors::{ClusterError, Result};
use crate::extract::{ReadFeatures, mix64};

/// Read index in input order.
pub type ReadId = u32;
/// Node index in insertion order.
pub type NodeId = u32;

const MATE_1_SALT: u64 = 0x9e37_79b9_7f4a_7c15;
const MATE_2_SALT: u64 = 0xc2b2_ae3d_27d4_eb4f;

/// The clustering unit: a deduplicated feature triple.
///
/// Equality is position-wise over all three attributes. The hash mixes every
/// element through a 64-bit finalizer with a position salt per mate, so
/// vectors that differ only in element order (or only in which mate carries
/// a value) still spread across buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Length-L barcode tag.
    pub barcode: Vec<u8>,
    /// Mate-1 minimizer vector, exactly M entries.
    pub minimizers_1: Vec<u64>,
    /// Mate-2 minimizer vector, exactly M entries.
    pub minimizers_2: Vec<u64>,
}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(&self.barcode);
        for (i, &m) in self.minimizers_1.iter().enumerate() {
            state.write_u64(mix64(m ^ (i as u64).wrapping_mul(MATE_1_SALT)));
        }
        for (i, &m) in self.minimizers_2.iter().enumerate() {
            state.write_u64(mix64(m ^ (i as u64).wrapping_mul(MATE_2_SALT)));
        }
    }
}

impl From<ReadFeatures> for Node {
    fn from(features: ReadFeatures) -> Self {
        Self {
            barcode: features.barcode,
            minimizers_1: features.minimizers_1,
            minimizers_2: features.minimizers_2,
        }
    }
}

/// The deduplicated node table with both read↔node mappings.
#[derive(Debug)]
pub struct NodeTable {
    /// Unique nodes in insertion order.
    pub nodes: Vec<Node>,
    /// Total function read id → node id.
    pub read_to_node: Vec<NodeId>,
    /// Inverse relation: node id → read ids, each list non-empty and ascending.
    pub node_to_reads: Vec<Vec<ReadId>>,
}

impl NodeTable {
    /// Number of unique nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of reads folded into the table.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.read_to_node.len()
    }
}

/// Incremental builder folding per-read features into unique nodes.
pub struct NodeTableBuilder {
    barcode_length: usize,
    minimizer_count: usize,
    index: AHashMap<Node, NodeId>,
    nodes: Vec<Node>,
    read_to_node: Vec<NodeId>,
    node_to_reads: Vec<Vec<ReadId>>,
}

impl NodeTableBuilder {
    /// Creates a builder that enforces the configured feature lengths.
    #[must_use]
    pub fn new(barcode_length: usize, minimizer_count: usize) -> Self {
        Self {
            barcode_length,
            minimizer_count,
            index: AHashMap::new(),
            nodes: Vec::new(),
            read_to_node: Vec::new(),
            node_to_reads: Vec::new(),
        }
    }

    /// Folds one read's features in, returning the node it mapped to.
    ///
    /// The read id is the number of reads pushed before this one.
    ///
    /// # Errors
    /// A barcode or minimizer vector of the wrong length violates the
    /// extraction contract and aborts the run.
    pub fn push(&mut self, features: ReadFeatures) -> Result<NodeId> {
        if features.barcode.len() != self.barcode_length {
            return Err(ClusterError::ContractViolation {
                reason: format!(
                    "read {} produced a barcode of length {} (expected {})",
                    self.read_to_node.len(),
                    features.barcode.len(),
                    self.barcode_length
                ),
            });
        }
        if features.minimizers_1.len() != self.minimizer_count
            || features.minimizers_2.len() != self.minimizer_count
        {
            return Err(ClusterError::ContractViolation {
                reason: format!(
                    "read {} produced minimizer vectors of lengths {}/{} (expected {})",
                    self.read_to_node.len(),
                    features.minimizers_1.len(),
                    features.minimizers_2.len(),
                    self.minimizer_count
                ),
            });
        }

        let read_id = self.read_to_node.len() as ReadId;
        let node = Node::from(features);
        let node_id = match self.index.get(&node) {
            Some(&id) => id,
            None => {
                let id = self.nodes.len() as NodeId;
                self.index.insert(node.clone(), id);
                self.nodes.push(node);
                self.node_to_reads.push(Vec::new());
                id
            }
        };
        self.read_to_node.push(node_id);
        self.node_to_reads[node_id as usize].push(read_id);
        Ok(node_id)
    }

    /// Finalises the table.
    #[must_use]
    pub fn finish(self) -> NodeTable {
        NodeTable {
            nodes: self.nodes,
            read_to_node: self.read_to_node,
            node_to_reads: self.node_to_reads,
        }
    }
}
