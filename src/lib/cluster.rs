//! Pipeline driver: candidate discovery, component extraction, and
//! deterministic cluster ordering.
//!
//! Clustering is a pure function of the node table and the configuration:
//! edge emission order varies across workers, but the edge *set* does not,
//! and the union-find partition is edge-order independent. Clusters are
//! ordered by descending member count with ties broken by ascending smallest
//! read id, so the emitted assignment is byte-identical across runs and
//! thread counts.

use log::{debug, info};

use crate::disjoint_set::DisjointSet;
use crate::errors::{ClusterError, Result};
use crate::logging::format_count;
use crate::lsh::{self, LshParams};
use crate::node::{NodeTable, ReadId};
use crate::validation::{validate_at_most, validate_positive, validate_range};

/// Immutable pipeline configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Barcode tag length L.
    pub barcode_length: usize,
    /// Minimizers per mate M.
    pub minimizer_count: usize,
    /// K-mer size for minimizer extraction.
    pub kmer_size: usize,
    /// Maximum barcode Hamming distance E.
    pub error_tolerance: usize,
    /// Minimum per-mate minimizer agreement T.
    pub minimizer_threshold: usize,
    /// Worker count for the mask loop.
    pub thread_count: usize,
}

impl ClusterConfig {
    /// Checks all parameter ranges and cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        validate_positive(self.barcode_length, "barcode-length")?;
        validate_positive(self.minimizer_count, "minimizer-count")?;
        validate_range(self.kmer_size, 1, 32, "kmer-size")?;
        validate_at_most(
            self.error_tolerance,
            self.barcode_length,
            "error-tolerance",
            "barcode-length",
        )?;
        validate_range(self.minimizer_threshold, 1, self.minimizer_count, "minimizer-threshold")?;
        validate_range(self.thread_count, 1, 8, "threads")?;
        Ok(())
    }
}

/// The result of clustering a node table.
#[derive(Debug)]
pub struct Clustering {
    /// Clusters in emission order; each is the ascending list of read ids.
    pub clusters: Vec<Vec<ReadId>>,
    /// Cluster id assigned to each node.
    pub node_to_cluster: Vec<u32>,
    /// Per-node degree in the verified graph (each unordered pair counted
    /// once).
    pub node_degrees: Vec<u32>,
    /// Verified unique edge count.
    pub edge_count: u64,
}

/// Clusters the node table: LSH candidate discovery and verification over a
/// thread pool of `config.thread_count` workers, then union-find and
/// deterministic cluster ordering.
pub fn cluster_nodes(table: &NodeTable, config: &ClusterConfig) -> Result<Clustering> {
    let node_count = table.node_count();
    let params = LshParams {
        barcode_length: config.barcode_length,
        error_tolerance: config.error_tolerance,
        minimizer_threshold: config.minimizer_threshold,
        thread_count: config.thread_count,
    };

    debug!(
        "Enumerating {} masks over {} nodes with {} workers",
        format_count(lsh::mask_count(config.barcode_length, config.error_tolerance)),
        format_count(node_count as u64),
        config.thread_count
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.thread_count)
        .build()
        .map_err(|e| ClusterError::InvalidParameter {
            parameter: "threads".to_string(),
            reason: e.to_string(),
        })?;
    let edges = pool.install(|| lsh::discover_edges(&table.nodes, &params));
    info!("Verified {} unique edges", format_count(edges.len() as u64));

    let mut node_degrees = vec![0u32; node_count];
    let mut dsu = DisjointSet::new(node_count);
    for &(a, b) in &edges {
        node_degrees[a as usize] += 1;
        node_degrees[b as usize] += 1;
        dsu.union(a, b);
    }

    // Components in first-seen node order
    let mut component_of_root = vec![u32::MAX; node_count];
    let mut components: Vec<Vec<u32>> = Vec::new();
    for node in 0..node_count as u32 {
        let root = dsu.find(node) as usize;
        if component_of_root[root] == u32::MAX {
            component_of_root[root] = components.len() as u32;
            components.push(Vec::new());
        }
        components[component_of_root[root] as usize].push(node);
    }

    // Expand each component to its sorted read ids
    let mut clusters: Vec<(Vec<ReadId>, Vec<u32>)> = components
        .into_iter()
        .map(|nodes| {
            let mut reads: Vec<ReadId> = nodes
                .iter()
                .flat_map(|&n| table.node_to_reads[n as usize].iter().copied())
                .collect();
            reads.sort_unstable();
            (reads, nodes)
        })
        .collect();

    // Emission order: descending size, then ascending smallest read id.
    // Every cluster is non-empty, so first() is always present.
    clusters.sort_by_key(|(reads, _)| (std::cmp::Reverse(reads.len()), reads[0]));

    let mut node_to_cluster = vec![0u32; node_count];
    for (cluster_id, (_, nodes)) in clusters.iter().enumerate() {
        for &node in nodes {
            node_to_cluster[node as usize] = cluster_id as u32;
        }
    }

    Ok(Clustering {
        clusters: clusters.into_iter().map(|(reads, _)| reads).collect(),
        node_to_cluster,
        node_degrees,
        edge_count: edges.len() as u64,
    })
}
