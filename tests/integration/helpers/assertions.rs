//! Running the binary and asserting on its outputs.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Runs the lshclust binary with the given arguments.
pub fn run_lshclust(args: &[&str]) -> ExitStatus {
    Command::new(env!("CARGO_BIN_EXE_lshclust"))
        .args(args)
        .status()
        .expect("Failed to run lshclust")
}

/// Standard argument list for an output prefix inside `dir`.
///
/// Returns the args and the output prefix used.
pub fn cluster_args(
    r1: &Path,
    r2: &Path,
    dir: &Path,
    l: usize,
    m: usize,
    k: usize,
    e: usize,
    t: usize,
    threads: usize,
) -> (Vec<String>, PathBuf) {
    let prefix = dir.join("out_");
    let args = vec![
        "--input-forward".to_string(),
        r1.display().to_string(),
        "--input-reverse".to_string(),
        r2.display().to_string(),
        "--output-prefix".to_string(),
        prefix.display().to_string(),
        "--barcode-length".to_string(),
        l.to_string(),
        "--minimizer-count".to_string(),
        m.to_string(),
        "--kmer-size".to_string(),
        k.to_string(),
        "--error-tolerance".to_string(),
        e.to_string(),
        "--minimizer-threshold".to_string(),
        t.to_string(),
        "--threads".to_string(),
        threads.to_string(),
        "--silent".to_string(),
    ];
    (args, prefix)
}

/// Parses the assignment file into the partition of read ids, one sorted
/// vector per cluster, in cluster-id order.
pub fn read_partition(prefix: &Path) -> Vec<Vec<usize>> {
    let path = PathBuf::from(format!("{}cluster.tsv", prefix.display()));
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to read '{}'", path.display()));

    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for line in content.lines() {
        let mut fields = line.split('\t');
        let cluster_id: usize = fields.next().unwrap().parse().unwrap();
        let read_id: usize = fields.next().unwrap().parse().unwrap();
        if cluster_id == clusters.len() {
            clusters.push(Vec::new());
        }
        clusters[cluster_id].push(read_id);
    }
    clusters
}

/// Reads an output file produced under `prefix` for bytewise comparison.
pub fn output_bytes(prefix: &Path, suffix: &str) -> Vec<u8> {
    let path = PathBuf::from(format!("{}{}", prefix.display(), suffix));
    fs::read(&path).unwrap_or_else(|_| panic!("Failed to read '{}'", path.display()))
}
