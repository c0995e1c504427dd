//! End-to-end clustering scenarios.
//!
//! Read pairs are generated with controlled barcodes and homopolymer
//! windows (see `helpers::fastq_generator`), so the expected partition of
//! every scenario is known exactly.

use tempfile::TempDir;

use crate::helpers::{cluster_args, output_bytes, pair, read_partition, run_lshclust, write_paired_fastq};

fn run(args: &[String]) {
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let status = run_lshclust(&arg_refs);
    assert!(status.success(), "lshclust failed");
}

#[test]
fn test_identical_pairs_form_one_cluster() {
    let dir = TempDir::new().unwrap();
    let (r1, r2) = write_paired_fastq(
        dir.path(),
        &[
            pair("r0", "AA", "AC", "AA", "CA"),
            pair("r1", "AA", "AC", "AA", "CA"),
        ],
    );

    let (args, prefix) = cluster_args(&r1, &r2, dir.path(), 4, 2, 3, 0, 2, 1);
    run(&args);
    assert_eq!(read_partition(&prefix), vec![vec![0, 1]]);
}

#[test]
fn test_one_barcode_mismatch_joins_distant_barcode_stays() {
    let dir = TempDir::new().unwrap();
    let (r1, r2) = write_paired_fastq(
        dir.path(),
        &[
            pair("r0", "AA", "AC", "AA", "CA"), // barcode AAAA
            pair("r1", "AA", "AC", "AT", "CA"), // barcode AAAT
            pair("r2", "TT", "AC", "TT", "CA"), // barcode TTTT
        ],
    );

    let (args, prefix) = cluster_args(&r1, &r2, dir.path(), 4, 2, 3, 1, 2, 1);
    run(&args);
    assert_eq!(read_partition(&prefix), vec![vec![0, 1], vec![2]]);
}

#[test]
fn test_minimizer_disagreement_keeps_reads_apart() {
    let dir = TempDir::new().unwrap();
    let (r1, r2) = write_paired_fastq(
        dir.path(),
        &[
            pair("r0", "AA", "AC", "AA", "CA"), // barcode AAAA
            pair("r1", "AA", "AA", "AT", "CA"), // barcode AAAT, mate-1 window 1 differs
        ],
    );

    // Barcodes are within tolerance but mate-1 agreement is 1 < 2
    let (args, prefix) = cluster_args(&r1, &r2, dir.path(), 4, 2, 3, 1, 2, 1);
    run(&args);
    assert_eq!(read_partition(&prefix), vec![vec![0], vec![1]]);
}

#[test]
fn test_transitive_chain_clusters_together() {
    let dir = TempDir::new().unwrap();
    let (r1, r2) = write_paired_fastq(
        dir.path(),
        &[
            pair("r0", "AA", "A", "AA", "C"), // barcode AAAA
            pair("r1", "AA", "A", "AT", "C"), // barcode AAAT
            pair("r2", "AA", "A", "TT", "C"), // barcode AATT
        ],
    );

    // r0-r1 and r1-r2 are within distance 1; r0-r2 is not, but the chain
    // still pulls all three together.
    let (args, prefix) = cluster_args(&r1, &r2, dir.path(), 4, 1, 3, 1, 1, 1);
    run(&args);
    assert_eq!(read_partition(&prefix), vec![vec![0, 1, 2]]);
}

#[test]
fn test_hamming_two_with_one_shared_minimizer_per_mate() {
    let dir = TempDir::new().unwrap();
    let (r1, r2) = write_paired_fastq(
        dir.path(),
        &[
            pair("r0", "AA", "AC", "AA", "CC"), // barcode AAAA
            pair("r1", "AA", "AA", "TT", "CA"), // barcode AATT
        ],
    );

    // Hamming distance 2 with one agreeing window per mate
    let (args, prefix) = cluster_args(&r1, &r2, dir.path(), 4, 2, 3, 2, 1, 1);
    run(&args);
    assert_eq!(read_partition(&prefix), vec![vec![0, 1]]);
}

#[test]
fn test_outputs_are_identical_across_thread_counts() {
    let pairs = || {
        vec![
            pair("r0", "AA", "A", "AA", "C"),
            pair("r1", "AA", "A", "AT", "C"),
            pair("r2", "AA", "A", "TT", "C"),
            pair("r3", "GG", "A", "GG", "C"),
        ]
    };

    let dir_single = TempDir::new().unwrap();
    let (r1, r2) = write_paired_fastq(dir_single.path(), &pairs());
    let (args, prefix_single) = cluster_args(&r1, &r2, dir_single.path(), 4, 1, 3, 1, 1, 1);
    run(&args);

    let dir_parallel = TempDir::new().unwrap();
    let (r1, r2) = write_paired_fastq(dir_parallel.path(), &pairs());
    let (args, prefix_parallel) = cluster_args(&r1, &r2, dir_parallel.path(), 4, 1, 3, 1, 1, 8);
    run(&args);

    assert_eq!(
        output_bytes(&prefix_single, "cluster.tsv"),
        output_bytes(&prefix_parallel, "cluster.tsv")
    );
    assert_eq!(
        output_bytes(&prefix_single, "cluster.node.log"),
        output_bytes(&prefix_parallel, "cluster.node.log")
    );
}

#[test]
fn test_node_log_shape() {
    let dir = TempDir::new().unwrap();
    let (r1, r2) = write_paired_fastq(
        dir.path(),
        &[
            pair("r0", "AA", "AC", "AA", "CA"),
            pair("r1", "AA", "AC", "AA", "CA"), // same node as r0
            pair("r2", "CC", "AC", "CC", "CA"),
        ],
    );

    let (args, prefix) = cluster_args(&r1, &r2, dir.path(), 4, 2, 3, 1, 2, 1);
    run(&args);

    let node_log = String::from_utf8(output_bytes(&prefix, "cluster.node.log")).unwrap();
    let mut lines = node_log.lines();
    assert!(lines.next().unwrap().starts_with("#node_id"));

    let records: Vec<Vec<&str>> = lines.map(|l| l.split('\t').collect()).collect();
    assert_eq!(records.len(), 2, "two unique nodes expected");

    // node 0: reads r0 and r1, barcode AAAA
    assert_eq!(records[0][0], "0");
    assert_eq!(records[0][2], "2");
    assert_eq!(records[0][4], "AAAA");
    // node 1: singleton r2, no verified edges
    assert_eq!(records[1][2], "1");
    assert_eq!(records[1][3], "0");
    assert_eq!(records[1][4], "CCCC");
}

#[test]
fn test_run_log_echoes_parameters() {
    let dir = TempDir::new().unwrap();
    let (r1, r2) = write_paired_fastq(dir.path(), &[pair("r0", "AA", "A", "AA", "C")]);

    let (args, prefix) = cluster_args(&r1, &r2, dir.path(), 4, 1, 3, 1, 1, 2);
    run(&args);

    let run_log = String::from_utf8(output_bytes(&prefix, "cluster.log")).unwrap();
    assert!(run_log.contains("Parameters:"));
    assert!(run_log.contains("\tbarcode-length\t4"));
    assert!(run_log.contains("\tthreads\t2"));
    assert!(run_log.contains("Summary:"));
    assert!(run_log.contains("\tread_pairs\t1"));
    assert!(run_log.contains("\tclusters\t1"));
}

#[test]
fn test_keep_qual_flag_is_accepted() {
    let dir = TempDir::new().unwrap();
    let (r1, r2) = write_paired_fastq(
        dir.path(),
        &[pair("r0", "AA", "A", "AA", "C"), pair("r1", "AA", "A", "AA", "C")],
    );

    let (mut args, prefix) = cluster_args(&r1, &r2, dir.path(), 4, 1, 3, 0, 1, 1);
    args.push("--keep-qual".to_string());
    run(&args);
    assert_eq!(read_partition(&prefix), vec![vec![0, 1]]);
}
