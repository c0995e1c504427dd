//! Error-path coverage: bad parameters and malformed inputs must fail with
//! a non-zero exit code before or during the run, never silently succeed.

use tempfile::TempDir;

use crate::helpers::{cluster_args, pair, run_lshclust, write_paired_fastq};

fn run_expect_failure(args: &[String]) {
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let status = run_lshclust(&arg_refs);
    assert!(!status.success(), "lshclust unexpectedly succeeded");
}

#[test]
fn test_missing_input_file_fails() {
    let dir = TempDir::new().unwrap();
    let (r1, _) = write_paired_fastq(dir.path(), &[pair("r0", "AA", "A", "AA", "C")]);
    let missing = dir.path().join("nope.fq");

    let (args, _) = cluster_args(&r1, &missing, dir.path(), 4, 1, 3, 1, 1, 1);
    run_expect_failure(&args);
}

#[test]
fn test_missing_required_flag_fails() {
    let status = run_lshclust(&["--input-forward", "a.fq"]);
    assert!(!status.success());
}

#[test]
fn test_thread_count_out_of_range_fails() {
    let dir = TempDir::new().unwrap();
    let (r1, r2) = write_paired_fastq(dir.path(), &[pair("r0", "AA", "A", "AA", "C")]);

    let (args, _) = cluster_args(&r1, &r2, dir.path(), 4, 1, 3, 1, 1, 9);
    run_expect_failure(&args);
}

#[test]
fn test_threshold_above_minimizer_count_fails() {
    let dir = TempDir::new().unwrap();
    let (r1, r2) = write_paired_fastq(dir.path(), &[pair("r0", "AA", "AC", "AA", "CA")]);

    let (args, _) = cluster_args(&r1, &r2, dir.path(), 4, 2, 3, 1, 3, 1);
    run_expect_failure(&args);
}

#[test]
fn test_error_tolerance_above_barcode_length_fails() {
    let dir = TempDir::new().unwrap();
    let (r1, r2) = write_paired_fastq(dir.path(), &[pair("r0", "AA", "A", "AA", "C")]);

    let (args, _) = cluster_args(&r1, &r2, dir.path(), 4, 1, 3, 5, 1, 1);
    run_expect_failure(&args);
}

#[test]
fn test_desynchronised_mate_files_fail() {
    let dir = TempDir::new().unwrap();
    let (r1, _) = write_paired_fastq(
        dir.path(),
        &[
            pair("r0", "AA", "A", "AA", "C"),
            pair("r1", "AA", "A", "AA", "C"),
        ],
    );
    let short_dir = TempDir::new().unwrap();
    let (_, r2_short) =
        write_paired_fastq(short_dir.path(), &[pair("r0", "AA", "A", "AA", "C")]);

    let (args, _) = cluster_args(&r1, &r2_short, dir.path(), 4, 1, 3, 1, 1, 1);
    run_expect_failure(&args);
}

#[test]
fn test_read_shorter_than_barcode_share_fails() {
    let dir = TempDir::new().unwrap();
    // Barcode length 20 requires 10 bases per mate; these reads have 8
    let (r1, r2) = write_paired_fastq(dir.path(), &[pair("r0", "AA", "A", "AA", "C")]);

    let (args, _) = cluster_args(&r1, &r2, dir.path(), 20, 1, 3, 1, 1, 1);
    run_expect_failure(&args);
}
