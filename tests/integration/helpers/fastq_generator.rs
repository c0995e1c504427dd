//! Paired FASTQ generation for integration tests.
//!
//! Test reads are built from a 2-base barcode share per mate followed by
//! homopolymer windows, so that every window's minimizer fingerprint is
//! fully determined: all k-mers inside an `A` (or `T`) window share one
//! canonical encoding and all k-mers inside a `C` (or `G`) window share
//! another. Two windows agree exactly when they use the same homopolymer
//! class, which lets tests dial minimizer agreement per window without
//! depending on hash values.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One test read pair: mate-1 and mate-2 sequences.
pub struct TestPair {
    /// Read name stem; `/1` and `/2` suffixes are appended per mate.
    pub name: &'static str,
    /// Mate-1 bases.
    pub seq_1: String,
    /// Mate-2 bases.
    pub seq_2: String,
}

/// Builds a mate sequence: a barcode share followed by one 6-base
/// homopolymer window per character of `windows` (`'A'` or `'C'`).
pub fn mate_sequence(barcode_share: &str, windows: &str) -> String {
    let mut seq = String::from(barcode_share);
    for window in windows.chars() {
        for _ in 0..6 {
            seq.push(window);
        }
    }
    seq
}

/// Convenience constructor for a [`TestPair`].
pub fn pair(
    name: &'static str,
    share_1: &str,
    windows_1: &str,
    share_2: &str,
    windows_2: &str,
) -> TestPair {
    TestPair {
        name,
        seq_1: mate_sequence(share_1, windows_1),
        seq_2: mate_sequence(share_2, windows_2),
    }
}

/// Writes the two mate FASTQ files for a set of read pairs.
pub fn write_paired_fastq(dir: &Path, pairs: &[TestPair]) -> (PathBuf, PathBuf) {
    let path_1 = dir.join("reads_1.fq");
    let path_2 = dir.join("reads_2.fq");

    let mut file_1 = File::create(&path_1).expect("Failed to create mate-1 FASTQ");
    let mut file_2 = File::create(&path_2).expect("Failed to create mate-2 FASTQ");
    for pair in pairs {
        writeln!(
            file_1,
            "@{}/1\n{}\n+\n{}",
            pair.name,
            pair.seq_1,
            "I".repeat(pair.seq_1.len())
        )
        .expect("Failed to write mate-1 record");
        writeln!(
            file_2,
            "@{}/2\n{}\n+\n{}",
            pair.name,
            pair.seq_2,
            "I".repeat(pair.seq_2.len())
        )
        .expect("Failed to write mate-2 record");
    }
    (path_1, path_2)
}
