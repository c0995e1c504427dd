//! Integration tests for lshclust.
//!
//! These tests drive the compiled binary end to end: paired FASTQ files in,
//! cluster assignment and node log files out.

mod helpers;
mod test_cluster_command;
mod test_error_paths;
