//! Custom error types for lshclust operations.

use thiserror::Error;

/// Result type alias for lshclust operations
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Error type for lshclust operations
#[derive(Error, Debug)]
pub enum ClusterError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "FASTQ")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// A read violates the extraction length contract
    #[error("Malformed read '{name}' (record {record}): {reason}")]
    MalformedRead {
        /// Read name as it appears in the FASTQ header
        name: String,
        /// 0-based record index in input order
        record: u64,
        /// Explanation of the problem
        reason: String,
    },

    /// The two mate files fell out of lockstep
    #[error("Mate files are not synchronised: {reason}")]
    PairMismatch {
        /// Explanation of the problem
        reason: String,
    },

    /// An internal data contract was violated
    #[error("Contract violation: {reason}")]
    ContractViolation {
        /// Explanation of the problem
        reason: String,
    },

    /// An I/O error while reading input or writing output
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// Path being read or written
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl ClusterError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io<P: AsRef<std::path::Path>>(path: P, source: std::io::Error) -> Self {
        Self::Io { path: path.as_ref().display().to_string(), source }
    }
}
