//! Input validation utilities
//!
//! This module provides common validation functions for command-line
//! parameters and file paths with consistent error messages.
//!
//! All validation functions use structured error types from [`crate::errors`]
//! to provide rich contextual information when validation fails.

use crate::errors::{ClusterError, Result};
use std::path::Path;

/// Validate that a file exists
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "Forward FASTQ")
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use lshclust_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/reads.fq", "Forward FASTQ");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(ClusterError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that a parameter lies within an inclusive range
///
/// # Arguments
/// * `value` - Observed value
/// * `min` - Minimum acceptable value
/// * `max` - Maximum acceptable value
/// * `name` - Parameter name for error messages
///
/// # Errors
/// Returns an error if `value` is outside `[min, max]`
///
/// # Example
/// ```
/// use lshclust_lib::validation::validate_range;
///
/// assert!(validate_range(4, 1, 8, "threads").is_ok());
/// assert!(validate_range(9, 1, 8, "threads").is_err());
/// ```
pub fn validate_range(value: usize, min: usize, max: usize, name: &str) -> Result<()> {
    if value < min || value > max {
        return Err(ClusterError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("must be between {min} and {max}, got {value}"),
        });
    }
    Ok(())
}

/// Validate that a parameter is at least 1
///
/// # Errors
/// Returns an error if `value` is zero
pub fn validate_positive(value: usize, name: &str) -> Result<()> {
    if value == 0 {
        return Err(ClusterError::InvalidParameter {
            parameter: name.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Validate that one parameter does not exceed another
///
/// Used for cross-field constraints such as `error-tolerance <= barcode-length`
/// and `minimizer-threshold <= minimizer-count`.
///
/// # Errors
/// Returns an error naming both parameters if `value > bound`
pub fn validate_at_most(value: usize, bound: usize, name: &str, bound_name: &str) -> Result<()> {
    if value > bound {
        return Err(ClusterError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("must be <= {bound_name} ({bound}), got {value}"),
        });
    }
    Ok(())
}
