//! Barcode and minimizer extraction from read pairs.
//!
//! Every read pair yields a fixed-length barcode tag and one minimizer vector
//! per mate. The barcode is assembled from the start of both mates: the first
//! `ceil(L/2)` bases of mate 1 followed by the first `floor(L/2)` bases of
//! mate 2, uppercased, keeping `N` as a literal alphabet character.
//!
//! The remainder of each mate (after its barcode share) is split into
//! `minimizer_count` near-equal windows. Each window contributes the minimum,
//! over its full-length k-mers, of a murmur-mixed canonical 2-bit k-mer
//! encoding. The window index is the vector position, which is what makes
//! position-wise minimizer comparison between reads meaningful: window `i` of
//! one read covers roughly the same stretch of the molecule as window `i` of
//! another read from the same origin.
//!
//! K-mers containing a non-ACGT base are skipped; a window without a single
//! valid k-mer contributes [`NO_MINIMIZER`].

use thiserror::Error;

use crate::dna::{complement_code, encode_base, normalize_base};

/// Sentinel fingerprint for a window that produced no minimizer.
pub const NO_MINIMIZER: u64 = u64::MAX;

/// Invertible 64-bit mix (murmur3 finalizer) applied to canonical k-mer
/// encodings so that minimizer selection is not biased toward
/// lexicographically small k-mers.
#[inline]
#[must_use]
pub fn mix64(mut x: u64) -> u64 {
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51_afd7_ed55_8ccd);
    x ^= x >> 33;
    x = x.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    x ^= x >> 33;
    x
}

/// Extraction failure: a mate is too short to supply its barcode share.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The named mate cannot supply its share of the barcode.
    #[error("mate {mate} has {length} bases but the barcode prefix requires {required}")]
    MateTooShort {
        /// 1 or 2
        mate: u8,
        /// Observed sequence length
        length: usize,
        /// Required prefix length
        required: usize,
    },
}

/// The clustering features of one read pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFeatures {
    /// Length-L barcode tag over `{A,C,G,T,N}`.
    pub barcode: Vec<u8>,
    /// Mate-1 minimizer vector, exactly `minimizer_count` entries.
    pub minimizers_1: Vec<u64>,
    /// Mate-2 minimizer vector, exactly `minimizer_count` entries.
    pub minimizers_2: Vec<u64>,
}

/// Extracts barcodes and minimizer vectors from raw mate sequences.
pub struct Extractor {
    prefix_1: usize,
    prefix_2: usize,
    minimizer_count: usize,
    kmer_size: usize,
}

impl Extractor {
    /// Creates an extractor.
    ///
    /// # Arguments
    /// * `barcode_length` - total barcode tag length L (split across mates)
    /// * `minimizer_count` - windows (and fingerprints) per mate
    /// * `kmer_size` - k-mer size for window minimizers, at most 32
    #[must_use]
    pub fn new(barcode_length: usize, minimizer_count: usize, kmer_size: usize) -> Self {
        debug_assert!(kmer_size >= 1 && kmer_size <= 32);
        Self {
            prefix_1: barcode_length.div_ceil(2),
            prefix_2: barcode_length / 2,
            minimizer_count,
            kmer_size,
        }
    }

    /// Extracts the clustering features of one read pair.
    ///
    /// # Errors
    /// Returns [`ExtractError::MateTooShort`] when a mate cannot supply its
    /// barcode share. Short post-barcode sequence is not an error: windows
    /// without a full k-mer contribute [`NO_MINIMIZER`].
    pub fn extract(
        &self,
        seq_1: &[u8],
        seq_2: &[u8],
    ) -> std::result::Result<ReadFeatures, ExtractError> {
        if seq_1.len() < self.prefix_1 {
            return Err(ExtractError::MateTooShort {
                mate: 1,
                length: seq_1.len(),
                required: self.prefix_1,
            });
        }
        if seq_2.len() < self.prefix_2 {
            return Err(ExtractError::MateTooShort {
                mate: 2,
                length: seq_2.len(),
                required: self.prefix_2,
            });
        }

        let mut barcode = Vec::with_capacity(self.prefix_1 + self.prefix_2);
        barcode.extend(seq_1[..self.prefix_1].iter().map(|&b| normalize_base(b)));
        barcode.extend(seq_2[..self.prefix_2].iter().map(|&b| normalize_base(b)));

        Ok(ReadFeatures {
            barcode,
            minimizers_1: self.mate_minimizers(&seq_1[self.prefix_1..]),
            minimizers_2: self.mate_minimizers(&seq_2[self.prefix_2..]),
        })
    }

    /// Splits a post-barcode sequence into `minimizer_count` near-equal
    /// windows (earlier windows one base longer when the length does not
    /// divide evenly) and computes one fingerprint per window.
    fn mate_minimizers(&self, seq: &[u8]) -> Vec<u64> {
        let base = seq.len() / self.minimizer_count;
        let rem = seq.len() % self.minimizer_count;

        let mut out = Vec::with_capacity(self.minimizer_count);
        let mut start = 0;
        for window in 0..self.minimizer_count {
            let len = base + usize::from(window < rem);
            out.push(self.window_minimizer(&seq[start..start + len]));
            start += len;
        }
        out
    }

    /// Minimum mixed canonical k-mer encoding over a window.
    ///
    /// Canonical = the smaller of the forward and reverse-complement 2-bit
    /// encodings, so the fingerprint is strand-independent. A non-ACGT base
    /// resets the rolling encodings; k-mers spanning it are skipped.
    fn window_minimizer(&self, window: &[u8]) -> u64 {
        let k = self.kmer_size;
        if window.len() < k {
            return NO_MINIMIZER;
        }

        let mask = if k == 32 { u64::MAX } else { (1u64 << (2 * k)) - 1 };
        let rc_shift = 2 * (k - 1);

        let mut fwd = 0u64;
        let mut rc = 0u64;
        let mut valid = 0usize;
        let mut best = NO_MINIMIZER;

        for &base in window {
            match encode_base(base) {
                Some(code) => {
                    fwd = ((fwd << 2) | code) & mask;
                    rc = (rc >> 2) | (complement_code(code) << rc_shift);
                    valid += 1;
                    if valid >= k {
                        best = best.min(mix64(fwd.min(rc)));
                    }
                }
                None => {
                    fwd = 0;
                    rc = 0;
                    valid = 0;
                }
            }
        }
        best
    }
}
