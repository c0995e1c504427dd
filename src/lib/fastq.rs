//! Paired FASTQ ingest.
//!
//! Reads the two mate files in lockstep, yielding one [`ReadPair`] per
//! record. Inputs may be plain or gzip-compressed (detected from the magic
//! bytes, not the file name). The two files must contain the same number of
//! records; falling out of lockstep is fatal.
//!
//! Quality strings are dropped at ingest unless the caller asks to keep
//! them, which bounds the memory of the in-memory read table.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use seq_io::fastq::{Reader as FastqReader, Record};

use crate::errors::{ClusterError, Result};

/// One paired-end record, as read from the two mate files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPair {
    /// Mate-1 header line (without the `@` prefix).
    pub name_1: Vec<u8>,
    /// Mate-1 bases.
    pub sequence_1: Vec<u8>,
    /// Mate-1 qualities, when retained.
    pub quality_1: Option<Vec<u8>>,
    /// Mate-2 header line (without the `@` prefix).
    pub name_2: Vec<u8>,
    /// Mate-2 bases.
    pub sequence_2: Vec<u8>,
    /// Mate-2 qualities, when retained.
    pub quality_2: Option<Vec<u8>>,
}

/// Opens a FASTQ file, transparently decompressing gzip input.
///
/// Compression is detected from the gzip magic bytes so misnamed files still
/// open correctly.
fn open_fastq(path: &Path) -> Result<Box<dyn Read + Send>> {
    let mut file = File::open(path).map_err(|e| ClusterError::io(path, e))?;

    let mut magic = [0u8; 2];
    let mut filled = 0;
    while filled < magic.len() {
        let n = file.read(&mut magic[filled..]).map_err(|e| ClusterError::io(path, e))?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    file.seek(SeekFrom::Start(0)).map_err(|e| ClusterError::io(path, e))?;

    if filled == magic.len() && magic == [0x1f, 0x8b] {
        Ok(Box::new(MultiGzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Lockstep reader over the two mate files.
pub struct PairedFastqReader {
    reader_1: FastqReader<Box<dyn Read + Send>>,
    reader_2: FastqReader<Box<dyn Read + Send>>,
    path_1: PathBuf,
    path_2: PathBuf,
    keep_qual: bool,
    records: u64,
}

impl PairedFastqReader {
    /// Opens both mate files.
    ///
    /// # Arguments
    /// * `path_1` - mate-1 (forward) FASTQ path
    /// * `path_2` - mate-2 (reverse) FASTQ path
    /// * `keep_qual` - retain quality strings in the yielded records
    pub fn open<P: AsRef<Path>>(path_1: P, path_2: P, keep_qual: bool) -> Result<Self> {
        let path_1 = path_1.as_ref().to_path_buf();
        let path_2 = path_2.as_ref().to_path_buf();
        let reader_1 = FastqReader::new(open_fastq(&path_1)?);
        let reader_2 = FastqReader::new(open_fastq(&path_2)?);
        Ok(Self { reader_1, reader_2, path_1, path_2, keep_qual, records: 0 })
    }

    /// Number of pairs yielded so far.
    #[must_use]
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Reads the next pair, or `None` when both files are exhausted.
    ///
    /// # Errors
    /// Fails on malformed FASTQ records and when exactly one of the two
    /// files is exhausted.
    pub fn next_pair(&mut self) -> Result<Option<ReadPair>> {
        let record_1 = Self::next_record(&mut self.reader_1, &self.path_1, self.keep_qual)?;
        let record_2 = Self::next_record(&mut self.reader_2, &self.path_2, self.keep_qual)?;

        match (record_1, record_2) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(ClusterError::PairMismatch {
                reason: format!(
                    "'{}' ended after {} records but '{}' has more",
                    self.path_2.display(),
                    self.records,
                    self.path_1.display()
                ),
            }),
            (None, Some(_)) => Err(ClusterError::PairMismatch {
                reason: format!(
                    "'{}' ended after {} records but '{}' has more",
                    self.path_1.display(),
                    self.records,
                    self.path_2.display()
                ),
            }),
            (Some((name_1, sequence_1, quality_1)), Some((name_2, sequence_2, quality_2))) => {
                self.records += 1;
                Ok(Some(ReadPair {
                    name_1,
                    sequence_1,
                    quality_1,
                    name_2,
                    sequence_2,
                    quality_2,
                }))
            }
        }
    }

    /// Pulls one record off a reader, copying out the owned fields.
    #[allow(clippy::type_complexity)]
    fn next_record(
        reader: &mut FastqReader<Box<dyn Read + Send>>,
        path: &Path,
        keep_qual: bool,
    ) -> Result<Option<(Vec<u8>, Vec<u8>, Option<Vec<u8>>)>> {
        match reader.next() {
            None => Ok(None),
            Some(Err(e)) => Err(ClusterError::InvalidFileFormat {
                file_type: "FASTQ".to_string(),
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
            Some(Ok(record)) => {
                let name = record.head().to_vec();
                let sequence = record.seq().to_vec();
                let quality = keep_qual.then(|| record.qual().to_vec());
                Ok(Some((name, sequence, quality)))
            }
        }
    }
}
