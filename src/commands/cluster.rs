//! Read clustering command.
//!
//! Reads two mate FASTQ files, extracts a barcode tag and two minimizer
//! vectors per pair, deduplicates identical feature triples into nodes,
//! connects nodes whose barcodes lie within the error tolerance and whose
//! minimizers agree on both mates, and emits the connected components as
//! clusters.
//!
//! # Outputs
//!
//! Given `--output-prefix P`, three files are written:
//!
//! - `P` + `cluster.tsv`: one record per read:
//!   `cluster_id  read_id  name_1  name_2`
//! - `P` + `cluster.node.log`: one record per node:
//!   `node_id  cluster_id  read_count  degree  barcode  minimizers_1  minimizers_2`
//! - `P` + `cluster.log`: parameter echo and stage summaries
//!
//! Output is deterministic: running twice on the same input with the same
//! parameters produces byte-identical files regardless of `--threads`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use bstr::ByteSlice;
use clap::Args;
use log::info;

use lshclust_lib::cluster::{ClusterConfig, Clustering, cluster_nodes};
use lshclust_lib::errors::ClusterError;
use lshclust_lib::extract::Extractor;
use lshclust_lib::fastq::{PairedFastqReader, ReadPair};
use lshclust_lib::logging::{StageTimer, format_count, format_duration};
use lshclust_lib::node::{NodeTable, NodeTableBuilder};
use lshclust_lib::progress::ProgressTracker;
use lshclust_lib::validation::validate_file_exists;

/// Clusters paired-end reads by barcode similarity and minimizer agreement.
#[derive(Args, Debug)]
pub struct ClusterReads {
    /// Mate-1 (forward) FASTQ input, plain or gzip-compressed
    #[arg(short = 'f', long = "input-forward")]
    pub input_forward: PathBuf,

    /// Mate-2 (reverse) FASTQ input, plain or gzip-compressed
    #[arg(short = 'r', long = "input-reverse")]
    pub input_reverse: PathBuf,

    /// Prefix for the output files
    #[arg(short = 'o', long = "output-prefix")]
    pub output_prefix: String,

    /// Suppress progress output on the console
    #[arg(short = 's', long = "silent")]
    pub silent: bool,

    /// Retain quality strings in memory
    #[arg(short = 'q', long = "keep-qual")]
    pub keep_qual: bool,

    /// Barcode tag length (split across the two mate prefixes)
    #[arg(short = 'l', long = "barcode-length")]
    pub barcode_length: usize,

    /// Number of minimizers per mate
    #[arg(short = 'm', long = "minimizer-count")]
    pub minimizer_count: usize,

    /// K-mer size for minimizer extraction
    #[arg(short = 'k', long = "kmer-size")]
    pub kmer_size: usize,

    /// Maximum barcode Hamming distance between connected nodes
    #[arg(short = 'e', long = "error-tolerance")]
    pub error_tolerance: usize,

    /// Minimum number of position-wise equal minimizers, per mate
    #[arg(short = 't', long = "minimizer-threshold")]
    pub minimizer_threshold: usize,

    /// Worker thread count
    #[arg(short = 'c', long = "threads", default_value = "1")]
    pub threads: usize,
}

impl ClusterReads {
    /// Runs the clustering pipeline end to end.
    pub fn execute(&self) -> Result<()> {
        let config = ClusterConfig {
            barcode_length: self.barcode_length,
            minimizer_count: self.minimizer_count,
            kmer_size: self.kmer_size,
            error_tolerance: self.error_tolerance,
            minimizer_threshold: self.minimizer_threshold,
            thread_count: self.threads,
        };
        config.validate()?;
        validate_file_exists(&self.input_forward, "Forward FASTQ")?;
        validate_file_exists(&self.input_reverse, "Reverse FASTQ")?;

        let run_log_path = self.output_path("cluster.log");
        let mut run_log = BufWriter::new(
            File::create(&run_log_path)
                .with_context(|| format!("creating '{}'", run_log_path.display()))?,
        );
        self.write_parameters(&mut run_log)?;

        let started = Instant::now();

        let (reads, table) = self.load_reads()?;
        info!(
            "Deduplicated {} read pairs into {} nodes",
            format_count(table.read_count() as u64),
            format_count(table.node_count() as u64)
        );

        let timer = StageTimer::start("Clustering");
        let clustering = cluster_nodes(&table, &config)?;
        timer.finish(clustering.clusters.len() as u64, "clusters");

        self.write_assignments(&reads, &clustering)?;
        self.write_node_log(&table, &clustering)?;

        writeln!(run_log, "Summary:")?;
        writeln!(run_log, "\tread_pairs\t{}", table.read_count())?;
        writeln!(run_log, "\tnodes\t{}", table.node_count())?;
        writeln!(run_log, "\tedges\t{}", clustering.edge_count)?;
        writeln!(run_log, "\tclusters\t{}", clustering.clusters.len())?;
        writeln!(run_log, "\truntime\t{}", format_duration(started.elapsed()))?;
        run_log.flush()?;

        info!(
            "Clustered {} read pairs into {} clusters in {}",
            format_count(table.read_count() as u64),
            format_count(clustering.clusters.len() as u64),
            format_duration(started.elapsed())
        );
        Ok(())
    }

    /// Single pass over both inputs: ingest, extract, deduplicate.
    fn load_reads(&self) -> Result<(Vec<ReadPair>, NodeTable)> {
        let timer = StageTimer::start("Extracting barcodes and minimizers");
        let extractor =
            Extractor::new(self.barcode_length, self.minimizer_count, self.kmer_size);
        let mut reader =
            PairedFastqReader::open(&self.input_forward, &self.input_reverse, self.keep_qual)?;
        let mut builder = NodeTableBuilder::new(self.barcode_length, self.minimizer_count);
        let progress = ProgressTracker::new("Read pairs").with_interval(1_000_000);

        let mut reads = Vec::new();
        while let Some(pair) = reader.next_pair()? {
            let features =
                extractor.extract(&pair.sequence_1, &pair.sequence_2).map_err(|e| {
                    ClusterError::MalformedRead {
                        name: pair.name_1.as_bstr().to_string(),
                        record: reader.records() - 1,
                        reason: e.to_string(),
                    }
                })?;
            builder.push(features)?;
            progress.log_if_needed(1);
            reads.push(pair);
        }
        timer.finish(reads.len() as u64, "read pairs");
        Ok((reads, builder.finish()))
    }

    /// Writes the per-read cluster assignment file.
    fn write_assignments(&self, reads: &[ReadPair], clustering: &Clustering) -> Result<()> {
        let path = self.output_path("cluster.tsv");
        let mut out = BufWriter::new(
            File::create(&path).with_context(|| format!("creating '{}'", path.display()))?,
        );
        for (cluster_id, cluster) in clustering.clusters.iter().enumerate() {
            for &read_id in cluster {
                let pair = &reads[read_id as usize];
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    cluster_id,
                    read_id,
                    pair.name_1.as_bstr(),
                    pair.name_2.as_bstr()
                )?;
            }
        }
        out.flush()?;
        info!("Wrote {} cluster assignments to '{}'", format_count(reads.len() as u64), path.display());
        Ok(())
    }

    /// Writes the per-node log.
    fn write_node_log(&self, table: &NodeTable, clustering: &Clustering) -> Result<()> {
        let path = self.output_path("cluster.node.log");
        let mut out = BufWriter::new(
            File::create(&path).with_context(|| format!("creating '{}'", path.display()))?,
        );
        writeln!(out, "#node_id\tcluster_id\tread_count\tdegree\tbarcode\tminimizers_1\tminimizers_2")?;
        for (node_id, node) in table.nodes.iter().enumerate() {
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                node_id,
                clustering.node_to_cluster[node_id],
                table.node_to_reads[node_id].len(),
                clustering.node_degrees[node_id],
                node.barcode.as_bstr(),
                join_minimizers(&node.minimizers_1),
                join_minimizers(&node.minimizers_2)
            )?;
        }
        out.flush()?;
        info!("Wrote {} node records to '{}'", format_count(table.node_count() as u64), path.display());
        Ok(())
    }

    /// Echoes the configuration into the run log.
    fn write_parameters<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Parameters:")?;
        writeln!(out, "\tinput-forward\t{}", self.input_forward.display())?;
        writeln!(out, "\tinput-reverse\t{}", self.input_reverse.display())?;
        writeln!(out, "\toutput-prefix\t{}", self.output_prefix)?;
        writeln!(out, "\tbarcode-length\t{}", self.barcode_length)?;
        writeln!(out, "\tminimizer-count\t{}", self.minimizer_count)?;
        writeln!(out, "\tkmer-size\t{}", self.kmer_size)?;
        writeln!(out, "\terror-tolerance\t{}", self.error_tolerance)?;
        writeln!(out, "\tminimizer-threshold\t{}", self.minimizer_threshold)?;
        writeln!(out, "\tthreads\t{}", self.threads)?;
        writeln!(out, "\tkeep-qual\t{}", self.keep_qual)?;
        Ok(())
    }

    /// Output path for one of the emitted files: prefix + suffix, so the
    /// prefix may carry both a directory and a file-name stem.
    fn output_path(&self, suffix: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", self.output_prefix, suffix))
    }
}

/// Comma-joins a minimizer vector for the node log.
fn join_minimizers(minimizers: &[u64]) -> String {
    minimizers.iter().map(u64::to_string).collect::<Vec<_>>().join(",")
}
