#![deny(unsafe_code)]
pub mod commands;

use anyhow::Result;
use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use commands::cluster::ClusterReads;
use env_logger::Env;
use log::info;

/// Custom styles for CLI help output
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Clusters paired-end reads by inferred molecule of origin: approximate
/// barcode matching plus minimizer verification on both mates.
#[derive(Parser, Debug)]
#[command(name = "lshclust", version, styles = STYLES)]
struct Args {
    #[command(flatten)]
    cluster: ClusterReads,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // --silent keeps errors on the console; the run log file is unaffected
    let default_level = if args.cluster.silent { "error" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Running lshclust version {}", env!("CARGO_PKG_VERSION"));
    args.cluster.execute()
}
