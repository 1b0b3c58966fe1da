use std::env;

use anyhow::{Context, Result, bail};
use chesspos_core::{FeatureLayout, Position, encode_padded};
use chesspos_index::{BinaryIndex, ChunkedLoader, FileSource, IndexConfig, LoaderConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: chesspos <table-dir> <fen> [k]";
const DEFAULT_K: usize = 10;

fn env_usize(name: &str) -> Result<Option<usize>> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .with_context(|| format!("{name} must be a non-negative integer, got {value:?}")),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading {name}")),
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (dir, fen, k) = match args.as_slice() {
        [dir, fen] => (dir, fen, DEFAULT_K),
        [dir, fen, k] => (dir, fen, k.parse().with_context(|| format!("invalid k {k:?}"))?),
        _ => bail!(USAGE),
    };

    let layout = FeatureLayout::V1;
    let mut index_config = IndexConfig::default();
    if let Some(threads) = env_usize("CHESSPOS_THREADS")? {
        index_config.threads = threads;
    }
    let mut loader_config = LoaderConfig::default();
    if let Some(chunk_size) = env_usize("CHESSPOS_CHUNK_SIZE")? {
        loader_config = loader_config.with_chunk_size(chunk_size);
    }

    let query: Position = fen.parse().with_context(|| format!("invalid FEN {fen:?}"))?;

    let index = BinaryIndex::with_config(layout.padded_bits, index_config)
        .context("creating index")?;
    let source = FileSource::open(dir).with_context(|| format!("opening {dir}"))?;
    let loader = ChunkedLoader::new(loader_config, &layout)?;
    let stats = loader
        .load_source(&source, &index)
        .with_context(|| format!("loading tables from {dir}"))?;
    info!(tables = stats.tables, positions = index.count(), "index ready");

    let neighbors = index
        .search_bits(&encode_padded(&query, &layout), k)
        .context("searching")?;
    for neighbor in neighbors {
        let position = index
            .position(neighbor.id, &layout)?
            .with_context(|| format!("missing vector {}", neighbor.id))?;
        println!("{}\t{}\t{}", neighbor.id, neighbor.distance, position);
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    info!("chesspos starting");
    run()
}
