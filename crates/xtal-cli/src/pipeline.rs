//! Load → ingest → merge, one stage per span.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use xtal_ingest::{ReflnBlock, ReflnMetadata, Source, read_intensities, read_refln_csv};
use xtal_merge::{IngestStats, Intensities, MergeOptions, MergeSummary};
use xtal_model::DataKind;

/// Everything the summary needs about one merge run.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub input: PathBuf,
    pub kind: DataKind,
    pub spacegroup: String,
    pub ingest: IngestStats,
    pub merge: MergeSummary,
    /// `(d_max, d_min)` of the merged reflections; `None` when nothing is left.
    pub resolution: Option<(f64, f64)>,
    pub plus_minus: bool,
    pub merged: Intensities,
}

pub fn load_table(path: &Path, metadata: ReflnMetadata) -> Result<ReflnBlock> {
    let span = info_span!("load", path = %path.display());
    let _guard = span.enter();
    let block = read_refln_csv(path, metadata)
        .with_context(|| format!("read reflection table: {}", path.display()))?;
    info!(rows = block.nrows(), columns = block.tags.len(), "table loaded");
    Ok(block)
}

pub fn ingest(block: &ReflnBlock, kind: DataKind) -> Result<Intensities> {
    let span = info_span!("ingest", kind = %kind, block = %block.block_name);
    let _guard = span.enter();
    let set = read_intensities(Source::Refln(block), kind)
        .with_context(|| format!("extract {kind} intensities"))?;
    if set.stats().rejected() > 0 {
        warn!(
            rejected = set.stats().rejected(),
            "rows without a usable index, value or sigma were skipped"
        );
    }
    Ok(set)
}

pub fn merge(set: &mut Intensities, options: &MergeOptions) -> MergeSummary {
    let span = info_span!("merge", plus_minus = options.output_plus_minus);
    span.in_scope(|| set.merge_with(options))
}

/// Run the whole pipeline on a labeled reflection table.
pub fn run_pipeline(
    path: &Path,
    metadata: ReflnMetadata,
    kind: DataKind,
    options: &MergeOptions,
) -> Result<MergeReport> {
    let start = Instant::now();
    let block = load_table(path, metadata)?;
    let mut set = ingest(&block, kind)?;
    let ingest_stats = set.stats();
    let summary = merge(&mut set, options);
    let resolution = set.resolution_range().ok();
    if resolution.is_none() {
        warn!("no reflections left after merging");
    }
    info!(
        merged = summary.merged,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "pipeline finished"
    );
    Ok(MergeReport {
        input: path.to_path_buf(),
        kind,
        spacegroup: set.spacegroup_str().to_string(),
        ingest: ingest_stats,
        merge: summary,
        resolution,
        plus_minus: options.output_plus_minus,
        merged: set,
    })
}
