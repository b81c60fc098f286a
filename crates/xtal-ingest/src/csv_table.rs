//! Loading a reflection loop from a comma-separated table.
//!
//! The header row holds the loop tags, with or without the category prefix
//! (`_refln.intensity_meas` and `intensity_meas` are equivalent). Block
//! metadata is not part of the table and is supplied by the caller, and so
//! is the loop category when no header carries a prefix.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use xtal_model::UnitCell;
use xtal_symmetry::SymmetryRef;

use crate::error::Result;
use crate::refln::ReflnBlock;

/// Category prefixes recognized in header labels.
const PREFIXES: [&str; 2] = ["_diffrn_refln.", "_refln."];

/// Block-level values that accompany a loop.
#[derive(Debug, Clone, Default)]
pub struct ReflnMetadata {
    pub block_name: String,
    pub cell: UnitCell,
    pub spacegroup: Option<SymmetryRef>,
    pub wavelength: f64,
    /// Unprefixed headers name a `_diffrn_refln` loop instead of `_refln`.
    pub unmerged: bool,
}

impl ReflnMetadata {
    fn default_prefix(&self) -> &'static str {
        if self.unmerged {
            PREFIXES[0]
        } else {
            PREFIXES[1]
        }
    }
}

/// Read a labeled CSV table into a [`ReflnBlock`].
pub fn read_refln_csv(path: &Path, metadata: ReflnMetadata) -> Result<ReflnBlock> {
    let file = std::fs::File::open(path)?;
    let block = read_refln_csv_from_reader(file, metadata)?;
    debug!(path = %path.display(), rows = block.nrows(), "loaded reflection table");
    Ok(block)
}

/// Same as [`read_refln_csv`], for any reader.
pub fn read_refln_csv_from_reader<R: Read>(reader: R, metadata: ReflnMetadata) -> Result<ReflnBlock> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').to_string())
        .collect();
    let prefix = headers
        .iter()
        .find_map(|h| PREFIXES.into_iter().find(|p| h.starts_with(p)))
        .unwrap_or_else(|| metadata.default_prefix());
    let tags = headers
        .iter()
        .map(|h| strip_prefix(h).to_string())
        .collect::<Vec<_>>();

    let mut block = ReflnBlock::new(metadata.block_name, prefix).with_tags(tags);
    block.cell = metadata.cell;
    block.spacegroup = metadata.spacegroup;
    block.wavelength = metadata.wavelength;

    for record in reader.records() {
        let record = record?;
        block.add_row(record.iter().map(|field| if field.is_empty() { "?" } else { field }))?;
    }
    Ok(block)
}

fn strip_prefix(label: &str) -> &str {
    PREFIXES
        .into_iter()
        .find_map(|p| label.strip_prefix(p))
        .unwrap_or(label)
}
