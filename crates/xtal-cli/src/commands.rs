use std::sync::Arc;

use anyhow::{Context, Result, bail};
use comfy_table::{CellAlignment, Table};
use tracing::{debug, info_span};

use xtal_cli::pipeline::{MergeReport, run_pipeline};
use xtal_ingest::ReflnMetadata;
use xtal_merge::MergeOptions;
use xtal_model::{DataKind, UnitCell};
use xtal_symmetry::{SymmetryRef, builtin_spacegroups, find_spacegroup};

use crate::cli::MergeArgs;
use crate::summary::{align_column, apply_table_style, header_cell};

pub fn run_space_groups() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("No."),
        header_cell("Symbol"),
        header_cell("Short"),
        header_cell("Operations"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for entry in builtin_spacegroups() {
        let group = entry
            .build()
            .with_context(|| format!("build space group {}", entry.hm))?;
        table.add_row(vec![
            entry.number.to_string(),
            entry.hm.to_string(),
            entry.short.unwrap_or("-").to_string(),
            group.order().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_merge(args: &MergeArgs) -> Result<MergeReport> {
    let span = info_span!("merge_command", table = %args.table.display());
    let _guard = span.enter();

    let spacegroup: SymmetryRef = Arc::new(
        find_spacegroup(&args.space_group)
            .with_context(|| format!("resolve space group '{}'", args.space_group))?,
    );
    let cell = parse_cell(&args.cell)?;
    debug!(spacegroup = spacegroup.name(), cell = ?cell.params(), "metadata resolved");

    let kind = DataKind::from(args.kind);
    let metadata = ReflnMetadata {
        block_name: block_name_for(args),
        cell,
        spacegroup: Some(spacegroup),
        wavelength: args.wavelength,
        unmerged: kind == DataKind::Unmerged,
    };
    let options = MergeOptions::new()
        .with_plus_minus(args.plus_minus)
        .with_absence_removal(!args.keep_absences);
    run_pipeline(&args.table, metadata, kind, &options)
}

fn parse_cell(values: &[f64]) -> Result<UnitCell> {
    let [a, b, c, alpha, beta, gamma] = values else {
        bail!("expected 6 unit cell parameters, got {}", values.len());
    };
    let cell = UnitCell::new(*a, *b, *c, *alpha, *beta, *gamma);
    if !cell.is_crystal() {
        bail!("not a valid unit cell: {values:?}");
    }
    Ok(cell)
}

fn block_name_for(args: &MergeArgs) -> String {
    args.table
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
