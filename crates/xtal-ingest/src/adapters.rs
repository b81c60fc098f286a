//! Source adapters: one per (origin format, measurement kind).
//!
//! Every adapter checks the format-defining preconditions and locates all
//! required columns before it copies anything, so a failed call never
//! yields a partially filled set. Rows with NaN values, non-positive
//! sigmas or unusable Miller indices are dropped silently and only show up
//! in [`Intensities::stats`].

use std::sync::Arc;

use tracing::{debug, info};

use xtal_merge::Intensities;
use xtal_model::{DataKind, Refl, Sign};
use xtal_symmetry::{SymmetryRef, find_spacegroup_by_number};

use crate::error::{IngestError, Result};
use crate::mtz::{MtzDataProxy, MtzTable};
use crate::proxy::{DataProxy, log_unindexed, read_anomalous_data, read_data};
use crate::refln::{ReflnBlock, ReflnDataProxy};
use crate::xds::{XdsAscii, XdsDataProxy};

/// Position of `M/ISYM` in unmerged MTZ files (after H, K, L).
const ISYM_COLUMN: usize = 3;

/// An origin dataset handed over by a file parser.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Mtz(&'a MtzTable),
    Refln(&'a ReflnBlock),
    Xds(&'a XdsAscii),
}

impl Source<'_> {
    pub fn format_name(&self) -> &'static str {
        match self {
            Source::Mtz(_) => "MTZ",
            Source::Refln(_) => "mmCIF",
            Source::Xds(_) => "XDS",
        }
    }
}

/// Read intensities of the given kind from any supported source.
pub fn read_intensities(source: Source<'_>, kind: DataKind) -> Result<Intensities> {
    match (source, kind) {
        (Source::Mtz(mtz), DataKind::Unmerged) => read_unmerged_intensities_from_mtz(mtz),
        (Source::Mtz(mtz), DataKind::Mean) => read_mean_intensities_from_mtz(mtz),
        (Source::Mtz(mtz), DataKind::Anomalous) => read_anomalous_intensities_from_mtz(mtz),
        (Source::Refln(rb), DataKind::Unmerged) => read_unmerged_intensities_from_mmcif(rb),
        (Source::Refln(rb), DataKind::Mean) => read_mean_intensities_from_mmcif(rb),
        (Source::Refln(rb), DataKind::Anomalous) => read_anomalous_intensities_from_mmcif(rb),
        (Source::Xds(xds), DataKind::Unmerged) => read_unmerged_intensities_from_xds(xds),
        (source @ Source::Xds(_), kind) => Err(IngestError::UnsupportedKind {
            format: source.format_name(),
            kind,
        }),
    }
}

fn log_ingest(format: &'static str, kind: DataKind, out: &Intensities) {
    let stats = out.stats();
    info!(
        format,
        kind = %kind,
        spacegroup = out.spacegroup_str(),
        rows = stats.total,
        accepted = stats.accepted,
        rejected = stats.rejected(),
        wavelength = out.wavelength,
        "read intensities"
    );
}

fn mtz_metadata(mtz: &MtzTable, out: &mut Intensities) -> Result<()> {
    out.set_metadata(mtz.cell.clone(), mtz.spacegroup.clone())?;
    Ok(())
}

pub fn read_unmerged_intensities_from_mtz(mtz: &MtzTable) -> Result<Intensities> {
    if !mtz.is_unmerged() {
        return Err(IngestError::ExpectedUnmerged);
    }
    mtz.check_hkl_columns()?;
    let isym_col = mtz.get_column_with_label("M/ISYM")?;
    if isym_col.idx != ISYM_COLUMN {
        return Err(IngestError::misplaced_column(
            "M/ISYM",
            ISYM_COLUMN,
            isym_col.idx,
        ));
    }
    let col = mtz.get_column_with_label("I")?;
    let value_idx = col.idx;
    let sigma_idx = mtz.get_column_with_label("SIGI")?.idx;
    let wavelength = mtz.dataset(col.dataset_id)?.wavelength;

    let mut out = Intensities::new();
    out.set_metadata(mtz.average_cell_from_batches(), mtz.spacegroup.clone())?;
    out.wavelength = wavelength;
    let proxy = MtzDataProxy::new(mtz);
    out.data.reserve(proxy.row_count());
    let mut unindexed = 0usize;
    for offset in proxy.row_offsets() {
        let Some(hkl) = proxy.hkl_at(offset) else {
            out.reject_row();
            unindexed += 1;
            continue;
        };
        let isym = proxy.num_at(offset + ISYM_COLUMN) as i32;
        out.add_if_valid(Refl::new(
            hkl,
            Sign::from_isym(isym),
            proxy.num_at(offset + value_idx),
            proxy.num_at(offset + sigma_idx),
        ));
    }
    log_unindexed(unindexed);
    // Some programs write unmerged files with original (unreduced) indices
    // and ISYM = 1 throughout.
    out.switch_to_asu_indices(false)?;
    log_ingest("MTZ", DataKind::Unmerged, &out);
    Ok(out)
}

pub fn read_mean_intensities_from_mtz(mtz: &MtzTable) -> Result<Intensities> {
    if mtz.is_unmerged() {
        return Err(IngestError::ExpectedMerged);
    }
    mtz.check_hkl_columns()?;
    let col = mtz
        .column_with_one_of_labels(&["IMEAN", "I"])
        .ok_or_else(|| IngestError::column_not_found("IMEAN or I"))?;
    let sigma_idx = mtz
        .get_column_with_label(&format!("SIG{}", col.label))?
        .idx;
    let wavelength = mtz.dataset(col.dataset_id)?.wavelength;
    debug!(value = %col.label, "mean intensity column");

    let mut out = Intensities::new();
    mtz_metadata(mtz, &mut out)?;
    out.wavelength = wavelength;
    read_data(&mut out, &MtzDataProxy::new(mtz), Sign::Pooled, col.idx, sigma_idx);
    log_ingest("MTZ", DataKind::Mean, &out);
    Ok(out)
}

pub fn read_anomalous_intensities_from_mtz(mtz: &MtzTable) -> Result<Intensities> {
    if mtz.is_unmerged() {
        return Err(IngestError::ExpectedMerged);
    }
    mtz.check_hkl_columns()?;
    let col = mtz.get_column_with_label("I(+)")?;
    let value_idx = [col.idx, mtz.get_column_with_label("I(-)")?.idx];
    let sigma_idx = [
        mtz.get_column_with_label("SIGI(+)")?.idx,
        mtz.get_column_with_label("SIGI(-)")?.idx,
    ];
    let wavelength = mtz.dataset(col.dataset_id)?.wavelength;

    let mut out = Intensities::new();
    mtz_metadata(mtz, &mut out)?;
    out.wavelength = wavelength;
    read_anomalous_data(&mut out, &MtzDataProxy::new(mtz), value_idx, sigma_idx);
    log_ingest("MTZ", DataKind::Anomalous, &out);
    Ok(out)
}

fn refln_metadata(rb: &ReflnBlock, out: &mut Intensities) -> Result<()> {
    out.set_metadata(rb.cell.clone(), rb.spacegroup.clone())?;
    out.wavelength = rb.wavelength;
    Ok(())
}

pub fn read_unmerged_intensities_from_mmcif(rb: &ReflnBlock) -> Result<Intensities> {
    if !rb.is_unmerged() {
        return Err(IngestError::ExpectedUnmerged);
    }
    let proxy = ReflnDataProxy::new(rb)?;
    let value_idx = rb.get_column_index("intensity_net")?;
    let sigma_idx = rb.get_column_index("intensity_sigma")?;

    let mut out = Intensities::new();
    refln_metadata(rb, &mut out)?;
    // Observations already in the asu are I(+); the others get their sign
    // from the symmetry operation that moves them there.
    read_data(&mut out, &proxy, Sign::Plus, value_idx, sigma_idx);
    out.switch_to_asu_indices(false)?;
    log_ingest("mmCIF", DataKind::Unmerged, &out);
    Ok(out)
}

pub fn read_mean_intensities_from_mmcif(rb: &ReflnBlock) -> Result<Intensities> {
    if rb.is_unmerged() {
        return Err(IngestError::ExpectedMerged);
    }
    let proxy = ReflnDataProxy::new(rb)?;
    let value_idx = rb.get_column_index("intensity_meas")?;
    let sigma_idx = rb.get_column_index("intensity_sigma")?;

    let mut out = Intensities::new();
    refln_metadata(rb, &mut out)?;
    read_data(&mut out, &proxy, Sign::Pooled, value_idx, sigma_idx);
    log_ingest("mmCIF", DataKind::Mean, &out);
    Ok(out)
}

pub fn read_anomalous_intensities_from_mmcif(rb: &ReflnBlock) -> Result<Intensities> {
    if rb.is_unmerged() {
        return Err(IngestError::ExpectedMerged);
    }
    let proxy = ReflnDataProxy::new(rb)?;
    let value_idx = [
        rb.get_column_index("pdbx_I_plus")?,
        rb.get_column_index("pdbx_I_minus")?,
    ];
    let sigma_idx = [
        rb.get_column_index("pdbx_I_plus_sigma")?,
        rb.get_column_index("pdbx_I_minus_sigma")?,
    ];

    let mut out = Intensities::new();
    refln_metadata(rb, &mut out)?;
    read_anomalous_data(&mut out, &proxy, value_idx, sigma_idx);
    log_ingest("mmCIF", DataKind::Anomalous, &out);
    Ok(out)
}

pub fn read_unmerged_intensities_from_xds(xds: &XdsAscii) -> Result<Intensities> {
    let spacegroup: SymmetryRef = Arc::new(find_spacegroup_by_number(xds.spacegroup_number)?);

    let mut out = Intensities::new();
    out.set_metadata(xds.unit_cell.clone(), Some(spacegroup))?;
    out.wavelength = xds.wavelength;
    read_data(
        &mut out,
        &XdsDataProxy::new(xds),
        Sign::Plus,
        XdsDataProxy::IOBS,
        XdsDataProxy::SIGMA,
    );
    out.switch_to_asu_indices(false)?;
    log_ingest("XDS", DataKind::Unmerged, &out);
    Ok(out)
}
