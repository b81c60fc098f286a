//! Source adapter behavior over small hand-built datasets.

use std::sync::Arc;

use insta::assert_snapshot;

use xtal_ingest::{
    IngestError, MtzTable, ReflnBlock, Source, XdsAscii, XdsRefl, read_anomalous_intensities_from_mmcif,
    read_anomalous_intensities_from_mtz, read_intensities, read_mean_intensities_from_mmcif,
    read_mean_intensities_from_mtz, read_unmerged_intensities_from_mmcif,
    read_unmerged_intensities_from_mtz, read_unmerged_intensities_from_xds,
};
use xtal_merge::MergeError;
use xtal_model::{DataKind, Miller, Sign, UnitCell};
use xtal_symmetry::{SymmetryRef, find_spacegroup};

fn spacegroup(name: &str) -> Option<SymmetryRef> {
    Some(Arc::new(find_spacegroup(name).expect("space group")))
}

fn cell() -> UnitCell {
    UnitCell::new(40.0, 50.0, 60.0, 90.0, 100.0, 90.0)
}

fn unmerged_mtz() -> MtzTable {
    let mut mtz = MtzTable::new(cell(), spacegroup("P 21"));
    let ds = mtz.add_dataset("native", 0.9793);
    mtz.add_column("M/ISYM", 'Y', 0);
    mtz.add_column("BATCH", 'B', 0);
    mtz.add_column("I", 'J', ds);
    mtz.add_column("SIGI", 'Q', ds);
    mtz.add_batch(1, ds, UnitCell::new(40.0, 50.0, 60.0, 90.0, 100.0, 90.0));
    mtz.add_batch(2, ds, UnitCell::new(42.0, 52.0, 62.0, 90.0, 102.0, 90.0));
    for row in [
        [1.0, 2.0, 3.0, 1.0, 1.0, 100.0, 10.0],
        [1.0, 2.0, 3.0, 2.0, 1.0, 80.0, 8.0],
        [-1.0, 2.0, -3.0, 1.0, 2.0, 95.0, 9.0],
        [2.0, 0.0, 0.0, 1.0, 2.0, f32::NAN, 5.0],
    ] {
        mtz.add_row(&row).unwrap();
    }
    mtz
}

fn merged_mtz(labels: &[&str], rows: &[&[f32]]) -> MtzTable {
    let mut mtz = MtzTable::new(cell(), spacegroup("P 21"));
    let ds = mtz.add_dataset("peak", 1.0);
    for label in labels {
        let kind = if label.starts_with("SIG") { 'Q' } else { 'J' };
        mtz.add_column(*label, kind, ds);
    }
    for row in rows {
        mtz.add_row(row).unwrap();
    }
    mtz
}

fn refln_block(prefix: &str, tags: &[&str], rows: &[&[&str]]) -> ReflnBlock {
    let mut block = ReflnBlock::new("r1xyzsf", prefix).with_tags(tags.iter().copied());
    block.cell = cell();
    block.spacegroup = spacegroup("P 1 21 1");
    block.wavelength = 1.54;
    for row in rows {
        block.add_row(row.iter().copied()).unwrap();
    }
    block
}

#[test]
fn mtz_unmerged_uses_isym_and_batch_cell() {
    let set = read_unmerged_intensities_from_mtz(&unmerged_mtz()).unwrap();

    assert_eq!(set.len(), 3);
    assert_eq!(set.stats().total, 4);
    assert_eq!(set.stats().rejected(), 1);
    assert_eq!(set.wavelength, 0.9793);
    assert_eq!(set.unit_cell.params(), [41.0, 51.0, 61.0, 90.0, 101.0, 90.0]);

    let signs: Vec<Sign> = set.data.iter().map(|r| r.sign).collect();
    assert_eq!(signs, [Sign::Plus, Sign::Minus, Sign::Plus]);
    assert!(set.data.iter().all(|r| r.hkl == [1, 2, 3]));
    assert!(set.have_sign());
}

#[test]
fn mtz_unmerged_rejects_wrong_layouts() {
    let merged = merged_mtz(&["I", "SIGI"], &[]);
    assert!(matches!(
        read_unmerged_intensities_from_mtz(&merged),
        Err(IngestError::ExpectedUnmerged)
    ));

    let mut shuffled = MtzTable::new(cell(), spacegroup("P 21"));
    shuffled.add_column("BATCH", 'B', 0);
    shuffled.add_column("M/ISYM", 'Y', 0);
    shuffled.add_batch(1, 0, cell());
    let err = read_unmerged_intensities_from_mtz(&shuffled).unwrap_err();
    assert_snapshot!(err, @"column M/ISYM should be at position 3, found at 4");

    let mut no_symmetry = unmerged_mtz();
    no_symmetry.spacegroup = None;
    assert!(matches!(
        read_unmerged_intensities_from_mtz(&no_symmetry),
        Err(IngestError::Merge(MergeError::MissingSymmetry))
    ));
}

#[test]
fn mtz_mean_prefers_imean() {
    let mtz = merged_mtz(
        &["I", "SIGI", "IMEAN", "SIGIMEAN"],
        &[&[1.0, 0.0, 0.0, 1.0, 1.0, 50.0, 5.0], &[0.0, 0.0, 2.0, 2.0, 1.0, f32::NAN, 1.0]],
    );
    let set = read_mean_intensities_from_mtz(&mtz).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.data[0].value, 50.0);
    assert_eq!(set.data[0].sign, Sign::Pooled);
    assert_eq!(set.wavelength, 1.0);
    assert!(!set.have_sign());

    let plain = merged_mtz(&["I", "SIGI"], &[&[1.0, 0.0, 0.0, 7.0, 0.5]]);
    let set = read_mean_intensities_from_mtz(&plain).unwrap();
    assert_eq!(set.data[0].sigma, 0.5);
}

#[test]
fn mtz_mean_reports_missing_columns() {
    let mtz = merged_mtz(&["F", "SIGF"], &[]);
    let err = read_mean_intensities_from_mtz(&mtz).unwrap_err();
    assert_snapshot!(err, @"column not found: IMEAN or I");

    let mtz = merged_mtz(&["IMEAN"], &[]);
    let err = read_mean_intensities_from_mtz(&mtz).unwrap_err();
    assert_snapshot!(err, @"column not found: SIGIMEAN");

    assert!(matches!(
        read_mean_intensities_from_mtz(&unmerged_mtz()),
        Err(IngestError::ExpectedMerged)
    ));
}

#[test]
fn mtz_anomalous_splits_rows() {
    let mtz = merged_mtz(
        &["I(+)", "SIGI(+)", "I(-)", "SIGI(-)"],
        &[
            &[1.0, 2.0, 3.0, 10.0, 1.0, 12.0, 1.5],
            &[2.0, 0.0, 0.0, 20.0, 2.0, f32::NAN, 0.0],
        ],
    );
    let set = read_anomalous_intensities_from_mtz(&mtz).unwrap();
    let got: Vec<(Sign, f64)> = set.data.iter().map(|r| (r.sign, r.value)).collect();
    assert_eq!(got, [(Sign::Plus, 10.0), (Sign::Minus, 12.0), (Sign::Plus, 20.0)]);
    assert_eq!(set.stats().total, 4);

    let incomplete = merged_mtz(&["I(+)", "SIGI(+)", "I(-)"], &[]);
    let err = read_anomalous_intensities_from_mtz(&incomplete).unwrap_err();
    assert_snapshot!(err, @"column not found: SIGI(-)");
}

#[test]
fn mmcif_unmerged_reduces_to_asu() {
    let block = refln_block(
        "_diffrn_refln.",
        &["index_h", "index_k", "index_l", "intensity_net", "intensity_sigma"],
        &[
            &["1", "2", "3", "100", "10"],
            &["-1", "2", "-3", "90(2)", "9"],
            &["1", "-2", "3", "110", "11"],
            &["1", "0", "0", "?", "1"],
        ],
    );
    let set = read_unmerged_intensities_from_mmcif(&block).unwrap();
    assert_eq!(set.len(), 3);
    assert!(set.data.iter().all(|r| r.hkl == [1, 2, 3]));
    let signs: Vec<Sign> = set.data.iter().map(|r| r.sign).collect();
    assert_eq!(signs, [Sign::Plus, Sign::Plus, Sign::Minus]);
    assert_eq!(set.wavelength, 1.54);
    assert_eq!(set.spacegroup_str(), "P 1 21 1");
}

#[test]
fn unmerged_observations_split_into_plus_and_minus() {
    let mut xds = XdsAscii::new(4, cell(), 0.8);
    xds.data.push(XdsRefl::new([1, 2, 3], 100.0, 10.0));
    xds.data.push(XdsRefl::new([-1, 2, -3], 100.0, 10.0));
    xds.data.push(XdsRefl::new([-1, -2, -3], 80.0, 10.0));

    let mut set = read_unmerged_intensities_from_xds(&xds).unwrap();
    set.merge_in_place(true);
    let keys: Vec<(Miller, Sign)> = set.data.iter().map(|r| (r.hkl, r.sign)).collect();
    assert_eq!(keys, [([1, 2, 3], Sign::Minus), ([1, 2, 3], Sign::Plus)]);
    assert!((set.data[0].value - 80.0).abs() < 1e-9);
    assert!((set.data[1].value - 100.0).abs() < 1e-9);

    let block = refln_block(
        "_diffrn_refln.",
        &["index_h", "index_k", "index_l", "intensity_net", "intensity_sigma"],
        &[
            &["1", "2", "3", "100", "10"],
            &["-1", "2", "-3", "100", "10"],
            &["-1", "-2", "-3", "80", "10"],
        ],
    );
    let mut set = read_unmerged_intensities_from_mmcif(&block).unwrap();
    set.merge_in_place(true);
    assert_eq!(set.len(), 2);
    assert_eq!(set.data[0].sign, Sign::Minus);
    assert_eq!(set.data[1].sign, Sign::Plus);
}

#[test]
fn mmcif_kind_must_match_loop_category() {
    let merged = refln_block(
        "_refln.",
        &["index_h", "index_k", "index_l", "intensity_net", "intensity_sigma"],
        &[&["1", "2", "3", "100", "10"]],
    );
    let err = read_unmerged_intensities_from_mmcif(&merged).unwrap_err();
    assert_snapshot!(err, @"expected unmerged file");

    let unmerged = refln_block(
        "_diffrn_refln.",
        &[
            "index_h",
            "index_k",
            "index_l",
            "intensity_meas",
            "intensity_sigma",
            "pdbx_I_plus",
            "pdbx_I_plus_sigma",
            "pdbx_I_minus",
            "pdbx_I_minus_sigma",
        ],
        &[&["1", "2", "3", "50", "5", "52", "6", "48", "6"]],
    );
    assert!(matches!(
        read_mean_intensities_from_mmcif(&unmerged),
        Err(IngestError::ExpectedMerged)
    ));
    assert!(matches!(
        read_anomalous_intensities_from_mmcif(&unmerged),
        Err(IngestError::ExpectedMerged)
    ));
}

#[test]
fn rows_without_index_are_counted_as_rejected() {
    let block = refln_block(
        "_refln.",
        &["index_h", "index_k", "index_l", "intensity_meas", "intensity_sigma"],
        &[
            &["1", "2", "3", "10", "1"],
            &["?", "?", "?", "50", "1"],
            &["1", ".", "2", "50", "1"],
            &["1", "x", "2", "50", "1"],
        ],
    );
    let set = read_mean_intensities_from_mmcif(&block).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.data[0].hkl, [1, 2, 3]);
    assert_eq!(set.stats().total, 4);
    assert_eq!(set.stats().rejected(), 3);
    let (d_max, d_min) = set.resolution_range().unwrap();
    assert!(d_max.is_finite());
    assert_eq!(d_max, d_min);

    let mut mtz = unmerged_mtz();
    mtz.add_row(&[f32::NAN, 1.0, 1.0, 1.0, 1.0, 60.0, 6.0]).unwrap();
    let set = read_unmerged_intensities_from_mtz(&mtz).unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.stats().total, 5);
}

#[test]
fn mmcif_mean_and_anomalous() {
    let tags = [
        "index_h",
        "index_k",
        "index_l",
        "intensity_meas",
        "intensity_sigma",
        "pdbx_I_plus",
        "pdbx_I_plus_sigma",
        "pdbx_I_minus",
        "pdbx_I_minus_sigma",
    ];
    let block = refln_block(
        "_refln.",
        &tags,
        &[
            &["1", "2", "3", "50", "5", "52", "6", "48", "6"],
            &["2", "0", "0", "30", "0", "31", "3", ".", "?"],
        ],
    );

    let mean = read_mean_intensities_from_mmcif(&block).unwrap();
    assert_eq!(mean.len(), 1);
    assert_eq!(mean.data[0].value, 50.0);
    assert_eq!(mean.data[0].sign, Sign::Pooled);

    let anom = read_anomalous_intensities_from_mmcif(&block).unwrap();
    let got: Vec<(Sign, f64)> = anom.data.iter().map(|r| (r.sign, r.value)).collect();
    assert_eq!(got, [(Sign::Plus, 52.0), (Sign::Minus, 48.0), (Sign::Plus, 31.0)]);
}

#[test]
fn mmcif_missing_tag_is_reported_with_category() {
    let block = refln_block("_refln.", &["index_h", "index_k", "index_l", "intensity_meas"], &[]);
    let err = read_mean_intensities_from_mmcif(&block).unwrap_err();
    assert_snapshot!(err, @"column not found: _refln.intensity_sigma");

    let mut no_symmetry = block.clone();
    no_symmetry.spacegroup = None;
    no_symmetry.tags.push("intensity_sigma".into());
    assert!(matches!(
        read_mean_intensities_from_mmcif(&no_symmetry),
        Err(IngestError::Merge(MergeError::MissingSymmetry))
    ));
}

#[test]
fn xds_unmerged_looks_up_symmetry_by_number() {
    let mut xds = XdsAscii::new(19, cell(), 0.8);
    xds.data.push(XdsRefl::new([1, 2, 3], 100.0, 10.0));
    xds.data.push(XdsRefl::new([-1, -2, 3], 110.0, 10.0));
    xds.data.push(XdsRefl::new([-1, 2, 3], 90.0, 10.0));
    xds.data.push(XdsRefl::new([1, 1, 1], 40.0, -1.0));

    let set = read_unmerged_intensities_from_xds(&xds).unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.stats().rejected(), 1);
    assert!(set.data.iter().all(|r| r.hkl == [1, 2, 3]));
    let signs: Vec<Sign> = set.data.iter().map(|r| r.sign).collect();
    assert_eq!(signs, [Sign::Plus, Sign::Plus, Sign::Minus]);
    assert_eq!(set.spacegroup_str(), "P 21 21 21");
    assert_eq!(set.wavelength, 0.8);

    let unknown = XdsAscii::new(230, cell(), 0.8);
    let err = read_unmerged_intensities_from_xds(&unknown).unwrap_err();
    assert_snapshot!(err, @"unknown space group: 230");
}

#[test]
fn dispatch_by_source_and_kind() {
    let mtz = unmerged_mtz();
    let set = read_intensities(Source::Mtz(&mtz), DataKind::Unmerged).unwrap();
    assert_eq!(set.len(), 3);
    assert!(read_intensities(Source::Mtz(&mtz), DataKind::Mean).is_err());

    let xds = XdsAscii::new(1, cell(), 1.0);
    assert!(read_intensities(Source::Xds(&xds), DataKind::Unmerged).unwrap().is_empty());
    let err = read_intensities(Source::Xds(&xds), DataKind::Mean).unwrap_err();
    assert_snapshot!(err, @"XDS files do not contain mean intensities");
}
