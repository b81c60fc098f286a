use serde::{Deserialize, Serialize};
use tracing::debug;

use xtal_model::{Geometry, Refl, UnitCell};
use xtal_symmetry::SymmetryRef;

use crate::error::{MergeError, Result};

/// Row counts seen while filling an [`Intensities`] set.
///
/// Rows with a NaN value or a non-positive sigma are dropped silently; these
/// counts are the only trace they leave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Records offered to the set.
    pub total: usize,
    /// Records that passed validation and were stored.
    pub accepted: usize,
}

impl IngestStats {
    pub fn rejected(&self) -> usize {
        self.total - self.accepted
    }
}

/// Intensity measurements of one dataset with the metadata needed to
/// reduce and merge them.
#[derive(Debug, Clone, Default)]
pub struct Intensities {
    pub data: Vec<Refl>,
    pub spacegroup: Option<SymmetryRef>,
    pub unit_cell: UnitCell,
    pub wavelength: f64,
    stats: IngestStats,
}

impl Intensities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy cell and symmetry from the origin dataset.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::MissingSymmetry`] when the dataset carries no
    /// usable space group; nothing is modified in that case.
    pub fn set_metadata(&mut self, cell: UnitCell, spacegroup: Option<SymmetryRef>) -> Result<()> {
        let spacegroup = spacegroup.ok_or(MergeError::MissingSymmetry)?;
        self.unit_cell = cell;
        self.spacegroup = Some(spacegroup);
        Ok(())
    }

    /// Store `refl` unless its value is NaN or its sigma is not positive.
    ///
    /// Returns whether the record was kept.
    pub fn add_if_valid(&mut self, refl: Refl) -> bool {
        self.stats.total += 1;
        if !refl.is_valid() {
            return false;
        }
        self.stats.accepted += 1;
        self.data.push(refl);
        true
    }

    /// Count a source row that could not become a record at all.
    pub fn reject_row(&mut self) {
        self.stats.total += 1;
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True when the records carry Friedel signs (I(+)/I(-) data).
    pub fn have_sign(&self) -> bool {
        self.data.first().is_some_and(|refl| refl.sign.is_tracked())
    }

    pub fn spacegroup_str(&self) -> &str {
        self.spacegroup.as_ref().map_or("none", |sg| sg.name())
    }

    pub(crate) fn symmetry(&self) -> Result<&SymmetryRef> {
        self.spacegroup.as_ref().ok_or(MergeError::MissingSymmetry)
    }

    /// Resolution limits `(d_max, d_min)` in Angstroms.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::EmptySet`] when there are no reflections.
    pub fn resolution_range(&self) -> Result<(f64, f64)> {
        if self.data.is_empty() {
            return Err(MergeError::EmptySet {
                operation: "resolution range",
            });
        }
        let mut min_1_d2 = f64::INFINITY;
        let mut max_1_d2 = 0.0_f64;
        for refl in &self.data {
            let inv_d2 = self.unit_cell.reciprocal_spacing_squared(refl.hkl);
            min_1_d2 = min_1_d2.min(inv_d2);
            max_1_d2 = max_1_d2.max(inv_d2);
        }
        debug!(
            reflections = self.data.len(),
            min_1_d2, max_1_d2, "resolution range scanned"
        );
        Ok((1.0 / min_1_d2.sqrt(), 1.0 / max_1_d2.sqrt()))
    }

    /// Sort records by `(h, k, l, sign)`.
    pub fn sort(&mut self) {
        self.data.sort_by_key(Refl::key);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use xtal_model::Sign;
    use xtal_symmetry::find_spacegroup;

    use super::*;

    fn p1() -> Option<SymmetryRef> {
        Some(Arc::new(find_spacegroup("P 1").unwrap()))
    }

    #[test]
    fn filter_counts_rejections() {
        let mut set = Intensities::new();
        assert!(set.add_if_valid(Refl::new([1, 0, 0], Sign::Pooled, 3.0, 1.0)));
        assert!(!set.add_if_valid(Refl::new([2, 0, 0], Sign::Pooled, f64::NAN, 1.0)));
        assert!(!set.add_if_valid(Refl::new([3, 0, 0], Sign::Pooled, 3.0, -1.0)));
        assert!(!set.add_if_valid(Refl::new([4, 0, 0], Sign::Pooled, 3.0, 0.0)));
        let stats = set.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected(), 3);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn missing_symmetry_leaves_set_untouched() {
        let mut set = Intensities::new();
        let cell = UnitCell::new(10.0, 10.0, 10.0, 90.0, 90.0, 90.0);
        let err = set.set_metadata(cell, None).unwrap_err();
        assert!(matches!(err, MergeError::MissingSymmetry));
        assert_eq!(set.unit_cell, UnitCell::default());
        assert_eq!(set.spacegroup_str(), "none");
    }

    #[test]
    fn have_sign_looks_at_first_record() {
        let mut set = Intensities::new();
        assert!(!set.have_sign());
        set.add_if_valid(Refl::new([1, 0, 0], Sign::Plus, 3.0, 1.0));
        assert!(set.have_sign());
    }

    #[test]
    fn resolution_range_orders_limits() {
        let mut set = Intensities::new();
        set.set_metadata(UnitCell::new(10.0, 20.0, 40.0, 90.0, 90.0, 90.0), p1())
            .unwrap();
        set.add_if_valid(Refl::new([1, 0, 0], Sign::Pooled, 3.0, 1.0));
        set.add_if_valid(Refl::new([0, 0, 1], Sign::Pooled, 3.0, 1.0));
        set.add_if_valid(Refl::new([2, 0, 0], Sign::Pooled, 3.0, 1.0));
        let (d_max, d_min) = set.resolution_range().unwrap();
        assert!((d_max - 40.0).abs() < 1e-9);
        assert!((d_min - 5.0).abs() < 1e-9);
        assert_eq!(set.spacegroup_str(), "P 1");
    }

    #[test]
    fn resolution_range_of_empty_set_fails() {
        let set = Intensities::new();
        let err = set.resolution_range().unwrap_err();
        assert_eq!(err.to_string(), "resolution range requires at least one reflection");
    }
}
