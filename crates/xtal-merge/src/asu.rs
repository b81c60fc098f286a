//! Symmetry-driven transformations: ASU reduction and absence removal.

use tracing::debug;

use xtal_model::Sign;

use crate::error::Result;
use crate::intensities::Intensities;

impl Intensities {
    /// Replace every index outside the asymmetric unit by its ASU
    /// representative.
    ///
    /// For unmerged data (`merged == false`) the sign is derived from the
    /// symmetry operation used: odd codes give I(+), even codes I(-). Merged
    /// data keeps its sign. Indices already in the ASU are left untouched,
    /// so the operation is idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MergeError::MissingSymmetry`] without a space group.
    pub fn switch_to_asu_indices(&mut self, merged: bool) -> Result<()> {
        let symmetry = self.symmetry()?.clone();
        let mut moved = 0usize;
        for refl in &mut self.data {
            if symmetry.is_in_asu(refl.hkl) {
                continue;
            }
            let (hkl, isym) = symmetry.to_asu(refl.hkl);
            refl.hkl = hkl;
            if !merged {
                refl.sign = Sign::from_isym(isym);
            }
            moved += 1;
        }
        debug!(
            spacegroup = symmetry.name(),
            reflections = self.data.len(),
            moved,
            merged,
            "switched to asu indices"
        );
        Ok(())
    }

    /// Drop reflections forbidden by the space group.
    ///
    /// Without a space group there is nothing to test against and the set is
    /// left unchanged. Returns the number of records removed.
    pub fn remove_systematic_absences(&mut self) -> usize {
        let Some(symmetry) = self.spacegroup.clone() else {
            debug!("no space group, systematic absences kept");
            return 0;
        };
        let before = self.data.len();
        self.data
            .retain(|refl| !symmetry.is_systematic_absence(refl.hkl));
        let removed = before - self.data.len();
        debug!(
            spacegroup = symmetry.name(),
            removed, "removed systematic absences"
        );
        removed
    }
}
