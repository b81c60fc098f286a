//! Crystallographic symmetry for reflection data.
//!
//! The merging engine only talks to the [`Symmetry`] trait. This crate also
//! ships one backend, [`SpaceGroup`], which derives every answer from an
//! explicit list of symmetry operations, and a small table of common space
//! groups.
//!
//! # Example
//!
//! ```
//! use xtal_symmetry::{Symmetry, find_spacegroup};
//!
//! let sg = find_spacegroup("P 21 21 21").unwrap();
//! assert!(sg.is_systematic_absence([3, 0, 0]));
//! let (asu, isym) = sg.to_asu([-1, -2, -3]);
//! assert!(sg.is_in_asu(asu));
//! assert!(isym > 0);
//! ```

mod error;
mod group;
mod op;
mod table;

use std::fmt;
use std::sync::Arc;

use xtal_model::Miller;

pub use error::{Result, SymmetryError};
pub use group::SpaceGroup;
pub use op::{DEN, SymOp};
pub use table::{
    SpaceGroupEntry, builtin_spacegroups, find_spacegroup, find_spacegroup_by_name,
    find_spacegroup_by_number,
};

/// Symmetry questions asked by the merging engine.
///
/// Operation codes returned by [`Symmetry::to_asu`] follow the MTZ `ISYM`
/// convention: `2i + 1` when the i-th operation maps the index onto the
/// asymmetric unit, `2i + 2` when its Friedel mate does.
pub trait Symmetry: fmt::Debug + Send + Sync {
    /// Display name (Hermann-Mauguin symbol).
    fn name(&self) -> &str;

    /// True if `hkl` already lies inside the reciprocal asymmetric unit.
    fn is_in_asu(&self, hkl: Miller) -> bool;

    /// Symmetry-equivalent index inside the asymmetric unit plus the code of
    /// the operation that produced it.
    fn to_asu(&self, hkl: Miller) -> (Miller, i32);

    /// True if the symmetry forbids any intensity at `hkl`.
    fn is_systematic_absence(&self, hkl: Miller) -> bool;
}

/// Shared, read-only handle to a symmetry backend.
pub type SymmetryRef = Arc<dyn Symmetry>;
