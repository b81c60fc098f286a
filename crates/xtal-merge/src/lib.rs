//! Merging of redundant intensity measurements.
//!
//! An [`Intensities`] set is filled once by a source adapter and then
//! transformed in place: systematic absences removed, indices reduced to
//! the asymmetric unit, and repeated observations of the same reflection
//! combined by inverse-variance weighting.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use xtal_merge::Intensities;
//! use xtal_model::{Refl, Sign, UnitCell};
//! use xtal_symmetry::find_spacegroup;
//!
//! let mut set = Intensities::default();
//! set.set_metadata(
//!     UnitCell::new(40.0, 50.0, 60.0, 90.0, 90.0, 90.0),
//!     Some(Arc::new(find_spacegroup("P 1").unwrap())),
//! )
//! .unwrap();
//! set.add_if_valid(Refl::new([1, 2, 3], Sign::Pooled, 10.0, 1.0));
//! set.add_if_valid(Refl::new([1, 2, 3], Sign::Pooled, 20.0, 2.0));
//! set.add_if_valid(Refl::new([1, 2, 4], Sign::Pooled, 5.0, -1.0));
//! set.merge_in_place(false);
//! assert_eq!(set.len(), 1);
//! assert!((set.data[0].value - 12.0).abs() < 1e-12);
//! ```

mod asu;
mod error;
mod intensities;
mod merge;
mod options;

pub use error::{MergeError, Result};
pub use intensities::{IngestStats, Intensities};
pub use options::{MergeOptions, MergeSummary};
