//! Reflection data model shared by the merging workspace.
//!
//! A reflection is identified by its Miller index and, for anomalous data,
//! by the Friedel sign of the measurement. Unit-cell geometry converts
//! indices into resolution.

pub mod cell;
pub mod kind;
pub mod refl;

pub use cell::{Geometry, UnitCell};
pub use kind::DataKind;
pub use refl::{Miller, Refl, Sign};
