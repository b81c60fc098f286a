//! Intensity ingestion from reflection files.
//!
//! The file parsers live elsewhere; this crate works on their in-memory
//! results ([`MtzTable`], [`ReflnBlock`], [`XdsAscii`]). Each format exposes
//! its rows through the [`DataProxy`] trait so a single ingestion loop
//! serves all of them, and one adapter per (format, [`DataKind`]) pair
//! validates the required columns before any reflection is copied.
//!
//! [`DataKind`]: xtal_model::DataKind

pub mod adapters;
pub mod cif_value;
pub mod csv_table;
mod error;
pub mod mtz;
pub mod proxy;
pub mod refln;
pub mod xds;

pub use adapters::{
    Source, read_anomalous_intensities_from_mmcif, read_anomalous_intensities_from_mtz,
    read_intensities, read_mean_intensities_from_mmcif, read_mean_intensities_from_mtz,
    read_unmerged_intensities_from_mmcif, read_unmerged_intensities_from_mtz,
    read_unmerged_intensities_from_xds,
};
pub use cif_value::{CifValue, quote};
pub use csv_table::{ReflnMetadata, read_refln_csv, read_refln_csv_from_reader};
pub use error::{IngestError, Result};
pub use mtz::{MtzBatch, MtzColumn, MtzDataProxy, MtzDataset, MtzTable};
pub use proxy::{DataProxy, read_anomalous_data, read_data};
pub use refln::{ReflnBlock, ReflnDataProxy, parse_cif_number};
pub use xds::{XdsAscii, XdsDataProxy, XdsRefl};
