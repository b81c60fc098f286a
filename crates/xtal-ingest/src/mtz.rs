//! In-memory MTZ reflection table.
//!
//! MTZ stores reflections as a flat row-major array of `f32`, one value per
//! column, with missing values encoded as NaN. The first three columns are
//! always H, K and L.

use xtal_model::{Miller, UnitCell};
use xtal_symmetry::SymmetryRef;

use crate::error::{IngestError, Result};
use crate::proxy::{DataProxy, index_from_f64};

/// Column header: label, MTZ type code and owning dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct MtzColumn {
    pub label: String,
    /// Single-letter MTZ column type (`H` index, `J` intensity, `Q` sigma,
    /// `Y` M/ISYM, `B` batch, ...).
    pub kind: char,
    pub dataset_id: i32,
    /// Position of the column within a row.
    pub idx: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MtzDataset {
    pub id: i32,
    pub project_name: String,
    pub crystal_name: String,
    pub dataset_name: String,
    pub cell: UnitCell,
    pub wavelength: f64,
}

/// Header of one image batch; present only in unmerged files.
#[derive(Debug, Clone, PartialEq)]
pub struct MtzBatch {
    pub number: i32,
    pub dataset_id: i32,
    /// Cell refined for this batch; all zeros when the header has none.
    pub cell: UnitCell,
}

#[derive(Debug, Clone, Default)]
pub struct MtzTable {
    pub title: String,
    pub cell: UnitCell,
    pub spacegroup: Option<SymmetryRef>,
    pub datasets: Vec<MtzDataset>,
    pub columns: Vec<MtzColumn>,
    pub batches: Vec<MtzBatch>,
    pub data: Vec<f32>,
}

impl MtzTable {
    /// Empty table with the base dataset (ID 0) and H, K, L columns.
    pub fn new(cell: UnitCell, spacegroup: Option<SymmetryRef>) -> Self {
        let mut mtz = Self {
            cell: cell.clone(),
            spacegroup,
            ..Self::default()
        };
        mtz.datasets.push(MtzDataset {
            id: 0,
            project_name: "HKL_base".to_string(),
            crystal_name: "HKL_base".to_string(),
            dataset_name: "HKL_base".to_string(),
            cell,
            wavelength: 0.0,
        });
        for label in ["H", "K", "L"] {
            mtz.add_column(label, 'H', 0);
        }
        mtz
    }

    /// Register a dataset and return its ID.
    pub fn add_dataset(&mut self, name: impl Into<String>, wavelength: f64) -> i32 {
        let id = self.datasets.iter().map(|ds| ds.id).max().unwrap_or(-1) + 1;
        let name = name.into();
        self.datasets.push(MtzDataset {
            id,
            project_name: name.clone(),
            crystal_name: name.clone(),
            dataset_name: name,
            cell: self.cell.clone(),
            wavelength,
        });
        id
    }

    pub fn add_column(&mut self, label: impl Into<String>, kind: char, dataset_id: i32) -> usize {
        let idx = self.columns.len();
        self.columns.push(MtzColumn {
            label: label.into(),
            kind,
            dataset_id,
            idx,
        });
        idx
    }

    pub fn add_batch(&mut self, number: i32, dataset_id: i32, cell: UnitCell) {
        self.batches.push(MtzBatch {
            number,
            dataset_id,
            cell,
        });
    }

    /// Append one row; it must have a value for every column.
    pub fn add_row(&mut self, row: &[f32]) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(IngestError::RowLengthMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.data.extend_from_slice(row);
        Ok(())
    }

    pub fn nrows(&self) -> usize {
        if self.columns.is_empty() {
            0
        } else {
            self.data.len() / self.columns.len()
        }
    }

    /// True for files with per-image batch headers.
    pub fn is_unmerged(&self) -> bool {
        !self.batches.is_empty()
    }

    pub fn column_with_label(&self, label: &str) -> Option<&MtzColumn> {
        self.columns.iter().find(|col| col.label == label)
    }

    pub fn get_column_with_label(&self, label: &str) -> Result<&MtzColumn> {
        self.column_with_label(label)
            .ok_or_else(|| IngestError::column_not_found(label))
    }

    /// First column matching any of `labels`, in order of preference.
    pub fn column_with_one_of_labels(&self, labels: &[&str]) -> Option<&MtzColumn> {
        labels.iter().find_map(|label| self.column_with_label(label))
    }

    pub fn dataset(&self, id: i32) -> Result<&MtzDataset> {
        self.datasets
            .iter()
            .find(|ds| ds.id == id)
            .ok_or(IngestError::MissingDataset { id })
    }

    /// H, K and L must be the first three columns.
    pub fn check_hkl_columns(&self) -> Result<()> {
        for (expected, label) in ["H", "K", "L"].into_iter().enumerate() {
            let col = self.get_column_with_label(label)?;
            if col.idx != expected {
                return Err(IngestError::misplaced_column(label, expected, col.idx));
            }
        }
        Ok(())
    }

    /// Mean of the cells recorded in batch headers, falling back to the
    /// global cell when no batch has one.
    pub fn average_cell_from_batches(&self) -> UnitCell {
        let mut sum = [0.0; 6];
        let mut count = 0usize;
        for batch in self.batches.iter().filter(|b| b.cell.is_crystal()) {
            for (acc, param) in sum.iter_mut().zip(batch.cell.params()) {
                *acc += param;
            }
            count += 1;
        }
        if count == 0 {
            return self.cell.clone();
        }
        UnitCell::from_params(sum.map(|total| total / count as f64))
    }
}

/// [`DataProxy`] over the raw MTZ array.
#[derive(Debug, Clone, Copy)]
pub struct MtzDataProxy<'a> {
    pub mtz: &'a MtzTable,
}

impl<'a> MtzDataProxy<'a> {
    pub fn new(mtz: &'a MtzTable) -> Self {
        Self { mtz }
    }
}

impl DataProxy for MtzDataProxy<'_> {
    fn stride(&self) -> usize {
        self.mtz.columns.len()
    }

    fn size(&self) -> usize {
        self.mtz.data.len()
    }

    fn hkl_at(&self, offset: usize) -> Option<Miller> {
        let data = &self.mtz.data;
        Some([
            index_from_f64(f64::from(data[offset]))?,
            index_from_f64(f64::from(data[offset + 1]))?,
            index_from_f64(f64::from(data[offset + 2]))?,
        ])
    }

    fn num_at(&self, offset: usize) -> f64 {
        f64::from(self.mtz.data[offset])
    }
}
