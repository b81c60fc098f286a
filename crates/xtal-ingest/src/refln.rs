//! Reflection loop of an mmCIF / SF-mmCIF block.

use xtal_model::{Miller, UnitCell};
use xtal_symmetry::SymmetryRef;

use crate::error::{IngestError, Result};
use crate::proxy::{DataProxy, index_from_f64};

/// The `_refln` (merged) or `_diffrn_refln` (unmerged) loop of one data
/// block, with the block metadata needed for merging.
#[derive(Debug, Clone, Default)]
pub struct ReflnBlock {
    pub block_name: String,
    /// Category prefix of the loop, e.g. `_refln.`.
    pub tag_prefix: String,
    /// Loop tags without the category prefix (`index_h`, `intensity_meas`).
    pub tags: Vec<String>,
    /// Row-major loop values. Length = `tags.len() * nrows()`.
    pub values: Vec<String>,
    pub cell: UnitCell,
    pub spacegroup: Option<SymmetryRef>,
    pub wavelength: f64,
}

impl ReflnBlock {
    pub fn new(block_name: impl Into<String>, tag_prefix: impl Into<String>) -> Self {
        Self {
            block_name: block_name.into(),
            tag_prefix: tag_prefix.into(),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_row<I, S>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        if row.len() != self.tags.len() {
            return Err(IngestError::RowLengthMismatch {
                expected: self.tags.len(),
                actual: row.len(),
            });
        }
        self.values.extend(row);
        Ok(())
    }

    pub fn nrows(&self) -> usize {
        if self.tags.is_empty() {
            0
        } else {
            self.values.len() / self.tags.len()
        }
    }

    /// True for a `_diffrn_refln` loop of per-observation data.
    pub fn is_unmerged(&self) -> bool {
        self.tag_prefix.starts_with("_diffrn_refln")
    }

    /// Column position of `tag` (case-insensitive, prefix omitted).
    pub fn find_column_index(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn get_column_index(&self, tag: &str) -> Result<usize> {
        self.find_column_index(tag)
            .ok_or_else(|| IngestError::column_not_found(format!("{}{}", self.tag_prefix, tag)))
    }
}

/// Parse a CIF numeric value.
///
/// A standard uncertainty in parentheses (`50.123(4)`) is ignored; the
/// unknown (`?`) and inapplicable (`.`) markers and anything unparsable read
/// as NaN.
pub fn parse_cif_number(raw: &str) -> f64 {
    let s = raw.trim();
    let s = match s.find('(') {
        Some(idx) => &s[..idx],
        None => s,
    };
    s.parse().unwrap_or(f64::NAN)
}

/// [`DataProxy`] over the loop values, with the index columns located once.
#[derive(Debug, Clone, Copy)]
pub struct ReflnDataProxy<'a> {
    block: &'a ReflnBlock,
    hkl_cols: [usize; 3],
}

impl<'a> ReflnDataProxy<'a> {
    /// # Errors
    ///
    /// Fails when any of `index_h`, `index_k`, `index_l` is missing.
    pub fn new(block: &'a ReflnBlock) -> Result<Self> {
        Ok(Self {
            block,
            hkl_cols: [
                block.get_column_index("index_h")?,
                block.get_column_index("index_k")?,
                block.get_column_index("index_l")?,
            ],
        })
    }
}

impl DataProxy for ReflnDataProxy<'_> {
    fn stride(&self) -> usize {
        self.block.tags.len()
    }

    fn size(&self) -> usize {
        self.block.values.len()
    }

    fn hkl_at(&self, offset: usize) -> Option<Miller> {
        let [h, k, l] = self
            .hkl_cols
            .map(|col| index_from_f64(parse_cif_number(&self.block.values[offset + col])));
        Some([h?, k?, l?])
    }

    fn num_at(&self, offset: usize) -> f64 {
        parse_cif_number(&self.block.values[offset])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cif_numbers() {
        assert_eq!(parse_cif_number("12.5"), 12.5);
        assert_eq!(parse_cif_number(" 50.123(4) "), 50.123);
        assert_eq!(parse_cif_number("-3"), -3.0);
        assert!(parse_cif_number("?").is_nan());
        assert!(parse_cif_number(".").is_nan());
        assert!(parse_cif_number("").is_nan());
    }

    #[test]
    fn proxy_reads_rows() {
        let mut block = ReflnBlock::new("r1abcsf", "_refln.").with_tags([
            "index_h",
            "index_k",
            "index_l",
            "intensity_meas",
        ]);
        block.add_row(["1", "-2", "3", "45.6(7)"]).unwrap();
        block.add_row(["0", "0", "4", "?"]).unwrap();
        block.add_row(["?", "1", "1", "3.0"]).unwrap();
        block.add_row(["1.5", "1", "1", "3.0"]).unwrap();
        assert!(block.add_row(["1"]).is_err());
        let proxy = ReflnDataProxy::new(&block).unwrap();
        assert_eq!(proxy.row_count(), 4);
        assert_eq!(proxy.hkl_at(0), Some([1, -2, 3]));
        assert_eq!(proxy.num_at(3), 45.6);
        assert_eq!(proxy.hkl_at(4), Some([0, 0, 4]));
        assert!(proxy.num_at(7).is_nan());
        assert_eq!(proxy.hkl_at(8), None);
        assert_eq!(proxy.hkl_at(12), None);
    }

    #[test]
    fn missing_index_column_is_reported_with_prefix() {
        let block = ReflnBlock::new("b", "_diffrn_refln.").with_tags(["index_h", "index_k"]);
        let err = ReflnDataProxy::new(&block).unwrap_err();
        assert_eq!(err.to_string(), "column not found: _diffrn_refln.index_l");
        assert!(block.is_unmerged());
    }
}
