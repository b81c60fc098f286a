//! Uniform row access over differently laid out reflection tables.

use tracing::debug;

use xtal_merge::Intensities;
use xtal_model::{Miller, Refl, Sign};

/// Flat, row-major view of a reflection table.
///
/// Offsets address single fields: the first field of row `r` is at
/// `r * stride()`, and `hkl_at` takes the offset of a row's first field.
pub trait DataProxy {
    /// Fields per row.
    fn stride(&self) -> usize;

    /// Total number of fields (rows × stride).
    fn size(&self) -> usize;

    /// Miller index of the row starting at `offset`; `None` when any of
    /// the three fields is missing or not an integer.
    fn hkl_at(&self, offset: usize) -> Option<Miller>;

    /// Numeric field at `offset`; missing values read as NaN.
    fn num_at(&self, offset: usize) -> f64;

    fn row_count(&self) -> usize {
        match self.stride() {
            0 => 0,
            stride => self.size() / stride,
        }
    }

    /// Offsets of the first field of each row.
    fn row_offsets(&self) -> std::iter::StepBy<std::ops::Range<usize>> {
        let stride = self.stride().max(1);
        (0..self.row_count() * stride).step_by(stride)
    }
}

/// Integral index component, or `None` for NaN, infinities, fractions and
/// values outside the `i32` range.
pub fn index_from_f64(value: f64) -> Option<i32> {
    let in_range = value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX);
    (in_range && value.fract() == 0.0).then_some(value as i32)
}

/// Stream one value/sigma pair per row into `out`, marking every record
/// with `sign`.
///
/// Rows without a usable Miller index are counted as rejected.
pub fn read_data<P: DataProxy>(
    out: &mut Intensities,
    proxy: &P,
    sign: Sign,
    value_idx: usize,
    sigma_idx: usize,
) {
    out.data.reserve(proxy.row_count());
    let mut unindexed = 0usize;
    for offset in proxy.row_offsets() {
        let Some(hkl) = proxy.hkl_at(offset) else {
            out.reject_row();
            unindexed += 1;
            continue;
        };
        out.add_if_valid(Refl::new(
            hkl,
            sign,
            proxy.num_at(offset + value_idx),
            proxy.num_at(offset + sigma_idx),
        ));
    }
    log_unindexed(unindexed);
}

pub(crate) fn log_unindexed(unindexed: usize) {
    if unindexed > 0 {
        debug!(rows = unindexed, "skipped rows without a valid miller index");
    }
}

/// Stream I(+) and I(-) stored side by side; `[0]` indices address the
/// plus columns, `[1]` the minus columns.
pub fn read_anomalous_data<P: DataProxy>(
    out: &mut Intensities,
    proxy: &P,
    value_idx: [usize; 2],
    sigma_idx: [usize; 2],
) {
    out.data.reserve(2 * proxy.row_count());
    let mut unindexed = 0usize;
    for offset in proxy.row_offsets() {
        let Some(hkl) = proxy.hkl_at(offset) else {
            out.reject_row();
            unindexed += 1;
            continue;
        };
        for (j, sign) in [Sign::Plus, Sign::Minus].into_iter().enumerate() {
            out.add_if_valid(Refl::new(
                hkl,
                sign,
                proxy.num_at(offset + value_idx[j]),
                proxy.num_at(offset + sigma_idx[j]),
            ));
        }
    }
    log_unindexed(unindexed);
}
