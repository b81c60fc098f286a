//! Inverse-variance weighted merging of repeated observations.

use tracing::debug;

use xtal_model::{Refl, Sign};

use crate::intensities::Intensities;

/// Running sums of one merge group.
#[derive(Debug, Default, Clone, Copy)]
struct WeightedSum {
    sum_wv: f64,
    sum_w: f64,
}

impl WeightedSum {
    fn add(&mut self, refl: &Refl) {
        let w = 1.0 / (refl.sigma * refl.sigma);
        self.sum_wv += w * refl.value;
        self.sum_w += w;
    }

    fn finish(self, out: &mut Refl) {
        out.value = self.sum_wv / self.sum_w;
        out.sigma = 1.0 / self.sum_w.sqrt();
    }
}

impl Intensities {
    /// Merge records sharing `(hkl, sign)` into one weighted mean.
    ///
    /// With `output_plus_minus == false` all signs are reset first, so
    /// Friedel mates are pooled into a single mean intensity. Otherwise
    /// I(+) and I(-) are merged separately.
    ///
    /// Weights are `1/sigma²`; the merged sigma is `1/sqrt(sum of weights)`.
    /// The per-observation records are replaced; keep a clone if they are
    /// still needed. An empty set is left as is.
    pub fn merge_in_place(&mut self, output_plus_minus: bool) {
        if self.data.is_empty() {
            return;
        }
        let input = self.data.len();
        if !output_plus_minus {
            for refl in &mut self.data {
                refl.sign = Sign::Pooled;
            }
        }
        self.sort();

        // `out` trails `read`; everything before `out` is finished.
        let mut out = 0;
        let mut sum = WeightedSum::default();
        for read in 0..self.data.len() {
            let refl = self.data[read];
            if !self.data[out].same_key(&refl) {
                sum.finish(&mut self.data[out]);
                sum = WeightedSum::default();
                out += 1;
                self.data[out] = refl;
            }
            sum.add(&refl);
        }
        sum.finish(&mut self.data[out]);
        self.data.truncate(out + 1);

        debug!(
            input,
            merged = self.data.len(),
            output_plus_minus,
            "merged observations"
        );
    }
}
