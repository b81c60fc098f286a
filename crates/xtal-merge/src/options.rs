//! Configuration of the reduce-and-merge pass.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::intensities::Intensities;

/// Options controlling [`Intensities::merge_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Keep I(+) and I(-) as separate merged series.
    /// Default: false (Friedel mates pooled into a mean).
    pub output_plus_minus: bool,

    /// Drop systematically absent reflections before merging.
    /// Default: true.
    pub remove_absences: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            output_plus_minus: false,
            remove_absences: true,
        }
    }
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for anomalous processing (separate I(+)/I(-)).
    pub fn anomalous() -> Self {
        Self {
            output_plus_minus: true,
            ..Self::default()
        }
    }

    pub fn with_plus_minus(mut self, enable: bool) -> Self {
        self.output_plus_minus = enable;
        self
    }

    pub fn with_absence_removal(mut self, enable: bool) -> Self {
        self.remove_absences = enable;
        self
    }
}

/// Record counts before and after a merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    pub input: usize,
    pub absences_removed: usize,
    pub merged: usize,
}

impl MergeSummary {
    /// Mean number of observations per merged reflection.
    pub fn multiplicity(&self) -> f64 {
        if self.merged == 0 {
            0.0
        } else {
            (self.input - self.absences_removed) as f64 / self.merged as f64
        }
    }
}

impl Intensities {
    /// Remove absences (if requested) and merge according to `options`.
    pub fn merge_with(&mut self, options: &MergeOptions) -> MergeSummary {
        let input = self.len();
        let absences_removed = if options.remove_absences {
            self.remove_systematic_absences()
        } else {
            0
        };
        self.merge_in_place(options.output_plus_minus);
        let summary = MergeSummary {
            input,
            absences_removed,
            merged: self.len(),
        };
        info!(
            spacegroup = self.spacegroup_str(),
            input = summary.input,
            absences_removed = summary.absences_removed,
            merged = summary.merged,
            "merge complete"
        );
        summary
    }
}
