use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which measurement an adapter extracts from an origin dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    /// Per-observation intensities, one record per measurement.
    Unmerged,
    /// Merged mean intensities, Friedel mates pooled.
    Mean,
    /// Merged I(+) and I(-) stored side by side.
    Anomalous,
}

impl DataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Unmerged => "unmerged",
            DataKind::Mean => "mean",
            DataKind::Anomalous => "anomalous",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unmerged" => Ok(DataKind::Unmerged),
            "mean" | "imean" => Ok(DataKind::Mean),
            "anomalous" | "anom" => Ok(DataKind::Anomalous),
            _ => Err(format!("Unknown data kind: {}", s)),
        }
    }
}
