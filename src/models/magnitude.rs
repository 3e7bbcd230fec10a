use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::{MAG_HIGH_THRESHOLD, MAG_LOW_THRESHOLD};

/// Ordinal magnitude bucket used for grouping and colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MagnitudeCategory {
    #[serde(rename = "Below 2.5")]
    Below2_5,
    #[serde(rename = "2.5 - 4.5")]
    Between2_5And4_5,
    #[serde(rename = "Above 4.5")]
    Above4_5,
}

impl MagnitudeCategory {
    pub const ALL: [MagnitudeCategory; 3] = [
        MagnitudeCategory::Below2_5,
        MagnitudeCategory::Between2_5And4_5,
        MagnitudeCategory::Above4_5,
    ];

    /// Bucket a magnitude. `4.5` itself belongs to the middle band.
    ///
    /// A missing magnitude fails both comparisons and falls through to
    /// `Above4_5`, the same as a NaN would.
    pub fn from_magnitude(mag: Option<f64>) -> Self {
        match mag {
            Some(m) if m < MAG_LOW_THRESHOLD => MagnitudeCategory::Below2_5,
            Some(m) if m <= MAG_HIGH_THRESHOLD => MagnitudeCategory::Between2_5And4_5,
            _ => MagnitudeCategory::Above4_5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MagnitudeCategory::Below2_5 => "Below 2.5",
            MagnitudeCategory::Between2_5And4_5 => "2.5 - 4.5",
            MagnitudeCategory::Above4_5 => "Above 4.5",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == s)
    }
}

impl fmt::Display for MagnitudeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
