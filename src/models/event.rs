use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::MagnitudeCategory;
use crate::utils::constants::QUALITY_METRIC_COLUMNS;

/// One CSV row as read, before any cleaning. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEvent {
    pub time: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub mag: Option<f64>,
    pub depth: Option<f64>,
    pub place: Option<String>,
    /// Ordered as `QUALITY_METRIC_COLUMNS`
    pub quality: [Option<f64>; 7],
}

/// Station/solution quality measurements. Missing values are stored as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    #[serde(rename = "Station Count")]
    pub station_count: f64,
    #[serde(rename = "Azimuth Gap")]
    pub azimuth_gap: f64,
    #[serde(rename = "Distance")]
    pub distance: f64,
    #[serde(rename = "RMS")]
    pub rms: f64,
    #[serde(rename = "horizontalError")]
    pub horizontal_error: f64,
    #[serde(rename = "magError")]
    pub mag_error: f64,
    #[serde(rename = "magNst")]
    pub mag_nst: f64,
}

impl QualityMetrics {
    /// Build from raw optional values, substituting zero for each gap.
    pub fn zero_filled(raw: &[Option<f64>; 7]) -> Self {
        let v = (*raw).map(|value| value.unwrap_or(0.0));
        Self {
            station_count: v[0],
            azimuth_gap: v[1],
            distance: v[2],
            rms: v[3],
            horizontal_error: v[4],
            mag_error: v[5],
            mag_nst: v[6],
        }
    }

    /// Values in `QUALITY_METRIC_COLUMNS` order.
    pub fn values(&self) -> [f64; 7] {
        [
            self.station_count,
            self.azimuth_gap,
            self.distance,
            self.rms,
            self.horizontal_error,
            self.mag_error,
            self.mag_nst,
        ]
    }

    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, f64)> {
        QUALITY_METRIC_COLUMNS.into_iter().zip(self.values())
    }
}

/// A cleaned earthquake event with its derived attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EventRecord {
    pub time: DateTime<Utc>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub mag: Option<f64>,
    pub depth: Option<f64>,
    pub place: Option<String>,

    #[serde(flatten)]
    pub quality: QualityMetrics,

    pub region: String,

    #[serde(rename = "Magnitude_Category")]
    pub magnitude_category: MagnitudeCategory,

    pub lat_bin: usize,
    pub lon_bin: usize,
}

impl EventRecord {
    pub fn has_magnitude(&self) -> bool {
        self.mag.is_some()
    }

    pub fn has_depth(&self) -> bool {
        self.depth.is_some()
    }

    /// Coordinates inside the valid WGS84 ranges.
    pub fn has_valid_coordinates(&self) -> bool {
        self.validate().is_ok()
    }
}
