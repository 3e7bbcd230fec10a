use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::{DashboardError, Result};
use crate::models::{Dataset, MagnitudeCategory};

/// Summary statistics the layout is parameterised by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_events: usize,
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub mag_min: f64,
    pub mag_max: f64,
    pub depth_min: f64,
    pub depth_max: f64,
    pub regions: Vec<String>,
    pub geographic_bounds: GeographicBounds,
    pub category_counts: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeographicBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: MagnitudeCategory,
    pub count: usize,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let records = dataset.records();
        let first = records.first().ok_or_else(|| {
            DashboardError::MissingData("cannot summarise an empty dataset".to_string())
        })?;

        let mut time_min = first.time;
        let mut time_max = first.time;
        let mut bounds = GeographicBounds {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lon: first.longitude,
            max_lon: first.longitude,
        };
        let mut mag_range: Option<(f64, f64)> = None;
        let mut depth_range: Option<(f64, f64)> = None;
        let mut counts = [0usize; 3];

        for record in records {
            time_min = time_min.min(record.time);
            time_max = time_max.max(record.time);

            bounds.min_lat = bounds.min_lat.min(record.latitude);
            bounds.max_lat = bounds.max_lat.max(record.latitude);
            bounds.min_lon = bounds.min_lon.min(record.longitude);
            bounds.max_lon = bounds.max_lon.max(record.longitude);

            if let Some(mag) = record.mag {
                mag_range = Some(widen(mag_range, mag));
            }
            if let Some(depth) = record.depth {
                depth_range = Some(widen(depth_range, depth));
            }

            let slot = MagnitudeCategory::ALL
                .iter()
                .position(|c| *c == record.magnitude_category)
                .unwrap_or(2);
            counts[slot] += 1;
        }

        let (mag_min, mag_max) = mag_range.ok_or_else(|| {
            DashboardError::MissingData("'mag' column contains only missing values".to_string())
        })?;
        let (depth_min, depth_max) = depth_range.ok_or_else(|| {
            DashboardError::MissingData("'depth' column contains only missing values".to_string())
        })?;

        Ok(Self {
            total_events: records.len(),
            time_min,
            time_max,
            mag_min,
            mag_max,
            depth_min,
            depth_max,
            regions: dataset.unique_regions(),
            geographic_bounds: bounds,
            category_counts: MagnitudeCategory::ALL
                .iter()
                .zip(counts)
                .map(|(category, count)| CategoryCount {
                    category: *category,
                    count,
                })
                .collect(),
        })
    }

    /// Calendar (UTC) dates bounding the events.
    pub fn date_bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.time_min.date_naive(), self.time_max.date_naive())
    }

    pub fn detailed_summary(&self) -> String {
        let (start, end) = self.date_bounds();
        let mut out = String::new();

        out.push_str("=== Earthquake Dataset Summary ===\n");
        out.push_str(&format!("Events: {}\n", self.total_events));
        out.push_str(&format!("Date Range: {} to {}\n", start, end));
        out.push_str(&format!(
            "Magnitude Range: {:.2} to {:.2}\n",
            self.mag_min, self.mag_max
        ));
        out.push_str(&format!(
            "Depth Range: {:.1} km to {:.1} km\n",
            self.depth_min, self.depth_max
        ));
        out.push_str(&format!(
            "Geographic Bounds: lat [{:.3}, {:.3}], lon [{:.3}, {:.3}]\n",
            self.geographic_bounds.min_lat,
            self.geographic_bounds.max_lat,
            self.geographic_bounds.min_lon,
            self.geographic_bounds.max_lon
        ));
        out.push_str(&format!("Regions: {}\n", self.regions.len()));

        out.push_str("\nMagnitude Categories:\n");
        for entry in &self.category_counts {
            let pct = 100.0 * entry.count as f64 / self.total_events as f64;
            out.push_str(&format!(
                "  {:<10} {:>8} ({:.1}%)\n",
                entry.category.label(),
                entry.count,
                pct
            ));
        }

        out
    }
}

fn widen(range: Option<(f64, f64)>, value: f64) -> (f64, f64) {
    match range {
        None => (value, value),
        Some((lo, hi)) => (lo.min(value), hi.max(value)),
    }
}
