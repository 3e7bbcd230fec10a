use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{DashboardError, Result};
use crate::models::{Dataset, EventRecord, MagnitudeCategory, QualityMetrics, RawEvent};
use crate::processors::{extract_region, EqualWidthBins, LoadReport};
use crate::readers::RawTable;
use crate::utils::constants::{COORDINATE_BINS, QUALITY_METRIC_COLUMNS};
use crate::utils::parse_timestamp_utc;

/// A row that survived the drop passes: parsed time and both coordinates.
struct CleanRow {
    time: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    raw: RawEvent,
}

/// Turns the raw table into the immutable dataset.
pub struct EventCleaner {
    max_workers: usize,
}

impl EventCleaner {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    pub fn clean(&self, table: RawTable) -> Result<(Dataset, LoadReport)> {
        let (rows_read, columns_read) = table.shape();
        let mut report = LoadReport {
            rows_read,
            columns_read,
            absent_metric_columns: table
                .missing_metric_columns
                .iter()
                .map(|c| c.to_string())
                .collect(),
            ..Default::default()
        };

        // Zero-fill counts are taken over every input row, before any drop
        for row in &table.rows {
            for (count, value) in report.zero_filled.iter_mut().zip(row.quality.iter()) {
                if value.is_none() {
                    *count += 1;
                }
            }
        }
        for (name, count) in QUALITY_METRIC_COLUMNS.iter().zip(report.zero_filled.iter()) {
            debug!("Zero-filled {} missing '{}' values", count, name);
        }

        let timed = Self::drop_unparseable_times(table.rows, &mut report);
        let rows = Self::drop_missing_coordinates(timed, &mut report);

        if rows.is_empty() {
            let reason = if report.rows_read > 0 && report.dropped_invalid_time == report.rows_read
            {
                "no rows remain after dropping unparseable times"
            } else {
                "'latitude' or 'longitude' column is empty after cleaning"
            };
            return Err(DashboardError::MissingData(reason.to_string()));
        }

        let lat_bins = EqualWidthBins::fit(rows.iter().map(|r| r.latitude), COORDINATE_BINS)
            .ok_or_else(|| {
                DashboardError::MissingData("no latitude values to bin".to_string())
            })?;
        let lon_bins = EqualWidthBins::fit(rows.iter().map(|r| r.longitude), COORDINATE_BINS)
            .ok_or_else(|| {
                DashboardError::MissingData("no longitude values to bin".to_string())
            })?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| DashboardError::Config(format!("Failed to build worker pool: {}", e)))?;

        let records: Vec<EventRecord> = pool.install(|| {
            rows.into_par_iter()
                .map(|row| Self::derive(row, &lat_bins, &lon_bins))
                .collect::<Result<Vec<_>>>()
        })?;

        report.rows_retained = records.len();
        report.missing_magnitude = records.iter().filter(|r| !r.has_magnitude()).count();
        report.missing_depth = records.iter().filter(|r| !r.has_depth()).count();
        report.out_of_range_coordinates = records
            .iter()
            .filter(|r| !r.has_valid_coordinates())
            .count();

        if report.out_of_range_coordinates > 0 {
            warn!(
                "{} events have coordinates outside the WGS84 range",
                report.out_of_range_coordinates
            );
        }

        let dataset = Dataset::new(records)?;
        Ok((dataset, report))
    }

    fn drop_unparseable_times(
        rows: Vec<RawEvent>,
        report: &mut LoadReport,
    ) -> Vec<(DateTime<Utc>, RawEvent)> {
        let before = rows.len();
        let parsed: Vec<(DateTime<Utc>, RawEvent)> = rows
            .into_iter()
            .filter_map(|raw| {
                let time = raw.time.as_deref().and_then(parse_timestamp_utc)?;
                Some((time, raw))
            })
            .collect();

        report.dropped_invalid_time = before - parsed.len();
        if report.dropped_invalid_time > 0 {
            warn!(
                "Some 'time' values could not be parsed; dropped {} rows ({} -> {})",
                report.dropped_invalid_time,
                before,
                parsed.len()
            );
        }
        info!("Time column parsed. Rows after time drop: {}", parsed.len());

        parsed
    }

    fn drop_missing_coordinates(
        rows: Vec<(DateTime<Utc>, RawEvent)>,
        report: &mut LoadReport,
    ) -> Vec<CleanRow> {
        let before = rows.len();
        let kept: Vec<CleanRow> = rows
            .into_iter()
            .filter_map(|(time, raw)| match (raw.latitude, raw.longitude) {
                (Some(latitude), Some(longitude)) => Some(CleanRow {
                    time,
                    latitude,
                    longitude,
                    raw,
                }),
                _ => None,
            })
            .collect();

        report.dropped_missing_coordinates = before - kept.len();
        if report.dropped_missing_coordinates > 0 {
            warn!(
                "Dropped {} rows with missing latitude/longitude ({} -> {})",
                report.dropped_missing_coordinates,
                before,
                kept.len()
            );
        }

        kept
    }

    fn derive(
        row: CleanRow,
        lat_bins: &EqualWidthBins,
        lon_bins: &EqualWidthBins,
    ) -> Result<EventRecord> {
        let lat_bin = lat_bins.assign(row.latitude).ok_or_else(|| {
            DashboardError::InvalidFormat(format!(
                "latitude {} outside the fitted bins",
                row.latitude
            ))
        })?;
        let lon_bin = lon_bins.assign(row.longitude).ok_or_else(|| {
            DashboardError::InvalidFormat(format!(
                "longitude {} outside the fitted bins",
                row.longitude
            ))
        })?;

        let raw = row.raw;
        Ok(EventRecord {
            time: row.time,
            latitude: row.latitude,
            longitude: row.longitude,
            mag: raw.mag,
            depth: raw.depth,
            region: extract_region(raw.place.as_deref()),
            magnitude_category: MagnitudeCategory::from_magnitude(raw.mag),
            quality: QualityMetrics::zero_filled(&raw.quality),
            place: raw.place,
            lat_bin,
            lon_bin,
        })
    }
}

impl Default for EventCleaner {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::EventReader;
    use chrono::Timelike;
    use pretty_assertions::assert_eq;

    fn table(csv: &str) -> RawTable {
        EventReader::new().parse_str(csv).unwrap()
    }

    const HEADER: &str = "time,latitude,longitude,depth,mag,place,Station Count,Azimuth Gap,Distance,RMS,horizontalError,magError,magNst";

    #[test]
    fn test_clean_derives_columns() {
        let csv = format!(
            "{}\n\
             2024-01-01T00:00:00Z,10.0,100.0,5.0,2.4,\"10km N of Example, Some Region\",12,,,0.1,,,\n\
             2024-01-02T00:00:00Z,20.0,110.0,15.0,4.5,Fiji region,,,,,,,\n\
             2024-01-03T00:00:00Z,30.0,120.0,25.0,4.6,\"3 km W of Hilo, Hawaii\",,,,,,,\n",
            HEADER
        );
        let (dataset, report) = EventCleaner::new(2).clean(table(&csv)).unwrap();
        let records = dataset.records();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].region, "Some Region");
        assert_eq!(records[1].region, "Unknown");
        assert_eq!(records[0].magnitude_category, MagnitudeCategory::Below2_5);
        assert_eq!(
            records[1].magnitude_category,
            MagnitudeCategory::Between2_5And4_5
        );
        assert_eq!(records[2].magnitude_category, MagnitudeCategory::Above4_5);

        assert_eq!(records[0].lat_bin, 0);
        assert_eq!(records[2].lat_bin, 19);
        assert_eq!(records[0].lon_bin, 0);
        assert_eq!(records[2].lon_bin, 19);

        assert_eq!(records[0].quality.station_count, 12.0);
        assert_eq!(records[0].quality.azimuth_gap, 0.0);
        assert_eq!(report.zero_filled, [2, 3, 3, 2, 3, 3, 3]);
        assert_eq!(report.rows_retained, 3);
    }

    #[test]
    fn test_unparseable_times_are_dropped() {
        let csv = "time,latitude,longitude,depth,mag,place\n\
                   2024-01-01T00:00:00Z,1,2,3,4,a\n\
                   garbage,1,2,3,4,b\n\
                   ,1,2,3,4,c\n\
                   2024-01-02T05:00:00+05:00,1.5,2.5,3,4,d\n";
        let (dataset, report) = EventCleaner::new(1).clean(table(csv)).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(report.dropped_invalid_time, 2);
        assert_eq!(report.rows_read, 4);
        assert!(dataset.iter().all(|r| r.time.timezone() == Utc));
        assert_eq!(dataset.records()[1].time.hour(), 0);
    }

    #[test]
    fn test_all_times_malformed_is_fatal() {
        let csv = "time,latitude,longitude,depth,mag,place\n\
                   nope,1,2,3,4,a\n\
                   also nope,1,2,3,4,b\n";
        let err = EventCleaner::new(1).clean(table(csv)).unwrap_err();
        match err {
            DashboardError::MissingData(reason) => {
                assert!(reason.contains("unparseable times"), "{reason}");
                assert!(!reason.contains("latitude"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rows_without_coordinates_are_dropped() {
        let csv = "time,latitude,longitude,depth,mag,place\n\
                   2024-01-01,1,2,3,4,a\n\
                   2024-01-02,,2,3,4,b\n\
                   2024-01-03,1,,3,4,c\n";
        let (dataset, report) = EventCleaner::new(1).clean(table(csv)).unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(report.dropped_missing_coordinates, 2);
        assert!(dataset
            .iter()
            .all(|r| r.latitude.is_finite() && r.longitude.is_finite()));
    }

    #[test]
    fn test_all_longitudes_missing_is_fatal() {
        let csv = "time,latitude,longitude,depth,mag,place\n\
                   2024-01-01,1,,3,4,a\n";
        let err = EventCleaner::new(1).clean(table(csv)).unwrap_err();
        match err {
            DashboardError::MissingData(reason) => assert!(reason.contains("longitude")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_absent_metric_columns_fully_zero_filled() {
        let csv = "time,latitude,longitude,depth,mag,place\n\
                   2024-01-01,1,2,3,4,a\n\
                   2024-01-02,3,4,5,6,b\n";
        let (dataset, report) = EventCleaner::new(1).clean(table(csv)).unwrap();

        assert_eq!(report.zero_filled, [2; 7]);
        assert_eq!(report.absent_metric_columns.len(), 7);
        assert!(dataset
            .iter()
            .all(|r| r.quality == QualityMetrics::default()));
    }

    #[test]
    fn test_bins_stay_in_range() {
        let mut csv = String::from("time,latitude,longitude,depth,mag,place\n");
        for i in 0..200 {
            csv.push_str(&format!(
                "2024-02-01T00:00:{:02}Z,{},{},10,3,x\n",
                i % 60,
                -60.0 + i as f64 * 0.61,
                -179.0 + i as f64 * 1.7
            ));
        }
        let (dataset, _) = EventCleaner::new(4).clean(table(&csv)).unwrap();

        assert!(dataset.iter().all(|r| r.lat_bin < 20 && r.lon_bin < 20));
        assert!(dataset.iter().any(|r| r.lat_bin == 0));
        assert!(dataset.iter().any(|r| r.lat_bin == 19));
    }
}
