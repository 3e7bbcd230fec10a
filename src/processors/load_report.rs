use serde::Serialize;

use crate::utils::constants::QUALITY_METRIC_COLUMNS;

/// What the cleaning pass dropped or filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub columns_read: usize,
    pub dropped_invalid_time: usize,
    pub dropped_missing_coordinates: usize,
    pub rows_retained: usize,
    /// Zero-filled cells per metric, in `QUALITY_METRIC_COLUMNS` order
    pub zero_filled: [usize; 7],
    /// Metric columns absent from the input header
    pub absent_metric_columns: Vec<String>,
    pub missing_magnitude: usize,
    pub missing_depth: usize,
    pub out_of_range_coordinates: usize,
}

impl LoadReport {
    pub fn total_zero_filled(&self) -> usize {
        self.zero_filled.iter().sum()
    }

    pub fn dropped_rows(&self) -> usize {
        self.dropped_invalid_time + self.dropped_missing_coordinates
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Load Report ===\n");
        summary.push_str(&format!(
            "Rows Read: {} ({} columns)\n",
            self.rows_read, self.columns_read
        ));
        summary.push_str(&format!(
            "Dropped (unparseable time): {}\n",
            self.dropped_invalid_time
        ));
        summary.push_str(&format!(
            "Dropped (missing coordinates): {}\n",
            self.dropped_missing_coordinates
        ));
        summary.push_str(&format!(
            "Rows Retained: {} ({:.1}%)\n",
            self.rows_retained,
            100.0 * self.rows_retained as f64 / self.rows_read.max(1) as f64
        ));
        summary.push_str(&format!(
            "Missing Magnitude: {}, Missing Depth: {}\n",
            self.missing_magnitude, self.missing_depth
        ));
        summary.push_str(&format!(
            "Coordinates Outside WGS84 Range: {}\n",
            self.out_of_range_coordinates
        ));

        summary.push_str("\nZero-filled Quality Metrics:\n");
        for (name, count) in QUALITY_METRIC_COLUMNS.iter().zip(self.zero_filled.iter()) {
            let note = if self.absent_metric_columns.iter().any(|c| c == name) {
                " (column absent)"
            } else {
                ""
            };
            summary.push_str(&format!("  {:<16} {}{}\n", name, count, note));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_mentions_counts() {
        let report = LoadReport {
            rows_read: 10,
            columns_read: 13,
            dropped_invalid_time: 2,
            dropped_missing_coordinates: 1,
            rows_retained: 7,
            zero_filled: [1, 0, 0, 3, 0, 0, 7],
            absent_metric_columns: vec!["magNst".to_string()],
            ..Default::default()
        };

        assert_eq!(report.total_zero_filled(), 11);
        assert_eq!(report.dropped_rows(), 3);

        let summary = report.generate_summary();
        assert!(summary.contains("Rows Read: 10"));
        assert!(summary.contains("Rows Retained: 7 (70.0%)"));
        assert!(summary.contains("(column absent)"));
    }
}
