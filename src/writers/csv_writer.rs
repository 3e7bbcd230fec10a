use chrono::SecondsFormat;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::models::EventRecord;
use crate::utils::constants::{
    COL_DEPTH, COL_LATITUDE, COL_LAT_BIN, COL_LONGITUDE, COL_LON_BIN, COL_MAG,
    COL_MAGNITUDE_CATEGORY, COL_PLACE, COL_REGION, COL_TIME, QUALITY_METRIC_COLUMNS,
};

/// Writes cleaned events back out as CSV, derived columns included.
/// Missing `mag`, `depth` and `place` become empty cells.
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn headers() -> Vec<&'static str> {
        let mut headers = vec![COL_TIME, COL_LATITUDE, COL_LONGITUDE, COL_MAG, COL_DEPTH, COL_PLACE];
        headers.extend(QUALITY_METRIC_COLUMNS);
        headers.extend([COL_REGION, COL_MAGNITUDE_CATEGORY, COL_LAT_BIN, COL_LON_BIN]);
        headers
    }

    pub fn write_to<W: Write>(&self, records: &[EventRecord], sink: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(sink);

        writer.write_record(Self::headers())?;
        for record in records {
            writer.write_record(Self::row(record))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_bytes(&self, records: &[EventRecord]) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(records.len() * 160);
        self.write_to(records, &mut buffer)?;
        Ok(buffer)
    }

    pub fn write_file(&self, records: &[EventRecord], path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(records, std::io::BufWriter::new(file))?;
        info!("Wrote {} events to {}", records.len(), path.display());
        Ok(())
    }

    fn row(record: &EventRecord) -> Vec<String> {
        let optional = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();

        let mut row = vec![
            record.time.to_rfc3339_opts(SecondsFormat::Millis, true),
            record.latitude.to_string(),
            record.longitude.to_string(),
            optional(record.mag),
            optional(record.depth),
            record.place.clone().unwrap_or_default(),
        ];
        row.extend(record.quality.values().iter().map(|v| v.to_string()));
        row.extend([
            record.region.clone(),
            record.magnitude_category.label().to_string(),
            record.lat_bin.to_string(),
            record.lon_bin.to_string(),
        ]);
        row
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}
