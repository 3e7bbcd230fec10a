use crate::error::{DashboardError, Result};
use crate::models::EventRecord;
use crate::utils::constants::{
    COL_DEPTH, COL_LATITUDE, COL_LAT_BIN, COL_LONGITUDE, COL_LON_BIN, COL_MAG,
    COL_MAGNITUDE_CATEGORY, COL_PLACE, COL_REGION, COL_TIME, COMPRESSION_GZIP, COMPRESSION_LZ4,
    COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD, DEFAULT_ROW_GROUP_SIZE,
    QUALITY_METRIC_COLUMNS,
};
use crate::utils::ProgressReporter;
use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampMicrosecondArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(DashboardError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    /// Write events in batches of `batch_size` rows. An empty slice still
    /// produces a valid file carrying only the schema.
    pub fn write_events(
        &self,
        records: &[EventRecord],
        path: &Path,
        batch_size: usize,
        progress: Option<&ProgressReporter>,
    ) -> Result<()> {
        let schema = Self::event_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        for chunk in records.chunks(batch_size.max(1)) {
            let batch = Self::events_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
            debug!("Wrote batch of {} events", chunk.len());
            if let Some(p) = progress {
                p.increment(chunk.len() as u64);
            }
        }

        writer.close()?;
        info!("Wrote {} events to {}", records.len(), path.display());
        Ok(())
    }

    /// Source columns, zero-filled metrics, then the derived columns.
    pub fn event_schema() -> Arc<Schema> {
        let mut fields = vec![
            Field::new(
                COL_TIME,
                DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
                false,
            ),
            Field::new(COL_LATITUDE, DataType::Float64, false),
            Field::new(COL_LONGITUDE, DataType::Float64, false),
            Field::new(COL_MAG, DataType::Float64, true),
            Field::new(COL_DEPTH, DataType::Float64, true),
            Field::new(COL_PLACE, DataType::Utf8, true),
        ];
        fields.extend(
            QUALITY_METRIC_COLUMNS
                .iter()
                .map(|name| Field::new(*name, DataType::Float64, false)),
        );
        fields.extend([
            Field::new(COL_REGION, DataType::Utf8, false),
            Field::new(COL_MAGNITUDE_CATEGORY, DataType::Utf8, false),
            Field::new(COL_LAT_BIN, DataType::UInt32, false),
            Field::new(COL_LON_BIN, DataType::UInt32, false),
        ]);

        Arc::new(Schema::new(fields))
    }

    fn events_to_batch(records: &[EventRecord], schema: Arc<Schema>) -> Result<RecordBatch> {
        let times: Vec<i64> = records.iter().map(|r| r.time.timestamp_micros()).collect();
        let latitudes: Vec<f64> = records.iter().map(|r| r.latitude).collect();
        let longitudes: Vec<f64> = records.iter().map(|r| r.longitude).collect();
        let mags: Vec<Option<f64>> = records.iter().map(|r| r.mag).collect();
        let depths: Vec<Option<f64>> = records.iter().map(|r| r.depth).collect();
        let places: Vec<Option<&str>> = records.iter().map(|r| r.place.as_deref()).collect();

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(TimestampMicrosecondArray::from(times).with_timezone("UTC")),
            Arc::new(Float64Array::from(latitudes)),
            Arc::new(Float64Array::from(longitudes)),
            Arc::new(Float64Array::from(mags)),
            Arc::new(Float64Array::from(depths)),
            Arc::new(StringArray::from(places)),
        ];

        for metric in 0..QUALITY_METRIC_COLUMNS.len() {
            let values: Vec<f64> = records.iter().map(|r| r.quality.values()[metric]).collect();
            columns.push(Arc::new(Float64Array::from(values)));
        }

        let regions: Vec<&str> = records.iter().map(|r| r.region.as_str()).collect();
        let categories: Vec<&str> = records.iter().map(|r| r.magnitude_category.label()).collect();
        let lat_bins: Vec<u32> = records.iter().map(|r| r.lat_bin as u32).collect();
        let lon_bins: Vec<u32> = records.iter().map(|r| r.lon_bin as u32).collect();

        columns.push(Arc::new(StringArray::from(regions)));
        columns.push(Arc::new(StringArray::from(categories)));
        columns.push(Arc::new(UInt32Array::from(lat_bins)));
        columns.push(Arc::new(UInt32Array::from(lon_bins)));

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let total_rows = metadata.file_metadata().num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
            avg
        )
    }
}
