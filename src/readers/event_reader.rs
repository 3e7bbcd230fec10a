use crate::error::{DashboardError, Result};
use crate::models::RawEvent;
use crate::utils::constants::{
    COL_DEPTH, COL_LATITUDE, COL_LONGITUDE, COL_MAG, COL_PLACE, COL_TIME, LATITUDE_SAMPLE_SIZE,
    QUALITY_METRIC_COLUMNS,
};
use csv::StringRecord;
use encoding_rs::{Encoding, UTF_8};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

const READ_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// The event table as read from disk, before cleaning.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawEvent>,
    /// Quality metric columns absent from the header (entirely zero-filled later)
    pub missing_metric_columns: Vec<&'static str>,
}

impl RawTable {
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }
}

/// Positions of the columns we care about within the CSV header.
#[derive(Debug, Clone)]
struct ColumnIndex {
    time: usize,
    latitude: usize,
    longitude: usize,
    mag: usize,
    depth: usize,
    place: usize,
    quality: [Option<usize>; 7],
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                DashboardError::SchemaMismatch(format!("required column '{}' is absent", name))
            })
        };

        Ok(Self {
            time: require(COL_TIME)?,
            latitude: require(COL_LATITUDE)?,
            longitude: require(COL_LONGITUDE)?,
            mag: require(COL_MAG)?,
            depth: require(COL_DEPTH)?,
            place: require(COL_PLACE)?,
            quality: QUALITY_METRIC_COLUMNS.map(|name| find(name)),
        })
    }
}

pub struct EventReader {
    use_mmap: bool,
    encoding: &'static Encoding,
}

impl EventReader {
    pub fn new() -> Self {
        Self {
            use_mmap: false,
            encoding: UTF_8,
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Select the source text encoding by WHATWG label (e.g. "windows-1252").
    pub fn with_encoding(mut self, label: &str) -> Result<Self> {
        self.encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
            DashboardError::Config(format!("Unsupported text encoding: {}", label))
        })?;
        Ok(self)
    }

    /// Read the raw event table from a CSV file or a zip archive holding one.
    pub fn read_events(&self, path: &Path) -> Result<RawTable> {
        let file = File::open(path).map_err(|e| DashboardError::from_open(path, e))?;

        let table = if is_zip_archive(path) {
            let bytes = self.read_archive_entry(file)?;
            self.parse_bytes(&bytes)?
        } else if self.use_mmap {
            let len = file
                .metadata()
                .map_err(|e| DashboardError::from_open(path, e))?
                .len();
            if len == 0 {
                return Err(DashboardError::EmptyData(format!(
                    "{} contains no data",
                    path.display()
                )));
            }
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| DashboardError::from_open(path, e))?;
            self.parse_bytes(&mmap)?
        } else {
            let mut bytes = Vec::new();
            BufReader::with_capacity(READ_BUFFER_SIZE, file)
                .read_to_end(&mut bytes)
                .map_err(|e| DashboardError::from_open(path, e))?;
            self.parse_bytes(&bytes)?
        };

        let (rows, cols) = table.shape();
        info!(
            "Dataset loaded from {}: {} rows x {} columns",
            path.display(),
            rows,
            cols
        );
        let sample: Vec<Option<f64>> = table
            .rows
            .iter()
            .take(LATITUDE_SAMPLE_SIZE)
            .map(|r| r.latitude)
            .collect();
        info!("Sample of latitude column: {:?}", sample);

        Ok(table)
    }

    /// Pull the first `.csv` entry out of a zip archive.
    fn read_archive_entry(&self, file: File) -> Result<Vec<u8>> {
        let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if !entry.is_dir() && entry.name().to_lowercase().ends_with(".csv") {
                debug!("Reading archive entry {}", entry.name());
                let mut bytes = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut bytes)?;
                return Ok(bytes);
            }
        }

        Err(DashboardError::InvalidFormat(
            "archive contains no .csv entry".to_string(),
        ))
    }

    /// Decode and parse raw CSV bytes.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<RawTable> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(DashboardError::EmptyData("file contains no data".to_string()));
        }

        let (content, actual_encoding, had_errors) = self.encoding.decode(bytes);
        if had_errors {
            warn!(
                "Input contained byte sequences invalid for {}; they were replaced",
                actual_encoding.name()
            );
        }

        self.parse_str(&content)
    }

    /// Parse CSV text into the raw table, enforcing the load-time guards.
    pub fn parse_str(&self, content: &str) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        let index = ColumnIndex::from_headers(&headers)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(Self::parse_record(&record, &index));
        }

        if rows.is_empty() {
            return Err(DashboardError::EmptyData(
                "file has a header but no event rows".to_string(),
            ));
        }

        if rows.iter().all(|r| r.latitude.is_none()) {
            return Err(DashboardError::MissingData(
                "'latitude' column contains only missing values".to_string(),
            ));
        }

        let missing_metric_columns = QUALITY_METRIC_COLUMNS
            .iter()
            .zip(index.quality.iter())
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| *name)
            .collect();

        Ok(RawTable {
            columns: headers.iter().map(|h| h.trim().to_string()).collect(),
            rows,
            missing_metric_columns,
        })
    }

    fn parse_record(record: &StringRecord, index: &ColumnIndex) -> RawEvent {
        let number = |i: usize| parse_number(record.get(i));
        let text = |i: usize| {
            record
                .get(i)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        RawEvent {
            time: text(index.time),
            latitude: number(index.latitude),
            longitude: number(index.longitude),
            mag: number(index.mag),
            depth: number(index.depth),
            place: text(index.place),
            quality: index.quality.map(|idx| idx.and_then(|i| number(i))),
        }
    }
}

impl Default for EventReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Empty, non-numeric and non-finite cells all count as missing.
fn parse_number(field: Option<&str>) -> Option<f64> {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn is_zip_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "time,latitude,longitude,depth,mag,place,Station Count,Azimuth Gap,Distance,RMS,horizontalError,magError,magNst";

    #[test]
    fn test_parse_full_row() {
        let csv = format!(
            "{}\n2024-01-01T07:10:09.476Z,37.5,-118.8,5.2,2.7,\"10km N of Example, Some Region\",12,80,0.05,0.11,0.3,0.1,9\n",
            HEADER
        );
        let table = EventReader::new().parse_str(&csv).unwrap();

        assert_eq!(table.shape(), (1, 13));
        assert!(table.missing_metric_columns.is_empty());

        let row = &table.rows[0];
        assert_eq!(row.time.as_deref(), Some("2024-01-01T07:10:09.476Z"));
        assert_eq!(row.latitude, Some(37.5));
        assert_eq!(row.depth, Some(5.2));
        assert_eq!(row.place.as_deref(), Some("10km N of Example, Some Region"));
        assert_eq!(row.quality[0], Some(12.0));
        assert_eq!(row.quality[6], Some(9.0));
    }

    #[test]
    fn test_blank_and_garbage_cells_are_missing() {
        let csv = format!("{}\n2024-01-01,37.5,abc,,NaN,,,,,,,,\n", HEADER);
        let table = EventReader::new().parse_str(&csv).unwrap();
        let row = &table.rows[0];

        assert_eq!(row.longitude, None);
        assert_eq!(row.depth, None);
        assert_eq!(row.mag, None);
        assert_eq!(row.place, None);
        assert!(row.quality.iter().all(Option::is_none));
    }

    #[test]
    fn test_absent_metric_columns_are_reported() {
        let csv = "time,latitude,longitude,depth,mag,place,RMS\n2024-01-01,1,2,3,4,x,0.2\n";
        let table = EventReader::new().parse_str(csv).unwrap();

        assert_eq!(table.missing_metric_columns.len(), 6);
        assert!(!table.missing_metric_columns.contains(&"RMS"));
        assert_eq!(table.rows[0].quality[3], Some(0.2));
    }

    #[test]
    fn test_missing_latitude_column_is_schema_mismatch() {
        let csv = "time,longitude,depth,mag,place\n2024-01-01,2,3,4,x\n";
        let err = EventReader::new().parse_str(csv).unwrap_err();
        assert!(matches!(err, DashboardError::SchemaMismatch(_)));
    }

    #[test]
    fn test_all_null_latitude_is_missing_data() {
        let csv = "time,latitude,longitude,depth,mag,place\n2024-01-01,,2,3,4,x\n2024-01-02,,2,3,4,y\n";
        let err = EventReader::new().parse_str(csv).unwrap_err();
        assert!(matches!(err, DashboardError::MissingData(_)));
    }

    #[test]
    fn test_header_only_is_empty() {
        let err = EventReader::new().parse_str(HEADER).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyData(_)));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = EventReader::new()
            .read_events(Path::new("/definitely/not/here/events.csv"))
            .unwrap_err();
        assert!(matches!(err, DashboardError::NotFound { .. }));
    }

    #[test]
    fn test_directory_is_not_readable() {
        let dir = tempfile::tempdir().unwrap();
        let err = EventReader::new().read_events(dir.path()).unwrap_err();
        assert!(matches!(err, DashboardError::NotReadable { .. }));
    }

    #[test]
    fn test_empty_file_is_empty_data() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let err = EventReader::new().read_events(temp_file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyData(_)));

        let err = EventReader::new()
            .with_mmap(true)
            .read_events(temp_file.path())
            .unwrap_err();
        assert!(matches!(err, DashboardError::EmptyData(_)));
        Ok(())
    }

    #[test]
    fn test_read_file_with_mmap() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", HEADER)?;
        writeln!(temp_file, "2024-01-01T00:00:00Z,1.0,2.0,3.0,4.0,\"a, b\",,,,,,,")?;
        writeln!(temp_file, "2024-01-02T00:00:00Z,1.5,2.5,3.5,4.5,c,,,,,,,")?;

        let buffered = EventReader::new().read_events(temp_file.path())?;
        let mapped = EventReader::new().with_mmap(true).read_events(temp_file.path())?;

        assert_eq!(buffered.rows, mapped.rows);
        assert_eq!(mapped.rows.len(), 2);
        Ok(())
    }

    #[test]
    fn test_read_zip_archive() -> Result<()> {
        let temp_file = tempfile::Builder::new().suffix(".zip").tempfile()?;
        {
            let mut zip = zip::ZipWriter::new(temp_file.reopen()?);
            zip.start_file("README.txt", zip::write::FileOptions::default())?;
            zip.write_all(b"not the data")?;
            zip.start_file("quakes.csv", zip::write::FileOptions::default())?;
            writeln!(zip, "time,latitude,longitude,depth,mag,place")?;
            writeln!(zip, "2024-01-01,1,2,3,4,x")?;
            zip.finish()?;
        }

        let table = EventReader::new().read_events(temp_file.path())?;
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.missing_metric_columns.len(), 7);
        Ok(())
    }

    #[test]
    fn test_latin1_encoding() -> Result<()> {
        let mut bytes = b"time,latitude,longitude,depth,mag,place\n2024-01-01,1,2,3,4,\"Near, Bogot".to_vec();
        bytes.push(0xE1); // 'á' in windows-1252
        bytes.extend_from_slice(b"\"\n");

        let table = EventReader::new()
            .with_encoding("windows-1252")?
            .parse_bytes(&bytes)?;
        assert_eq!(table.rows[0].place.as_deref(), Some("Near, Bogotá"));

        assert!(EventReader::new().with_encoding("klingon").is_err());
        Ok(())
    }
}
