use std::path::Path;

use crate::error::Result;
use crate::models::Dataset;
use crate::processors::{EventCleaner, LoadReport};
use crate::readers::EventReader;
use crate::utils::progress::ProgressReporter;

/// Read + clean in one call: the whole load phase.
pub struct DatasetLoader {
    max_workers: usize,
    use_mmap: bool,
    encoding: String,
}

impl DatasetLoader {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers,
            use_mmap: false,
            encoding: "utf-8".to_string(),
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_encoding(mut self, encoding: &str) -> Self {
        self.encoding = encoding.to_string();
        self
    }

    pub fn load(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<(Dataset, LoadReport)> {
        if let Some(p) = progress {
            p.set_message("Reading earthquake events...");
        }

        let reader = EventReader::new()
            .with_mmap(self.use_mmap)
            .with_encoding(&self.encoding)?;
        let table = reader.read_events(path)?;

        if let Some(p) = progress {
            p.set_message("Cleaning and deriving columns...");
        }

        let cleaner = EventCleaner::new(self.max_workers);
        let (dataset, report) = cleaner.clean(table)?;

        if let Some(p) = progress {
            p.finish_with_message(&format!("Loaded {} events", dataset.len()));
        }

        Ok((dataset, report))
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "time,latitude,longitude,depth,mag,place,RMS")?;
        writeln!(temp_file, "2024-05-01T10:00:00Z,35.1,-117.6,7.9,1.2,\"4km SE of Ridgecrest, CA\",0.17")?;
        writeln!(temp_file, "bad-time,35.2,-117.7,8.1,2.2,\"5km SE of Ridgecrest, CA\",")?;
        writeln!(temp_file, "2024-05-02T11:30:00Z,61.2,-150.0,40.0,3.4,\"Anchorage, Alaska\",")?;

        let progress = ProgressReporter::silent();
        let (dataset, report) = DatasetLoader::new(2).load(temp_file.path(), Some(&progress))?;

        assert_eq!(dataset.len(), 2);
        assert_eq!(report.dropped_invalid_time, 1);
        assert_eq!(dataset.unique_regions(), vec!["Alaska", "CA"]);
        Ok(())
    }

    #[test]
    fn test_bad_encoding_label_is_config_error() {
        let err = DatasetLoader::new(1)
            .with_encoding("not-an-encoding")
            .load(Path::new("whatever.csv"), None)
            .unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }
}
