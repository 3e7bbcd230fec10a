use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Generate default export filename with format: quake-events-{YYMMDD}.{extension}
pub fn generate_default_export_filename(extension: &str) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!(
        "quake-events-{:02}{:02}{:02}.{}",
        year, month, day, extension
    );
    PathBuf::from("output").join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_export_filename() {
        let filename = generate_default_export_filename("parquet");
        let filename_str = filename.to_string_lossy();

        assert!(filename_str.contains("quake-events-"));
        assert!(filename_str.ends_with(".parquet"));
        assert!(filename_str.starts_with("output"));

        let file_part = filename.file_name().unwrap().to_string_lossy();
        // quake-events- + YYMMDD + .parquet
        assert_eq!(file_part.len(), "quake-events-".len() + 6 + ".parquet".len());
    }

    #[test]
    fn test_csv_extension() {
        let filename = generate_default_export_filename("csv");
        assert_eq!(filename.extension().unwrap(), "csv");
    }
}
