/// Required CSV columns
pub const COL_TIME: &str = "time";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";
pub const COL_MAG: &str = "mag";
pub const COL_DEPTH: &str = "depth";
pub const COL_PLACE: &str = "place";

/// Quality metric columns, zero-filled when missing
pub const QUALITY_METRIC_COLUMNS: [&str; 7] = [
    "Station Count",
    "Azimuth Gap",
    "Distance",
    "RMS",
    "horizontalError",
    "magError",
    "magNst",
];

/// Derived columns
pub const COL_REGION: &str = "region";
pub const COL_MAGNITUDE_CATEGORY: &str = "Magnitude_Category";
pub const COL_LAT_BIN: &str = "lat_bin";
pub const COL_LON_BIN: &str = "lon_bin";

/// Region used when `place` has no comma-separated suffix
pub const UNKNOWN_REGION: &str = "Unknown";

/// Magnitude category thresholds (upper bound inclusive for the middle band)
pub const MAG_LOW_THRESHOLD: f64 = 2.5;
pub const MAG_HIGH_THRESHOLD: f64 = 4.5;

/// Number of equal-width coordinate bins
pub const COORDINATE_BINS: usize = 20;

/// Layout defaults
pub const DEFAULT_TITLE: &str = "Earthquake Analytics Dashboard";
pub const DEFAULT_LOGO: &str = "/assets/planet-earth.png";
pub const DEPTH_MARK_STEP: i64 = 100;
pub const MAX_SLIDER_MARKS: usize = 50;
pub const MAG_SLIDER_STEP: f64 = 0.1;
pub const DEPTH_SLIDER_STEP: f64 = 1.0;
pub const ALL_REGIONS: &str = "All";

/// Server defaults
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8050";
pub const DEFAULT_ASSETS_DIR: &str = "assets";
pub const DOWNLOAD_FILENAME: &str = "earthquake_data.csv";

/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const LATITUDE_SAMPLE_SIZE: usize = 5;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
