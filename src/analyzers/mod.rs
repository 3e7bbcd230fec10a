pub mod dataset_analyzer;

pub use dataset_analyzer::{CategoryCount, DatasetSummary, GeographicBounds};
