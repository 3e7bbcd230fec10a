pub mod binning;
pub mod cleaner;
pub mod dataset_loader;
pub mod load_report;
pub mod region;

pub use binning::EqualWidthBins;
pub use cleaner::EventCleaner;
pub use dataset_loader::DatasetLoader;
pub use load_report::LoadReport;
pub use region::extract_region;
