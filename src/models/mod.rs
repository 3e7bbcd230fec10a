pub mod dataset;
pub mod event;
pub mod magnitude;

pub use dataset::Dataset;
pub use event::{EventRecord, QualityMetrics, RawEvent};
pub use magnitude::MagnitudeCategory;
