pub mod derived_metrics;
pub mod pipeline;
pub mod row_cleaner;
pub mod row_validator;
pub mod run_summary;

pub use derived_metrics::{heat_index, wind_chill, DerivedMetricCalculator};
pub use pipeline::Pipeline;
pub use row_cleaner::RowCleaner;
pub use row_validator::RowValidator;
pub use run_summary::{RunSummary, SourceSummary};
