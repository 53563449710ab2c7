pub mod staging_reader;

pub use staging_reader::{StagingBatch, StagingReader};
