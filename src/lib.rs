pub mod cleaners;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

#[cfg(test)]
mod test_utils;

pub use error::{ProcessingError, Result};
