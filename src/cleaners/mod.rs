//! Per-field cleaners: unit registry, measurement conversion, wind direction,
//! identity fields and source timestamps.

pub mod basic;
pub mod direction;
pub mod measurement;
pub mod registry;
pub mod timestamp;
pub mod units;

pub use basic::{clean_farm, clean_text};
pub use direction::{clean_direction, compass_bearing};
pub use measurement::clean_quantity;
pub use registry::UnitRegistry;
pub use timestamp::TimestampNormalizer;
pub use units::{Quantity, Unit};
