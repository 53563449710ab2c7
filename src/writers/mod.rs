pub mod partition_router;
pub mod staging_rotation;

pub use partition_router::{
    partition_path, PartitionBases, PartitionKey, PartitionRouter, PartitionRow,
};
pub use staging_rotation::rotate_staging;
