//! Data types for MinIO storage operations.

mod object_stat;

pub use object_stat::ObjectStat;
