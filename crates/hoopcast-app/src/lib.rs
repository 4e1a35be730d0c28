pub mod export;
pub mod partitions;
pub mod runner;
pub mod settings;
