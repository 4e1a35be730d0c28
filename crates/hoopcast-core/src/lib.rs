// Library root: exposes the valuation pipeline and its collaborators so the
// driver binary and integration tests can reach the crate's public API.

pub mod config;
pub mod db;
pub mod pipeline;
pub mod position;
pub mod stats;
pub mod valuation;
