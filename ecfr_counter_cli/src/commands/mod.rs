//! CLI subcommand implementations.

pub mod fetch_agencies;
pub mod refresh;
pub mod report;
pub mod search;
pub mod serve;
