//! CLI command implementations.

pub mod common;
pub mod grid;
pub mod landscape;
pub mod run;
pub mod version;
