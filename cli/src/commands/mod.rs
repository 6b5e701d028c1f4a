//! Command implementations

pub mod config;
pub mod input;
pub mod plan;
pub mod provision;
pub mod version;
