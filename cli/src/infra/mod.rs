//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: SSH transport, process
//! execution, filesystem access, config persistence and embedded assets.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod assets;
pub mod command_runner;
pub mod config;
pub mod fs;
pub mod ssh;
