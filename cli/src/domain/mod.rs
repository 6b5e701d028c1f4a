//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod catalogue;
pub mod classify;
pub mod config;
pub mod error;
pub mod project;
pub mod step;
pub mod transfer;

pub use classify::{FailureClass, classify_failure};
pub use config::{SiteprepConfig, validate_config_key, validate_config_value};
pub use error::{ConfigError, InputError, ProvisionError, TransferError};
pub use project::{AuthSecret, Credentials, Project, ProjectKind};
pub use step::{
    FileSource, IgnoredFailure, Plan, ProvisionReport, PushDestination, RunState, Step,
    StepOutcome, StepRecord,
};
