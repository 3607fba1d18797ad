//! Core domain types and port definitions for pipkit.
//!
//! This crate is pure: it owns the data model (executables, invocations,
//! package records), the caller-owned configuration snapshot, the error
//! taxonomy, the [`ports::CommandRunner`] port, and the two text-processing
//! layers that sit on either side of a pip invocation:
//!
//! - [`interpret`] turns list / freeze / show output into typed records
//! - [`classify`] turns failing output into a [`ClassifiedError`]
//!
//! Process execution, executable lookup and installation live in
//! `pipkit-runtime`.
#![deny(unused_crate_dependencies)]

pub mod classify;
pub mod config;
pub mod domain;
pub mod error;
pub mod interpret;
pub mod ports;

// Re-export commonly used types for convenience
pub use classify::{DEFAULT_SIGNATURES, ErrorClassifier, Signature};
pub use config::{ConfigError, DEFAULT_BOOTSTRAP_URL, PipConfig};
pub use domain::{
    CommandInvocation, CommandOutput, ExecContext, ExecutableRef, LAUNCH_FAILURE_EXIT_CODE,
    OsFamily, PackageDetail, PackageRecord, ReadOperation, ReadOutput, SIGNALLED_EXIT_CODE,
    WriteOperation,
};
pub use error::{ClassifiedError, ErrorKind, PipResult};
pub use interpret::{
    ToolVersion, parse_check, parse_freeze, parse_list, parse_show, parse_show_many, parse_version,
};
pub use ports::{CommandRunner, RunError};
