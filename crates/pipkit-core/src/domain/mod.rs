//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (process spawning, network, etc.).
//!
//! # Structure
//!
//! - `executable` - Resolved interpreter / pip references (`ExecutableRef`)
//! - `invocation` - Command invocations, their output and execution context
//! - `operation` - Read / write operations accepted by the pip manager
//! - `package` - Package records produced by output interpretation
//! - `platform` - Operating system family detection

mod executable;
mod invocation;
mod operation;
mod package;
mod platform;

pub use executable::ExecutableRef;
pub use invocation::{
    CommandInvocation, CommandOutput, ExecContext, LAUNCH_FAILURE_EXIT_CODE, SIGNALLED_EXIT_CODE,
};
pub use operation::{ReadOperation, ReadOutput, WriteOperation};
pub use package::{PackageDetail, PackageRecord};
pub use platform::OsFamily;
