//! Host environment: package manager detection and command execution
//!
//! This module provides:
//! - Package manager detection from the invoking client's user agent
//! - The `CommandRunner` seam used for every external process

pub mod command;
pub mod package_manager;

pub use command::{CommandRunner, CommandStatus, ShellCommand, SystemRunner};
pub use package_manager::{detect_package_manager, PackageManager};
