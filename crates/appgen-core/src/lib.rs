//! App Generator Core - Shared library for the React / Next.js project scaffolder
//!
//! This library turns a set of answers (project name, framework, optional
//! features) into a ready-to-run starter project.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Package manager detection, template catalog,
//!   template fetching, feature provisioning
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and `ProjectBuilder`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use appgen_core::{Answers, Framework, Feature, ProjectBuilder, SystemRunner, TemplateFetcher};
//!
//! let answers = Answers::new("demo", Framework::NextJs, vec![Feature::LintFormat])?;
//! let fetcher = TemplateFetcher::from_config(&MyConfig)?;
//! let runner = SystemRunner::new();
//! let summary = ProjectBuilder::new(&fetcher, &runner, &())
//!     .create(&answers, &std::env::current_dir()?, appgen_core::detect_package_manager())
//!     .await?;
//! println!("{}", summary.next_command);
//! ```

pub mod answers;
pub mod config;
pub mod error;
pub mod product;
pub mod provision;
pub mod runtime;
pub mod templates;
pub mod workflow;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use answers::{Answers, Feature, Framework};
pub use error::{Result, ScaffoldError};
pub use product::ProductConfig;
pub use runtime::{detect_package_manager, CommandRunner, PackageManager, SystemRunner};
pub use templates::{TemplateFetcher, TemplateRepo};
pub use workflow::{ProjectBuilder, ProjectSummary, Reporter};

#[cfg(feature = "tui")]
pub use tui::run;

/// File in the project directory that records the answers of the run
pub const ANSWERS_FILE: &str = "config.cli.json";
