//! Template catalog, retrieval and copying
//!
//! This module provides:
//! - The fixed (framework, styling add-on) → template catalog
//! - The remote repository reference templates are served from
//! - Template fetching with an archive download and a git clone fallback
//! - Extraction and recursive copying into the project directory

pub mod catalog;
pub mod copier;
pub mod fetcher;
pub mod source;

pub use catalog::resolve;
pub use fetcher::{ArchiveClient, FetchMethod, FetchOutcome, HttpArchiveClient, TemplateFetcher};
pub use source::{TemplateRepo, TEMPLATES_SUBDIR};
