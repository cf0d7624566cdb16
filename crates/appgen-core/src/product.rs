//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to name itself and to point the
//! scaffolder at the repository that hosts its templates.

use crate::error::{Result, ScaffoldError};
use crate::templates::TemplateRepo;
use crate::workflow::ProjectSummary;
use url::Url;

/// Configuration trait for the scaffolding CLI
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Repository that hosts `project-templates/`
    fn default_template_repo(&self) -> TemplateRepo;

    /// Environment variable overriding the template repository (`owner/repo#branch`)
    fn template_repo_env(&self) -> &'static str;

    /// Environment variable overriding the archive URL used for the primary download
    fn archive_url_env(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, summary: &ProjectSummary) -> Vec<String>;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }

    /// Template repository after applying the environment override
    fn template_repo(&self) -> Result<TemplateRepo> {
        let value = std::env::var(self.template_repo_env()).ok();
        repo_override(value.as_deref(), self.default_template_repo())
    }

    /// Archive URL override, if one is set
    fn archive_url_override(&self) -> Result<Option<Url>> {
        let value = std::env::var(self.archive_url_env()).ok();
        archive_url_from(value.as_deref())
    }
}

/// Parse an `owner/repo#branch` override; unset or blank keeps the default
fn repo_override(value: Option<&str>, default: TemplateRepo) -> Result<TemplateRepo> {
    match value {
        Some(value) if !value.trim().is_empty() => value.parse(),
        _ => Ok(default),
    }
}

fn archive_url_from(value: Option<&str>) -> Result<Option<Url>> {
    match value {
        Some(value) if !value.trim().is_empty() => Url::parse(value.trim())
            .map(Some)
            .map_err(|e| ScaffoldError::Config(format!("Invalid archive URL {}: {}", value, e))),
        _ => Ok(None),
    }
}
