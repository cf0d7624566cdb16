//! Where templates live: a GitHub repository, branch and folder prefix

use crate::error::{Result, ScaffoldError};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Folder in the repository that holds one sub-folder per template
pub const TEMPLATES_SUBDIR: &str = "project-templates";

/// A fixed remote repository reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRepo {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub subdir: String,
}

impl TemplateRepo {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
            subdir: TEMPLATES_SUBDIR.to_string(),
        }
    }

    /// Zip of the whole branch, served without authentication
    pub fn archive_url(&self) -> Result<Url> {
        let raw = format!(
            "https://codeload.github.com/{}/{}/zip/refs/heads/{}",
            self.owner, self.repo, self.branch
        );
        Url::parse(&raw).map_err(|e| ScaffoldError::Config(format!("Invalid archive URL {}: {}", raw, e)))
    }

    /// SSH clone address; requires credentials already held by the caller
    pub fn ssh_url(&self) -> String {
        format!("git@github.com:{}/{}.git", self.owner, self.repo)
    }

    /// Path of a template inside the repository, using `/` separators
    pub fn template_path(&self, template_id: &str) -> String {
        format!("{}/{}", self.subdir, template_id)
    }
}

impl fmt::Display for TemplateRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.branch)
    }
}

/// Parses `owner/repo` or `owner/repo#branch` (branch defaults to `main`)
impl FromStr for TemplateRepo {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (path, branch) = match s.split_once('#') {
            Some((path, branch)) => (path, branch),
            None => (s, "main"),
        };

        match path.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') && !branch.is_empty() =>
            {
                Ok(Self::new(owner, repo, branch))
            }
            _ => Err(ScaffoldError::Config(format!(
                "Invalid template repository '{}': expected owner/repo or owner/repo#branch",
                s
            ))),
        }
    }
}
