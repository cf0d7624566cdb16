//! Error types for the scaffolding pipeline

use crate::answers::Feature;
use std::path::PathBuf;
use thiserror::Error;

/// Every way a scaffolding run can fail. All of them are fatal to the run.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// Both the archive download and the git clone fallback failed
    #[error("Failed to fetch template '{template}': {primary}; fallback also failed: {fallback}")]
    Fetch {
        template: String,
        primary: String,
        fallback: String,
    },

    /// The cloned repository has no folder for the requested template.
    /// `clone_error` is set when the clone itself failed.
    #[error("Template folder '{template}' does not exist on branch '{branch}'{}", describe_clone_error(.clone_error))]
    TemplateNotFound {
        template: String,
        branch: String,
        clone_error: Option<String>,
    },

    /// A feature's command exited unsuccessfully
    #[error("Setting up {feature} failed ({})", describe_exit(.exit_code))]
    Provisioning {
        feature: Feature,
        exit_code: Option<i32>,
    },

    /// A command outside of feature provisioning exited unsuccessfully
    #[error("Command `{command}` failed ({})", describe_exit(.exit_code))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
    },

    /// A command could not be started at all
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for scaffolding operations
pub type Result<T> = std::result::Result<T, ScaffoldError>;

impl ScaffoldError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn describe_clone_error(clone_error: &Option<String>) -> String {
    match clone_error {
        Some(cause) => format!(" (git clone failed: {})", cause),
        None => String::new(),
    }
}

pub(crate) fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}
