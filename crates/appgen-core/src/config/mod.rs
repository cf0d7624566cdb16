//! Configuration file utilities

pub mod generator;

use crate::answers::Answers;
use crate::error::{Result, ScaffoldError};
use std::fs;
use std::path::{Path, PathBuf};

/// Persist the run's answers as `config.cli.json` in the project directory
pub fn write_answers(project_dir: &Path, answers: &Answers) -> Result<PathBuf> {
    let path = project_dir.join(crate::ANSWERS_FILE);
    let json = answers.to_pretty_json()?;
    fs::write(&path, json).map_err(|e| ScaffoldError::io(&path, e))?;
    Ok(path)
}
