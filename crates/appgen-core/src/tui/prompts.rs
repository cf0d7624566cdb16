//! Charm-style CLI prompts using cliclack

use crate::answers::{Answers, Feature, Framework};
use crate::product::ProductConfig;
use crate::runtime::{detect_package_manager, SystemRunner};
use crate::templates::TemplateFetcher;
use crate::workflow::{ProjectBuilder, ProjectSummary, Reporter};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

/// Name suggested when the user gives none
pub const DEFAULT_PROJECT_NAME: &str = "my-app";

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project name (also the directory created under the current one)
    pub name: Option<String>,

    /// Framework to scaffold
    pub framework: Option<Framework>,

    /// Optional features; `Some(vec![])` means "none, don't ask"
    pub features: Option<Vec<Feature>>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Forwards workflow progress to cliclack's log lines
struct CliclackReporter;

impl Reporter for CliclackReporter {
    fn step(&self, message: &str) {
        let _ = cliclack::log::step(message);
    }

    fn info(&self, message: &str) {
        let _ = cliclack::log::info(message);
    }

    fn success(&self, message: &str) {
        let _ = cliclack::log::success(message);
    }
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Collect answers
    let answers = collect_answers(&args)?;

    // Step 2: Detect package manager
    let package_manager = detect_package_manager();
    cliclack::log::info(format!("Using {}", package_manager))?;

    // Step 3: Check the destination
    let current_dir = std::env::current_dir().context("Failed to read the current directory")?;
    confirm_destination(&current_dir.join(answers.project_name()), &args)?;

    // Step 4: Create project
    let fetcher = TemplateFetcher::from_config(config)?;
    cliclack::log::info(format!("Templates from {}", fetcher.repo()))?;

    let runner = SystemRunner::new();
    let summary = ProjectBuilder::new(&fetcher, &runner, &CliclackReporter)
        .create(&answers, &current_dir, package_manager)
        .await?;

    // Step 5: Show next steps
    print_next_steps(config, &summary)?;

    Ok(())
}

/// Fill in every answer not given on the command line
pub fn collect_answers(args: &CreateArgs) -> Result<Answers> {
    let name = prompt_name(args)?;
    let framework = select_framework(args)?;
    let features = select_features(args)?;

    Ok(Answers::new(name, framework, features)?)
}

fn prompt_name(args: &CreateArgs) -> Result<String> {
    if let Some(name) = &args.name {
        cliclack::log::info(format!("Project name: {}", name))?;
        return Ok(name.clone());
    }
    if args.yes {
        return Ok(DEFAULT_PROJECT_NAME.to_string());
    }

    let name: String = cliclack::input("Project name")
        .placeholder(DEFAULT_PROJECT_NAME)
        .default_input(DEFAULT_PROJECT_NAME)
        .validate(|input: &String| {
            if input.trim().is_empty() {
                Err("Please enter a project name")
            } else {
                Ok(())
            }
        })
        .interact()?;

    Ok(name)
}

fn select_framework(args: &CreateArgs) -> Result<Framework> {
    if let Some(framework) = args.framework {
        cliclack::log::info(format!("Framework: {}", framework))?;
        return Ok(framework);
    }
    if args.yes {
        return Ok(Framework::React);
    }

    let framework = cliclack::select("Which framework do you want to use?")
        .item(Framework::React, Framework::React.display_name(), "Vite")
        .item(Framework::NextJs, Framework::NextJs.display_name(), "")
        .interact()?;

    Ok(framework)
}

fn select_features(args: &CreateArgs) -> Result<Vec<Feature>> {
    if let Some(features) = &args.features {
        if !features.is_empty() {
            let names: Vec<&str> = features.iter().map(|f| f.display_name()).collect();
            cliclack::log::info(format!("Features: {}", names.join(", ")))?;
        }
        return Ok(features.clone());
    }
    if args.yes {
        return Ok(Vec::new());
    }

    let mut multi = cliclack::multiselect("Select optional features");
    for feature in Feature::ALL {
        multi = multi.item(feature, feature.display_name(), feature.hint());
    }

    let selected: Vec<Feature> = multi.required(false).interact()?;
    Ok(selected)
}

fn confirm_destination(project_dir: &Path, args: &CreateArgs) -> Result<()> {
    if !project_dir.is_dir() {
        return Ok(());
    }

    let count = std::fs::read_dir(project_dir)
        .map(|entries| entries.count())
        .unwrap_or(0);
    if count == 0 {
        return Ok(());
    }

    cliclack::log::warning(format!(
        "{} already has {} existing items",
        project_dir.display(),
        count
    ))?;

    // Auto-confirm with --yes flag
    let confirm = if args.yes {
        true
    } else {
        cliclack::confirm("Continue anyway?")
            .initial_value(false)
            .interact()?
    };

    if !confirm {
        anyhow::bail!("Setup cancelled.");
    }

    Ok(())
}

fn print_next_steps<C: ProductConfig>(config: &C, summary: &ProjectSummary) -> Result<()> {
    cliclack::log::success(format!(
        "Project created in {}",
        summary.project_dir.display()
    ))?;

    let steps = config.next_steps(summary);

    println!();
    println!("  {}", "Next steps".bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step.cyan());
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_skip_every_prompt() {
        let args = CreateArgs {
            name: Some("demo".to_string()),
            framework: Some(Framework::NextJs),
            features: Some(vec![Feature::Testing, Feature::LintFormat]),
            yes: false,
        };

        let answers = collect_answers(&args).unwrap();
        assert_eq!(answers.project_name(), "demo");
        assert_eq!(answers.framework(), Framework::NextJs);
        assert_eq!(
            answers.features(),
            &[Feature::Testing, Feature::LintFormat]
        );
    }

    #[test]
    fn test_yes_uses_defaults() {
        let args = CreateArgs {
            yes: true,
            ..Default::default()
        };

        let answers = collect_answers(&args).unwrap();
        assert_eq!(answers.project_name(), DEFAULT_PROJECT_NAME);
        assert_eq!(answers.framework(), Framework::React);
        assert!(answers.features().is_empty());
    }

    #[test]
    fn test_blank_name_flag_is_rejected() {
        let args = CreateArgs {
            name: Some("  ".to_string()),
            yes: true,
            ..Default::default()
        };

        assert!(collect_answers(&args).is_err());
    }

    #[test]
    fn test_empty_destination_needs_no_confirmation() {
        let temp = tempfile::TempDir::new().unwrap();
        let args = CreateArgs::default();

        assert!(confirm_destination(&temp.path().join("fresh"), &args).is_ok());
        assert!(confirm_destination(temp.path(), &args).is_ok());
    }

    #[test]
    fn test_non_empty_destination_accepted_with_yes() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("README.md"), "hi").unwrap();
        let args = CreateArgs {
            yes: true,
            ..Default::default()
        };

        assert!(confirm_destination(temp.path(), &args).is_ok());
    }
}
