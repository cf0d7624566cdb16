//! Feature provisioning
//!
//! Each selected feature becomes one self-contained [`ProvisioningStep`]:
//! a short list of actions run inside the project directory. Planning is
//! pure so the exact commands and files can be inspected; execution stops at
//! the first failing command and leaves everything already applied in place.

use crate::answers::{Feature, Framework};
use crate::config::generator;
use crate::error::{Result, ScaffoldError};
use crate::runtime::{CommandRunner, PackageManager, ShellCommand};
use crate::workflow::Reporter;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const PACKAGE_MANIFEST: &str = "package.json";

const LINT_PACKAGES: &[&str] = &[
    "eslint",
    "prettier",
    "eslint-config-prettier",
    "eslint-plugin-react",
    "eslint-plugin-react-hooks",
];
const HOOK_PACKAGES: &[&str] = &["husky", "lint-staged"];
const VITEST_PACKAGES: &[&str] = &[
    "vitest",
    "@testing-library/react",
    "@testing-library/jest-dom",
    "jsdom",
];
const JEST_PACKAGES: &[&str] = &[
    "@testing-library/react",
    "@testing-library/jest-dom",
    "jest",
    "jest-environment-jsdom",
    "ts-jest",
];
const REACT_I18N_PACKAGES: &[&str] = &["react-i18next", "i18next"];
const NEXT_I18N_PACKAGES: &[&str] = &["next-i18next", "react-i18next", "i18next"];
const AUTH_PACKAGE: &str = "next-auth";

/// One unit of work inside a step
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Run a command in the project directory
    Run(ShellCommand),
    /// Write a file relative to the project directory
    WriteFile {
        path: PathBuf,
        contents: String,
        /// Unix permission bits, applied where supported
        mode: Option<u32>,
    },
    /// Set a top-level key in `package.json`, keeping everything else
    MergeManifest { key: String, value: Value },
}

impl Action {
    fn write(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Action::WriteFile {
            path: path.into(),
            contents: contents.into(),
            mode: None,
        }
    }
}

/// Everything one feature needs
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisioningStep {
    pub feature: Feature,
    pub actions: Vec<Action>,
}

/// Build the steps for the selected features, in declaration order.
///
/// Duplicates collapse, and features without work of their own (the
/// styling add-on, which only affects template choice) produce no step.
pub fn plan(
    framework: Framework,
    features: &[Feature],
    package_manager: PackageManager,
) -> Vec<ProvisioningStep> {
    let ordered: BTreeSet<Feature> = features.iter().copied().collect();
    ordered
        .into_iter()
        .filter_map(|feature| {
            let actions = actions_for(feature, framework, package_manager);
            (!actions.is_empty()).then_some(ProvisioningStep { feature, actions })
        })
        .collect()
}

fn actions_for(feature: Feature, framework: Framework, pm: PackageManager) -> Vec<Action> {
    match feature {
        Feature::Tailwind => Vec::new(),
        Feature::LintFormat => vec![
            Action::Run(pm.add_command(LINT_PACKAGES, true)),
            Action::write(".eslintrc.json", generator::to_json_text(&generator::eslintrc(framework))),
            Action::write(".prettierrc", generator::to_json_text(&generator::prettierrc())),
            Action::write(".prettierignore", generator::PRETTIER_IGNORE),
        ],
        Feature::GitHooks => vec![
            Action::Run(pm.add_command(HOOK_PACKAGES, true)),
            Action::Run(ShellCommand::new("npx").args(["husky", "init"])),
            Action::WriteFile {
                path: Path::new(".husky").join("pre-commit"),
                contents: generator::pre_commit_hook(pm),
                mode: Some(0o755),
            },
            Action::MergeManifest {
                key: "lint-staged".to_string(),
                value: generator::lint_staged(),
            },
        ],
        Feature::Testing => match framework {
            Framework::React => vec![
                Action::Run(pm.add_command(VITEST_PACKAGES, true)),
                Action::write("vitest.config.js", generator::VITEST_CONFIG),
            ],
            Framework::NextJs => vec![
                Action::Run(pm.add_command(JEST_PACKAGES, true)),
                Action::write("jest.config.cjs", generator::JEST_CONFIG),
                Action::write("jest.setup.js", generator::JEST_SETUP),
            ],
        },
        Feature::Storybook => vec![Action::Run(
            ShellCommand::new("npx").args(["storybook@latest", "init"]),
        )],
        Feature::I18n => {
            let packages = match framework {
                Framework::React => REACT_I18N_PACKAGES,
                Framework::NextJs => NEXT_I18N_PACKAGES,
            };
            vec![Action::Run(pm.add_command(packages, false))]
        }
        Feature::Auth => vec![Action::Run(pm.add_command(&[AUTH_PACKAGE], false))],
    }
}

/// Runs provisioning steps against a project directory
pub struct Provisioner<'a, R, P> {
    runner: &'a R,
    reporter: &'a P,
}

impl<'a, R: CommandRunner, P: Reporter> Provisioner<'a, R, P> {
    pub fn new(runner: &'a R, reporter: &'a P) -> Self {
        Self { runner, reporter }
    }

    /// Provision every selected feature; returns the features that had work.
    ///
    /// The project directory must already hold the installed base template.
    pub async fn provision(
        &self,
        project_dir: &Path,
        framework: Framework,
        features: &[Feature],
        package_manager: PackageManager,
    ) -> Result<Vec<Feature>> {
        if !project_dir.is_dir() {
            return Err(ScaffoldError::io(
                project_dir,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "project directory does not exist",
                ),
            ));
        }

        let steps = plan(framework, features, package_manager);
        let mut applied = Vec::with_capacity(steps.len());
        for step in &steps {
            self.reporter
                .step(&format!("Setting up {}...", step.feature.display_name()));
            self.apply(project_dir, step).await?;
            applied.push(step.feature);
        }

        Ok(applied)
    }

    /// Apply a single step, stopping at its first failure
    pub async fn apply(&self, project_dir: &Path, step: &ProvisioningStep) -> Result<()> {
        for action in &step.actions {
            match action {
                Action::Run(command) => {
                    let status = self.runner.run(command, Some(project_dir)).await?;
                    if !status.success() {
                        return Err(ScaffoldError::Provisioning {
                            feature: step.feature,
                            exit_code: status.code,
                        });
                    }
                }
                Action::WriteFile {
                    path,
                    contents,
                    mode,
                } => write_file(&project_dir.join(path), contents, *mode)?,
                Action::MergeManifest { key, value } => {
                    merge_manifest(&project_dir.join(PACKAGE_MANIFEST), key, value.clone())?
                }
            }
        }
        Ok(())
    }
}

fn write_file(path: &Path, contents: &str, mode: Option<u32>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ScaffoldError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| ScaffoldError::io(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Some(mode) = mode {
            fs::set_permissions(path, fs::Permissions::from_mode(mode))
                .map_err(|e| ScaffoldError::io(path, e))?;
        }
    }
    #[cfg(not(unix))]
    let _ = mode;

    tracing::debug!(path = %path.display(), "wrote file");
    Ok(())
}

/// Set `key` in the manifest at `path`, preserving the other keys and their order
fn merge_manifest(path: &Path, key: &str, value: Value) -> Result<()> {
    let text = fs::read_to_string(path).map_err(|e| ScaffoldError::io(path, e))?;
    let mut manifest: Value = serde_json::from_str(&text).map_err(|source| ScaffoldError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(object) = manifest.as_object_mut() else {
        return Err(ScaffoldError::Config(format!(
            "{} is not a JSON object",
            path.display()
        )));
    };
    object.insert(key.to_string(), value);

    fs::write(path, generator::to_json_text(&manifest)).map_err(|e| ScaffoldError::io(path, e))
}
