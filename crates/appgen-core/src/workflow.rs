//! Project creation workflow
//!
//! Resolve the template, fetch it, install the base dependencies, record the
//! answers and provision each feature, strictly in that order. Any failure
//! ends the run and leaves the project directory as it is.

use crate::answers::{Answers, Feature, Framework};
use crate::config;
use crate::error::{Result, ScaffoldError};
use crate::provision::Provisioner;
use crate::runtime::{CommandRunner, PackageManager};
use crate::templates::{catalog, ArchiveClient, FetchMethod, TemplateFetcher};
use std::path::{Path, PathBuf};

/// Progress sink for the workflow. The unit type discards everything.
pub trait Reporter {
    /// A new stage is starting
    fn step(&self, message: &str);

    fn info(&self, message: &str);

    fn success(&self, message: &str);
}

impl Reporter for () {
    fn step(&self, _message: &str) {}

    fn info(&self, _message: &str) {}

    fn success(&self, _message: &str) {}
}

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct ProjectSummary {
    pub project_dir: PathBuf,
    pub framework: Framework,
    pub template_id: &'static str,
    pub fetch_method: FetchMethod,
    pub package_manager: PackageManager,
    /// Features that ran a provisioning step, in the order they ran
    pub provisioned: Vec<Feature>,
    /// Command the user should run next
    pub next_command: String,
}

/// Wires the fetcher, command runner and reporter together
pub struct ProjectBuilder<'a, A, R, P> {
    fetcher: &'a TemplateFetcher<A>,
    runner: &'a R,
    reporter: &'a P,
}

impl<'a, A, R, P> ProjectBuilder<'a, A, R, P>
where
    A: ArchiveClient,
    R: CommandRunner,
    P: Reporter,
{
    pub fn new(fetcher: &'a TemplateFetcher<A>, runner: &'a R, reporter: &'a P) -> Self {
        Self {
            fetcher,
            runner,
            reporter,
        }
    }

    /// Create `<base_dir>/<project name>` from the answers
    pub async fn create(
        &self,
        answers: &Answers,
        base_dir: &Path,
        package_manager: PackageManager,
    ) -> Result<ProjectSummary> {
        let project_dir = base_dir.join(answers.project_name());
        let template_id = catalog::resolve(answers.framework(), answers.wants_styling_addon());
        tracing::info!(
            template = template_id,
            project_dir = %project_dir.display(),
            %package_manager,
            "creating project"
        );

        self.reporter
            .step(&format!("Downloading template {}...", template_id));
        let outcome = self
            .fetcher
            .fetch(self.runner, template_id, &project_dir)
            .await?;
        self.reporter.success(&format!(
            "Fetched {} files via {}",
            outcome.files.len(),
            outcome.method
        ));

        self.reporter.step("Installing dependencies...");
        let install = package_manager.install_command();
        let status = self.runner.run(&install, Some(&project_dir)).await?;
        if !status.success() {
            return Err(ScaffoldError::CommandFailed {
                command: install.to_string(),
                exit_code: status.code,
            });
        }

        let answers_path = config::write_answers(&project_dir, answers)?;
        self.reporter
            .info(&format!("Saved choices to {}", answers_path.display()));

        let provisioned = Provisioner::new(self.runner, self.reporter)
            .provision(
                &project_dir,
                answers.framework(),
                answers.features(),
                package_manager,
            )
            .await?;

        let next_command = format!(
            "cd {} && {}",
            answers.project_name(),
            package_manager.run_script_line("dev")
        );

        Ok(ProjectSummary {
            project_dir,
            framework: answers.framework(),
            template_id,
            fetch_method: outcome.method,
            package_manager,
            provisioned,
            next_command,
        })
    }
}
