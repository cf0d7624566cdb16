//! Package manager detection and command dialects

use super::command::ShellCommand;
use std::fmt;

/// Environment variable npm, yarn and pnpm set for scripts they launch
pub const USER_AGENT_ENV: &str = "npm_config_user_agent";

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// Pick a package manager from the invoking client's user agent.
    ///
    /// `pnpm` is tested before `yarn`, so a string mentioning both resolves
    /// to pnpm. Anything else, including an empty string, is npm.
    pub fn from_user_agent(user_agent: &str) -> Self {
        if user_agent.contains("pnpm") {
            PackageManager::Pnpm
        } else if user_agent.contains("yarn") {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }

    /// Binary name
    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    /// Install the dependencies already listed in `package.json`
    pub fn install_command(&self) -> ShellCommand {
        ShellCommand::new(self.name()).arg("install")
    }

    /// Add packages, as dev dependencies when `dev` is set
    pub fn add_command(&self, packages: &[&str], dev: bool) -> ShellCommand {
        let verb = match self {
            PackageManager::Yarn => "add",
            PackageManager::Npm | PackageManager::Pnpm => "install",
        };

        let mut command = ShellCommand::new(self.name()).arg(verb);
        if dev {
            command = command.arg("-D");
        }
        command.args(packages.iter().copied())
    }

    /// Shell text that runs a locally installed binary
    pub fn exec_line(&self, bin: &str) -> String {
        format!("{} exec {}", self.name(), bin)
    }

    /// Shell text that runs a `package.json` script
    pub fn run_script_line(&self, script: &str) -> String {
        format!("{} run {}", self.name(), script)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the package manager from the environment of the current process
pub fn detect_package_manager() -> PackageManager {
    let user_agent = std::env::var(USER_AGENT_ENV).unwrap_or_default();
    let detected = PackageManager::from_user_agent(&user_agent);
    tracing::debug!(%user_agent, package_manager = %detected, "detected package manager");
    detected
}
