//! Running external commands (package managers, git, initializers)
//!
//! Every command runs to completion before the next one starts, with the
//! terminal passed straight through so interactive tools can prompt the user.
//! The [`CommandRunner`] trait is the seam tests use to record commands
//! instead of executing them.

use crate::error::{Result, ScaffoldError};
use colored::Colorize;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

/// A program plus its arguments. Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    program: String,
    args: Vec<OsString>,
}

impl ShellCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// How a finished command exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for CommandStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Runs a command to completion, inheriting the terminal.
///
/// `Err` only when the command could not be started; a non-zero exit is
/// reported through [`CommandStatus`].
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, command: &ShellCommand, cwd: Option<&Path>) -> Result<CommandStatus>;
}

/// Runs commands on the host system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    quiet: bool,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Do not echo each command before running it
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    fn build(command: &ShellCommand) -> TokioCommand {
        // npm, npx, yarn and pnpm are .cmd shims on Windows
        if cfg!(windows) {
            let mut cmd = TokioCommand::new("cmd");
            cmd.arg("/C").arg(command.program()).args(command.get_args());
            cmd
        } else {
            let mut cmd = TokioCommand::new(command.program());
            cmd.args(command.get_args());
            cmd
        }
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, command: &ShellCommand, cwd: Option<&Path>) -> Result<CommandStatus> {
        if !self.quiet {
            println!();
            println!("{} {}", "Running:".dimmed(), command.to_string().yellow());
        }
        tracing::debug!(%command, cwd = ?cwd, "spawning command");

        let mut cmd = Self::build(command);
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let status = cmd
            .status()
            .await
            .map_err(|source| ScaffoldError::Spawn {
                command: command.to_string(),
                source,
            })?;

        tracing::debug!(%command, code = ?status.code(), "command finished");
        Ok(status.into())
    }
}
