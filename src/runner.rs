//! External command execution.
//!
//! Everything the tool delegates (the package manager, the deploy script, the
//! ADK CLI) goes through [`CommandRunner`], so pipeline logic can be exercised
//! with a scripted runner instead of real processes.

use crate::error::{AgentDeployError, Result};
use crate::utils::shell;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A single external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Build a spec from an argv-style list; `None` when the list is empty
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone()).args(args.iter().cloned()))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Printable command line
    pub fn display(&self) -> String {
        shell::display_command(&self.program, &self.args)
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner {
    /// Run a command to completion.
    ///
    /// Errors only when the command could not be started; a non-zero exit is
    /// reported through [`CommandOutput::code`].
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

/// Run a command and turn a non-zero exit into an error
pub fn run_checked(runner: &dyn CommandRunner, spec: &CommandSpec) -> Result<CommandOutput> {
    let output = runner.run(spec)?;
    match output.code {
        Some(0) => Ok(output),
        Some(code) => Err(AgentDeployError::CommandExitCode {
            command: spec.display(),
            code,
        }),
        None => Err(AgentDeployError::CommandTerminated {
            command: spec.display(),
        }),
    }
}

/// Runs commands as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Check if a program can be found on PATH
    pub fn is_installed(program: &str) -> bool {
        which::which(program).is_ok()
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let is_path = spec.program.contains(std::path::MAIN_SEPARATOR);
        if !is_path && !Self::is_installed(&spec.program) {
            return Err(AgentDeployError::ToolNotInstalled(spec.program.clone()));
        }

        println!("Running: {}", spec.display());
        if let Some(cwd) = &spec.cwd {
            tracing::debug!(cwd = %cwd.display(), "working directory");
        }

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        cmd.envs(spec.env.iter().map(|(k, v)| (k, v)));
        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }

        let output = cmd.output().map_err(|source| AgentDeployError::Spawn {
            command: spec.display(),
            source,
        })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if !result.stdout.is_empty() {
            println!("{}", result.stdout.trim_end());
        }
        if !result.stderr.is_empty() {
            eprintln!("{}", result.stderr.trim_end());
        }

        tracing::debug!(command = %spec.display(), code = ?result.code, "command finished");

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FixedRunner {
        code: Option<i32>,
        calls: RefCell<Vec<String>>,
    }

    impl CommandRunner for FixedRunner {
        fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
            self.calls.borrow_mut().push(spec.display());
            Ok(CommandOutput {
                code: self.code,
                ..Default::default()
            })
        }
    }

    #[test]
    fn test_spec_builder() {
        let spec = CommandSpec::new("poetry")
            .arg("run")
            .args(["python", "remote.py"])
            .cwd("/deploy")
            .env("REGION", "us-central1");

        assert_eq!(spec.display(), "poetry run python remote.py");
        assert_eq!(spec.cwd, Some(PathBuf::from("/deploy")));
        assert_eq!(spec.env, vec![("REGION".to_string(), "us-central1".to_string())]);
    }

    #[test]
    fn test_from_argv() {
        let argv = vec!["./deploy.sh".to_string(), "--prod".to_string()];
        let spec = CommandSpec::from_argv(&argv).unwrap();
        assert_eq!(spec.program, "./deploy.sh");
        assert_eq!(spec.args, vec!["--prod"]);
        assert!(CommandSpec::from_argv(&[]).is_none());
    }

    #[test]
    fn test_run_checked_success() {
        let runner = FixedRunner {
            code: Some(0),
            calls: RefCell::new(vec![]),
        };
        assert!(run_checked(&runner, &CommandSpec::new("poetry").arg("lock")).is_ok());
        assert_eq!(runner.calls.borrow().as_slice(), ["poetry lock"]);
    }

    #[test]
    fn test_run_checked_nonzero() {
        let runner = FixedRunner {
            code: Some(2),
            calls: RefCell::new(vec![]),
        };
        let err = run_checked(&runner, &CommandSpec::new("poetry").arg("install")).unwrap_err();
        match err {
            AgentDeployError::CommandExitCode { command, code } => {
                assert_eq!(command, "poetry install");
                assert_eq!(code, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_checked_signal() {
        let runner = FixedRunner {
            code: None,
            calls: RefCell::new(vec![]),
        };
        let err = run_checked(&runner, &CommandSpec::new("adk")).unwrap_err();
        assert!(matches!(err, AgentDeployError::CommandTerminated { .. }));
    }

    #[test]
    fn test_system_runner_missing_tool() {
        let runner = SystemRunner;
        let err = runner
            .run(&CommandSpec::new("agent-deploy-no-such-tool-xyz"))
            .unwrap_err();
        assert!(matches!(err, AgentDeployError::ToolNotInstalled(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_output() {
        let runner = SystemRunner;
        let output = runner
            .run(&CommandSpec::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]))
            .unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_env_and_cwd() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = SystemRunner;
        let output = runner
            .run(
                &CommandSpec::new("sh")
                    .args(["-c", "echo $AGENT_DEPLOY_PROBE; pwd"])
                    .cwd(dir.path())
                    .env("AGENT_DEPLOY_PROBE", "probe"),
            )
            .unwrap();
        assert!(output.success());
        assert!(output.stdout.starts_with("probe\n"));
        let dir_name = dir.path().file_name().unwrap().to_string_lossy();
        assert!(output.stdout.trim_end().ends_with(&*dir_name));
    }
}
