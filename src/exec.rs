use crate::session::CommandRunner;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::Command;

/// Runs command lines through `sh -c`, blocking until the child exits.
/// Output and exit status are not interpreted.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: PathBuf,
    working_dir: PathBuf,
}

impl ShellRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            shell: PathBuf::from("sh"),
            working_dir: working_dir.into(),
        }
    }

    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&mut self, command_line: &str) -> Result<Option<i32>> {
        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(command_line)
            .current_dir(&self.working_dir)
            .status()
            .with_context(|| format!("spawning {} -c", self.shell.display()))?;
        Ok(status.code())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ShellRunner::new(dir.path());
        assert_eq!(runner.run("exit 3").unwrap(), Some(3));
        assert_eq!(runner.run("true").unwrap(), Some(0));
    }

    #[test]
    fn runs_inside_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ShellRunner::new(dir.path());
        runner.run("echo launched > marker.txt").unwrap();
        let marker = std::fs::read_to_string(dir.path().join("marker.txt")).unwrap();
        assert_eq!(marker.trim(), "launched");
    }

    #[test]
    fn missing_shell_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ShellRunner::new(dir.path()).with_shell("/nonexistent/shell");
        assert!(runner.run("true").is_err());
    }
}
