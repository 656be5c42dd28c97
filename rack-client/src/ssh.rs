//! Remote and local command execution for host power control.
//!
//! Uses `tokio::process::Command` to shell out to `ssh` and `virsh`. Keys
//! must be pre-configured; the session is non-interactive.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from command execution.
#[derive(Debug, Error)]
pub enum SshError {
    /// The command failed to execute (process spawn error).
    #[error("spawn error: {0}")]
    Spawn(#[from] std::io::Error),

    /// The command returned a non-zero exit code.
    #[error("command failed on {host}: exit={exit_code}, stderr={stderr}")]
    CommandFailed {
        /// Target host.
        host: String,
        /// Exit code.
        exit_code: i32,
        /// Standard error output.
        stderr: String,
    },
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
    /// Exit code (0 = success).
    pub exit_code: i32,
}

impl CommandResult {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    fn from_output(output: std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        }
    }
}

/// SSH target machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    /// Address of the machine.
    pub host: String,
    /// SSH username.
    pub user: String,
    /// Private key; the ssh default identity when unset.
    pub key: Option<PathBuf>,
}

impl SshTarget {
    /// Create a target using the default identity.
    pub fn new(host: &str, user: &str) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            key: None,
        }
    }

    /// Use a specific private key.
    pub fn with_key(mut self, key: PathBuf) -> Self {
        self.key = Some(key);
        self
    }

    /// Arguments passed to `ssh` for `cmd`.
    pub fn ssh_args(&self, cmd: &str) -> Vec<String> {
        let mut args: Vec<String> = [
            "-o",
            "StrictHostKeyChecking=no",
            "-o",
            "ConnectTimeout=30",
            "-o",
            "BatchMode=yes",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        if let Some(key) = &self.key {
            args.push("-i".into());
            args.push(key.display().to_string());
        }
        args.push(format!("{}@{}", self.user, self.host));
        args.push(cmd.into());
        args
    }

    /// Execute a command on the remote machine via SSH.
    ///
    /// Returns the raw result including exit code, stdout, and stderr.
    /// Does NOT fail on non-zero exit; use `exec_ok` for that.
    pub async fn exec(&self, cmd: &str) -> Result<CommandResult, SshError> {
        let output = tokio::process::Command::new("ssh")
            .args(self.ssh_args(cmd))
            .output()
            .await?;
        Ok(CommandResult::from_output(output))
    }

    /// Execute a command on the remote machine, failing on non-zero exit.
    pub async fn exec_ok(&self, cmd: &str) -> Result<CommandResult, SshError> {
        let result = self.exec(cmd).await?;
        if !result.success() {
            return Err(SshError::CommandFailed {
                host: self.host.clone(),
                exit_code: result.exit_code,
                stderr: result.stderr.clone(),
            });
        }
        Ok(result)
    }
}

/// Run a local program, failing on non-zero exit.
pub async fn run_local(program: &str, args: &[&str]) -> Result<CommandResult, SshError> {
    let output = tokio::process::Command::new(program)
        .args(args)
        .output()
        .await?;
    let result = CommandResult::from_output(output);
    if !result.success() {
        return Err(SshError::CommandFailed {
            host: "localhost".into(),
            exit_code: result.exit_code,
            stderr: result.stderr.clone(),
        });
    }
    Ok(result)
}
