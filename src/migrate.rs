use anyhow::{Context, Result, anyhow};
use futures::{FutureExt, future::BoxFuture};
use std::process::Stdio;
use tokio::process::Command;

/// Result of one migration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutput {
    pub success: bool,
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    /// Captured stdout followed by stderr
    pub output: String,
}

/// Applies pending schema migrations
pub trait MigrationRunner: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the runner could not be started at all; a runner
    /// that starts and fails reports it through [`MigrationOutput::success`]
    fn apply(&self) -> BoxFuture<'_, Result<MigrationOutput>>;
}

/// Runs an external migration command, e.g. `sqlx migrate run`
#[derive(Debug, Clone)]
pub struct CommandMigrationRunner {
    command_line: String,
    envs: Vec<(String, String)>,
}

impl CommandMigrationRunner {
    /// The command line is split on whitespace, no shell is involved
    #[must_use]
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
            envs: Vec::new(),
        }
    }

    /// Extra environment variable for the child process
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl MigrationRunner for CommandMigrationRunner {
    fn apply(&self) -> BoxFuture<'_, Result<MigrationOutput>> {
        async move {
            let mut parts = self.command_line.split_whitespace();
            let program = parts
                .next()
                .ok_or_else(|| anyhow!("migration command is empty"))?;

            tracing::debug!(command = %self.command_line, "running migrations");

            let out = Command::new(program)
                .args(parts)
                .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output()
                .await
                .with_context(|| format!("Failed to run migration command: {program}"))?;

            let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
            output.push_str(&String::from_utf8_lossy(&out.stderr));

            Ok(MigrationOutput {
                success: out.status.success(),
                code: out.status.code(),
                output,
            })
        }
        .boxed()
    }
}
