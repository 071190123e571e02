use super::{Check, CheckResult, RunContext, Stage};
use crate::{errors::PreflightError, migrate::MigrationRunner};
use futures::{FutureExt, future::BoxFuture};

/// Applies pending migrations unless told to skip them
pub struct MigrationApplyCheck {
    runner: Box<dyn MigrationRunner>,
    skip: bool,
}

impl MigrationApplyCheck {
    #[must_use]
    pub fn new(runner: Box<dyn MigrationRunner>, skip: bool) -> Self {
        Self { runner, skip }
    }
}

impl Check for MigrationApplyCheck {
    fn stage(&self) -> Stage {
        Stage::Migration
    }

    fn run<'a>(
        &'a self,
        _ctx: &'a mut RunContext,
    ) -> BoxFuture<'a, Result<CheckResult, PreflightError>> {
        async move {
            if self.skip {
                return Ok(CheckResult::Skipped(
                    "migrations skipped (DBPREFLIGHT_SKIP_MIGRATIONS)".to_string(),
                ));
            }

            let out = self
                .runner
                .apply()
                .await
                .map_err(|e| PreflightError::Migration(format!("{e:#}")))?;

            if !out.success {
                return Err(PreflightError::Migration(if out.output.trim().is_empty() {
                    match out.code {
                        Some(code) => format!("migration runner exited with status {code}"),
                        None => "migration runner was terminated by a signal".to_string(),
                    }
                } else {
                    out.output
                }));
            }

            tracing::debug!(output = %out.output, "migrations applied");

            Ok(CheckResult::Success("pending migrations applied".to_string()))
        }
        .boxed()
    }
}
