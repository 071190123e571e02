use crate::{
    checks::{
        Check, CheckResult, ConnectivityCheck, EnvironmentCheck, MigrationApplyCheck, RunContext,
        Stage, VersionCompatibilityCheck,
    },
    config::Config,
    descriptor::ConnectionDescriptor,
    errors::PreflightError,
    migrate::MigrationRunner,
    queries::Connector,
    report::Reporter,
    tls::{derive_tls, describe},
    version::ServerVersion,
};
use serde::Serialize;
use std::{io::Write, process::ExitCode};
use tokio::time::{Duration, Instant, timeout_at};

/// Result of one check, tagged with the stage it ran in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageResult {
    pub stage: Stage,
    pub result: CheckResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

impl StageResult {
    #[must_use]
    pub const fn new(stage: Stage, result: CheckResult, error_kind: Option<&'static str>) -> Self {
        Self {
            stage,
            result,
            error_kind,
        }
    }
}

/// Everything a run produced, created fresh per invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineOutcome {
    /// `Done` or `Failed` once the run is over
    pub state: Stage,
    /// The whole pipeline was bypassed
    pub skipped: bool,
    pub results: Vec<StageResult>,
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_version: Option<ServerVersion>,
    pub exit_code: u8,
}

impl PipelineOutcome {
    const fn new() -> Self {
        Self {
            state: Stage::Idle,
            skipped: false,
            results: Vec::new(),
            notes: Vec::new(),
            server_version: None,
            exit_code: 0,
        }
    }

    #[must_use]
    pub const fn passed(&self) -> bool {
        self.exit_code == 0
    }

    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_code)
    }

    fn fail(&mut self, stage: Stage, err: &PreflightError) {
        self.results.push(StageResult::new(
            stage,
            CheckResult::Failure(err.to_string()),
            Some(err.kind()),
        ));
        self.state = Stage::Failed;
        self.exit_code = 1;
    }
}

/// Ordered, fail-fast check runner
///
/// `Idle → Environment → Connectivity → Version → Migration → Done`, any
/// state moves to `Failed` on the first error and nothing after it runs.
pub struct Pipeline {
    config: Config,
    checks: Vec<Box<dyn Check>>,
}

impl Pipeline {
    /// Pipeline with the standard checks in their fixed order
    #[must_use]
    pub fn new(
        config: Config,
        connector: Box<dyn Connector>,
        migrator: Box<dyn MigrationRunner>,
    ) -> Self {
        let checks: Vec<Box<dyn Check>> = vec![
            Box::new(EnvironmentCheck),
            Box::new(ConnectivityCheck::new(connector)),
            Box::new(VersionCompatibilityCheck::new(config.min_version)),
            Box::new(MigrationApplyCheck::new(migrator, config.skip_migrations)),
        ];

        Self::with_checks(config, checks)
    }

    /// Pipeline with a custom ordered list of checks
    #[must_use]
    pub fn with_checks(config: Config, checks: Vec<Box<dyn Check>>) -> Self {
        Self { config, checks }
    }

    /// Run every check in order, stopping at the first failure
    pub async fn run<W: Write>(self, reporter: &mut Reporter<W>) -> PipelineOutcome {
        let mut outcome = PipelineOutcome::new();

        if self.config.skip_all {
            tracing::info!("DBPREFLIGHT_SKIP is set, skipping all checks");
            outcome.skipped = true;
            outcome.state = Stage::Done;
            reporter.finish(&outcome);
            return outcome;
        }

        let mut ctx = RunContext::new(&self.config);

        if let Some(url) = self.config.database_url.as_deref() {
            match ConnectionDescriptor::parse(url) {
                Ok(descriptor) => {
                    ctx.tls = derive_tls(&descriptor, &self.config.tls);

                    let tls_state = describe(ctx.tls.as_ref());
                    tracing::debug!(%descriptor, "{tls_state}");
                    if self.config.tls_debug {
                        reporter.note(&tls_state);
                        outcome.notes.push(tls_state);
                    }

                    ctx.descriptor = Some(descriptor);
                }
                Err(e) => {
                    outcome.fail(Stage::Environment, &e);
                    if let Some(last) = outcome.results.last() {
                        reporter.check(last.stage, &last.result);
                    }
                    reporter.finish(&outcome);
                    return outcome;
                }
            }
        }

        let deadline = self
            .config
            .timeout
            .map(|secs| (secs, Instant::now() + Duration::from_secs(secs)));

        for check in &self.checks {
            let stage = check.stage();
            outcome.state = stage;
            tracing::debug!(%stage, "running check");

            let result = match deadline {
                Some((secs, deadline)) => timeout_at(deadline, check.run(&mut ctx))
                    .await
                    .unwrap_or(Err(PreflightError::Timeout(secs))),
                None => check.run(&mut ctx).await,
            };

            for note in ctx.take_notes() {
                reporter.note(&note);
                outcome.notes.push(note);
            }

            match result {
                Ok(result) => {
                    reporter.check(stage, &result);
                    outcome.results.push(StageResult::new(stage, result, None));
                }
                Err(e) => {
                    tracing::debug!(%stage, "check failed: {e}");
                    outcome.fail(stage, &e);
                    if let Some(last) = outcome.results.last() {
                        reporter.check(stage, &last.result);
                    }
                    break;
                }
            }
        }

        if outcome.state != Stage::Failed {
            outcome.state = Stage::Done;
        }
        outcome.server_version = ctx.server_version;

        if let Some(conn) = ctx.connection.take() {
            let closed = match deadline {
                Some((secs, deadline)) => timeout_at(deadline, conn.close())
                    .await
                    .unwrap_or_else(|_| Err(anyhow::anyhow!("timed out after {secs}s"))),
                None => conn.close().await,
            };
            if let Err(e) = closed {
                tracing::warn!("failed to close database connection: {e:#}");
            }
        }

        reporter.finish(&outcome);
        outcome
    }
}
