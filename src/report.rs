use crate::{
    checks::{CheckResult, Stage},
    pipeline::PipelineOutcome,
};
use chrono::{SecondsFormat, Utc};
use colored::Colorize;
use std::{io::Write, str::FromStr};

/// How the trace is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One colored line per check, as they complete
    #[default]
    Text,
    /// A single JSON document once the run is over
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}")),
        }
    }
}

/// Writes the pass/fail trace of a run
pub struct Reporter<W: Write> {
    format: OutputFormat,
    out: W,
}

impl Reporter<std::io::Stdout> {
    #[must_use]
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, std::io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub const fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Informational line, never a failure
    pub fn note(&mut self, message: &str) {
        if self.format == OutputFormat::Text {
            self.emit(&format!("{} {message}", "i".blue().bold()));
        }
    }

    pub fn check(&mut self, stage: Stage, result: &CheckResult) {
        if self.format == OutputFormat::Text {
            self.emit(&render(stage, result));
        }
    }

    pub fn finish(&mut self, outcome: &PipelineOutcome) {
        match self.format {
            OutputFormat::Text => {
                let line = if outcome.skipped {
                    "pre-flight checks skipped (DBPREFLIGHT_SKIP)".yellow().to_string()
                } else if outcome.passed() {
                    "all pre-flight checks passed".green().bold().to_string()
                } else {
                    let stage = outcome
                        .results
                        .last()
                        .map_or(Stage::Failed, |result| result.stage);
                    format!("pre-flight failed at {stage}").red().bold().to_string()
                };
                self.emit(&line);
            }
            OutputFormat::Json => match serde_json::to_string_pretty(outcome) {
                Ok(json) => self.write_line(&json),
                Err(e) => tracing::error!("failed to serialize pre-flight outcome: {e}"),
            },
        }
    }

    fn emit(&mut self, line: &str) {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.write_line(&format!("{now} - {line}"));
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            tracing::warn!("failed to write pre-flight report: {e}");
        }
    }
}

/// Render one check result without the timestamp
#[must_use]
pub fn render(stage: Stage, result: &CheckResult) -> String {
    match result {
        CheckResult::Success(message) => format!("{} {stage}: {message}", "✔".green()),
        CheckResult::Skipped(message) => format!("{} {stage}: {message}", "-".yellow()),
        CheckResult::Failure(message) => {
            format!("{} {stage}: {}", "✘".red(), message.red())
        }
    }
}
