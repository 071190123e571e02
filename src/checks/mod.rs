//! Pre-flight checks
//!
//! Each check owns exactly one concern and runs against a shared
//! [`RunContext`]. Checks are run strictly in order by
//! [`crate::pipeline::Pipeline`], a check may rely on everything the previous
//! ones stored in the context.

pub mod connectivity;
pub mod environment;
pub mod migration;
pub mod version;

pub use connectivity::ConnectivityCheck;
pub use environment::EnvironmentCheck;
pub use migration::MigrationApplyCheck;
pub use version::VersionCompatibilityCheck;

use crate::{
    config::Config, descriptor::ConnectionDescriptor, errors::PreflightError,
    queries::ServerHandle, tls::TlsOptions, version::ServerVersion,
};
use futures::future::BoxFuture;
use serde::Serialize;
use std::fmt;

/// Pipeline states, one per check plus the terminal ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Idle,
    Environment,
    Connectivity,
    Version,
    Migration,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Environment => "environment",
            Self::Connectivity => "connectivity",
            Self::Version => "version",
            Self::Migration => "migration",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of a single check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum CheckResult {
    Success(String),
    /// Bypassed by configuration, counts as a pass
    Skipped(String),
    Failure(String),
}

impl CheckResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failure(_))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Skipped(message) | Self::Failure(message) => message,
        }
    }
}

/// State shared by the checks of one run
pub struct RunContext {
    pub database_url: Option<String>,
    pub cache_url: Option<String>,
    pub descriptor: Option<ConnectionDescriptor>,
    pub tls: Option<TlsOptions>,
    /// The single connection of the run, opened by [`ConnectivityCheck`]
    pub connection: Option<Box<dyn ServerHandle>>,
    pub server_version: Option<ServerVersion>,
    notes: Vec<String>,
}

impl RunContext {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            database_url: config.database_url.clone(),
            cache_url: config.cache_url.clone(),
            descriptor: None,
            tls: None,
            connection: None,
            server_version: None,
            notes: Vec::new(),
        }
    }

    /// Record an informational line, reported after the running check
    pub fn note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }

    pub fn take_notes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notes)
    }
}

/// A single pre-flight concern
pub trait Check: Send + Sync {
    /// Pipeline state while this check runs
    fn stage(&self) -> Stage;

    /// # Errors
    ///
    /// Returns the terminal error for the run when the check fails
    fn run<'a>(
        &'a self,
        ctx: &'a mut RunContext,
    ) -> BoxFuture<'a, Result<CheckResult, PreflightError>>;
}
