use super::{Check, CheckResult, RunContext, Stage};
use crate::{errors::PreflightError, queries::Connector};
use futures::{FutureExt, future::BoxFuture};

/// Opens the run's database connection
pub struct ConnectivityCheck {
    connector: Box<dyn Connector>,
}

impl ConnectivityCheck {
    #[must_use]
    pub fn new(connector: Box<dyn Connector>) -> Self {
        Self { connector }
    }
}

impl Check for ConnectivityCheck {
    fn stage(&self) -> Stage {
        Stage::Connectivity
    }

    fn run<'a>(
        &'a self,
        ctx: &'a mut RunContext,
    ) -> BoxFuture<'a, Result<CheckResult, PreflightError>> {
        async move {
            let descriptor = ctx.descriptor.as_ref().ok_or_else(|| {
                PreflightError::Config("connection URL has not been parsed".to_string())
            })?;

            let handle = self
                .connector
                .connect(descriptor, ctx.tls.as_ref())
                .await
                .map_err(|e| PreflightError::Connectivity(format!("{e:#}")))?;

            let message = format!(
                "connected to {} ({})",
                descriptor,
                if ctx.tls.is_some() { "tls" } else { "plaintext" }
            );

            ctx.connection = Some(handle);

            Ok(CheckResult::Success(message))
        }
        .boxed()
    }
}
