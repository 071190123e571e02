use super::{Check, CheckResult, RunContext, Stage};
use crate::{errors::PreflightError, version::ServerVersion};
use futures::{FutureExt, future::BoxFuture};

/// Server version is at least `minimum`
#[derive(Debug, Clone, Copy)]
pub struct VersionCompatibilityCheck {
    minimum: ServerVersion,
}

impl VersionCompatibilityCheck {
    #[must_use]
    pub const fn new(minimum: ServerVersion) -> Self {
        Self { minimum }
    }
}

impl Check for VersionCompatibilityCheck {
    fn stage(&self) -> Stage {
        Stage::Version
    }

    fn run<'a>(
        &'a self,
        ctx: &'a mut RunContext,
    ) -> BoxFuture<'a, Result<CheckResult, PreflightError>> {
        async move {
            let conn = ctx.connection.as_mut().ok_or_else(|| {
                PreflightError::Connectivity("no open database connection".to_string())
            })?;

            let raw = conn.server_version().await.map_err(|e| {
                PreflightError::Connectivity(format!("could not query server version: {e:#}"))
            })?;

            let version = ServerVersion::coerce(&raw).ok_or_else(|| {
                PreflightError::Compatibility(format!(
                    "could not parse server version from {raw:?}"
                ))
            })?;

            ctx.server_version = Some(version);

            if version < self.minimum {
                return Err(PreflightError::Compatibility(format!(
                    "server version {version} is below the minimum {}",
                    self.minimum
                )));
            }

            Ok(CheckResult::Success(format!(
                "server version {version} (minimum {})",
                self.minimum
            )))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::{config::Config, queries::ServerHandle};
    use anyhow::anyhow;

    struct Handle(Option<&'static str>);

    impl ServerHandle for Handle {
        fn server_version(&mut self) -> BoxFuture<'_, anyhow::Result<String>> {
            let version = self.0;
            async move {
                version
                    .map(ToString::to_string)
                    .ok_or_else(|| anyhow!("server closed the connection unexpectedly"))
            }
            .boxed()
        }

        fn close(self: Box<Self>) -> BoxFuture<'static, anyhow::Result<()>> {
            async { Ok(()) }.boxed()
        }
    }

    async fn run(version: Option<&'static str>) -> (Result<CheckResult, PreflightError>, RunContext) {
        let mut ctx = RunContext::new(&Config::default());
        ctx.connection = Some(Box::new(Handle(version)));
        let check = VersionCompatibilityCheck::new(ServerVersion::new(9, 4, 0));
        let result = check.run(&mut ctx).await;
        (result, ctx)
    }

    #[tokio::test]
    async fn test_new_enough() {
        let (result, ctx) =
            run(Some("PostgreSQL 16.2 (Debian 16.2-1.pgdg120+2) on x86_64-pc-linux-gnu")).await;
        assert_eq!(
            result.unwrap(),
            CheckResult::Success("server version 16.2.0 (minimum 9.4.0)".to_string())
        );
        assert_eq!(ctx.server_version, Some(ServerVersion::new(16, 2, 0)));
    }

    #[tokio::test]
    async fn test_exact_minimum_passes() {
        let (result, _) = run(Some("9.4")).await;
        assert!(result.unwrap().is_success());
    }

    #[tokio::test]
    async fn test_too_old() {
        let (result, ctx) = run(Some("PostgreSQL 9.3.1 on linux")).await;
        assert_eq!(
            result.unwrap_err(),
            PreflightError::Compatibility(
                "server version 9.3.1 is below the minimum 9.4.0".to_string()
            )
        );
        assert_eq!(ctx.server_version, Some(ServerVersion::new(9, 3, 1)));
    }

    #[tokio::test]
    async fn test_unparsable() {
        let (result, ctx) = run(Some("PostgreSQL devel")).await;
        assert_eq!(result.unwrap_err().kind(), "compatibility");
        assert_eq!(ctx.server_version, None);
    }

    #[tokio::test]
    async fn test_query_failure_is_connectivity() {
        let (result, _) = run(None).await;
        assert_eq!(result.unwrap_err().kind(), "connectivity");
    }

    #[tokio::test]
    async fn test_without_connection() {
        let mut ctx = RunContext::new(&Config::default());
        let check = VersionCompatibilityCheck::new(ServerVersion::new(9, 4, 0));
        let err = check.run(&mut ctx).await.unwrap_err();
        assert_eq!(err.kind(), "connectivity");
    }
}
