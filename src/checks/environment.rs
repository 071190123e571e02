use super::{Check, CheckResult, RunContext, Stage};
use crate::errors::PreflightError;
use futures::{FutureExt, future::BoxFuture};

/// Required configuration is present
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvironmentCheck;

impl Check for EnvironmentCheck {
    fn stage(&self) -> Stage {
        Stage::Environment
    }

    fn run<'a>(
        &'a self,
        ctx: &'a mut RunContext,
    ) -> BoxFuture<'a, Result<CheckResult, PreflightError>> {
        async move {
            if ctx.database_url.is_none() {
                return Err(PreflightError::Config("DATABASE_URL is not set".to_string()));
            }

            if ctx.cache_url.is_some() {
                ctx.note("REDIS_URL is set");
            }

            Ok(CheckResult::Success("DATABASE_URL is set".to_string()))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_missing_database_url() {
        let mut ctx = RunContext::new(&Config::default());
        let err = EnvironmentCheck.run(&mut ctx).await.unwrap_err();
        assert_eq!(
            err,
            PreflightError::Config("DATABASE_URL is not set".to_string())
        );
    }

    #[tokio::test]
    async fn test_database_url_present() {
        let config = Config {
            database_url: Some("postgres://localhost/db".to_string()),
            ..Config::default()
        };
        let mut ctx = RunContext::new(&config);
        let result = EnvironmentCheck.run(&mut ctx).await.unwrap();
        assert_eq!(result, CheckResult::Success("DATABASE_URL is set".to_string()));
        assert!(ctx.take_notes().is_empty());
    }

    #[tokio::test]
    async fn test_cache_url_is_a_note_not_a_failure() {
        let config = Config {
            database_url: Some("postgres://localhost/db".to_string()),
            cache_url: Some("redis://localhost:6379".to_string()),
            ..Config::default()
        };
        let mut ctx = RunContext::new(&config);
        let result = EnvironmentCheck.run(&mut ctx).await.unwrap();
        assert!(result.is_success());
        assert_eq!(ctx.take_notes(), vec!["REDIS_URL is set"]);
    }
}
