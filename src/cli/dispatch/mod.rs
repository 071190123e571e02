use crate::{
    cli::actions::Action,
    config::{Config, DEFAULT_MIGRATE_CMD},
    envs::{is_truthy, non_empty},
    report::OutputFormat,
    tls::TlsOverrides,
    version::{DEFAULT_MIN_VERSION, ServerVersion},
};
use anyhow::{Result, anyhow};
use clap::ArgMatches;

fn string(matches: &ArgMatches, id: &str) -> Option<String> {
    non_empty(matches.get_one::<String>(id).cloned())
}

fn flag(matches: &ArgMatches, id: &str) -> bool {
    matches
        .get_one::<String>(id)
        .is_some_and(|value| is_truthy(value))
}

/// Extract TLS overrides, kept raw for the derivation step
fn extract_tls_overrides(matches: &ArgMatches) -> TlsOverrides {
    TlsOverrides {
        enable: string(matches, "ssl"),
        reject_unauthorized: string(matches, "ssl-reject-unauthorized"),
        ca: string(matches, "ssl-ca"),
        ca_base64: string(matches, "ssl-ca-base64"),
    }
}

/// Convert `ArgMatches` into typed Action enum with validation
///
/// Nothing here fails on a missing or malformed `DATABASE_URL`: that is
/// reported by the pipeline itself so the skip switch can still win.
///
/// # Errors
///
/// Returns an error if the output format is unknown
pub fn dispatch(matches: &ArgMatches) -> Result<Action> {
    let format = matches
        .get_one::<String>("format")
        .map(|format| format.parse::<OutputFormat>())
        .transpose()
        .map_err(|e| anyhow!(e))?
        .unwrap_or_default();

    let config = Config {
        database_url: string(matches, "database-url"),
        cache_url: string(matches, "cache-url"),
        skip_all: flag(matches, "skip"),
        skip_migrations: flag(matches, "skip-migrations"),
        tls: extract_tls_overrides(matches),
        tls_debug: flag(matches, "ssl-debug"),
        min_version: matches
            .get_one::<ServerVersion>("min-version")
            .copied()
            .unwrap_or(DEFAULT_MIN_VERSION),
        migrate_cmd: string(matches, "migrate-cmd").unwrap_or_else(|| DEFAULT_MIGRATE_CMD.into()),
        format,
        timeout: matches.get_one::<u64>("timeout").copied(),
    };

    Ok(Action::Preflight { config })
}
