use super::Action;
use crate::{
    migrate::CommandMigrationRunner,
    pipeline::{Pipeline, PipelineOutcome},
    queries::postgres::PgConnector,
    report::Reporter,
};

/// Execute the action's business logic by delegating to the appropriate module
pub async fn execute(action: Action) -> anyhow::Result<PipelineOutcome> {
    match action {
        Action::Preflight { config } => {
            let mut migrator = CommandMigrationRunner::new(config.migrate_cmd.as_str());
            if let Some(url) = &config.database_url {
                migrator = migrator.env("DATABASE_URL", url.as_str());
            }

            let mut reporter = Reporter::stdout(config.format);
            let pipeline = Pipeline::new(config, Box::new(PgConnector), Box::new(migrator));

            Ok(pipeline.run(&mut reporter).await)
        }
    }
}
