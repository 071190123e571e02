pub mod checks;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod envs;
pub mod errors;
pub mod migrate;
pub mod pipeline;
pub mod queries;
pub mod report;
pub mod telemetry;
pub mod tls;
pub mod version;
