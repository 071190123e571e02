use anyhow::{Context, Result};
use futures::{FutureExt, future::BoxFuture};
use sqlx::{
    Connection,
    postgres::{PgConnectOptions, PgConnection, PgSslMode},
};

use super::{Connector, ServerHandle};
use crate::{
    descriptor::ConnectionDescriptor,
    tls::{TlsMode, TlsOptions},
};

const DEFAULT_PORT: u16 = 5432;

/// [`Connector`] backed by a single `sqlx` connection
#[derive(Debug, Default, Clone, Copy)]
pub struct PgConnector;

impl PgConnector {
    /// Build connect options from the descriptor and the derived TLS settings
    #[must_use]
    pub fn connect_options(
        descriptor: &ConnectionDescriptor,
        tls: Option<&TlsOptions>,
    ) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(descriptor.host())
            .port(descriptor.port().unwrap_or(DEFAULT_PORT))
            .database(descriptor.database())
            .application_name(env!("CARGO_PKG_NAME"));

        if let Some(username) = descriptor.username() {
            options = options.username(username);
        }

        if let Some(password) = descriptor.password() {
            options = options.password(password);
        }

        if let Some(schema) = descriptor.schema() {
            options = options.options([("search_path", schema)]);
        }

        let mode = descriptor
            .param("sslmode")
            .and_then(|mode| mode.parse::<TlsMode>().ok());

        // Apply TLS configuration
        match tls {
            None => options.ssl_mode(PgSslMode::Disable),
            Some(tls) if !tls.verify => options.ssl_mode(if mode == Some(TlsMode::Prefer) {
                PgSslMode::Prefer
            } else {
                PgSslMode::Require
            }),
            Some(tls) => {
                let mut opts = options.ssl_mode(if mode == Some(TlsMode::VerifyCA) {
                    PgSslMode::VerifyCa
                } else {
                    PgSslMode::VerifyFull
                });
                if let Some(ca) = &tls.ca_certificate {
                    opts = opts.ssl_root_cert_from_pem(ca.as_bytes().to_vec());
                }
                opts
            }
        }
    }
}

impl Connector for PgConnector {
    fn connect<'a>(
        &'a self,
        descriptor: &'a ConnectionDescriptor,
        tls: Option<&'a TlsOptions>,
    ) -> BoxFuture<'a, Result<Box<dyn ServerHandle>>> {
        let options = Self::connect_options(descriptor, tls);

        async move {
            let conn = PgConnection::connect_with(&options).await?;
            Ok(Box::new(PgHandle { conn }) as Box<dyn ServerHandle>)
        }
        .boxed()
    }
}

struct PgHandle {
    conn: PgConnection,
}

impl ServerHandle for PgHandle {
    fn server_version(&mut self) -> BoxFuture<'_, Result<String>> {
        async move {
            sqlx::query_scalar::<_, String>("SELECT version()")
                .fetch_one(&mut self.conn)
                .await
                .context("Failed to fetch database version")
        }
        .boxed()
    }

    fn close(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
        let Self { conn } = *self;
        async move {
            conn.close().await?;
            Ok(())
        }
        .boxed()
    }
}
