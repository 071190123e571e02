pub mod postgres;

use crate::{descriptor::ConnectionDescriptor, tls::TlsOptions};
use anyhow::Result;
use futures::future::BoxFuture;

/// Opens a connection to the database server
pub trait Connector: Send + Sync {
    /// # Errors
    ///
    /// Returns the driver error on authentication, network or TLS failures
    fn connect<'a>(
        &'a self,
        descriptor: &'a ConnectionDescriptor,
        tls: Option<&'a TlsOptions>,
    ) -> BoxFuture<'a, Result<Box<dyn ServerHandle>>>;
}

/// A live connection, owned by a single pre-flight run
pub trait ServerHandle: Send {
    /// Free-form version string as reported by the server
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    fn server_version(&mut self) -> BoxFuture<'_, Result<String>>;

    /// # Errors
    ///
    /// Returns an error if the connection could not be closed cleanly
    fn close(self: Box<Self>) -> BoxFuture<'static, Result<()>>;
}
