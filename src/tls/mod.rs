//! TLS settings for the database connection
//!
//! The settings come from two places: hints in the connection URL (`ssl`,
//! `sslmode`) and environment overrides (`DATABASE_SSL*`). Derivation is pure,
//! nothing here touches the network or the filesystem.
//!
//! # Module Organization
//!
//! - `config` - TLS modes, derived options and raw overrides
//! - `derive` - mapping of URL hints and overrides to [`TlsOptions`]
//! - `pem` - CA material decoding and inspection
//!
//! # Example
//!
//! ```rust,ignore
//! use dbpreflight::{descriptor::ConnectionDescriptor, tls::{TlsOverrides, derive_tls}};
//!
//! let descriptor = ConnectionDescriptor::parse("postgres://db/app?sslmode=require")?;
//! let tls = derive_tls(&descriptor, &TlsOverrides::default());
//! assert!(tls.is_some_and(|tls| !tls.verify));
//! ```

pub mod config;
pub mod derive;
pub mod pem;

pub use config::{TlsMode, TlsOptions, TlsOverrides};
pub use derive::{derive_tls, describe};
