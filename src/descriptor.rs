use crate::errors::PreflightError;
use std::{borrow::Cow, fmt};
use url::{Host, Url};

/// Parsed connection URL
///
/// Built once from the raw `DATABASE_URL` and never mutated afterwards.
/// `Debug` and `Display` never reveal the password.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    scheme: String,
    host: String,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    database: String,
    params: Vec<(String, String)>,
}

impl ConnectionDescriptor {
    /// Parse a `postgres://` or `postgresql://` connection URL
    ///
    /// # Errors
    ///
    /// Returns [`PreflightError::Config`] if the input is not a well-formed URL,
    /// uses another scheme, or lacks a host or database name.
    pub fn parse(raw: &str) -> Result<Self, PreflightError> {
        let url = Url::parse(raw.trim())
            .map_err(|e| PreflightError::Config(format!("invalid connection URL: {e}")))?;

        let scheme = url.scheme().to_string();
        if !matches!(scheme.as_str(), "postgres" | "postgresql") {
            return Err(PreflightError::Config(format!(
                "unsupported connection URL scheme: {scheme}"
            )));
        }

        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => {
                return Err(PreflightError::Config(
                    "connection URL has no host".to_string(),
                ));
            }
        };

        // first path segment only, "/db/extra" is not a valid database name
        let database = url
            .path()
            .trim_start_matches('/')
            .split('/')
            .next()
            .map(|db| decode(db, "database name"))
            .transpose()?
            .filter(|db| !db.is_empty())
            .ok_or_else(|| {
                PreflightError::Config("connection URL has no database name".to_string())
            })?;

        let username = Some(url.username())
            .filter(|user| !user.is_empty())
            .map(|user| decode(user, "username"))
            .transpose()?;

        let password = url
            .password()
            .map(|password| decode(password, "password"))
            .transpose()?;

        let params = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        Ok(Self {
            scheme,
            host,
            port: url.port(),
            username,
            password,
            database,
            params,
        })
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Query parameters in the order they appear in the URL
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// First value of a query parameter
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Schema name from the `schema` query parameter
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.param("schema")
    }
}

fn decode(value: &str, field: &str) -> Result<String, PreflightError> {
    urlencoding::decode(value)
        .map(Cow::into_owned)
        .map_err(|e| PreflightError::Config(format!("invalid {field} in connection URL: {e}")))
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.scheme)?;
        if let Some(user) = &self.username {
            write!(f, "{user}")?;
            if self.password.is_some() {
                write!(f, ":****")?;
            }
            write!(f, "@")?;
        }
        if self.host.contains(':') {
            write!(f, "[{}]", self.host)?;
        } else {
            write!(f, "{}", self.host)?;
        }
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        write!(f, "/{}", self.database)
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("database", &self.database)
            .field("params", &self.params)
            .finish()
    }
}
