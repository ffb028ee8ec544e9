//! Connection URLs
//!
//! A Graph transport is described by
//! `msft+graph://<client id>:<client secret>@<host>?tenant=<tenant>&saveToSent=<bool>`.
//! The client id and secret must be percent-encoded. `default` as host
//! targets `graph.microsoft.com`.

use std::{borrow::Cow, fmt, str::FromStr, sync::Arc};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use super::{
    credentials::ClientSecretCredential,
    error::{self, Error},
    GraphTransport,
};

/// Host selecting the public Graph endpoint
pub const DEFAULT_HOST: &str = "default";

/// Characters escaped in the user and query values written back to a
/// connection URL
pub(super) const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A parsed connection URL
#[derive(Clone, PartialEq, Eq)]
pub struct Dsn {
    scheme: String,
    host: String,
    user: Option<String>,
    password: Option<String>,
    port: Option<u16>,
    options: Vec<(String, String)>,
}

impl Dsn {
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Percent-decoded user
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Percent-decoded password
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Value of the first `name` query parameter
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl FromStr for Dsn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s).map_err(error::dsn)?;

        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| error::dsn("host undefined"))?;

        let percent_decode = |s: &str| {
            percent_encoding::percent_decode_str(s)
                .decode_utf8()
                .map(Cow::into_owned)
                .map_err(error::dsn)
        };

        let user = match url.username() {
            "" => None,
            user => Some(percent_decode(user)?),
        };
        let password = url.password().map(percent_decode).transpose()?;

        Ok(Dsn {
            scheme: url.scheme().to_owned(),
            host: host.to_owned(),
            user,
            password,
            port: url.port(),
            options: url.query_pairs().into_owned().collect(),
        })
    }
}

impl fmt::Debug for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dsn")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("port", &self.port)
            .field("options", &self.options)
            .finish()
    }
}

/// Creates [`GraphTransport`]s from connection URLs
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphTransportFactory;

impl GraphTransportFactory {
    /// Scheme of the connection URLs handled by this factory
    pub const SCHEME: &'static str = "msft+graph";

    /// Whether [`create`](Self::create) can handle `dsn`
    pub fn supports(&self, dsn: &Dsn) -> bool {
        dsn.scheme() == Self::SCHEME
    }

    /// Creates a transport authenticating with the client credentials found
    /// in `dsn`
    pub fn create(&self, dsn: &Dsn) -> Result<GraphTransport, Error> {
        if !self.supports(dsn) {
            return Err(error::unsupported_scheme(format!(
                "the \"{}\" scheme is not supported, use \"{}\"",
                dsn.scheme(),
                Self::SCHEME
            )));
        }

        let tenant = dsn
            .option("tenant")
            .filter(|tenant| !tenant.is_empty())
            .ok_or_else(|| error::dsn("missing tenant option"))?;
        let client_id = dsn
            .user()
            .ok_or_else(|| error::dsn("missing client id"))?;
        let client_secret = dsn
            .password()
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| error::dsn("missing client secret"))?;

        let credential = ClientSecretCredential::new(
            tenant.to_owned(),
            client_id.to_owned(),
            client_secret.to_owned(),
        );

        let mut builder = GraphTransport::builder(Arc::new(credential))
            .save_to_sent(dsn.option("saveToSent").map_or(true, parse_bool));

        if dsn.host() != DEFAULT_HOST {
            let authority = match dsn.port() {
                Some(port) => format!("{}:{port}", dsn.host()),
                None => dsn.host().to_owned(),
            };
            let base_url = Url::parse(&format!("https://{authority}/v1.0")).map_err(error::dsn)?;
            builder = builder.base_url(base_url);
        }

        builder.build()
    }
}

fn parse_bool(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
