//! Error and result type for the Microsoft Graph transport

use std::{error::Error as StdError, fmt};

use crate::BoxError;

/// The Errors that may occur when sending an email through Microsoft Graph
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    source: Option<BoxError>,
}

impl Error {
    pub(crate) fn new<E>(kind: Kind, source: Option<E>) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            inner: Box::new(Inner {
                kind,
                source: source.map(Into::into),
            }),
        }
    }

    /// Returns true if the message can't be sent through Graph as it is
    pub fn is_invalid_input(&self) -> bool {
        matches!(self.inner.kind, Kind::InvalidInput)
    }

    /// Returns true if the message contains a part Graph can't represent
    pub fn is_unsupported_part(&self) -> bool {
        matches!(self.inner.kind, Kind::UnsupportedPart)
    }

    /// Returns true if the connection URL is not a `msft+graph` one
    pub fn is_unsupported_scheme(&self) -> bool {
        matches!(self.inner.kind, Kind::UnsupportedScheme)
    }

    /// Returns true if the connection URL is malformed or incomplete
    pub fn is_dsn(&self) -> bool {
        matches!(self.inner.kind, Kind::Dsn)
    }

    /// Returns true if no access token could be obtained
    pub fn is_authentication(&self) -> bool {
        matches!(self.inner.kind, Kind::Authentication)
    }

    /// Returns true if the request didn't get a response
    pub fn is_network(&self) -> bool {
        matches!(self.inner.kind, Kind::Network)
    }

    /// Returns true if the Graph API answered with an error
    pub fn is_transport_failure(&self) -> bool {
        matches!(self.inner.kind, Kind::TransportFailure { .. })
    }

    /// Returns true if the error is caused by a timeout
    pub fn is_timeout(&self) -> bool {
        let mut source = self.source();

        while let Some(err) = source {
            if let Some(err) = err.downcast_ref::<reqwest::Error>() {
                return err.is_timeout();
            }

            source = err.source();
        }

        false
    }

    /// Returns the HTTP status, if the error was generated from a response
    pub fn status(&self) -> Option<u16> {
        match self.inner.kind {
            Kind::TransportFailure { status, .. } => Some(status),
            _ => None,
        }
    }

    /// Returns the Graph error code, like `ErrorInvalidRecipients`, if the
    /// response carried one
    pub fn code(&self) -> Option<&str> {
        match &self.inner.kind {
            Kind::TransportFailure { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub(crate) enum Kind {
    /// The message can't be turned into a Graph request
    InvalidInput,
    /// A body part of a type Graph has no representation for
    UnsupportedPart,
    /// Connection URL with another scheme than `msft+graph`
    UnsupportedScheme,
    /// Malformed or incomplete connection URL
    Dsn,
    /// Token acquisition failure
    Authentication,
    /// Underlying HTTP error
    Network,
    /// Request body serialization failure
    Serialization,
    /// Non-success response from Graph
    TransportFailure { status: u16, code: Option<String> },
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("msgraph_mailer::transport::graph::Error");

        builder.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            builder.field("source", source);
        }

        builder.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.kind {
            Kind::InvalidInput => f.write_str("invalid input")?,
            Kind::UnsupportedPart => f.write_str("unsupported body part")?,
            Kind::UnsupportedScheme => f.write_str("unsupported scheme")?,
            Kind::Dsn => f.write_str("invalid connection url")?,
            Kind::Authentication => f.write_str("authentication error")?,
            Kind::Network => f.write_str("network error")?,
            Kind::Serialization => f.write_str("serialization error")?,
            Kind::TransportFailure { status, ref code } => {
                write!(f, "MSFT Graph API error ({status}")?;
                if let Some(code) = code {
                    write!(f, ", {code}")?;
                }
                f.write_str(")")?;
            }
        };

        if let Some(ref e) = self.inner.source {
            write!(f, ": {e}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| {
            let r: &(dyn std::error::Error + 'static) = &**e;
            r
        })
    }
}

pub(crate) fn invalid_input<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::InvalidInput, Some(e))
}

pub(crate) fn unsupported_part<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::UnsupportedPart, Some(e))
}

pub(crate) fn unsupported_scheme<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::UnsupportedScheme, Some(e))
}

pub(crate) fn dsn<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Dsn, Some(e))
}

pub(crate) fn authentication<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Authentication, Some(e))
}

pub(crate) fn network<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Network, Some(e))
}

pub(crate) fn serialization<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Serialization, Some(e))
}

pub(crate) fn transport_failure(status: u16, code: Option<String>, message: String) -> Error {
    Error::new(Kind::TransportFailure { status, code }, Some(message))
}
