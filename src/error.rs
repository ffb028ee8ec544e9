//! Error type for email messages

use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
};

use crate::address::AddressError;

/// Error type for email content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Missing from in envelope
    MissingFrom,
    /// Missing to in envelope
    MissingTo,
    /// Can only be one from in envelope
    TooManyFrom,
    /// Invalid email address
    Address(AddressError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingFrom => f.write_str("missing source address, invalid envelope"),
            Error::MissingTo => f.write_str("missing destination address, invalid envelope"),
            Error::TooManyFrom => f.write_str("there can only be one source address"),
            Error::Address(e) => write!(f, "invalid email address: {e}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Address(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AddressError> for Error {
    fn from(err: AddressError) -> Error {
        Error::Address(err)
    }
}
