//! Headers widely used in email messages

use std::{
    borrow::Cow,
    error::Error as StdError,
    fmt::{self, Display, Formatter},
    ops::Deref,
};

pub use self::{content::*, date::*, mailbox::*, special::*, textual::*};
use crate::{message::utf8_b, BoxError};

mod content;
mod date;
mod mailbox;
mod special;
mod textual;

/// Represents an email header
///
/// Email header as defined in [RFC5322](https://datatracker.ietf.org/doc/html/rfc5322) and extensions.
pub trait Header: Clone {
    fn name() -> HeaderName;

    fn parse(s: &str) -> Result<Self, BoxError>;

    fn display(&self) -> HeaderValue;
}

/// A set of email headers
///
/// A header name may appear more than once: [`Headers::set`] replaces every
/// instance while [`Headers::append`] adds one more.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    headers: Vec<HeaderValue>,
}

impl Headers {
    /// Create an empty `Headers`
    #[inline]
    pub const fn new() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    /// Returns a copy of the first `Header` of type `H`, if it is present
    /// and can be parsed
    pub fn get<H: Header>(&self) -> Option<H> {
        self.get_raw(&H::name())
            .and_then(|raw_value| H::parse(raw_value).ok())
    }

    /// Returns `true` if a header named like `H` is present
    pub fn has<H: Header>(&self) -> bool {
        self.find_header_index(&H::name()).is_some()
    }

    /// Sets `Header` of type `H`, replacing every instance already present
    pub fn set<H: Header>(&mut self, header: H) {
        self.set_raw(header.display());
    }

    /// Adds another instance of `Header` of type `H`
    pub fn append<H: Header>(&mut self, header: H) {
        self.append_raw(header.display());
    }

    /// Removes every instance of `Header` of type `H`, returning the first one
    pub fn remove<H: Header>(&mut self) -> Option<H> {
        self.remove_raw(&H::name())
            .and_then(|value| H::parse(&value.raw_value).ok())
    }

    /// Returns the raw value of the first header named `name`
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.find_header_index(name)
            .map(|i| self.headers[i].raw_value.as_str())
    }

    /// Returns the raw values of every header named `name`, in order
    pub fn get_all_raw<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |value| value.name.eq_ignore_ascii_case(name))
            .map(|value| value.raw_value.as_str())
    }

    /// Adds a raw header, keeping the instances already present
    pub fn append_raw(&mut self, value: HeaderValue) {
        self.headers.push(value);
    }

    /// Sets a raw header, replacing every instance already present
    pub fn set_raw(&mut self, value: HeaderValue) {
        match self.find_header_index(&value.name) {
            Some(i) => {
                let name = value.name.clone();
                self.headers[i] = value;
                let mut index = 0;
                self.headers.retain(|header| {
                    let keep = index <= i || !header.name.eq_ignore_ascii_case(&name);
                    index += 1;
                    keep
                });
            }
            None => self.headers.push(value),
        }
    }

    /// Removes every header named `name`, returning the first one
    pub fn remove_raw(&mut self, name: &str) -> Option<HeaderValue> {
        let first = self.find_header_index(name).map(|i| self.headers.remove(i));
        if first.is_some() {
            self.headers
                .retain(|header| !header.name.eq_ignore_ascii_case(name));
        }
        first
    }

    /// Iterates over every header, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &HeaderValue> {
        self.headers.iter()
    }

    fn find_header_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|value| value.name.eq_ignore_ascii_case(name))
    }
}

impl Display for Headers {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for value in &self.headers {
            Display::fmt(value, f)?;
        }

        Ok(())
    }
}

/// A possible error when converting a `HeaderName` from another type.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct InvalidHeaderName;

impl StdError for InvalidHeaderName {}

impl Display for InvalidHeaderName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid header name")
    }
}

/// A valid header name
#[derive(Debug, Clone)]
pub struct HeaderName(Cow<'static, str>);

impl HeaderName {
    /// Creates a new header name
    pub fn new_from_ascii(ascii: String) -> Result<Self, InvalidHeaderName> {
        if !ascii.is_empty()
            && ascii.len() <= 76
            && ascii.bytes().all(|c| c.is_ascii_graphic() && c != b':')
        {
            Ok(Self(Cow::Owned(ascii)))
        } else {
            Err(InvalidHeaderName)
        }
    }

    /// Creates a new header name, panics on invalid name
    pub const fn new_from_ascii_str(ascii: &'static str) -> Self {
        macro_rules! static_assert {
            ($condition:expr) => {
                let _ = [()][(!($condition)) as usize];
            };
        }

        static_assert!(!ascii.is_empty());
        static_assert!(ascii.len() <= 76);

        let bytes = ascii.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            static_assert!(bytes[i].is_ascii_graphic());
            static_assert!(bytes[i] != b':');
            i += 1;
        }

        Self(Cow::Borrowed(ascii))
    }
}

impl Display for HeaderName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl Deref for HeaderName {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for HeaderName {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<HeaderName> for HeaderName {
    fn eq(&self, other: &HeaderName) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for HeaderName {
    fn eq(&self, other: &&str) -> bool {
        self.eq_ignore_ascii_case(other)
    }
}

/// A header value, kept both as written and as encoded for the wire
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderValue {
    name: HeaderName,
    raw_value: String,
    encoded_value: String,
}

impl HeaderValue {
    /// Creates a header value, encoding non-ascii text as RFC 2047 encoded words
    pub fn new(name: HeaderName, raw_value: String) -> Self {
        let encoded_value = utf8_b::encode(&raw_value);

        Self::dangerous_new_pre_encoded(name, raw_value, encoded_value)
    }

    /// Creates a header value from an already encoded form
    ///
    /// `encoded_value` is written to the wire as is.
    pub fn dangerous_new_pre_encoded(
        name: HeaderName,
        raw_value: String,
        encoded_value: String,
    ) -> Self {
        Self {
            name,
            raw_value,
            encoded_value,
        }
    }

    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    pub fn get_raw(&self) -> &str {
        &self.raw_value
    }

    pub fn get_encoded(&self) -> &str {
        &self.encoded_value
    }
}

impl Display for HeaderValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}\r\n", self.name, self.encoded_value)
    }
}
