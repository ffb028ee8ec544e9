use std::{
    fmt::{Display, Formatter, Result as FmtResult, Write},
    slice::Iter,
    str::FromStr,
};

use chumsky::prelude::*;

use super::parsers;
use crate::{
    address::{Address, AddressError},
    message::utf8_b,
};

/// Represents an email address with an optional name for the sender/recipient.
///
/// This type contains email address and the sender/recipient name (_Some Name \<user@domain.tld\>_ or _withoutname@domain.tld_).
///
/// # Examples
///
/// ```
/// # use msgraph_mailer::message::Mailbox;
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let mailbox: Mailbox = "John Smith <example@email.com>".parse()?;
/// assert_eq!(mailbox.name.as_deref(), Some("John Smith"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Mailbox {
    /// The name associated with the address.
    pub name: Option<String>,

    /// The email address itself.
    pub email: Address,
}

impl Mailbox {
    /// Creates a new `Mailbox` using an email address and the name of the recipient if there is one.
    pub fn new(name: Option<String>, email: Address) -> Self {
        Mailbox { name, email }
    }

    /// The display name, trimmed, if there is a non empty one
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Header form of the mailbox, non-ascii names become encoded words
    pub(crate) fn encoded(&self) -> String {
        match self.display_name() {
            Some(name) if !name.is_ascii() => {
                let name = utf8_b::encode(name).replace("\r\n ", " ");
                format!("{name} <{}>", self.email)
            }
            _ => self.to_string(),
        }
    }
}

impl Display for Mailbox {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.display_name() {
            Some(name) => {
                write_word(f, name)?;
                f.write_str(" <")?;
                self.email.fmt(f)?;
                f.write_char('>')
            }
            None => self.email.fmt(f),
        }
    }
}

impl<S: Into<String>, T: Into<String>> TryFrom<(S, T)> for Mailbox {
    type Error = AddressError;

    fn try_from(header: (S, T)) -> Result<Self, Self::Error> {
        let (name, address) = header;
        Ok(Mailbox::new(Some(name.into()), address.into().parse()?))
    }
}

impl FromStr for Mailbox {
    type Err = AddressError;

    fn from_str(src: &str) -> Result<Mailbox, Self::Err> {
        let (name, (user, domain)) = parsers::mailbox()
            .parse(src)
            .map_err(|_errs| AddressError::InvalidInput)?;
        Ok(Mailbox::new(name, Address::new(user, domain)?))
    }
}

impl From<Address> for Mailbox {
    fn from(value: Address) -> Self {
        Self::new(None, value)
    }
}

/// Represents a sequence of [`Mailbox`] instances.
///
/// This type contains a sequence of mailboxes (_Some Name \<user@domain.tld\>, Another Name \<other@domain.tld\>, withoutname@domain.tld, ..._).
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Mailboxes(Vec<Mailbox>);

impl Mailboxes {
    /// Creates a new, empty list of [`Mailbox`] instances.
    pub fn new() -> Self {
        Mailboxes(Vec::new())
    }

    /// Adds a new [`Mailbox`] to the list, in a builder style pattern.
    ///
    /// ```
    /// use msgraph_mailer::message::Mailboxes;
    ///
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// let mailboxes = Mailboxes::new()
    ///     .with("john@example.com".parse()?)
    ///     .with("Jane <jane@example.com>".parse()?);
    /// assert_eq!(mailboxes.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn with(mut self, mbox: Mailbox) -> Self {
        self.0.push(mbox);
        self
    }

    /// Adds a new [`Mailbox`] to the list, in a Vec::push style pattern.
    pub fn push(&mut self, mbox: Mailbox) {
        self.0.push(mbox);
    }

    /// Extracts the first [`Mailbox`] if it exists.
    pub fn into_single(self) -> Option<Mailbox> {
        self.into()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Creates an iterator over the [`Mailbox`] instances that are currently stored.
    pub fn iter(&self) -> Iter<'_, Mailbox> {
        self.0.iter()
    }

    pub(crate) fn encoded(&self) -> String {
        self.iter()
            .map(Mailbox::encoded)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for Mailboxes {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Mailbox> for Mailboxes {
    fn from(mailbox: Mailbox) -> Self {
        Mailboxes(vec![mailbox])
    }
}

impl From<Mailboxes> for Option<Mailbox> {
    fn from(mailboxes: Mailboxes) -> Option<Mailbox> {
        mailboxes.into_iter().next()
    }
}

impl From<Vec<Mailbox>> for Mailboxes {
    fn from(vec: Vec<Mailbox>) -> Self {
        Mailboxes(vec)
    }
}

impl From<Mailboxes> for Vec<Mailbox> {
    fn from(mailboxes: Mailboxes) -> Vec<Mailbox> {
        mailboxes.0
    }
}

impl FromIterator<Mailbox> for Mailboxes {
    fn from_iter<T: IntoIterator<Item = Mailbox>>(iter: T) -> Self {
        Self(Vec::from_iter(iter))
    }
}

impl Extend<Mailbox> for Mailboxes {
    fn extend<T: IntoIterator<Item = Mailbox>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Mailboxes {
    type Item = Mailbox;
    type IntoIter = ::std::vec::IntoIter<Mailbox>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mailboxes {
    type Item = &'a Mailbox;
    type IntoIter = Iter<'a, Mailbox>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for Mailboxes {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut iter = self.iter();

        if let Some(mbox) = iter.next() {
            mbox.fmt(f)?;

            for mbox in iter {
                f.write_str(", ")?;
                mbox.fmt(f)?;
            }
        }

        Ok(())
    }
}

impl FromStr for Mailboxes {
    type Err = AddressError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        parsers::mailbox_list()
            .parse(src)
            .map_err(|_errs| AddressError::InvalidInput)?
            .into_iter()
            .map(|(name, (user, domain))| {
                Address::new(user, domain).map(|email| Mailbox::new(name, email))
            })
            .collect()
    }
}

// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.6
fn write_word(f: &mut Formatter<'_>, s: &str) -> FmtResult {
    if s.bytes().all(is_valid_atom_char) {
        f.write_str(s)
    } else {
        // Quoted string: https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.5
        f.write_char('"')?;
        for c in s.chars() {
            if matches!(c, '"' | '\\') {
                f.write_char('\\')?;
            }
            if !matches!(c, '\r' | '\n') {
                f.write_char(c)?;
            }
        }
        f.write_char('"')
    }
}

// https://datatracker.ietf.org/doc/html/rfc2822#section-3.2.4
fn is_valid_atom_char(c: u8) -> bool {
    matches!(c,
        // Not really allowed but can be inserted between atoms.
        b'\t' | b' ' |

        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'/' |
        b'0'..=b'9' |
        b'=' | b'?' |
        b'A'..=b'Z' |
        b'^' | b'_' | b'`' |
        b'a'..=b'z' |
        b'{' | b'|' | b'}' | b'~' |

        // Encoded separately as RFC 2047 words.
        128..=255)
}
