//! Representation of an email address

use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
    net::IpAddr,
    str::FromStr,
};

use email_address::EmailAddress;
use idna::domain_to_ascii;

/// An email address in canonical form (_user@domain.tld_).
///
/// Used both for message recipients and for the mailbox a message is sent
/// from, which Microsoft Graph addresses by user principal name.
///
/// ```
/// use msgraph_mailer::Address;
///
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let address = "user@email.com".parse::<Address>()?;
/// assert_eq!(address.user(), "user");
/// assert_eq!(address.domain(), "email.com");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Address {
    serialized: String,
    /// Byte offset of the '@'
    at: usize,
}

impl Address {
    /// Creates a new email address from a user and domain.
    pub fn new<U: AsRef<str>, D: AsRef<str>>(user: U, domain: D) -> Result<Self, AddressError> {
        let (user, domain) = (user.as_ref(), domain.as_ref());
        Self::check_user(user)?;
        Self::check_domain(domain)?;

        Ok(Address {
            serialized: format!("{user}@{domain}"),
            at: user.len(),
        })
    }

    /// The part before the `@`
    pub fn user(&self) -> &str {
        &self.serialized[..self.at]
    }

    /// The part after the `@`
    pub fn domain(&self) -> &str {
        &self.serialized[self.at + 1..]
    }

    fn check_user(user: &str) -> Result<(), AddressError> {
        if EmailAddress::is_valid_local_part(user) {
            Ok(())
        } else {
            Err(AddressError::InvalidUser)
        }
    }

    fn check_domain(domain: &str) -> Result<(), AddressError> {
        Self::check_domain_ascii(domain).or_else(|_| {
            // internationalized domain names are validated in their punycode form
            domain_to_ascii(domain)
                .map_err(|_| AddressError::InvalidDomain)
                .and_then(|ascii| Self::check_domain_ascii(&ascii))
        })
    }

    fn check_domain_ascii(domain: &str) -> Result<(), AddressError> {
        if EmailAddress::is_valid_domain(domain) {
            return Ok(());
        }

        let ip = domain
            .strip_prefix('[')
            .and_then(|ip| ip.strip_suffix(']'))
            .unwrap_or(domain);
        if ip.parse::<IpAddr>().is_ok() {
            return Ok(());
        }

        Err(AddressError::InvalidDomain)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.serialized)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(val: &str) -> Result<Self, AddressError> {
        let (user, domain) = val.rsplit_once('@').ok_or(AddressError::MissingParts)?;
        if user.is_empty() || domain.is_empty() {
            return Err(AddressError::MissingParts);
        }
        Address::new(user, domain)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(serialized: String) -> Result<Self, AddressError> {
        serialized.parse()
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.serialized
    }
}

/// Errors in email addresses parsing
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum AddressError {
    /// Missing domain or user
    MissingParts,
    /// Unbalanced angle bracket or quote
    Unbalanced,
    /// Invalid email user
    InvalidUser,
    /// Invalid email domain
    InvalidDomain,
    /// Invalid input found
    InvalidInput,
}

impl Error for AddressError {}

impl Display for AddressError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AddressError::MissingParts => f.write_str("Missing domain or user"),
            AddressError::Unbalanced => f.write_str("Unbalanced angle bracket or quote"),
            AddressError::InvalidUser => f.write_str("Invalid email user"),
            AddressError::InvalidDomain => f.write_str("Invalid email domain"),
            AddressError::InvalidInput => f.write_str("Invalid input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_and_new_agree() {
        let parsed = Address::from_str("alerts@contoso.onmicrosoft.com").unwrap();
        let built = Address::new("alerts", "contoso.onmicrosoft.com").unwrap();
        assert_eq!(parsed, built);
        assert_eq!(parsed.user(), "alerts");
        assert_eq!(parsed.domain(), "contoso.onmicrosoft.com");
    }

    #[test]
    fn ip_literal_domain() {
        let addr = Address::from_str("postmaster@[2606:4700:4700::1111]").unwrap();
        assert_eq!(addr.domain(), "[2606:4700:4700::1111]");
        assert!(Address::from_str("postmaster@1.1.1.1").is_ok());
    }

    #[test]
    fn internationalized_domain() {
        let addr = Address::from_str("info@bücher.example").unwrap();
        assert_eq!(addr.domain(), "bücher.example");
    }

    #[test]
    fn missing_parts() {
        assert_eq!(
            Address::from_str("no-at-sign.example.com"),
            Err(AddressError::MissingParts)
        );
        assert_eq!(
            Address::from_str("@example.com"),
            Err(AddressError::MissingParts)
        );
        assert_eq!(Address::from_str("user@"), Err(AddressError::MissingParts));
    }

    #[test]
    fn invalid_parts() {
        assert_eq!(
            Address::new("a".repeat(100), "example.com"),
            Err(AddressError::InvalidUser)
        );
        assert_eq!(
            Address::new("user", format!("{}.com", "a".repeat(100))),
            Err(AddressError::InvalidDomain)
        );
    }
}
