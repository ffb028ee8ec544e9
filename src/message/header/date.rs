use std::time::SystemTime;

use httpdate::HttpDate;

use super::{Header, HeaderName, HeaderValue};
use crate::BoxError;

/// Message `Date` header
///
/// Defined in [RFC2822](https://tools.ietf.org/html/rfc2822#section-3.3)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Date(HttpDate);

impl Date {
    /// Build a `Date` from [`SystemTime`]
    pub fn new(st: SystemTime) -> Self {
        Self(st.into())
    }

    /// Get the current date
    pub fn now() -> Self {
        Self::new(SystemTime::now())
    }
}

impl Header for Date {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Date")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        let s = s.trim();
        // httpdate only understands the obsolete ` GMT` zone
        let date = match s.strip_suffix("-0000") {
            Some(date) => format!("{date}GMT").parse::<HttpDate>()?,
            None => s.parse::<HttpDate>()?,
        };

        Ok(Self(date))
    }

    fn display(&self) -> HeaderValue {
        let date = self.0.to_string();
        let date = match date.strip_suffix("GMT") {
            Some(date) => format!("{date}-0000"),
            None => date,
        };

        HeaderValue::new(Self::name(), date)
    }
}

impl From<SystemTime> for Date {
    fn from(st: SystemTime) -> Self {
        Self::new(st)
    }
}

impl From<Date> for SystemTime {
    fn from(this: Date) -> SystemTime {
        this.0.into()
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, SystemTime};

    use pretty_assertions::assert_eq;

    use super::Date;
    use crate::message::header::{Header, Headers};

    #[test]
    fn format_date() {
        let mut headers = Headers::new();
        headers.set(Date::new(
            SystemTime::UNIX_EPOCH + Duration::from_secs(784887151),
        ));

        assert_eq!(
            headers.to_string(),
            "Date: Tue, 15 Nov 1994 08:12:31 -0000\r\n"
        );
    }

    #[test]
    fn parse_date() {
        let expected = Date::new(SystemTime::UNIX_EPOCH + Duration::from_secs(784887151));

        assert_eq!(Date::parse("Tue, 15 Nov 1994 08:12:31 -0000").unwrap(), expected);
        assert_eq!(Date::parse("Tue, 15 Nov 1994 08:12:31 GMT").unwrap(), expected);
    }
}
