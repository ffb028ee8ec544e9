use super::{Header, HeaderName, HeaderValue};
use crate::BoxError;

macro_rules! text_header {
    ($(#[$attr:meta])* Header($type: ident, $name: expr )) => {
        #[derive(Debug, Clone, PartialEq)]
        $(#[$attr])*
        pub struct $type(String);

        impl Header for $type {
            fn name() -> HeaderName {
                HeaderName::new_from_ascii_str($name)
            }

            fn parse(s: &str) -> Result<Self, BoxError> {
                Ok(Self(s.into()))
            }

            fn display(&self) -> HeaderValue {
                HeaderValue::new(Self::name(), self.0.clone())
            }
        }

        impl From<String> for $type {
            #[inline]
            fn from(text: String) -> Self {
                Self(text)
            }
        }

        impl AsRef<str> for $type {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

text_header!(
    /// `Subject` of the message, defined in [RFC5322](https://tools.ietf.org/html/rfc5322#section-3.6.5)
    Header(Subject, "Subject")
);
text_header!(
    /// `Message-ID` header. Contains a unique message identifier,
    /// defined in [RFC5322](https://tools.ietf.org/html/rfc5322#section-3.6.4)
    Header(MessageId, "Message-ID")
);
text_header!(
    /// `User-Agent` header. Contains information about the client,
    /// defined in [draft-melnikov-email-user-agent-00](https://tools.ietf.org/html/draft-melnikov-email-user-agent-00#section-3)
    Header(UserAgent, "User-Agent")
);
text_header! {
    /// `Content-ID` header,
    /// defined in [RFC2045](https://tools.ietf.org/html/rfc2045#section-7)
    Header(ContentId, "Content-ID")
}

impl ContentId {
    /// The identifier without its surrounding angle brackets
    pub fn id(&self) -> &str {
        let id = self.0.trim();
        id.strip_prefix('<')
            .and_then(|id| id.strip_suffix('>'))
            .unwrap_or(id)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{ContentId, Subject};
    use crate::message::header::{HeaderName, HeaderValue, Headers};

    #[test]
    fn format_ascii() {
        let mut headers = Headers::new();
        headers.set(Subject::from(String::from("Sample subject")));

        assert_eq!(format!("{}", headers), "Subject: Sample subject\r\n");
    }

    #[test]
    fn format_utf8() {
        let mut headers = Headers::new();
        headers.set(Subject::from(String::from("Тема сообщения")));

        assert_eq!(
            format!("{}", headers),
            "Subject: =?utf-8?b?0KLQtdC80LAg0YHQvtC+0LHRidC10L3QuNGP?=\r\n"
        );
    }

    #[test]
    fn parse_utf8() {
        let mut headers = Headers::new();
        headers.set_raw(HeaderValue::new(
            HeaderName::new_from_ascii_str("Subject"),
            "Тема сообщения".into(),
        ));

        assert_eq!(
            headers.get::<Subject>(),
            Some(Subject("Тема сообщения".into()))
        );
    }

    #[test]
    fn parse_keeps_encoded_word_like_text() {
        for text in ["Syntax is =?utf-8?b?SGk=?= ok", "Broken =?utf-8?b?!!?= word"] {
            let mut headers = Headers::new();
            headers.set(Subject::from(text.to_owned()));

            assert_eq!(headers.get::<Subject>(), Some(Subject(text.into())));
        }
    }

    #[test]
    fn content_id_without_brackets() {
        assert_eq!(ContentId::from("<logo@example>".to_owned()).id(), "logo@example");
        assert_eq!(ContentId::from("logo".to_owned()).id(), "logo");
    }
}
