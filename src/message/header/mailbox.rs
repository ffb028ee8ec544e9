use super::{Header, HeaderName, HeaderValue};
use crate::{
    message::mailbox::{Mailbox, Mailboxes},
    BoxError,
};

/// Header which can contains multiple mailboxes
pub trait MailboxesHeader {
    fn join_mailboxes(&mut self, other: Self);
}

macro_rules! mailbox_header {
    ($(#[$doc:meta])*($type_name: ident, $header_name: expr)) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $type_name(pub Mailbox);

        impl Header for $type_name {
            fn name() -> HeaderName {
                HeaderName::new_from_ascii_str($header_name)
            }

            fn parse(s: &str) -> Result<Self, BoxError> {
                let mailbox: Mailbox = s.parse()?;
                Ok(Self(mailbox))
            }

            fn display(&self) -> HeaderValue {
                HeaderValue::dangerous_new_pre_encoded(
                    Self::name(),
                    self.0.to_string(),
                    self.0.encoded(),
                )
            }
        }

        impl std::convert::From<Mailbox> for $type_name {
            #[inline]
            fn from(mailbox: Mailbox) -> Self {
                Self(mailbox)
            }
        }

        impl std::convert::From<$type_name> for Mailbox {
            #[inline]
            fn from(this: $type_name) -> Mailbox {
                this.0
            }
        }
    };
}

macro_rules! mailboxes_header {
    ($(#[$doc:meta])*($type_name: ident, $header_name: expr)) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $type_name(pub Mailboxes);

        impl MailboxesHeader for $type_name {
            fn join_mailboxes(&mut self, other: Self) {
                self.0.extend(other.0);
            }
        }

        impl Header for $type_name {
            fn name() -> HeaderName {
                HeaderName::new_from_ascii_str($header_name)
            }

            fn parse(s: &str) -> Result<Self, BoxError> {
                let mailboxes: Mailboxes = s.parse()?;
                Ok(Self(mailboxes))
            }

            fn display(&self) -> HeaderValue {
                HeaderValue::dangerous_new_pre_encoded(
                    Self::name(),
                    self.0.to_string(),
                    self.0.encoded(),
                )
            }
        }

        impl std::convert::From<Mailboxes> for $type_name {
            #[inline]
            fn from(mailboxes: Mailboxes) -> Self {
                Self(mailboxes)
            }
        }

        impl std::convert::From<$type_name> for Mailboxes {
            #[inline]
            fn from(this: $type_name) -> Mailboxes {
                this.0
            }
        }
    };
}

mailbox_header! {
    /// `Sender` header
    ///
    /// The single mailbox responsible for sending the message, when it
    /// differs from the `From` mailboxes.
    (Sender, "Sender")
}

mailboxes_header! {
    /// `From` header
    (From, "From")
}

mailboxes_header! {
    /// `Reply-To` header
    (ReplyTo, "Reply-To")
}

mailboxes_header! {
    /// `To` header
    (To, "To")
}

mailboxes_header! {
    /// `Cc` header
    (Cc, "Cc")
}

mailboxes_header! {
    /// `Bcc` header
    ///
    /// Kept on the message so transports can read it, never written out by
    /// [`Message::formatted`](crate::Message::formatted).
    (Bcc, "Bcc")
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{From, Mailbox, Mailboxes, To};
    use crate::message::header::{HeaderName, HeaderValue, Headers};

    #[test]
    fn format_single_without_name() {
        let from = Mailboxes::new().with("kayo@example.com".parse().unwrap());

        let mut headers = Headers::new();
        headers.set(From(from));

        assert_eq!(headers.to_string(), "From: kayo@example.com\r\n");
    }

    #[test]
    fn format_multi_with_name() {
        let from: Vec<Mailbox> = vec![
            "K. <kayo@example.com>".parse().unwrap(),
            "Pony P <pony@domain.tld>".parse().unwrap(),
        ];

        let mut headers = Headers::new();
        headers.set(From(from.into()));

        assert_eq!(
            headers.to_string(),
            "From: \"K.\" <kayo@example.com>, Pony P <pony@domain.tld>\r\n"
        );
    }

    #[test]
    fn format_single_with_utf8_name() {
        let from: Vec<Mailbox> = vec!["Кайо <kayo@example.com>".parse().unwrap()];

        let mut headers = Headers::new();
        headers.set(From(from.into()));

        assert_eq!(
            headers.to_string(),
            "From: =?utf-8?b?0JrQsNC50L4=?= <kayo@example.com>\r\n"
        );
    }

    #[test]
    fn parse_multi_with_name() {
        let to: Vec<Mailbox> = vec![
            "K. <kayo@example.com>".parse().unwrap(),
            "Pony P. <pony@domain.tld>".parse().unwrap(),
        ];

        let mut headers = Headers::new();
        headers.set_raw(HeaderValue::new(
            HeaderName::new_from_ascii_str("To"),
            "K. <kayo@example.com>, Pony P. <pony@domain.tld>".to_owned(),
        ));

        assert_eq!(headers.get::<To>(), Some(To(to.into())));
    }

    #[test]
    fn parse_single_with_utf8_name() {
        let from: Vec<Mailbox> = vec!["Кайо <kayo@example.com>".parse().unwrap()];

        let mut headers = Headers::new();
        headers.set_raw(HeaderValue::new(
            HeaderName::new_from_ascii_str("From"),
            "Кайо <kayo@example.com>".to_owned(),
        ));

        assert_eq!(headers.get::<From>(), Some(From(from.into())));
    }

    #[test]
    fn parse_keeps_encoded_word_like_name() {
        let mut headers = Headers::new();
        headers.set_raw(HeaderValue::new(
            HeaderName::new_from_ascii_str("From"),
            "=?utf-8?b?!!?= <kayo@example.com>".to_owned(),
        ));

        let from = headers.get::<From>().unwrap();
        let mailbox = from.0.into_single().unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("=?utf-8?b?!!?="));
    }
}
