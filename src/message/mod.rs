//! Provides a strongly typed way to build emails
//!
//! ## Usage
//!
//! This section demonstrates how to build messages.
//!
//! ### Plain body
//!
//! The easiest way of creating a message, which uses a plain text body.
//!
//! ```rust
//! use msgraph_mailer::message::Message;
//!
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let m = Message::builder()
//!     .from("NoBody <nobody@domain.tld>".parse()?)
//!     .reply_to("Yuin <yuin@domain.tld>".parse()?)
//!     .to("Hei <hei@domain.tld>".parse()?)
//!     .subject("Happy new year")
//!     .body(String::from("Be happy!"))?;
//! # Ok(())
//! # }
//! ```
//!
//! The unicode header data is encoded using _UTF8-Base64_ encoding, when necessary.
//!
//! The `Content-Transfer-Encoding` is chosen based on the best encoding
//! available for the given body, between `7bit`, `quoted-printable` and `base64`.
//! It only matters when the message is [formatted](Message::formatted): the
//! Graph transport reads the body content as it was given.
//!
//! ### Plain and HTML body
//!
//! Uses a MIME body to include both plain text and HTML versions of the body.
//! Microsoft Graph only keeps one of them, the HTML one.
//!
//! ```rust
//! # use std::error::Error;
//! use msgraph_mailer::message::{Message, MultiPart};
//!
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let m = Message::builder()
//!     .from("NoBody <nobody@domain.tld>".parse()?)
//!     .to("Hei <hei@domain.tld>".parse()?)
//!     .subject("Happy new year")
//!     .multipart(MultiPart::alternative_plain_html(
//!         String::from("Hello, world! :)"),
//!         String::from("<p><b>Hello</b>, <i>world</i>!</p>"),
//!     ))?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Complex MIME body
//!
//! This example shows how to include both plain and HTML versions of the body,
//! attachments and inlined images.
//!
//! ```rust
//! # use std::error::Error;
//! use msgraph_mailer::message::{header::ContentType, Attachment, Message, MultiPart, SinglePart};
//!
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let image = vec![0x89, b'P', b'N', b'G'];
//!
//! let m = Message::builder()
//!     .from("NoBody <nobody@domain.tld>".parse()?)
//!     .to("Hei <hei@domain.tld>".parse()?)
//!     .subject("Happy new year")
//!     .multipart(
//!         MultiPart::mixed()
//!             .multipart(
//!                 MultiPart::alternative()
//!                     .singlepart(SinglePart::plain(String::from("Hello, world! :)")))
//!                     .multipart(
//!                         MultiPart::related()
//!                             .singlepart(SinglePart::html(String::from(
//!                                 "<p><b>Hello</b>, <i>world</i>! <img src=cid:123></p>",
//!                             )))
//!                             .singlepart(
//!                                 Attachment::new_inline(String::from("123"))
//!                                     .body(image, ContentType::parse("image/png")?),
//!                             ),
//!                     ),
//!             )
//!             .singlepart(Attachment::new(String::from("example.rs")).body(
//!                 String::from("fn main() { println!(\"Hello, World!\") }"),
//!                 ContentType::TEXT_PLAIN,
//!             )),
//!     )?;
//! # Ok(())
//! # }
//! ```

pub use attachment::Attachment;
pub use body::{Body, IntoBody, MaybeString};
pub use mailbox::*;
pub use mimebody::*;

pub use mime;

mod attachment;
mod body;
pub mod header;
mod mailbox;
mod mimebody;
pub(crate) mod utf8_b;

use crate::{
    address::Envelope,
    message::header::{ContentType, Header, HeaderValue, Headers, MailboxesHeader},
    Error as EmailError,
};

/// Something that can be formatted as an email message
pub(crate) trait EmailFormat {
    fn format(&self, out: &mut Vec<u8>);
}

/// A builder for messages
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    headers: Headers,
    envelope: Option<Envelope>,
}

impl MessageBuilder {
    /// Creates a new default message builder
    pub fn new() -> Self {
        Self {
            headers: Headers::new(),
            envelope: None,
        }
    }

    /// Set custom header to message
    pub fn header<H: Header>(mut self, header: H) -> Self {
        self.headers.set(header);
        self
    }

    /// Add another instance of a header, keeping the ones already set
    pub fn append_header<H: Header>(mut self, header: H) -> Self {
        self.headers.append(header);
        self
    }

    /// Add a header as written, without checking its value
    pub fn raw_header(mut self, raw_header: HeaderValue) -> Self {
        self.headers.append_raw(raw_header);
        self
    }

    /// Add mailbox to header
    pub fn mailbox<H: Header + MailboxesHeader>(self, header: H) -> Self {
        match self.headers.get::<H>() {
            Some(mut existing) => {
                existing.join_mailboxes(header);
                self.header(existing)
            }
            None => self.header(header),
        }
    }

    /// Add `Date` header to message
    pub fn date(self, date: header::Date) -> Self {
        self.header(date)
    }

    /// Set `Date` header using current date/time
    pub fn date_now(self) -> Self {
        self.date(header::Date::now())
    }

    /// Set `Subject` header to message
    pub fn subject<S: Into<String>>(self, subject: S) -> Self {
        let s: String = subject.into();
        self.header(header::Subject::from(s))
    }

    /// Set `MIME-Version` header to 1.0
    ///
    /// Not exposed as it is set by body methods
    fn mime_1_0(self) -> Self {
        self.header(header::MIME_VERSION_1_0)
    }

    /// Set `Sender` header. Should be used when providing several `From` mailboxes.
    ///
    /// Defined in [RFC5322](https://tools.ietf.org/html/rfc5322#section-3.6.2).
    pub fn sender(self, mbox: Mailbox) -> Self {
        self.header(header::Sender::from(mbox))
    }

    /// Set or add mailbox to `From` header
    ///
    /// Defined in [RFC5322](https://tools.ietf.org/html/rfc5322#section-3.6.2).
    pub fn from(self, mbox: Mailbox) -> Self {
        self.mailbox(header::From(mbox.into()))
    }

    /// Set or add mailbox to `Reply-To` header
    pub fn reply_to(self, mbox: Mailbox) -> Self {
        self.mailbox(header::ReplyTo(mbox.into()))
    }

    /// Set or add mailbox to `To` header
    pub fn to(self, mbox: Mailbox) -> Self {
        self.mailbox(header::To(mbox.into()))
    }

    /// Set or add mailbox to `Cc` header
    pub fn cc(self, mbox: Mailbox) -> Self {
        self.mailbox(header::Cc(mbox.into()))
    }

    /// Set or add mailbox to `Bcc` header
    pub fn bcc(self, mbox: Mailbox) -> Self {
        self.mailbox(header::Bcc(mbox.into()))
    }

    /// Set [Message-ID
    /// header](https://tools.ietf.org/html/rfc5322#section-3.6.4)
    pub fn message_id(self, id: String) -> Self {
        self.header(header::MessageId::from(id))
    }

    /// Set [User-Agent
    /// header](https://tools.ietf.org/html/draft-melnikov-email-user-agent-004)
    pub fn user_agent(self, id: String) -> Self {
        self.header(header::UserAgent::from(id))
    }

    /// Force specific envelope (by default it is derived from headers)
    pub fn envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = Some(envelope);
        self
    }

    /// Create message from body
    fn build(self, body: MessageBody) -> Result<Message, EmailError> {
        // https://tools.ietf.org/html/rfc5322#section-3.6
        let res = if self.headers.has::<header::Date>() {
            self
        } else {
            self.date_now()
        };

        // Fail is missing correct originator (Sender or From)
        match res.headers.get::<header::From>() {
            Some(header::From(from)) => {
                if from.len() > 1 && !res.headers.has::<header::Sender>() {
                    return Err(EmailError::TooManyFrom);
                }
            }
            None => {
                return Err(EmailError::MissingFrom);
            }
        }

        let envelope = match res.envelope {
            Some(e) => e,
            None => Envelope::try_from(&res.headers)?,
        };
        Ok(Message {
            headers: res.headers,
            body,
            envelope,
        })
    }

    /// Create [`Message`] using a [`Vec<u8>`], [`String`], or [`Body`] body
    ///
    /// The body is typed by the `Content-Type` header set on the builder,
    /// `text/plain; charset=utf-8` when there is none.
    pub fn body<T: IntoBody>(mut self, body: T) -> Result<Message, EmailError> {
        if !self.headers.has::<ContentType>() {
            self.headers.set(ContentType::TEXT_PLAIN);
        }

        let body = body.into_body();
        self.headers.set(body.encoding());
        self.build(MessageBody::Raw(body))
    }

    /// Create message using mime body ([`MultiPart`][self::MultiPart])
    pub fn multipart(self, part: MultiPart) -> Result<Message, EmailError> {
        self.mime_1_0().build(MessageBody::Mime(Part::Multi(part)))
    }

    /// Create message using mime body ([`SinglePart`][self::SinglePart])
    pub fn singlepart(self, part: SinglePart) -> Result<Message, EmailError> {
        self.mime_1_0().build(MessageBody::Mime(Part::Single(part)))
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        MessageBuilder::new()
    }
}

/// Email message which can be formatted or handed to a [`Transport`](crate::Transport)
#[derive(Clone, Debug)]
pub struct Message {
    headers: Headers,
    body: MessageBody,
    envelope: Envelope,
}

/// The body of a [`Message`]
#[derive(Clone, Debug)]
pub enum MessageBody {
    /// A MIME part tree
    Mime(Part),
    /// A flat body, typed by the message `Content-Type` header
    Raw(Body),
}

impl Message {
    /// Create a new message builder without headers
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    /// Get the headers from the Message
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get `Message` envelope
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Get the body of the Message
    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    /// The subject as written, if the message has one
    pub fn subject(&self) -> Option<String> {
        self.headers
            .get::<header::Subject>()
            .map(|subject| subject.as_ref().to_owned())
    }

    /// Get message content formatted as RFC 5322, without the `Bcc` header
    pub fn formatted(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.format(&mut out);
        out
    }
}

impl EmailFormat for Message {
    fn format(&self, out: &mut Vec<u8>) {
        for value in self.headers.iter() {
            if value.name() != &header::Bcc::name() {
                out.extend_from_slice(value.to_string().as_bytes());
            }
        }

        match &self.body {
            MessageBody::Mime(p) => p.format(out),
            MessageBody::Raw(r) => {
                out.extend_from_slice(b"\r\n");
                out.extend_from_slice(&r.encoded());
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, SystemTime};

    use pretty_assertions::assert_eq;

    use super::{header, Mailbox, Message, MessageBody, MultiPart, Part};
    use crate::Error;

    fn date() -> header::Date {
        header::Date::new(SystemTime::UNIX_EPOCH + Duration::from_secs(784887151))
    }

    #[test]
    fn email_missing_originator() {
        assert_eq!(
            Message::builder()
                .to("NoBody <nobody@domain.tld>".parse().unwrap())
                .body(String::from("Happy new year!"))
                .unwrap_err(),
            Error::MissingFrom
        );
    }

    #[test]
    fn email_minimal_message() {
        assert!(Message::builder()
            .from("NoBody <nobody@domain.tld>".parse().unwrap())
            .to("NoBody <nobody@domain.tld>".parse().unwrap())
            .body(String::from("Happy new year!"))
            .is_ok());
    }

    #[test]
    fn email_missing_sender() {
        assert_eq!(
            Message::builder()
                .from("NoBody <nobody@domain.tld>".parse().unwrap())
                .from("AnyBody <anybody@domain.tld>".parse().unwrap())
                .to("NoBody <nobody@domain.tld>".parse().unwrap())
                .body(String::from("Happy new year!"))
                .unwrap_err(),
            Error::TooManyFrom
        );
    }

    #[test]
    fn email_missing_recipient() {
        assert_eq!(
            Message::builder()
                .from("NoBody <nobody@domain.tld>".parse().unwrap())
                .body(String::from("Happy new year!"))
                .unwrap_err(),
            Error::MissingTo
        );
    }

    #[test]
    fn email_message() {
        let email = Message::builder()
            .date(date())
            .header(header::From(
                vec![Mailbox::new(
                    Some("Каи".into()),
                    "kayo@example.com".parse().unwrap(),
                )]
                .into(),
            ))
            .header(header::To(
                vec!["Pony O.P. <pony@domain.tld>".parse().unwrap()].into(),
            ))
            .bcc("hidden@domain.tld".parse().unwrap())
            .header(header::Subject::from(String::from("яңа ел белән!")))
            .body(String::from("Happy new year!"))
            .unwrap();

        assert_eq!(
            String::from_utf8(email.formatted()).unwrap(),
            concat!(
                "Date: Tue, 15 Nov 1994 08:12:31 -0000\r\n",
                "From: =?utf-8?b?0JrQsNC4?= <kayo@example.com>\r\n",
                "To: \"Pony O.P.\" <pony@domain.tld>\r\n",
                "Subject: =?utf-8?b?0Y/So9CwINC10Lsg0LHQtdC705nQvSE=?=\r\n",
                "Content-Type: text/plain; charset=utf-8\r\n",
                "Content-Transfer-Encoding: 7bit\r\n",
                "\r\n",
                "Happy new year!"
            )
        );
        assert_eq!(email.subject().as_deref(), Some("яңа ел белән!"));
        assert_eq!(email.envelope().to().len(), 2);
    }

    #[test]
    fn email_multipart() {
        let email = Message::builder()
            .date(date())
            .from("NoBody <nobody@domain.tld>".parse().unwrap())
            .to("Hei <hei@domain.tld>".parse().unwrap())
            .multipart(
                MultiPart::alternative()
                    .boundary("boundary42")
                    .singlepart(super::SinglePart::plain(String::from("Hello"))),
            )
            .unwrap();

        assert!(matches!(email.body(), MessageBody::Mime(Part::Multi(_))));
        assert_eq!(email.subject(), None);
        assert_eq!(
            String::from_utf8(email.formatted()).unwrap(),
            concat!(
                "Date: Tue, 15 Nov 1994 08:12:31 -0000\r\n",
                "From: NoBody <nobody@domain.tld>\r\n",
                "To: Hei <hei@domain.tld>\r\n",
                "MIME-Version: 1.0\r\n",
                "Content-Type: multipart/alternative; boundary=\"boundary42\"\r\n",
                "\r\n",
                "--boundary42\r\n",
                "Content-Type: text/plain; charset=utf-8\r\n",
                "Content-Transfer-Encoding: 7bit\r\n",
                "\r\n",
                "Hello\r\n",
                "--boundary42--\r\n"
            )
        );
    }
}
