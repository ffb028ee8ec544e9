use std::{mem, ops::Deref, str};

use crate::message::header::ContentTransferEncoding;

/// A [`Message`][super::Message] or [`SinglePart`][super::SinglePart] body.
///
/// The content is kept as given, the `Content-Transfer-Encoding` is only
/// applied by [`Body::encoded`] when the part is written out as MIME.
#[derive(Debug, Clone)]
pub struct Body {
    content: MaybeString,
    encoding: ContentTransferEncoding,
}

/// Either a `Vec<u8>` or a `String`.
///
/// If the content is valid utf-8 a `String` should be passed, as it
/// makes for a more efficient `Content-Transfer-Encoding` to be chosen.
#[derive(Debug, Clone)]
pub enum MaybeString {
    /// Binary data
    Binary(Vec<u8>),
    /// UTF-8 string
    String(String),
}

impl Body {
    /// Wraps the supplied `buf`, choosing the most efficient encoding
    /// between `7bit`, `quoted-printable` and `base64`.
    ///
    /// `String`s can be encoded as `7bit` or `quoted-printable`, while
    /// `Vec<u8>` always get encoded as `base64`.
    pub fn new<B: Into<MaybeString>>(buf: B) -> Self {
        let content: MaybeString = buf.into();
        let encoding = content.encoding(false);

        Self { content, encoding }
    }

    /// Wraps the supplied `buf`, using the provided `encoding`.
    ///
    /// Returns an [`Err`] giving back the supplied `buf`, in case the chosen
    /// encoding would have resulted into `buf` being encoded
    /// into an invalid body.
    pub fn new_with_encoding<B: Into<MaybeString>>(
        buf: B,
        encoding: ContentTransferEncoding,
    ) -> Result<Self, Vec<u8>> {
        let content: MaybeString = buf.into();

        let ok = match (encoding, content.encoding(true)) {
            (ContentTransferEncoding::SevenBit, ContentTransferEncoding::SevenBit) => true,
            (
                ContentTransferEncoding::EightBit,
                ContentTransferEncoding::SevenBit | ContentTransferEncoding::EightBit,
            ) => true,
            (ContentTransferEncoding::SevenBit | ContentTransferEncoding::EightBit, _) => false,
            (
                ContentTransferEncoding::QuotedPrintable
                | ContentTransferEncoding::Base64
                | ContentTransferEncoding::Binary,
                _,
            ) => true,
        };
        if !ok {
            return Err(content.into());
        }

        Ok(Self { content, encoding })
    }

    /// The content, as it was given
    #[inline]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The content as text, if it is valid utf-8
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            MaybeString::String(s) => Some(s),
            MaybeString::Binary(b) => str::from_utf8(b).ok(),
        }
    }

    /// Returns the length of the content in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` if the content has a length of zero, `false` otherwise.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the `Content-Transfer-Encoding` of this `Body`.
    #[inline]
    pub fn encoding(&self) -> ContentTransferEncoding {
        self.encoding
    }

    /// The content encoded with [`Body::encoding`], text line endings
    /// converted to `CRLF`
    pub fn encoded(&self) -> Vec<u8> {
        let buf = match &self.content {
            MaybeString::String(s) => {
                let mut s = s.clone();
                in_place_crlf_line_endings(&mut s);
                s.into_bytes()
            }
            MaybeString::Binary(b) => b.clone(),
        };

        match self.encoding {
            ContentTransferEncoding::SevenBit
            | ContentTransferEncoding::EightBit
            | ContentTransferEncoding::Binary => buf,
            ContentTransferEncoding::QuotedPrintable => quoted_printable::encode(buf),
            ContentTransferEncoding::Base64 => {
                let len = email_encoding::body::base64::encoded_len(buf.len());

                let mut out = String::with_capacity(len);
                email_encoding::body::base64::encode(&buf, &mut out)
                    .expect("encode body as base64");
                out.into_bytes()
            }
        }
    }

    /// Consumes `Body` and returns the content
    #[inline]
    pub fn into_content(self) -> MaybeString {
        self.content
    }
}

impl MaybeString {
    /// Suggests the best `Content-Transfer-Encoding` to be used for this `MaybeString`
    ///
    /// The `binary` encoding is never returned
    fn encoding(&self, supports_utf8: bool) -> ContentTransferEncoding {
        use email_encoding::body::Encoding;

        let output = match self {
            Self::String(s) => Encoding::choose(s.as_str(), supports_utf8),
            Self::Binary(b) => Encoding::choose(b.as_slice(), supports_utf8),
        };

        match output {
            Encoding::SevenBit => ContentTransferEncoding::SevenBit,
            Encoding::EightBit => ContentTransferEncoding::EightBit,
            Encoding::QuotedPrintable => ContentTransferEncoding::QuotedPrintable,
            Encoding::Base64 => ContentTransferEncoding::Base64,
        }
    }
}

/// Something that can be turned into a [`Body`].
///
/// Used by [`MessageBuilder::body`][super::MessageBuilder::body] and
/// [`SinglePartBuilder::body`][super::SinglePartBuilder::body],
/// which can either take something that can be wrapped into [`Body`]
/// or an already built [`Body`].
pub trait IntoBody {
    fn into_body(self) -> Body;
}

impl<T> IntoBody for T
where
    T: Into<MaybeString>,
{
    fn into_body(self) -> Body {
        Body::new(self)
    }
}

impl IntoBody for Body {
    fn into_body(self) -> Body {
        self
    }
}

impl AsRef<[u8]> for Body {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.content()
    }
}

impl From<Vec<u8>> for MaybeString {
    #[inline]
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(b)
    }
}

impl From<String> for MaybeString {
    #[inline]
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for MaybeString {
    #[inline]
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<MaybeString> for Vec<u8> {
    #[inline]
    fn from(s: MaybeString) -> Self {
        match s {
            MaybeString::Binary(b) => b,
            MaybeString::String(s) => s.into(),
        }
    }
}

impl Deref for MaybeString {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        match self {
            Self::Binary(b) => b.as_ref(),
            Self::String(s) => s.as_ref(),
        }
    }
}

/// In place conversion to CRLF line endings
fn in_place_crlf_line_endings(string: &mut String) {
    let indices = find_all_lf_char_indices(string);

    for i in indices {
        // this relies on `indices` being in reverse order
        string.insert(i, '\r');
    }
}

/// Find indices to all places where `\r` should be inserted
/// in order to make `s` have CRLF line endings
///
/// The list is reversed, which is more efficient.
fn find_all_lf_char_indices(s: &str) -> Vec<usize> {
    let mut indices = Vec::new();

    let mut found_lf = false;
    for (i, c) in s.char_indices().rev() {
        if mem::take(&mut found_lf) && c != '\r' {
            // the previous character was `\n`, but this isn't a `\r`
            indices.push(i + c.len_utf8());
        }

        found_lf = c == '\n';
    }

    if found_lf {
        // the first character is `\n`
        indices.push(0);
    }

    indices
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{in_place_crlf_line_endings, Body, ContentTransferEncoding};

    #[test]
    fn seven_bit_detect() {
        let body = Body::new(String::from("Hello, world!"));

        assert_eq!(body.encoding(), ContentTransferEncoding::SevenBit);
        assert_eq!(body.encoded(), b"Hello, world!");
        assert_eq!(body.as_text(), Some("Hello, world!"));
    }

    #[test]
    fn seven_bit_refuses_non_ascii() {
        let refused = Body::new_with_encoding(
            String::from("Привет, мир!"),
            ContentTransferEncoding::SevenBit,
        );

        assert_eq!(refused.unwrap_err(), "Привет, мир!".as_bytes());
    }

    #[test]
    fn non_ascii_text_is_not_seven_bit() {
        let body = Body::new(String::from("Привет, мир!"));

        assert_ne!(body.encoding(), ContentTransferEncoding::SevenBit);
        assert!(body.encoded().is_ascii());
        assert_eq!(body.as_text(), Some("Привет, мир!"));
    }

    #[test]
    fn base64_detect() {
        let input = vec![0x89, b'P', b'N', b'G', 0, 0, 0, 0];
        let body = Body::new(input.clone());

        assert_eq!(body.encoding(), ContentTransferEncoding::Base64);
        assert_eq!(body.encoded(), b"iVBORwAAAAA=");
        assert_eq!(body.content(), input.as_slice());
        assert_eq!(body.as_text(), None);
    }

    #[test]
    fn content_is_kept_verbatim() {
        let body = Body::new("line one\nline two\n");

        assert_eq!(body.content(), b"line one\nline two\n");
        assert_eq!(body.encoded(), b"line one\r\nline two\r\n");
    }

    #[test]
    fn crlf() {
        let mut string = String::from("Send me a ✉️\nwith\nGraph!\n😀");

        in_place_crlf_line_endings(&mut string);
        assert_eq!(string, "Send me a ✉️\r\nwith\r\nGraph!\r\n😀");
    }

    #[test]
    fn harsh_crlf() {
        let mut string = String::from("\n\nSend me a ✉️\r\n\nwith\n\nGraph!\n\r\n😀");

        in_place_crlf_line_endings(&mut string);
        assert_eq!(
            string,
            "\r\n\r\nSend me a ✉️\r\n\r\nwith\r\n\r\nGraph!\r\n\r\n😀"
        );
    }
}
