use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use mime::Mime;

use super::{Header, HeaderName, HeaderValue};
use crate::{message::utf8_b, BoxError};

/// `Content-Type` of the body
///
/// Defined in [RFC2045](https://tools.ietf.org/html/rfc2045#section-5)
#[derive(Debug, Clone, PartialEq)]
pub struct ContentType(Mime);

impl ContentType {
    /// A `ContentType` of type `text/plain; charset=utf-8`
    pub const TEXT_PLAIN: ContentType = Self(mime::TEXT_PLAIN_UTF_8);

    /// A `ContentType` of type `text/html; charset=utf-8`
    pub const TEXT_HTML: ContentType = Self(mime::TEXT_HTML_UTF_8);

    /// Parse `s` into `ContentType`
    pub fn parse(s: &str) -> Result<ContentType, ContentTypeErr> {
        s.parse().map(Self).map_err(ContentTypeErr)
    }

    pub fn from_mime(mime: Mime) -> Self {
        Self(mime)
    }

    pub fn as_mime(&self) -> &Mime {
        &self.0
    }

    /// `type/subtype` without parameters, lowercased
    pub fn essence(&self) -> String {
        self.0.essence_str().to_ascii_lowercase()
    }

    /// Value of the `name` parameter, used by some clients instead of a
    /// `Content-Disposition` filename
    pub fn name_param(&self) -> Option<String> {
        self.0.get_param("name").map(|name| name.as_str().to_owned())
    }
}

impl Header for ContentType {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Content-Type")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        Ok(Self(s.parse()?))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.to_string())
    }
}

impl FromStr for ContentType {
    type Err = ContentTypeErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An error occurred while trying to [`ContentType::parse`].
#[derive(Debug)]
pub struct ContentTypeErr(mime::FromStrError);

impl StdError for ContentTypeErr {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.0)
    }
}

impl Display for ContentTypeErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// `Content-Transfer-Encoding` of the body
///
/// The `Message` builder takes care of choosing the most
/// efficient encoding based on the chosen body, so in most
/// use-cases this header shouldn't be set manually.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContentTransferEncoding {
    SevenBit,
    QuotedPrintable,
    Base64,
    // 8BITMIME
    EightBit,
    Binary,
}

impl Display for ContentTransferEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Self::SevenBit => "7bit",
            Self::QuotedPrintable => "quoted-printable",
            Self::Base64 => "base64",
            Self::EightBit => "8bit",
            Self::Binary => "binary",
        })
    }
}

impl FromStr for ContentTransferEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7bit" => Ok(Self::SevenBit),
            "quoted-printable" => Ok(Self::QuotedPrintable),
            "base64" => Ok(Self::Base64),
            "8bit" => Ok(Self::EightBit),
            "binary" => Ok(Self::Binary),
            _ => Err(s.into()),
        }
    }
}

impl Header for ContentTransferEncoding {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Content-Transfer-Encoding")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        Ok(s.parse()?)
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.to_string())
    }
}

/// Whether a part is shown in the message body or offered for download
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DispositionKind {
    Inline,
    Attachment,
}

/// `Content-Disposition` of a body part
///
/// Defined in [RFC2183](https://tools.ietf.org/html/rfc2183)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    kind: DispositionKind,
    filename: Option<String>,
}

impl ContentDisposition {
    /// A part which should be displayed inline into the message
    pub fn inline() -> Self {
        Self {
            kind: DispositionKind::Inline,
            filename: None,
        }
    }

    /// A part displayed inline, with a filename in case it were to be downloaded
    pub fn inline_with_name(filename: &str) -> Self {
        Self {
            kind: DispositionKind::Inline,
            filename: Some(filename.to_owned()),
        }
    }

    /// A part separate from the body of the message, downloaded separately
    pub fn attachment(filename: &str) -> Self {
        Self {
            kind: DispositionKind::Attachment,
            filename: Some(filename.to_owned()),
        }
    }

    pub fn kind(&self) -> DispositionKind {
        self.kind
    }

    pub fn is_inline(&self) -> bool {
        self.kind == DispositionKind::Inline
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    fn format(&self, encode: bool) -> String {
        let kind = match self.kind {
            DispositionKind::Inline => "inline",
            DispositionKind::Attachment => "attachment",
        };

        match &self.filename {
            Some(filename) => {
                let filename = if encode {
                    utf8_b::encode(filename).replace("\r\n ", " ")
                } else {
                    filename.clone()
                };
                format!("{kind}; filename=\"{}\"", escape_quoted(&filename))
            }
            None => kind.to_owned(),
        }
    }
}

impl Header for ContentDisposition {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Content-Disposition")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        let mut params = split_params(s).into_iter();
        let kind = match params.next().as_deref().map(str::trim) {
            Some(kind) if kind.eq_ignore_ascii_case("inline") => DispositionKind::Inline,
            // unknown types are handled as attachments, RFC2183 section 2.8
            Some(kind) if !kind.is_empty() => DispositionKind::Attachment,
            _ => return Err("missing disposition type".into()),
        };

        let filename = params.find_map(|param| {
            let (key, value) = param.split_once('=')?;
            if !key.trim().eq_ignore_ascii_case("filename") {
                return None;
            }
            Some(unquote(value.trim()))
        });

        Ok(Self { kind, filename })
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::dangerous_new_pre_encoded(Self::name(), self.format(false), self.format(true))
    }
}

/// Splits header parameters on `;`, ignoring the ones inside quoted strings
fn split_params(s: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut escaped = false;

    for c in s.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    params.push(current);

    params
}

fn unquote(s: &str) -> String {
    match s.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => {
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                match c {
                    '\\' => out.extend(chars.next()),
                    c => out.push(c),
                }
            }
            out
        }
        None => s.to_owned(),
    }
}

fn escape_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
