use crate::message::{
    header::{ContentTransferEncoding, ContentType, Header, HeaderValue, Headers},
    Body, EmailFormat, IntoBody,
};

/// MIME part variants
#[derive(Debug, Clone)]
pub enum Part {
    /// Single part with content
    Single(SinglePart),

    /// Multiple parts of content
    Multi(MultiPart),
}

impl EmailFormat for Part {
    fn format(&self, out: &mut Vec<u8>) {
        match self {
            Part::Single(part) => part.format(out),
            Part::Multi(part) => part.format(out),
        }
    }
}

impl Part {
    /// Get the part formatted as MIME
    pub fn formatted(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.format(&mut out);
        out
    }

    /// Get the headers of the part
    pub fn headers(&self) -> &Headers {
        match self {
            Part::Single(part) => part.headers(),
            Part::Multi(part) => part.headers(),
        }
    }
}

/// Parts of multipart body
pub type Parts = Vec<Part>;

/// Creates builder for single part
#[derive(Debug, Clone)]
pub struct SinglePartBuilder {
    headers: Headers,
}

impl SinglePartBuilder {
    /// Creates a default singlepart builder
    pub fn new() -> Self {
        Self {
            headers: Headers::new(),
        }
    }

    /// Set the header to singlepart
    pub fn header<H: Header>(mut self, header: H) -> Self {
        self.headers.set(header);
        self
    }

    /// Set the Content-Type header of the singlepart
    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.headers.set(content_type);
        self
    }

    /// Build singlepart using body
    ///
    /// A `Content-Transfer-Encoding` set on the builder is honored when it
    /// can represent the body, otherwise the best encoding is chosen.
    pub fn body<T: IntoBody>(mut self, body: T) -> SinglePart {
        let body = body.into_body();
        let body = match self.headers.get::<ContentTransferEncoding>() {
            Some(encoding) if encoding != body.encoding() => {
                Body::new_with_encoding(body.into_content(), encoding).unwrap_or_else(Body::new)
            }
            _ => body,
        };

        self.headers.set(body.encoding());

        SinglePart {
            headers: self.headers,
            body,
        }
    }
}

impl Default for SinglePartBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Single part
///
/// # Example
///
/// ```
/// use msgraph_mailer::message::{header::ContentType, SinglePart};
///
/// let part = SinglePart::builder()
///     .header(ContentType::TEXT_PLAIN)
///     .body(String::from("Текст письма в уникоде"));
/// assert_eq!(part.body().as_text(), Some("Текст письма в уникоде"));
/// ```
#[derive(Debug, Clone)]
pub struct SinglePart {
    headers: Headers,
    body: Body,
}

impl SinglePart {
    /// Creates a builder for singlepart
    #[inline]
    pub fn builder() -> SinglePartBuilder {
        SinglePartBuilder::new()
    }

    /// Directly create a `SinglePart` from a plain UTF-8 content
    pub fn plain<T: IntoBody>(body: T) -> Self {
        Self::builder().header(ContentType::TEXT_PLAIN).body(body)
    }

    /// Directly create a `SinglePart` from a UTF-8 HTML content
    pub fn html<T: IntoBody>(body: T) -> Self {
        Self::builder().header(ContentType::TEXT_HTML).body(body)
    }

    /// Get the headers from singlepart
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get the body, not transfer encoded
    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Get the part formatted as MIME
    pub fn formatted(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.format(&mut out);
        out
    }
}

impl EmailFormat for SinglePart {
    fn format(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.headers.to_string().as_bytes());
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.body.encoded());
        out.extend_from_slice(b"\r\n");
    }
}

/// The kind of multipart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiPartKind {
    /// Mixed kind to combine unrelated content parts
    ///
    /// For example this kind can be used to mix email message and attachments.
    Mixed,

    /// Alternative kind to join several variants of same email contents.
    ///
    /// That kind is recommended to use for joining plain (text) and rich (HTML) messages into single email message.
    Alternative,

    /// Related kind to mix content and related resources.
    ///
    /// For example, you can include images into HTML content using that.
    Related,

    /// Encrypted kind for encrypted messages
    Encrypted { protocol: String },

    /// Signed kind for signed messages
    Signed { protocol: String, micalg: String },

    /// Any other `multipart/<subtype>`, like `report` or `digest`
    Other(String),
}

/// Create a random MIME boundary.
fn make_boundary() -> String {
    std::iter::repeat_with(fastrand::alphanumeric)
        .take(40)
        .collect()
}

impl MultiPartKind {
    /// The `multipart` subtype, lowercased
    pub fn subtype(&self) -> &str {
        match self {
            Self::Mixed => "mixed",
            Self::Alternative => "alternative",
            Self::Related => "related",
            Self::Encrypted { .. } => "encrypted",
            Self::Signed { .. } => "signed",
            Self::Other(subtype) => subtype,
        }
    }

    /// Whether the parts of this kind are independent pieces of content
    /// rather than a single unit that must be kept as a whole
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Mixed | Self::Alternative | Self::Related)
    }

    fn content_type(&self, boundary: &str) -> String {
        let params = match self {
            Self::Encrypted { protocol } => format!("; protocol=\"{protocol}\""),
            Self::Signed { protocol, micalg } => {
                format!("; protocol=\"{protocol}\"; micalg=\"{micalg}\"")
            }
            _ => String::new(),
        };

        format!(
            "multipart/{}; boundary=\"{boundary}\"{params}",
            self.subtype()
        )
    }
}

/// Multipart builder
#[derive(Debug, Clone)]
pub struct MultiPartBuilder {
    kind: MultiPartKind,
    boundary: Option<String>,
    headers: Headers,
}

impl MultiPartBuilder {
    /// Creates a multipart builder of the given kind
    pub fn new(kind: MultiPartKind) -> Self {
        Self {
            kind,
            boundary: None,
            headers: Headers::new(),
        }
    }

    /// Set a header
    pub fn header<H: Header>(mut self, header: H) -> Self {
        self.headers.set(header);
        self
    }

    /// Set custom boundary
    pub fn boundary<S: Into<String>>(mut self, boundary: S) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Creates multipart without parts
    pub fn build(self) -> MultiPart {
        let boundary = self.boundary.unwrap_or_else(make_boundary);

        let mut headers = self.headers;
        headers.set_raw(HeaderValue::new(
            ContentType::name(),
            self.kind.content_type(&boundary),
        ));

        MultiPart {
            kind: self.kind,
            boundary,
            headers,
            parts: Vec::new(),
        }
    }

    /// Creates multipart using part
    pub fn part(self, part: Part) -> MultiPart {
        self.build().part(part)
    }

    /// Creates multipart using singlepart
    pub fn singlepart(self, part: SinglePart) -> MultiPart {
        self.build().singlepart(part)
    }

    /// Creates multipart using multipart
    pub fn multipart(self, part: MultiPart) -> MultiPart {
        self.build().multipart(part)
    }
}

/// Multipart variant with parts
#[derive(Debug, Clone)]
pub struct MultiPart {
    kind: MultiPartKind,
    boundary: String,
    headers: Headers,
    parts: Parts,
}

impl MultiPart {
    /// Creates multipart builder
    pub fn builder(kind: MultiPartKind) -> MultiPartBuilder {
        MultiPartBuilder::new(kind)
    }

    /// Creates mixed multipart builder
    pub fn mixed() -> MultiPartBuilder {
        MultiPart::builder(MultiPartKind::Mixed)
    }

    /// Creates alternative multipart builder
    pub fn alternative() -> MultiPartBuilder {
        MultiPart::builder(MultiPartKind::Alternative)
    }

    /// Creates related multipart builder
    pub fn related() -> MultiPartBuilder {
        MultiPart::builder(MultiPartKind::Related)
    }

    /// Creates encrypted multipart builder
    pub fn encrypted(protocol: String) -> MultiPartBuilder {
        MultiPart::builder(MultiPartKind::Encrypted { protocol })
    }

    /// Creates signed multipart builder
    pub fn signed(protocol: String, micalg: String) -> MultiPartBuilder {
        MultiPart::builder(MultiPartKind::Signed { protocol, micalg })
    }

    /// Alternative multipart joining a plain text and an HTML version of
    /// the same content
    pub fn alternative_plain_html<T: IntoBody, V: IntoBody>(plain: T, html: V) -> Self {
        Self::alternative()
            .singlepart(SinglePart::plain(plain))
            .singlepart(SinglePart::html(html))
    }

    /// Add part to multipart
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Add single part to multipart
    pub fn singlepart(mut self, part: SinglePart) -> Self {
        self.parts.push(Part::Single(part));
        self
    }

    /// Add multi part to multipart
    pub fn multipart(mut self, part: MultiPart) -> Self {
        self.parts.push(Part::Multi(part));
        self
    }

    pub fn kind(&self) -> &MultiPartKind {
        &self.kind
    }

    /// Get the boundary of multipart contents
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// `multipart/<subtype>`, without parameters
    pub fn essence(&self) -> String {
        format!("multipart/{}", self.kind.subtype())
    }

    /// Get the headers from the multipart
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get the parts from the multipart
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Get the multipart formatted as MIME, headers included
    pub fn formatted(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.format(&mut out);
        out
    }
}

impl EmailFormat for MultiPart {
    fn format(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.headers.to_string().as_bytes());
        out.extend_from_slice(b"\r\n");

        for part in &self.parts {
            out.extend_from_slice(b"--");
            out.extend_from_slice(self.boundary.as_bytes());
            out.extend_from_slice(b"\r\n");
            part.format(out);
        }

        out.extend_from_slice(b"--");
        out.extend_from_slice(self.boundary.as_bytes());
        out.extend_from_slice(b"--\r\n");
    }
}

impl From<SinglePart> for Part {
    fn from(part: SinglePart) -> Self {
        Part::Single(part)
    }
}

impl From<MultiPart> for Part {
    fn from(part: MultiPart) -> Self {
        Part::Multi(part)
    }
}
