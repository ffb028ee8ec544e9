//! Turns a [`Message`] into a `sendMail` request
//!
//! Recipients come from every instance of the `To`, `Cc`, `Bcc` and
//! `Reply-To` headers. A flat body is used as is, a MIME body is walked and
//! each part is classified with [`PartKind`]:
//!
//! * `text/*` parts without a `Content-Disposition` become the message body,
//!   HTML being preferred over plain text
//! * parts with a `Content-Disposition` become file attachments, unless it
//!   is a bare `inline` on a `text/plain` or `text/html` part
//! * `multipart/mixed`, `alternative` and `related` are walked recursively
//! * other multiparts (signed, encrypted...) are forwarded whole, as an
//!   inline attachment
//!
//! Any other part can't be represented and fails the mapping.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{
    error::{self, Error},
    request::{BodyType, FileAttachment, GraphMessage, ItemBody, Recipient, SendMailRequest},
};
use crate::message::{
    header::{self, ContentDisposition, ContentId, ContentType, Header, Headers},
    Mailboxes, Message, MessageBody, MultiPart, Part, SinglePart,
};

const DEFAULT_ATTACHMENT_NAME: &str = "attachment";
const DEFAULT_ATTACHMENT_TYPE: &str = "application/octet-stream";

/// Builds the request sending `message`
pub(crate) fn send_mail_request(
    message: &Message,
    save_to_sent_items: bool,
) -> Result<SendMailRequest, Error> {
    let headers = message.headers();

    let mut collected = Collected::default();
    match message.body() {
        MessageBody::Raw(body) => {
            let content = body
                .as_text()
                .ok_or_else(|| error::invalid_input("message body is not valid utf-8"))?;
            let body_type = headers
                .get::<ContentType>()
                .map_or(BodyType::Text, |content_type| body_type(&content_type));
            collected.push_text(body_type, content.to_owned());
        }
        MessageBody::Mime(part) => collected.walk(part)?,
    }

    let has_attachments = !collected.attachments.is_empty();
    Ok(SendMailRequest {
        message: GraphMessage {
            subject: message.subject(),
            body: collected.body(),
            to_recipients: recipients::<header::To>(headers)?,
            cc_recipients: recipients::<header::Cc>(headers)?,
            bcc_recipients: recipients::<header::Bcc>(headers)?,
            reply_to: recipients::<header::ReplyTo>(headers)?,
            attachments: collected.attachments,
            has_attachments,
        },
        save_to_sent_items,
    })
}

/// Every mailbox of every `H` header, in order
fn recipients<H: Header>(headers: &Headers) -> Result<Vec<Recipient>, Error> {
    let name = H::name();

    let mut recipients = Vec::new();
    for raw in headers.get_all_raw(&name) {
        let mailboxes: Mailboxes = raw
            .parse()
            .map_err(|err| error::invalid_input(format!("{name} header: {err}")))?;
        recipients.extend(mailboxes.iter().map(Recipient::from));
    }

    Ok(recipients)
}

fn body_type(content_type: &ContentType) -> BodyType {
    if content_type.essence() == "text/html" {
        BodyType::Html
    } else {
        BodyType::Text
    }
}

/// What a MIME part turns into
enum PartKind<'a> {
    /// Body content
    Text(BodyType, &'a SinglePart),
    /// File attachment
    Attachment {
        part: &'a SinglePart,
        inline: bool,
        filename: Option<String>,
    },
    /// Multipart whose parts are mapped one by one
    Container(&'a MultiPart),
    /// Multipart forwarded as a whole
    Opaque(&'a MultiPart),
}

impl<'a> PartKind<'a> {
    fn classify(part: &'a Part) -> Result<Self, Error> {
        let part = match part {
            Part::Multi(multi) if multi.kind().is_container() => {
                return Ok(PartKind::Container(multi))
            }
            Part::Multi(multi) => return Ok(PartKind::Opaque(multi)),
            Part::Single(single) => single,
        };

        let headers = part.headers();
        let content_type = headers.get::<ContentType>();

        if let Some(raw) = headers.get_raw(&ContentDisposition::name()) {
            // an unreadable disposition still marks the part as an attachment
            let disposition = ContentDisposition::parse(raw).ok();

            // a bare `inline` on a plain text or html part is body content
            let inline_body = disposition
                .as_ref()
                .is_some_and(|d| d.is_inline() && d.filename().is_none())
                && content_type.as_ref().is_some_and(|ct| {
                    matches!(ct.essence().as_str(), "text/plain" | "text/html")
                        && ct.name_param().is_none()
                })
                && headers.get_raw(&ContentId::name()).is_none();
            if !inline_body {
                return Ok(PartKind::Attachment {
                    part,
                    inline: disposition.as_ref().is_some_and(ContentDisposition::is_inline),
                    filename: disposition.and_then(|d| d.filename().map(ToOwned::to_owned)),
                });
            }
        }

        // RFC 2045 section 5.2
        let content_type = content_type.unwrap_or(ContentType::TEXT_PLAIN);
        if content_type.as_mime().type_() == mime::TEXT {
            Ok(PartKind::Text(body_type(&content_type), part))
        } else {
            Err(error::unsupported_part(format!(
                "{} part without Content-Disposition",
                content_type.essence()
            )))
        }
    }
}

#[derive(Default)]
struct Collected {
    text: Option<String>,
    html: Option<String>,
    attachments: Vec<FileAttachment>,
}

impl Collected {
    fn walk(&mut self, part: &Part) -> Result<(), Error> {
        match PartKind::classify(part)? {
            PartKind::Text(body_type, part) => {
                let content = part
                    .body()
                    .as_text()
                    .ok_or_else(|| error::invalid_input("text part is not valid utf-8"))?;
                self.push_text(body_type, content.to_owned());
            }
            PartKind::Attachment {
                part,
                inline,
                filename,
            } => self.attachments.push(file_attachment(part, inline, filename)),
            PartKind::Container(multi) => {
                for part in multi.parts() {
                    self.walk(part)?;
                }
            }
            PartKind::Opaque(multi) => self.attachments.push(FileAttachment {
                odata_type: FileAttachment::ODATA_TYPE,
                name: format!("multipart-{}", multi.kind().subtype()),
                content_type: multi.essence(),
                content_bytes: STANDARD.encode(multi.formatted()),
                is_inline: true,
                content_id: None,
            }),
        }

        Ok(())
    }

    fn push_text(&mut self, body_type: BodyType, content: String) {
        let slot = match body_type {
            BodyType::Text => &mut self.text,
            BodyType::Html => &mut self.html,
        };

        if slot.is_some() {
            #[cfg(feature = "tracing")]
            tracing::warn!(?body_type, "dropping additional body part");
            return;
        }
        *slot = Some(content);
    }

    fn body(&mut self) -> Option<ItemBody> {
        match (self.html.take(), self.text.take()) {
            (Some(content), _text) => {
                #[cfg(feature = "tracing")]
                if _text.is_some() {
                    tracing::debug!("using the html body, dropping the plain text one");
                }

                Some(ItemBody {
                    content_type: BodyType::Html,
                    content,
                })
            }
            (None, Some(content)) => Some(ItemBody {
                content_type: BodyType::Text,
                content,
            }),
            (None, None) => None,
        }
    }
}

fn file_attachment(part: &SinglePart, inline: bool, filename: Option<String>) -> FileAttachment {
    let headers = part.headers();
    let content_type = headers.get::<ContentType>();

    let name = filename
        .or_else(|| content_type.as_ref().and_then(ContentType::name_param))
        .unwrap_or_else(|| DEFAULT_ATTACHMENT_NAME.to_owned());

    FileAttachment {
        odata_type: FileAttachment::ODATA_TYPE,
        name,
        content_type: content_type
            .map_or_else(|| DEFAULT_ATTACHMENT_TYPE.to_owned(), |ct| ct.essence()),
        content_bytes: STANDARD.encode(part.body().content()),
        is_inline: inline,
        content_id: headers.get::<ContentId>().map(|id| id.id().to_owned()),
    }
}
