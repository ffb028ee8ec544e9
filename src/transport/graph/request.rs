//! JSON body of the `sendMail` call
//!
//! See <https://learn.microsoft.com/en-us/graph/api/user-sendmail>

use serde::Serialize;

use crate::message::Mailbox;

/// Body of `POST /users/{id}/sendMail`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendMailRequest {
    pub(crate) message: GraphMessage,
    pub(crate) save_to_sent_items: bool,
}

/// The `message` resource, limited to the properties set when sending
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) body: Option<ItemBody>,
    pub(crate) to_recipients: Vec<Recipient>,
    pub(crate) cc_recipients: Vec<Recipient>,
    pub(crate) bcc_recipients: Vec<Recipient>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) reply_to: Vec<Recipient>,
    pub(crate) attachments: Vec<FileAttachment>,
    pub(crate) has_attachments: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum BodyType {
    Text,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemBody {
    pub(crate) content_type: BodyType,
    pub(crate) content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Recipient {
    pub(crate) email_address: EmailAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct EmailAddress {
    pub(crate) address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
}

impl From<&Mailbox> for Recipient {
    fn from(mailbox: &Mailbox) -> Self {
        Recipient {
            email_address: EmailAddress {
                address: mailbox.email.to_string(),
                name: mailbox.display_name().map(ToOwned::to_owned),
            },
        }
    }
}

/// `#microsoft.graph.fileAttachment`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileAttachment {
    #[serde(rename = "@odata.type")]
    pub(crate) odata_type: &'static str,
    pub(crate) name: String,
    pub(crate) content_type: String,
    /// Base64 encoded content
    pub(crate) content_bytes: String,
    pub(crate) is_inline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) content_id: Option<String>,
}

impl FileAttachment {
    pub(crate) const ODATA_TYPE: &'static str = "#microsoft.graph.fileAttachment";
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{BodyType, FileAttachment, GraphMessage, ItemBody, Recipient, SendMailRequest};
    use crate::message::Mailbox;

    #[test]
    fn serialize_request() {
        let request = SendMailRequest {
            message: GraphMessage {
                subject: Some("Quarterly report".to_owned()),
                body: Some(ItemBody {
                    content_type: BodyType::Html,
                    content: "<p>Attached.</p>".to_owned(),
                }),
                to_recipients: vec![Recipient::from(
                    &"Ada <ada@contoso.com>".parse::<Mailbox>().unwrap(),
                )],
                attachments: vec![FileAttachment {
                    odata_type: FileAttachment::ODATA_TYPE,
                    name: "report.csv".to_owned(),
                    content_type: "text/csv".to_owned(),
                    content_bytes: "YSxiCg==".to_owned(),
                    is_inline: false,
                    content_id: None,
                }],
                has_attachments: true,
                ..GraphMessage::default()
            },
            save_to_sent_items: false,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "message": {
                    "subject": "Quarterly report",
                    "body": { "contentType": "html", "content": "<p>Attached.</p>" },
                    "toRecipients": [
                        { "emailAddress": { "address": "ada@contoso.com", "name": "Ada" } }
                    ],
                    "ccRecipients": [],
                    "bccRecipients": [],
                    "attachments": [{
                        "@odata.type": "#microsoft.graph.fileAttachment",
                        "name": "report.csv",
                        "contentType": "text/csv",
                        "contentBytes": "YSxiCg==",
                        "isInline": false
                    }],
                    "hasAttachments": true
                },
                "saveToSentItems": false
            })
        );
    }

    #[test]
    fn recipient_without_name() {
        let recipient = Recipient::from(&"ada@contoso.com".parse::<Mailbox>().unwrap());

        assert_eq!(
            serde_json::to_value(&recipient).unwrap(),
            json!({ "emailAddress": { "address": "ada@contoso.com" } })
        );
    }
}
