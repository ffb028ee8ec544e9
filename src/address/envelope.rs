use super::Address;
use crate::{
    message::header::{self, Header, Headers},
    message::Mailboxes,
    Error,
};

/// Simple email envelope representation
///
/// The sender is the mailbox the message is sent on behalf of. The Graph
/// transport uses it as the user the `sendMail` call is scoped to.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Envelope {
    /// The envelope recipients' addresses
    ///
    /// This can not be empty.
    forward_path: Vec<Address>,
    /// The envelope sender address
    reverse_path: Option<Address>,
}

impl Envelope {
    /// Creates a new envelope, which may fail if `to` is empty.
    ///
    /// ```
    /// # use msgraph_mailer::{Address, Envelope};
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// let sender = "from@email.com".parse::<Address>()?;
    /// let recipients = vec!["to@email.com".parse::<Address>()?];
    ///
    /// let envelope = Envelope::new(Some(sender), recipients)?;
    /// assert!(envelope.from().is_some());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(from: Option<Address>, to: Vec<Address>) -> Result<Envelope, Error> {
        if to.is_empty() {
            return Err(Error::MissingTo);
        }
        Ok(Envelope {
            forward_path: to,
            reverse_path: from,
        })
    }

    /// Gets the destination addresses of the envelope.
    pub fn to(&self) -> &[Address] {
        self.forward_path.as_slice()
    }

    /// Gets the sender of the envelope.
    pub fn from(&self) -> Option<&Address> {
        self.reverse_path.as_ref()
    }
}

impl TryFrom<&Headers> for Envelope {
    type Error = Error;

    fn try_from(headers: &Headers) -> Result<Self, Self::Error> {
        let from = match headers.get::<header::Sender>() {
            Some(header::Sender(mailbox)) => Some(mailbox.email),
            None => match headers.get::<header::From>() {
                Some(header::From(mailboxes)) => {
                    let mut from = mailboxes.into_iter();
                    let first = from.next();
                    if from.next().is_some() {
                        return Err(Error::TooManyFrom);
                    }
                    first.map(|mailbox| mailbox.email)
                }
                None => None,
            },
        };

        let mut to = Vec::new();
        for name in [header::To::name(), header::Cc::name(), header::Bcc::name()] {
            for raw in headers.get_all_raw(&name) {
                let mailboxes = raw.parse::<Mailboxes>()?;
                to.extend(mailboxes.into_iter().map(|mailbox| mailbox.email));
            }
        }

        Self::new(from, to)
    }
}
