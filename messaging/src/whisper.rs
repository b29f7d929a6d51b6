//! Posting and watching sealed messages
//!
//! [`Whisper`] is a thin facade: it normalises the loosely typed inputs a
//! front-end hands it (hex strings, zero meaning "default") and checks that
//! the sender identity is one the backend can sign for. Everything else,
//! from key management to sealing and transport, belongs to the backend.

use crate::{
    error::{MessagingError, Result},
    from_hex, to_hex,
};
use serde::Serialize;
use std::time::Duration;

/// Priority used when the caller passes zero
pub const DEFAULT_PRIORITY: u32 = 1000;

/// Time to live in seconds used when the caller passes zero
pub const DEFAULT_TTL_SECS: u32 = 100;

/// Proof-of-work time granted per priority point
pub const WORK_PER_PRIORITY: Duration = Duration::from_micros(100);

/// Topic a message is tagged with
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(pub Vec<u8>);

impl Topic {
    /// Topic from a user supplied string
    ///
    /// `0x` prefixed strings are hex decoded, anything else is taken as its
    /// UTF-8 bytes.
    pub fn parse(input: &str) -> Result<Self> {
        if input.starts_with("0x") || input.starts_with("0X") {
            Ok(Topic(from_hex(input)?))
        } else {
            Ok(Topic(input.as_bytes().to_vec()))
        }
    }
}

/// Parse a list of topic strings
pub fn topics_from_strings<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<Topic>> {
    inputs.iter().map(|s| Topic::parse(s.as_ref())).collect()
}

/// Key pair held by the backend
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    /// Public half, used as the sender address of sealed messages
    pub public: Vec<u8>,
    /// Private half, used for signing
    pub private: Vec<u8>,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("public", &to_hex(&self.public))
            .finish_non_exhaustive()
    }
}

/// Message as seen before sealing and after opening
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Flag bits set by the sender
    pub flags: u8,
    /// Message body
    pub payload: Vec<u8>,
    /// Recovered public key of the signer, if signed
    pub from: Option<Vec<u8>>,
    /// Topics the message was tagged with
    pub topics: Vec<Topic>,
}

impl Message {
    /// Unsigned message carrying `payload`
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            flags: 0,
            payload,
            from: None,
            topics: Vec::new(),
        }
    }
}

/// Parameters for sealing a message into an envelope
#[derive(Debug, Clone)]
pub struct SealOptions {
    /// Time the envelope stays alive in the network
    pub ttl: Duration,
    /// Recipient public key; the message is sent in the clear when absent
    pub to: Option<Vec<u8>>,
    /// Signing identity; the message is anonymous when absent
    pub from: Option<Identity>,
    /// Topics to tag the envelope with
    pub topics: Vec<Topic>,
}

/// Criteria for picking up incoming messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    /// Public key of an identity that must be able to open the message
    pub to: Option<Vec<u8>>,
    /// Required signer
    pub from: Option<Vec<u8>>,
    /// Topics that must all be present
    pub topics: Vec<Topic>,
}

impl MessageFilter {
    /// Whether `message` passes the filter
    ///
    /// The recipient check is left to the backend, which is the only party
    /// able to try opening an envelope.
    pub fn matches(&self, message: &Message) -> bool {
        if let Some(from) = &self.from {
            if message.from.as_ref() != Some(from) {
                return false;
            }
        }
        self.topics.iter().all(|t| message.topics.contains(t))
    }
}

/// Identity store, sealing and transport
pub trait WhisperBackend {
    /// Sealed message ready for the network
    type Envelope;

    /// Private identity for `public`, if this node holds it
    fn identity(&self, public: &[u8]) -> Option<Identity>;

    /// Generate and store a new identity
    fn new_identity(&mut self) -> Identity;

    /// Seal `message`, spending up to `work` on proof of work
    fn seal(
        &self,
        message: Message,
        work: Duration,
        options: SealOptions,
    ) -> Result<Self::Envelope>;

    /// Hand an envelope to the network
    fn send(&mut self, envelope: Self::Envelope) -> Result<()>;

    /// Install a filter and return its id
    fn watch(&mut self, filter: MessageFilter) -> usize;

    /// Messages collected so far by filter `id`
    fn messages(&self, id: usize) -> Vec<Message>;
}

/// Options accepted by [`Whisper::watch`], in front-end form
#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    /// Hex public key of the recipient identity
    pub to: String,
    /// Hex public key of the required sender
    pub from: String,
    /// Topic strings
    pub topics: Vec<String>,
}

/// Front-end view of a received message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhisperMessage {
    /// Flag bits
    pub flags: i32,
    /// `0x` hex payload
    pub payload: String,
    /// `0x` hex public key of the sender, `0x` when anonymous
    pub from: String,
}

impl From<&Message> for WhisperMessage {
    fn from(message: &Message) -> Self {
        Self {
            flags: i32::from(message.flags),
            payload: to_hex(&message.payload),
            from: to_hex(message.from.as_deref().unwrap_or_default()),
        }
    }
}

/// Facade over a [`WhisperBackend`]
pub struct Whisper<B: WhisperBackend> {
    backend: B,
}

impl<B: WhisperBackend> Whisper<B> {
    /// Wraps `backend`
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Seal and send a message
    ///
    /// All byte inputs are hex strings. A `priority` or `ttl` of zero
    /// selects [`DEFAULT_PRIORITY`] or [`DEFAULT_TTL_SECS`]. An empty `from`
    /// posts anonymously; otherwise the backend must hold the private key
    /// for `from` or the post fails with [`MessagingError::UnmatchedIdentity`],
    /// as it does when `from` is not valid hex.
    pub fn post(
        &mut self,
        payload: &str,
        to: &str,
        from: &str,
        topics: &[String],
        priority: u32,
        ttl: u32,
    ) -> Result<()> {
        let priority = if priority == 0 { DEFAULT_PRIORITY } else { priority };
        let ttl = if ttl == 0 { DEFAULT_TTL_SECS } else { ttl };

        let sender = if from.is_empty() {
            None
        } else {
            let identity = from_hex(from)
                .ok()
                .and_then(|public| self.backend.identity(&public));
            match identity {
                Some(identity) => Some(identity),
                None => return Err(MessagingError::UnmatchedIdentity),
            }
        };

        let options = SealOptions {
            ttl: Duration::from_secs(u64::from(ttl)),
            to: if to.is_empty() { None } else { Some(from_hex(to)?) },
            from: sender,
            topics: topics_from_strings(topics)?,
        };
        let message = Message::new(from_hex(payload)?);
        let work = WORK_PER_PRIORITY.saturating_mul(priority);

        let envelope = self.backend.seal(message, work, options)?;
        self.backend.send(envelope)
    }

    /// Create a new identity, returning its hex public key
    pub fn new_identity(&mut self) -> String {
        to_hex(&self.backend.new_identity().public)
    }

    /// Whether the backend holds the private key for hex public `key`
    pub fn has_identity(&self, key: &str) -> bool {
        from_hex(key)
            .map(|public| self.backend.identity(&public).is_some())
            .unwrap_or(false)
    }

    /// Install a filter built from front-end options
    pub fn watch(&mut self, options: &WatchOptions) -> Result<usize> {
        let filter = MessageFilter {
            to: non_empty_hex(&options.to)?,
            from: non_empty_hex(&options.from)?,
            topics: topics_from_strings(&options.topics)?,
        };
        log::debug!("new filter {:?}", filter);
        Ok(self.backend.watch(filter))
    }

    /// Messages collected by filter `id`
    pub fn messages(&self, id: usize) -> Vec<WhisperMessage> {
        self.backend
            .messages(id)
            .iter()
            .map(WhisperMessage::from)
            .collect()
    }
}

fn non_empty_hex(input: &str) -> Result<Option<Vec<u8>>> {
    if input.is_empty() {
        Ok(None)
    } else {
        from_hex(input).map(Some)
    }
}
