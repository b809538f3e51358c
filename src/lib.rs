//! requester - request/response correlation over a one-way message channel
//!
//! A [`Requester`] turns a fire-and-forget channel into awaitable exchanges:
//! `request` sends an envelope and waits for the reply carrying the same id,
//! `post` sends without expecting one, and `on_message` classifies whatever
//! arrives from the other party.
pub mod codec;
pub mod collaborator;
pub mod config;
pub mod envelope;
pub mod error;
pub mod requester;
pub mod stats;
pub mod table;
pub mod transport;

pub use codec::{Codec, JsonCodec};
pub use collaborator::{FnOutbound, FnResponder, Outbound, Responder, TypedResponder};
pub use config::{DEFAULT_TIMEOUT, DropHook, RequesterConfig};
pub use envelope::{Envelope, EnvelopeKind, NO_REPLY_ID, RequestId};
pub use error::{BoxError, RequestError, Result, TransportError, TransportResult};
pub use requester::Requester;
pub use stats::{DropReason, RequesterStats};
pub use table::{CorrelationTable, PendingReply};
pub use transport::channel::ChannelTransport;
pub use transport::{ListenerHandle, Transport, TransportOutbound, attach, spawn_listener};
