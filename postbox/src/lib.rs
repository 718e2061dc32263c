//! Directory-mailbox pub/sub broker core.
//!
//! External producers drop message files into a channel's mailbox directory,
//! the broker hard-links them into every subscribed session's outgoing queue,
//! and attached WebSocket connections drain the queues. The filesystem tree
//! (conventionally on a memory-backed filesystem) is the only coordination
//! mechanism between the broker and producer processes; an atomic rename into
//! a watched directory is the sole publication signal.
//!
//! Layout, rooted at a configured base path:
//!
//! ```text
//! <base>/.tmp/                         staging area for atomic publish
//! <base>/session/<session_id>/out/             per-session outgoing queue
//! <base>/session/<session_id>/readable/<ch>    flag file: session may read <ch>
//! <base>/session/<session_id>/writable/<ch>    flag file: session may write <ch>
//! <base>/channel/<channel_id>/in/      inbound messages awaiting external processing
//! <base>/channel/<channel_id>/out/     outbound messages awaiting fan-out
//! ```

#![deny(unsafe_code)]

pub mod admin;
pub mod broker;
pub mod codec;
pub mod error;
pub mod mailbox;
pub mod types;
pub mod watch;

pub use admin::Admin;
pub use broker::channel::Channel;
pub use broker::session::{ConnectionHandle, ConnEvent, Session};
pub use broker::{Broker, BrokerEvent, BrokerHandle, BrokerOptions};
pub use error::BrokerError;
pub use mailbox::{Mailbox, Route};
pub use types::{ChannelId, ConnId, SessionId, Timestamp};
pub use watch::{DirEvent, DirEventKind, DirWatcher};

pub type Error = anyhow::Error;
pub type Result<T, E = Error> = anyhow::Result<T, E>;
