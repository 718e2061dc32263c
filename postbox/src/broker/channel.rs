use std::fs;
use std::path::PathBuf;

use crate::error::BrokerError;
use crate::mailbox::Mailbox;
use crate::types::{timestamp_secs, ChannelId, Timestamp};

/// One topic: an inbox for client-initiated writes awaiting external
/// processing, and an outbox fanned out to subscribed sessions.
///
/// The channel's directories exist for its entire process lifetime; the
/// object is created on first reference and destroyed (directory tree
/// removed) on explicit deletion or reaping.
pub struct Channel {
    id: ChannelId,
    mailbox: Mailbox,
    last_active: Timestamp,
}

impl Channel {
    pub(crate) fn new(mailbox: Mailbox, id: ChannelId) -> Result<Self, BrokerError> {
        mailbox.ensure_channel_dirs(&id)?;
        Ok(Self { id, mailbox, last_active: timestamp_secs() })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn out_path(&self) -> PathBuf {
        self.mailbox.channel_out_path(&self.id)
    }

    /// Most recent publish or fan-out, seconds since epoch.
    #[inline]
    pub fn last_active(&self) -> Timestamp {
        self.last_active
    }

    #[inline]
    pub(crate) fn touch(&mut self) {
        self.last_active = timestamp_secs();
    }

    #[cfg(test)]
    pub(crate) fn force_last_active(&mut self, ts: Timestamp) {
        self.last_active = ts;
    }

    /// Publishes a payload into the outbox: spool write, then atomic rename.
    /// The only synchronous, blocking operation exposed to producers.
    pub fn publish(&mut self, payload: &[u8]) -> Result<PathBuf, BrokerError> {
        let target = self.mailbox.publish(&self.id, payload, false)?;
        self.touch();
        Ok(target)
    }

    /// Publishes a client-initiated payload into the inbox, for an external
    /// consumer to drain.
    pub fn publish_inbox(&mut self, payload: &[u8]) -> Result<PathBuf, BrokerError> {
        let target = self.mailbox.publish(&self.id, payload, true)?;
        self.touch();
        Ok(target)
    }

    /// Removes the channel's whole directory subtree. Pending unread inbox
    /// entries are lost; external collaborators are expected to have drained
    /// them.
    pub(crate) fn cleanup(&self) {
        if let Err(e) = fs::remove_dir_all(self.mailbox.channel_path(&self.id)) {
            log::debug!("channel {} cleanup: {:?}", self.id, e);
        }
    }
}
