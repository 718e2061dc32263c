//! Synchronous management surface for external server-side processes.
//!
//! The broker never calls these; they exist for web applications and shell
//! scripts that provision sessions, grant/revoke per-channel permissions and
//! publish messages. Everything here speaks only the filesystem contract, so
//! it works whether or not the broker is running; a running broker observes
//! the effects through its directory watches within one dispatch cycle.

use std::fs;
use std::path::PathBuf;

use crate::error::BrokerError;
use crate::mailbox::Mailbox;
use crate::types::is_valid_id;

const FLAG_CONTENT: &str = "flag-file";

pub struct Admin {
    mailbox: Mailbox,
}

impl Admin {
    pub fn new(mailbox: Mailbox) -> Self {
        Self { mailbox }
    }

    #[inline]
    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// Provisions a session's directory tree. Idempotent.
    pub fn create_session(&self, session_id: &str) -> Result<(), BrokerError> {
        check_id(session_id)?;
        self.mailbox.ensure_session_dirs(session_id)
    }

    /// Deprovisions a session. Returns whether anything was removed.
    pub fn remove_session(&self, session_id: &str) -> Result<bool, BrokerError> {
        check_id(session_id)?;
        match fs::remove_dir_all(self.mailbox.session_path(session_id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes a channel's directory tree. Returns whether anything was
    /// removed; pending inbox entries are lost.
    pub fn remove_channel(&self, channel_id: &str) -> Result<bool, BrokerError> {
        check_id(channel_id)?;
        match fs::remove_dir_all(self.mailbox.channel_path(channel_id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Grants read permission: drops a flag file whose presence is the
    /// signal. Adding an existing permission is a no-op.
    pub fn add_readable(&self, session_id: &str, channel_id: &str) -> Result<(), BrokerError> {
        self.add_flag(self.mailbox.session_readable_path(session_id), session_id, channel_id)
    }

    /// Revokes read permission. Removing a non-existent permission is a
    /// no-op; returns whether a flag was actually removed.
    pub fn remove_readable(&self, session_id: &str, channel_id: &str) -> Result<bool, BrokerError> {
        self.remove_flag(self.mailbox.session_readable_path(session_id), session_id, channel_id)
    }

    pub fn add_writable(&self, session_id: &str, channel_id: &str) -> Result<(), BrokerError> {
        self.add_flag(self.mailbox.session_writable_path(session_id), session_id, channel_id)
    }

    pub fn remove_writable(&self, session_id: &str, channel_id: &str) -> Result<bool, BrokerError> {
        self.remove_flag(self.mailbox.session_writable_path(session_id), session_id, channel_id)
    }

    pub fn can_read(&self, session_id: &str, channel_id: &str) -> bool {
        self.mailbox.session_readable_path(session_id).join(channel_id).exists()
    }

    pub fn can_write(&self, session_id: &str, channel_id: &str) -> bool {
        self.mailbox.session_writable_path(session_id).join(channel_id).exists()
    }

    /// Publishes a payload to a channel's outbox: the producer-facing
    /// spool-then-rename operation.
    pub fn publish(&self, channel_id: &str, payload: &[u8]) -> Result<PathBuf, BrokerError> {
        check_id(channel_id)?;
        self.mailbox.publish(channel_id, payload, false)
    }

    /// Publishes into a channel's inbox instead, for external consumers.
    pub fn publish_inbox(&self, channel_id: &str, payload: &[u8]) -> Result<PathBuf, BrokerError> {
        check_id(channel_id)?;
        self.mailbox.publish(channel_id, payload, true)
    }

    fn add_flag(&self, dir: PathBuf, session_id: &str, channel_id: &str) -> Result<(), BrokerError> {
        check_id(session_id)?;
        check_id(channel_id)?;
        self.mailbox.ensure_session_dirs(session_id)?;
        fs::write(dir.join(channel_id), FLAG_CONTENT)?;
        Ok(())
    }

    fn remove_flag(
        &self,
        dir: PathBuf,
        session_id: &str,
        channel_id: &str,
    ) -> Result<bool, BrokerError> {
        check_id(session_id)?;
        check_id(channel_id)?;
        match fs::remove_file(dir.join(channel_id)) {
            Ok(()) => Ok(true),
            Err(_) => Ok(false),
        }
    }
}

fn check_id(id: &str) -> Result<(), BrokerError> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(BrokerError::InvalidId(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> (tempfile::TempDir, Admin) {
        let dir = tempfile::tempdir().expect("tempdir");
        let mailbox = Mailbox::open(dir.path()).expect("open");
        (dir, Admin::new(mailbox))
    }

    #[test]
    fn session_provisioning() {
        let (_dir, admin) = admin();
        admin.create_session("test").expect("create");
        let mailbox = admin.mailbox();
        assert!(mailbox.session_out_path("test").is_dir());
        assert!(mailbox.session_readable_path("test").is_dir());
        assert!(mailbox.session_writable_path("test").is_dir());

        assert!(admin.remove_session("test").expect("remove"));
        assert!(!admin.remove_session("test").expect("second remove"));
    }

    #[test]
    fn rejects_invalid_ids() {
        let (_dir, admin) = admin();
        assert!(matches!(admin.create_session("../oops"), Err(BrokerError::InvalidId(_))));
        assert!(matches!(admin.publish("a b", b"x"), Err(BrokerError::InvalidId(_))));
        assert!(matches!(admin.add_readable("ok", "no/pe"), Err(BrokerError::InvalidId(_))));
    }

    #[test]
    fn readable_flags_are_idempotent() {
        let (_dir, admin) = admin();
        admin.create_session("test").expect("create");
        assert!(!admin.can_read("test", "moo"));
        admin.add_readable("test", "moo").expect("add");
        admin.add_readable("test", "moo").expect("add again");
        assert!(admin.can_read("test", "moo"));
        assert!(admin.remove_readable("test", "moo").expect("remove"));
        assert!(!admin.remove_readable("test", "moo").expect("remove again"));
        assert!(!admin.can_read("test", "moo"));
    }

    #[test]
    fn writable_flags_are_idempotent() {
        let (_dir, admin) = admin();
        admin.create_session("test").expect("create");
        assert!(!admin.can_write("test", "moo"));
        admin.add_writable("test", "moo").expect("add");
        assert!(admin.can_write("test", "moo"));
        assert!(admin.remove_writable("test", "moo").expect("remove"));
        assert!(!admin.can_write("test", "moo"));
    }

    #[test]
    fn flag_add_provisions_session_dirs() {
        let (_dir, admin) = admin();
        // no explicit create_session first
        admin.add_readable("lazy", "moo").expect("add");
        assert!(admin.can_read("lazy", "moo"));
    }

    #[test]
    fn publish_lands_in_outbox() {
        let (_dir, admin) = admin();
        let path = admin.publish("moo", b"Vladivostok").expect("publish");
        assert_eq!(std::fs::read(&path).expect("read"), b"moo,Vladivostok");
    }
}
