use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::broker::channel::Channel;
use crate::error::BrokerError;
use crate::mailbox::Mailbox;
use crate::types::{timestamp_secs, ChannelId, ConnId, SessionId, Timestamp};

type HashSet<T> = std::collections::HashSet<T, ahash::RandomState>;

/// Bytes pushed to a connection pump by the session's delivery step.
#[derive(Debug)]
pub enum ConnEvent {
    Data(Bytes),
    Close,
}

/// The broker-side handle to one live connection: an outbound byte queue
/// plus the readiness flag.
///
/// A connection becomes ready, eligible for queued deliveries, only after it
/// has processed at least one inbound frame as a bound connection.
pub struct ConnectionHandle {
    id: ConnId,
    tx: mpsc::UnboundedSender<ConnEvent>,
    ready: bool,
}

impl ConnectionHandle {
    pub fn new(id: ConnId, tx: mpsc::UnboundedSender<ConnEvent>) -> Self {
        Self { id, tx, ready: false }
    }

    #[inline]
    pub fn id(&self) -> ConnId {
        self.id
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Queues bytes for the pump. A send error means the pump is already
    /// gone; the detach event will clean up shortly.
    #[inline]
    pub fn send(&self, data: Bytes) {
        if let Err(e) = self.tx.send(ConnEvent::Data(data)) {
            log::debug!("connection {} send: {:?}", self.id, e);
        }
    }

    /// Asks the pump to close the transport.
    #[inline]
    pub fn close(&self) {
        let _ = self.tx.send(ConnEvent::Close);
    }
}

/// One client principal: permission state (a cache of the readable/writable
/// flag files), the FIFO delivery queue, and zero or more attached live
/// connections.
pub struct Session {
    id: SessionId,
    mailbox: Mailbox,
    readable: HashSet<ChannelId>,
    writable: HashSet<ChannelId>,
    queue: VecDeque<PathBuf>,
    connections: Vec<ConnectionHandle>,
    last_active: Timestamp,
}

impl Session {
    /// Materializes a session: creates its directories, loads the current
    /// permission flags, and seeds the queue with any backlog left in the
    /// outgoing directory (oldest first).
    pub(crate) fn new(mailbox: Mailbox, id: SessionId) -> Result<Self, BrokerError> {
        mailbox.ensure_session_dirs(&id)?;
        let queue: VecDeque<PathBuf> =
            Mailbox::ordered_entries(&mailbox.session_out_path(&id))?.into_iter().collect();
        let readable = Mailbox::entry_names(&mailbox.session_readable_path(&id)).into_iter().collect();
        let writable = Mailbox::entry_names(&mailbox.session_writable_path(&id)).into_iter().collect();
        Ok(Self { id, mailbox, readable, writable, queue, connections: Vec::new(), last_active: timestamp_secs() })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn last_active(&self) -> Timestamp {
        self.last_active
    }

    #[inline]
    pub(crate) fn touch(&mut self) {
        self.last_active = timestamp_secs();
    }

    #[inline]
    pub fn can_read(&self, channel_id: &str) -> bool {
        self.readable.contains(channel_id)
    }

    #[inline]
    pub fn can_write(&self, channel_id: &str) -> bool {
        self.writable.contains(channel_id)
    }

    #[inline]
    pub fn out_path(&self) -> PathBuf {
        self.mailbox.session_out_path(&self.id)
    }

    #[inline]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Reconverges the readable cache with a flag-file event.
    pub(crate) fn set_readable(&mut self, channel_id: &str, present: bool) {
        if present {
            self.readable.insert(channel_id.to_string());
        } else {
            self.readable.remove(channel_id);
        }
    }

    /// Reconverges the writable cache with a flag-file event.
    pub(crate) fn set_writable(&mut self, channel_id: &str, present: bool) {
        if present {
            self.writable.insert(channel_id.to_string());
        } else {
            self.writable.remove(channel_id);
        }
    }

    /// Appends a freshly hard-linked message (already inside this session's
    /// outgoing directory) to the queue and triggers delivery.
    pub fn add_message(&mut self, path: PathBuf) {
        log::debug!("session {}: queueing {:?}", self.id, path.file_name());
        self.queue.push_back(path);
        self.touch();
        self.send_pending();
    }

    /// Delivers every queued message to all currently-ready connections,
    /// then retires it. At most one delivery attempt per message: retirement
    /// means "attempted send", not "confirmed delivered". With no ready
    /// connection the queue is left intact for the next trigger.
    ///
    /// The queue is a FIFO contract: messages go out in enqueue order.
    pub fn send_pending(&mut self) {
        if !self.connections.iter().any(ConnectionHandle::is_ready) {
            return;
        }
        while let Some(path) = self.queue.pop_front() {
            match fs::read(&path) {
                Ok(data) => {
                    let data = Bytes::from(data);
                    for conn in self.connections.iter().filter(|c| c.is_ready()) {
                        conn.send(data.clone());
                    }
                }
                // vanished from a race, someone else already handled it
                Err(e) => log::debug!("session {}: read {:?}: {:?}", self.id, path, e),
            }
            self.retire_message(&path);
        }
    }

    /// Deletes a delivered (or abandoned) message file. Delete failure is
    /// tolerated; activity is updated either way.
    pub fn retire_message(&mut self, path: &Path) {
        if let Some(idx) = self.queue.iter().position(|p| p == path) {
            self.queue.remove(idx);
        }
        if let Err(e) = fs::remove_file(path) {
            log::debug!("session {}: retire {:?}: {:?}", self.id, path, e);
        }
        self.touch();
    }

    /// Permission-checks an inbound client frame and, if allowed, publishes
    /// it into the target channel's inbox.
    pub fn on_incoming(&mut self, channel: &mut Channel, payload: &[u8]) -> Result<PathBuf, BrokerError> {
        if !self.writable.contains(channel.id()) {
            return Err(BrokerError::NotWritable {
                session: self.id.clone(),
                channel: channel.id().to_string(),
            });
        }
        self.touch();
        channel.publish_inbox(payload)
    }

    pub(crate) fn attach(&mut self, conn: ConnectionHandle) {
        log::debug!("session {}: connection {} attached", self.id, conn.id());
        self.connections.push(conn);
        self.touch();
    }

    /// Removes a connection from the list; idempotent if already removed.
    pub(crate) fn detach(&mut self, conn_id: ConnId) {
        self.connections.retain(|c| c.id() != conn_id);
    }

    /// Marks a connection ready. Returns true if this was its first frame.
    pub(crate) fn mark_ready(&mut self, conn_id: ConnId) -> bool {
        for conn in self.connections.iter_mut() {
            if conn.id() == conn_id && !conn.ready {
                conn.ready = true;
                return true;
            }
        }
        false
    }

    #[inline]
    pub fn has_connections(&self) -> bool {
        !self.connections.is_empty()
    }

    #[inline]
    pub(crate) fn conn(&self, conn_id: ConnId) -> Option<&ConnectionHandle> {
        self.connections.iter().find(|c| c.id() == conn_id)
    }

    #[cfg(test)]
    pub(crate) fn force_last_active(&mut self, ts: Timestamp) {
        self.last_active = ts;
    }

    /// Forcibly disconnects every attached connection and removes the
    /// session's directory subtree.
    pub(crate) fn cleanup(&mut self) {
        for conn in self.connections.drain(..) {
            conn.close();
        }
        if let Err(e) = fs::remove_dir_all(self.mailbox.session_path(&self.id)) {
            log::debug!("session {} cleanup: {:?}", self.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(mailbox: &Mailbox, id: &str) -> Session {
        Session::new(mailbox.clone(), id.to_string()).expect("session")
    }

    fn mailbox() -> (tempfile::TempDir, Mailbox) {
        let dir = tempfile::tempdir().expect("tempdir");
        let mailbox = Mailbox::open(dir.path()).expect("open");
        (dir, mailbox)
    }

    fn queue_message(session: &mut Session, content: &[u8]) {
        let target = session.out_path().join(Mailbox::new_message_id());
        fs::write(&target, content).expect("write");
        session.add_message(target);
    }

    #[test]
    fn messages_queue_without_ready_connection() {
        let (_dir, mailbox) = mailbox();
        let mut s = session(&mailbox, "alice");
        queue_message(&mut s, b"news,one");
        queue_message(&mut s, b"news,two");
        assert_eq!(s.queued(), 2);
    }

    #[tokio::test]
    async fn delivery_is_fifo_to_all_ready_connections() {
        let (_dir, mailbox) = mailbox();
        let mut s = session(&mailbox, "alice");
        queue_message(&mut s, b"news,one");
        queue_message(&mut s, b"news,two");

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        s.attach(ConnectionHandle::new(1, tx1));
        s.attach(ConnectionHandle::new(2, tx2));
        assert_eq!(s.queued(), 2, "no delivery before readiness");

        assert!(s.mark_ready(1));
        s.send_pending();
        assert_eq!(s.queued(), 0);

        for expected in [&b"news,one"[..], &b"news,two"[..]] {
            match rx1.try_recv().expect("frame") {
                ConnEvent::Data(data) => assert_eq!(data.as_ref(), expected),
                other => panic!("unexpected {other:?}"),
            }
        }
        // the second connection never became ready
        assert!(rx2.try_recv().is_err());
        // delivered files are retired
        assert!(Mailbox::entry_names(&s.out_path()).is_empty());
    }

    #[tokio::test]
    async fn late_connection_gets_nothing_retroactively() {
        let (_dir, mailbox) = mailbox();
        let mut s = session(&mailbox, "alice");
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        s.attach(ConnectionHandle::new(1, tx1));
        s.mark_ready(1);
        queue_message(&mut s, b"news,gone");
        match rx1.try_recv().expect("frame") {
            ConnEvent::Data(data) => assert_eq!(data.as_ref(), b"news,gone"),
            other => panic!("unexpected {other:?}"),
        }

        let (tx2, mut rx2) = mpsc::unbounded_channel();
        s.attach(ConnectionHandle::new(2, tx2));
        s.mark_ready(2);
        s.send_pending();
        assert!(rx2.try_recv().is_err());
    }

    #[test]
    fn backlog_seeded_in_creation_order() {
        let (_dir, mailbox) = mailbox();
        mailbox.ensure_session_dirs("alice").expect("dirs");
        for (name, secs) in [("m2", 200u64), ("m1", 100)] {
            let p = mailbox.session_out_path("alice").join(name);
            fs::write(&p, name).expect("write");
            let f = fs::File::options().write(true).open(&p).expect("open");
            f.set_modified(std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(secs))
                .expect("mtime");
        }
        let s = session(&mailbox, "alice");
        let names: Vec<_> =
            s.queue.iter().map(|p| p.file_name().unwrap().to_string_lossy().to_string()).collect();
        assert_eq!(names, vec!["m1", "m2"]);
    }

    #[test]
    fn retire_tolerates_missing_file() {
        let (_dir, mailbox) = mailbox();
        let mut s = session(&mailbox, "alice");
        s.retire_message(Path::new("/nonexistent/message"));
    }

    #[test]
    fn permission_cache_converges() {
        let (_dir, mailbox) = mailbox();
        let mut s = session(&mailbox, "alice");
        assert!(!s.can_read("news"));
        s.set_readable("news", true);
        s.set_readable("news", true); // idempotent
        assert!(s.can_read("news"));
        s.set_readable("news", false);
        assert!(!s.can_read("news"));
        // removing an absent flag is a no-op
        s.set_writable("chat", false);
        assert!(!s.can_write("chat"));
    }

    #[test]
    fn incoming_write_checks_permission() {
        let (_dir, mailbox) = mailbox();
        let mut s = session(&mailbox, "alice");
        let mut chat = Channel::new(mailbox.clone(), "chat".into()).expect("channel");
        let err = s.on_incoming(&mut chat, b"hi").expect_err("not writable");
        assert!(matches!(err, BrokerError::NotWritable { .. }));

        s.set_writable("chat", true);
        let path = s.on_incoming(&mut chat, b"hi").expect("writable");
        assert_eq!(fs::read(&path).expect("read"), b"chat,hi");
        assert!(path.starts_with(mailbox.channel_in_path("chat")));
    }

    #[tokio::test]
    async fn detach_is_idempotent() {
        let (_dir, mailbox) = mailbox();
        let mut s = session(&mailbox, "alice");
        let (tx, _rx) = mpsc::unbounded_channel();
        s.attach(ConnectionHandle::new(7, tx));
        s.detach(7);
        s.detach(7);
        assert!(!s.has_connections());
    }

    #[tokio::test]
    async fn cleanup_closes_connections_and_removes_tree() {
        let (_dir, mailbox) = mailbox();
        let mut s = session(&mailbox, "alice");
        let (tx, mut rx) = mpsc::unbounded_channel();
        s.attach(ConnectionHandle::new(1, tx));
        s.cleanup();
        assert!(matches!(rx.try_recv().expect("event"), ConnEvent::Close));
        assert!(!mailbox.session_path("alice").exists());
    }
}
