//! The broker reactor: a single task owns the channel/session registry, the
//! directory watcher, and every piece of mutable state. Connection pumps and
//! the OS notification thread reach it only through event queues, so all
//! mutation is serialized by event-dispatch order.

use std::fs;
use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};

use crate::codec;
use crate::error::BrokerError;
use crate::mailbox::{Mailbox, Route};
use crate::types::{is_valid_id, timestamp_secs, ConnId, SessionId};
use crate::watch::{DirEvent, DirEventKind, DirWatcher};
use crate::Result;

pub mod channel;
pub mod session;

use channel::Channel;
use session::{ConnectionHandle, Session};

type HashMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;

#[derive(Clone, Debug)]
pub struct BrokerOptions {
    /// How often the reaper sweeps.
    pub reap_interval: Duration,
    /// Sessions/channels idle longer than this are evicted.
    pub staleness: Duration,
}

impl Default for BrokerOptions {
    fn default() -> Self {
        Self { reap_interval: Duration::from_secs(5 * 60), staleness: Duration::from_secs(2 * 60 * 60) }
    }
}

/// Everything the broker loop reacts to besides directory events and the
/// reaper tick.
pub enum BrokerEvent {
    Dir(DirEvent),
    /// A connection finished its transport handshake and claims a session.
    /// The registry never auto-creates sessions for connections; only ids
    /// provisioned on disk bind successfully.
    Attach {
        session_id: SessionId,
        conn: ConnectionHandle,
        reply: oneshot::Sender<std::result::Result<(), BrokerError>>,
    },
    /// One inbound client frame from a bound connection.
    Frame { session_id: SessionId, conn_id: ConnId, frame: Bytes },
    /// Transport gone.
    Detach { session_id: SessionId, conn_id: ConnId },
}

/// Cloneable producer side of the broker's event queue.
#[derive(Clone)]
pub struct BrokerHandle {
    tx: mpsc::UnboundedSender<BrokerEvent>,
}

impl BrokerHandle {
    /// Binds a connection to a session; resolves once the broker has
    /// processed the attach.
    pub async fn attach(
        &self,
        session_id: SessionId,
        conn: ConnectionHandle,
    ) -> std::result::Result<(), BrokerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(BrokerEvent::Attach { session_id, conn, reply })
            .map_err(|_| BrokerError::Msg("broker stopped".into()))?;
        rx.await.map_err(|_| BrokerError::Msg("broker stopped".into()))?
    }

    #[inline]
    pub fn frame(&self, session_id: SessionId, conn_id: ConnId, frame: Bytes) {
        let _ = self.tx.send(BrokerEvent::Frame { session_id, conn_id, frame });
    }

    #[inline]
    pub fn detach(&self, session_id: SessionId, conn_id: ConnId) {
        let _ = self.tx.send(BrokerEvent::Detach { session_id, conn_id });
    }

    #[inline]
    pub fn send(&self, event: BrokerEvent) {
        let _ = self.tx.send(event);
    }
}

pub struct Broker {
    tx: mpsc::UnboundedSender<BrokerEvent>,
    rx: mpsc::UnboundedReceiver<BrokerEvent>,
    dir_rx: mpsc::UnboundedReceiver<DirEvent>,
    reap_interval: Duration,
    state: State,
}

impl Broker {
    /// Builds the broker over an opened mailbox: watches the top-level
    /// session/channel directories and materializes whatever already exists
    /// on disk.
    pub fn new(mailbox: Mailbox, opts: BrokerOptions) -> Result<Self> {
        let (dir_tx, dir_rx) = mpsc::unbounded_channel();
        let mut watcher = DirWatcher::new(dir_tx)?;
        watcher.watch(&mailbox.sessions_path())?;
        watcher.watch(&mailbox.channels_path())?;

        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = State {
            mailbox,
            watcher,
            staleness: opts.staleness,
            channels: HashMap::default(),
            sessions: HashMap::default(),
        };
        for id in Mailbox::entry_names(&state.mailbox.channels_path()) {
            state.channel(&id, true);
        }
        for id in Mailbox::entry_names(&state.mailbox.sessions_path()) {
            state.session(&id, true);
        }

        Ok(Self { tx, rx, dir_rx, reap_interval: opts.reap_interval, state })
    }

    pub fn handle(&self) -> BrokerHandle {
        BrokerHandle { tx: self.tx.clone() }
    }

    /// The reactor loop. Runs until every handle is dropped.
    pub async fn run(self) {
        let Broker { tx, mut rx, mut dir_rx, reap_interval, mut state } = self;
        drop(tx);
        let mut tick = tokio::time::interval(reap_interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tick.tick().await; // the first tick completes immediately

        loop {
            tokio::select! {
                ev = rx.recv() => match ev {
                    Some(ev) => state.dispatch(ev),
                    None => break,
                },
                ev = dir_rx.recv() => match ev {
                    Some(ev) => state.on_dir_event(ev),
                    None => break,
                },
                _ = tick.tick() => state.reap(),
            }
        }
        log::info!("broker loop stopped");
    }
}

struct State {
    mailbox: Mailbox,
    watcher: DirWatcher,
    staleness: Duration,
    channels: HashMap<String, Channel>,
    sessions: HashMap<String, Session>,
}

impl State {
    fn dispatch(&mut self, event: BrokerEvent) {
        match event {
            BrokerEvent::Dir(ev) => self.on_dir_event(ev),
            BrokerEvent::Attach { session_id, conn, reply } => {
                let _ = reply.send(self.on_attach(&session_id, conn));
            }
            BrokerEvent::Frame { session_id, conn_id, frame } => {
                self.on_frame(&session_id, conn_id, &frame)
            }
            BrokerEvent::Detach { session_id, conn_id } => self.on_detach(&session_id, conn_id),
        }
    }

    fn on_dir_event(&mut self, ev: DirEvent) {
        let Some(route) = self.mailbox.route(&ev.path) else {
            return;
        };
        match (route, ev.kind) {
            (Route::ChannelRoot(id), DirEventKind::Created) => {
                self.channel(&id, true);
            }
            (Route::ChannelRoot(id), DirEventKind::Removed) => self.remove_channel(&id),
            (Route::SessionRoot(id), DirEventKind::Created) => {
                self.session(&id, true);
            }
            (Route::SessionRoot(id), DirEventKind::Removed) => self.remove_session(&id),
            (Route::ChannelOut { channel, entry }, DirEventKind::Created) => {
                self.fan_out(&channel, &entry)
            }
            // our own unlink after fan-out
            (Route::ChannelOut { .. }, DirEventKind::Removed) => {}
            (Route::Readable { session, channel }, kind) => {
                if let Some(s) = self.sessions.get_mut(&session) {
                    s.set_readable(&channel, kind == DirEventKind::Created);
                }
            }
            (Route::Writable { session, channel }, kind) => {
                if let Some(s) = self.sessions.get_mut(&session) {
                    s.set_writable(&channel, kind == DirEventKind::Created);
                }
            }
        }
    }

    /// Registry lookup, materializing the channel when `create` is set.
    /// Creation is idempotent per key; lookups with `create == false` never
    /// add state.
    fn channel(&mut self, channel_id: &str, create: bool) -> Option<&mut Channel> {
        if create && !self.channels.contains_key(channel_id) {
            if !is_valid_id(channel_id) {
                log::warn!("ignoring channel with invalid id: {channel_id:?}");
                return None;
            }
            match Channel::new(self.mailbox.clone(), channel_id.to_string()) {
                Ok(channel) => {
                    if let Err(e) = self.watcher.watch(&channel.out_path()) {
                        log::warn!("channel {channel_id}: watch failed: {e:?}");
                    }
                    log::info!("channel {channel_id} registered");
                    self.channels.insert(channel_id.to_string(), channel);
                }
                Err(e) => {
                    log::warn!("channel {channel_id}: setup failed: {e:?}");
                    return None;
                }
            }
        }
        self.channels.get_mut(channel_id)
    }

    /// Registry lookup for sessions, same create-flag semantics as
    /// [`State::channel`].
    fn session(&mut self, session_id: &str, create: bool) -> Option<&mut Session> {
        if create && !self.sessions.contains_key(session_id) {
            if !is_valid_id(session_id) {
                log::warn!("ignoring session with invalid id: {session_id:?}");
                return None;
            }
            match Session::new(self.mailbox.clone(), session_id.to_string()) {
                Ok(session) => {
                    for dir in [
                        self.mailbox.session_readable_path(session_id),
                        self.mailbox.session_writable_path(session_id),
                    ] {
                        if let Err(e) = self.watcher.watch(&dir) {
                            log::warn!("session {session_id}: watch {dir:?} failed: {e:?}");
                        }
                    }
                    log::info!("session {session_id} registered, {} queued", session.queued());
                    self.sessions.insert(session_id.to_string(), session);
                }
                Err(e) => {
                    log::warn!("session {session_id}: setup failed: {e:?}");
                    return None;
                }
            }
        }
        self.sessions.get_mut(session_id)
    }

    fn remove_channel(&mut self, channel_id: &str) {
        if let Some(channel) = self.channels.remove(channel_id) {
            self.watcher.unwatch(&channel.out_path());
            channel.cleanup();
            log::info!("channel {channel_id} removed");
        }
    }

    fn remove_session(&mut self, session_id: &str) {
        if let Some(mut session) = self.sessions.remove(session_id) {
            self.watcher.unwatch(&self.mailbox.session_readable_path(session_id));
            self.watcher.unwatch(&self.mailbox.session_writable_path(session_id));
            session.cleanup();
            log::info!("session {session_id} removed");
        }
    }

    /// Hard-links a freshly published message into the outgoing queue of
    /// every session subscribed to the channel, then deletes the original.
    /// Runs synchronously inside event dispatch; a large subscriber count
    /// blocks the loop proportionally, which the design accepts because the
    /// mailbox lives on a memory-backed filesystem.
    fn fan_out(&mut self, channel_id: &str, entry: &Path) {
        if let Some(channel) = self.channel(channel_id, true) {
            channel.touch();
        }
        let Some(file_name) = entry.file_name() else {
            return;
        };
        for session in self.sessions.values_mut() {
            if !session.can_read(channel_id) {
                continue;
            }
            let target = session.out_path().join(file_name);
            match fs::hard_link(entry, &target) {
                Ok(()) => session.add_message(target),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    log::debug!("duplicate message id {file_name:?} for session {}", session.id());
                }
                Err(e) => log::warn!("fan-out link to {target:?} failed: {e:?}"),
            }
        }
        // zero subscribers still deletes the original
        if let Err(e) = fs::remove_file(entry) {
            log::debug!("fan-out unlink {entry:?}: {e:?}");
        }
    }

    /// Connection binding. A session is accepted if it is already in memory,
    /// or provisioned on disk but not yet materialized; never fabricated.
    fn on_attach(
        &mut self,
        session_id: &str,
        conn: ConnectionHandle,
    ) -> std::result::Result<(), BrokerError> {
        if !is_valid_id(session_id) {
            return Err(BrokerError::InvalidId(session_id.to_string()));
        }
        let session = if self.sessions.contains_key(session_id) {
            self.sessions.get_mut(session_id)
        } else if self.mailbox.session_path(session_id).is_dir() {
            self.session(session_id, true)
        } else {
            None
        };
        match session {
            Some(session) => {
                session.attach(conn);
                Ok(())
            }
            None => Err(BrokerError::SessionUnknown(session_id.to_string())),
        }
    }

    fn on_frame(&mut self, session_id: &str, conn_id: ConnId, frame: &[u8]) {
        if !self.sessions.contains_key(session_id) {
            log::debug!("frame for vanished session {session_id}");
            return;
        }
        match codec::split(frame) {
            None => {
                log::info!("session {session_id}: malformed frame");
                self.send_to(session_id, conn_id, codec::error("malformed frame"));
            }
            // reserved protocol-level frame, currently nothing
            Some(("", _payload)) => {}
            Some((token, _payload)) if !is_valid_id(token) => {
                log::info!("session {session_id}: invalid channel {token:?}");
                self.send_to(session_id, conn_id, codec::error("invalid channel"));
                if let Some(session) = self.sessions.get(session_id) {
                    if let Some(conn) = session.conn(conn_id) {
                        conn.close();
                    }
                }
                return;
            }
            Some((token, payload)) => {
                // permission gate comes first: a denied write must not
                // materialize the target channel
                let permitted =
                    self.sessions.get(session_id).map(|s| s.can_write(token)).unwrap_or(false);
                if !permitted {
                    log::info!("channel {token} is not writable for session {session_id}");
                    self.send_to(session_id, conn_id, codec::error("channel not writable"));
                } else {
                    self.channel(token, true);
                    let result =
                        match (self.sessions.get_mut(session_id), self.channels.get_mut(token)) {
                            (Some(session), Some(channel)) => {
                                Some(session.on_incoming(channel, payload))
                            }
                            _ => None,
                        };
                    match result {
                        Some(Ok(path)) => log::debug!("session {session_id} -> {token}: {path:?}"),
                        Some(Err(e @ BrokerError::NotWritable { .. })) => {
                            log::info!("{e}");
                            self.send_to(session_id, conn_id, codec::error("channel not writable"));
                        }
                        Some(Err(e)) => {
                            log::error!("session {session_id} -> {token}: publish failed: {e}");
                            self.send_to(session_id, conn_id, codec::error("write failed"));
                        }
                        None => {}
                    }
                }
            }
        }
        // processing any frame as a bound connection makes it ready
        if let Some(session) = self.sessions.get_mut(session_id) {
            if session.mark_ready(conn_id) {
                session.send_pending();
            }
        }
    }

    fn on_detach(&mut self, session_id: &str, conn_id: ConnId) {
        if let Some(session) = self.sessions.get_mut(session_id) {
            session.detach(conn_id);
        }
    }

    fn send_to(&self, session_id: &str, conn_id: ConnId, data: Bytes) {
        if let Some(conn) = self.sessions.get(session_id).and_then(|s| s.conn(conn_id)) {
            conn.send(data);
        }
    }

    /// Periodic eviction of sessions/channels inactive past the staleness
    /// threshold. A stale session with live connections is left alone: an
    /// open connection with no traffic is not abandoned.
    fn reap(&mut self) {
        let deadline = timestamp_secs() - self.staleness.as_secs() as i64;

        let stale_sessions: Vec<String> = self
            .sessions
            .values()
            .filter(|s| s.last_active() < deadline)
            .map(|s| s.id().to_string())
            .collect();
        for id in stale_sessions {
            if self.sessions.get(&id).map(Session::has_connections).unwrap_or(false) {
                log::info!("session {id} is stale but has live connections, skipping");
                continue;
            }
            log::info!("reaping stale session {id}");
            self.remove_session(&id);
        }

        let stale_channels: Vec<String> = self
            .channels
            .values()
            .filter(|c| c.last_active() < deadline)
            .map(|c| c.id().to_string())
            .collect();
        for id in stale_channels {
            log::info!("reaping stale channel {id}");
            self.remove_channel(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::session::ConnEvent;
    use crate::Admin;

    fn broker() -> (tempfile::TempDir, Broker) {
        let dir = tempfile::tempdir().expect("tempdir");
        let mailbox = Mailbox::open(dir.path()).expect("open");
        let broker = Broker::new(mailbox, BrokerOptions::default()).expect("broker");
        (dir, broker)
    }

    fn conn(id: ConnId) -> (ConnectionHandle, mpsc::UnboundedReceiver<ConnEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ConnectionHandle::new(id, tx), rx)
    }

    fn recv_data(rx: &mut mpsc::UnboundedReceiver<ConnEvent>) -> Bytes {
        match rx.try_recv().expect("pending event") {
            ConnEvent::Data(data) => data,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn attach_never_creates_sessions() {
        let (_dir, mut broker) = broker();
        let (handle, _rx) = conn(1);
        let err = broker.state.on_attach("ghost", handle).expect_err("unknown session");
        assert!(matches!(err, BrokerError::SessionUnknown(_)));
        assert!(broker.state.sessions.is_empty());

        let (handle, _rx) = conn(2);
        let err = broker.state.on_attach("not/an/id", handle).expect_err("invalid id");
        assert!(matches!(err, BrokerError::InvalidId(_)));
    }

    #[tokio::test]
    async fn attach_materializes_provisioned_session_from_disk() {
        let (_dir, mut broker) = broker();
        // provisioned externally, no directory event delivered
        broker.state.mailbox.ensure_session_dirs("alice").expect("provision");
        let (handle, _rx) = conn(1);
        broker.state.on_attach("alice", handle).expect("attach");
        assert!(broker.state.sessions.contains_key("alice"));
    }

    #[tokio::test]
    async fn fan_out_reaches_only_readable_sessions() {
        let (_dir, mut broker) = broker();
        let admin = Admin::new(broker.state.mailbox.clone());
        admin.create_session("alice").expect("alice");
        admin.create_session("bob").expect("bob");
        admin.add_readable("alice", "news").expect("flag");
        broker.state.session("alice", true).unwrap();
        broker.state.session("bob", true).unwrap();

        let entry = broker.state.mailbox.publish("news", b"hello", false).expect("publish");
        broker.state.on_dir_event(DirEvent { path: entry.clone(), kind: DirEventKind::Created });

        assert_eq!(broker.state.sessions["alice"].queued(), 1);
        assert_eq!(broker.state.sessions["bob"].queued(), 0);
        // the original is gone even though bob ignored it
        assert!(!entry.exists());
    }

    #[tokio::test]
    async fn fan_out_with_zero_subscribers_still_unlinks() {
        let (_dir, mut broker) = broker();
        let entry = broker.state.mailbox.publish("lonely", b"void", false).expect("publish");
        broker.state.on_dir_event(DirEvent { path: entry.clone(), kind: DirEventKind::Created });
        assert!(!entry.exists());
    }

    #[tokio::test]
    async fn permission_flag_events_reconverge_cache() {
        let (_dir, mut broker) = broker();
        let admin = Admin::new(broker.state.mailbox.clone());
        admin.create_session("alice").expect("alice");
        broker.state.session("alice", true).unwrap();
        assert!(!broker.state.sessions["alice"].can_read("news"));

        admin.add_readable("alice", "news").expect("flag");
        let flag = broker.state.mailbox.session_readable_path("alice").join("news");
        broker.state.on_dir_event(DirEvent { path: flag.clone(), kind: DirEventKind::Created });
        assert!(broker.state.sessions["alice"].can_read("news"));

        broker.state.on_dir_event(DirEvent { path: flag, kind: DirEventKind::Removed });
        assert!(!broker.state.sessions["alice"].can_read("news"));
    }

    #[tokio::test]
    async fn end_to_end_scenario() {
        // provision alice with readable=news writable=chat, publish to news,
        // connect, expect welcome-then-backlog and a working chat write
        let (_dir, mut broker) = broker();
        let admin = Admin::new(broker.state.mailbox.clone());
        admin.create_session("alice").expect("alice");
        admin.add_readable("alice", "news").expect("readable");
        admin.add_writable("alice", "chat").expect("writable");

        let entry = admin.publish("news", b"hello").expect("publish");
        broker.state.session("alice", true).unwrap();
        broker.state.on_dir_event(DirEvent { path: entry, kind: DirEventKind::Created });

        let (handle, mut rx) = conn(1);
        broker.state.on_attach("alice", handle).expect("attach");
        assert_eq!(broker.state.sessions["alice"].queued(), 1, "queued until ready");

        // first frame (reserved protocol frame) makes the connection ready
        broker.state.on_frame("alice", 1, b",");
        assert_eq!(recv_data(&mut rx).as_ref(), b"news,hello");

        // permitted write lands in the chat inbox
        broker.state.on_frame("alice", 1, b"chat,hi");
        let inbox = Mailbox::ordered_entries(&broker.state.mailbox.channel_in_path("chat"))
            .expect("inbox listing");
        assert_eq!(inbox.len(), 1);
        assert_eq!(fs::read(&inbox[0]).expect("read"), b"chat,hi");

        // news is readable but not writable: error frame, connection stays
        broker.state.on_frame("alice", 1, b"news,hi");
        assert_eq!(recv_data(&mut rx).as_ref(), br#",{"error":true,"message":"channel not writable"}"#);
        assert!(broker.state.sessions["alice"].has_connections());

        // malformed frame: error frame, connection stays
        broker.state.on_frame("alice", 1, b"no delimiter");
        assert_eq!(recv_data(&mut rx).as_ref(), br#",{"error":true,"message":"malformed frame"}"#);
        assert!(rx.try_recv().is_err());

        // invalid channel id: error frame then forced close
        broker.state.on_frame("alice", 1, b"bad/channel,hi");
        assert_eq!(recv_data(&mut rx).as_ref(), br#",{"error":true,"message":"invalid channel"}"#);
        assert!(matches!(rx.try_recv().expect("close"), ConnEvent::Close));
    }

    #[tokio::test]
    async fn denied_write_does_not_create_channel() {
        let (_dir, mut broker) = broker();
        let admin = Admin::new(broker.state.mailbox.clone());
        admin.create_session("alice").expect("alice");
        broker.state.session("alice", true).unwrap();

        let (handle, mut rx) = conn(1);
        broker.state.on_attach("alice", handle).expect("attach");
        broker.state.on_frame("alice", 1, b"sneaky,hi");

        assert_eq!(recv_data(&mut rx).as_ref(), br#",{"error":true,"message":"channel not writable"}"#);
        assert!(!broker.state.channels.contains_key("sneaky"));
        assert!(!broker.state.mailbox.channel_path("sneaky").exists());

        // a permitted write to the same channel still materializes it
        admin.add_writable("alice", "sneaky").expect("flag");
        let flag = broker.state.mailbox.session_writable_path("alice").join("sneaky");
        broker.state.on_dir_event(DirEvent { path: flag, kind: DirEventKind::Created });
        broker.state.on_frame("alice", 1, b"sneaky,hi");
        assert!(broker.state.channels.contains_key("sneaky"));
    }

    #[tokio::test]
    async fn reap_evicts_idle_but_spares_connected() {
        let (_dir, mut broker) = broker();
        let admin = Admin::new(broker.state.mailbox.clone());
        admin.create_session("idle").expect("idle");
        admin.create_session("connected").expect("connected");
        broker.state.session("idle", true).unwrap();
        broker.state.session("connected", true).unwrap();
        let (handle, _rx) = conn(1);
        broker.state.on_attach("connected", handle).expect("attach");

        let ancient = timestamp_secs() - 10 * 60 * 60;
        broker.state.sessions.get_mut("idle").unwrap().force_last_active(ancient);
        broker.state.sessions.get_mut("connected").unwrap().force_last_active(ancient);
        broker.state.channel("stale-channel", true).unwrap().force_last_active(ancient);

        broker.state.reap();

        assert!(!broker.state.sessions.contains_key("idle"));
        assert!(broker.state.sessions.contains_key("connected"));
        assert!(!broker.state.channels.contains_key("stale-channel"));
        assert!(!broker.state.mailbox.session_path("idle").exists());
        assert!(broker.state.mailbox.session_path("connected").exists());
    }

    #[tokio::test]
    async fn directory_events_drive_the_registry() {
        let (_dir, mut broker) = broker();
        let mailbox = broker.state.mailbox.clone();
        mailbox.ensure_channel_dirs("news").expect("provision channel");
        broker
            .state
            .on_dir_event(DirEvent { path: mailbox.channel_path("news"), kind: DirEventKind::Created });
        assert!(broker.state.channels.contains_key("news"));

        broker
            .state
            .on_dir_event(DirEvent { path: mailbox.channel_path("news"), kind: DirEventKind::Removed });
        assert!(!broker.state.channels.contains_key("news"));
        assert!(!mailbox.channel_path("news").exists());
    }

    #[tokio::test]
    async fn startup_scan_materializes_existing_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mailbox = Mailbox::open(dir.path()).expect("open");
        let admin = Admin::new(mailbox.clone());
        admin.create_session("alice").expect("alice");
        mailbox.ensure_channel_dirs("news").expect("channel");

        let broker = Broker::new(mailbox, BrokerOptions::default()).expect("broker");
        assert!(broker.state.sessions.contains_key("alice"));
        assert!(broker.state.channels.contains_key("news"));
    }
}
