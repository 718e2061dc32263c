use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::BrokerError;
use crate::types::{ChannelId, SessionId};

const SPOOL_DIR: &str = ".tmp";
const SESSIONS_DIR: &str = "session";
const CHANNELS_DIR: &str = "channel";

/// The on-disk mailbox contract shared by the broker and external producers.
///
/// All path computation and the spool-then-rename publish primitive live
/// here. Directory creation is idempotent and safe to call repeatedly; a
/// rename of a file into a watched directory is the sole publication signal;
/// a hard link has independent deletion lifetime from its source.
#[derive(Clone, Debug)]
pub struct Mailbox {
    base: PathBuf,
}

/// What a filesystem event under the mailbox tree means to the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Entry under `<base>/channel/`: a channel appeared or vanished.
    ChannelRoot(ChannelId),
    /// Entry under `<base>/session/`: a session appeared or vanished.
    SessionRoot(SessionId),
    /// Entry under `<base>/channel/<id>/out/`: a message awaiting fan-out.
    ChannelOut { channel: ChannelId, entry: PathBuf },
    /// Flag file under `<base>/session/<id>/readable/`.
    Readable { session: SessionId, channel: ChannelId },
    /// Flag file under `<base>/session/<id>/writable/`.
    Writable { session: SessionId, channel: ChannelId },
}

impl Mailbox {
    /// Opens the mailbox rooted at `base`, creating the top-level structure.
    ///
    /// This is the one operation whose failure is expected to abort process
    /// startup.
    pub fn open<P: Into<PathBuf>>(base: P) -> Result<Self, BrokerError> {
        let mailbox = Mailbox { base: base.into() };
        ensure_dirs(&[mailbox.spool_path(), mailbox.sessions_path(), mailbox.channels_path()])?;
        Ok(mailbox)
    }

    #[inline]
    pub fn base(&self) -> &Path {
        &self.base
    }

    #[inline]
    pub fn spool_path(&self) -> PathBuf {
        self.base.join(SPOOL_DIR)
    }

    #[inline]
    pub fn sessions_path(&self) -> PathBuf {
        self.base.join(SESSIONS_DIR)
    }

    #[inline]
    pub fn channels_path(&self) -> PathBuf {
        self.base.join(CHANNELS_DIR)
    }

    #[inline]
    pub fn session_path(&self, session_id: &str) -> PathBuf {
        self.sessions_path().join(session_id)
    }

    #[inline]
    pub fn session_out_path(&self, session_id: &str) -> PathBuf {
        self.session_path(session_id).join("out")
    }

    #[inline]
    pub fn session_readable_path(&self, session_id: &str) -> PathBuf {
        self.session_path(session_id).join("readable")
    }

    #[inline]
    pub fn session_writable_path(&self, session_id: &str) -> PathBuf {
        self.session_path(session_id).join("writable")
    }

    #[inline]
    pub fn channel_path(&self, channel_id: &str) -> PathBuf {
        self.channels_path().join(channel_id)
    }

    #[inline]
    pub fn channel_in_path(&self, channel_id: &str) -> PathBuf {
        self.channel_path(channel_id).join("in")
    }

    #[inline]
    pub fn channel_out_path(&self, channel_id: &str) -> PathBuf {
        self.channel_path(channel_id).join("out")
    }

    /// Creates a session's directory tree. Idempotent.
    pub fn ensure_session_dirs(&self, session_id: &str) -> Result<(), BrokerError> {
        ensure_dirs(&[
            self.session_out_path(session_id),
            self.session_readable_path(session_id),
            self.session_writable_path(session_id),
        ])
    }

    /// Creates a channel's directory tree. Idempotent.
    pub fn ensure_channel_dirs(&self, channel_id: &str) -> Result<(), BrokerError> {
        ensure_dirs(&[self.channel_in_path(channel_id), self.channel_out_path(channel_id)])
    }

    /// Collision-resistant message id, used as the file name for the whole
    /// life of the message.
    #[inline]
    pub fn new_message_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// Writes `<channel_id>,<payload>` to a private spool file, then
    /// atomically renames it into the channel's `out/` (or `in/`) directory.
    ///
    /// On any failure both the staging and target paths are cleaned up on a
    /// best-effort basis and the returned error carries the original payload
    /// for caller-side retry.
    pub fn publish(&self, channel_id: &str, payload: &[u8], inbox: bool) -> Result<PathBuf, BrokerError> {
        self.ensure_channel_dirs(channel_id)?;
        let message_id = Self::new_message_id();
        let staging = self.spool_path().join(&message_id);
        let target = if inbox {
            self.channel_in_path(channel_id).join(&message_id)
        } else {
            self.channel_out_path(channel_id).join(&message_id)
        };

        let mut framed = Vec::with_capacity(channel_id.len() + 1 + payload.len());
        framed.extend_from_slice(channel_id.as_bytes());
        framed.push(b',');
        framed.extend_from_slice(payload);

        let res = fs::write(&staging, &framed).and_then(|_| fs::rename(&staging, &target));
        if let Err(e) = res {
            for p in [&staging, &target] {
                let _ = fs::remove_file(p);
            }
            return Err(BrokerError::write(e, payload));
        }
        Ok(target)
    }

    /// Directory listing ordered by modification time, oldest first.
    ///
    /// Entries that vanish between listing and stat are skipped, someone
    /// else already handled them.
    pub fn ordered_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut entries: Vec<(PathBuf, SystemTime)> = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            if let Ok(meta) = entry.metadata() {
                let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                entries.push((entry.path(), mtime));
            }
        }
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(entries.into_iter().map(|(p, _)| p).collect())
    }

    /// Plain directory listing of entry names, vanished entries tolerated.
    pub fn entry_names(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(read) = fs::read_dir(dir) {
            for entry in read.flatten() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// Classifies a watched-path event into the component it belongs to.
    ///
    /// Returns `None` for paths outside the mailbox contract (including the
    /// spool directory, which is deliberately unwatched).
    pub fn route(&self, path: &Path) -> Option<Route> {
        let rel = path.strip_prefix(&self.base).ok()?;
        let mut parts = rel.iter().filter_map(|p| p.to_str());
        match (parts.next()?, parts.next(), parts.next(), parts.next(), parts.next()) {
            (CHANNELS_DIR, Some(ch), None, _, _) => Some(Route::ChannelRoot(ch.to_string())),
            (CHANNELS_DIR, Some(ch), Some("out"), Some(_entry), None) => {
                Some(Route::ChannelOut { channel: ch.to_string(), entry: path.to_path_buf() })
            }
            (SESSIONS_DIR, Some(s), None, _, _) => Some(Route::SessionRoot(s.to_string())),
            (SESSIONS_DIR, Some(s), Some("readable"), Some(ch), None) => {
                Some(Route::Readable { session: s.to_string(), channel: ch.to_string() })
            }
            (SESSIONS_DIR, Some(s), Some("writable"), Some(ch), None) => {
                Some(Route::Writable { session: s.to_string(), channel: ch.to_string() })
            }
            _ => None,
        }
    }
}

fn ensure_dirs(directories: &[PathBuf]) -> Result<(), BrokerError> {
    for directory in directories {
        fs::create_dir_all(directory)?;
    }
    Ok(())
}
