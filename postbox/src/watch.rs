//! Directory-change notification as an event source.
//!
//! Wraps the platform watcher behind a "watch(path) -> stream of
//! created/removed entry events" surface so the broker never sees the OS
//! facility directly. Events for a single watched directory are forwarded in
//! the order the underlying mechanism reports them; no stronger ordering is
//! promised.

use std::path::{Path, PathBuf};

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirEventKind {
    /// Entry created in, or renamed into, a watched directory.
    Created,
    /// Entry removed from, or renamed out of, a watched directory.
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEvent {
    pub path: PathBuf,
    pub kind: DirEventKind,
}

/// Owns one OS watcher and forwards entry events into an mpsc queue
/// consumed by the broker loop.
pub struct DirWatcher {
    inner: RecommendedWatcher,
}

impl DirWatcher {
    pub fn new(tx: mpsc::UnboundedSender<DirEvent>) -> Result<Self> {
        let inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        log::warn!("watcher error: {e:?}");
                        return;
                    }
                };
                for ev in translate(event) {
                    // Receiver gone means the broker is shutting down.
                    if tx.send(ev).is_err() {
                        return;
                    }
                }
            },
            notify::Config::default(),
        )?;
        Ok(Self { inner })
    }

    /// Starts watching a single directory (non-recursive).
    pub fn watch(&mut self, path: &Path) -> Result<()> {
        self.inner.watch(path, RecursiveMode::NonRecursive)?;
        Ok(())
    }

    /// Stops watching a directory. Unknown paths are tolerated, the
    /// directory may already be gone along with its watch.
    pub fn unwatch(&mut self, path: &Path) {
        if let Err(e) = self.inner.unwatch(path) {
            log::debug!("unwatch {:?}: {:?}", path, e);
        }
    }
}

fn translate(event: Event) -> Vec<DirEvent> {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event
            .paths
            .into_iter()
            .map(|path| DirEvent { path, kind: DirEventKind::Created })
            .collect(),
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => event
            .paths
            .into_iter()
            .map(|path| DirEvent { path, kind: DirEventKind::Removed })
            .collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            // paths[0] is the source, paths[1] the destination
            let mut out = Vec::with_capacity(2);
            let mut paths = event.paths.into_iter();
            if let Some(from) = paths.next() {
                out.push(DirEvent { path: from, kind: DirEventKind::Removed });
            }
            if let Some(to) = paths.next() {
                out.push(DirEvent { path: to, kind: DirEventKind::Created });
            }
            out
        }
        _ => Vec::new(),
    }
}
