#![deny(unsafe_code)]

use std::fmt;
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use config::{Config, File};
use once_cell::sync::OnceCell;
use serde::de::{self, Deserializer};
use serde::Deserialize;

use self::logging::Log;

pub use self::options::Options;

pub mod logging;
pub mod options;

pub type Result<T, E = anyhow::Error> = anyhow::Result<T, E>;

static SETTINGS: OnceCell<Settings> = OnceCell::new();

#[derive(Clone)]
pub struct Settings(Arc<Inner>);

#[derive(Debug, Clone, Deserialize)]
pub struct Inner {
    #[serde(default)]
    pub mailbox: MailboxCfg,
    #[serde(default)]
    pub listener: ListenerCfg,
    #[serde(default)]
    pub reaper: ReaperCfg,
    #[serde(default)]
    pub log: Log,
    #[serde(default, skip)]
    pub opts: Options,
}

impl Deref for Settings {
    type Target = Inner;
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl Settings {
    fn new(opts: Options) -> Result<Self> {
        let mut builder = Config::builder()
            .add_source(File::with_name("/etc/postbox/postbox").required(false))
            .add_source(File::with_name("/etc/postbox").required(false))
            .add_source(File::with_name("postbox").required(false))
            .add_source(config::Environment::with_prefix("postbox").try_parsing(true));

        if let Some(cfg) = opts.cfg_name.as_ref() {
            builder = builder.add_source(File::with_name(cfg).required(false));
        }

        let mut inner: Inner = builder.build()?.try_deserialize()?;

        //Command line configuration overriding file configuration
        if let Some(dir) = opts.dir.as_ref() {
            inner.mailbox.dir.clone_from(dir);
        }
        if let Some(addr) = opts.addr {
            inner.listener.addr = addr;
        }

        inner.opts = opts;
        Ok(Self(Arc::new(inner)))
    }

    #[inline]
    pub fn instance() -> &'static Self {
        match SETTINGS.get() {
            Some(c) => c,
            None => {
                unreachable!("Settings not initialized");
            }
        }
    }

    #[inline]
    pub fn init(opts: Options) -> Result<&'static Self> {
        SETTINGS.set(Settings::new(opts)?).map_err(|_| anyhow!("Settings init failed"))?;
        SETTINGS.get().ok_or_else(|| anyhow!("Settings init failed"))
    }

    #[inline]
    pub fn logs() {
        let cfg = Self::instance();
        log::debug!("Config info is {:?}", cfg.0);
        log::info!("mailbox.dir is {}", cfg.mailbox.dir);
        log::info!("listener.addr is {}", cfg.listener.addr);
        log::info!("reaper config is {:?}", cfg.reaper);
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Settings ...")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailboxCfg {
    //Base directory of the mailbox tree, ideally on a memory-backed mount.
    #[serde(default = "MailboxCfg::dir_default")]
    pub dir: String,
}

impl Default for MailboxCfg {
    #[inline]
    fn default() -> Self {
        Self { dir: Self::dir_default() }
    }
}

impl MailboxCfg {
    fn dir_default() -> String {
        "/dev/shm/postbox".into()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListenerCfg {
    #[serde(default = "ListenerCfg::addr_default", deserialize_with = "deserialize_addr")]
    pub addr: SocketAddr,

    //Upper bound for completing the websocket handshake.
    #[serde(default = "ListenerCfg::handshake_timeout_default", deserialize_with = "deserialize_duration")]
    pub handshake_timeout: Duration,

    //Frames larger than this are rejected by the websocket layer.
    #[serde(default = "ListenerCfg::max_frame_size_default")]
    pub max_frame_size: usize,
}

impl Default for ListenerCfg {
    #[inline]
    fn default() -> Self {
        Self {
            addr: Self::addr_default(),
            handshake_timeout: Self::handshake_timeout_default(),
            max_frame_size: Self::max_frame_size_default(),
        }
    }
}

impl ListenerCfg {
    fn addr_default() -> SocketAddr {
        ([0, 0, 0, 0], 5600).into()
    }
    fn handshake_timeout_default() -> Duration {
        Duration::from_secs(15)
    }
    fn max_frame_size_default() -> usize {
        1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReaperCfg {
    //How often idle state is scanned for.
    #[serde(default = "ReaperCfg::interval_default", deserialize_with = "deserialize_duration")]
    pub interval: Duration,

    //Sessions and channels inactive longer than this are evicted.
    #[serde(default = "ReaperCfg::staleness_default", deserialize_with = "deserialize_duration")]
    pub staleness: Duration,
}

impl Default for ReaperCfg {
    #[inline]
    fn default() -> Self {
        Self { interval: Self::interval_default(), staleness: Self::staleness_default() }
    }
}

impl ReaperCfg {
    fn interval_default() -> Duration {
        Duration::from_secs(5 * 60)
    }
    fn staleness_default() -> Duration {
        Duration::from_secs(2 * 60 * 60)
    }
}

/// Parses a human-readable duration, "30s", "5m", "2h", "1d", or a
/// concatenation such as "1h30m". A bare number is taken as seconds.
#[inline]
pub fn to_duration(text: &str) -> Duration {
    if let Ok(secs) = text.parse::<u64>() {
        return Duration::from_secs(secs);
    }
    let secs: u64 = text
        .to_lowercase()
        .split_inclusive(['s', 'm', 'h', 'd'])
        .map(|part| {
            let mut chars = part.chars();
            let unit = match chars.next_back() {
                Some(u) => u,
                None => return 0,
            };
            let v = match chars.as_str().parse::<u64>() {
                Ok(v) => v,
                Err(_e) => return 0,
            };
            match unit {
                's' => v,
                'm' => v * 60,
                'h' => v * 3600,
                'd' => v * 86400,
                _ => 0,
            }
        })
        .sum();
    Duration::from_secs(secs)
}

#[inline]
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let v = String::deserialize(deserializer)?;
    Ok(to_duration(&v))
}

#[inline]
fn deserialize_addr<'de, D>(deserializer: D) -> Result<SocketAddr, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer)?.parse::<SocketAddr>().map_err(de::Error::custom)
}
