use once_cell::sync::Lazy;
use regex::Regex;

/// Session identifier, an opaque token supplied by an authenticated
/// external actor (e.g. a web session key).
pub type SessionId = String;

/// Channel (topic) identifier.
pub type ChannelId = String;

/// Process-unique connection identifier.
pub type ConnId = u64;

/// Timestamp representation in seconds since Unix epoch.
pub type Timestamp = i64;

static ID_MATCH: Lazy<Regex> = Lazy::new(|| Regex::new("^[0-9a-zA-Z-]+$").expect("id regex"));

/// Whether `id` is acceptable as a session or channel identifier.
///
/// The pattern doubles as path-traversal protection: ids become directory
/// names under the mailbox root.
#[inline]
pub fn is_valid_id(id: &str) -> bool {
    ID_MATCH.is_match(id)
}

#[inline]
pub fn timestamp_secs() -> Timestamp {
    chrono::Local::now().timestamp()
}
