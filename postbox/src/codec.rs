//! Wire framing: one WebSocket frame per logical message, encoded as
//! `<channel_id>,<payload>`. An empty channel token denotes a protocol-level
//! frame; server-to-client control frames (welcome, error) use the same
//! encoding with a JSON payload on the empty channel.

use bytes::Bytes;
use serde::Serialize;

pub const DELIMITER: u8 = b',';

#[derive(Serialize)]
struct WelcomeFrame<'a> {
    success: bool,
    message: &'a str,
}

#[derive(Serialize)]
struct ErrorFrame<'a> {
    error: bool,
    message: &'a str,
}

/// Splits an inbound frame into its channel-id token and payload on the
/// first delimiter. Returns `None` if the delimiter is missing or the token
/// is not valid UTF-8.
pub fn split(frame: &[u8]) -> Option<(&str, &[u8])> {
    let idx = frame.iter().position(|b| *b == DELIMITER)?;
    let token = std::str::from_utf8(&frame[..idx]).ok()?;
    Some((token, &frame[idx + 1..]))
}

/// Encodes a data frame.
pub fn encode(channel_id: &str, payload: &[u8]) -> Bytes {
    let mut out = Vec::with_capacity(channel_id.len() + 1 + payload.len());
    out.extend_from_slice(channel_id.as_bytes());
    out.push(DELIMITER);
    out.extend_from_slice(payload);
    Bytes::from(out)
}

/// The handshake acknowledgment sent once a connection is bound.
pub fn welcome() -> Bytes {
    let body = serde_json::to_vec(&WelcomeFrame { success: true, message: "Connection established" })
        .expect("welcome frame serialization");
    encode("", &body)
}

/// A structured error frame on the empty channel.
pub fn error(message: &str) -> Bytes {
    let body =
        serde_json::to_vec(&ErrorFrame { error: true, message }).expect("error frame serialization");
    encode("", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_data_frame() {
        assert_eq!(split(b"chat,hi there"), Some(("chat", &b"hi there"[..])));
    }

    #[test]
    fn split_keeps_later_delimiters() {
        assert_eq!(split(b"chat,a,b,c"), Some(("chat", &b"a,b,c"[..])));
    }

    #[test]
    fn split_empty_token_and_payload() {
        assert_eq!(split(b",payload"), Some(("", &b"payload"[..])));
        assert_eq!(split(b"chat,"), Some(("chat", &b""[..])));
    }

    #[test]
    fn split_missing_delimiter() {
        assert_eq!(split(b"no delimiter here"), None);
    }

    #[test]
    fn control_frames() {
        assert_eq!(
            welcome().as_ref(),
            br#",{"success":true,"message":"Connection established"}"#
        );
        assert_eq!(error("session unknown").as_ref(), br#",{"error":true,"message":"session unknown"}"#);
    }

    #[test]
    fn encode_round() {
        let frame = encode("news", b"hello");
        assert_eq!(frame.as_ref(), b"news,hello");
        assert_eq!(split(&frame), Some(("news", &b"hello"[..])));
    }
}
