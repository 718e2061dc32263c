use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::anyhow;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_hdr_async_with_config;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use postbox::{codec, BrokerError, BrokerHandle, ConnEvent, ConnectionHandle, Result};
use postbox_conf::Settings;

static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

/// Drives one client connection from websocket handshake to detach.
///
/// The session id is the final segment of the request path; binding is
/// settled with the broker before the welcome frame goes out. After that the
/// pump forwards inbound frames to the broker and outbound events to the
/// socket until either side goes away.
pub async fn run(socket: TcpStream, remote_addr: SocketAddr, broker: BrokerHandle) -> Result<()> {
    let cfg = Settings::instance();
    socket.set_nodelay(true)?;

    let ws_config = WebSocketConfig::default().max_frame_size(Some(cfg.listener.max_frame_size));
    let mut path = String::new();
    let on_handshake = |req: &Request, response: Response| {
        path = req.uri().path().to_owned();
        Ok(response)
    };
    let mut ws = match tokio::time::timeout(
        cfg.listener.handshake_timeout,
        accept_hdr_async_with_config(socket, on_handshake, Some(ws_config)),
    )
    .await
    {
        Ok(Ok(ws)) => ws,
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => return Err(anyhow!("websocket handshake timeout, {remote_addr}")),
    };

    let session_id = path.trim_matches('/').rsplit('/').next().unwrap_or("").to_string();
    let conn_id = NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed);
    let (tx, mut rx) = mpsc::unbounded_channel();

    if let Err(e) = broker.attach(session_id.clone(), ConnectionHandle::new(conn_id, tx)).await {
        let reason = match e {
            BrokerError::InvalidId(_) => "session invalid",
            _ => "session unknown",
        };
        log::info!("{remote_addr} rejected: {e}");
        let _ = ws.send(Message::Binary(codec::error(reason))).await;
        let _ = ws.close(None).await;
        return Ok(());
    }

    log::debug!("{remote_addr} bound to session {session_id}, connection {conn_id}");
    let result = pump(&mut ws, &mut rx, &broker, &session_id, conn_id).await;
    broker.detach(session_id, conn_id);
    result
}

async fn pump(
    ws: &mut WebSocketStream<TcpStream>,
    rx: &mut mpsc::UnboundedReceiver<ConnEvent>,
    broker: &BrokerHandle,
    session_id: &str,
    conn_id: u64,
) -> Result<()> {
    ws.send(Message::Binary(codec::welcome())).await?;

    loop {
        tokio::select! {
            msg = ws.next() => match msg {
                Some(Ok(Message::Binary(data))) => {
                    broker.frame(session_id.to_string(), conn_id, data)
                }
                Some(Ok(Message::Text(text))) => {
                    broker.frame(session_id.to_string(), conn_id, Bytes::from(text))
                }
                Some(Ok(Message::Close(_))) | None => break,
                // ping/pong are answered by the protocol layer
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    log::debug!("connection {conn_id} read error: {e:?}");
                    break;
                }
            },
            ev = rx.recv() => match ev {
                Some(ConnEvent::Data(data)) => ws.send(Message::Binary(data)).await?,
                Some(ConnEvent::Close) => {
                    let _ = ws.close(None).await;
                    break;
                }
                // session evicted while we were still attached
                None => break,
            },
        }
    }
    Ok(())
}
