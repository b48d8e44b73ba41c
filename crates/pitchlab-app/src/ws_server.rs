// WebSocket server for the dashboard front end.
//
// Each accepted connection gets its own task. Requests on one connection are
// answered in order; connections never share mutable state.

use std::net::SocketAddr;

use futures_util::stream::Stream;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, error, info, warn};

use crate::app::Dashboard;
use crate::protocol::{ErrorKind, ServerMessage};

/// Outgoing replies buffered per connection before the reader waits.
const REPLY_BUFFER: usize = 64;

pub async fn bind(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind((host, port)).await?;
    info!("WebSocket server listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Accept connections forever, spawning one task per client.
pub async fn run(listener: TcpListener, dashboard: Dashboard) -> anyhow::Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        info!("Accepted TCP connection from {addr}");
        let dashboard = dashboard.clone();
        tokio::spawn(async move {
            serve_connection(stream, addr, dashboard).await;
        });
    }
}

async fn serve_connection(stream: TcpStream, addr: SocketAddr, dashboard: Dashboard) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake failed for {addr}: {e}");
            return;
        }
    };

    let (mut write, read) = ws_stream.split();
    let (tx, mut rx) = mpsc::channel::<String>(REPLY_BUFFER);

    let writer = tokio::spawn(async move {
        while let Some(reply) = rx.recv().await {
            if let Err(e) = write.send(Message::text(reply)).await {
                warn!("Failed to send reply to {addr}: {e}");
                break;
            }
        }
        let _ = write.close().await;
    });

    let addr_str = addr.to_string();
    if process_message_stream(read, &dashboard, &tx, &addr_str).await.is_err() {
        debug!("Writer for {addr_str} went away before the reader finished");
    }
    drop(tx);

    if let Err(e) = writer.await {
        error!("Writer task for {addr_str} panicked: {e}");
    }
    info!("Client {addr_str} disconnected");
}

/// Answer every text frame in `stream`, pushing serialized replies into `tx`.
///
/// Returns `Err(())` if the reply channel is closed, signalling the caller to
/// stop. Generic over the stream so it can be driven by in-memory streams in
/// tests.
pub async fn process_message_stream<St>(
    mut stream: St,
    dashboard: &Dashboard,
    tx: &mpsc::Sender<String>,
    addr: &str,
) -> Result<(), ()>
where
    St: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                let reply = dashboard.handle_text(text.as_str());
                if tx.send(encode(&reply)).await.is_err() {
                    return Err(());
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {addr} sent close frame");
                break;
            }
            Err(e) => {
                warn!("WebSocket error from {addr}: {e}");
                break;
            }
            _ => {
                // Ignore Binary, Ping, Pong, Frame variants.
            }
        }
    }
    Ok(())
}

fn encode(reply: &ServerMessage) -> String {
    match serde_json::to_string(reply) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize reply: {e}");
            let fallback = ServerMessage::error(None, ErrorKind::Internal, e.to_string());
            serde_json::to_string(&fallback)
                .unwrap_or_else(|_| r#"{"type":"ERROR","request_id":null,"kind":"internal","message":"serialization failed"}"#.to_string())
        }
    }
}
