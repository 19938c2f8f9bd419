use crate::connection::WsConnection;
use crate::ComError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio_websockets::ServerBuilder;

/// Fixed liveness payload for hosting-platform probes, served with a
/// permissive cross-origin header on the websocket port.
const HEALTH_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\n\
Content-Type: application/json\r\n\
Access-Control-Allow-Origin: *\r\n\
Content-Length: 20\r\n\
Connection: close\r\n\
\r\n\
{\"status\":\"running\"}";

/// Session acceptor for the frame-exchange endpoint.
///
/// Accepts one websocket connection per session. Plain HTTP requests on the
/// same port (no upgrade) are health probes: they get the canned status
/// response inline and never reach the session layer.
pub struct WsListener {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl WsListener {
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept the next session connection.
    ///
    /// Health probes and failed handshakes are handled internally; this only
    /// returns once a websocket session is established.
    pub async fn accept(&self) -> Result<(WsConnection, SocketAddr), ComError> {
        loop {
            let (stream, addr) = self.listener.accept().await?;

            match is_upgrade_request(&stream).await {
                Ok(true) => {}
                Ok(false) => {
                    log::debug!("health probe from {}", addr);
                    tokio::spawn(async move {
                        let mut stream = stream;
                        if let Err(e) = respond_health(&mut stream).await {
                            log::warn!("health response to {} failed: {}", addr, e);
                        }
                    });
                    continue;
                }
                Err(e) => {
                    log::warn!("failed to inspect request from {}: {}", addr, e);
                    continue;
                }
            }

            match ServerBuilder::new().accept(stream).await {
                Ok((_request, ws_stream)) => {
                    log::info!("client connected: {}", addr);
                    return Ok((WsConnection::new(ws_stream), addr));
                }
                Err(e) => {
                    log::warn!("websocket handshake failed for {}: {}", addr, e);
                    continue;
                }
            }
        }
    }
}

/// Peek at the pending request and decide whether it is a websocket upgrade.
///
/// The bytes stay in the socket buffer so the handshake can still read them.
/// Waits briefly for slow writers; a request whose headers never arrive is
/// treated as a plain probe.
async fn is_upgrade_request(stream: &TcpStream) -> Result<bool, ComError> {
    let mut buf = [0u8; 2048];

    for _ in 0..20 {
        let n = stream.peek(&mut buf).await?;
        if n == 0 {
            return Ok(false);
        }

        let head = &buf[..n];
        if find_subsequence(head, b"\r\n\r\n").is_some() || n == buf.len() {
            return Ok(contains_ignore_case(head, b"sec-websocket-key"));
        }

        // Headers still in flight.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    Ok(contains_ignore_case(&buf, b"sec-websocket-key"))
}

async fn respond_health(stream: &mut TcpStream) -> Result<(), ComError> {
    stream.write_all(HEALTH_RESPONSE).await?;
    stream.shutdown().await?;
    Ok(())
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn contains_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}
