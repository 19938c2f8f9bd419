use crate::ComError;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_websockets::{Message, WebSocketStream};

/// Upper bound on a single frame message. Anything larger is dropped with a
/// warning rather than buffered.
pub const MAX_MESSAGE_SIZE: usize = 32 * 1024 * 1024;

/// One inbound websocket message of interest to the session layer.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameMessage {
    /// One encoded frame.
    Binary(Vec<u8>),
    /// A textual notice (status or error reporting).
    Text(String),
}

/// Receive the next data message from a websocket stream.
///
/// `Ok(None)` means the peer closed cleanly (close frame or EOF) — callers
/// end their loop without treating it as a failure. Control frames are the
/// library's business; oversized payloads are skipped.
pub(crate) async fn next_frame<S>(stream: &mut S) -> Result<Option<FrameMessage>, ComError>
where
    S: futures_core::Stream<Item = Result<Message, tokio_websockets::Error>> + Unpin,
{
    loop {
        match stream.next().await {
            Some(Ok(msg)) => {
                if msg.is_binary() {
                    let payload = msg.into_payload();
                    if payload.len() > MAX_MESSAGE_SIZE {
                        log::warn!("dropping oversized message: {} bytes", payload.len());
                        continue;
                    }
                    return Ok(Some(FrameMessage::Binary(payload.to_vec())));
                }
                if msg.is_text() {
                    let text = msg.as_text().unwrap_or_default().to_string();
                    return Ok(Some(FrameMessage::Text(text)));
                }
                if msg.is_close() {
                    return Ok(None);
                }
                // Ping/pong: handled by the library, nothing to surface.
            }
            Some(Err(e)) => return Err(ComError::from(e)),
            None => return Ok(None),
        }
    }
}

/// A server-side session connection after the websocket handshake.
pub struct WsConnection {
    stream: WebSocketStream<TcpStream>,
}

impl WsConnection {
    pub(crate) fn new(stream: WebSocketStream<TcpStream>) -> Self {
        Self { stream }
    }

    /// Receive the next frame or text message.
    ///
    /// Returns `Ok(None)` on clean disconnect.
    pub async fn recv(&mut self) -> Result<Option<FrameMessage>, ComError> {
        next_frame(&mut self.stream).await
    }

    /// Send one encoded frame back to the peer.
    pub async fn send_binary(&mut self, bytes: Vec<u8>) -> Result<(), ComError> {
        if bytes.len() > MAX_MESSAGE_SIZE {
            return Err(ComError::MessageTooLarge(bytes.len()));
        }
        self.stream.send(Message::binary(bytes)).await?;
        Ok(())
    }

    /// Send a textual notice to the peer.
    pub async fn send_text(&mut self, text: &str) -> Result<(), ComError> {
        self.stream.send(Message::text(text.to_string())).await?;
        Ok(())
    }

    /// Close the connection, flushing a close frame.
    pub async fn close(mut self) -> Result<(), ComError> {
        SinkExt::close(&mut self.stream).await?;
        Ok(())
    }
}
