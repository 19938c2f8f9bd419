use crate::connection::{next_frame, FrameMessage, MAX_MESSAGE_SIZE};
use crate::ComError;
use futures_util::SinkExt;
use tokio_websockets::{ClientBuilder, MaybeTlsStream, Message, WebSocketStream};

/// Client side of the frame-exchange endpoint.
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl WsClient {
    /// Connect to a frame server, e.g. `ws://127.0.0.1:8000`.
    pub async fn connect(uri: &str) -> Result<Self, ComError> {
        let parsed: http::Uri = uri
            .parse()
            .map_err(|e| ComError::InvalidUri(format!("{uri}: {e}")))?;
        let (stream, _response) = ClientBuilder::from_uri(parsed).connect().await?;
        Ok(Self { stream })
    }

    /// Send one encoded frame.
    pub async fn send_binary(&mut self, bytes: Vec<u8>) -> Result<(), ComError> {
        if bytes.len() > MAX_MESSAGE_SIZE {
            return Err(ComError::MessageTooLarge(bytes.len()));
        }
        self.stream.send(Message::binary(bytes)).await?;
        Ok(())
    }

    /// Send a textual message.
    pub async fn send_text(&mut self, text: &str) -> Result<(), ComError> {
        self.stream.send(Message::text(text.to_string())).await?;
        Ok(())
    }

    /// Receive the next reply.
    ///
    /// Returns `Ok(None)` when the server closes the connection.
    pub async fn recv(&mut self) -> Result<Option<FrameMessage>, ComError> {
        next_frame(&mut self.stream).await
    }

    /// Close the connection, flushing a close frame.
    pub async fn close(mut self) -> Result<(), ComError> {
        SinkExt::close(&mut self.stream).await?;
        Ok(())
    }
}
