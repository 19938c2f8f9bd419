use crate::config::ErrorPolicy;
use crate::pipeline::{FrameProcessor, PipelineError};
use argus_com::{FrameMessage, WsConnection};
use argus_infer::Infer;
use std::net::SocketAddr;
use std::sync::Arc;

/// Drive one session: receive a frame, process it, send the reply, repeat.
///
/// One inference runs fully before the next receive. Malformed frames are
/// dropped (with an optional text notice) and the session continues; a
/// clean disconnect ends the loop silently; anything else is logged and
/// ends the loop. No retries, no reconnection.
pub async fn serve_session<D: Infer>(
    mut conn: WsConnection,
    peer: SocketAddr,
    processor: Arc<FrameProcessor<D>>,
    policy: ErrorPolicy,
) {
    loop {
        match conn.recv().await {
            Ok(Some(FrameMessage::Binary(data))) => {
                match processor.process(&data).await {
                    Ok(processed) => {
                        log::debug!(
                            "{}: {} detections, {} bytes in, {} bytes out",
                            peer,
                            processed.detections,
                            data.len(),
                            processed.bytes.len()
                        );
                        if let Err(e) = conn.send_binary(processed.bytes).await {
                            log::warn!("send to {} failed: {}", peer, e);
                            break;
                        }
                    }
                    Err(e) if e.is_recoverable() => {
                        log::warn!("{}: frame dropped: {}", peer, e);
                        if policy == ErrorPolicy::Notify {
                            let notice =
                                serde_json::json!({ "error": e.notice() }).to_string();
                            if conn.send_text(&notice).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        log::error!("{}: {}", peer, e);
                        break;
                    }
                }
            }
            Ok(Some(FrameMessage::Text(text))) => {
                // The protocol has no inbound text messages; note and move on.
                log::debug!("{}: ignoring text message: {}", peer, text);
            }
            Ok(None) => {
                log::info!("client disconnected: {}", peer);
                break;
            }
            Err(e) => {
                log::error!("session with {} failed: {}", peer, e);
                break;
            }
        }
    }
}
