use argus::{serve_session, ErrorPolicy, FrameProcessor};
use argus_base::{Rect, Tensor, Vec2};
use argus_com::{FrameMessage, WsClient, WsListener};
use argus_infer::{Detection, Infer, InferError};
use image::ImageEncoder;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};

/// Fixed-response engine standing in for the model.
struct StubDetector {
    detections: Vec<Detection>,
}

impl Infer for StubDetector {
    async fn detect(
        &self,
        _frame: Tensor<u8>,
        _conf_override: Option<f32>,
    ) -> Result<Vec<Detection>, InferError> {
        Ok(self.detections.clone())
    }
}

fn one_person() -> Vec<Detection> {
    vec![Detection {
        bbox: Rect::new(Vec2::new(100.0, 100.0), Vec2::new(120.0, 200.0)),
        class_id: 0,
        label: "person",
        confidence: 0.87,
    }]
}

fn test_pattern_jpeg() -> Vec<u8> {
    let img = image::RgbImage::from_fn(640, 480, |x, y| {
        if (x / 40 + y / 40) % 2 == 0 {
            image::Rgb([220, 220, 220])
        } else {
            image::Rgb([40, 40, 40])
        }
    });
    let mut buffer = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, 95)
        .encode_image(&img)
        .unwrap();
    buffer
}

const GARBAGE: [u8; 10] = [0x8F, 0x3C, 0x01, 0xEE, 0x42, 0x99, 0x10, 0x7A, 0x55, 0xD3];

/// Bind a listener, serve exactly one session with the given detections and
/// policy, and hand back the client plus the session task.
async fn start_session(
    detections: Vec<Detection>,
    policy: ErrorPolicy,
) -> (WsClient, JoinHandle<()>) {
    let listener = WsListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr();

    let server = tokio::spawn(async move {
        let (conn, peer) = listener.accept().await.expect("accept failed");
        let processor = Arc::new(FrameProcessor::new(StubDetector { detections }));
        serve_session(conn, peer, processor, policy).await;
    });

    let client = WsClient::connect(&format!("ws://{}", addr))
        .await
        .expect("connect failed");

    (client, server)
}

async fn recv_reply(client: &mut WsClient) -> Option<FrameMessage> {
    timeout(Duration::from_secs(10), client.recv())
        .await
        .expect("recv timed out")
        .expect("recv failed")
}

#[tokio::test]
async fn valid_frame_gets_annotated_reply() {
    let (mut client, _server) = start_session(one_person(), ErrorPolicy::Silent).await;

    client
        .send_binary(test_pattern_jpeg())
        .await
        .expect("send failed");

    let reply = recv_reply(&mut client).await;
    let Some(FrameMessage::Binary(bytes)) = reply else {
        panic!("expected a binary reply, got {reply:?}");
    };

    let decoded = argus_image::decode_blocking(&bytes).expect("reply is not a valid image");
    assert_eq!(decoded.width(), 640);
    assert_eq!(decoded.height(), 480);
}

#[tokio::test]
async fn garbage_is_skipped_silently_and_session_continues() {
    let (mut client, _server) = start_session(one_person(), ErrorPolicy::Silent).await;

    // Malformed frame first; under the silent policy it produces no reply.
    client
        .send_binary(GARBAGE.to_vec())
        .await
        .expect("send failed");

    // A well-formed frame on the same connection must still be processed;
    // the first (and only) reply is its annotated image.
    client
        .send_binary(test_pattern_jpeg())
        .await
        .expect("send failed");

    let reply = recv_reply(&mut client).await;
    match reply {
        Some(FrameMessage::Binary(bytes)) => {
            assert!(argus_image::decode_blocking(&bytes).is_ok());
        }
        other => panic!("expected the annotated frame, got {other:?}"),
    }
}

#[tokio::test]
async fn garbage_produces_one_text_notice_under_notify() {
    let (mut client, _server) = start_session(one_person(), ErrorPolicy::Notify).await;

    client
        .send_binary(GARBAGE.to_vec())
        .await
        .expect("send failed");

    let reply = recv_reply(&mut client).await;
    let Some(FrameMessage::Text(notice)) = reply else {
        panic!("expected a text notice, got {reply:?}");
    };
    let parsed: serde_json::Value = serde_json::from_str(&notice).expect("notice is not JSON");
    assert_eq!(parsed["error"], "decode failed");

    // The session is still open and processing frames.
    client
        .send_binary(test_pattern_jpeg())
        .await
        .expect("send failed");
    assert!(matches!(
        recv_reply(&mut client).await,
        Some(FrameMessage::Binary(_))
    ));
}

#[tokio::test]
async fn disconnect_ends_the_session_without_fault() {
    let (client, server) = start_session(Vec::new(), ErrorPolicy::Silent).await;

    client.close().await.expect("close failed");

    // The session task must terminate cleanly, not panic.
    timeout(Duration::from_secs(5), server)
        .await
        .expect("session did not terminate")
        .expect("session task panicked");
}

#[tokio::test]
async fn dropped_connection_ends_the_session_without_fault() {
    let (mut client, server) = start_session(Vec::new(), ErrorPolicy::Silent).await;

    client
        .send_binary(test_pattern_jpeg())
        .await
        .expect("send failed");
    assert!(matches!(
        recv_reply(&mut client).await,
        Some(FrameMessage::Binary(_))
    ));

    drop(client);

    timeout(Duration::from_secs(5), server)
        .await
        .expect("session did not terminate")
        .expect("session task panicked");
}

#[tokio::test]
async fn sessions_run_concurrently() {
    let listener = WsListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr();

    let server = tokio::spawn(async move {
        let processor = Arc::new(FrameProcessor::new(StubDetector {
            detections: Vec::new(),
        }));
        loop {
            let (conn, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(_) => break,
            };
            let processor = processor.clone();
            tokio::spawn(async move {
                serve_session(conn, peer, processor, ErrorPolicy::Silent).await;
            });
        }
    });

    let jpeg = test_pattern_jpeg();
    let mut clients = Vec::new();
    for _ in 0..3 {
        let mut client = WsClient::connect(&format!("ws://{}", addr))
            .await
            .expect("connect failed");
        client.send_binary(jpeg.clone()).await.expect("send failed");
        clients.push(client);
    }

    for client in &mut clients {
        assert!(matches!(
            recv_reply(client).await,
            Some(FrameMessage::Binary(_))
        ));
    }

    server.abort();
}
