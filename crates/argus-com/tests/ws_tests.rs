use argus_com::{FrameMessage, WsClient, WsListener, MAX_MESSAGE_SIZE};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};

#[tokio::test]
async fn bind_reports_local_addr() {
    let listener = WsListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr();
    assert_eq!(addr.ip().to_string(), "127.0.0.1");
    assert!(addr.port() > 0);
}

#[tokio::test]
async fn health_probe_gets_status_response() {
    let listener = WsListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr();

    // Keep the acceptor running; the probe is answered internally and a
    // later websocket client proves the listener was not consumed.
    let accept_task = tokio::spawn(async move { listener.accept().await });

    let mut probe = TcpStream::connect(addr).await.expect("connect failed");
    probe
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nAccept: */*\r\n\r\n")
        .await
        .expect("write failed");

    let mut response = Vec::new();
    probe
        .read_to_end(&mut response)
        .await
        .expect("read failed");
    let response = String::from_utf8_lossy(&response);

    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.contains("Access-Control-Allow-Origin: *"));
    assert!(response.ends_with(r#"{"status":"running"}"#));

    // The session endpoint is still live.
    let _client = WsClient::connect(&format!("ws://{}", addr))
        .await
        .expect("websocket connect failed");

    let (_conn, peer) = timeout(Duration::from_secs(5), accept_task)
        .await
        .expect("accept timed out")
        .unwrap()
        .expect("accept failed");
    assert_eq!(peer.ip().to_string(), "127.0.0.1");
}

#[tokio::test]
async fn binary_echo_roundtrip() {
    let listener = WsListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr();

    tokio::spawn(async move {
        let (mut conn, _peer) = listener.accept().await.expect("accept failed");
        while let Ok(Some(msg)) = conn.recv().await {
            if let FrameMessage::Binary(bytes) = msg {
                conn.send_binary(bytes).await.expect("send failed");
            }
        }
    });

    let mut client = WsClient::connect(&format!("ws://{}", addr))
        .await
        .expect("connect failed");

    let payload = vec![0xAB; 1024];
    client
        .send_binary(payload.clone())
        .await
        .expect("send failed");

    let reply = timeout(Duration::from_secs(5), client.recv())
        .await
        .expect("recv timed out")
        .expect("recv failed");
    assert_eq!(reply, Some(FrameMessage::Binary(payload)));
}

#[tokio::test]
async fn text_messages_surface_on_both_sides() {
    let listener = WsListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr();

    tokio::spawn(async move {
        let (mut conn, _peer) = listener.accept().await.expect("accept failed");
        if let Ok(Some(FrameMessage::Text(text))) = conn.recv().await {
            conn.send_text(&format!("echo: {text}"))
                .await
                .expect("send failed");
        }
    });

    let mut client = WsClient::connect(&format!("ws://{}", addr))
        .await
        .expect("connect failed");
    client.send_text("hello").await.expect("send failed");

    let reply = timeout(Duration::from_secs(5), client.recv())
        .await
        .expect("recv timed out")
        .expect("recv failed");
    assert_eq!(reply, Some(FrameMessage::Text("echo: hello".to_string())));
}

#[tokio::test]
async fn clean_close_yields_none() {
    let listener = WsListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr();

    let server = tokio::spawn(async move {
        let (mut conn, _peer) = listener.accept().await.expect("accept failed");
        conn.recv().await
    });

    let client = WsClient::connect(&format!("ws://{}", addr))
        .await
        .expect("connect failed");
    client.close().await.expect("close failed");

    let received = timeout(Duration::from_secs(5), server)
        .await
        .expect("server timed out")
        .unwrap()
        .expect("recv errored");
    assert_eq!(received, None);
}

#[tokio::test]
async fn dropped_client_ends_session_without_fault() {
    let listener = WsListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr();

    let server = tokio::spawn(async move {
        let (mut conn, _peer) = listener.accept().await.expect("accept failed");
        // Drain until the peer goes away, counting frames.
        let mut frames = 0;
        loop {
            match conn.recv().await {
                Ok(Some(FrameMessage::Binary(_))) => frames += 1,
                Ok(Some(FrameMessage::Text(_))) => {}
                Ok(None) => return Ok(frames),
                Err(e) => return Err(e),
            }
        }
    });

    let mut client = WsClient::connect(&format!("ws://{}", addr))
        .await
        .expect("connect failed");
    client.send_binary(vec![1, 2, 3]).await.expect("send failed");
    drop(client);

    let frames = timeout(Duration::from_secs(5), server)
        .await
        .expect("server timed out")
        .unwrap();
    // Abrupt drop may surface as clean EOF or as a websocket error; either
    // way the loop terminated and the frame before it was seen.
    if let Ok(frames) = frames {
        assert_eq!(frames, 1);
    }
}

#[tokio::test]
async fn oversized_send_is_rejected() {
    let listener = WsListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr();

    tokio::spawn(async move {
        let _conn = listener.accept().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let mut client = WsClient::connect(&format!("ws://{}", addr))
        .await
        .expect("connect failed");

    let result = client.send_binary(vec![0u8; MAX_MESSAGE_SIZE + 1]).await;
    match result {
        Err(argus_com::ComError::MessageTooLarge(len)) => {
            assert_eq!(len, MAX_MESSAGE_SIZE + 1)
        }
        other => panic!("expected MessageTooLarge, got {other:?}"),
    }
}
