//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener and a real `tokio-tungstenite` client
//! to verify that frames actually flow over the network, that clean
//! closes surface as `Ok(None)`, and that sends and receives can run
//! concurrently without contending.

#![cfg(feature = "websocket")]

use futures_util::{SinkExt, StreamExt};
use quorum_transport::{Connection, Transport, WebSocketTransport};
use tokio_tungstenite::tungstenite::Message;

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Binds a transport on an ephemeral port and returns it with its address.
async fn bind_transport() -> (WebSocketTransport, String) {
    let transport = WebSocketTransport::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = transport.local_addr().expect("should have addr").to_string();
    (transport, addr)
}

async fn connect_client(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("client should connect");
    ws
}

#[tokio::test]
async fn test_accept_and_exchange_binary_frames() {
    let (mut transport, addr) = bind_transport().await;

    let accept = tokio::spawn(async move { transport.accept().await.expect("should accept") });
    let mut client = connect_client(&addr).await;
    let conn = accept.await.expect("accept task should complete");

    // Client → server.
    client
        .send(Message::Binary(b"hello".to_vec().into()))
        .await
        .unwrap();
    let received = conn.recv().await.expect("recv should succeed");
    assert_eq!(received, Some(b"hello".to_vec()));

    // Server → client.
    conn.send(b"world").await.expect("send should succeed");
    let msg = client.next().await.unwrap().unwrap();
    assert_eq!(msg.into_data().as_ref(), b"world");
}

#[tokio::test]
async fn test_text_frames_are_delivered_as_bytes() {
    let (mut transport, addr) = bind_transport().await;

    let accept = tokio::spawn(async move { transport.accept().await.expect("should accept") });
    let mut client = connect_client(&addr).await;
    let conn = accept.await.expect("accept task should complete");

    // Browser clients often send text frames; the transport normalizes
    // them to bytes so the codec doesn't care.
    client
        .send(Message::Text(r#"{"event":"ready"}"#.into()))
        .await
        .unwrap();
    let received = conn.recv().await.expect("recv should succeed");
    assert_eq!(received, Some(br#"{"event":"ready"}"#.to_vec()));
}

#[tokio::test]
async fn test_client_close_surfaces_as_none() {
    let (mut transport, addr) = bind_transport().await;

    let accept = tokio::spawn(async move { transport.accept().await.expect("should accept") });
    let mut client = connect_client(&addr).await;
    let conn = accept.await.expect("accept task should complete");

    client.close(None).await.unwrap();

    let received = conn.recv().await.expect("recv should succeed");
    assert_eq!(received, None, "clean close should surface as Ok(None)");
}

#[tokio::test]
async fn test_server_close_reaches_client() {
    let (mut transport, addr) = bind_transport().await;

    let accept = tokio::spawn(async move { transport.accept().await.expect("should accept") });
    let mut client = connect_client(&addr).await;
    let conn = accept.await.expect("accept task should complete");

    conn.close().await.expect("close should succeed");

    // The client sees the closing handshake (a Close frame, then end
    // of stream).
    loop {
        match client.next().await {
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(_)) => continue,
            Some(Err(_)) => break, // connection reset counts as closed
        }
    }
}

#[tokio::test]
async fn test_connections_get_distinct_ids() {
    let (mut transport, addr) = bind_transport().await;

    let accept = tokio::spawn(async move {
        let a = transport.accept().await.expect("first accept");
        let b = transport.accept().await.expect("second accept");
        (a, b)
    });

    let _c1 = connect_client(&addr).await;
    let _c2 = connect_client(&addr).await;
    let (a, b) = accept.await.expect("accept task should complete");

    assert_ne!(a.id(), b.id());
}
