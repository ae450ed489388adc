//! Integration tests for `HttpTransport` against a raw TCP fixture.
//!
//! The fixture accepts one connection, reads the request and writes a canned
//! HTTP response, so every transport failure mode can be exercised without a
//! real node.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use ethrpc_core::error::{ClientError, ProtocolError, TransportError};
use ethrpc_core::transport::RpcTransport;
use ethrpc_http::{HttpClientConfig, HttpTransport};

/// Serve `responses` on a fresh local port, one connection each.
async fn spawn_fixture(responses: Vec<String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        for response in responses {
            let (mut stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            // Drain the request headers and body before answering.
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });
    format!("http://{addr}/")
}

fn http_ok(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn config_with_timeout(secs: u64) -> HttpClientConfig {
    HttpClientConfig {
        request_timeout: Duration::from_secs(secs),
        ..Default::default()
    }
}

#[tokio::test]
async fn returns_result_from_valid_response() {
    let body = r#"{"jsonrpc":"2.0","id":1,"result":"0x2a"}"#;
    let url = spawn_fixture(vec![http_ok(body)]).await;
    let transport = HttpTransport::new(&url, config_with_timeout(5)).unwrap();

    let result = transport.call_raw("eth_getBalance", vec![]).await.unwrap();
    assert_eq!(result, serde_json::json!("0x2a"));
}

#[tokio::test]
async fn response_without_content_type_is_still_parsed() {
    // No Content-Type header at all; the body is JSON and must be accepted.
    let body = r#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#;
    let raw = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let url = spawn_fixture(vec![raw]).await;
    let transport = HttpTransport::new(&url, config_with_timeout(5)).unwrap();

    assert!(transport.call_raw("eth_coinbase", vec![]).await.is_ok());
}

#[tokio::test]
async fn non_2xx_status_maps_to_http_status_error() {
    let raw = "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 5\r\nConnection: close\r\n\r\nboom\n"
        .to_string();
    let url = spawn_fixture(vec![raw]).await;
    let transport = HttpTransport::new(&url, config_with_timeout(5)).unwrap();

    let err = transport.call_raw("eth_accounts", vec![]).await.unwrap_err();
    match err {
        ClientError::Transport(TransportError::HttpStatus { status, .. }) => {
            assert_eq!(status, 500)
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_body_is_a_protocol_error() {
    let url = spawn_fixture(vec![http_ok("this is not json")]).await;
    let transport = HttpTransport::new(&url, config_with_timeout(5)).unwrap();

    let err = transport.call_raw("eth_accounts", vec![]).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Protocol(ProtocolError::InvalidJson(_))
    ));
}

#[tokio::test]
async fn rpc_error_body_surfaces_verbatim() {
    let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32010,"message":"nonce too low"}}"#;
    let url = spawn_fixture(vec![http_ok(body)]).await;
    let transport = HttpTransport::new(&url, config_with_timeout(5)).unwrap();

    let err = transport
        .call_raw("eth_sendRawTransaction", vec![serde_json::json!("0xf86b")])
        .await
        .unwrap_err();
    match err {
        ClientError::Rpc(e) => {
            assert_eq!(e.code, -32010);
            assert_eq!(e.message, "nonce too low");
        }
        other => panic!("expected Rpc error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_server_triggers_timeout() {
    // Accept the connection but never answer.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(stream);
    });

    let config = HttpClientConfig {
        request_timeout: Duration::from_millis(200),
        ..Default::default()
    };
    let transport = HttpTransport::new(format!("http://{addr}/"), config).unwrap();

    let err = transport.call_raw("eth_coinbase", vec![]).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Timeout { .. })
    ));
}

#[tokio::test]
async fn refused_connection_maps_to_connect_error() {
    // Bind then drop to get a port nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport =
        HttpTransport::new(format!("http://{addr}/"), config_with_timeout(5)).unwrap();
    let err = transport.call_raw("eth_coinbase", vec![]).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Connect(_) | TransportError::Io(_))
    ));
}

#[tokio::test]
async fn cancellation_aborts_in_flight_request() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(stream);
    });

    let cancel = CancellationToken::new();
    let config = HttpClientConfig {
        request_timeout: Duration::from_secs(30),
        cancel: cancel.clone(),
    };
    let transport = HttpTransport::new(format!("http://{addr}/"), config).unwrap();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let err = transport.call_raw("eth_coinbase", vec![]).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Canceled)
    ));
}

#[tokio::test]
async fn default_batch_sends_requests_sequentially() {
    use ethrpc_core::request::{JsonRpcRequest, RpcId};

    let bodies = vec![
        http_ok(r#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#),
        http_ok(r#"{"jsonrpc":"2.0","id":2,"result":"0x2"}"#),
    ];
    let url = spawn_fixture(bodies).await;
    let transport = HttpTransport::new(&url, config_with_timeout(5)).unwrap();

    let reqs = vec![
        JsonRpcRequest::new(transport.next_id(), "eth_getBalance", vec![]),
        JsonRpcRequest::new(transport.next_id(), "eth_getBalance", vec![]),
    ];
    let responses = transport.send_batch(reqs).await.unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].id, RpcId::Number(1));
    assert_eq!(responses[1].id, RpcId::Number(2));
}

#[tokio::test]
async fn mismatched_response_id_is_rejected() {
    // Fixture always answers with id 999; the transport's first id is 1.
    let body = r#"{"jsonrpc":"2.0","id":999,"result":"0x1"}"#;
    let url = spawn_fixture(vec![http_ok(body)]).await;
    let transport = HttpTransport::new(&url, config_with_timeout(5)).unwrap();

    let err = transport.call_raw("eth_coinbase", vec![]).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Protocol(ProtocolError::IdMismatch { expected: 1, .. })
    ));
}
