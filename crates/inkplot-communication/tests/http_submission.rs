//! Submission against a local test server

use inkplot_communication::{HttpSubmitter, ProgramSubmitter};
use inkplot_core::SubmissionError;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const PROGRAM: &str = "G21\nG90\nG00 X0.000 Y0.000 F3000.000\nG0 Z0\n";

/// Read one request and return its body
async fn read_request(socket: &mut TcpStream) -> (String, String) {
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        assert!(n > 0, "client closed before sending a full request");
        raw.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&raw).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let head = text[..end].to_string();
            let length: usize = head
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse().unwrap())
                })
                .unwrap_or(0);
            if raw.len() >= end + 4 + length {
                let body = String::from_utf8_lossy(&raw[end + 4..end + 4 + length]).to_string();
                return (head, body);
            }
        }
    }
}

/// Serve one request with `response`, returning what was received
async fn serve_once(response: &'static str) -> (String, JoinHandle<(String, String)>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/gcode", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });
    (url, handle)
}

#[tokio::test]
async fn accepted_program_returns_receipt() {
    let (url, server) =
        serve_once("HTTP/1.1 200 OK\r\nContent-Length: 6\r\nConnection: close\r\n\r\nqueued").await;
    let submitter = HttpSubmitter::new(&url, Duration::from_secs(5)).unwrap();

    let receipt = submitter.submit(PROGRAM).await.unwrap();
    assert_eq!(receipt.status, 200);
    assert_eq!(receipt.body, "queued");

    let (head, body) = server.await.unwrap();
    assert!(head.starts_with("POST /api/gcode HTTP/1.1"));
    assert!(head.contains("Content-Type: text/plain"));
    assert_eq!(body, PROGRAM);
}

#[tokio::test]
async fn rejected_program_reports_status() {
    let (url, server) = serve_once(
        "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 4\r\n\r\nbusy",
    )
    .await;
    let submitter = HttpSubmitter::new(&url, Duration::from_secs(5)).unwrap();

    let err = submitter.submit(PROGRAM).await.unwrap_err();
    assert_eq!(
        err,
        SubmissionError::HttpStatus {
            status: 503,
            reason: "Service Unavailable".to_string()
        }
    );
    server.await.unwrap();
}

#[tokio::test]
async fn silent_endpoint_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        drop(socket);
    });

    let submitter = HttpSubmitter::new(&url, Duration::from_millis(100)).unwrap();
    let err = submitter.submit(PROGRAM).await.unwrap_err();
    assert_eq!(err, SubmissionError::Timeout { timeout_ms: 100 });
    server.abort();
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let submitter =
        HttpSubmitter::new(&format!("http://{}/", addr), Duration::from_secs(5)).unwrap();
    assert!(matches!(
        submitter.submit(PROGRAM).await,
        Err(SubmissionError::Network { .. })
    ));
}

#[test]
fn missing_endpoint_is_not_configured() {
    assert_eq!(
        HttpSubmitter::from_settings(None, 1000).unwrap_err(),
        SubmissionError::NotConfigured
    );
}
