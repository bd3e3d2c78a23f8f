// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests for the HTTP transport
//!
//! These tests run the real reqwest transport against a local TCP listener and
//! verify:
//! - Non-success statuses are returned as the body
//! - GET requests carry the JSON body
//! - Connection failures and timeouts surface as network errors, without retry

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use veryfi_sdk::{Client, ClientConfig, ClientError, Credentials, HttpTransport};

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter("veryfi_sdk=debug")
		.with_test_writer()
		.try_init();
}

fn credentials() -> Credentials {
	Credentials::new("client_id", "client_secret", "username", "api_key")
}

fn local_config(port: u16) -> ClientConfig {
	ClientConfig {
		base_url: format!("http://127.0.0.1:{}/api/", port),
		..ClientConfig::default()
	}
}

/// Read one request: headers up to the blank line, then `Content-Length` bytes of body
async fn read_request(stream: &mut TcpStream) -> String {
	let mut buf = Vec::new();
	let mut chunk = [0u8; 1024];

	let header_end = loop {
		let n = stream.read(&mut chunk).await.unwrap();
		assert!(n > 0, "connection closed before headers were complete");
		buf.extend_from_slice(&chunk[..n]);
		if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
			break pos + 4;
		}
	};

	let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
	let content_length = head
		.lines()
		.find_map(|line| {
			let (name, value) = line.split_once(':')?;
			name.eq_ignore_ascii_case("content-length")
				.then(|| value.trim().parse::<usize>().unwrap())
		})
		.unwrap_or(0);

	while buf.len() < header_end + content_length {
		let n = stream.read(&mut chunk).await.unwrap();
		assert!(n > 0, "connection closed before body was complete");
		buf.extend_from_slice(&chunk[..n]);
	}

	String::from_utf8_lossy(&buf).to_string()
}

#[tokio::test]
async fn test_error_status_body_returned_verbatim() {
	init_tracing();
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let port = listener.local_addr().unwrap().port();
	let (tx, rx) = oneshot::channel();

	tokio::spawn(async move {
		let (mut stream, _) = listener.accept().await.unwrap();
		let request = read_request(&mut stream).await;
		let body = r#"{"status":"fail"}"#;
		let response = format!(
			"HTTP/1.1 500 Internal Server Error\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
			body.len(),
			body
		);
		stream.write_all(response.as_bytes()).await.unwrap();
		stream.shutdown().await.unwrap();
		let _ = tx.send(request);
	});

	let client = Client::with_config(credentials(), local_config(port)).unwrap();
	let response = client.get_document(7).await.unwrap();
	assert_eq!(response, r#"{"status":"fail"}"#);

	let request = rx.await.unwrap();
	assert!(request.starts_with("GET /api/v8/partner/documents/7/ HTTP/1.1\r\n"));
	let lower = request.to_ascii_lowercase();
	assert!(lower.contains("client-id: client_id\r\n"));
	assert!(lower.contains("x-veryfi-request-signature: "));
	assert!(request.ends_with("\r\n\r\n{\"id\":7}"));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
	init_tracing();
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let port = listener.local_addr().unwrap().port();
	drop(listener);

	let client = Client::with_config(credentials(), local_config(port)).unwrap();
	let result = client.get_documents().await;
	assert!(matches!(result, Err(ClientError::Network(_))));
}

#[tokio::test]
async fn test_unanswered_request_times_out_once() {
	init_tracing();
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let port = listener.local_addr().unwrap().port();
	let accepted = Arc::new(AtomicUsize::new(0));

	let counter = accepted.clone();
	tokio::spawn(async move {
		let mut held = Vec::new();
		loop {
			let (stream, _) = listener.accept().await.unwrap();
			counter.fetch_add(1, Ordering::SeqCst);
			held.push(stream);
		}
	});

	let transport = HttpTransport::new(Duration::from_millis(200)).unwrap();
	let client = Client::with_transport(credentials(), local_config(port), transport);

	let start = Instant::now();
	let result = client.get_document(7).await;
	let elapsed = start.elapsed();

	assert!(matches!(result, Err(ClientError::Network(_))));
	assert!(elapsed >= Duration::from_millis(200));
	assert!(elapsed < Duration::from_secs(5));

	tokio::time::sleep(Duration::from_millis(100)).await;
	assert_eq!(accepted.load(Ordering::SeqCst), 1);
}
