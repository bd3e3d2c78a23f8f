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

//! Network send step
//!
//! [`Client`](crate::Client) builds a complete [`ApiRequest`] and hands it to a
//! [`Transport`]. Production code uses [`HttpTransport`]; tests swap in
//! [`RecordingTransport`] to capture requests and return a canned body.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method};
use tracing::{error, warn};

use crate::client::ClientError;
use crate::types::HttpVerb;

/// A fully built request, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
	pub method: HttpVerb,
	pub url: String,
	/// Header name/value pairs in wire order
	pub headers: Vec<(String, String)>,
	/// JSON body, sent on every verb
	pub body: String,
}

impl ApiRequest {
	/// Look up a header value by case-insensitive name
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Sends a request and returns the raw response body
pub trait Transport: Send + Sync {
	fn send(&self, request: ApiRequest) -> impl Future<Output = Result<String, ClientError>> + Send;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: ReqwestClient,
}

impl HttpTransport {
	/// Create a transport whose requests time out after `timeout`
	pub fn new(timeout: Duration) -> Result<Self, ClientError> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {}", e)))?;

		Ok(Self { client })
	}
}

impl From<HttpVerb> for Method {
	fn from(verb: HttpVerb) -> Self {
		match verb {
			HttpVerb::Get => Method::GET,
			HttpVerb::Post => Method::POST,
			HttpVerb::Put => Method::PUT,
			HttpVerb::Delete => Method::DELETE,
		}
	}
}

impl Transport for HttpTransport {
	async fn send(&self, request: ApiRequest) -> Result<String, ClientError> {
		let mut builder = self.client.request(request.method.into(), &request.url);
		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		let response = builder.body(request.body).send().await.map_err(|e| {
			error!(url = %request.url, error = %e, "Request failed");
			ClientError::Network(format!("Request failed: {}", e))
		})?;

		// The service reports most failures in the body, so any status is passed through.
		let status = response.status();
		if !status.is_success() {
			warn!(url = %request.url, status = %status, "Service returned non-success status");
		}

		response
			.text()
			.await
			.map_err(|e| ClientError::Network(format!("Failed to read response body: {}", e)))
	}
}

/// Transport that records requests and answers with a fixed body
#[derive(Debug, Default)]
pub struct RecordingTransport {
	response: String,
	requests: Mutex<Vec<ApiRequest>>,
}

impl RecordingTransport {
	pub fn new(response: impl Into<String>) -> Self {
		Self {
			response: response.into(),
			requests: Mutex::new(Vec::new()),
		}
	}

	/// All requests sent so far, oldest first
	pub fn requests(&self) -> Vec<ApiRequest> {
		self.requests
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.clone()
	}

	pub fn last_request(&self) -> Option<ApiRequest> {
		self.requests().pop()
	}
}

impl Transport for RecordingTransport {
	async fn send(&self, request: ApiRequest) -> Result<String, ClientError> {
		self.requests
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.push(request);
		Ok(self.response.clone())
	}
}

impl<T: Transport> Transport for std::sync::Arc<T> {
	fn send(&self, request: ApiRequest) -> impl Future<Output = Result<String, ClientError>> + Send {
		(**self).send(request)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn request() -> ApiRequest {
		ApiRequest {
			method: HttpVerb::Get,
			url: "http://localhost/api/v8/partner/documents/".to_string(),
			headers: vec![("Client-ID".to_string(), "abc".to_string())],
			body: "{}".to_string(),
		}
	}

	#[test]
	fn test_header_lookup_is_case_insensitive() {
		let req = request();
		assert_eq!(req.header("client-id"), Some("abc"));
		assert_eq!(req.header("Authorization"), None);
	}

	#[tokio::test]
	async fn test_recording_transport_captures_requests() {
		let transport = RecordingTransport::new(r#"{"status":"ok"}"#);
		let body = transport.send(request()).await.unwrap();

		assert_eq!(body, r#"{"status":"ok"}"#);
		assert_eq!(transport.requests().len(), 1);
		assert_eq!(transport.last_request(), Some(request()));
	}

	#[test]
	fn test_http_transport_creation() {
		assert!(HttpTransport::new(Duration::from_secs(5)).is_ok());
	}
}
