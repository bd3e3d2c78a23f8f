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

use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::config::{ClientConfig, LEGACY_API_VERSION};
use crate::line_item::{AddLineItem, LineItemPayload, PayloadError, UpdateLineItem};
use crate::signing::{SigningError, sign};
use crate::transport::{ApiRequest, HttpTransport, Transport};
use crate::types::{
	Credentials, DEFAULT_CATEGORIES, HttpVerb, ProcessDocumentUrlOptions, RequestArguments,
	SignedHeaders, merge_arguments,
};
use crate::webhook::verify_webhook;

/// Value of the `User-Agent` header
pub const USER_AGENT: &str = concat!("rust veryfi-sdk/", env!("CARGO_PKG_VERSION"));

/// Error types for client operations
#[derive(Debug, Error)]
pub enum ClientError {
	#[error("Network error: {0}")]
	Network(String),
	#[error("Serialization error: {0}")]
	Serialization(String),
	#[error("Signing error: {0}")]
	Signing(#[from] SigningError),
	#[error("Invalid payload: {0}")]
	Payload(#[from] PayloadError),
	#[error("I/O error: {0}")]
	Io(String),
	#[error("Runtime error: {0}")]
	Runtime(String),
}

/// Client for the document extraction API
///
/// Every call is signed with the client secret and returns the raw response
/// body. A `{"status": "fail", ...}` body is the service's own error report
/// and is returned like any other body.
///
/// The client holds only immutable state and can be shared across tasks.
pub struct Client<T = HttpTransport> {
	credentials: Credentials,
	config: ClientConfig,
	transport: T,
}

impl Client<HttpTransport> {
	/// Create a new client with the default connection settings
	pub fn new(credentials: Credentials) -> Result<Self, ClientError> {
		Self::with_config(credentials, ClientConfig::default())
	}

	/// Create a new client with custom configuration
	pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self, ClientError> {
		let transport = HttpTransport::new(config.timeout())?;
		Ok(Self::with_transport(credentials, config, transport))
	}
}

impl<T: Transport> Client<T> {
	/// Create a client that sends through `transport`
	pub fn with_transport(credentials: Credentials, config: ClientConfig, transport: T) -> Self {
		Self {
			credentials,
			config,
			transport,
		}
	}

	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Full URL of an endpoint on the configured API version
	pub fn api_url(&self, path: &str) -> String {
		self.versioned_url(&self.config.api_version, path)
	}

	fn versioned_url(&self, api_version: &str, path: &str) -> String {
		format!("{}{}/partner{}", self.config.base_url, api_version, path)
	}

	/// Build the headers for one request signed at `timestamp`
	pub fn signed_headers(
		&self,
		args: &RequestArguments,
		timestamp: &str,
	) -> Result<SignedHeaders, ClientError> {
		let signature = sign(args, timestamp, &self.credentials.client_secret)?;

		Ok(SignedHeaders {
			user_agent: USER_AGENT.to_string(),
			client_id: self.credentials.client_id.clone(),
			authorization: self.credentials.authorization(),
			timestamp: timestamp.to_string(),
			signature,
		})
	}

	/// Send a signed request and return the response body verbatim
	pub async fn execute(
		&self,
		method: HttpVerb,
		path: &str,
		args: RequestArguments,
	) -> Result<String, ClientError> {
		self.dispatch(method, self.api_url(path), args).await
	}

	async fn dispatch(
		&self,
		method: HttpVerb,
		url: String,
		args: RequestArguments,
	) -> Result<String, ClientError> {
		let timestamp = Utc::now().timestamp_millis().to_string();
		let headers = self.signed_headers(&args, &timestamp)?;
		let body = serde_json::to_string(&args)
			.map_err(|e| ClientError::Serialization(format!("Failed to encode arguments: {}", e)))?;

		debug!(method = %method, url = %url, arguments = args.len(), "Dispatching request");

		self.transport
			.send(ApiRequest {
				method,
				url,
				headers: headers.to_pairs(),
				body,
			})
			.await
	}

	/// List processed documents
	pub async fn get_documents(&self) -> Result<String, ClientError> {
		self.execute(HttpVerb::Get, "/documents/", RequestArguments::new())
			.await
	}

	/// Get a document by ID
	pub async fn get_document(&self, document_id: u64) -> Result<String, ClientError> {
		let path = format!("/documents/{}/", document_id);
		self.execute(HttpVerb::Get, &path, id_argument(document_id))
			.await
	}

	/// Read a local file and submit it for extraction
	///
	/// `categories` falls back to [`DEFAULT_CATEGORIES`].
	pub async fn process_document(
		&self,
		file_path: impl AsRef<Path>,
		categories: Option<Vec<String>>,
		delete_after_processing: bool,
		additional_request_parameters: RequestArguments,
	) -> Result<String, ClientError> {
		let path = file_path.as_ref();
		let file_name = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.ok_or_else(|| ClientError::Io(format!("No file name in path: {}", path.display())))?;
		let data = tokio::fs::read(path)
			.await
			.map_err(|e| ClientError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

		self.process_document_data(
			&file_name,
			&data,
			categories,
			delete_after_processing,
			additional_request_parameters,
		)
		.await
	}

	/// Submit in-memory file contents for extraction
	pub async fn process_document_data(
		&self,
		file_name: &str,
		file_data: &[u8],
		categories: Option<Vec<String>>,
		delete_after_processing: bool,
		additional_request_parameters: RequestArguments,
	) -> Result<String, ClientError> {
		let categories = categories
			.unwrap_or_else(|| DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect());

		let mut args = RequestArguments::new();
		args.insert("file_name".to_string(), json!(file_name));
		args.insert("file_data".to_string(), json!(STANDARD.encode(file_data)));
		args.insert("categories".to_string(), json!(categories));
		args.insert("auto_delete".to_string(), json!(delete_after_processing));
		let args = merge_arguments(args, additional_request_parameters);

		self.execute(HttpVerb::Post, "/documents/", args).await
	}

	/// Submit one or more public URLs for extraction
	pub async fn process_document_url(
		&self,
		options: &ProcessDocumentUrlOptions,
	) -> Result<String, ClientError> {
		self.execute(HttpVerb::Post, "/documents/", options.to_arguments())
			.await
	}

	/// Delete a document
	pub async fn delete_document(&self, document_id: u64) -> Result<String, ClientError> {
		let path = format!("/documents/{}/", document_id);
		self.execute(HttpVerb::Delete, &path, id_argument(document_id))
			.await
	}

	/// Update writable fields of a document, e.g. `notes` or `vendor`
	pub async fn update_document(
		&self,
		document_id: u64,
		fields_to_update: RequestArguments,
	) -> Result<String, ClientError> {
		let path = format!("/documents/{}/", document_id);
		self.execute(HttpVerb::Put, &path, fields_to_update).await
	}

	/// List the line items of a document
	pub async fn get_line_items(&self, document_id: u64) -> Result<String, ClientError> {
		let path = format!("/documents/{}/line-items/", document_id);
		self.execute(HttpVerb::Get, &path, RequestArguments::new())
			.await
	}

	/// Get one line item of a document
	pub async fn get_line_item(
		&self,
		document_id: u64,
		line_item_id: u64,
	) -> Result<String, ClientError> {
		let path = format!("/documents/{}/line-items/{}", document_id, line_item_id);
		self.execute(HttpVerb::Get, &path, RequestArguments::new())
			.await
	}

	/// Add a line item to a document
	pub async fn add_line_item(
		&self,
		document_id: u64,
		payload: &AddLineItem,
	) -> Result<String, ClientError> {
		let path = format!("/documents/{}/line-items/", document_id);
		self.execute(HttpVerb::Post, &path, payload.to_arguments())
			.await
	}

	/// Update the set fields of an existing line item
	pub async fn update_line_item(
		&self,
		document_id: u64,
		line_item_id: u64,
		payload: &UpdateLineItem,
	) -> Result<String, ClientError> {
		let path = format!("/documents/{}/line-items/{}", document_id, line_item_id);
		self.execute(HttpVerb::Put, &path, payload.to_arguments())
			.await
	}

	/// Delete every line item of a document
	pub async fn delete_line_items(&self, document_id: u64) -> Result<String, ClientError> {
		let path = format!("/documents/{}/line-items/", document_id);
		self.execute(HttpVerb::Delete, &path, RequestArguments::new())
			.await
	}

	/// Delete one line item of a document
	pub async fn delete_line_item(
		&self,
		document_id: u64,
		line_item_id: u64,
	) -> Result<String, ClientError> {
		let path = format!("/documents/{}/line-items/{}", document_id, line_item_id);
		self.execute(HttpVerb::Delete, &path, RequestArguments::new())
			.await
	}

	/// Add a tag to a document
	pub async fn add_tag(&self, document_id: u64, tag: &str) -> Result<String, ClientError> {
		let path = format!("/documents/{}/tags/", document_id);
		self.execute(HttpVerb::Put, &path, single_argument("name", json!(tag)))
			.await
	}

	/// Add several tags to a document
	pub async fn add_tags(&self, document_id: u64, tags: &[&str]) -> Result<String, ClientError> {
		let path = format!("/documents/{}/tags/", document_id);
		self.execute(HttpVerb::Post, &path, single_argument("tags", json!(tags)))
			.await
	}

	/// Replace all tags of a document
	pub async fn replace_tags(&self, document_id: u64, tags: &[&str]) -> Result<String, ClientError> {
		let path = format!("/documents/{}/", document_id);
		self.execute(HttpVerb::Put, &path, single_argument("tags", json!(tags)))
			.await
	}

	/// List all tags of the account
	///
	/// Only served by the legacy API version.
	pub async fn get_tags(&self) -> Result<String, ClientError> {
		let url = self.versioned_url(LEGACY_API_VERSION, "/tags/");
		self.dispatch(HttpVerb::Get, url, RequestArguments::new())
			.await
	}

	/// List the tags of a document
	pub async fn get_document_tags(&self, document_id: u64) -> Result<String, ClientError> {
		let path = format!("/documents/{}/tags/", document_id);
		self.execute(HttpVerb::Get, &path, id_argument(document_id))
			.await
	}

	/// Unlink every tag from a document
	pub async fn delete_tags(&self, document_id: u64) -> Result<String, ClientError> {
		let path = format!("/documents/{}/tags/", document_id);
		self.execute(HttpVerb::Delete, &path, RequestArguments::new())
			.await
	}

	/// Unlink one tag from a document
	pub async fn delete_tag(&self, document_id: u64, tag_id: u64) -> Result<String, ClientError> {
		let path = format!("/documents/{}/tags/{}/", document_id, tag_id);
		self.execute(HttpVerb::Delete, &path, RequestArguments::new())
			.await
	}

	/// Verify a raw webhook body with this client's secret
	pub fn verify_webhook(&self, body: &str, signature: &str) -> bool {
		verify_webhook(body, &self.credentials.client_secret, signature)
	}
}

fn id_argument(id: u64) -> RequestArguments {
	single_argument("id", json!(id))
}

fn single_argument(key: &str, value: serde_json::Value) -> RequestArguments {
	let mut args = RequestArguments::new();
	args.insert(key.to_string(), value);
	args
}

/// Synchronous client wrapper
///
/// Runs the async [`Client`] on a private current-thread runtime, one blocking
/// call per operation. Do not call it from inside another tokio runtime.
pub struct SyncClient<T = HttpTransport> {
	client: Client<T>,
	runtime: tokio::runtime::Runtime,
}

impl SyncClient<HttpTransport> {
	/// Create a new synchronous client
	pub fn new(credentials: Credentials) -> Result<Self, ClientError> {
		Self::from_client(Client::new(credentials)?)
	}

	/// Create a new synchronous client with custom configuration
	pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self, ClientError> {
		Self::from_client(Client::with_config(credentials, config)?)
	}
}

impl<T: Transport> SyncClient<T> {
	/// Wrap an existing async client
	pub fn from_client(client: Client<T>) -> Result<Self, ClientError> {
		let runtime = tokio::runtime::Builder::new_current_thread()
			.enable_all()
			.build()
			.map_err(|e| ClientError::Runtime(format!("Failed to create tokio runtime: {}", e)))?;

		Ok(Self { client, runtime })
	}

	/// The wrapped async client
	pub fn inner(&self) -> &Client<T> {
		&self.client
	}

	pub fn execute(
		&self,
		method: HttpVerb,
		path: &str,
		args: RequestArguments,
	) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.execute(method, path, args))
	}

	pub fn get_documents(&self) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.get_documents())
	}

	pub fn get_document(&self, document_id: u64) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.get_document(document_id))
	}

	pub fn process_document(
		&self,
		file_path: impl AsRef<Path>,
		categories: Option<Vec<String>>,
		delete_after_processing: bool,
		additional_request_parameters: RequestArguments,
	) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.process_document(
			file_path,
			categories,
			delete_after_processing,
			additional_request_parameters,
		))
	}

	pub fn process_document_data(
		&self,
		file_name: &str,
		file_data: &[u8],
		categories: Option<Vec<String>>,
		delete_after_processing: bool,
		additional_request_parameters: RequestArguments,
	) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.process_document_data(
			file_name,
			file_data,
			categories,
			delete_after_processing,
			additional_request_parameters,
		))
	}

	pub fn process_document_url(
		&self,
		options: &ProcessDocumentUrlOptions,
	) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.process_document_url(options))
	}

	pub fn delete_document(&self, document_id: u64) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.delete_document(document_id))
	}

	pub fn update_document(
		&self,
		document_id: u64,
		fields_to_update: RequestArguments,
	) -> Result<String, ClientError> {
		self.runtime
			.block_on(self.client.update_document(document_id, fields_to_update))
	}

	pub fn get_line_items(&self, document_id: u64) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.get_line_items(document_id))
	}

	pub fn get_line_item(&self, document_id: u64, line_item_id: u64) -> Result<String, ClientError> {
		self.runtime
			.block_on(self.client.get_line_item(document_id, line_item_id))
	}

	pub fn add_line_item(
		&self,
		document_id: u64,
		payload: &AddLineItem,
	) -> Result<String, ClientError> {
		self.runtime
			.block_on(self.client.add_line_item(document_id, payload))
	}

	pub fn update_line_item(
		&self,
		document_id: u64,
		line_item_id: u64,
		payload: &UpdateLineItem,
	) -> Result<String, ClientError> {
		self.runtime.block_on(
			self.client
				.update_line_item(document_id, line_item_id, payload),
		)
	}

	pub fn delete_line_items(&self, document_id: u64) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.delete_line_items(document_id))
	}

	pub fn delete_line_item(
		&self,
		document_id: u64,
		line_item_id: u64,
	) -> Result<String, ClientError> {
		self.runtime
			.block_on(self.client.delete_line_item(document_id, line_item_id))
	}

	pub fn add_tag(&self, document_id: u64, tag: &str) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.add_tag(document_id, tag))
	}

	pub fn add_tags(&self, document_id: u64, tags: &[&str]) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.add_tags(document_id, tags))
	}

	pub fn replace_tags(&self, document_id: u64, tags: &[&str]) -> Result<String, ClientError> {
		self.runtime
			.block_on(self.client.replace_tags(document_id, tags))
	}

	pub fn get_tags(&self) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.get_tags())
	}

	pub fn get_document_tags(&self, document_id: u64) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.get_document_tags(document_id))
	}

	pub fn delete_tags(&self, document_id: u64) -> Result<String, ClientError> {
		self.runtime.block_on(self.client.delete_tags(document_id))
	}

	pub fn delete_tag(&self, document_id: u64, tag_id: u64) -> Result<String, ClientError> {
		self.runtime
			.block_on(self.client.delete_tag(document_id, tag_id))
	}

	pub fn verify_webhook(&self, body: &str, signature: &str) -> bool {
		self.client.verify_webhook(body, signature)
	}
}
