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

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Request body and signature input for a single call.
///
/// This is `serde_json::Map` built with `preserve_order`, so iteration follows
/// insertion order. The request signature depends on that order; do not
/// replace this with a hashed map.
pub type RequestArguments = serde_json::Map<String, serde_json::Value>;

/// Header carrying the request timestamp in epoch milliseconds
pub const TIMESTAMP_HEADER: &str = "X-Veryfi-Request-Timestamp";

/// Header carrying the request signature
pub const SIGNATURE_HEADER: &str = "X-Veryfi-Request-Signature";

/// Header the service sets on outbound webhook calls
pub const WEBHOOK_SIGNATURE_HEADER: &str = "X-Veryfi-Signature";

/// Categories used when a document is processed without an explicit list
pub const DEFAULT_CATEGORIES: [&str; 15] = [
	"Advertising & Marketing",
	"Automotive",
	"Bank Charges & Fees",
	"Legal & Professional Services",
	"Insurance",
	"Meals & Entertainment",
	"Office Supplies & Software",
	"Taxes & Licenses",
	"Travel",
	"Rent & Lease",
	"Repairs & Maintenance",
	"Payroll",
	"Utilities",
	"Job Supplies",
	"Grocery",
];

/// HTTP verb of an API call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
	Get,
	Post,
	Put,
	Delete,
}

impl HttpVerb {
	pub fn as_str(&self) -> &'static str {
		match self {
			HttpVerb::Get => "GET",
			HttpVerb::Post => "POST",
			HttpVerb::Put => "PUT",
			HttpVerb::Delete => "DELETE",
		}
	}
}

impl fmt::Display for HttpVerb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Account credentials issued by the service
///
/// Immutable once handed to a client.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
	/// Client ID, sent as `Client-ID`
	pub client_id: String,
	/// Client secret, used only as the signing key
	pub client_secret: String,
	/// Username part of the `Authorization` header
	pub username: String,
	/// API key part of the `Authorization` header
	pub api_key: String,
}

impl Credentials {
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		username: impl Into<String>,
		api_key: impl Into<String>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			username: username.into(),
			api_key: api_key.into(),
		}
	}

	/// Value of the `Authorization` header
	pub fn authorization(&self) -> String {
		format!("apikey {}:{}", self.username, self.api_key)
	}
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("username", &self.username)
			.field("api_key", &"<redacted>")
			.finish()
	}
}

/// Headers attached to one outgoing request
///
/// Built fresh for every call; the timestamp and signature are never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
	pub user_agent: String,
	pub client_id: String,
	pub authorization: String,
	pub timestamp: String,
	pub signature: String,
}

impl SignedHeaders {
	/// Header name/value pairs in wire order
	pub fn to_pairs(&self) -> Vec<(String, String)> {
		vec![
			("User-Agent".to_string(), self.user_agent.clone()),
			("Accept".to_string(), "application/json".to_string()),
			("Content-Type".to_string(), "application/json".to_string()),
			("Client-ID".to_string(), self.client_id.clone()),
			("Authorization".to_string(), self.authorization.clone()),
			(TIMESTAMP_HEADER.to_string(), self.timestamp.clone()),
			(SIGNATURE_HEADER.to_string(), self.signature.clone()),
		]
	}
}

/// Options for processing documents from public URLs
///
/// Either `file_url` or `file_urls` is required by the service. Unset options
/// are still sent, as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessDocumentUrlOptions {
	/// Publicly accessible URL of a single file
	pub file_url: Option<String>,
	/// Publicly accessible URLs of several files
	pub file_urls: Option<Vec<String>>,
	/// Categories the service may assign
	pub categories: Option<Vec<String>>,
	/// Delete the document from the service once extracted
	pub delete_after_processing: bool,
	/// Skip data enrichment for faster processing
	pub boost_mode: bool,
	/// Caller-assigned document identifier
	pub external_id: Option<String>,
	/// Number of pages to read, starting from page 1
	pub max_pages_to_process: Option<u32>,
	/// Extra parameters merged over the ones above
	pub additional_request_parameters: RequestArguments,
}

impl ProcessDocumentUrlOptions {
	pub fn from_url(file_url: impl Into<String>) -> Self {
		Self {
			file_url: Some(file_url.into()),
			..Default::default()
		}
	}

	pub fn from_urls(file_urls: Vec<String>) -> Self {
		Self {
			file_urls: Some(file_urls),
			..Default::default()
		}
	}

	pub fn to_arguments(&self) -> RequestArguments {
		let mut args = RequestArguments::new();
		args.insert("auto_delete".to_string(), json!(self.delete_after_processing));
		args.insert("boost_mode".to_string(), json!(u8::from(self.boost_mode)));
		args.insert("categories".to_string(), json!(self.categories));
		args.insert("external_id".to_string(), json!(self.external_id));
		args.insert("file_url".to_string(), json!(self.file_url));
		args.insert("file_urls".to_string(), json!(self.file_urls));
		args.insert("max_pages_to_process".to_string(), json!(self.max_pages_to_process));
		merge_arguments(args, self.additional_request_parameters.clone())
	}
}

/// Merge `extra` over `base`
///
/// Existing keys are replaced in place and new keys are appended, so the
/// signing order stays deterministic.
pub fn merge_arguments(mut base: RequestArguments, extra: RequestArguments) -> RequestArguments {
	for (key, value) in extra {
		base.insert(key, value);
	}
	base
}
