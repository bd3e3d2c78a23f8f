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

//! Inbound webhook handling
//!
//! The service posts `{"event": "...", "data": {...}}` and signs the `data`
//! object with the client secret, sending the result in the
//! `X-Veryfi-Signature` header. The body must be parsed without reordering
//! `data`, which [`RequestArguments`] guarantees.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::signing::verify_signature;
use crate::types::RequestArguments;

/// Error types for webhook parsing
#[derive(Debug, Error)]
pub enum WebhookError {
	#[error("Malformed webhook body: {0}")]
	Malformed(String),
}

/// A webhook notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
	/// Event name, e.g. `document.created`
	#[serde(default)]
	pub event: Option<String>,
	/// Signed event data
	pub data: RequestArguments,
}

impl WebhookEvent {
	/// Check `signature` against this event's data
	pub fn verify(&self, client_secret: &str, signature: &str) -> bool {
		verify_signature(&self.data, client_secret, signature)
	}
}

/// Parse a raw webhook body
pub fn parse_event(body: &str) -> Result<WebhookEvent, WebhookError> {
	serde_json::from_str(body).map_err(|e| WebhookError::Malformed(e.to_string()))
}

/// Parse a raw webhook body and verify its signature
///
/// Returns `false` for bodies that cannot be parsed.
pub fn verify_webhook(body: &str, client_secret: &str, signature: &str) -> bool {
	match parse_event(body) {
		Ok(event) => event.verify(client_secret, signature),
		Err(e) => {
			debug!(error = %e, "Rejecting unparseable webhook body");
			false
		}
	}
}
