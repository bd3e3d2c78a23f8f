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

//! Veryfi SDK - Client library for document extraction
//!
//! This crate provides a signed request client for the Veryfi partner API,
//! typed line item payloads, and webhook signature verification.
//!
//! The SDK is designed to be lightweight and embeddable:
//! - No background threads
//! - No retries, pooling policy or rate limiting
//! - Responses are returned as raw JSON text for the caller to interpret
//!
//! ```no_run
//! use veryfi_sdk::{Credentials, SyncClient};
//!
//! let credentials = Credentials::new("client_id", "client_secret", "username", "api_key");
//! let client = SyncClient::new(credentials)?;
//! let documents = client.get_documents()?;
//! println!("{documents}");
//! # Ok::<(), veryfi_sdk::ClientError>(())
//! ```

pub mod client;
pub mod config;
pub mod line_item;
pub mod signing;
pub mod transport;
pub mod types;
pub mod webhook;

pub use client::{Client, ClientError, SyncClient};
pub use config::ClientConfig;
pub use line_item::{AddLineItem, LineItemField, LineItemPayload, PayloadError, UpdateLineItem};
pub use signing::{SigningError, sign, verify_signature};
pub use transport::{ApiRequest, HttpTransport, RecordingTransport, Transport};
pub use types::*;
pub use webhook::{WebhookEvent, verify_webhook};
