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

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Credentials;

/// Default service base URL (can be overridden by VERYFI_BASE_URL)
pub const DEFAULT_BASE_URL: &str = "https://api.veryfi.com/api/";

/// Default API version segment (can be overridden by VERYFI_API_VERSION)
pub const DEFAULT_API_VERSION: &str = "v8";

/// Default per-request timeout in seconds (can be overridden by VERYFI_API_TIMEOUT_SECS)
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 120;

/// API version still serving the account-wide tag listing
pub const LEGACY_API_VERSION: &str = "v7";

/// Prefix of every environment variable read by the loaders below
pub const ENV_PREFIX: &str = "VERYFI";

/// Connection settings for a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// Base URL, including the trailing slash
	pub base_url: String,
	/// API version segment appended to the base URL
	pub api_version: String,
	/// Per-request timeout in seconds
	pub api_timeout_secs: u64,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			api_version: DEFAULT_API_VERSION.to_string(),
			api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
		}
	}
}

impl ClientConfig {
	/// Load configuration from environment variables
	pub fn from_env() -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
			.build()?;

		cfg.try_deserialize()
	}

	/// Load configuration from file
	pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::File::with_name(path))
			.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
			.build()?;

		cfg.try_deserialize()
	}

	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.api_timeout_secs)
	}
}

impl Credentials {
	/// Load credentials from `VERYFI_CLIENT_ID`, `VERYFI_CLIENT_SECRET`,
	/// `VERYFI_USERNAME` and `VERYFI_API_KEY`
	pub fn from_env() -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::Environment::with_prefix(ENV_PREFIX))
			.build()?;

		cfg.try_deserialize()
	}
}
