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

//! Request signing
//!
//! Every API call carries an HMAC-SHA256 signature over a canonical text
//! rendering of its arguments, keyed with the client secret:
//!
//! ```text
//! timestamp:<millis>,<key>:<value>,<key>:<value>,...
//! ```
//!
//! The `timestamp:` prefix is only written when a timestamp is given. Webhook
//! verification signs the event `data` object with no timestamp at all.
//!
//! Arguments are rendered in iteration order, so the signature is only
//! reproducible when both sides walk the arguments in the same order. This is
//! why [`RequestArguments`] is an insertion-ordered map.

use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

use crate::types::RequestArguments;

type HmacSha256 = Hmac<Sha256>;

/// Error types for signing operations
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
	#[error("Invalid signing key: {0}")]
	Key(String),
}

/// Build the canonical text that gets signed.
pub fn signature_payload(args: &RequestArguments, timestamp: &str) -> String {
	let mut payload = if timestamp.is_empty() {
		String::new()
	} else {
		format!("timestamp:{timestamp}")
	};

	for (key, value) in args {
		if !payload.is_empty() {
			payload.push(',');
		}
		payload.push_str(key);
		payload.push(':');
		payload.push_str(&render_value(value));
	}

	payload
}

// Scalars follow the service's string coercion: booleans become "1" or "",
// null becomes "". Structured values are compact JSON.
fn render_value(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::Bool(true) => "1".to_string(),
		Value::Bool(false) => String::new(),
		Value::Number(n) => n.to_string(),
		Value::String(s) => s.clone(),
		Value::Array(_) | Value::Object(_) => value.to_string(),
	}
}

/// Sign request arguments
///
/// Returns the base64-encoded HMAC-SHA256 of [`signature_payload`] keyed with
/// `secret`. Pass an empty `timestamp` to sign without the timestamp prefix.
pub fn sign(args: &RequestArguments, timestamp: &str, secret: &str) -> Result<String, SigningError> {
	let payload = signature_payload(args, timestamp);

	let mut mac =
		HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| SigningError::Key(e.to_string()))?;
	mac.update(payload.as_bytes());
	let digest = mac.finalize().into_bytes();

	Ok(STANDARD.encode(digest).trim().to_string())
}

/// Verify a webhook signature
///
/// `payload` is the `data` object of the webhook body and `client_signature`
/// the value of the `X-Veryfi-Signature` header. Never errors: anything that
/// prevents a match yields `false`.
pub fn verify_signature(payload: &RequestArguments, client_secret: &str, client_signature: &str) -> bool {
	match sign(payload, "", client_secret) {
		Ok(signature) => signature.as_bytes() == client_signature.as_bytes(),
		Err(_) => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn args(value: Value) -> RequestArguments {
		match value {
			Value::Object(map) => map,
			_ => panic!("test arguments must be an object"),
		}
	}

	#[test]
	fn test_payload_with_timestamp() {
		let a = args(json!({"id": 31727276, "notes": "see me"}));
		assert_eq!(
			signature_payload(&a, "1700000000000"),
			"timestamp:1700000000000,id:31727276,notes:see me"
		);
	}

	#[test]
	fn test_payload_without_timestamp() {
		let a = args(json!({"id": 63184393, "created": "2022-03-28 21:12:14"}));
		assert_eq!(signature_payload(&a, ""), "id:63184393,created:2022-03-28 21:12:14");
	}

	#[test]
	fn test_payload_empty_arguments() {
		let a = RequestArguments::new();
		assert_eq!(signature_payload(&a, "42"), "timestamp:42");
		assert_eq!(signature_payload(&a, ""), "");
	}

	#[test]
	fn test_payload_renders_structured_values_as_json() {
		let a = args(json!({
			"categories": ["Grocery", "Travel"],
			"meta": {"b": 1, "a": "x/y"},
		}));
		assert_eq!(
			signature_payload(&a, ""),
			r#"categories:["Grocery","Travel"],meta:{"b":1,"a":"x/y"}"#
		);
	}

	#[test]
	fn test_payload_scalar_coercion() {
		let a = args(json!({"t": true, "f": false, "n": null, "x": 20.1}));
		assert_eq!(signature_payload(&a, ""), "t:1,f:,n:,x:20.1");
	}

	#[test]
	fn test_payload_follows_insertion_order() {
		let mut a = RequestArguments::new();
		a.insert("z".to_string(), json!(1));
		a.insert("a".to_string(), json!(2));
		assert_eq!(signature_payload(&a, ""), "z:1,a:2");
	}

	#[test]
	fn test_sign_golden_value() {
		let a = args(json!({"id": 31727276}));
		let signature = sign(&a, "1700000000000", "client_secret").unwrap();
		assert_eq!(signature, "02q+BhYYa+mKx1fyNCy1Mcj5w3VxJUSIuvWPGzfGWu8=");
	}

	#[test]
	fn test_sign_is_deterministic() {
		let a = args(json!({"id": 1, "tags": ["a", "b"]}));
		let first = sign(&a, "1700000000000", "secret").unwrap();
		let second = sign(&a, "1700000000000", "secret").unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn test_sign_changes_with_value() {
		let a = args(json!({"id": 31727276}));
		let b = args(json!({"id": 31727277}));
		let sa = sign(&a, "1700000000000", "client_secret").unwrap();
		let sb = sign(&b, "1700000000000", "client_secret").unwrap();
		assert_ne!(sa, sb);
		assert_eq!(sb, "uysrBc17Ef/bu+7P7jbZ2xnViLVXNLhQljECQr0KGrI=");
	}

	#[test]
	fn test_sign_changes_with_timestamp_and_secret() {
		let a = args(json!({"id": 1}));
		let base = sign(&a, "1", "secret").unwrap();
		assert_ne!(base, sign(&a, "2", "secret").unwrap());
		assert_ne!(base, sign(&a, "1", "other").unwrap());
	}

	#[test]
	fn test_verify_round_trip() {
		let a = args(json!({"id": 7, "created": "2022-03-28 21:12:14"}));
		let signature = sign(&a, "", "secret").unwrap();
		assert!(verify_signature(&a, "secret", &signature));
	}

	#[test]
	fn test_verify_known_webhook_signature() {
		let secret = "fAKEB2oJMLbHwBN5jEd6h3f3Lj1o9gK5kcz2xAf8Kyi2X1PNaJ6F612344YcOsSllGkFAkeUiZV5ZTNoPkk6bXyctGGAdfcratu4Dl2CA2XtU6En5icHxjVRUNoSFGP";
		let data = args(json!({"id": 63184393, "created": "2022-03-28 21:12:14"}));
		assert!(verify_signature(
			&data,
			secret,
			"XNtSUt0nzyUU4khUXlVDPr5qNLnuDP/V7RkFSb0ygaY="
		));
	}

	#[test]
	fn test_verify_rejects_mismatch() {
		let a = args(json!({"id": 7}));
		let signature = sign(&a, "", "secret").unwrap();
		assert!(!verify_signature(&a, "wrong", &signature));
		assert!(!verify_signature(&a, "secret", ""));
		assert!(!verify_signature(&a, "secret", &signature.to_lowercase()));
	}
}
