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

//! Line item payloads
//!
//! Both payloads accept the same closed set of fields ([`LineItemField`]).
//! Building one from an arbitrary JSON object checks every key against that
//! set; the `verify` flag decides whether an unknown key is an error or is
//! dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::types::RequestArguments;

/// Error types for payload construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
	#[error("Bad Argument: unknown line item field `{0}`")]
	UnknownField(String),
	#[error("Bad Argument: field `{field}` expects {expected}")]
	InvalidValue {
		field: &'static str,
		expected: &'static str,
	},
}

/// Every field a line item payload may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineItemField {
	Order,
	Description,
	Total,
	Sku,
	Category,
	Tax,
	Price,
	UnitOfMeasure,
	Quantity,
	Upc,
	TaxRate,
	DiscountRate,
	StartDate,
	EndDate,
	Hsn,
	Section,
	Weight,
}

impl LineItemField {
	pub const ALL: [LineItemField; 17] = [
		LineItemField::Order,
		LineItemField::Description,
		LineItemField::Total,
		LineItemField::Sku,
		LineItemField::Category,
		LineItemField::Tax,
		LineItemField::Price,
		LineItemField::UnitOfMeasure,
		LineItemField::Quantity,
		LineItemField::Upc,
		LineItemField::TaxRate,
		LineItemField::DiscountRate,
		LineItemField::StartDate,
		LineItemField::EndDate,
		LineItemField::Hsn,
		LineItemField::Section,
		LineItemField::Weight,
	];

	/// Wire name of the field
	pub fn as_str(&self) -> &'static str {
		match self {
			LineItemField::Order => "order",
			LineItemField::Description => "description",
			LineItemField::Total => "total",
			LineItemField::Sku => "sku",
			LineItemField::Category => "category",
			LineItemField::Tax => "tax",
			LineItemField::Price => "price",
			LineItemField::UnitOfMeasure => "unit_of_measure",
			LineItemField::Quantity => "quantity",
			LineItemField::Upc => "upc",
			LineItemField::TaxRate => "tax_rate",
			LineItemField::DiscountRate => "discount_rate",
			LineItemField::StartDate => "start_date",
			LineItemField::EndDate => "end_date",
			LineItemField::Hsn => "hsn",
			LineItemField::Section => "section",
			LineItemField::Weight => "weight",
		}
	}

	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|field| field.as_str() == name)
	}
}

/// Fields shared by both line item payloads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedLineItem {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sku: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tax: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub price: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub unit_of_measure: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub quantity: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub upc: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tax_rate: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub discount_rate: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub start_date: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub end_date: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub hsn: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub section: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub weight: Option<String>,
}

impl SharedLineItem {
	fn assign(&mut self, field: LineItemField, value: &Value) -> Result<(), PayloadError> {
		let name = field.as_str();
		match field {
			LineItemField::Sku => self.sku = string_value(name, value)?,
			LineItemField::Category => self.category = string_value(name, value)?,
			LineItemField::Tax => self.tax = float_value(name, value)?,
			LineItemField::Price => self.price = float_value(name, value)?,
			LineItemField::UnitOfMeasure => self.unit_of_measure = string_value(name, value)?,
			LineItemField::Quantity => self.quantity = float_value(name, value)?,
			LineItemField::Upc => self.upc = string_value(name, value)?,
			LineItemField::TaxRate => self.tax_rate = float_value(name, value)?,
			LineItemField::DiscountRate => self.discount_rate = float_value(name, value)?,
			LineItemField::StartDate => self.start_date = string_value(name, value)?,
			LineItemField::EndDate => self.end_date = string_value(name, value)?,
			LineItemField::Hsn => self.hsn = string_value(name, value)?,
			LineItemField::Section => self.section = string_value(name, value)?,
			LineItemField::Weight => self.weight = string_value(name, value)?,
			// order, description and total live on the concrete payloads
			LineItemField::Order | LineItemField::Description | LineItemField::Total => {}
		}
		Ok(())
	}
}

/// Common behaviour of the line item payloads
pub trait LineItemPayload: Default + Serialize {
	/// Store `value` in the slot for `field`
	fn assign(&mut self, field: LineItemField, value: &Value) -> Result<(), PayloadError>;

	/// Build a payload from an arbitrary JSON object
	///
	/// With `verify` set, a key outside [`LineItemField`] fails with
	/// [`PayloadError::UnknownField`]; otherwise it is ignored.
	fn from_map(data: &RequestArguments, verify: bool) -> Result<Self, PayloadError> {
		let mut payload = Self::default();
		for (key, value) in data {
			match LineItemField::from_name(key) {
				Some(field) => payload.assign(field, value)?,
				None if verify => return Err(PayloadError::UnknownField(key.clone())),
				None => debug!(field = %key, "Dropping unknown line item field"),
			}
		}
		Ok(payload)
	}

	/// Request arguments holding only the fields that are set
	fn to_arguments(&self) -> RequestArguments {
		match serde_json::to_value(self) {
			Ok(Value::Object(map)) => map,
			_ => RequestArguments::new(),
		}
	}
}

/// Payload for adding a line item to a document
///
/// `order`, `description` and `total` are expected by the service but are not
/// enforced here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddLineItem {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub total: Option<f64>,
	#[serde(flatten)]
	pub shared: SharedLineItem,
}

impl AddLineItem {
	pub fn new(order: i64, description: impl Into<String>, total: f64) -> Self {
		Self {
			order: Some(order),
			description: Some(description.into()),
			total: Some(total),
			shared: SharedLineItem::default(),
		}
	}
}

impl LineItemPayload for AddLineItem {
	fn assign(&mut self, field: LineItemField, value: &Value) -> Result<(), PayloadError> {
		assign_common(
			field,
			value,
			&mut self.order,
			&mut self.description,
			&mut self.total,
			&mut self.shared,
		)
	}
}

/// Payload for updating an existing line item
///
/// Every field is optional; only the ones that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateLineItem {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub total: Option<f64>,
	#[serde(flatten)]
	pub shared: SharedLineItem,
}

impl LineItemPayload for UpdateLineItem {
	fn assign(&mut self, field: LineItemField, value: &Value) -> Result<(), PayloadError> {
		assign_common(
			field,
			value,
			&mut self.order,
			&mut self.description,
			&mut self.total,
			&mut self.shared,
		)
	}
}

fn assign_common(
	field: LineItemField,
	value: &Value,
	order: &mut Option<i64>,
	description: &mut Option<String>,
	total: &mut Option<f64>,
	shared: &mut SharedLineItem,
) -> Result<(), PayloadError> {
	let name = field.as_str();
	match field {
		LineItemField::Order => *order = integer_value(name, value)?,
		LineItemField::Description => *description = string_value(name, value)?,
		LineItemField::Total => *total = float_value(name, value)?,
		_ => shared.assign(field, value)?,
	}
	Ok(())
}

fn string_value(field: &'static str, value: &Value) -> Result<Option<String>, PayloadError> {
	match value {
		Value::Null => Ok(None),
		Value::String(s) => Ok(Some(s.clone())),
		_ => Err(PayloadError::InvalidValue {
			field,
			expected: "a string",
		}),
	}
}

fn float_value(field: &'static str, value: &Value) -> Result<Option<f64>, PayloadError> {
	match value {
		Value::Null => Ok(None),
		Value::Number(n) => n.as_f64().map(Some).ok_or(PayloadError::InvalidValue {
			field,
			expected: "a number",
		}),
		_ => Err(PayloadError::InvalidValue {
			field,
			expected: "a number",
		}),
	}
}

fn integer_value(field: &'static str, value: &Value) -> Result<Option<i64>, PayloadError> {
	match value {
		Value::Null => Ok(None),
		Value::Number(n) => n.as_i64().map(Some).ok_or(PayloadError::InvalidValue {
			field,
			expected: "an integer",
		}),
		_ => Err(PayloadError::InvalidValue {
			field,
			expected: "an integer",
		}),
	}
}
