//! Viewer authorization constraints returned by the token-info endpoint.

// crates.io
use serde_json::{Map, Value};
use url::form_urlencoded;
// self
use crate::{_prelude::*, error::ProtocolError, http::ResponseBody};

const AUTHORIZATION_DETAILS: &str = "authorization_details";

/// Token-info mapping split into the authorization details and the remaining parameters.
///
/// Each exchange owns its own value, so nothing here is shared across invocations.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenInfo {
	authorization_details: Value,
	params: Map<String, Value>,
}
impl TokenInfo {
	/// Splits a token-info response body. A missing `authorization_details` becomes `null`.
	pub fn from_body(body: ResponseBody) -> Result<Self, ProtocolError> {
		let ResponseBody::Parsed(Value::Object(mut params)) = body else {
			return Err(ProtocolError::TokenInfoNotObject);
		};
		let authorization_details = params.shift_remove(AUTHORIZATION_DETAILS).unwrap_or(Value::Null);

		Ok(Self { authorization_details, params })
	}

	/// Issuer-defined constraints, forwarded without inspection.
	pub fn authorization_details(&self) -> &Value {
		&self.authorization_details
	}

	/// Remaining fields in issuer order.
	pub fn params(&self) -> &Map<String, Value> {
		&self.params
	}

	/// Encodes the scoped-token request body.
	///
	/// Issuer fields keep their order, followed by `grant_type` and the compact JSON form of
	/// `authorization_details`. An issuer-supplied `grant_type` is overwritten in place.
	pub fn into_exchange_form(self, grant_type: &str) -> String {
		let Self { authorization_details, mut params } = self;

		params.insert("grant_type".into(), Value::String(grant_type.into()));
		params.insert(AUTHORIZATION_DETAILS.into(), Value::String(authorization_details.to_string()));

		let mut form = form_urlencoded::Serializer::new(String::new());

		for (key, value) in &params {
			match value {
				Value::String(text) => form.append_pair(key, text),
				other => form.append_pair(key, &other.to_string()),
			};
		}

		form.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn info(value: Value) -> TokenInfo {
		TokenInfo::from_body(ResponseBody::Parsed(value)).expect("Token info fixture should split.")
	}

	#[test]
	fn splits_details_and_forwards_other_fields() {
		let info = info(json!({ "authorization_details": { "scope": "dash:42" }, "foo": "bar" }));

		assert_eq!(info.authorization_details(), &json!({ "scope": "dash:42" }));
		assert_eq!(info.params().len(), 1);
		assert_eq!(
			info.into_exchange_form("client_credentials"),
			"foo=bar&grant_type=client_credentials&authorization_details=%7B%22scope%22%3A%22dash%3A42%22%7D"
		);
	}

	#[test]
	fn missing_details_are_sent_as_null() {
		let info = info(json!({ "foo": "bar" }));

		assert_eq!(info.authorization_details(), &Value::Null);
		assert_eq!(
			info.into_exchange_form("client_credentials"),
			"foo=bar&grant_type=client_credentials&authorization_details=null"
		);
	}

	#[test]
	fn keeps_issuer_order_and_overrides_grant_type_in_place() {
		let info = info(json!({
			"zeta": "1",
			"grant_type": "other",
			"authorization_details": [],
			"alpha": 7,
			"flag": true,
		}));

		assert_eq!(
			info.into_exchange_form("client_credentials"),
			"zeta=1&grant_type=client_credentials&alpha=7&flag=true&authorization_details=%5B%5D"
		);
	}

	#[test]
	fn rejects_non_object_bodies() {
		assert!(matches!(
			TokenInfo::from_body(ResponseBody::Raw("<html>".into())),
			Err(ProtocolError::TokenInfoNotObject)
		));
		assert!(matches!(
			TokenInfo::from_body(ResponseBody::Parsed(json!(["a"]))),
			Err(ProtocolError::TokenInfoNotObject)
		));
	}
}
