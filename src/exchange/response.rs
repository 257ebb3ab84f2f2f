//! Token endpoint response decoding.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, auth::AccessToken, error::ProtocolError, http::ResponseBody};

#[derive(Debug, Deserialize)]
struct TokenResponse {
	#[serde(default)]
	access_token: Option<String>,
}

/// Extracts a non-empty `access_token` from a token endpoint response.
pub(crate) fn decode_access_token(body: ResponseBody) -> Result<AccessToken, ProtocolError> {
	let value = match body {
		ResponseBody::Parsed(value @ Value::Object(_)) => value,
		_ => return Err(ProtocolError::MissingAccessToken),
	};
	let response: TokenResponse = serde_path_to_error::deserialize(value)
		.map_err(|source| ProtocolError::MalformedTokenResponse { source })?;

	response
		.access_token
		.filter(|token| !token.is_empty())
		.map(AccessToken::new)
		.ok_or(ProtocolError::MissingAccessToken)
}
