//! Crate-level error types shared by the HTTP client, the exchange engine, and configuration.

// self
use crate::{_prelude::*, obs::ExchangeStep};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The token exchange aborted at `step`.
	#[error("Token exchange failed while requesting the {step}: {source}")]
	Exchange {
		/// Step that produced the failure.
		step: ExchangeStep,
		/// Underlying cause.
		#[source]
		source: StepError,
	},
}
impl Error {
	/// Returns the exchange step that failed, if this is an exchange failure.
	pub fn step(&self) -> Option<ExchangeStep> {
		match self {
			Self::Exchange { step, .. } => Some(*step),
			Self::Config(_) => None,
		}
	}

	/// Returns the upstream HTTP status when the failure was a non-2xx response.
	pub fn upstream_status(&self) -> Option<u16> {
		match self {
			Self::Exchange {
				source: StepError::Http(HttpError::UpstreamHttp { status, .. }), ..
			} => Some(*status),
			_ => None,
		}
	}
}

/// Failure raised by a single exchange step.
#[derive(Debug, ThisError)]
pub enum StepError {
	/// The HTTP call itself failed.
	#[error(transparent)]
	Http(#[from] HttpError),
	/// The upstream answered 2xx but the payload lacked what the protocol requires.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// The caller-supplied deadline passed before the step completed.
	#[error("Exchange deadline elapsed.")]
	DeadlineElapsed,
}

/// HTTP client failures.
#[derive(Debug, ThisError)]
pub enum HttpError {
	/// Request body cannot be represented as bytes or text.
	#[error("Request body of kind `{kind}` is not bytes or text.")]
	InvalidBodyType {
		/// Kind of the rejected payload.
		kind: &'static str,
	},
	/// Transport-level failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Upstream answered outside the 2xx range.
	#[error("Upstream returned HTTP {status}: {body}")]
	UpstreamHttp {
		/// HTTP status code.
		status: u16,
		/// Raw response body kept for diagnostics.
		body: String,
	},
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for HttpError {
	fn from(e: ReqwestError) -> Self {
		Self::Transport(e.into())
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the upstream.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The transport's own timeout fired.
	#[error("Request to the upstream timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// A 2xx response whose payload does not follow the token exchange protocol.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Token endpoint response has no usable `access_token`.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
	/// Token endpoint response has an unexpected shape.
	#[error("Token endpoint response is malformed.")]
	MalformedTokenResponse {
		/// Path-aware decoding failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token-info endpoint did not return a JSON object.
	#[error("Token info response is not a JSON object.")]
	TokenInfoNotObject,
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Required settings were absent or empty.
	#[error("Missing required configuration: {}.", .keys.join(", "))]
	Missing {
		/// Every missing key, in declaration order.
		keys: Vec<&'static str>,
	},
	/// Instance URL cannot be parsed.
	#[error("Instance URL is invalid.")]
	InvalidInstanceUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Instance URL is not an http(s) base URL.
	#[error("Instance URL `{url}` must be an absolute http or https URL.")]
	UnsupportedInstanceUrl {
		/// Offending URL.
		url: String,
	},
	/// An identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// Listen port is not a valid `u16`.
	#[error("Port `{value}` is not a valid TCP port.")]
	InvalidPort {
		/// Raw value read from configuration.
		value: String,
	},
	/// Exchange timeout is not a whole number of seconds.
	#[error("Exchange timeout `{value}` is not a whole number of seconds.")]
	InvalidTimeout {
		/// Raw value read from configuration.
		value: String,
	},
	/// Built-in page templates failed to register.
	#[cfg(feature = "server")]
	#[error("Page template is invalid.")]
	InvalidTemplate {
		/// Template parsing failure.
		#[source]
		source: handlebars::TemplateError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn exchange_error_reports_step_and_status() {
		let err = Error::Exchange {
			step: ExchangeStep::TokenInfo,
			source: HttpError::UpstreamHttp { status: 401, body: "denied".into() }.into(),
		};

		assert_eq!(err.step(), Some(ExchangeStep::TokenInfo));
		assert_eq!(err.upstream_status(), Some(401));
		assert_eq!(
			err.to_string(),
			"Token exchange failed while requesting the token info: Upstream returned HTTP 401: denied"
		);
	}

	#[test]
	fn missing_config_lists_every_key() {
		let err = ConfigError::Missing { keys: vec!["INSTANCE_URL", "DASHBOARD_ID"] };

		assert_eq!(err.to_string(), "Missing required configuration: INSTANCE_URL, DASHBOARD_ID.");
	}
}
