//! Transport primitives for the token exchange.
//!
//! The module exposes [`HttpClient`], the engine's only dependency on an HTTP stack, along
//! with the request/response values it exchanges. Response bodies come back as a tagged
//! [`ResponseBody`] so callers match on `Parsed` vs `Raw` explicitly instead of probing
//! the shape of a dynamic value.

// std
#[cfg(feature = "reqwest")] use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, error::HttpError};

/// Boxed future returned by [`HttpClient::request`].
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + 'a + Send>>;

/// Abstraction over HTTP transports used by the exchange engine.
///
/// Implementations must be `Send + Sync + 'static` so one client can be shared (behind an
/// `Arc`) by every concurrent page render.
///
/// # Contract
///
/// - Reject a body that is not bytes or text with [`HttpError::InvalidBodyType`] before any
///   network I/O; [`HttpRequest::body_bytes`] performs that check.
/// - Map a 2xx response to [`HttpResponse`] with its body decoded through [`ResponseBody::decode`].
/// - Map every other status to [`HttpError::UpstreamHttp`], keeping the raw body.
/// - Never retry.
pub trait HttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` once.
	fn request(&self, request: HttpRequest) -> HttpFuture<'_>;
}

/// Standard HTTP verbs accepted by [`HttpClient`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `PATCH`.
	Patch,
	/// `DELETE`.
	Delete,
	/// `HEAD`.
	Head,
	/// `OPTIONS`.
	Options,
}
impl HttpMethod {
	/// Returns the method name as sent on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Patch => "PATCH",
			HttpMethod::Delete => "DELETE",
			HttpMethod::Head => "HEAD",
			HttpMethod::Options => "OPTIONS",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outbound request body.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
	/// UTF-8 text, sent as-is.
	Text(String),
	/// Raw bytes, sent as-is.
	Bytes(Vec<u8>),
	/// Structured payload that has not been serialized yet. Transports reject it.
	Structured(Value),
}
impl RequestBody {
	/// Returns a stable label for the body kind.
	pub const fn kind(&self) -> &'static str {
		match self {
			RequestBody::Text(_) => "text",
			RequestBody::Bytes(_) => "bytes",
			RequestBody::Structured(_) => "structured",
		}
	}
}
impl From<String> for RequestBody {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl From<&str> for RequestBody {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl From<Vec<u8>> for RequestBody {
	fn from(value: Vec<u8>) -> Self {
		Self::Bytes(value)
	}
}

/// A single outbound request. Header names are unique.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
	/// Absolute target URL.
	pub url: Url,
	/// HTTP verb.
	pub method: HttpMethod,
	/// Header name to value.
	pub headers: BTreeMap<String, String>,
	/// Optional body.
	pub body: Option<RequestBody>,
}
impl HttpRequest {
	/// Creates a request without headers or body.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { url, method, headers: BTreeMap::new(), body: None }
	}

	/// Shorthand for a `GET` request.
	pub fn get(url: Url) -> Self {
		Self::new(HttpMethod::Get, url)
	}

	/// Shorthand for a `POST` request.
	pub fn post(url: Url) -> Self {
		Self::new(HttpMethod::Post, url)
	}

	/// Sets or replaces a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Sets or replaces the body.
	pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Returns the body as bytes, or [`HttpError::InvalidBodyType`] when it is neither bytes
	/// nor text.
	pub fn body_bytes(&self) -> Result<Option<Vec<u8>>, HttpError> {
		match &self.body {
			None => Ok(None),
			Some(RequestBody::Text(text)) => Ok(Some(text.as_bytes().to_vec())),
			Some(RequestBody::Bytes(bytes)) => Ok(Some(bytes.clone())),
			Some(other) => Err(HttpError::InvalidBodyType { kind: other.kind() }),
		}
	}
}

/// Decoded body of a 2xx response.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
	/// Body parsed as JSON.
	Parsed(Value),
	/// Body that is not valid JSON, kept verbatim.
	Raw(String),
}
impl ResponseBody {
	/// Parses `text` as JSON, falling back to the raw text.
	pub fn decode(text: String) -> Self {
		match serde_json::from_str(&text) {
			Ok(value) => Self::Parsed(value),
			Err(_) => Self::Raw(text),
		}
	}
}

/// Successful (2xx) response.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
	/// HTTP status code, always within `200..300`.
	pub status: u16,
	/// Decoded body.
	pub body: ResponseBody,
}
impl HttpResponse {
	/// Builds a response from a status and its raw body text.
	///
	/// Statuses outside `200..300` become [`HttpError::UpstreamHttp`].
	pub fn from_status_and_text(status: u16, text: String) -> Result<Self, HttpError> {
		if (200..300).contains(&status) {
			Ok(Self { status, body: ResponseBody::decode(text) })
		} else {
			Err(HttpError::UpstreamHttp { status, body: text })
		}
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// No timeout is applied unless [`ReqwestHttpClient::with_timeout`] is used. Clients built
/// by this type never follow redirects; token endpoints answer directly.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient {
	client: ReqwestClient,
	timeout: Option<StdDuration>,
}
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client with redirects disabled.
	pub fn new() -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(crate::error::ConfigError::http_client_build)?;

		Ok(Self::with_client(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self { client, timeout: None }
	}

	/// Applies a per-request timeout. Expiry surfaces as a transport timeout error.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Returns the configured per-request timeout, if any.
	pub fn timeout(&self) -> Option<StdDuration> {
		self.timeout
	}

	async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
		let body = request.body_bytes()?;
		let mut builder = self.client.request(reqwest_method(request.method), request.url);

		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}
		if let Some(bytes) = body {
			builder = builder.body(bytes);
		}
		if let Some(timeout) = self.timeout {
			builder = builder.timeout(timeout);
		}

		let response = builder.send().await?;
		let status = response.status().as_u16();
		let text = response.text().await?;

		HttpResponse::from_status_and_text(status, text)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.client
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.client
	}
}
#[cfg(feature = "reqwest")]
impl HttpClient for ReqwestHttpClient {
	fn request(&self, request: HttpRequest) -> HttpFuture<'_> {
		Box::pin(self.execute(request))
	}
}

#[cfg(feature = "reqwest")]
fn reqwest_method(method: HttpMethod) -> reqwest::Method {
	match method {
		HttpMethod::Get => reqwest::Method::GET,
		HttpMethod::Post => reqwest::Method::POST,
		HttpMethod::Put => reqwest::Method::PUT,
		HttpMethod::Patch => reqwest::Method::PATCH,
		HttpMethod::Delete => reqwest::Method::DELETE,
		HttpMethod::Head => reqwest::Method::HEAD,
		HttpMethod::Options => reqwest::Method::OPTIONS,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url() -> Url {
		Url::parse("https://example.com/oidc/v1/token").expect("Fixture URL should parse.")
	}

	#[test]
	fn decode_prefers_json_and_keeps_raw_text() {
		assert_eq!(
			ResponseBody::decode("{\"access_token\":\"a\"}".into()),
			ResponseBody::Parsed(serde_json::json!({ "access_token": "a" }))
		);
		assert_eq!(ResponseBody::decode("not json".into()), ResponseBody::Raw("not json".into()));
	}

	#[test]
	fn non_success_status_keeps_body() {
		let err = HttpResponse::from_status_and_text(401, "denied".into())
			.expect_err("HTTP 401 must surface as an upstream error.");

		assert!(matches!(err, HttpError::UpstreamHttp { status: 401, ref body } if body == "denied"));
		assert!(HttpResponse::from_status_and_text(204, String::new()).is_ok());
		assert!(HttpResponse::from_status_and_text(300, String::new()).is_err());
	}

	#[test]
	fn structured_body_is_rejected() {
		let request = HttpRequest::post(url())
			.body(RequestBody::Structured(serde_json::json!({ "grant_type": "client_credentials" })));

		assert!(matches!(
			request.body_bytes(),
			Err(HttpError::InvalidBodyType { kind: "structured" })
		));
	}

	#[test]
	fn text_and_bytes_bodies_are_accepted() {
		let text = HttpRequest::post(url()).body("a=b");
		let bytes = HttpRequest::post(url()).body(vec![1_u8, 2]);

		assert_eq!(text.body_bytes().expect("Text body should be accepted."), Some(b"a=b".to_vec()));
		assert_eq!(bytes.body_bytes().expect("Byte body should be accepted."), Some(vec![1, 2]));
		assert_eq!(HttpRequest::get(url()).body_bytes().expect("Empty body is valid."), None);
	}

	#[test]
	fn headers_replace_duplicates() {
		let request =
			HttpRequest::get(url()).header("Authorization", "Bearer a").header("Authorization", "Bearer b");

		assert_eq!(request.headers.len(), 1);
		assert_eq!(request.headers.get("Authorization").map(String::as_str), Some("Bearer b"));
	}
}
