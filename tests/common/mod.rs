//! Shared fixtures for the integration suites.

#![allow(dead_code)]

// std
use std::{collections::VecDeque, io, sync::Arc, time::Duration};
// crates.io
use parking_lot::Mutex;
// self
use dashboard_embed::{
	auth::{DashboardId, ServiceCredential, ServicePrincipalId, ViewerIdentity},
	config::ExchangeConfig,
	error::{HttpError, TransportError},
	http::{HttpClient, HttpFuture, HttpRequest, HttpResponse, ReqwestHttpClient},
	reqwest::Client as ReqwestClient,
};

pub const INSTANCE_URL: &str = "https://example.com";
pub const DASHBOARD_ID: &str = "01ef42";
pub const VIEWER_ID: &str = "viewer@example.com";
pub const VIEWER_VALUE: &str = "EU";

/// One scripted answer for [`ScriptedHttpClient`].
#[derive(Clone, Debug)]
pub enum Reply {
	/// Answers with `status` and `body` after an optional delay.
	Status { status: u16, body: String, delay: Option<Duration> },
	/// Fails at the transport layer.
	Unreachable,
}
impl Reply {
	pub fn ok(body: impl Into<String>) -> Self {
		Self::Status { status: 200, body: body.into(), delay: None }
	}

	pub fn status(status: u16, body: impl Into<String>) -> Self {
		Self::Status { status, body: body.into(), delay: None }
	}

	pub fn delayed(body: impl Into<String>, delay: Duration) -> Self {
		Self::Status { status: 200, body: body.into(), delay: Some(delay) }
	}
}

#[derive(Default)]
struct Script {
	replies: VecDeque<Reply>,
	requests: Vec<HttpRequest>,
}

/// In-memory [`HttpClient`] that records every request and answers from a queue.
///
/// An exhausted queue answers with HTTP 599 so unexpected calls fail loudly.
#[derive(Clone, Default)]
pub struct ScriptedHttpClient {
	script: Arc<Mutex<Script>>,
}
impl ScriptedHttpClient {
	pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
		let client = Self::default();

		client.script.lock().replies.extend(replies);

		client
	}

	pub fn push(&self, reply: Reply) {
		self.script.lock().replies.push_back(reply);
	}

	pub fn requests(&self) -> Vec<HttpRequest> {
		self.script.lock().requests.clone()
	}

	pub fn calls(&self) -> usize {
		self.script.lock().requests.len()
	}
}
impl HttpClient for ScriptedHttpClient {
	fn request(&self, request: HttpRequest) -> HttpFuture<'_> {
		Box::pin(async move {
			request.body_bytes()?;

			let reply = {
				let mut script = self.script.lock();

				script.requests.push(request);
				script.replies.pop_front()
			};

			match reply {
				Some(Reply::Status { status, body, delay }) => {
					if let Some(delay) = delay {
						tokio::time::sleep(delay).await;
					}

					HttpResponse::from_status_and_text(status, body)
				},
				Some(Reply::Unreachable) => Err(HttpError::from(TransportError::network(
					io::Error::new(io::ErrorKind::ConnectionRefused, "scripted connection refused"),
				))),
				None => HttpResponse::from_status_and_text(599, "no scripted reply left".into()),
			}
		})
	}
}

pub fn viewer() -> ViewerIdentity {
	ViewerIdentity::new(VIEWER_ID, VIEWER_VALUE)
}

pub fn exchange_config(instance_url: &str) -> ExchangeConfig {
	let credential = ServiceCredential::new(
		ServicePrincipalId::new("abc").expect("Service principal fixture should be valid."),
		"xyz",
	);
	let dashboard_id =
		DashboardId::new(DASHBOARD_ID).expect("Dashboard identifier fixture should be valid.");

	ExchangeConfig::new(instance_url, dashboard_id, credential, viewer())
		.expect("Exchange configuration fixture should be valid.")
}

/// Reqwest transport for talking to local mock servers.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.redirect(dashboard_embed::reqwest::redirect::Policy::none())
		.build()
		.expect("Test reqwest client should build.");

	ReqwestHttpClient::with_client(client)
}
