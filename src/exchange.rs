//! Scoped token exchange for embedded dashboards.
//!
//! [`TokenExchange::scoped_token`] runs three strictly sequential calls, each consuming the
//! previous call's output:
//!
//! 1. `service_token`: client-credentials grant (`scope=all-apis`) with HTTP Basic auth.
//! 2. `token_info`: viewer lookup on the published dashboard using the service token.
//! 3. `scoped_token`: client-credentials grant carrying the viewer's authorization details.
//!
//! The first failure aborts the exchange and surfaces as [`Error::Exchange`] tagged with its
//! step. Nothing is cached, retried, or shared between invocations.

pub mod endpoints;
pub mod token_info;

mod response;

pub use endpoints::*;
pub use token_info::*;

// crates.io
use tokio::time::Instant;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ServiceCredential, ViewerIdentity},
	config::ExchangeConfig,
	error::StepError,
	http::{HttpClient, HttpRequest},
	obs::{self, ExchangeStep, StepOutcome, StepSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Grant used by both token endpoint calls.
pub const CLIENT_CREDENTIALS: &str = "client_credentials";
/// Scope requested for the service token.
pub const SERVICE_SCOPE: &str = "all-apis";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[cfg(feature = "reqwest")]
/// Exchange engine specialized for the crate's default reqwest transport.
pub type ReqwestTokenExchange = TokenExchange<ReqwestHttpClient>;

/// Mints one viewer-scoped token per call against a single published dashboard.
///
/// The engine only holds immutable configuration and a shared HTTP client, so a single
/// instance can serve any number of concurrent page renders.
pub struct TokenExchange<C>
where
	C: ?Sized + HttpClient,
{
	http_client: Arc<C>,
	endpoints: LakeviewEndpoints,
	credential: ServiceCredential,
	viewer: ViewerIdentity,
}
impl<C> TokenExchange<C>
where
	C: ?Sized + HttpClient,
{
	/// Creates an engine that sends every request through `http_client`.
	pub fn with_http_client(
		config: &ExchangeConfig,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		Ok(Self {
			http_client: http_client.into(),
			endpoints: LakeviewEndpoints::new(&config.instance_url, &config.dashboard_id)?,
			credential: config.credential.clone(),
			viewer: config.viewer.clone(),
		})
	}

	/// Upstream endpoints used by this engine.
	pub fn endpoints(&self) -> &LakeviewEndpoints {
		&self.endpoints
	}

	/// Runs the three-step exchange and returns the scoped token.
	pub async fn scoped_token(&self) -> Result<AccessToken> {
		self.run(None).await
	}

	/// Same as [`scoped_token`](Self::scoped_token), but gives up once `deadline` passes.
	///
	/// The deadline bounds every step; steps that have not started are never issued.
	pub async fn scoped_token_until(&self, deadline: Instant) -> Result<AccessToken> {
		self.run(Some(deadline)).await
	}

	async fn run(&self, deadline: Option<Instant>) -> Result<AccessToken> {
		let service_token =
			self.step(ExchangeStep::ServiceToken, deadline, self.request_service_token()).await?;
		let token_info = self
			.step(ExchangeStep::TokenInfo, deadline, self.fetch_token_info(&service_token))
			.await?;

		self.step(ExchangeStep::ScopedToken, deadline, self.request_scoped_token(token_info)).await
	}

	async fn step<T, Fut>(
		&self,
		step: ExchangeStep,
		deadline: Option<Instant>,
		fut: Fut,
	) -> Result<T>
	where
		Fut: Future<Output = Result<T, StepError>>,
	{
		let span = StepSpan::new(step);

		obs::record_step_outcome(step, StepOutcome::Attempt);

		let result = span
			.instrument(async move {
				match deadline {
					Some(deadline) if Instant::now() >= deadline => Err(StepError::DeadlineElapsed),
					Some(deadline) => tokio::time::timeout_at(deadline, fut)
						.await
						.unwrap_or_else(|_| Err(StepError::DeadlineElapsed)),
					None => fut.await,
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_step_outcome(step, StepOutcome::Success),
			Err(_) => obs::record_step_outcome(step, StepOutcome::Failure),
		}

		result.map_err(|source| Error::Exchange { step, source })
	}

	async fn request_service_token(&self) -> Result<AccessToken, StepError> {
		let form = form_urlencoded::Serializer::new(String::new())
			.append_pair("grant_type", CLIENT_CREDENTIALS)
			.append_pair("scope", SERVICE_SCOPE)
			.finish();
		let response = self.http_client.request(self.token_request(form)).await?;

		Ok(response::decode_access_token(response.body)?)
	}

	async fn fetch_token_info(&self, service_token: &AccessToken) -> Result<TokenInfo, StepError> {
		let request = HttpRequest::get(self.endpoints.token_info(&self.viewer))
			.header("Authorization", service_token.bearer_header());
		let response = self.http_client.request(request).await?;

		Ok(TokenInfo::from_body(response.body)?)
	}

	async fn request_scoped_token(&self, token_info: TokenInfo) -> Result<AccessToken, StepError> {
		let form = token_info.into_exchange_form(CLIENT_CREDENTIALS);
		let response = self.http_client.request(self.token_request(form)).await?;

		Ok(response::decode_access_token(response.body)?)
	}

	fn token_request(&self, form: String) -> HttpRequest {
		HttpRequest::post(self.endpoints.token().clone())
			.header("Authorization", self.credential.authorization_header())
			.header("Content-Type", FORM_CONTENT_TYPE)
			.body(form)
	}
}
#[cfg(feature = "reqwest")]
impl TokenExchange<ReqwestHttpClient> {
	/// Creates an engine that provisions its own reqwest transport.
	pub fn new(config: &ExchangeConfig) -> Result<Self> {
		Self::with_http_client(config, ReqwestHttpClient::new()?)
	}
}
impl<C> Clone for TokenExchange<C>
where
	C: ?Sized + HttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			endpoints: self.endpoints.clone(),
			credential: self.credential.clone(),
			viewer: self.viewer.clone(),
		}
	}
}
impl<C> Debug for TokenExchange<C>
where
	C: ?Sized + HttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenExchange")
			.field("endpoints", &self.endpoints)
			.field("credential", &self.credential)
			.field("viewer", &self.viewer)
			.finish()
	}
}
