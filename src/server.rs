//! HTTP shell that embeds the dashboard page.
//!
//! - `GET /` (any query string) mints a fresh scoped token and renders the page template.
//! - `GET /static/*` serves assets from the configured directory. Only hits are cacheable.
//! - Everything else answers with a 404 page.
//!
//! Each page view runs its own exchange; nothing is shared between requests besides the
//! immutable [`AppState`]. Dropping a request (client disconnect) drops its exchange future.

pub mod page;

pub use page::*;

// std
use std::{error::Error as StdError, net::Ipv4Addr, path::PathBuf, time::Duration as StdDuration};
// crates.io
use axum::{
	Router,
	extract::State,
	http::{HeaderValue, StatusCode, header::CACHE_CONTROL},
	middleware,
	response::{Html, Response},
	routing::{MethodRouter, any, get},
};
use tokio::{net::TcpListener, time::Instant};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::ServerConfig,
	exchange::TokenExchange,
	http::{HttpClient, ReqwestHttpClient},
};

const STATIC_CACHE_CONTROL: &str = "public, max-age=3600";

/// State shared by every request handler.
pub struct AppState<C>
where
	C: ?Sized + HttpClient,
{
	exchange: TokenExchange<C>,
	page: PageRenderer,
	static_dir: PathBuf,
	exchange_timeout: Option<StdDuration>,
}
impl<C> AppState<C>
where
	C: ?Sized + HttpClient,
{
	/// Assembles the state from an engine, a renderer, and the static asset directory.
	pub fn new(
		exchange: TokenExchange<C>,
		page: PageRenderer,
		static_dir: impl Into<PathBuf>,
	) -> Self {
		Self { exchange, page, static_dir: static_dir.into(), exchange_timeout: None }
	}

	/// Bounds every exchange started by a page view.
	pub fn with_exchange_timeout(mut self, timeout: StdDuration) -> Self {
		self.exchange_timeout = Some(timeout);

		self
	}

	async fn scoped_token(&self) -> Result<AccessToken> {
		match self.exchange_timeout {
			Some(timeout) => self.exchange.scoped_token_until(Instant::now() + timeout).await,
			None => self.exchange.scoped_token().await,
		}
	}
}
impl AppState<ReqwestHttpClient> {
	/// Builds the production state: reqwest transport plus the template on disk.
	pub fn from_config(config: &ServerConfig) -> Result<Self> {
		let exchange = TokenExchange::new(&config.exchange)?;
		let page = PageRenderer::load(config)
			.map_err(|source| crate::error::ConfigError::InvalidTemplate { source })?;
		let mut state = Self::new(exchange, page, &config.static_dir);

		if let Some(timeout) = config.exchange_timeout {
			state = state.with_exchange_timeout(timeout);
		}

		Ok(state)
	}
}

/// Builds the router for `state`.
pub fn router<C>(state: AppState<C>) -> Router
where
	C: ?Sized + HttpClient,
{
	let missing_asset: MethodRouter = any(static_not_found);
	let static_files = ServeDir::new(&state.static_dir).not_found_service(missing_asset);
	let assets = Router::new()
		.nest_service("/static", static_files)
		.layer(middleware::map_response(cache_successful_assets));

	Router::new()
		.route("/", get(dashboard::<C>))
		.fallback(not_found::<C>)
		.with_state(Arc::new(state))
		.merge(assets)
}

/// Installs the global `fmt` subscriber, honoring `RUST_LOG` and defaulting to `info`.
pub fn init_tracing() {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();
}

/// Serves `state` on `0.0.0.0:{port}` until Ctrl-C.
pub async fn serve<C>(state: AppState<C>, port: u16) -> std::io::Result<()>
where
	C: ?Sized + HttpClient,
{
	let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await?;

	tracing::info!(address = %listener.local_addr()?, "dashboard embed server listening");

	axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await
}

async fn dashboard<C>(State(state): State<Arc<AppState<C>>>) -> (StatusCode, Html<String>)
where
	C: ?Sized + HttpClient,
{
	let token = match state.scoped_token().await {
		Ok(token) => token,
		Err(e) => {
			let cause = error_chain(&e);

			tracing::error!(
				step = e.step().map(|step| step.as_str()),
				error = %cause,
				"failed to mint scoped token"
			);

			return (StatusCode::INTERNAL_SERVER_ERROR, Html(state.page.error_page(&cause)));
		},
	};

	match state.page.render(&token) {
		Ok(page) => (StatusCode::OK, Html(page)),
		Err(e) => {
			let cause = error_chain(&e);

			tracing::error!(error = %cause, "failed to render dashboard page");

			(StatusCode::INTERNAL_SERVER_ERROR, Html(state.page.error_page(&cause)))
		},
	}
}

async fn not_found<C>(State(state): State<Arc<AppState<C>>>) -> (StatusCode, Html<String>)
where
	C: ?Sized + HttpClient,
{
	(StatusCode::NOT_FOUND, Html(state.page.not_found_page()))
}

async fn static_not_found() -> (StatusCode, &'static str) {
	(StatusCode::NOT_FOUND, "Static file not found")
}

// Only successful asset responses are cacheable.
async fn cache_successful_assets(mut response: Response) -> Response {
	if response.status().is_success() {
		response
			.headers_mut()
			.entry(CACHE_CONTROL)
			.or_insert(HeaderValue::from_static(STATIC_CACHE_CONTROL));
	}

	response
}

/// Joins `e` and its source chain, skipping causes already spelled out by their parent.
pub fn error_chain(e: &dyn StdError) -> String {
	let mut message = e.to_string();
	let mut source = e.source();

	while let Some(cause) = source {
		let text = cause.to_string();

		if !message.contains(&text) {
			message.push_str(": ");
			message.push_str(&text);
		}

		source = cause.source();
	}

	message
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "failed to listen for Ctrl-C; shutdown signal disabled");

		std::future::pending::<()>().await;
	}

	tracing::info!("shutting down");
}
