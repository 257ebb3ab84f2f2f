//! Explicit configuration values built once at startup.
//!
//! Nothing in the exchange engine reads the environment; [`ServerConfig::from_env`] is the only
//! place that does, and it hands the engine an [`ExchangeConfig`] by reference.

// std
use std::{env, path::PathBuf, time::Duration as StdDuration};
// self
use crate::{
	_prelude::*,
	auth::{DashboardId, ServiceCredential, ServicePrincipalId, ViewerIdentity},
	error::ConfigError,
};

/// Everything the token exchange needs.
#[derive(Clone, Debug)]
pub struct ExchangeConfig {
	/// Workspace base URL, e.g. `https://example.cloud.databricks.com`.
	pub instance_url: Url,
	/// Published dashboard to scope tokens to.
	pub dashboard_id: DashboardId,
	/// Service principal credentials.
	pub credential: ServiceCredential,
	/// External viewer the tokens are minted for.
	pub viewer: ViewerIdentity,
}
impl ExchangeConfig {
	/// Validates `instance_url` and assembles the configuration.
	pub fn new(
		instance_url: &str,
		dashboard_id: DashboardId,
		credential: ServiceCredential,
		viewer: ViewerIdentity,
	) -> Result<Self, ConfigError> {
		Ok(Self { instance_url: parse_instance_url(instance_url)?, dashboard_id, credential, viewer })
	}
}

/// Process configuration for the embedding server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
	/// Token exchange settings.
	pub exchange: ExchangeConfig,
	/// Workspace identifier handed to the client-side SDK.
	pub workspace_id: String,
	/// TCP port to listen on.
	pub port: u16,
	/// HTML template rendered for each page view.
	pub template_path: PathBuf,
	/// Directory served under `/static/`.
	pub static_dir: PathBuf,
	/// Upper bound for one token exchange. Unbounded when unset.
	pub exchange_timeout: Option<StdDuration>,
}
impl ServerConfig {
	/// Default listen port.
	pub const DEFAULT_PORT: u16 = 3000;
	/// Required settings, in the order they are reported when missing.
	pub const REQUIRED_KEYS: [&'static str; 7] = [
		"INSTANCE_URL",
		"DASHBOARD_ID",
		"SERVICE_PRINCIPAL_ID",
		"SERVICE_PRINCIPAL_SECRET",
		"EXTERNAL_VIEWER_ID",
		"EXTERNAL_VALUE",
		"WORKSPACE_ID",
	];

	/// Reads the configuration from process environment variables.
	///
	/// | Variable                   | Default                | Description                       |
	/// |----------------------------|------------------------|-----------------------------------|
	/// | `INSTANCE_URL`             | required               | Workspace base URL                |
	/// | `DASHBOARD_ID`             | required               | Published dashboard identifier    |
	/// | `SERVICE_PRINCIPAL_ID`     | required               | Client-credentials identifier     |
	/// | `SERVICE_PRINCIPAL_SECRET` | required               | Client-credentials secret         |
	/// | `EXTERNAL_VIEWER_ID`       | required               | External viewer identifier        |
	/// | `EXTERNAL_VALUE`           | required               | Value bound to the viewer         |
	/// | `WORKSPACE_ID`             | required               | Workspace identifier for the SDK  |
	/// | `PORT`                     | `3000`                 | HTTP listen port                  |
	/// | `TEMPLATE_PATH`            | `templates/index.html` | Page template                     |
	/// | `STATIC_DIR`               | `static`               | Static asset directory            |
	/// | `EXCHANGE_TIMEOUT_SECS`    | unset                  | Deadline for one token exchange   |
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Builds the configuration from an arbitrary key lookup.
	///
	/// Empty values count as missing. Every missing key is reported in one error.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut values = HashMap::new();
		let mut missing = Vec::new();

		for key in Self::REQUIRED_KEYS {
			match lookup(key).filter(|value| !value.is_empty()) {
				Some(value) => {
					values.insert(key, value);
				},
				None => missing.push(key),
			}
		}

		if !missing.is_empty() {
			return Err(ConfigError::Missing { keys: missing });
		}

		let mut take = |key: &str| values.remove(key).unwrap_or_default();
		let credential = ServiceCredential::new(
			ServicePrincipalId::new(take("SERVICE_PRINCIPAL_ID"))?,
			take("SERVICE_PRINCIPAL_SECRET"),
		);
		let viewer = ViewerIdentity::new(take("EXTERNAL_VIEWER_ID"), take("EXTERNAL_VALUE"));
		let exchange = ExchangeConfig::new(
			&take("INSTANCE_URL"),
			DashboardId::new(take("DASHBOARD_ID"))?,
			credential,
			viewer,
		)?;
		let workspace_id = take("WORKSPACE_ID");
		let port = match lookup("PORT").filter(|value| !value.is_empty()) {
			Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort { value })?,
			None => Self::DEFAULT_PORT,
		};
		let template_path = lookup("TEMPLATE_PATH")
			.filter(|value| !value.is_empty())
			.map(PathBuf::from)
			.unwrap_or_else(|| PathBuf::from("templates/index.html"));
		let static_dir = lookup("STATIC_DIR")
			.filter(|value| !value.is_empty())
			.map(PathBuf::from)
			.unwrap_or_else(|| PathBuf::from("static"));
		let exchange_timeout = match lookup("EXCHANGE_TIMEOUT_SECS").filter(|value| !value.is_empty()) {
			Some(value) => Some(StdDuration::from_secs(
				value.parse().map_err(|_| ConfigError::InvalidTimeout { value })?,
			)),
			None => None,
		};

		Ok(Self { exchange, workspace_id, port, template_path, static_dir, exchange_timeout })
	}
}

/// Parses an absolute http(s) instance URL, ignoring trailing slashes.
pub fn parse_instance_url(raw: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(raw.trim_end_matches('/'))
		.map_err(|source| ConfigError::InvalidInstanceUrl { source })?;

	if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() || !url.has_host() {
		return Err(ConfigError::UnsupportedInstanceUrl { url: raw.to_owned() });
	}

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map = pairs
			.iter()
			.map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
			.collect::<HashMap<_, _>>();

		move |key| map.get(key).cloned()
	}

	fn complete() -> Vec<(&'static str, &'static str)> {
		vec![
			("INSTANCE_URL", "https://example.com/"),
			("DASHBOARD_ID", "01ef42"),
			("SERVICE_PRINCIPAL_ID", "abc"),
			("SERVICE_PRINCIPAL_SECRET", "xyz"),
			("EXTERNAL_VIEWER_ID", "viewer@example.com"),
			("EXTERNAL_VALUE", "EU"),
			("WORKSPACE_ID", "1234567890"),
		]
	}

	#[test]
	fn builds_from_complete_lookup_with_defaults() {
		let config = ServerConfig::from_lookup(lookup_from(&complete()))
			.expect("Complete configuration should load.");

		assert_eq!(config.exchange.instance_url.as_str(), "https://example.com/");
		assert_eq!(&*config.exchange.dashboard_id, "01ef42");
		assert_eq!(config.exchange.credential.authorization_header(), "Basic YWJjOnh5eg==");
		assert_eq!(config.exchange.viewer, ViewerIdentity::new("viewer@example.com", "EU"));
		assert_eq!(config.workspace_id, "1234567890");
		assert_eq!(config.port, ServerConfig::DEFAULT_PORT);
		assert_eq!(config.template_path, PathBuf::from("templates/index.html"));
		assert_eq!(config.static_dir, PathBuf::from("static"));
		assert_eq!(config.exchange_timeout, None);
	}

	#[test]
	fn reports_every_missing_or_empty_key() {
		let mut pairs = complete();

		pairs.retain(|(key, _)| *key != "DASHBOARD_ID" && *key != "WORKSPACE_ID");
		pairs.push(("EXTERNAL_VALUE", ""));

		let lookup = lookup_from(&pairs);
		let err = ServerConfig::from_lookup(lookup).expect_err("Missing keys must be fatal.");

		match err {
			ConfigError::Missing { keys } =>
				assert_eq!(keys, vec!["DASHBOARD_ID", "EXTERNAL_VALUE", "WORKSPACE_ID"]),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn rejects_invalid_port_and_url() {
		let mut pairs = complete();

		pairs.push(("PORT", "http"));

		assert!(matches!(
			ServerConfig::from_lookup(lookup_from(&pairs)),
			Err(ConfigError::InvalidPort { .. })
		));

		let mut pairs = complete();

		pairs[0] = ("INSTANCE_URL", "example.com");

		assert!(matches!(
			ServerConfig::from_lookup(lookup_from(&pairs)),
			Err(ConfigError::InvalidInstanceUrl { .. })
		));
		assert!(matches!(
			parse_instance_url("ftp://example.com"),
			Err(ConfigError::UnsupportedInstanceUrl { .. })
		));
	}

	#[test]
	fn explicit_settings_override_defaults() {
		let mut pairs = complete();

		pairs.push(("PORT", "8080"));
		pairs.push(("EXCHANGE_TIMEOUT_SECS", "15"));

		let config =
			ServerConfig::from_lookup(lookup_from(&pairs)).expect("Explicit settings should load.");

		assert_eq!(config.port, 8080);
		assert_eq!(config.exchange_timeout, Some(StdDuration::from_secs(15)));
	}
}
