//! Upstream endpoint URLs derived from the workspace instance URL.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
// self
use crate::{
	_prelude::*,
	auth::{DashboardId, ViewerIdentity},
	error::ConfigError,
};

/// Bytes left as-is in viewer query values: unreserved characters plus `/`.
const QUERY_VALUE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~').remove(b'/');

/// Token and token-info endpoints for one published dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LakeviewEndpoints {
	token: Url,
	token_info: Url,
}
impl LakeviewEndpoints {
	/// Derives both endpoints from `instance_url`.
	///
	/// Any path prefix on the instance URL is kept; a trailing slash, query, or fragment is
	/// dropped.
	pub fn new(instance_url: &Url, dashboard_id: &DashboardId) -> Result<Self, ConfigError> {
		let dashboard: &str = dashboard_id;
		let token = extend_path(instance_url, &["oidc", "v1", "token"])?;
		let token_info = extend_path(
			instance_url,
			&["api", "2.0", "lakeview", "dashboards", dashboard, "published", "tokeninfo"],
		)?;

		Ok(Self { token, token_info })
	}

	/// `POST` target for both client-credentials calls.
	pub fn token(&self) -> &Url {
		&self.token
	}

	/// `GET` target for the viewer's authorization details.
	///
	/// Viewer values are percent-encoded (`%20` for spaces), never form-encoded.
	pub fn token_info(&self, viewer: &ViewerIdentity) -> Url {
		let mut url = self.token_info.clone();
		let query = format!(
			"external_viewer_id={}&external_value={}",
			utf8_percent_encode(&viewer.external_viewer_id, QUERY_VALUE_SET),
			utf8_percent_encode(&viewer.external_value, QUERY_VALUE_SET),
		);

		url.set_query(Some(&query));

		url
	}
}

fn extend_path(base: &Url, segments: &[&str]) -> Result<Url, ConfigError> {
	let mut url = base.clone();

	url.set_query(None);
	url.set_fragment(None);
	url.path_segments_mut()
		.map_err(|_| ConfigError::UnsupportedInstanceUrl { url: base.to_string() })?
		.pop_if_empty()
		.extend(segments);

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn endpoints(instance_url: &str) -> LakeviewEndpoints {
		let instance_url = Url::parse(instance_url).expect("Instance URL fixture should parse.");
		let dashboard_id = DashboardId::new("01ef42").expect("Dashboard fixture should be valid.");

		LakeviewEndpoints::new(&instance_url, &dashboard_id)
			.expect("Endpoints should derive from a base URL.")
	}

	#[test]
	fn token_endpoint_ignores_trailing_slash() {
		assert_eq!(
			endpoints("https://example.com/").token().as_str(),
			"https://example.com/oidc/v1/token"
		);
		assert_eq!(
			endpoints("https://example.com").token().as_str(),
			"https://example.com/oidc/v1/token"
		);
	}

	#[test]
	fn token_info_encodes_viewer_parameters() {
		let viewer = ViewerIdentity::new("viewer@example.com", "region=EU & more");
		let url = endpoints("https://example.com/prefix/").token_info(&viewer);

		assert_eq!(url.path(), "/prefix/api/2.0/lakeview/dashboards/01ef42/published/tokeninfo");

		let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();

		assert_eq!(
			pairs,
			vec![
				("external_viewer_id".to_owned(), "viewer@example.com".to_owned()),
				("external_value".to_owned(), "region=EU & more".to_owned()),
			]
		);
		assert!(!url.as_str().contains(' '));
	}

	#[test]
	fn token_info_uses_percent_encoding_not_form_encoding() {
		let viewer = ViewerIdentity::new("a b@x", "EU west/1*");
		let url = endpoints("https://example.com").token_info(&viewer);

		assert_eq!(url.query(), Some("external_viewer_id=a%20b%40x&external_value=EU%20west/1%2A"));
	}

	#[test]
	fn rejects_non_base_urls() {
		let url = Url::parse("mailto:ops@example.com").expect("Mailto URL should parse.");
		let dashboard_id = DashboardId::new("01ef42").expect("Dashboard fixture should be valid.");

		assert!(matches!(
			LakeviewEndpoints::new(&url, &dashboard_id),
			Err(ConfigError::UnsupportedInstanceUrl { .. })
		));
	}
}
