//! Page rendering for the embed server.
//!
//! Every page goes through one `handlebars` registry. Values are HTML-escaped by the registry,
//! so templates should hand them to scripts through attributes
//! (e.g. `data-token="{{TOKEN}}"`).

// std
use std::fs;
// crates.io
use handlebars::{Handlebars, RenderError, TemplateError};
use serde_json::json;
// self
use crate::{_prelude::*, auth::AccessToken, config::ServerConfig};

const PAGE: &str = "page";
const ERROR_PAGE: &str = "error";
const NOT_FOUND_PAGE: &str = "not_found";

const TEMPLATE_UNAVAILABLE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
	<meta charset="UTF-8">
	<meta name="viewport" content="width=device-width, initial-scale=1.0">
	<title>Dashboard</title>
	<link rel="stylesheet" href="/static/style.css">
</head>
<body>
	<div class="error-container">
		<h1>Error: template not found</h1>
		<p>The page template could not be loaded.</p>
	</div>
</body>
</html>
"#;
const ERROR_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
	<meta charset="UTF-8">
	<title>Error - Dashboard</title>
	<style>
		body { font-family: system-ui; text-align: center; padding: 50px; background: #f5f5f5; }
		.error-container { max-width: 500px; margin: 0 auto; background: white; padding: 2rem; border-radius: 8px; }
		h1 { color: #e53e3e; }
		.error-details { background: #f7fafc; padding: 1rem; border-radius: 4px; margin: 1rem 0; font-family: monospace; }
	</style>
</head>
<body>
	<div class="error-container">
		<h1>Server error</h1>
		<p>The dashboard could not be loaded.</p>
		<div class="error-details">{{cause}}</div>
		<button onclick="location.reload()">Try again</button>
	</div>
</body>
</html>
"#;
const NOT_FOUND_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
	<meta charset="UTF-8">
	<title>404 - Page Not Found</title>
	<style>
		body { font-family: system-ui; text-align: center; padding: 50px; background: #f5f5f5; }
		.error-container { max-width: 400px; margin: 0 auto; }
		h1 { color: #e53e3e; }
	</style>
</head>
<body>
	<div class="error-container">
		<h1>404</h1>
		<p>Page not found</p>
		<a href="/">Back to the dashboard</a>
	</div>
</body>
</html>
"#;

/// Renders the dashboard page, the error page, and the 404 page.
pub struct PageRenderer {
	registry: Handlebars<'static>,
	instance_url: String,
	workspace_id: String,
	dashboard_id: String,
}
impl PageRenderer {
	/// Registers `template` as the dashboard page alongside the built-in pages.
	pub fn new(template: &str, config: &ServerConfig) -> Result<Self, TemplateError> {
		let mut registry = Handlebars::new();

		registry.register_template_string(ERROR_PAGE, ERROR_TEMPLATE)?;
		registry.register_template_string(NOT_FOUND_PAGE, NOT_FOUND_TEMPLATE)?;
		registry.register_template_string(PAGE, template)?;

		Ok(Self {
			registry,
			instance_url: config.exchange.instance_url.as_str().trim_end_matches('/').to_owned(),
			workspace_id: config.workspace_id.clone(),
			dashboard_id: config.exchange.dashboard_id.to_string(),
		})
	}

	/// Reads the template from `config.template_path` once.
	///
	/// A missing, unreadable, or unparsable template is logged and replaced by a built-in page.
	pub fn load(config: &ServerConfig) -> Result<Self, TemplateError> {
		let path = config.template_path.display();
		let template = match fs::read_to_string(&config.template_path) {
			Ok(template) => template,
			Err(e) => {
				tracing::warn!(path = %path, error = %e, "page template unavailable; serving fallback page");

				return Self::new(TEMPLATE_UNAVAILABLE, config);
			},
		};

		Self::new(&template, config).or_else(|e| {
			tracing::warn!(path = %path, error = %e, "page template is invalid; serving fallback page");

			Self::new(TEMPLATE_UNAVAILABLE, config)
		})
	}

	/// Renders the dashboard page with `token` and the configured identifiers.
	pub fn render(&self, token: &AccessToken) -> Result<String, RenderError> {
		self.registry.render(
			PAGE,
			&json!({
				"INSTANCE_URL": self.instance_url,
				"WORKSPACE_ID": self.workspace_id,
				"DASHBOARD_ID": self.dashboard_id,
				"TOKEN": token.expose(),
			}),
		)
	}

	/// Page shown when the exchange fails. Carries the cause and a retry button, never a token.
	pub fn error_page(&self, cause: &str) -> String {
		self.registry
			.render(ERROR_PAGE, &json!({ "cause": cause }))
			.unwrap_or_else(|_| handlebars::html_escape(cause))
	}

	/// Page shown for unknown paths.
	pub fn not_found_page(&self) -> String {
		self.registry
			.render(NOT_FOUND_PAGE, &json!({}))
			.unwrap_or_else(|_| "Page not found".to_owned())
	}
}
impl Debug for PageRenderer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PageRenderer")
			.field("instance_url", &self.instance_url)
			.field("workspace_id", &self.workspace_id)
			.field("dashboard_id", &self.dashboard_id)
			.finish_non_exhaustive()
	}
}
