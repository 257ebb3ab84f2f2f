//! External viewer the embedded dashboard is scoped to.

// self
use crate::_prelude::*;

/// Identity of the end user viewing the embedded dashboard.
///
/// Both values are opaque to this crate and forwarded to the token-info endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewerIdentity {
	/// External viewer identifier chosen by the embedding application.
	pub external_viewer_id: String,
	/// Opaque value associated with the viewer (e.g. a row-level filter key).
	pub external_value: String,
}
impl ViewerIdentity {
	/// Creates a viewer identity.
	pub fn new(external_viewer_id: impl Into<String>, external_value: impl Into<String>) -> Self {
		Self { external_viewer_id: external_viewer_id.into(), external_value: external_value.into() }
	}
}
