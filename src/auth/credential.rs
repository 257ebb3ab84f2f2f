//! Client-credentials pair identifying this application to the issuer.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, auth::ServicePrincipalId};

/// Service principal identifier/secret pair.
///
/// The pair only ever leaves the process as an HTTP Basic `Authorization` header.
#[derive(Clone)]
pub struct ServiceCredential {
	id: ServicePrincipalId,
	secret: String,
}
impl ServiceCredential {
	/// Creates a credential from a validated identifier and its secret.
	pub fn new(id: ServicePrincipalId, secret: impl Into<String>) -> Self {
		Self { id, secret: secret.into() }
	}

	/// Returns the service principal identifier.
	pub fn id(&self) -> &ServicePrincipalId {
		&self.id
	}

	/// Encodes the pair as `Basic base64(id:secret)`.
	pub fn authorization_header(&self) -> String {
		let raw = format!("{}:{}", self.id, self.secret);

		format!("Basic {}", STANDARD.encode(raw))
	}
}
impl Debug for ServiceCredential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ServiceCredential")
			.field("id", &self.id)
			.field("secret", &"<redacted>")
			.finish()
	}
}
