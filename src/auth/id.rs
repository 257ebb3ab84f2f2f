//! Dashboard and service principal identifiers.
//!
//! Both are opaque to the exchange: the dashboard id becomes one path segment of the
//! token-info URL and the service principal id half of the Basic credential. The only local
//! rule is that neither may be empty.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, Hash)]
		pub struct $name(String);
		impl $name {
			/// Wraps `value`, rejecting an empty string.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				let value = value.into();

				if value.is_empty() {
					return Err(IdentifierError::Empty { kind: $kind });
				}

				Ok(Self(value))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

/// Identifier rejected at configuration time.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Which identifier was rejected.
		kind: &'static str,
	},
}

def_id! { DashboardId, "Identifier of a published dashboard.", "Dashboard" }
def_id! { ServicePrincipalId, "Client identifier of the service principal.", "ServicePrincipal" }
