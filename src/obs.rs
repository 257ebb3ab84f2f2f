//! Optional observability helpers for the token exchange.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `dashboard_embed.exchange` with the `step`
//!   field.
//! - Enable `metrics` to increment the `dashboard_embed_exchange_total` counter for every
//!   attempt/success/failure, labeled by `step` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// The three sequential calls that make up one token exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeStep {
	/// Client-credentials call that yields the service token.
	ServiceToken,
	/// Viewer-scoped lookup against the dashboard's token-info endpoint.
	TokenInfo,
	/// Final exchange that yields the scoped token.
	ScopedToken,
}
impl ExchangeStep {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExchangeStep::ServiceToken => "service_token",
			ExchangeStep::TokenInfo => "token_info",
			ExchangeStep::ScopedToken => "scoped_token",
		}
	}

	const fn description(self) -> &'static str {
		match self {
			ExchangeStep::ServiceToken => "service token",
			ExchangeStep::TokenInfo => "token info",
			ExchangeStep::ScopedToken => "scoped token",
		}
	}
}
impl Display for ExchangeStep {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.description())
	}
}

/// Outcome labels recorded for each step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepOutcome {
	/// Step started.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl StepOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StepOutcome::Attempt => "attempt",
			StepOutcome::Success => "success",
			StepOutcome::Failure => "failure",
		}
	}
}
impl Display for StepOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
