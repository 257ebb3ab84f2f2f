//! Embed published dashboards for external viewers.
//!
//! Every page view mints a fresh, viewer-scoped access token through a three-step OAuth 2.0
//! exchange ([`exchange::TokenExchange`]) and renders it into the page the dashboard's
//! client-side SDK consumes. Enable the `server` feature for the HTTP shell and binary.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod exchange;
pub mod http;
pub mod obs;
#[cfg(feature = "server")] pub mod server;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::Deserialize;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(feature = "server")] use color_eyre as _;
#[cfg(test)] use {axum_test as _, color_eyre as _, httpmock as _, parking_lot as _};
