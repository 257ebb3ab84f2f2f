//! Identifiers, credentials, viewer identities, and tokens used by the exchange.

pub mod credential;
pub mod id;
pub mod token;
pub mod viewer;

pub use credential::*;
pub use id::*;
pub use token::*;
pub use viewer::*;
