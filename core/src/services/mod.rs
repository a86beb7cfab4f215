//! Business services built on the domain layer.

pub mod session;

pub use session::{hash_token, SessionService, SessionServiceConfig, TokenIssuer};
