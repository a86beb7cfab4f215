//! MySQL repository implementations

pub mod session_store_impl;

pub use session_store_impl::MySqlSessionStore;
