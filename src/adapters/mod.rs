//! External integrations
//!
//! - [`http`] - HTTP transports to the Blindfold API

pub mod http;
