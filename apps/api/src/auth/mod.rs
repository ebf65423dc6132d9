//! Accounts and bearer-token authentication.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod token;
pub mod users;
