pub mod aggregate;
pub mod handlers;
pub mod queries;
