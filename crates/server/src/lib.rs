//! HTTP transport for the listing directory.

pub mod auth;
pub mod errors;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod upload;

pub use auth::ServerState;
pub use startup::run;
