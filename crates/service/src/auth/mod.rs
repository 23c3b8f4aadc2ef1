//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and token resolution. The resolved [`crate::Caller`] is the
//! only thing the listing engines ever see of a session.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{AuthConfig, AuthService};
