//! Service layer of the listing directory.
//! - The lifecycle and authorization engine shared by businesses, events and professions.
//! - Collaborators behind traits: listing repositories, user/category/review directories,
//!   media storage and the auth service that resolves callers.
//! - SeaORM and in-memory backends, wired together by [`app::Services`].

pub mod errors;
pub mod validation;
pub mod caller;
pub mod listing;
pub mod directory;
pub mod category_service;
pub mod review_service;
pub mod media;
pub mod auth;
pub mod app;
#[cfg(test)]
pub mod test_support;

pub use app::Services;
pub use caller::{Caller, RoleGate};
pub use errors::{FieldViolation, ServiceError};
