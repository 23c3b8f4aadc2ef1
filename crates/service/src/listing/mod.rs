//! Listing lifecycle: one generic engine, parameterised by a kind descriptor.
//!
//! A kind describes its field schema (validation and merge), its create role
//! gate, whether it needs a category, and whether `find_one` may return
//! soft-deleted rows. Everything else (ownership, soft delete, hydration) is
//! shared by [`engine::ListingEngine`].
use models::profession::ProfessionType;
use models::{category, review};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use uuid::Uuid;

use crate::caller::RoleGate;
use crate::directory::UserSummary;
use crate::errors::ServiceError;

pub mod repository;
pub mod memory;
pub mod seaorm;
pub mod engine;
pub mod business;
pub mod event;
pub mod profession;
#[cfg(test)]
mod tests;

pub use engine::ListingEngine;
pub use repository::ListingRepository;

/// Stored shape of a listing, as seen by the engine.
pub trait Listing: Clone + Send + Sync + Serialize + 'static {
    fn id(&self) -> Uuid;
    fn owner_id(&self) -> Uuid;
    fn category_id(&self) -> Option<Uuid>;
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
    fn touch(&mut self, at: DateTimeWithTimeZone);
    fn created_at(&self) -> DateTimeWithTimeZone;

    fn location(&self) -> Option<&str> {
        None
    }

    fn specialties(&self) -> Option<&str> {
        None
    }

    fn profession_type(&self) -> Option<ProfessionType> {
        None
    }
}

/// Whether a point lookup may return soft-deleted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    ActiveOnly,
    IncludeInactive,
}

impl Visibility {
    pub fn admits<L: Listing>(self, row: &L) -> bool {
        self == Visibility::IncludeInactive || row.is_active()
    }
}

/// How a partial update treats supplied values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Only non-empty text overwrites. An owner cannot clear a field to "".
    Truthy,
    /// Any supplied value overwrites, including "".
    Presence,
}

impl MergePolicy {
    fn accepts(self, value: &str) -> bool {
        match self {
            MergePolicy::Truthy => !value.is_empty(),
            MergePolicy::Presence => true,
        }
    }

    pub fn text(self, slot: &mut String, incoming: Option<String>) {
        if let Some(v) = incoming {
            if self.accepts(&v) {
                *slot = v;
            }
        }
    }

    pub fn opt_text(self, slot: &mut Option<String>, incoming: Option<String>) {
        if let Some(v) = incoming {
            if self.accepts(&v) {
                *slot = Some(v);
            }
        }
    }

    /// Non-text values apply whenever supplied.
    pub fn value<T>(self, slot: &mut T, incoming: Option<T>) {
        if let Some(v) = incoming {
            *slot = v;
        }
    }
}

/// Predicate for repository scans. Both backends evaluate [`ListingFilter::matches`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub include_inactive: bool,
    pub owner_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub location: Option<String>,
    pub specialty: Option<String>,
    pub profession_type: Option<ProfessionType>,
}

impl ListingFilter {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn everything() -> Self {
        Self { include_inactive: true, ..Self::default() }
    }

    pub fn owned_by(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn at_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = Some(specialty.into());
        self
    }

    pub fn of_type(mut self, profession_type: Option<ProfessionType>) -> Self {
        self.profession_type = profession_type;
        self
    }

    pub fn matches<L: Listing>(&self, row: &L) -> bool {
        if !self.include_inactive && !row.is_active() {
            return false;
        }
        if self.owner_id.is_some_and(|o| o != row.owner_id()) {
            return false;
        }
        if let Some(c) = self.category_id {
            if row.category_id() != Some(c) {
                return false;
            }
        }
        if let Some(loc) = &self.location {
            if row.location() != Some(loc.as_str()) {
                return false;
            }
        }
        if let Some(spec) = &self.specialty {
            if !row.specialties().is_some_and(|s| s.contains(spec.as_str())) {
                return false;
            }
        }
        if let Some(t) = self.profession_type {
            if row.profession_type() != Some(t) {
                return false;
            }
        }
        true
    }
}

/// Describes one listing kind to the generic engine.
pub trait ListingKind: Send + Sync + 'static {
    type Record: Listing;
    /// Raw create input, every field optional until validated.
    type Draft: Send;
    type Valid: Send;
    type Patch: Send;

    const NAME: &'static str;
    const CREATE_GATE: RoleGate;
    const FIND_ONE: Visibility;
    const MERGE: MergePolicy;
    const ATTACH_REVIEWS: bool = false;

    /// Check every field, reporting all violations at once. `media` is the stored
    /// upload reference, if any.
    fn validate(draft: Self::Draft, media: Option<String>) -> Result<Self::Valid, ServiceError>;
    /// Category the validated input refers to; `None` for kinds without one.
    fn category_of(valid: &Self::Valid) -> Option<Uuid>;
    fn build(valid: Self::Valid, id: Uuid, owner_id: Uuid, now: DateTimeWithTimeZone) -> Self::Record;
    fn patch_category(patch: &Self::Patch) -> Option<Uuid>;
    fn merge(record: &mut Self::Record, patch: Self::Patch);

    /// Field checks on a partial update. Runs after authorization and before the
    /// category lookup.
    fn check_patch(_patch: &Self::Patch) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// A listing with its owner, category and (for businesses) reviews attached.
#[derive(Debug, Clone, Serialize)]
pub struct ListingDetail<R> {
    #[serde(flatten)]
    pub listing: R,
    pub owner: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<category::Model>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<review::Model>>,
}
