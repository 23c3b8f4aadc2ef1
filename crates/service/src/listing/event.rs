//! Event listings: organizers and admins only, optional allow-listed image,
//! soft-deleted rows are hidden from `find_one`.
use chrono::DateTime;
use models::event;
use models::user::Role;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Deserialize;
use uuid::Uuid;

use super::{Listing, ListingEngine, ListingKind, MergePolicy, Visibility};
use crate::caller::RoleGate;
use crate::errors::ServiceError;
use crate::validation::Violations;

pub type EventService = ListingEngine<EventKind>;

impl Listing for event::Model {
    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.organizer_id
    }

    fn category_id(&self) -> Option<Uuid> {
        Some(self.category_id)
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn touch(&mut self, at: DateTimeWithTimeZone) {
        self.updated_at = at;
    }

    fn created_at(&self) -> DateTimeWithTimeZone {
        self.created_at
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

fn parse_instant(raw: &str) -> Result<DateTimeWithTimeZone, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
}

/// Create form as submitted (multipart text fields). Dates are RFC 3339.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValidEvent {
    name: String,
    description: Option<String>,
    location: Option<String>,
    start_date: DateTimeWithTimeZone,
    end_date: DateTimeWithTimeZone,
    category_id: Uuid,
    image: Option<String>,
}

/// Typed partial update. Build it from form fields with [`EventPatchForm::parse`].
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<DateTimeWithTimeZone>,
    pub end_date: Option<DateTimeWithTimeZone>,
    pub category_id: Option<Uuid>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatchForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category_id: Option<String>,
}

impl EventPatchForm {
    /// Parse dates and ids, reporting every malformed field. `image` is a stored
    /// replacement upload, if one came with the request.
    pub fn parse(self, image: Option<String>) -> Result<EventPatch, ServiceError> {
        let mut v = Violations::new();
        let start_date = self.start_date.and_then(|raw| {
            parse_instant(raw.trim()).map_err(|_| v.push("start_date", "must be an RFC 3339 date-time")).ok()
        });
        let end_date = self.end_date.and_then(|raw| {
            parse_instant(raw.trim()).map_err(|_| v.push("end_date", "must be an RFC 3339 date-time")).ok()
        });
        let category_id = self.category_id.and_then(|raw| {
            Uuid::parse_str(raw.trim()).map_err(|_| v.push("category_id", "must be a UUID")).ok()
        });
        v.finish()?;
        Ok(EventPatch {
            name: self.name,
            description: self.description,
            location: self.location,
            start_date,
            end_date,
            category_id,
            image,
        })
    }
}

pub struct EventKind;

impl ListingKind for EventKind {
    type Record = event::Model;
    type Draft = EventDraft;
    type Valid = ValidEvent;
    type Patch = EventPatch;

    const NAME: &'static str = "Event";
    const CREATE_GATE: RoleGate = RoleGate::Only(&[Role::EventOrganizer, Role::Admin]);
    const FIND_ONE: Visibility = Visibility::ActiveOnly;
    const MERGE: MergePolicy = MergePolicy::Presence;

    fn validate(draft: EventDraft, media: Option<String>) -> Result<ValidEvent, ServiceError> {
        let mut v = Violations::new();
        let name = v.require_text("name", draft.name);
        let description = v.non_blank("description", draft.description);
        let location = v.non_blank("location", draft.location);
        let start_date = v.require_parsed("start_date", draft.start_date, parse_instant, "an RFC 3339 date-time");
        let end_date = v.require_parsed("end_date", draft.end_date, parse_instant, "an RFC 3339 date-time");
        let category_id = v.require_parsed("category_id", draft.category_id, Uuid::parse_str, "a UUID");
        v.finish()?;
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        Ok(ValidEvent {
            name: name.unwrap_or_default(),
            description,
            location,
            start_date: start_date.unwrap_or(now),
            end_date: end_date.unwrap_or(now),
            category_id: category_id.unwrap_or_default(),
            image: media,
        })
    }

    fn category_of(valid: &ValidEvent) -> Option<Uuid> {
        Some(valid.category_id)
    }

    fn build(valid: ValidEvent, id: Uuid, owner_id: Uuid, now: DateTimeWithTimeZone) -> event::Model {
        event::Model {
            id,
            name: valid.name,
            description: valid.description,
            location: valid.location,
            start_date: valid.start_date,
            end_date: valid.end_date,
            image: valid.image,
            organizer_id: owner_id,
            category_id: valid.category_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn patch_category(patch: &EventPatch) -> Option<Uuid> {
        patch.category_id
    }

    fn merge(row: &mut event::Model, patch: EventPatch) {
        let m = Self::MERGE;
        m.text(&mut row.name, patch.name);
        m.opt_text(&mut row.description, patch.description);
        m.opt_text(&mut row.location, patch.location);
        m.value(&mut row.start_date, patch.start_date);
        m.value(&mut row.end_date, patch.end_date);
        m.value(&mut row.category_id, patch.category_id);
        m.opt_text(&mut row.image, patch.image);
    }
}
