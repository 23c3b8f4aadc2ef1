//! Business listings: any authenticated caller may create one, an image is
//! mandatory, and `find_one` also returns soft-deleted rows.
use models::business;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Deserialize;
use uuid::Uuid;

use super::{Listing, ListingEngine, ListingKind, MergePolicy, Visibility};
use crate::caller::RoleGate;
use crate::errors::ServiceError;
use crate::validation::Violations;

pub type BusinessService = ListingEngine<BusinessKind>;

impl Listing for business::Model {
    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
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
}

/// Create form as submitted (multipart text fields).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessDraft {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValidBusiness {
    name: String,
    phone: String,
    website: Option<String>,
    address: String,
    description: Option<String>,
    category_id: Uuid,
    image: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
}

pub struct BusinessKind;

impl ListingKind for BusinessKind {
    type Record = business::Model;
    type Draft = BusinessDraft;
    type Valid = ValidBusiness;
    type Patch = BusinessPatch;

    const NAME: &'static str = "Business";
    const CREATE_GATE: RoleGate = RoleGate::AnyAuthenticated;
    const FIND_ONE: Visibility = Visibility::IncludeInactive;
    const MERGE: MergePolicy = MergePolicy::Truthy;
    const ATTACH_REVIEWS: bool = true;

    fn validate(draft: BusinessDraft, media: Option<String>) -> Result<ValidBusiness, ServiceError> {
        let mut v = Violations::new();
        let name = v.require_text("name", draft.name);
        let phone = v.require_text("phone", draft.phone);
        let address = v.require_text("address", draft.address);
        let category_id = v.require_parsed("category_id", draft.category_id, Uuid::parse_str, "a UUID");
        let image = media.filter(|m| !m.is_empty());
        if image.is_none() {
            v.push("image", "Image is required");
        }
        v.finish()?;
        Ok(ValidBusiness {
            name: name.unwrap_or_default(),
            phone: phone.unwrap_or_default(),
            website: draft.website,
            address: address.unwrap_or_default(),
            description: draft.description,
            category_id: category_id.unwrap_or_default(),
            image: image.unwrap_or_default(),
        })
    }

    fn category_of(valid: &ValidBusiness) -> Option<Uuid> {
        Some(valid.category_id)
    }

    fn build(valid: ValidBusiness, id: Uuid, owner_id: Uuid, now: DateTimeWithTimeZone) -> business::Model {
        business::Model {
            id,
            name: valid.name,
            phone: valid.phone,
            website: valid.website,
            address: valid.address,
            description: valid.description,
            image: valid.image,
            owner_id,
            category_id: valid.category_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn patch_category(patch: &BusinessPatch) -> Option<Uuid> {
        patch.category_id
    }

    fn merge(row: &mut business::Model, patch: BusinessPatch) {
        let m = Self::MERGE;
        m.text(&mut row.name, patch.name);
        m.text(&mut row.phone, patch.phone);
        m.opt_text(&mut row.website, patch.website);
        m.text(&mut row.address, patch.address);
        m.opt_text(&mut row.description, patch.description);
        m.value(&mut row.category_id, patch.category_id);
    }
}
