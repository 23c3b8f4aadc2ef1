//! Professional profiles: no category, professionals and admins create them,
//! and every response goes through the flat [`ProfessionResponse`] projection.
use models::profession::{self, ProfessionType};
use models::user::Role;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use super::{Listing, ListingDetail, ListingEngine, ListingFilter, ListingKind, MergePolicy, Visibility};
use crate::caller::{Caller, RoleGate};
use crate::directory::UserSummary;
use crate::errors::ServiceError;
use crate::validation::Violations;

impl Listing for profession::Model {
    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.user_id
    }

    fn category_id(&self) -> Option<Uuid> {
        None
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

    fn specialties(&self) -> Option<&str> {
        self.specialties.as_deref()
    }

    fn profession_type(&self) -> Option<ProfessionType> {
        Some(self.profession_type)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfessionDraft {
    pub name: Option<String>,
    /// Wire name (`doctor`, `lawyer`, ...); parsed during validation.
    pub profession_type: Option<String>,
    pub biography: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValidProfession {
    name: String,
    profession_type: ProfessionType,
    biography: Option<String>,
    location: Option<String>,
    contact: Option<String>,
    specialties: Option<String>,
    image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfessionPatch {
    pub name: Option<String>,
    pub profession_type: Option<ProfessionType>,
    pub biography: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub image: Option<String>,
}

pub struct ProfessionKind;

impl ListingKind for ProfessionKind {
    type Record = profession::Model;
    type Draft = ProfessionDraft;
    type Valid = ValidProfession;
    type Patch = ProfessionPatch;

    const NAME: &'static str = "Profession";
    const CREATE_GATE: RoleGate = RoleGate::Only(&[Role::Professional, Role::Admin]);
    const FIND_ONE: Visibility = Visibility::ActiveOnly;
    const MERGE: MergePolicy = MergePolicy::Presence;

    fn validate(draft: ProfessionDraft, media: Option<String>) -> Result<ValidProfession, ServiceError> {
        let mut v = Violations::new();
        let name = v.require_text("name", draft.name);
        let profession_type = v.require_parsed(
            "profession_type",
            draft.profession_type,
            str::parse::<ProfessionType>,
            "one of doctor, lawyer, engineer, teacher, accountant, other",
        );
        check_specialties(&mut v, draft.specialties.as_deref());
        v.finish()?;
        Ok(ValidProfession {
            name: name.unwrap_or_default(),
            profession_type: profession_type.unwrap_or_default(),
            biography: draft.biography,
            location: draft.location,
            contact: draft.contact,
            specialties: draft.specialties.as_deref().and_then(profession::join_specialties),
            image: media.or(draft.image),
        })
    }

    fn category_of(_valid: &ValidProfession) -> Option<Uuid> {
        None
    }

    fn build(valid: ValidProfession, id: Uuid, owner_id: Uuid, now: DateTimeWithTimeZone) -> profession::Model {
        profession::Model {
            id,
            name: valid.name,
            profession_type: valid.profession_type,
            biography: valid.biography,
            location: valid.location,
            contact: valid.contact,
            specialties: valid.specialties,
            image: valid.image,
            user_id: owner_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn patch_category(_patch: &ProfessionPatch) -> Option<Uuid> {
        None
    }

    fn check_patch(patch: &ProfessionPatch) -> Result<(), ServiceError> {
        let mut v = Violations::new();
        check_specialties(&mut v, patch.specialties.as_deref());
        v.finish()
    }

    fn merge(row: &mut profession::Model, patch: ProfessionPatch) {
        let m = Self::MERGE;
        m.text(&mut row.name, patch.name);
        m.value(&mut row.profession_type, patch.profession_type);
        m.opt_text(&mut row.biography, patch.biography);
        m.opt_text(&mut row.location, patch.location);
        m.opt_text(&mut row.contact, patch.contact);
        if let Some(list) = patch.specialties {
            row.specialties = profession::join_specialties(&list);
        }
        m.opt_text(&mut row.image, patch.image);
    }
}

/// Specialties are stored comma-joined, so an entry may not contain a comma.
fn check_specialties(v: &mut Violations, list: Option<&[String]>) {
    if list.is_some_and(|l| l.iter().any(|s| s.contains(','))) {
        v.push("specialties", "entries must not contain commas");
    }
}

/// Public projection of a profession. The embedded user carries no credential
/// material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionResponse {
    pub id: Uuid,
    pub name: String,
    pub profession_type: ProfessionType,
    pub biography: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub specialties: Vec<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub user: Option<UserSummary>,
}

impl From<ListingDetail<profession::Model>> for ProfessionResponse {
    fn from(d: ListingDetail<profession::Model>) -> Self {
        let specialties = d.listing.specialty_list();
        let p = d.listing;
        Self {
            id: p.id,
            name: p.name,
            profession_type: p.profession_type,
            biography: p.biography,
            location: p.location,
            contact: p.contact,
            specialties,
            image: p.image,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
            user: d.owner,
        }
    }
}

fn project(details: Vec<ListingDetail<profession::Model>>) -> Vec<ProfessionResponse> {
    details.into_iter().map(ProfessionResponse::from).collect()
}

/// Profession engine plus its extra queries; every result is projected.
pub struct ProfessionService {
    engine: ListingEngine<ProfessionKind>,
}

impl ProfessionService {
    pub fn new(engine: ListingEngine<ProfessionKind>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ListingEngine<ProfessionKind> {
        &self.engine
    }

    pub async fn create(&self, caller: &Caller, draft: ProfessionDraft) -> Result<ProfessionResponse, ServiceError> {
        let row = self.engine.create(caller, draft, None).await?;
        Ok(self.engine.hydrate_one(row).await?.into())
    }

    pub async fn find_all(&self, include_inactive: bool, profession_type: Option<ProfessionType>) -> Result<Vec<ProfessionResponse>, ServiceError> {
        let base = if include_inactive { ListingFilter::everything() } else { ListingFilter::active() };
        Ok(project(self.engine.find_where(base.of_type(profession_type)).await?))
    }

    pub async fn find_one(&self, id: Uuid) -> Result<ProfessionResponse, ServiceError> {
        Ok(self.engine.find_one(id).await?.into())
    }

    pub async fn update(&self, id: Uuid, patch: ProfessionPatch, caller: &Caller) -> Result<ProfessionResponse, ServiceError> {
        let row = self.engine.update(id, patch, caller).await?;
        Ok(self.engine.hydrate_one(row).await?.into())
    }

    pub async fn remove(&self, id: Uuid, caller: &Caller) -> Result<(), ServiceError> {
        self.engine.remove(id, caller).await
    }

    pub async fn find_by_owner(&self, owner_id: Uuid, caller: Option<&Caller>) -> Result<Vec<ProfessionResponse>, ServiceError> {
        Ok(project(self.engine.find_by_owner(owner_id, caller).await?))
    }

    /// Exact match on `location`.
    #[instrument(skip(self))]
    pub async fn find_by_location(&self, location: &str) -> Result<Vec<ProfessionResponse>, ServiceError> {
        Ok(project(self.engine.find_where(ListingFilter::active().at_location(location)).await?))
    }

    /// Case-sensitive substring match over the stored specialty list.
    #[instrument(skip(self))]
    pub async fn find_by_specialty(&self, specialty: &str) -> Result<Vec<ProfessionResponse>, ServiceError> {
        Ok(project(self.engine.find_where(ListingFilter::active().with_specialty(specialty)).await?))
    }
}
