use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::user;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ProfessionType {
    #[sea_orm(string_value = "doctor")]
    Doctor,
    #[sea_orm(string_value = "lawyer")]
    Lawyer,
    #[sea_orm(string_value = "engineer")]
    Engineer,
    #[sea_orm(string_value = "teacher")]
    Teacher,
    #[sea_orm(string_value = "accountant")]
    Accountant,
    #[default]
    #[sea_orm(string_value = "other")]
    Other,
}

impl ProfessionType {
    pub const ALL: [ProfessionType; 6] = [
        ProfessionType::Doctor,
        ProfessionType::Lawyer,
        ProfessionType::Engineer,
        ProfessionType::Teacher,
        ProfessionType::Accountant,
        ProfessionType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfessionType::Doctor => "doctor",
            ProfessionType::Lawyer => "lawyer",
            ProfessionType::Engineer => "engineer",
            ProfessionType::Teacher => "teacher",
            ProfessionType::Accountant => "accountant",
            ProfessionType::Other => "other",
        }
    }
}

impl FromStr for ProfessionType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfessionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::Validation(format!("unknown profession type: {s}")))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profession")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub profession_type: ProfessionType,
    pub biography: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
    /// Comma-joined list; `None` when the professional listed no specialties.
    pub specialties: Option<String>,
    pub image: Option<String>,
    pub user_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn specialty_list(&self) -> Vec<String> {
        split_specialties(self.specialties.as_deref())
    }
}

/// Join a specialty list for storage. An empty list is stored as `None`.
pub fn join_specialties(list: &[String]) -> Option<String> {
    if list.is_empty() { None } else { Some(list.join(",")) }
}

pub fn split_specialties(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) if !s.is_empty() => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod specialty_tests {
    use super::*;

    #[test]
    fn profession_type_parses_its_wire_names() {
        for t in ProfessionType::ALL {
            assert_eq!(t.as_str().parse::<ProfessionType>().unwrap(), t);
        }
        assert!("Doctor".parse::<ProfessionType>().is_err());
    }

    #[test]
    fn empty_list_is_stored_as_none() {
        assert_eq!(join_specialties(&[]), None);
        assert!(split_specialties(None).is_empty());
    }

    #[test]
    fn list_survives_join_and_split() {
        let list = vec!["Family Law".to_string(), "Tax".to_string()];
        let joined = join_specialties(&list);
        assert_eq!(joined.as_deref(), Some("Family Law,Tax"));
        assert_eq!(split_specialties(joined.as_deref()), list);
    }
}
