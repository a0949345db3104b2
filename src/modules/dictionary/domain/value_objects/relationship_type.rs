use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

#[derive(
    diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::TermRelationshipType"]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    #[db_rename = "see_also"]
    SeeAlso,
    #[db_rename = "synonym"]
    Synonym,
    #[db_rename = "antonym"]
    Antonym,
    #[db_rename = "broader"]
    Broader,
    #[db_rename = "narrower"]
    Narrower,
}

impl Default for RelationshipType {
    fn default() -> Self {
        RelationshipType::SeeAlso
    }
}

impl RelationshipType {
    pub fn display_name(&self) -> &'static str {
        match self {
            RelationshipType::SeeAlso => "See Also",
            RelationshipType::Synonym => "Synonym",
            RelationshipType::Antonym => "Antonym",
            RelationshipType::Broader => "Broader Term",
            RelationshipType::Narrower => "Narrower Term",
        }
    }

    /// Type carried by the reverse edge
    pub fn inverse(&self) -> Self {
        match self {
            RelationshipType::Broader => RelationshipType::Narrower,
            RelationshipType::Narrower => RelationshipType::Broader,
            // Symmetric relationships
            RelationshipType::SeeAlso => RelationshipType::SeeAlso,
            RelationshipType::Synonym => RelationshipType::Synonym,
            RelationshipType::Antonym => RelationshipType::Antonym,
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for RelationshipType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "see_also" | "related" => Ok(RelationshipType::SeeAlso),
            "synonym" => Ok(RelationshipType::Synonym),
            "antonym" => Ok(RelationshipType::Antonym),
            "broader" => Ok(RelationshipType::Broader),
            "narrower" => Ok(RelationshipType::Narrower),
            _ => Err(AppError::ValidationError(format!(
                "Invalid relationship type: '{}'",
                s
            ))),
        }
    }
}
