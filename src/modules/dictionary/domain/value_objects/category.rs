use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::domain::ValueObject;
use crate::shared::errors::AppError;

/// Taxonomy bucket a term belongs to
#[derive(
    diesel_derive_enum::DbEnum,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::TermCategory"]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Medical,
    Botanical,
    Horticultural,
    Farming,
    Chemical,
    General,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Medical,
        Category::Botanical,
        Category::Horticultural,
        Category::Farming,
        Category::Chemical,
        Category::General,
    ];

    /// Stored and serialized representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Medical => "medical",
            Category::Botanical => "botanical",
            Category::Horticultural => "horticultural",
            Category::Farming => "farming",
            Category::Chemical => "chemical",
            Category::General => "general",
        }
    }
}

impl ValueObject for Category {
    type Value = str;

    fn value(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == needle)
            .ok_or_else(|| AppError::ValidationError(format!("Invalid category: '{}'", s)))
    }
}

impl TryFrom<&str> for Category {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
