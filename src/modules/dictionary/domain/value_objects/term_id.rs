use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::domain::ValueObject;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::Validator;

/// Persistence-assigned identifier of a term. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct TermId(i32);

impl TermId {
    pub fn new(id: i32) -> AppResult<Self> {
        Validator::validate_term_id(id as i64)?;
        Ok(Self(id))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl ValueObject for TermId {
    type Value = i32;

    fn value(&self) -> &i32 {
        &self.0
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for TermId {
    type Error = AppError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Validator::validate_term_id(value)?;
        Ok(Self(value as i32))
    }
}

impl TryFrom<i32> for TermId {
    type Error = AppError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        TermId::new(value)
    }
}

impl From<TermId> for i32 {
    fn from(id: TermId) -> Self {
        id.0
    }
}

/// Parses route/form input such as `"42"`
impl FromStr for TermId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .trim()
            .parse()
            .map_err(|_| AppError::ValidationError(format!("Term ID must be an integer: '{}'", s)))?;
        TermId::try_from(raw)
    }
}
