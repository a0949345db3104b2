use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::domain::ValueObject;
use crate::shared::errors::AppResult;
use crate::shared::utils::Validator;

/// Body text of a glossary entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Definition(String);

impl Definition {
    pub fn new(text: impl Into<String>) -> AppResult<Self> {
        let text = text.into();
        Validator::validate_definition(&text)?;
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl ValueObject for Definition {
    type Value = str;

    fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Definition {
    type Error = crate::shared::errors::AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Definition::new(value)
    }
}

impl From<Definition> for String {
    fn from(definition: Definition) -> Self {
        definition.0
    }
}
