use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::domain::ValueObject;
use crate::shared::errors::AppResult;
use crate::shared::utils::Validator;

/// Citation backing a definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    source: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    url: Option<String>,
}

impl Reference {
    /// An empty URL is treated as no URL
    pub fn new(source: impl Into<String>, url: Option<String>) -> AppResult<Self> {
        let source = source.into();
        Validator::validate_reference_source(&source)?;

        let url = url.filter(|u| !u.trim().is_empty());
        if let Some(url) = &url {
            Validator::validate_url(url)?;
        }

        Ok(Self { source, url })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl ValueObject for Reference {
    type Value = str;

    fn value(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.url {
            Some(url) => write!(f, "{} ({})", self.source, url),
            None => f.write_str(&self.source),
        }
    }
}
