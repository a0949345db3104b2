//! Inputs accepted by `TermService`

use crate::modules::dictionary::domain::value_objects::{Category, Reference};
use crate::shared::errors::AppResult;

/// What to do with a term's reference on update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReferenceUpdate {
    #[default]
    Unchanged,
    Clear,
    Set { source: String, url: Option<String> },
}

impl ReferenceUpdate {
    /// Map raw form input: a missing field keeps the reference, an empty one
    /// clears it, anything else (re)creates it with the given URL.
    pub fn from_form(reference: Option<&str>, url: Option<&str>) -> Self {
        match reference {
            None => ReferenceUpdate::Unchanged,
            Some(source) if source.trim().is_empty() => ReferenceUpdate::Clear,
            Some(source) => ReferenceUpdate::Set {
                source: source.to_string(),
                url: url.filter(|u| !u.trim().is_empty()).map(str::to_string),
            },
        }
    }

    /// `None` when the reference should be left untouched
    pub(crate) fn resolve(&self) -> AppResult<Option<Option<Reference>>> {
        match self {
            ReferenceUpdate::Unchanged => Ok(None),
            ReferenceUpdate::Clear => Ok(Some(None)),
            ReferenceUpdate::Set { source, url } => {
                Ok(Some(Some(Reference::new(source.clone(), url.clone())?)))
            }
        }
    }
}

/// Partial update of a term; `None` fields are left as they are
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermChanges {
    pub definition: Option<String>,
    pub category: Option<Category>,
    pub reference: ReferenceUpdate,
}

impl TermChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn reference(mut self, reference: ReferenceUpdate) -> Self {
        self.reference = reference;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.definition.is_none()
            && self.category.is_none()
            && self.reference == ReferenceUpdate::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_mapping() {
        assert_eq!(ReferenceUpdate::from_form(None, Some("x")), ReferenceUpdate::Unchanged);
        assert_eq!(ReferenceUpdate::from_form(Some(""), None), ReferenceUpdate::Clear);
        assert_eq!(
            ReferenceUpdate::from_form(Some("Grieve"), Some("")),
            ReferenceUpdate::Set {
                source: "Grieve".to_string(),
                url: None
            }
        );
    }

    #[test]
    fn builder_tracks_emptiness() {
        assert!(TermChanges::new().is_empty());
        assert!(!TermChanges::new().category(Category::Chemical).is_empty());
        assert!(!TermChanges::new().reference(ReferenceUpdate::Clear).is_empty());
    }
}
