//! Conversions between diesel rows and dictionary domain types

use crate::modules::dictionary::domain::{
    entities::{Term, TermRelationship},
    value_objects::{Definition, Reference, TermId},
};
use crate::modules::dictionary::infrastructure::models::{
    NewTerm, TermChangeset, TermModel, TermRelationshipModel,
};
use crate::shared::errors::AppResult;

pub struct TermMapper;

impl TermMapper {
    /// Rows are re-validated; a row that breaks domain rules surfaces as an error
    pub fn to_domain(model: TermModel, related_ids: Vec<i32>) -> AppResult<Term> {
        let reference = match model.reference {
            Some(source) => Some(Reference::new(source, model.url)?),
            None => None,
        };

        let related_ids = related_ids
            .into_iter()
            .map(TermId::new)
            .collect::<AppResult<Vec<_>>>()?;

        Term::restore(
            TermId::new(model.id)?,
            model.term,
            Definition::new(model.definition)?,
            model.category,
            reference,
            related_ids,
            model.created_at,
            model.updated_at,
        )
    }

    pub fn to_new_model(term: &Term) -> NewTerm {
        let (reference, url) = Self::reference_columns(term);
        NewTerm {
            term: term.term().to_string(),
            definition: term.definition().as_str().to_string(),
            category: term.category(),
            reference,
            url,
            created_at: term.created_at(),
            updated_at: term.updated_at(),
        }
    }

    pub fn to_model(term: &Term, id: TermId) -> TermModel {
        let (reference, url) = Self::reference_columns(term);
        TermModel {
            id: id.get(),
            term: term.term().to_string(),
            definition: term.definition().as_str().to_string(),
            category: term.category(),
            reference,
            url,
            created_at: term.created_at(),
            updated_at: term.updated_at(),
        }
    }

    pub fn to_changeset(term: &Term) -> TermChangeset {
        let (reference, url) = Self::reference_columns(term);
        TermChangeset {
            term: term.term().to_string(),
            definition: term.definition().as_str().to_string(),
            category: term.category(),
            reference,
            url,
            updated_at: term.updated_at(),
        }
    }

    pub fn relationship_to_domain(model: TermRelationshipModel) -> AppResult<TermRelationship> {
        Ok(TermRelationship {
            term_id: TermId::new(model.term_id)?,
            related_term_id: TermId::new(model.related_term_id)?,
            relationship_type: model.relationship_type,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn reference_columns(term: &Term) -> (Option<String>, Option<String>) {
        match term.reference() {
            Some(reference) => (
                Some(reference.source().to_string()),
                reference.url().map(str::to_string),
            ),
            None => (None, None),
        }
    }
}
