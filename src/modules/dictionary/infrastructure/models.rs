use crate::modules::dictionary::domain::value_objects::{Category, RelationshipType};
use crate::schema::{term_relationships, terms};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

// ============= TERM MODELS =============

// For reading from database, and for inserting rows with a known id
#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
#[diesel(table_name = terms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TermModel {
    pub id: i32,
    pub term: String,
    pub definition: String,
    pub category: Category,
    pub reference: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// For inserting new terms (id assigned by the sequence)
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = terms)]
pub struct NewTerm {
    pub term: String,
    pub definition: String,
    pub category: Category,
    pub reference: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// For updating existing terms (excludes id and created_at).
// A cleared reference must be written as NULL, not skipped.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = terms)]
#[diesel(treat_none_as_null = true)]
pub struct TermChangeset {
    pub term: String,
    pub definition: String,
    pub category: Category,
    pub reference: Option<String>,
    pub url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// ============= RELATIONSHIP MODELS =============

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = term_relationships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TermRelationshipModel {
    pub term_id: i32,
    pub related_term_id: i32,
    pub relationship_type: Option<RelationshipType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TermRelationshipModel {
    pub fn new(
        term_id: i32,
        related_term_id: i32,
        relationship_type: Option<RelationshipType>,
    ) -> Self {
        let now = Utc::now();
        Self {
            term_id,
            related_term_id,
            relationship_type,
            created_at: now,
            updated_at: now,
        }
    }
}
