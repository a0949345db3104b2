use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::dictionary::domain::value_objects::{RelationshipType, TermId};

/// One directed edge of the cross-reference graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRelationship {
    pub term_id: TermId,
    pub related_term_id: TermId,
    pub relationship_type: Option<RelationshipType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TermRelationship {
    pub fn new(
        term_id: TermId,
        related_term_id: TermId,
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

    /// The edge pointing the other way
    pub fn reversed(&self) -> Self {
        Self {
            term_id: self.related_term_id,
            related_term_id: self.term_id,
            relationship_type: self.relationship_type.map(|t| t.inverse()),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn effective_type(&self) -> RelationshipType {
        self.relationship_type.unwrap_or_default()
    }
}
