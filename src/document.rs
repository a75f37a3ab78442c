//! Target document: the flat, search-engine-ready projection of one entity.
//!
//! A document is created fresh per projection call and handed to a sink
//! afterwards; nothing is retained across calls. Field order follows mapping
//! declaration order, then source-occurrence order.

use serde::{Deserialize, Serialize};

use crate::config::TargetType;
use crate::entity::EntityId;

/// One named target field with its accumulated values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetField {
    /// Target field name.
    pub name: String,
    /// Declared target type.
    pub target_type: TargetType,
    /// Values in emission order.
    pub values: Vec<String>,
}

/// A named list of related-entity identifiers (cross-references).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedIdentifiers {
    /// List name from the mapping.
    pub name: String,
    /// Identifiers of the related entities, in traversal order.
    pub ids: Vec<EntityId>,
}

/// The flat projection of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDocument {
    /// Identifier of the projected entity.
    pub id: EntityId,
    /// Resolved entity-type name.
    pub entity_type: String,
    /// Generic field occurrences, in declaration order.
    pub fields: Vec<TargetField>,
    /// Sort-key slots for fields marked sortable.
    pub sort_fields: Vec<TargetField>,
    /// Date-sortable occurrences, kept in parallel with the generic fields.
    pub date_fields: Vec<TargetField>,
    /// Semantic identifiers copied verbatim from the entity.
    pub semantic_identifiers: Vec<String>,
    /// Named related-identifier lists.
    pub related_identifiers: Vec<RelatedIdentifiers>,
    /// Sub-documents from nested entity mappings.
    pub sub_documents: Vec<TargetDocument>,
}

fn push_value(fields: &mut Vec<TargetField>, name: &str, target_type: TargetType, value: String) {
    if let Some(pos) = fields.iter().position(|f| f.name == name) {
        fields[pos].values.push(value);
    } else {
        fields.push(TargetField {
            name: name.to_string(),
            target_type,
            values: vec![value],
        });
    }
}

impl TargetDocument {
    /// Create an empty document for an entity.
    pub fn new(id: EntityId, entity_type: impl Into<String>) -> Self {
        Self {
            id,
            entity_type: entity_type.into(),
            fields: Vec::new(),
            sort_fields: Vec::new(),
            date_fields: Vec::new(),
            semantic_identifiers: Vec::new(),
            related_identifiers: Vec::new(),
            sub_documents: Vec::new(),
        }
    }

    /// Append a generic field occurrence.
    pub fn add_field_occurrence(&mut self, name: &str, target_type: TargetType, value: impl Into<String>) {
        push_value(&mut self.fields, name, target_type, value.into());
    }

    /// Append a sort-key occurrence.
    pub fn add_sorting_field_occurrence(
        &mut self,
        name: &str,
        target_type: TargetType,
        value: impl Into<String>,
    ) {
        push_value(&mut self.sort_fields, name, target_type, value.into());
    }

    /// Append a date-sortable occurrence.
    pub fn add_date_field_occurrence(&mut self, name: &str, value: impl Into<String>) {
        push_value(&mut self.date_fields, name, TargetType::Date, value.into());
    }

    /// Append a semantic identifier.
    pub fn add_semantic_identifier(&mut self, id: impl Into<String>) {
        self.semantic_identifiers.push(id.into());
    }

    /// Append a related-entity identifier to a named list.
    pub fn add_related_identifier(&mut self, name: &str, id: EntityId) {
        if let Some(pos) = self.related_identifiers.iter().position(|r| r.name == name) {
            self.related_identifiers[pos].ids.push(id);
        } else {
            self.related_identifiers.push(RelatedIdentifiers {
                name: name.to_string(),
                ids: vec![id],
            });
        }
    }

    /// Attach a sub-document.
    pub fn add_sub_document(&mut self, document: TargetDocument) {
        self.sub_documents.push(document);
    }

    /// Look up a generic field by name.
    pub fn field(&self, name: &str) -> Option<&TargetField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Values of a generic field (empty if absent).
    pub fn field_values(&self, name: &str) -> &[String] {
        self.field(name).map(|f| f.values.as_slice()).unwrap_or(&[])
    }

    /// Look up a sort-key field by name.
    pub fn sort_field(&self, name: &str) -> Option<&TargetField> {
        self.sort_fields.iter().find(|f| f.name == name)
    }

    /// Look up a date field by name.
    pub fn date_field(&self, name: &str) -> Option<&TargetField> {
        self.date_fields.iter().find(|f| f.name == name)
    }

    /// Look up a related-identifier list by name.
    pub fn related_ids(&self, name: &str) -> &[EntityId] {
        self.related_identifiers
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.ids.as_slice())
            .unwrap_or(&[])
    }
}
