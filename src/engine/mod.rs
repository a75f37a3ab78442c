//! Mapping engine: walks mapping configuration against an entity and emits
//! target representations.
//!
//! The engine owns the loaded configuration (both dialects) and the filter
//! registry. [`project`](MappingEngine::project) produces flat target
//! documents, [`project_triples`](MappingEngine::project_triples) RDF
//! triples. Both are pure synchronous functions of the entity snapshot and
//! the immutable configuration; callers parallelize across entities freely.

mod flat;
mod rdf;

use crate::config::load::MappingDocument;
use crate::config::rdf::RdfMappingConfig;
use crate::config::MappingConfig;
use crate::entity::{Entity, FieldOccurrence};
use crate::error::FieldError;
use crate::filter::FilterRegistry;
use crate::relation_index::RelationIndex;
use crate::store::EntityStore;

/// The configurable entity-to-target mapping engine.
pub struct MappingEngine {
    config: MappingConfig,
    rdf_config: RdfMappingConfig,
    filters: FilterRegistry,
}

impl MappingEngine {
    /// Create an engine from both dialect configs and a filter registry.
    pub fn new(config: MappingConfig, rdf_config: RdfMappingConfig, filters: FilterRegistry) -> Self {
        Self {
            config,
            rdf_config,
            filters,
        }
    }

    /// Create an engine from a loaded configuration document, with the
    /// built-in filters.
    pub fn from_document(document: MappingDocument) -> Self {
        Self::new(document.flat, document.rdf, FilterRegistry::with_builtins())
    }

    /// The flat-dialect configuration.
    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// The RDF-dialect configuration.
    pub fn rdf_config(&self) -> &RdfMappingConfig {
        &self.rdf_config
    }

    /// The filter registry.
    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }
}

impl std::fmt::Debug for MappingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingEngine")
            .field("entity_mappings", &self.config.entities.len())
            .field("rdf_mappings", &self.rdf_config.entities.len())
            .field("filters", &self.filters)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Shared source resolution
// ---------------------------------------------------------------------------

/// How a mapping entry sources its values; shared by both dialects.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SourceSpec<'a> {
    /// Source field name.
    pub field: &'a str,
    /// Relation type name to traverse first, if any.
    pub relation: Option<&'a str>,
    /// Read from the related entity instead of the relation's attributes.
    pub member: bool,
}

/// Collect the source occurrences for one mapping entry.
///
/// Direct field, relation attribute, or related-entity field, per the
/// three-way source rule. A related entity the store cannot produce is
/// logged and contributes nothing.
pub(crate) fn resolve_occurrences(
    entity: &Entity,
    store: &dyn EntityStore,
    index: &RelationIndex,
    spec: SourceSpec<'_>,
) -> Vec<FieldOccurrence> {
    let Some(relation_name) = spec.relation else {
        return entity.field_occurrences(spec.field).to_vec();
    };

    let mut occurrences = Vec::new();
    for relation in index.relations(relation_name) {
        if spec.member {
            let related_id = relation.other_end(entity.id);
            match store.entity(related_id) {
                Some(related) => {
                    occurrences.extend_from_slice(related.field_occurrences(spec.field));
                }
                None => {
                    tracing::warn!(
                        relation = %relation.id,
                        related = %related_id,
                        field = spec.field,
                        "related entity not found, contributing no occurrences"
                    );
                }
            }
        } else {
            occurrences.extend_from_slice(relation.attribute_occurrences(spec.field));
        }
    }
    occurrences
}

/// Extract the projected string value from one occurrence: the whole
/// rendered value, or a named subfield of a compound value.
pub(crate) fn extract_value(
    occurrence: &FieldOccurrence,
    subfield: Option<&str>,
    field: &str,
) -> Result<String, FieldError> {
    match subfield {
        Some(name) => occurrence
            .value
            .subfield(name)
            .map(str::to_string)
            .ok_or_else(|| FieldError::ValueExtraction {
                field: field.to_string(),
                message: format!("subfield \"{name}\" not present"),
            }),
        None => occurrence
            .value
            .rendered()
            .map(str::to_string)
            .ok_or_else(|| FieldError::ValueExtraction {
                field: field.to_string(),
                message: "compound value has no rendered form and no subfield is configured".into(),
            }),
    }
}
