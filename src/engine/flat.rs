//! Flat projection: entity → search-engine target document.

use crate::config::{EntityMapping, TargetType};
use crate::document::TargetDocument;
use crate::engine::{extract_value, resolve_occurrences, MappingEngine, SourceSpec};
use crate::entity::Entity;
use crate::error::{FieldError, MappingError};
use crate::relation_index::RelationIndex;
use crate::store::EntityStore;
use crate::temporal;

impl MappingEngine {
    /// Project one entity into a flat target document.
    ///
    /// Fails with [`MappingError::MissingConfig`] when the entity's type has
    /// no configured mapping; per-field resolution problems are logged and
    /// skipped so one bad entry never aborts the document. The returned
    /// document is complete — persistence is the sink's responsibility.
    pub fn project(
        &self,
        entity: &Entity,
        store: &dyn EntityStore,
    ) -> Result<TargetDocument, MappingError> {
        let type_name = store.entity_type_name(entity.entity_type).ok_or(
            MappingError::UnknownEntityType {
                type_id: entity.entity_type.0,
            },
        )?;
        let mapping = self.config().entity_mapping(&type_name).ok_or_else(|| {
            MappingError::MissingConfig {
                entity_type: type_name.clone(),
            }
        })?;

        Ok(self.project_entity(entity, &type_name, mapping, store))
    }

    /// Apply one entity mapping to one entity. Recursion entry point for
    /// nested mappings; depth is bounded by the configuration tree.
    fn project_entity(
        &self,
        entity: &Entity,
        type_name: &str,
        mapping: &EntityMapping,
        store: &dyn EntityStore,
    ) -> TargetDocument {
        let index = RelationIndex::build(entity, store);
        let mut document = TargetDocument::new(entity.id, type_name);

        for field in &mapping.fields {
            let Some(source_field) = field.source_field.as_deref() else {
                let err = FieldError::SourceFieldUndefined {
                    target: field.target.clone(),
                };
                tracing::warn!(entity = %entity.id, error = %err, "skipping field mapping");
                continue;
            };

            let mut occurrences = resolve_occurrences(
                entity,
                store,
                &index,
                SourceSpec {
                    field: source_field,
                    relation: field.source_relation.as_deref(),
                    member: field.source_member,
                },
            );
            if let Some(filter) = field.filter.as_deref() {
                occurrences = self.filters().apply(filter, occurrences, &field.params);
            }

            for occurrence in &occurrences {
                let value = match extract_value(occurrence, field.subfield.as_deref(), source_field)
                {
                    Ok(value) => value,
                    Err(err) => {
                        tracing::warn!(entity = %entity.id, target = %field.target, error = %err, "skipping occurrence");
                        continue;
                    }
                };

                match field.target_type {
                    TargetType::Number => {
                        tracing::debug!(
                            entity = %entity.id,
                            target = %field.target,
                            "number fields are not projected"
                        );
                        continue;
                    }
                    TargetType::Date => {
                        let Some(normalized) = temporal::normalize(&value) else {
                            let err = FieldError::ValueExtraction {
                                field: source_field.to_string(),
                                message: format!("malformed date \"{value}\""),
                            };
                            tracing::warn!(entity = %entity.id, target = %field.target, error = %err, "skipping occurrence");
                            continue;
                        };
                        document.add_field_occurrence(&field.target, field.target_type, &value);
                        document.add_date_field_occurrence(&field.target, normalized);
                    }
                    _ => {
                        document.add_field_occurrence(&field.target, field.target_type, &value);
                    }
                }

                if field.sortable {
                    document.add_sorting_field_occurrence(&field.target, field.target_type, &value);
                }
            }
        }

        for semantic_id in &entity.semantic_identifiers {
            document.add_semantic_identifier(semantic_id);
        }

        for related in &mapping.related_identifiers {
            for relation in index.relations(&related.source_relation) {
                document.add_related_identifier(&related.target, relation.other_end(entity.id));
            }
        }

        for nested in &mapping.nested {
            for relation in index.relations(&nested.source_relation) {
                let child_id = relation.other_end(entity.id);
                let Some(child) = store.entity(child_id) else {
                    tracing::warn!(
                        entity = %entity.id,
                        related = %child_id,
                        relation = %nested.source_relation,
                        "nested entity not found, no sub-document produced"
                    );
                    continue;
                };
                let child_type = store
                    .entity_type_name(child.entity_type)
                    .unwrap_or_else(|| nested.mapping.entity_type.clone());
                document.add_sub_document(self.project_entity(
                    &child,
                    &child_type,
                    &nested.mapping,
                    store,
                ));
            }
        }

        document
    }
}
