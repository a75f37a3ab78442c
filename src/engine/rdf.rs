//! RDF projection: entity → subject-predicate-object triples.

use crate::config::rdf::{AttributeMapping, NodeKind, NodeTemplate, RdfEntityMapping};
use crate::engine::{extract_value, resolve_occurrences, MappingEngine, SourceSpec};
use crate::entity::{Entity, FieldOccurrence};
use crate::error::{FieldError, MappingError};
use crate::relation_index::RelationIndex;
use crate::store::EntityStore;
use crate::triple::{RdfLiteral, RdfTerm, RdfTriple};

impl MappingEngine {
    /// Project one entity into RDF triples.
    ///
    /// Fails with [`MappingError::MissingConfig`] when the entity's type has
    /// no RDF mapping. Emission order is configuration declaration order,
    /// then source-occurrence order; nothing is sorted afterwards.
    pub fn project_triples(
        &self,
        entity: &Entity,
        store: &dyn EntityStore,
    ) -> Result<Vec<RdfTriple>, MappingError> {
        let type_name = store.entity_type_name(entity.entity_type).ok_or(
            MappingError::UnknownEntityType {
                type_id: entity.entity_type.0,
            },
        )?;
        let mapping = self.rdf_config().entity_mapping(&type_name).ok_or_else(|| {
            MappingError::MissingConfig {
                entity_type: type_name.clone(),
            }
        })?;

        let index = RelationIndex::build(entity, store);
        let mut triples = Vec::new();

        for attribute in &mapping.attributes {
            self.emit_attribute(entity, store, &index, mapping, attribute, None, None, &mut triples);
        }
        for relation in &mapping.relations {
            for attribute in &relation.attributes {
                self.emit_attribute(
                    entity,
                    store,
                    &index,
                    mapping,
                    attribute,
                    Some(&relation.source_relation),
                    None,
                    &mut triples,
                );
            }
        }

        Ok(triples)
    }

    /// Expand one attribute mapping, recursing into sub-attributes whose
    /// triples take the parent triple's object as their subject.
    #[allow(clippy::too_many_arguments)]
    fn emit_attribute(
        &self,
        entity: &Entity,
        store: &dyn EntityStore,
        index: &RelationIndex,
        mapping: &RdfEntityMapping,
        attribute: &AttributeMapping,
        relation_scope: Option<&str>,
        parent_subject: Option<&RdfTerm>,
        out: &mut Vec<RdfTriple>,
    ) {
        let Some(source_field) = attribute.source_field.as_deref() else {
            let err = FieldError::SourceFieldUndefined {
                target: "rdf attribute".into(),
            };
            tracing::warn!(entity = %entity.id, error = %err, "skipping attribute mapping");
            return;
        };

        let relation = attribute.source_relation.as_deref().or(relation_scope);
        let mut occurrences = resolve_occurrences(
            entity,
            store,
            index,
            SourceSpec {
                field: source_field,
                relation,
                member: attribute.source_member,
            },
        );
        if attribute.preferred_only {
            occurrences = restrict_preferred(occurrences);
        }
        if let Some(filter) = attribute.filter.as_deref() {
            occurrences = self.filters().apply(filter, occurrences, &attribute.params);
        }

        for template in &attribute.triples {
            for occurrence in &occurrences {
                let value =
                    match extract_value(occurrence, attribute.subfield.as_deref(), source_field) {
                        Ok(value) => value,
                        Err(err) => {
                            tracing::warn!(entity = %entity.id, field = source_field, error = %err, "skipping occurrence");
                            continue;
                        }
                    };

                let subject = match parent_subject {
                    Some(term) => term.clone(),
                    None => build_entity_ref(entity, mapping, &template.subject, None),
                };
                let Some(predicate) = build_predicate(mapping, &template.predicate) else {
                    tracing::warn!(entity = %entity.id, field = source_field, "predicate template has no value, skipping");
                    continue;
                };
                let object = match template.object.kind {
                    NodeKind::Literal => RdfTerm::Literal(build_literal(&value, &template.object)),
                    NodeKind::EntityRef => {
                        build_entity_ref(entity, mapping, &template.object, Some(&value))
                    }
                };

                out.push(RdfTriple::new(subject, predicate, object.clone()));

                for sub in &attribute.sub_attributes {
                    self.emit_attribute(
                        entity,
                        store,
                        index,
                        mapping,
                        sub,
                        relation_scope,
                        Some(&object),
                        out,
                    );
                }
            }
        }
    }
}

/// Keep only occurrences marked preferred; when none is marked, keep all so
/// a valid entity never produces zero triples.
fn restrict_preferred(occurrences: Vec<FieldOccurrence>) -> Vec<FieldOccurrence> {
    if occurrences.iter().any(|o| o.preferred) {
        occurrences.into_iter().filter(|o| o.preferred).collect()
    } else {
        occurrences
    }
}

/// Build an entity-reference IRI: namespace + prefix + identifier.
///
/// The identifier comes from the `id_source` field on the subject entity,
/// then the resolved source value (entity-ref objects reference the value),
/// then the subject entity's own id.
fn build_entity_ref(
    entity: &Entity,
    mapping: &RdfEntityMapping,
    template: &NodeTemplate,
    value: Option<&str>,
) -> RdfTerm {
    let namespace = template
        .namespace
        .as_deref()
        .map(|ns| mapping.resolve_namespace(ns))
        .unwrap_or("");

    let id = template
        .id_source
        .as_deref()
        .and_then(|field| {
            entity
                .field_occurrences(field)
                .first()
                .and_then(|occ| occ.value.rendered())
                .map(str::to_string)
        })
        .or_else(|| value.map(str::to_string))
        .unwrap_or_else(|| entity.id.get().to_string());

    let iri = match template.prefix.as_deref() {
        Some(prefix) => format!("{namespace}{prefix}/{id}"),
        None => format!("{namespace}{id}"),
    };
    RdfTerm::Iri(iri)
}

/// Build a predicate IRI from its namespaced literal value.
fn build_predicate(mapping: &RdfEntityMapping, template: &NodeTemplate) -> Option<RdfTerm> {
    let value = template.value.as_deref()?;
    let namespace = template
        .namespace
        .as_deref()
        .map(|ns| mapping.resolve_namespace(ns))
        .unwrap_or("");
    Some(RdfTerm::Iri(format!("{namespace}{value}")))
}

/// Build an object literal, applying the parts split and alias recombination.
fn build_literal(value: &str, template: &NodeTemplate) -> RdfLiteral {
    let base = template.value.as_deref().unwrap_or(value);

    let fragments: Vec<String> = match (template.parts, template.separator.as_deref()) {
        (Some(parts), Some(separator)) if parts > 0 => base
            .splitn(parts as usize, separator)
            .map(|fragment| fragment.trim().to_string())
            .collect(),
        _ => vec![base.to_string()],
    };

    let lexical = if template.alias.is_some() {
        fragments.join(" ")
    } else {
        base.to_string()
    };

    RdfLiteral {
        value: lexical,
        fragments,
        alias: template.alias.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::rdf::{AttributeMapping, NodeTemplate, RdfMappingConfig, RelationMapping};
    use crate::config::MappingConfig;
    use crate::entity::{EntityId, EntityTypeId, Relation, RelationId, RelationTypeId};
    use crate::filter::FilterRegistry;
    use crate::store::MemoryStore;

    const AGG: &str = "https://example.org/agg/";
    const FOAF: &str = "http://xmlns.com/foaf/0.1/";

    fn ent(id: u64) -> EntityId {
        EntityId::new(id).unwrap()
    }

    fn person_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.register_entity_type(EntityTypeId(2), "person");
        store.register_relation_type(RelationTypeId(1), "affiliation");
        store
    }

    fn name_attribute() -> AttributeMapping {
        AttributeMapping::for_field("name").with_triple(
            NodeTemplate::entity_ref("agg").with_prefix("person"),
            NodeTemplate::predicate("foaf", "name"),
            NodeTemplate::literal(),
        )
    }

    fn engine_with(mapping: RdfEntityMapping) -> MappingEngine {
        MappingEngine::new(
            MappingConfig::default(),
            RdfMappingConfig::new(vec![mapping]),
            FilterRegistry::with_builtins(),
        )
    }

    fn person_mapping() -> RdfEntityMapping {
        RdfEntityMapping::new("person")
            .with_namespace("agg", AGG)
            .with_namespace("foaf", FOAF)
    }

    #[test]
    fn literal_triple_from_direct_field() {
        let store = person_store();
        let entity =
            Entity::new(ent(7), EntityTypeId(2)).with_field("name", FieldOccurrence::text("Ada"));
        let engine = engine_with(person_mapping().with_attribute(name_attribute()));

        let triples = engine.project_triples(&entity, &store).unwrap();
        assert_eq!(triples.len(), 1);
        let t = &triples[0];
        assert_eq!(t.subject.as_iri(), Some("https://example.org/agg/person/7"));
        assert_eq!(t.predicate.as_iri(), Some("http://xmlns.com/foaf/0.1/name"));
        assert_eq!(t.object.as_literal().unwrap().value, "Ada");
    }

    #[test]
    fn missing_rdf_mapping_is_an_error() {
        let store = person_store();
        let entity = Entity::new(ent(7), EntityTypeId(2));
        let engine = engine_with(RdfEntityMapping::new("publication"));

        let err = engine.project_triples(&entity, &store).unwrap_err();
        assert!(matches!(err, MappingError::MissingConfig { .. }));
    }

    #[test]
    fn id_source_field_overrides_entity_id() {
        let store = person_store();
        let entity = Entity::new(ent(7), EntityTypeId(2))
            .with_field("name", FieldOccurrence::text("Ada"))
            .with_field("orcid", FieldOccurrence::text("0000-0002-1825-0097"));
        let attribute = AttributeMapping::for_field("name").with_triple(
            NodeTemplate::entity_ref("agg")
                .with_prefix("person")
                .with_id_source("orcid"),
            NodeTemplate::predicate("foaf", "name"),
            NodeTemplate::literal(),
        );
        let engine = engine_with(person_mapping().with_attribute(attribute));

        let triples = engine.project_triples(&entity, &store).unwrap();
        assert_eq!(
            triples[0].subject.as_iri(),
            Some("https://example.org/agg/person/0000-0002-1825-0097")
        );
    }

    #[test]
    fn parts_split_two_tokens_recombined_per_alias() {
        let store = person_store();
        let entity = Entity::new(ent(7), EntityTypeId(2))
            .with_field("name", FieldOccurrence::text("Doe, John"));
        let attribute = AttributeMapping::for_field("name").with_triple(
            NodeTemplate::entity_ref("agg").with_prefix("person"),
            NodeTemplate::predicate("foaf", "name"),
            NodeTemplate::literal().with_parts(2, ",").with_alias("display"),
        );
        let engine = engine_with(person_mapping().with_attribute(attribute));

        let triples = engine.project_triples(&entity, &store).unwrap();
        let literal = triples[0].object.as_literal().unwrap();
        assert_eq!(literal.fragments, ["Doe", "John"]);
        assert_eq!(literal.value, "Doe John");
        assert_eq!(literal.alias.as_deref(), Some("display"));
    }

    #[test]
    fn parts_split_single_token_is_single_fragment() {
        let store = person_store();
        let entity =
            Entity::new(ent(7), EntityTypeId(2)).with_field("name", FieldOccurrence::text("Ada"));
        let attribute = AttributeMapping::for_field("name").with_triple(
            NodeTemplate::entity_ref("agg").with_prefix("person"),
            NodeTemplate::predicate("foaf", "name"),
            NodeTemplate::literal().with_parts(2, ",").with_alias("display"),
        );
        let engine = engine_with(person_mapping().with_attribute(attribute));

        let triples = engine.project_triples(&entity, &store).unwrap();
        let literal = triples[0].object.as_literal().unwrap();
        assert_eq!(literal.fragments, ["Ada"]);
        assert_eq!(literal.value, "Ada");
    }

    #[test]
    fn preferred_only_keeps_marked_occurrences() {
        let store = person_store();
        let entity = Entity::new(ent(7), EntityTypeId(2))
            .with_field("name", FieldOccurrence::text("A. Lovelace"))
            .with_field("name", FieldOccurrence::text("Ada Lovelace").with_preferred());
        let engine =
            engine_with(person_mapping().with_attribute(name_attribute().preferred_only()));

        let triples = engine.project_triples(&entity, &store).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].object.as_literal().unwrap().value, "Ada Lovelace");
    }

    #[test]
    fn preferred_only_keeps_all_when_none_marked() {
        let store = person_store();
        let entity = Entity::new(ent(7), EntityTypeId(2))
            .with_field("name", FieldOccurrence::text("A. Lovelace"))
            .with_field("name", FieldOccurrence::text("Ada Lovelace"));
        let engine =
            engine_with(person_mapping().with_attribute(name_attribute().preferred_only()));

        let triples = engine.project_triples(&entity, &store).unwrap();
        assert_eq!(triples.len(), 2);
    }

    #[test]
    fn sub_attributes_chain_off_parent_object() {
        let store = person_store();
        let entity = Entity::new(ent(7), EntityTypeId(2))
            .with_field("orcid", FieldOccurrence::text("0000-0002-1825-0097"))
            .with_field("name", FieldOccurrence::text("Ada"));
        let attribute = AttributeMapping::for_field("orcid")
            .with_triple(
                NodeTemplate::entity_ref("agg").with_prefix("person"),
                NodeTemplate::predicate("foaf", "account"),
                NodeTemplate::entity_ref("agg").with_prefix("orcid"),
            )
            .with_sub_attribute(AttributeMapping::for_field("name").with_triple(
                NodeTemplate::literal(), // subject is replaced by the parent object
                NodeTemplate::predicate("foaf", "name"),
                NodeTemplate::literal(),
            ));
        let engine = engine_with(person_mapping().with_attribute(attribute));

        let triples = engine.project_triples(&entity, &store).unwrap();
        assert_eq!(triples.len(), 2);
        let parent_object = triples[0].object.as_iri().unwrap();
        assert_eq!(
            parent_object,
            "https://example.org/agg/orcid/0000-0002-1825-0097"
        );
        // The chained triple's subject is the parent triple's object.
        assert_eq!(triples[1].subject.as_iri(), Some(parent_object));
        assert_eq!(triples[1].object.as_literal().unwrap().value, "Ada");
    }

    #[test]
    fn relation_mapping_scopes_attributes_to_relation() {
        let store = person_store();
        let relation = Relation::new(
            RelationId::new(10).unwrap(),
            RelationTypeId(1),
            ent(7),
            ent(8),
        )
        .with_attribute("role", FieldOccurrence::text("professor"));
        let entity = Entity::new(ent(7), EntityTypeId(2)).with_from_relation(relation);
        let mapping = person_mapping().with_relation(RelationMapping {
            source_relation: "affiliation".into(),
            attributes: vec![AttributeMapping::for_field("role").with_triple(
                NodeTemplate::entity_ref("agg").with_prefix("person"),
                NodeTemplate::predicate("foaf", "role"),
                NodeTemplate::literal(),
            )],
        });
        let engine = engine_with(mapping);

        let triples = engine.project_triples(&entity, &store).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].object.as_literal().unwrap().value, "professor");
    }

    #[test]
    fn emission_follows_declaration_then_occurrence_order() {
        let store = person_store();
        let entity = Entity::new(ent(7), EntityTypeId(2))
            .with_field("name", FieldOccurrence::text("First"))
            .with_field("name", FieldOccurrence::text("Second"))
            .with_field("mail", FieldOccurrence::text("ada@example.org"));
        let mapping = person_mapping()
            .with_attribute(name_attribute())
            .with_attribute(AttributeMapping::for_field("mail").with_triple(
                NodeTemplate::entity_ref("agg").with_prefix("person"),
                NodeTemplate::predicate("foaf", "mbox"),
                NodeTemplate::literal(),
            ));
        let engine = engine_with(mapping);

        let triples = engine.project_triples(&entity, &store).unwrap();
        let objects: Vec<&str> = triples
            .iter()
            .filter_map(|t| t.object.as_literal())
            .map(|l| l.value.as_str())
            .collect();
        assert_eq!(objects, ["First", "Second", "ada@example.org"]);
    }
}
