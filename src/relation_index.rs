//! Relation index: per-projection lookup of relations by type name.
//!
//! Groups every relation touching one entity (outbound and inbound merged
//! into one namespace, so a relation is reachable by its type name
//! regardless of direction) for O(1) lookup during traversal. Built fresh
//! per projection call and owned by that call — relation membership can
//! change between calls, so nothing is cached.

use std::collections::HashMap;

use crate::entity::{Entity, Relation};
use crate::store::EntityStore;

/// Multi-valued mapping from relation-type name to relation instances.
#[derive(Debug, Default)]
pub struct RelationIndex {
    by_name: HashMap<String, Vec<Relation>>,
}

impl RelationIndex {
    /// Build the index for one entity, resolving type names via the store.
    ///
    /// Outbound relations are indexed before inbound ones; within each
    /// direction, source order is preserved. A relation whose type name the
    /// store cannot resolve is logged and left out.
    pub fn build(entity: &Entity, store: &dyn EntityStore) -> Self {
        let mut by_name: HashMap<String, Vec<Relation>> = HashMap::new();

        for relation in entity.from_relations.iter().chain(entity.to_relations.iter()) {
            match store.relation_type_name(relation.relation_type) {
                Some(name) => by_name.entry(name).or_default().push(relation.clone()),
                None => {
                    tracing::warn!(
                        relation = %relation.id,
                        type_id = %relation.relation_type,
                        "relation type unresolvable, relation not indexed"
                    );
                }
            }
        }

        Self { by_name }
    }

    /// All relations of the given type name (empty if none).
    pub fn relations(&self, type_name: &str) -> &[Relation] {
        self.by_name.get(type_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct relation-type names indexed.
    pub fn type_count(&self) -> usize {
        self.by_name.len()
    }
}
