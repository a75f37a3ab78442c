//! Entity-store contract consumed by the mapping engine.
//!
//! The persistent entity-relation store lives outside this crate; the engine
//! only needs type-name resolution and entity fetches, expressed by the
//! [`EntityStore`] trait. [`MemoryStore`] is a complete in-memory
//! implementation used by tests and embedding callers.

use std::collections::HashMap;

use crate::entity::{Entity, EntityId, EntityTypeId, RelationTypeId};

/// Read-only view of the entity-relation store.
///
/// Implementations must return stable snapshots: the engine assumes an entity
/// fetched during one projection call does not change under it.
pub trait EntityStore {
    /// Resolve an entity-type id to its human-readable name.
    fn entity_type_name(&self, type_id: EntityTypeId) -> Option<String>;

    /// Resolve a relation-type id to its human-readable name.
    fn relation_type_name(&self, type_id: RelationTypeId) -> Option<String>;

    /// Fetch an entity snapshot by id.
    fn entity(&self, id: EntityId) -> Option<Entity>;
}

/// In-memory entity store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entity_types: HashMap<EntityTypeId, String>,
    relation_types: HashMap<RelationTypeId, String>,
    entities: HashMap<EntityId, Entity>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity type name.
    pub fn register_entity_type(&mut self, id: EntityTypeId, name: impl Into<String>) {
        self.entity_types.insert(id, name.into());
    }

    /// Register a relation type name.
    pub fn register_relation_type(&mut self, id: RelationTypeId, name: impl Into<String>) {
        self.relation_types.insert(id, name.into());
    }

    /// Insert an entity snapshot, replacing any previous one with the same id.
    pub fn insert_entity(&mut self, entity: Entity) {
        self.entities.insert(entity.id, entity);
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityStore for MemoryStore {
    fn entity_type_name(&self, type_id: EntityTypeId) -> Option<String> {
        self.entity_types.get(&type_id).cloned()
    }

    fn relation_type_name(&self, type_id: RelationTypeId) -> Option<String> {
        self.relation_types.get(&type_id).cloned()
    }

    fn entity(&self, id: EntityId) -> Option<Entity> {
        self.entities.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ent(id: u64) -> EntityId {
        EntityId::new(id).unwrap()
    }

    #[test]
    fn type_name_resolution() {
        let mut store = MemoryStore::new();
        store.register_entity_type(EntityTypeId(1), "publication");
        store.register_relation_type(RelationTypeId(1), "authorship");

        assert_eq!(
            store.entity_type_name(EntityTypeId(1)).as_deref(),
            Some("publication")
        );
        assert_eq!(
            store.relation_type_name(RelationTypeId(1)).as_deref(),
            Some("authorship")
        );
        assert!(store.entity_type_name(EntityTypeId(99)).is_none());
    }

    #[test]
    fn entity_fetch() {
        let mut store = MemoryStore::new();
        store.insert_entity(Entity::new(ent(1), EntityTypeId(1)));

        assert!(store.entity(ent(1)).is_some());
        assert!(store.entity(ent(2)).is_none());
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }
}
