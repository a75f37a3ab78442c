//! Source data model consumed by the mapping engine.
//!
//! Entities, relations, and field occurrences are read-only snapshots of the
//! underlying entity-relation store. The engine never mutates them; it walks
//! them guided by mapping configuration and emits target representations.

use std::collections::BTreeMap;
use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

/// Unique, niche-optimized identifier for an entity.
///
/// Uses `NonZeroU64` so that `Option<EntityId>` is the same size as `EntityId`
/// (the niche optimization lets the compiler use 0 as the `None` discriminant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct EntityId(NonZeroU64);

impl EntityId {
    /// Create an `EntityId` from a raw `u64`. Returns `None` if `raw` is zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(EntityId)
    }

    /// Get the underlying `u64` value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ent:{}", self.0)
    }
}

/// Unique identifier for a relation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct RelationId(NonZeroU64);

impl RelationId {
    /// Create a `RelationId` from a raw `u64`. Returns `None` if `raw` is zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(RelationId)
    }

    /// Get the underlying `u64` value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for RelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rel:{}", self.0)
    }
}

/// Identifier of an entity type, resolved to a name by the entity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct EntityTypeId(pub u64);

impl std::fmt::Display for EntityTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "etype:{}", self.0)
    }
}

/// Identifier of a relation type, resolved to a name by the entity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct RelationTypeId(pub u64);

impl std::fmt::Display for RelationTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rtype:{}", self.0)
    }
}

/// The value carried by one field occurrence.
///
/// Compound values hold named subfields (e.g. a structured person name) and
/// may carry a pre-rendered flat form. A compound without a rendered form can
/// only be projected through a subfield selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// A plain text value.
    Text(String),
    /// A structured value with named subfields.
    Compound {
        /// Pre-rendered flat form, if the source provides one.
        rendered: Option<String>,
        /// Named subfield values.
        subfields: BTreeMap<String, String>,
    },
}

impl FieldValue {
    /// The flat rendering of this value, if one exists.
    pub fn rendered(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Compound { rendered, .. } => rendered.as_deref(),
        }
    }

    /// Look up a named subfield. Plain text values have no subfields.
    pub fn subfield(&self, name: &str) -> Option<&str> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Compound { subfields, .. } => subfields.get(name).map(String::as_str),
        }
    }
}

/// One instance of a (possibly repeated) field's value on an entity or relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOccurrence {
    /// The value of this occurrence.
    pub value: FieldValue,
    /// Whether the source marks this occurrence as a preferred representative.
    #[serde(default)]
    pub preferred: bool,
}

impl FieldOccurrence {
    /// Create a plain text occurrence.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: FieldValue::Text(value.into()),
            preferred: false,
        }
    }

    /// Create a compound occurrence from (subfield, value) pairs.
    pub fn compound<I, K, V>(rendered: Option<String>, subfields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            value: FieldValue::Compound {
                rendered,
                subfields: subfields
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            },
            preferred: false,
        }
    }

    /// Mark this occurrence as preferred.
    pub fn with_preferred(mut self) -> Self {
        self.preferred = true;
        self
    }
}

/// A typed, directed edge between two entities, itself carrying attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Unique identifier of this relation instance.
    pub id: RelationId,
    /// The relation's type.
    pub relation_type: RelationTypeId,
    /// Source endpoint.
    pub from: EntityId,
    /// Target endpoint.
    pub to: EntityId,
    /// Relation attributes: field name → ordered occurrences.
    #[serde(default)]
    pub attributes: BTreeMap<String, Vec<FieldOccurrence>>,
}

impl Relation {
    /// Create a relation with no attributes.
    pub fn new(id: RelationId, relation_type: RelationTypeId, from: EntityId, to: EntityId) -> Self {
        Self {
            id,
            relation_type,
            from,
            to,
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute occurrence.
    pub fn with_attribute(mut self, name: impl Into<String>, occurrence: FieldOccurrence) -> Self {
        self.attributes.entry(name.into()).or_default().push(occurrence);
        self
    }

    /// The endpoint that is not the given subject.
    ///
    /// For a self-relation both endpoints coincide and the subject itself is
    /// returned.
    pub fn other_end(&self, subject: EntityId) -> EntityId {
        if self.from == subject { self.to } else { self.from }
    }

    /// Occurrences of a named attribute on this relation (empty if absent).
    pub fn attribute_occurrences(&self, name: &str) -> &[FieldOccurrence] {
        self.attributes.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A typed node in the source graph with field occurrences and relations.
///
/// The relation lists are a snapshot of the edges touching this entity at
/// fetch time; the engine merges both directions when traversing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// The entity's type.
    pub entity_type: EntityTypeId,
    /// Field name → ordered occurrences.
    #[serde(default)]
    pub fields: BTreeMap<String, Vec<FieldOccurrence>>,
    /// Semantic identifiers (stable external ids such as ORCID or DOI).
    #[serde(default)]
    pub semantic_identifiers: Vec<String>,
    /// Outbound relations (this entity is the `from` endpoint).
    #[serde(default)]
    pub from_relations: Vec<Relation>,
    /// Inbound relations (this entity is the `to` endpoint).
    #[serde(default)]
    pub to_relations: Vec<Relation>,
}

impl Entity {
    /// Create an entity with no fields or relations.
    pub fn new(id: EntityId, entity_type: EntityTypeId) -> Self {
        Self {
            id,
            entity_type,
            fields: BTreeMap::new(),
            semantic_identifiers: Vec::new(),
            from_relations: Vec::new(),
            to_relations: Vec::new(),
        }
    }

    /// Add a field occurrence.
    pub fn with_field(mut self, name: impl Into<String>, occurrence: FieldOccurrence) -> Self {
        self.fields.entry(name.into()).or_default().push(occurrence);
        self
    }

    /// Add a semantic identifier.
    pub fn with_semantic_identifier(mut self, id: impl Into<String>) -> Self {
        self.semantic_identifiers.push(id.into());
        self
    }

    /// Add an outbound relation.
    pub fn with_from_relation(mut self, relation: Relation) -> Self {
        self.from_relations.push(relation);
        self
    }

    /// Add an inbound relation.
    pub fn with_to_relation(mut self, relation: Relation) -> Self {
        self.to_relations.push(relation);
        self
    }

    /// Occurrences of a named field on this entity (empty if absent).
    pub fn field_occurrences(&self, name: &str) -> &[FieldOccurrence] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}
