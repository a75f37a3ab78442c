//! RDF dialect of the mapping configuration.
//!
//! An [`RdfEntityMapping`] declares, per source entity type, a namespace
//! table and a tree of [`AttributeMapping`]s. Each attribute resolves source
//! values the same way the flat dialect does and expands zero or more
//! [`TripleTemplate`]s per resolved occurrence; sub-attributes chain further
//! triples off the parent triple's object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What kind of RDF term a node template produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// A literal built from the resolved source value (or a fixed `value`).
    #[default]
    Literal,
    /// An IRI reference to an entity, built from namespace/prefix/identifier.
    EntityRef,
}

/// Descriptor for one position (subject, predicate, object) of a triple.
///
/// Subjects and entity-ref objects build an IRI as `namespace` + `prefix/` +
/// identifier, where the identifier comes from the `id_source` field on the
/// subject entity, falling back to the subject entity's own id. Predicates
/// are the namespaced `value`. Literal objects take the resolved source
/// value, optionally split into at most `parts` ordered fragments on
/// `separator` and recombined under the storage `alias`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeTemplate {
    /// Term kind.
    #[serde(default)]
    pub kind: NodeKind,
    /// Namespace key (resolved against the mapping's namespace table) or a
    /// full IRI prefix.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Path segment between namespace and identifier.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Form of the identifier (e.g. "local", "uuid"). Informational.
    #[serde(default)]
    pub id_type: Option<String>,
    /// Field on the subject entity supplying the identifier; absent means
    /// the subject entity's own id.
    #[serde(default)]
    pub id_source: Option<String>,
    /// Literal value: predicate local name, or a fixed object literal.
    #[serde(default)]
    pub value: Option<String>,
    /// Split the object literal into at most this many fragments.
    #[serde(default)]
    pub parts: Option<u8>,
    /// Separator used for the parts split.
    #[serde(default)]
    pub separator: Option<String>,
    /// Storage alias governing how multi-part values are recombined.
    #[serde(default)]
    pub alias: Option<String>,
}

impl NodeTemplate {
    /// An entity-ref node in the given namespace.
    pub fn entity_ref(namespace: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::EntityRef,
            namespace: Some(namespace.into()),
            ..Self::default()
        }
    }

    /// A namespaced predicate.
    pub fn predicate(namespace: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// A plain literal node taking the resolved source value.
    pub fn literal() -> Self {
        Self::default()
    }

    /// Set the path prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Take the identifier from a field on the subject entity.
    pub fn with_id_source(mut self, id_source: impl Into<String>) -> Self {
        self.id_source = Some(id_source.into());
        self
    }

    /// Split the literal into at most `parts` fragments on `separator`.
    pub fn with_parts(mut self, parts: u8, separator: impl Into<String>) -> Self {
        self.parts = Some(parts);
        self.separator = Some(separator.into());
        self
    }

    /// Set the storage alias for recombined fragments.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Template for one emitted triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripleTemplate {
    /// Subject descriptor.
    pub subject: NodeTemplate,
    /// Predicate descriptor.
    pub predicate: NodeTemplate,
    /// Object descriptor.
    pub object: NodeTemplate,
}

/// Maps one source attribute onto triples; the RDF analogue of a
/// [`FieldMapping`](crate::config::FieldMapping).
///
/// Source resolution follows the same three-way rule as the flat dialect
/// (direct field, relation attribute, related-entity field).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeMapping {
    /// Name of the source field.
    #[serde(default)]
    pub source_field: Option<String>,
    /// Relation type name to traverse before reading the source field.
    #[serde(default)]
    pub source_relation: Option<String>,
    /// Read the source field from the related entity instead of the relation.
    #[serde(default)]
    pub source_member: bool,
    /// Subfield selector for compound values.
    #[serde(default)]
    pub subfield: Option<String>,
    /// Named occurrence filter applied before templating.
    #[serde(default)]
    pub filter: Option<String>,
    /// Filter-specific options.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Keep only occurrences marked preferred; when none is marked, all are
    /// kept so a valid entity never produces zero triples.
    #[serde(default)]
    pub preferred_only: bool,
    /// Triple templates expanded per resolved occurrence, in order.
    #[serde(default, rename = "triple")]
    pub triples: Vec<TripleTemplate>,
    /// Sub-attributes whose triples take the parent triple's object as
    /// their subject.
    #[serde(default, rename = "sub_attribute")]
    pub sub_attributes: Vec<AttributeMapping>,
}

impl AttributeMapping {
    /// An attribute sourced from a field on the subject entity.
    pub fn for_field(source_field: impl Into<String>) -> Self {
        Self {
            source_field: Some(source_field.into()),
            ..Self::default()
        }
    }

    /// Traverse the named relation before reading the source field.
    pub fn via_relation(mut self, relation: impl Into<String>, member: bool) -> Self {
        self.source_relation = Some(relation.into());
        self.source_member = member;
        self
    }

    /// Apply a named occurrence filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Keep only preferred occurrences.
    pub fn preferred_only(mut self) -> Self {
        self.preferred_only = true;
        self
    }

    /// Append a triple template.
    pub fn with_triple(mut self, subject: NodeTemplate, predicate: NodeTemplate, object: NodeTemplate) -> Self {
        self.triples.push(TripleTemplate {
            subject,
            predicate,
            object,
        });
        self
    }

    /// Append a sub-attribute.
    pub fn with_sub_attribute(mut self, sub: AttributeMapping) -> Self {
        self.sub_attributes.push(sub);
        self
    }
}

/// Relation-attribute analogue of [`AttributeMapping`]: its attributes are
/// resolved against every relation of the named type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationMapping {
    /// Relation type name.
    pub source_relation: String,
    /// Attribute mappings scoped to this relation.
    #[serde(default, rename = "attribute")]
    pub attributes: Vec<AttributeMapping>,
}

/// RDF projection rules for one source entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdfEntityMapping {
    /// Source entity-type name this mapping applies to.
    pub entity_type: String,
    /// Namespace table: key → IRI prefix.
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,
    /// Attribute mappings in declaration order.
    #[serde(default, rename = "attribute")]
    pub attributes: Vec<AttributeMapping>,
    /// Relation mappings in declaration order.
    #[serde(default, rename = "relation")]
    pub relations: Vec<RelationMapping>,
}

impl RdfEntityMapping {
    /// An empty RDF mapping for the given entity type.
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            namespaces: BTreeMap::new(),
            attributes: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Declare a namespace.
    pub fn with_namespace(mut self, key: impl Into<String>, iri: impl Into<String>) -> Self {
        self.namespaces.insert(key.into(), iri.into());
        self
    }

    /// Append an attribute mapping.
    pub fn with_attribute(mut self, attribute: AttributeMapping) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Append a relation mapping.
    pub fn with_relation(mut self, relation: RelationMapping) -> Self {
        self.relations.push(relation);
        self
    }

    /// Resolve a namespace reference: table key first, else the raw value is
    /// taken to already be an IRI prefix.
    pub fn resolve_namespace<'a>(&'a self, reference: &'a str) -> &'a str {
        self.namespaces
            .get(reference)
            .map(String::as_str)
            .unwrap_or(reference)
    }
}

/// Root of the RDF dialect: one mapping per source entity-type name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RdfMappingConfig {
    /// RDF entity mappings in declaration order.
    #[serde(default, rename = "rdf_entity")]
    pub entities: Vec<RdfEntityMapping>,
}

impl RdfMappingConfig {
    /// Build a config from RDF entity mappings.
    pub fn new(entities: Vec<RdfEntityMapping>) -> Self {
        Self { entities }
    }

    /// Look up the RDF mapping for a source entity-type name.
    pub fn entity_mapping(&self, entity_type: &str) -> Option<&RdfEntityMapping> {
        self.entities.iter().find(|m| m.entity_type == entity_type)
    }
}
