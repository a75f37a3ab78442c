//! Mapping configuration: the declarative tree driving every projection.
//!
//! Configuration is plain data (spec'd, serde-validated at load, no behavior)
//! and immutable after load; one loaded tree is shared read-only across all
//! indexing calls. The flat dialect lives here, the RDF dialect in [`rdf`],
//! file loading in [`load`].

pub mod load;
pub mod rdf;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Target field type in the flat projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Untokenized short string.
    #[default]
    String,
    /// Full-text analyzed content.
    Text,
    /// Exact-match keyword.
    Keyword,
    /// Numeric field. Accepted by the loader but not projected.
    Number,
    /// Date field, additionally indexed date-sortable.
    Date,
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetType::String => write!(f, "string"),
            TargetType::Text => write!(f, "text"),
            TargetType::Keyword => write!(f, "keyword"),
            TargetType::Number => write!(f, "number"),
            TargetType::Date => write!(f, "date"),
        }
    }
}

/// How one target field is sourced from the entity graph.
///
/// With a `source_relation` and `source_member = false` the source field is
/// read from the relation's own attributes; with `source_member = true` it is
/// read from the entity at the other end of the relation. With no
/// `source_relation` it is read directly from the subject entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Name of the target field.
    pub target: String,
    /// Target field type.
    #[serde(default)]
    pub target_type: TargetType,
    /// Name of the source field. Required; a mapping without one is skipped.
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
    /// Named occurrence filter applied before emission.
    #[serde(default)]
    pub filter: Option<String>,
    /// Also register the value under a sort-key slot.
    #[serde(default)]
    pub sortable: bool,
    /// Filter-specific options (e.g. `filterOneValue = "true"`).
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl FieldMapping {
    /// A direct mapping from a subject-entity field to a target field.
    pub fn direct(target: impl Into<String>, source_field: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            target_type: TargetType::default(),
            source_field: Some(source_field.into()),
            source_relation: None,
            source_member: false,
            subfield: None,
            filter: None,
            sortable: false,
            params: BTreeMap::new(),
        }
    }

    /// Set the target type.
    pub fn with_type(mut self, target_type: TargetType) -> Self {
        self.target_type = target_type;
        self
    }

    /// Traverse the named relation; read from the relation's attributes or,
    /// with `member = true`, from the related entity.
    pub fn via_relation(mut self, relation: impl Into<String>, member: bool) -> Self {
        self.source_relation = Some(relation.into());
        self.source_member = member;
        self
    }

    /// Select a subfield of compound values.
    pub fn with_subfield(mut self, subfield: impl Into<String>) -> Self {
        self.subfield = Some(subfield.into());
        self
    }

    /// Apply a named occurrence filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Mark the target field sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Set a filter parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Copies the identifier of every related entity reached through a relation
/// into a named identifier list on the target document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedIdentifierMapping {
    /// Name of the identifier list on the target document.
    pub target: String,
    /// Relation type name to traverse.
    pub source_relation: String,
}

/// A child entity mapping applied to entities reached through a relation,
/// producing sub-documents attached to the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedMapping {
    /// Relation type name connecting parent and child entities.
    pub source_relation: String,
    /// The mapping applied to each related entity.
    pub mapping: EntityMapping,
}

/// All projection rules for one source entity type. Field order is
/// declaration order and is preserved through projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMapping {
    /// Source entity-type name this mapping applies to.
    pub entity_type: String,
    /// Ordered field mappings.
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldMapping>,
    /// Related-identifier mappings.
    #[serde(default, rename = "related_identifier")]
    pub related_identifiers: Vec<RelatedIdentifierMapping>,
    /// Nested entity mappings; recursion depth is bounded by this tree.
    #[serde(default)]
    pub nested: Vec<NestedMapping>,
}

impl EntityMapping {
    /// An empty mapping for the given entity type.
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            fields: Vec::new(),
            related_identifiers: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Append a field mapping.
    pub fn with_field(mut self, field: FieldMapping) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a related-identifier mapping.
    pub fn with_related_identifier(
        mut self,
        target: impl Into<String>,
        source_relation: impl Into<String>,
    ) -> Self {
        self.related_identifiers.push(RelatedIdentifierMapping {
            target: target.into(),
            source_relation: source_relation.into(),
        });
        self
    }

    /// Append a nested entity mapping.
    pub fn with_nested(mut self, source_relation: impl Into<String>, mapping: EntityMapping) -> Self {
        self.nested.push(NestedMapping {
            source_relation: source_relation.into(),
            mapping,
        });
        self
    }
}

/// Root of the flat dialect: one entity mapping per source entity-type name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Entity mappings in declaration order.
    #[serde(default, rename = "entity")]
    pub entities: Vec<EntityMapping>,
}

impl MappingConfig {
    /// Build a config from entity mappings.
    pub fn new(entities: Vec<EntityMapping>) -> Self {
        Self { entities }
    }

    /// Look up the mapping for a source entity-type name.
    pub fn entity_mapping(&self, entity_type: &str) -> Option<&EntityMapping> {
        self.entities.iter().find(|m| m.entity_type == entity_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_mapping() {
        let doc = r#"
            [[entity]]
            entity_type = "publication"

            [[entity.field]]
            target = "title"
            target_type = "text"
            source_field = "dc.title"
            sortable = true
        "#;
        let config: MappingConfig = toml::from_str(doc).unwrap();

        let mapping = config.entity_mapping("publication").unwrap();
        assert_eq!(mapping.fields.len(), 1);
        let field = &mapping.fields[0];
        assert_eq!(field.target, "title");
        assert_eq!(field.target_type, TargetType::Text);
        assert_eq!(field.source_field.as_deref(), Some("dc.title"));
        assert!(field.sortable);
        assert!(field.source_relation.is_none());
        assert!(!field.source_member);
    }

    #[test]
    fn parse_relation_traversal_and_params() {
        let doc = r#"
            [[entity]]
            entity_type = "publication"

            [[entity.field]]
            target = "author_name"
            source_field = "name"
            source_relation = "authorship"
            source_member = true
            filter = "longest-string"

            [entity.field.params]
            filterOneValue = "true"

            [[entity.related_identifier]]
            target = "author_ids"
            source_relation = "authorship"
        "#;
        let config: MappingConfig = toml::from_str(doc).unwrap();

        let mapping = config.entity_mapping("publication").unwrap();
        let field = &mapping.fields[0];
        assert_eq!(field.source_relation.as_deref(), Some("authorship"));
        assert!(field.source_member);
        assert_eq!(field.filter.as_deref(), Some("longest-string"));
        assert_eq!(field.params.get("filterOneValue").map(String::as_str), Some("true"));
        assert_eq!(mapping.related_identifiers.len(), 1);
    }

    #[test]
    fn parse_nested_mapping() {
        let doc = r#"
            [[entity]]
            entity_type = "publication"

            [[entity.nested]]
            source_relation = "part-of"

            [entity.nested.mapping]
            entity_type = "journal"

            [[entity.nested.mapping.field]]
            target = "journal_title"
            source_field = "title"
        "#;
        let config: MappingConfig = toml::from_str(doc).unwrap();

        let mapping = config.entity_mapping("publication").unwrap();
        assert_eq!(mapping.nested.len(), 1);
        let nested = &mapping.nested[0];
        assert_eq!(nested.source_relation, "part-of");
        assert_eq!(nested.mapping.entity_type, "journal");
        assert_eq!(nested.mapping.fields[0].target, "journal_title");
    }

    #[test]
    fn missing_mapping_lookup() {
        let config = MappingConfig::default();
        assert!(config.entity_mapping("anything").is_none());
    }

    #[test]
    fn declaration_order_preserved() {
        let mapping = EntityMapping::new("person")
            .with_field(FieldMapping::direct("b", "src_b"))
            .with_field(FieldMapping::direct("a", "src_a"));
        assert_eq!(mapping.fields[0].target, "b");
        assert_eq!(mapping.fields[1].target, "a");
    }
}
