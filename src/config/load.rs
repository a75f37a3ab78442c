//! Loading mapping configuration from TOML files.
//!
//! One document may declare both dialects (`[[entity]]` tables for the flat
//! dialect, `[[rdf_entity]]` tables for RDF). Loading happens once at
//! startup; a failed load is surfaced as [`ConfigError`] and leaves the
//! caller without mappings from that file — indexing of other types
//! continues, the process never dies over a bad mapping file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::rdf::RdfMappingConfig;
use crate::config::MappingConfig;
use crate::error::ConfigError;

/// One parsed configuration document holding both dialects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingDocument {
    /// Flat-dialect mappings.
    #[serde(flatten)]
    pub flat: MappingConfig,
    /// RDF-dialect mappings.
    #[serde(flatten)]
    pub rdf: RdfMappingConfig,
}

impl MappingDocument {
    /// Parse a configuration document from TOML text.
    ///
    /// `origin` names the source (file path or a synthetic label) for error
    /// reporting.
    pub fn from_toml(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Load a configuration document from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content, &path.display().to_string())
    }

    /// Merge another document into this one. Later entries win on lookup
    /// only if the earlier document had no mapping for the type, since
    /// lookups scan in declaration order.
    pub fn merge(&mut self, other: MappingDocument) {
        self.flat.entities.extend(other.flat.entities);
        self.rdf.entities.extend(other.rdf.entities);
    }
}

/// Load every given path, skipping files that fail to load.
///
/// Failures are logged with their diagnostic and do not abort the remaining
/// loads; the returned document holds whatever loaded cleanly.
pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> MappingDocument {
    let mut merged = MappingDocument::default();
    for path in paths {
        let path = path.as_ref();
        match MappingDocument::load(path) {
            Ok(doc) => merged.merge(doc),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unloadable mapping file");
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
        [[entity]]
        entity_type = "publication"

        [[entity.field]]
        target = "title"
        source_field = "dc.title"

        [[rdf_entity]]
        entity_type = "publication"

        [[rdf_entity.attribute]]
        source_field = "dc.title"
    "#;

    #[test]
    fn parse_both_dialects_from_one_document() {
        let doc = MappingDocument::from_toml(SAMPLE, "inline").unwrap();
        assert!(doc.flat.entity_mapping("publication").is_some());
        assert!(doc.rdf.entity_mapping("publication").is_some());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mappings.toml");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(SAMPLE.as_bytes())
            .unwrap();

        let doc = MappingDocument::load(&path).unwrap();
        assert_eq!(doc.flat.entities.len(), 1);
        assert_eq!(doc.rdf.entities.len(), 1);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = MappingDocument::load(Path::new("/nonexistent/mappings.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = MappingDocument::from_toml("[[entity]\nbroken", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_all_skips_broken_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let good = dir.path().join("good.toml");
        std::fs::write(&good, SAMPLE).unwrap();
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "not [ valid").unwrap();

        let doc = load_all(&[good, bad, dir.path().join("absent.toml")]);
        assert_eq!(doc.flat.entities.len(), 1);
    }

    #[test]
    fn merge_keeps_first_mapping_for_type() {
        let mut first = MappingDocument::from_toml(SAMPLE, "a").unwrap();
        let second = MappingDocument::from_toml(
            r#"
                [[entity]]
                entity_type = "publication"

                [[entity.field]]
                target = "other"
                source_field = "dc.other"
            "#,
            "b",
        )
        .unwrap();
        first.merge(second);

        // Lookup scans in declaration order, so the earlier mapping wins.
        let mapping = first.flat.entity_mapping("publication").unwrap();
        assert_eq!(mapping.fields[0].target, "title");
        assert_eq!(first.flat.entities.len(), 2);
    }
}
