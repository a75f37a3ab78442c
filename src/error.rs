//! Rich diagnostic error types for the seshat mapping engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so operators know exactly
//! what went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

use crate::entity::EntityId;

/// Top-level error type for the seshat engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum SeshatError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Sink(#[from] SinkError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from loading mapping configuration.
///
/// A failed load disables indexing for the entity types the file would have
/// configured; it is never fatal for the process.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read mapping configuration: {path}")]
    #[diagnostic(
        code(seshat::config::read),
        help("Ensure the configuration file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse mapping configuration: {path}")]
    #[diagnostic(
        code(seshat::config::parse),
        help("Check the TOML syntax and that the document matches the mapping schema.")
    )]
    Parse { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Mapping errors
// ---------------------------------------------------------------------------

/// Errors that abort the projection of a single entity.
#[derive(Debug, Error, Diagnostic)]
pub enum MappingError {
    #[error("no mapping configured for entity type \"{entity_type}\"")]
    #[diagnostic(
        code(seshat::mapping::missing_config),
        help(
            "The mapping configuration has no entry for this entity type. \
             Add one to the configuration file, or skip entities of this type \
             when indexing."
        )
    )]
    MissingConfig { entity_type: String },

    #[error("entity type {type_id} is unknown to the entity store")]
    #[diagnostic(
        code(seshat::mapping::unknown_entity_type),
        help(
            "The entity's type id could not be resolved to a name. \
             The entity store and the indexed data may be out of sync."
        )
    )]
    UnknownEntityType { type_id: u64 },
}

// ---------------------------------------------------------------------------
// Field resolution errors
// ---------------------------------------------------------------------------

/// Per-field resolution failures.
///
/// These are recoverable: the engine logs them with field context and skips
/// the affected field mapping, so one bad entry never aborts a document.
#[derive(Debug, Error, Diagnostic)]
pub enum FieldError {
    #[error("field mapping for target \"{target}\" declares no source field")]
    #[diagnostic(
        code(seshat::field::source_undefined),
        help("Every field mapping needs a source_field. Fix the configuration entry.")
    )]
    SourceFieldUndefined { target: String },

    #[error("failed to extract a value for field \"{field}\": {message}")]
    #[diagnostic(
        code(seshat::field::value_extraction),
        help(
            "The field occurrence could not be rendered. For compound values, \
             check that the configured subfield exists or that the occurrence \
             carries a rendered form."
        )
    )]
    ValueExtraction { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// Failure from the pre-ingest validation chain.
#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error("validator \"{validator}\" rejected the document: {reason}")]
    #[diagnostic(
        code(seshat::validate::failed),
        help("Fix the ingest document and resubmit; later validators did not run.")
    )]
    Failed { validator: String, reason: String },
}

// ---------------------------------------------------------------------------
// Sink errors
// ---------------------------------------------------------------------------

/// Errors from target sinks (search index, RDF store).
#[derive(Debug, Error, Diagnostic)]
pub enum SinkError {
    #[error("failed to save target document: {message}")]
    #[diagnostic(
        code(seshat::sink::save),
        help("The sink rejected the document. Check sink connectivity and capacity.")
    )]
    Save { message: String },

    #[error("failed to delete entity {id} from the sink: {message}")]
    #[diagnostic(
        code(seshat::sink::delete),
        help("The deletion failed; remaining deletions in a batch still run.")
    )]
    Delete { id: EntityId, message: String },

    #[error("RDF store error: {message}")]
    #[diagnostic(
        code(seshat::sink::rdf),
        help("The RDF store rejected the operation. Check that the store is initialized and the terms are valid IRIs.")
    )]
    Rdf { message: String },
}

/// Convenience alias for functions returning seshat results.
pub type SeshatResult<T> = std::result::Result<T, SeshatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_error_converts_to_seshat_error() {
        let err = MappingError::MissingConfig {
            entity_type: "publication".into(),
        };
        let top: SeshatError = err.into();
        assert!(matches!(
            top,
            SeshatError::Mapping(MappingError::MissingConfig { .. })
        ));
    }

    #[test]
    fn config_error_converts_to_seshat_error() {
        let err = ConfigError::Parse {
            path: "mappings.toml".into(),
            message: "expected table".into(),
        };
        let top: SeshatError = err.into();
        assert!(matches!(top, SeshatError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = MappingError::MissingConfig {
            entity_type: "person".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("person"));

        let err = FieldError::SourceFieldUndefined {
            target: "title".into(),
        };
        assert!(format!("{err}").contains("title"));
    }
}
