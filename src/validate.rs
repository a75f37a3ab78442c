//! Pre-ingest document validation.
//!
//! An ordered list of independent validators, each returning pass or fail
//! with a reason; the chain short-circuits on the first failure. Documents
//! reach this chain already decoded from their wire format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::FieldOccurrence;
use crate::error::ValidationError;

/// A decoded document awaiting ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestDocument {
    /// Declared document identifier.
    pub id: String,
    /// Declared entity-type name.
    pub entity_type: String,
    /// Field name → occurrences.
    #[serde(default)]
    pub fields: BTreeMap<String, Vec<FieldOccurrence>>,
}

/// One independent validation step.
pub trait DocumentValidator {
    /// Name reported on failure.
    fn name(&self) -> &str;

    /// Check the document; `Err` carries the rejection reason.
    fn validate(&self, document: &IngestDocument) -> Result<(), String>;
}

/// Ordered validator chain, short-circuiting on the first failure.
#[derive(Default)]
pub struct ValidationChain {
    validators: Vec<Box<dyn DocumentValidator>>,
}

impl ValidationChain {
    /// An empty chain (accepts everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard chain: schema checks, then content checks.
    pub fn standard(known_types: Vec<String>) -> Self {
        let mut chain = Self::new();
        chain.push(Box::new(SchemaValidator { known_types }));
        chain.push(Box::new(ContentValidator));
        chain
    }

    /// Append a validator; it runs after all previously appended ones.
    pub fn push(&mut self, validator: Box<dyn DocumentValidator>) {
        self.validators.push(validator);
    }

    /// Run the chain in order. The first failing validator's name and
    /// reason are returned; later validators do not run.
    pub fn run(&self, document: &IngestDocument) -> Result<(), ValidationError> {
        for validator in &self.validators {
            if let Err(reason) = validator.validate(document) {
                return Err(ValidationError::Failed {
                    validator: validator.name().to_string(),
                    reason,
                });
            }
        }
        Ok(())
    }

    /// Number of validators in the chain.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl std::fmt::Debug for ValidationChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationChain")
            .field("validators", &self.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Built-in validators
// ---------------------------------------------------------------------------

/// Schema-level checks: non-empty id, declared type known.
pub struct SchemaValidator {
    /// Entity-type names accepted for ingestion.
    pub known_types: Vec<String>,
}

impl DocumentValidator for SchemaValidator {
    fn name(&self) -> &str {
        "schema"
    }

    fn validate(&self, document: &IngestDocument) -> Result<(), String> {
        if document.id.trim().is_empty() {
            return Err("document id is empty".into());
        }
        if !self.known_types.iter().any(|t| t == &document.entity_type) {
            return Err(format!("unknown entity type \"{}\"", document.entity_type));
        }
        Ok(())
    }
}

/// Content-level checks: at least one occurrence, no empty field names.
pub struct ContentValidator;

impl DocumentValidator for ContentValidator {
    fn name(&self) -> &str {
        "content"
    }

    fn validate(&self, document: &IngestDocument) -> Result<(), String> {
        if document.fields.values().all(|occs| occs.is_empty()) {
            return Err("document has no field occurrences".into());
        }
        if document.fields.keys().any(|name| name.trim().is_empty()) {
            return Err("document has an empty field name".into());
        }
        Ok(())
    }
}
