//! Target sinks: consumers of produced documents and triples.
//!
//! The engine only constructs target representations; persistence is the
//! sink's concern. [`MemorySink`] collects in memory (tests, dry runs),
//! [`RdfStoreSink`] adapts triples into an oxigraph [`Store`]. Search-engine
//! and production RDF clients live outside this crate and implement the same
//! traits.

use std::sync::Mutex;

use oxigraph::model::{GraphNameRef, Literal, NamedNode, Quad, Term};
use oxigraph::store::Store;

use crate::document::TargetDocument;
use crate::entity::EntityId;
use crate::error::SinkError;
use crate::triple::{RdfTerm, RdfTriple};

/// Consumes flat target documents.
pub trait DocumentSink {
    /// Persist one complete target document.
    fn save(&self, document: &TargetDocument) -> Result<(), SinkError>;

    /// Remove the document projected from the given entity.
    fn delete(&self, id: EntityId) -> Result<(), SinkError>;
}

/// Consumes RDF triples.
pub trait TripleSink {
    /// Persist one triple.
    fn emit(&self, triple: &RdfTriple) -> Result<(), SinkError>;
}

/// Delete a batch of entities from a sink, best-effort.
///
/// A failed deletion is logged and does not abort the remaining deletions.
/// Returns the number of failures.
pub fn delete_batch(sink: &dyn DocumentSink, ids: &[EntityId]) -> usize {
    let mut failures = 0;
    for &id in ids {
        if let Err(e) = sink.delete(id) {
            tracing::warn!(entity = %id, error = %e, "batch deletion entry failed");
            failures += 1;
        }
    }
    failures
}

// ---------------------------------------------------------------------------
// In-memory sink
// ---------------------------------------------------------------------------

/// Collecting sink holding everything it receives in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: Mutex<Vec<TargetDocument>>,
    deleted: Mutex<Vec<EntityId>>,
    triples: Mutex<Vec<RdfTriple>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of saved documents.
    pub fn documents(&self) -> Vec<TargetDocument> {
        self.documents.lock().expect("sink lock poisoned").clone()
    }

    /// Snapshot of deleted entity ids.
    pub fn deleted(&self) -> Vec<EntityId> {
        self.deleted.lock().expect("sink lock poisoned").clone()
    }

    /// Snapshot of emitted triples.
    pub fn triples(&self) -> Vec<RdfTriple> {
        self.triples.lock().expect("sink lock poisoned").clone()
    }
}

impl DocumentSink for MemorySink {
    fn save(&self, document: &TargetDocument) -> Result<(), SinkError> {
        self.documents
            .lock()
            .expect("sink lock poisoned")
            .push(document.clone());
        Ok(())
    }

    fn delete(&self, id: EntityId) -> Result<(), SinkError> {
        let mut documents = self.documents.lock().expect("sink lock poisoned");
        documents.retain(|d| d.id != id);
        self.deleted.lock().expect("sink lock poisoned").push(id);
        Ok(())
    }
}

impl TripleSink for MemorySink {
    fn emit(&self, triple: &RdfTriple) -> Result<(), SinkError> {
        self.triples
            .lock()
            .expect("sink lock poisoned")
            .push(triple.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Oxigraph sink
// ---------------------------------------------------------------------------

/// RDF store sink backed by oxigraph.
pub struct RdfStoreSink {
    store: Store,
}

impl RdfStoreSink {
    /// Create an in-memory RDF store (no persistence).
    pub fn in_memory() -> Result<Self, SinkError> {
        let store = Store::new().map_err(|e| SinkError::Rdf {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        Ok(Self { store })
    }

    /// Open or create a persistent RDF store at the given path.
    pub fn open(path: &std::path::Path) -> Result<Self, SinkError> {
        std::fs::create_dir_all(path).map_err(|e| SinkError::Rdf {
            message: format!("failed to create oxigraph directory: {e}"),
        })?;
        let store = Store::open(path).map_err(|e| SinkError::Rdf {
            message: format!("failed to open oxigraph store at {}: {e}", path.display()),
        })?;
        Ok(Self { store })
    }

    /// Number of stored triples.
    pub fn triple_count(&self) -> Result<usize, SinkError> {
        self.store.len().map_err(|e| SinkError::Rdf {
            message: format!("failed to count triples: {e}"),
        })
    }

    /// Access the underlying store, e.g. for SPARQL queries.
    pub fn store(&self) -> &Store {
        &self.store
    }

    fn to_named_node(term: &RdfTerm, position: &str) -> Result<NamedNode, SinkError> {
        let iri = term.as_iri().ok_or_else(|| SinkError::Rdf {
            message: format!("{position} must be an IRI, got a literal"),
        })?;
        NamedNode::new(iri).map_err(|e| SinkError::Rdf {
            message: format!("invalid {position} IRI {iri}: {e}"),
        })
    }
}

impl TripleSink for RdfStoreSink {
    fn emit(&self, triple: &RdfTriple) -> Result<(), SinkError> {
        let subject = Self::to_named_node(&triple.subject, "subject")?;
        let predicate = Self::to_named_node(&triple.predicate, "predicate")?;
        let object: Term = match &triple.object {
            RdfTerm::Iri(_) => Self::to_named_node(&triple.object, "object")?.into(),
            RdfTerm::Literal(literal) => Literal::new_simple_literal(&literal.value).into(),
        };

        let quad = Quad::new(subject, predicate, object, GraphNameRef::DefaultGraph);
        self.store.insert(&quad).map_err(|e| SinkError::Rdf {
            message: format!("insert failed: {e}"),
        })?;
        Ok(())
    }
}

impl std::fmt::Debug for RdfStoreSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdfStoreSink").finish()
    }
}
