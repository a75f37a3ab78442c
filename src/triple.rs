//! RDF triple representation produced by the RDF projection.
//!
//! Terms are plain data so emission stays deterministic and sink-agnostic;
//! the oxigraph adaptation lives in [`sink`](crate::sink). A literal keeps
//! its ordered fragments when a parts split was applied, so sinks can store
//! fragment forms under the declared storage alias.

use serde::{Deserialize, Serialize};

/// A literal term, possibly split into ordered fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdfLiteral {
    /// Recombined lexical form.
    pub value: String,
    /// Ordered fragments; a single element when no split was applied.
    pub fragments: Vec<String>,
    /// Storage alias governing fragment recombination, if declared.
    pub alias: Option<String>,
}

impl RdfLiteral {
    /// A plain, unsplit literal.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            fragments: vec![value.clone()],
            value,
            alias: None,
        }
    }
}

/// One position of a triple: an IRI or a literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RdfTerm {
    /// An IRI reference.
    Iri(String),
    /// A literal value.
    Literal(RdfLiteral),
}

impl RdfTerm {
    /// A plain literal term.
    pub fn literal(value: impl Into<String>) -> Self {
        RdfTerm::Literal(RdfLiteral::plain(value))
    }

    /// An IRI term.
    pub fn iri(value: impl Into<String>) -> Self {
        RdfTerm::Iri(value.into())
    }

    /// The IRI string, if this term is one.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            RdfTerm::Iri(iri) => Some(iri),
            RdfTerm::Literal(_) => None,
        }
    }

    /// The literal, if this term is one.
    pub fn as_literal(&self) -> Option<&RdfLiteral> {
        match self {
            RdfTerm::Iri(_) => None,
            RdfTerm::Literal(lit) => Some(lit),
        }
    }
}

impl std::fmt::Display for RdfTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RdfTerm::Iri(iri) => write!(f, "<{iri}>"),
            RdfTerm::Literal(lit) => write!(f, "\"{}\"", lit.value),
        }
    }
}

/// A subject-predicate-object statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdfTriple {
    /// Subject term (always an IRI in produced triples).
    pub subject: RdfTerm,
    /// Predicate term (always an IRI in produced triples).
    pub predicate: RdfTerm,
    /// Object term: literal or entity reference.
    pub object: RdfTerm,
}

impl RdfTriple {
    /// Create a triple.
    pub fn new(subject: RdfTerm, predicate: RdfTerm, object: RdfTerm) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl std::fmt::Display for RdfTriple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
