//! # seshat
//!
//! The indexing/projection layer of a metadata-aggregation platform: walks a
//! stored entity-relation graph and projects each entity into flat search
//! documents or RDF triples, driven entirely by declarative per-entity-type
//! mapping configuration.
//!
//! ## Architecture
//!
//! - **Mapping configuration** (`config`): typed tree, two dialects (flat and
//!   RDF) sharing one grammar, loaded from TOML and immutable after load
//! - **Filter registry** (`filter`): named, pluggable reducers over
//!   multi-valued fields
//! - **Relation index** (`relation_index`): per-call grouping of an entity's
//!   relations by type name
//! - **Mapping engine** (`engine`): traversal and the two projection
//!   strategies
//! - **Sinks** (`sink`): consumers of produced documents and triples,
//!   including an oxigraph-backed RDF store
//!
//! ## Library usage
//!
//! ```no_run
//! use seshat::config::load::MappingDocument;
//! use seshat::engine::MappingEngine;
//! use seshat::store::MemoryStore;
//!
//! let document = MappingDocument::load(std::path::Path::new("mappings.toml")).unwrap();
//! let engine = MappingEngine::from_document(document);
//! let store = MemoryStore::new();
//! # let entity = seshat::entity::Entity::new(
//! #     seshat::entity::EntityId::new(1).unwrap(),
//! #     seshat::entity::EntityTypeId(1),
//! # );
//! let target = engine.project(&entity, &store).unwrap();
//! ```

pub mod config;
pub mod document;
pub mod engine;
pub mod entity;
pub mod error;
pub mod filter;
pub mod relation_index;
pub mod sink;
pub mod store;
pub mod temporal;
pub mod triple;
pub mod validate;
