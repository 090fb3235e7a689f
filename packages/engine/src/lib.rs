//! AKN Engine
//!
//! A Rust implementation of FRBR identity management for Akoma Ntoso
//! legal documents. This library provides functionality for:
//! - Parsing and rendering FRBR work/expression/manifestation URIs
//! - Resolving the named components (schedules, attachments) of a document
//! - Propagating a new identity across a document and all of its components
//!
//! # Example
//!
//! ```ignore
//! use akn_engine::{Document, DocumentKind, FrbrUri};
//!
//! let mut doc = Document::parse(&xml, DocumentKind::Act)?;
//! let uri = FrbrUri::parse("/akn/za/act/by-law/2009/1")?;
//!
//! // rewrites the Work/Expression/Manifestation identification of the
//! // main document and of every schedule and attachment
//! doc.set_frbr_uri(&uri)?;
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod propagator;
pub mod resolver;
pub mod schemas;
pub mod types;
pub mod uri;
pub mod xml;

// Re-export commonly used items
pub use document::{datestring, parsedate, AmendmentEvent, Document, RepealEvent};
pub use error::{AknError, Result};
pub use propagator::propagate_identity;
pub use resolver::{resolve_components, ComponentEntry};
pub use schemas::{schema_for_namespace, SchemaValidator, ValidationOutcome};
pub use types::{DocumentKind, SourceRef, StructureType};
pub use uri::{FrbrUri, FrbrUriBuilder};
pub use xml::{Element, Placement};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
