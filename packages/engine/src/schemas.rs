//! Schema validation boundary.
//!
//! Full schema validation is left to an external validator; this module
//! defines the boundary it plugs into: the namespace-to-schema mapping and
//! the outcome shape, plus the structural constants of the Akoma Ntoso 3.0
//! schema that callers need.

use serde::Serialize;

use crate::config::{AKN_NAMESPACE_20, AKN_NAMESPACE_30};
use crate::document::Document;

/// Schema file for each recognised namespace.
pub const SCHEMAS: [(&str, &str); 2] = [
    (AKN_NAMESPACE_30, "akomantoso30.xsd"),
    (AKN_NAMESPACE_20, "akomantoso20.xsd"),
];

/// The schema file name for a namespace, if the namespace is recognised.
pub fn schema_for_namespace(namespace: &str) -> Option<&'static str> {
    SCHEMAS
        .iter()
        .find(|(ns, _)| *ns == namespace)
        .map(|(_, file)| *file)
}

/// Result of validating a document against its schema.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    /// Whether the document validates.
    pub valid: bool,
    /// Validation error messages, empty when the document validates.
    pub errors: Vec<String>,
}

/// External schema validator. Implementations receive a finished document
/// (typically after identity propagation) and validate it against the
/// schema for its namespace.
pub trait SchemaValidator {
    /// Validate a document, returning pass/fail plus an error list.
    fn validate(&self, document: &Document) -> ValidationOutcome;
}

/// Structural constants of the Akoma Ntoso 3.0 schema.
pub struct AkomaNtoso30;

impl AkomaNtoso30 {
    /// Hierarchical container elements.
    pub const HIER_ELEMENTS: [&'static str; 27] = [
        "alinea",
        "article",
        "book",
        "chapter",
        "clause",
        "division",
        "indent",
        "level",
        "list",
        "paragraph",
        "part",
        "point",
        "proviso",
        "rule",
        "section",
        "subchapter",
        "subclause",
        "subdivision",
        "sublist",
        "subparagraph",
        "subpart",
        "subrule",
        "subsection",
        "subtitle",
        "title",
        "tome",
        "transitional",
    ];
}
