//! Error types for the AKN engine

use thiserror::Error;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum AknError {
    /// FRBR URI string does not match the identifier grammar
    #[error("Invalid FRBR URI: {0}")]
    InvalidUri(String),

    /// Expression or manifestation URI rendered without a language
    #[error("Expression URI requires a language")]
    MissingLanguage,

    /// Invalid field value when constructing a URI
    #[error("Invalid {field}: '{value}'. Expected {expected}")]
    InvalidField {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// XML parsing error
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Unexpected root element
    #[error("XML root element must be {expected}, but got {actual} instead")]
    UnexpectedRoot { expected: String, actual: String },

    /// Expected structural element is absent
    #[error("Missing required element: {element} in {context}")]
    MissingElement { element: String, context: String },

    /// Two components resolved to the same name
    #[error("Duplicate component name: {0}")]
    DuplicateComponent(String),

    /// The document's declared namespace is not a recognised Akoma Ntoso version
    #[error(
        "Expected to find one of the following Akoma Ntoso XML namespaces: {expected}. \
         Only these namespaces were found: {found}"
    )]
    UnknownNamespace { expected: String, found: String },

    /// Invalid date format
    #[error("Invalid date format: '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, AknError>;
