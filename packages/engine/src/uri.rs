//! FRBR URI parsing and rendering for Akoma Ntoso documents.
//!
//! Parses and constructs FRBR (work/expression/manifestation) identifiers
//! for legal documents, including their named sub-components.
//!
//! # Format
//!
//! ```text
//! [/prefix]/country[-locality]/doctype[/subtype[/actor]]/date/number
//!     [/language[@:expression-date]][/!work-component][~portion][.format]
//! ```
//!
//! Only the modern grammar with an explicit `!` component marker and
//! `~` portion marker is supported. The legacy component form without a
//! `!` marker is ambiguous and is rejected.
//!
//! # Examples
//!
//! ```
//! use akn_engine::FrbrUri;
//!
//! let uri = FrbrUri::parse("/akn/za-jhb/act/by-law/2003/public-health/eng:2015-01-01/!main~part_1.xml").unwrap();
//! assert_eq!(uri.country, "za");
//! assert_eq!(uri.locality.as_deref(), Some("jhb"));
//! assert_eq!(uri.subtype.as_deref(), Some("by-law"));
//! assert_eq!(uri.number, "public-health");
//! assert_eq!(uri.work_component.as_deref(), Some("main"));
//! assert_eq!(uri.portion.as_deref(), Some("part_1"));
//!
//! assert_eq!(uri.work_uri(false), "/akn/za-jhb/act/by-law/2003/public-health");
//! assert_eq!(
//!     uri.manifestation_uri(true).unwrap(),
//!     "/akn/za-jhb/act/by-law/2003/public-health/eng:2015-01-01/!main~part_1.xml"
//! );
//! ```

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::config::{
    validate_country, validate_language, validate_work_date, DEFAULT_LANGUAGE, DEFAULT_PREFIX,
};
use crate::error::{AknError, Result};

/// Grammar for FRBR URIs. Subtype and actor segments may not start with a
/// digit, which is what separates them from the numeric-leading date segment
/// that always follows. The work component is captured up to a `~` portion,
/// a `.` format or the end of the string, and may itself contain `/`
/// separators for nested components.
static FRBR_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^
          (/(?P<prefix>akn))?                            # optional 'akn' prefix
          /(?P<country>[a-z]{2})                         # country
          (-(?P<locality>[^/]+))?                        # locality code
          /(?P<doctype>[^/]+)                            # document type
          (/(?P<subtype>[^0-9][^/]*))?                   # subtype, no leading digit
          (/(?P<actor>[^0-9][^/]*))?                     # actor, no leading digit
          /(?P<date>[0-9]{4}(-[0-9]{2}(-[0-9]{2})?)?)    # date
          /(?P<number>[^/]+)                             # number
          (/
              (?P<language>[a-z]{3})                     # expression language
              (?P<expression_date>[@:][^/]*)?            # expression date
          )?
          (/
              (!(?P<work_component>[^~.]+?))?            # work component
              (~(?P<portion>[^.]+))?                     # portion
          )?
          (\.(?P<format>[a-z0-9]+))?                     # format extension
          $",
    )
    .expect("valid regex")
});

/// An FRBR URI for an Akoma Ntoso document, at up to three specificity
/// levels: work, expression and manifestation.
///
/// URIs are usually parsed from a string with [`FrbrUri::parse`], or built
/// with [`FrbrUriBuilder`]. Fields are public so that a URI can be adjusted
/// in place, which is how a work-level URI is turned into an expression or
/// manifestation URI. Invariants (two-letter country, three-letter language,
/// partial-date date field) are enforced at parse/build time only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrbrUri {
    /// Optional `akn` prefix.
    pub prefix: Option<String>,
    /// Two-letter country code.
    pub country: String,
    /// Locality within the country.
    pub locality: Option<String>,
    /// Document type (eg. `act`).
    pub doctype: String,
    /// Document subtype; never starts with a digit.
    pub subtype: Option<String>,
    /// Emanating actor; never starts with a digit.
    pub actor: Option<String>,
    /// Work date: YYYY, YYYY-MM or YYYY-MM-DD.
    pub date: String,
    /// Document number; non-empty.
    pub number: String,
    /// Name of the work component, eg. `schedule1` or `schedule1/schedule2`.
    pub work_component: Option<String>,
    /// Three-letter expression language code.
    pub language: Option<String>,
    /// Expression date: `@` or `:` followed by an optional partial date.
    /// A bare `@` is the earliest expression, `None` the most recent.
    pub expression_date: Option<String>,
    /// Portion (fragment) identifier, eg. a single section.
    pub portion: Option<String>,
    /// Manifestation format extension, eg. `xml` or `html`.
    pub format: Option<String>,
}

impl FrbrUri {
    /// Parse a string into an `FrbrUri`.
    ///
    /// Trailing slashes are ignored. The string must match the grammar from
    /// start to end.
    ///
    /// # Errors
    ///
    /// Returns `AknError::InvalidUri` carrying the offending string if it
    /// does not match the grammar.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim_end_matches('/');
        let caps = FRBR_URI_RE
            .captures(trimmed)
            .ok_or_else(|| AknError::InvalidUri(trimmed.to_string()))?;

        let group = |name: &str| caps.name(name).map(|m| m.as_str().to_string());

        Ok(Self {
            prefix: group("prefix"),
            country: group("country").unwrap_or_default(),
            locality: group("locality"),
            doctype: group("doctype").unwrap_or_default(),
            subtype: group("subtype"),
            actor: group("actor"),
            date: group("date").unwrap_or_default(),
            number: group("number").unwrap_or_default(),
            work_component: group("work_component"),
            language: group("language").or_else(|| Some(DEFAULT_LANGUAGE.to_string())),
            expression_date: group("expression_date"),
            portion: group("portion"),
            format: group("format"),
        })
    }

    /// The year, derived from the date.
    pub fn year(&self) -> &str {
        self.date.split('-').next().unwrap_or(&self.date)
    }

    /// Full place code: country plus locality, if any.
    pub fn place(&self) -> String {
        match &self.locality {
            Some(locality) => format!("{}-{}", self.country, locality),
            None => self.country.clone(),
        }
    }

    /// String form of the work URI, always excluding the work component.
    pub fn uri(&self) -> String {
        self.work_uri(false)
    }

    /// String form of the work URI.
    ///
    /// The work component suffix is included only when `with_component` is
    /// true and a work component is set.
    pub fn work_uri(&self, with_component: bool) -> String {
        let mut parts = vec![String::new()];

        if let Some(prefix) = &self.prefix {
            parts.push(prefix.clone());
        }

        parts.push(self.place());
        parts.push(self.doctype.clone());

        if let Some(subtype) = &self.subtype {
            parts.push(subtype.clone());
            if let Some(actor) = &self.actor {
                parts.push(actor.clone());
            }
        }

        parts.push(self.date.clone());
        parts.push(self.number.clone());

        if with_component {
            if let Some(component) = &self.work_component {
                parts.push(format!("!{component}"));
            }
        }

        parts.join("/")
    }

    /// String form of the expression URI.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingLanguage` if no language is set.
    pub fn expression_uri(&self, with_component: bool) -> Result<String> {
        let language = self.language.as_ref().ok_or(AknError::MissingLanguage)?;

        let mut uri = self.work_uri(false);
        uri.push('/');
        uri.push_str(language);

        if let Some(expression_date) = &self.expression_date {
            uri.push_str(expression_date);
        }

        let mut slashed = false;
        if with_component {
            if let Some(component) = &self.work_component {
                slashed = true;
                uri.push_str("/!");
                uri.push_str(component);
            }
        }

        if let Some(portion) = &self.portion {
            if !slashed {
                uri.push('/');
            }
            uri.push('~');
            uri.push_str(portion);
        }

        Ok(uri)
    }

    /// String form of the manifestation URI.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingLanguage` if no language is set.
    pub fn manifestation_uri(&self, with_component: bool) -> Result<String> {
        let mut uri = self.expression_uri(with_component)?;
        if let Some(format) = &self.format {
            uri.push('.');
            uri.push_str(format);
        }
        Ok(uri)
    }
}

impl fmt::Display for FrbrUri {
    /// The most specific URI form the fields allow: manifestation if a
    /// format is set, expression if an expression date or work component is
    /// set, work URI otherwise. Falls back to the work URI when no language
    /// is available for the more specific forms.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.language.is_some() {
            if self.format.is_some() {
                if let Ok(uri) = self.manifestation_uri(true) {
                    return write!(f, "{uri}");
                }
            }
            if self.expression_date.is_some() || self.work_component.is_some() {
                if let Ok(uri) = self.expression_uri(true) {
                    return write!(f, "{uri}");
                }
            }
        }
        write!(f, "{}", self.work_uri(true))
    }
}

impl FromStr for FrbrUri {
    type Err = AknError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for FrbrUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FrbrUri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Builder for constructing validated FRBR URIs directly, without going
/// through the string form.
///
/// The `akn` prefix and the `eng` language are applied by default.
///
/// # Examples
///
/// ```
/// use akn_engine::FrbrUriBuilder;
///
/// let uri = FrbrUriBuilder::new("za", "act", "2020", "31")
///     .locality("ec")
///     .subtype("by-law")
///     .build()
///     .unwrap();
/// assert_eq!(uri.work_uri(false), "/akn/za-ec/act/by-law/2020/31");
/// ```
#[derive(Debug, Clone)]
pub struct FrbrUriBuilder {
    prefix: Option<String>,
    country: String,
    locality: Option<String>,
    doctype: String,
    subtype: Option<String>,
    actor: Option<String>,
    date: String,
    number: String,
    work_component: Option<String>,
    language: Option<String>,
    expression_date: Option<String>,
    portion: Option<String>,
    format: Option<String>,
}

impl FrbrUriBuilder {
    /// Create a builder with the mandatory fields.
    pub fn new(
        country: impl Into<String>,
        doctype: impl Into<String>,
        date: impl Into<String>,
        number: impl Into<String>,
    ) -> Self {
        Self {
            prefix: Some(DEFAULT_PREFIX.to_string()),
            country: country.into(),
            locality: None,
            doctype: doctype.into(),
            subtype: None,
            actor: None,
            date: date.into(),
            number: number.into(),
            work_component: None,
            language: None,
            expression_date: None,
            portion: None,
            format: None,
        }
    }

    /// Set the locality code.
    pub fn locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = Some(locality.into());
        self
    }

    /// Set the document subtype.
    pub fn subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Set the emanating actor.
    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Set the work component name.
    pub fn work_component(mut self, component: impl Into<String>) -> Self {
        self.work_component = Some(component.into());
        self
    }

    /// Set the expression language.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the expression date, including its `@` or `:` marker.
    pub fn expression_date(mut self, expression_date: impl Into<String>) -> Self {
        self.expression_date = Some(expression_date.into());
        self
    }

    /// Set the portion identifier.
    pub fn portion(mut self, portion: impl Into<String>) -> Self {
        self.portion = Some(portion.into());
        self
    }

    /// Set the manifestation format.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Use a different URI prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Drop the URI prefix entirely.
    pub fn no_prefix(mut self) -> Self {
        self.prefix = None;
        self
    }

    /// Build the URI, validating all fields.
    ///
    /// # Errors
    ///
    /// Returns `AknError::InvalidField` if any field breaks its invariant.
    pub fn build(self) -> Result<FrbrUri> {
        validate_country(&self.country)?;
        validate_work_date(&self.date)?;

        if self.doctype.is_empty() {
            return Err(AknError::InvalidField {
                field: "doctype",
                value: self.doctype,
                expected: "a non-empty document type (e.g. act)",
            });
        }
        if self.number.is_empty() {
            return Err(AknError::InvalidField {
                field: "number",
                value: self.number,
                expected: "a non-empty document number",
            });
        }

        for (field, value) in [("subtype", &self.subtype), ("actor", &self.actor)] {
            if let Some(value) = value {
                if value.is_empty() || value.starts_with(|c: char| c.is_ascii_digit()) {
                    return Err(AknError::InvalidField {
                        field,
                        value: value.clone(),
                        expected: "a non-empty value not starting with a digit",
                    });
                }
            }
        }

        let language = self
            .language
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        validate_language(&language)?;

        if let Some(expression_date) = &self.expression_date {
            if !expression_date.starts_with('@') && !expression_date.starts_with(':') {
                return Err(AknError::InvalidField {
                    field: "expression_date",
                    value: expression_date.clone(),
                    expected: "a value starting with '@' or ':'",
                });
            }
        }

        Ok(FrbrUri {
            prefix: self.prefix,
            country: self.country,
            locality: self.locality,
            doctype: self.doctype,
            subtype: self.subtype,
            actor: self.actor,
            date: self.date,
            number: self.number,
            work_component: self.work_component,
            language: Some(language),
            expression_date: self.expression_date,
            portion: self.portion,
            format: self.format,
        })
    }
}
