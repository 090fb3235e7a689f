//! Akoma Ntoso document wrapper.
//!
//! A [`Document`] wraps a parsed Akoma Ntoso XML tree and gives typed
//! access to its identification and lifecycle metadata. Setting the
//! document's FRBR URI is the entry point for identity propagation: the
//! new identity is pushed into the main document and every attached
//! component in one pass.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::config::{AKN_NAMESPACES, DEFAULT_COMPONENT, DEFAULT_LANGUAGE, NULL_DATE};
use crate::error::{AknError, Result};
use crate::propagator::propagate_identity;
use crate::resolver::{resolve_components, ComponentEntry};
use crate::types::{DocumentKind, SourceRef};
use crate::uri::FrbrUri;
use crate::xml::{parse_document, Element, Node, Placement};

/// Render a date as an FRBR date string, or an empty string for `None`.
pub fn datestring(value: Option<NaiveDate>) -> String {
    match value {
        Some(date) => format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day()),
        None => String::new(),
    }
}

/// Parse an FRBR date string. Partial dates (`YYYY` or `YYYY-MM`) resolve
/// to the first day of the period.
///
/// # Errors
///
/// Returns `AknError::InvalidDate` if the string is not a valid date.
pub fn parsedate(value: &str) -> Result<NaiveDate> {
    let normalized = match value.len() {
        4 => format!("{value}-01-01"),
        7 => format!("{value}-01"),
        _ => value.to_string(),
    };
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .map_err(|_| AknError::InvalidDate(value.to_string()))
}

/// An event that amended a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmendmentEvent {
    /// Date of the amendment.
    pub date: NaiveDate,
    /// Title of the amending document.
    pub amending_title: Option<String>,
    /// FRBR URI of the amending document.
    pub amending_uri: Option<String>,
}

/// An event that repealed a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepealEvent {
    /// Date of the repeal.
    pub date: NaiveDate,
    /// Title of the repealing document.
    pub repealing_title: Option<String>,
    /// FRBR URI of the repealing document.
    pub repealing_uri: Option<String>,
}

/// A parsed Akoma Ntoso document: the main document element plus its
/// attached sub-documents, with typed access to identification metadata.
#[derive(Debug, Clone)]
pub struct Document {
    kind: DocumentKind,
    namespace: String,
    root: Element,
    main_index: usize,
    source: SourceRef,
}

impl Document {
    /// Parse an XML string as a document of the given kind.
    ///
    /// The root element must be `akomaNtoso`, the document must declare a
    /// recognised Akoma Ntoso namespace (3.0 preferred over 2.0), and the
    /// first element child of the root must match the document kind.
    ///
    /// # Errors
    ///
    /// Returns `AknError::XmlParse`, `AknError::UnexpectedRoot`,
    /// `AknError::UnknownNamespace` or `AknError::MissingElement`.
    pub fn parse(xml: &str, kind: DocumentKind) -> Result<Self> {
        let doc = Self::parse_any(xml)?;
        if doc.kind != kind {
            return Err(AknError::MissingElement {
                element: kind.element_name().to_string(),
                context: "root element".to_string(),
            });
        }
        Ok(doc)
    }

    /// Parse an XML string, inferring the document kind from the first
    /// element child of the root.
    ///
    /// # Errors
    ///
    /// As for [`Document::parse`]; an unrecognised document element is an
    /// `AknError::MissingElement`.
    pub fn parse_any(xml: &str) -> Result<Self> {
        let (root, declared) = parse_document(xml)?;

        if root.tag() != "akomaNtoso" {
            return Err(AknError::UnexpectedRoot {
                expected: "akomaNtoso".to_string(),
                actual: root.tag().to_string(),
            });
        }

        let namespace = AKN_NAMESPACES
            .iter()
            .find(|ns| declared.iter().any(|d| d == *ns))
            .map(|ns| (*ns).to_string())
            .ok_or_else(|| AknError::UnknownNamespace {
                expected: AKN_NAMESPACES.join(", "),
                found: declared.join(", "),
            })?;

        let main_index = root
            .nodes()
            .iter()
            .position(|node| matches!(node, Node::Element(_)))
            .ok_or_else(|| AknError::MissingElement {
                element: "document element".to_string(),
                context: "root element".to_string(),
            })?;

        let main_tag = match &root.nodes()[main_index] {
            Node::Element(el) => el.tag().to_string(),
            Node::Text(_) => unreachable!("position matched an element"),
        };
        let kind = DocumentKind::from_element_name(&main_tag).ok_or_else(|| {
            AknError::MissingElement {
                element: "a known document element".to_string(),
                context: format!("root element (found {main_tag})"),
            }
        })?;

        debug!(kind = ?kind, namespace = %namespace, "parsed document");

        Ok(Self {
            kind,
            namespace,
            root,
            main_index,
            source: SourceRef::default(),
        })
    }

    /// The document's kind.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// The Akoma Ntoso namespace this document uses.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The attribution used for metadata this engine creates.
    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    /// Replace the attribution used for metadata this engine creates.
    pub fn set_source(&mut self, source: SourceRef) {
        self.source = source;
    }

    /// The main document element (eg. `act`), the first element child of
    /// the root.
    pub fn main(&self) -> &Element {
        match self.root.nodes().get(self.main_index) {
            Some(Node::Element(el)) => el,
            _ => unreachable!("main element index is validated at parse time"),
        }
    }

    fn main_mut(&mut self) -> &mut Element {
        let index = self.main_index;
        match self.root.node_at_path_mut(&[index]) {
            Some(el) => el,
            None => unreachable!("main element index is validated at parse time"),
        }
    }

    /// The work-level FRBR URI that identifies this document.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingElement` if the identification metadata is
    /// absent, or `AknError::InvalidUri` if the stored value doesn't parse.
    pub fn frbr_uri(&self) -> Result<FrbrUri> {
        FrbrUri::parse(self.ident_value("FRBRWork/FRBRuri", "value")?)
    }

    /// The expression-level FRBR URI of this document.
    ///
    /// # Errors
    ///
    /// As for [`Document::frbr_uri`].
    pub fn expression_frbr_uri(&self) -> Result<FrbrUri> {
        FrbrUri::parse(self.ident_value("FRBRExpression/FRBRuri", "value")?)
    }

    /// Set the document's FRBR URI, rewriting the identification metadata
    /// of the main document and of every attached component.
    ///
    /// The URI's language and expression date are overridden by the
    /// document's current expression metadata. Components keep their own
    /// names; an unnamed main component takes the URI's work component, or
    /// `main` when the URI has none.
    ///
    /// # Errors
    ///
    /// Propagation errors from component resolution or metadata writes are
    /// returned unchanged; earlier components may already have been
    /// updated when that happens.
    pub fn set_frbr_uri(&mut self, uri: &FrbrUri) -> Result<()> {
        let mut uri = uri.clone();
        uri.language = Some(self.language());
        uri.expression_date = Some(format!("@{}", self.expression_date_string()));

        let default_component = uri
            .work_component
            .clone()
            .unwrap_or_else(|| DEFAULT_COMPONENT.to_string());

        let entries = self.components()?;
        propagate_identity(self.main_mut(), &entries, &uri, &default_component)
    }

    /// Resolve the ordered component set of this document. Computed fresh
    /// on every call.
    ///
    /// # Errors
    ///
    /// Returns `AknError::DuplicateComponent` if two components carry the
    /// same name.
    pub fn components(&self) -> Result<Vec<ComponentEntry>> {
        resolve_components(self.main())
    }

    /// The document's short title, from the FRBRWork alias.
    pub fn title(&self) -> Option<String> {
        self.main()
            .at_path("meta/identification/FRBRWork/FRBRalias")
            .and_then(|el| el.attr("value"))
            .map(str::to_string)
    }

    /// Set the document's short title.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingElement` if the work identification block
    /// is absent.
    pub fn set_title(&mut self, title: &str) -> Result<()> {
        let work = self
            .main_mut()
            .at_path_mut("meta/identification/FRBRWork")
            .ok_or_else(|| missing("FRBRWork", "meta/identification"))?;
        let alias = work.ensure_child("FRBRalias", Placement::After("FRBRuri"));
        alias.set_attr("value", title);
        alias.set_attr("name", "title");
        Ok(())
    }

    /// The three-letter expression language code, defaulting to `eng` when
    /// the document doesn't carry one.
    pub fn language(&self) -> String {
        self.main()
            .at_path("meta/identification/FRBRExpression/FRBRlanguage")
            .and_then(|el| el.attr("language"))
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string()
    }

    /// Set the expression language and re-propagate the document identity.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingElement` if the expression identification
    /// block is absent, or any propagation error.
    pub fn set_language(&mut self, language: &str) -> Result<()> {
        let element = self
            .main_mut()
            .at_path_mut("meta/identification/FRBRExpression/FRBRlanguage")
            .ok_or_else(|| missing("FRBRlanguage", "FRBRExpression"))?;
        element.set_attr("language", language);

        let uri = self.frbr_uri()?;
        self.set_frbr_uri(&uri)
    }

    /// The work date, from the FRBRWork date element. Partial dates
    /// resolve to the first day of the period.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingElement` or `AknError::InvalidDate`.
    pub fn work_date(&self) -> Result<NaiveDate> {
        parsedate(self.ident_value("FRBRWork/FRBRdate", "date")?)
    }

    /// The expression date.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingElement` or `AknError::InvalidDate`.
    pub fn expression_date(&self) -> Result<NaiveDate> {
        parsedate(self.ident_value("FRBRExpression/FRBRdate", "date")?)
    }

    /// Set the expression date on every component and re-propagate the
    /// document identity.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingElement` if a component lacks its
    /// expression identification block, or any propagation error.
    pub fn set_expression_date(&mut self, date: NaiveDate) -> Result<()> {
        self.set_component_dates("FRBRExpression", &datestring(Some(date)))?;

        let uri = self.frbr_uri()?;
        self.set_frbr_uri(&uri)
    }

    /// The manifestation date.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingElement` or `AknError::InvalidDate`.
    pub fn manifestation_date(&self) -> Result<NaiveDate> {
        parsedate(self.ident_value("FRBRManifestation/FRBRdate", "date")?)
    }

    /// Set the manifestation date on every component. Does not touch any
    /// URIs.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingElement` if a component lacks its
    /// manifestation identification block.
    pub fn set_manifestation_date(&mut self, date: NaiveDate) -> Result<()> {
        self.set_component_dates("FRBRManifestation", &datestring(Some(date)))
    }

    /// Write a date into the given identification container of every
    /// component.
    fn set_component_dates(&mut self, container: &str, value: &str) -> Result<()> {
        let entries = self.components()?;
        let path = format!("meta/identification/{container}/FRBRdate");
        let main = self.main_mut();

        for entry in &entries {
            let element = main
                .node_at_path_mut(&entry.path)
                .and_then(|doc| doc.at_path_mut(&path))
                .ok_or_else(|| missing("FRBRdate", container))?;
            element.set_attr("date", value);
        }
        Ok(())
    }

    /// Name of the publication this document appeared in.
    pub fn publication_name(&self) -> Option<String> {
        self.publication_attr("name")
    }

    /// Set the publication name, creating the publication element if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingElement` if the document has no `meta`
    /// element.
    pub fn set_publication_name(&mut self, name: &str) -> Result<()> {
        let publication = self.ensure_publication()?;
        publication.set_attr("name", name);
        publication.set_attr("showAs", name);
        Ok(())
    }

    /// Sequence number of the publication.
    pub fn publication_number(&self) -> Option<String> {
        self.publication_attr("number")
    }

    /// Set the publication number, creating the publication element if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingElement` if the document has no `meta`
    /// element.
    pub fn set_publication_number(&mut self, number: &str) -> Result<()> {
        self.ensure_publication()?.set_attr("number", number);
        Ok(())
    }

    /// Date of publication.
    ///
    /// # Errors
    ///
    /// Returns `AknError::InvalidDate` if the stored date doesn't parse.
    pub fn publication_date(&self) -> Result<Option<NaiveDate>> {
        match self.publication_attr("date") {
            Some(value) if !value.is_empty() && value != NULL_DATE => {
                parsedate(&value).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Set the publication date, creating the publication element if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingElement` if the document has no `meta`
    /// element.
    pub fn set_publication_date(&mut self, date: NaiveDate) -> Result<()> {
        self.ensure_publication()?
            .set_attr("date", datestring(Some(date)));
        Ok(())
    }

    /// The amendment events recorded in the document lifecycle, sorted by
    /// date.
    ///
    /// # Errors
    ///
    /// Returns `AknError::InvalidDate` if an event carries an unparseable
    /// date.
    pub fn amendments(&self) -> Result<Vec<AmendmentEvent>> {
        let mut events = Vec::new();

        for event_ref in self.lifecycle_events("amendment") {
            let date = parsedate(event_ref.attr("date").unwrap_or_default())?;
            let (title, uri) = self.passive_ref_details(event_ref.attr("source"));
            events.push(AmendmentEvent {
                date,
                amending_title: title,
                amending_uri: uri,
            });
        }

        events.sort_by_key(|event| event.date);
        Ok(events)
    }

    /// Replace the amendment events in the document lifecycle.
    ///
    /// An empty list clears the lifecycle of amendment events and drops the
    /// `contains` marker; otherwise the main element is marked as a
    /// `singleVersion` and one event plus passive reference is written per
    /// amendment.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingElement` if the document has no `meta`
    /// element.
    pub fn set_amendments(&mut self, events: &[AmendmentEvent]) -> Result<()> {
        let source = self.source.clone();
        self.remove_lifecycle_events("amendment")?;

        if events.is_empty() {
            // no amendments: originalVersion is the default and doesn't
            // need to be marked
            self.main_mut().remove_attr("contains");
            self.drop_empty_lifecycle()?;
            return Ok(());
        }

        self.main_mut().set_attr("contains", "singleVersion");

        let meta = self.meta_mut()?;
        ensure_lifecycle(meta, &source);
        let references = meta.ensure_child("references", Placement::After("lifecycle"));
        if references.attr("source").is_none() {
            references.set_attr("source", format!("#{}", source.id));
        }

        for (i, event) in events.iter().enumerate() {
            let date = datestring(Some(event.date));
            let reference = format!("amendment-{i}-source");

            let mut node = Element::new("eventRef");
            node.set_attr("eId", format!("amendment-{date}"));
            node.set_attr("date", date);
            node.set_attr("type", "amendment");
            node.set_attr("source", format!("#{reference}"));
            if let Some(lifecycle) = meta.find_mut("lifecycle") {
                lifecycle.push_child(node);
            }

            let mut passive = Element::new("passiveRef");
            passive.set_attr("eId", reference);
            passive.set_attr("href", event.amending_uri.clone().unwrap_or_default());
            passive.set_attr("showAs", event.amending_title.clone().unwrap_or_default());
            if let Some(references) = meta.find_mut("references") {
                references.push_child(passive);
            }
        }

        Ok(())
    }

    /// The repeal event recorded in the document lifecycle, if any.
    ///
    /// # Errors
    ///
    /// Returns `AknError::InvalidDate` if the event carries an unparseable
    /// date.
    pub fn repeal(&self) -> Result<Option<RepealEvent>> {
        let Some(event_ref) = self.lifecycle_events("repeal").into_iter().next() else {
            return Ok(None);
        };

        let date = parsedate(event_ref.attr("date").unwrap_or_default())?;
        let (title, uri) = self.passive_ref_details(event_ref.attr("source"));
        Ok(Some(RepealEvent {
            date,
            repealing_title: title,
            repealing_uri: uri,
        }))
    }

    /// Set or clear the repeal event in the document lifecycle.
    ///
    /// # Errors
    ///
    /// Returns `AknError::MissingElement` if the document has no `meta`
    /// element.
    pub fn set_repeal(&mut self, event: Option<&RepealEvent>) -> Result<()> {
        let source = self.source.clone();
        self.remove_lifecycle_events("repeal")?;

        let Some(event) = event else {
            self.drop_empty_lifecycle()?;
            return Ok(());
        };

        let meta = self.meta_mut()?;
        ensure_lifecycle(meta, &source);
        let references = meta.ensure_child("references", Placement::After("lifecycle"));
        if references.attr("source").is_none() {
            references.set_attr("source", format!("#{}", source.id));
        }

        let date = datestring(Some(event.date));
        let mut node = Element::new("eventRef");
        node.set_attr("eId", format!("repeal-{date}"));
        node.set_attr("date", date);
        node.set_attr("type", "repeal");
        node.set_attr("source", "#repeal-source");
        if let Some(lifecycle) = meta.find_mut("lifecycle") {
            lifecycle.push_child(node);
        }

        let mut passive = Element::new("passiveRef");
        passive.set_attr("eId", "repeal-source");
        passive.set_attr("href", event.repealing_uri.clone().unwrap_or_default());
        passive.set_attr("showAs", event.repealing_title.clone().unwrap_or_default());
        if let Some(references) = meta.find_mut("references") {
            references.push_child(passive);
        }

        Ok(())
    }

    /// Serialize the document to an XML string, with the document's
    /// namespace declared on the root element.
    pub fn to_xml(&self) -> String {
        let mut root = self.root.clone();
        if root.attr("xmlns").is_none() {
            root.set_attr("xmlns", self.namespace.clone());
        }
        root.to_xml()
    }

    fn meta_mut(&mut self) -> Result<&mut Element> {
        self.main_mut()
            .find_mut("meta")
            .ok_or_else(|| missing("meta", "document element"))
    }

    fn ident_value(&self, path: &str, attr: &str) -> Result<&str> {
        let full_path = format!("meta/identification/{path}");
        self.main()
            .at_path(&full_path)
            .and_then(|el| el.attr(attr))
            .ok_or_else(|| missing(path, "meta/identification"))
    }

    fn expression_date_string(&self) -> String {
        self.main()
            .at_path("meta/identification/FRBRExpression/FRBRdate")
            .and_then(|el| el.attr("date"))
            .unwrap_or_default()
            .to_string()
    }

    fn publication_attr(&self, attr: &str) -> Option<String> {
        self.main()
            .at_path("meta/publication")
            .and_then(|el| el.attr(attr))
            .map(str::to_string)
    }

    fn ensure_publication(&mut self) -> Result<&mut Element> {
        let meta = self.meta_mut()?;
        if meta.find("publication").is_none() {
            let publication = meta.ensure_child("publication", Placement::After("identification"));
            publication.set_attr("showAs", "");
            publication.set_attr("name", "");
            publication.set_attr("date", NULL_DATE);
        }
        Ok(meta.ensure_child("publication", Placement::After("identification")))
    }

    /// Lifecycle events of the given type, in document order.
    fn lifecycle_events(&self, event_type: &str) -> Vec<&Element> {
        self.main()
            .at_path("meta/lifecycle")
            .map(|lifecycle| {
                lifecycle
                    .find_all("eventRef")
                    .filter(|el| el.attr("type") == Some(event_type))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Title and href of the passive reference a lifecycle event points at.
    fn passive_ref_details(&self, source: Option<&str>) -> (Option<String>, Option<String>) {
        let Some(eid) = source.map(|s| s.trim_start_matches('#')) else {
            return (None, None);
        };

        let passive = self
            .main()
            .at_path("meta/references")
            .and_then(|refs| {
                refs.find_all("passiveRef")
                    .find(|el| el.attr("eId") == Some(eid))
            });

        match passive {
            Some(el) => (
                el.attr("showAs").map(str::to_string),
                el.attr("href").map(str::to_string),
            ),
            None => (None, None),
        }
    }

    /// Delete lifecycle events of the given type along with the passive
    /// references they point at.
    fn remove_lifecycle_events(&mut self, event_type: &str) -> Result<()> {
        let meta = self.meta_mut()?;

        let eids: Vec<String> = meta
            .find("lifecycle")
            .map(|lifecycle| {
                lifecycle
                    .find_all("eventRef")
                    .filter(|el| el.attr("type") == Some(event_type))
                    .filter_map(|el| el.attr("source"))
                    .map(|s| s.trim_start_matches('#').to_string())
                    .collect()
            })
            .unwrap_or_default();

        if let Some(references) = meta.find_mut("references") {
            references.retain_children(|el| {
                !(el.tag() == "passiveRef"
                    && el.attr("eId").is_some_and(|id| eids.iter().any(|e| e == id)))
            });
        }

        if let Some(lifecycle) = meta.find_mut("lifecycle") {
            lifecycle.retain_children(|el| {
                !(el.tag() == "eventRef" && el.attr("type") == Some(event_type))
            });
        }

        Ok(())
    }

    /// Remove the lifecycle element if it has no remaining events.
    fn drop_empty_lifecycle(&mut self) -> Result<()> {
        let meta = self.meta_mut()?;
        let empty = meta
            .find("lifecycle")
            .is_some_and(|lifecycle| lifecycle.children().count() == 0);
        if empty {
            meta.remove_child("lifecycle");
        }
        Ok(())
    }
}

/// Get or create the lifecycle element, placed after the publication
/// element if there is one, else after the identification block. A newly
/// sourced lifecycle also gains a `TLCOrganization` reference for the
/// attribution.
fn ensure_lifecycle(meta: &mut Element, source: &SourceRef) {
    let after = if meta.find("publication").is_some() {
        "publication"
    } else {
        "identification"
    };

    let lifecycle = meta.ensure_child("lifecycle", Placement::After(after));
    let needs_source = lifecycle.attr("source").is_none();
    if needs_source {
        lifecycle.set_attr("source", format!("#{}", source.id));
        ensure_reference(meta, "TLCOrganization", source);
    }
}

/// Ensure a reference element with the attribution's id exists in the
/// references block, inserting it first if it has to be created.
fn ensure_reference(meta: &mut Element, tag: &str, source: &SourceRef) {
    let references = meta.ensure_child("references", Placement::After("lifecycle"));

    let exists = references
        .find_all(tag)
        .any(|el| el.attr("eId") == Some(source.id.as_str()));
    if !exists {
        let mut reference = Element::new(tag);
        reference.set_attr("eId", source.id.clone());
        reference.set_attr("href", source.href.clone());
        reference.set_attr("showAs", source.name.clone());
        references.insert_child_first(reference);
    }
}

fn missing(element: &str, context: &str) -> AknError {
    AknError::MissingElement {
        element: element.to_string(),
        context: context.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACT_XML: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<akomaNtoso xmlns="http://docs.oasis-open.org/legaldocml/ns/akn/3.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <act contains="singleVersion" name="act">
    <meta>
      <identification source="#test">
        <FRBRWork>
          <FRBRthis value="/na/act/1977/25/!main"/>
          <FRBRuri value="/na/act/1977/25"/>
          <FRBRalias value="Livestock Improvement Act, 1977" name="title"/>
          <FRBRdate date="1977" name="Generation"/>
          <FRBRauthor href=""/>
          <FRBRcountry value="na"/>
          <FRBRnumber value="25"/>
        </FRBRWork>
        <FRBRExpression>
          <FRBRthis value="/na/act/1977/25/eng@1993-12-02/!main"/>
          <FRBRuri value="/na/act/1977/25/eng@1993-12-02"/>
          <FRBRdate date="1993-12-02" name="Generation"/>
          <FRBRauthor href=""/>
          <FRBRlanguage language="eng"/>
        </FRBRExpression>
        <FRBRManifestation>
          <FRBRthis value="/na/act/1977/25/eng@1993-12-02/!main"/>
          <FRBRuri value="/na/act/1977/25/eng@1993-12-02"/>
          <FRBRdate date="2020-03-25" name="Generation"/>
          <FRBRauthor href=""/>
        </FRBRManifestation>
      </identification>
    </meta>
    <body>
      <section eId="sec_1"><content><p/></content></section>
    </body>
  </act>
</akomaNtoso>"##;

    fn act() -> Document {
        Document::parse(ACT_XML, DocumentKind::Act).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        parsedate(s).unwrap()
    }

    mod parsing {
        use super::*;

        #[test]
        fn test_parse_act() {
            let doc = act();
            assert_eq!(doc.kind(), DocumentKind::Act);
            assert_eq!(
                doc.namespace(),
                "http://docs.oasis-open.org/legaldocml/ns/akn/3.0"
            );
            assert_eq!(doc.main().tag(), "act");
        }

        #[test]
        fn test_parse_any_infers_kind() {
            let doc = Document::parse_any(ACT_XML).unwrap();
            assert_eq!(doc.kind(), DocumentKind::Act);
        }

        #[test]
        fn test_wrong_root_element() {
            let err = Document::parse_any(
                r#"<myBlog xmlns="http://www.akomantoso.org/2.0"><p>Whaddup, fam!</p></myBlog>"#,
            )
            .unwrap_err();
            assert_eq!(
                err.to_string(),
                "XML root element must be akomaNtoso, but got myBlog instead"
            );
        }

        #[test]
        fn test_wrong_document_element() {
            let err = Document::parse(ACT_XML, DocumentKind::Judgment).unwrap_err();
            assert!(matches!(err, AknError::MissingElement { .. }));
        }

        #[test]
        fn test_empty_root() {
            let err = Document::parse_any(
                r#"<akomaNtoso xmlns="http://docs.oasis-open.org/legaldocml/ns/akn/3.0"></akomaNtoso>"#,
            )
            .unwrap_err();
            assert!(matches!(err, AknError::MissingElement { .. }));
        }

        #[test]
        fn test_comments_before_document_element() {
            let doc = Document::parse_any(
                r#"<akomaNtoso xmlns="http://docs.oasis-open.org/legaldocml/ns/akn/3.0">
                     <!-- a comment -->
                     <act><meta>
                       <identification><FRBRWork><FRBRthis value="/na/act/1977/25"/></FRBRWork></identification>
                     </meta><body/></act>
                   </akomaNtoso>"#,
            )
            .unwrap();
            assert_eq!(doc.kind(), DocumentKind::Act);
        }

        #[test]
        fn test_prefers_akn3_namespace() {
            let doc = Document::parse_any(
                r#"<foo:akomaNtoso xmlns:foo="http://www.akomantoso.org/2.0"
                                   xmlns:bar="http://docs.oasis-open.org/legaldocml/ns/akn/3.0">
                     <foo:act><foo:meta/><foo:body/></foo:act>
                   </foo:akomaNtoso>"#,
            )
            .unwrap();
            assert_eq!(
                doc.namespace(),
                "http://docs.oasis-open.org/legaldocml/ns/akn/3.0"
            );
        }

        #[test]
        fn test_accepts_akn2_namespace() {
            let doc = Document::parse_any(
                r#"<akomaNtoso xmlns="http://www.akomantoso.org/2.0">
                     <act><meta/><body/></act>
                   </akomaNtoso>"#,
            )
            .unwrap();
            assert_eq!(doc.namespace(), "http://www.akomantoso.org/2.0");
        }

        #[test]
        fn test_unknown_namespace_rejected() {
            let err = Document::parse_any(
                r#"<akomaNtoso xmlns="http://www.akomantoso.org/4.0">
                     <act><meta/><body/></act>
                   </akomaNtoso>"#,
            )
            .unwrap_err();
            match err {
                AknError::UnknownNamespace { found, .. } => {
                    assert!(found.contains("http://www.akomantoso.org/4.0"));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    mod identification {
        use super::*;

        #[test]
        fn test_frbr_uri() {
            let doc = act();
            assert_eq!(doc.frbr_uri().unwrap().work_uri(false), "/na/act/1977/25");
            assert_eq!(
                doc.expression_frbr_uri().unwrap().expression_uri(false).unwrap(),
                "/na/act/1977/25/eng@1993-12-02"
            );
        }

        #[test]
        fn test_set_frbr_uri_updates_identification() {
            let mut doc = act();
            let uri = FrbrUri::parse("/zm/act/2007/01").unwrap();
            doc.set_frbr_uri(&uri).unwrap();

            let ident = doc.main().at_path("meta/identification").unwrap();
            let value = |path: &str, attr: &str| {
                ident.at_path(path).and_then(|el| el.attr(attr)).map(str::to_string)
            };

            assert_eq!(
                value("FRBRWork/FRBRthis", "value").as_deref(),
                Some("/zm/act/2007/01/!main")
            );
            assert_eq!(
                value("FRBRWork/FRBRuri", "value").as_deref(),
                Some("/zm/act/2007/01")
            );
            assert_eq!(value("FRBRWork/FRBRcountry", "value").as_deref(), Some("zm"));
            assert_eq!(value("FRBRWork/FRBRdate", "date").as_deref(), Some("2007"));
            assert_eq!(value("FRBRWork/FRBRnumber", "value").as_deref(), Some("01"));

            // language and expression date come from the document itself
            assert_eq!(
                value("FRBRExpression/FRBRthis", "value").as_deref(),
                Some("/zm/act/2007/01/eng@1993-12-02/!main")
            );
            assert_eq!(
                value("FRBRManifestation/FRBRuri", "value").as_deref(),
                Some("/zm/act/2007/01/eng@1993-12-02")
            );
        }

        #[test]
        fn test_set_frbr_uri_adds_and_removes_subtype() {
            let mut doc = act();

            doc.set_frbr_uri(&FrbrUri::parse("/akn/za/act/by-law/2009/1").unwrap())
                .unwrap();
            assert_eq!(
                doc.main()
                    .at_path("meta/identification/FRBRWork/FRBRsubtype")
                    .and_then(|el| el.attr("value")),
                Some("by-law")
            );

            doc.set_frbr_uri(&FrbrUri::parse("/akn/za/act/2009/1").unwrap())
                .unwrap();
            assert!(doc
                .main()
                .at_path("meta/identification/FRBRWork/FRBRsubtype")
                .is_none());
        }

        #[test]
        fn test_language_setter_repropagates() {
            let mut doc = act();
            doc.set_language("swa").unwrap();

            assert_eq!(doc.language(), "swa");
            assert_eq!(
                doc.expression_frbr_uri().unwrap().expression_uri(false).unwrap(),
                "/na/act/1977/25/swa@1993-12-02"
            );
        }

        #[test]
        fn test_expression_date_setter_repropagates() {
            let mut doc = act();
            doc.set_expression_date(date("2021-01-01")).unwrap();

            assert_eq!(doc.expression_date().unwrap(), date("2021-01-01"));
            assert_eq!(
                doc.expression_frbr_uri().unwrap().expression_uri(false).unwrap(),
                "/na/act/1977/25/eng@2021-01-01"
            );
        }

        #[test]
        fn test_manifestation_date_setter_leaves_uris_alone() {
            let mut doc = act();
            doc.set_manifestation_date(date("2021-01-01")).unwrap();

            assert_eq!(doc.manifestation_date().unwrap(), date("2021-01-01"));
            assert_eq!(
                doc.main()
                    .at_path("meta/identification/FRBRManifestation/FRBRuri")
                    .and_then(|el| el.attr("value")),
                Some("/na/act/1977/25/eng@1993-12-02")
            );
        }

        #[test]
        fn test_work_date_partial() {
            let doc = act();
            assert_eq!(doc.work_date().unwrap(), date("1977-01-01"));
        }

        #[test]
        fn test_title() {
            let mut doc = act();
            assert_eq!(doc.title().as_deref(), Some("Livestock Improvement Act, 1977"));

            doc.set_title("A new title").unwrap();
            assert_eq!(doc.title().as_deref(), Some("A new title"));
        }
    }

    mod publication {
        use super::*;

        #[test]
        fn test_publication_created_on_demand() {
            let mut doc = act();
            assert_eq!(doc.publication_name(), None);

            doc.set_publication_name("Government Gazette").unwrap();
            doc.set_publication_number("5462").unwrap();
            doc.set_publication_date(date("1977-03-23")).unwrap();

            assert_eq!(doc.publication_name().as_deref(), Some("Government Gazette"));
            assert_eq!(doc.publication_number().as_deref(), Some("5462"));
            assert_eq!(doc.publication_date().unwrap(), Some(date("1977-03-23")));

            // placed directly after the identification block
            let meta = doc.main().find("meta").unwrap();
            let tags: Vec<_> = meta.children().map(Element::tag).collect();
            assert_eq!(tags, vec!["identification", "publication"]);
        }

        #[test]
        fn test_empty_publication_date_is_none() {
            let mut doc = act();
            doc.set_publication_name("Gazette").unwrap();
            assert_eq!(doc.publication_date().unwrap(), None);
        }
    }

    mod lifecycle {
        use super::*;

        fn amendment(date_str: &str, title: &str, uri: &str) -> AmendmentEvent {
            AmendmentEvent {
                date: date(date_str),
                amending_title: Some(title.to_string()),
                amending_uri: Some(uri.to_string()),
            }
        }

        #[test]
        fn test_set_and_get_amendments() {
            let mut doc = act();
            doc.set_amendments(&[
                amendment("1998-03-01", "Amendment Act 1998", "/na/act/1998/2"),
                amendment("1993-12-02", "Amendment Act 1993", "/na/act/1993/8"),
            ])
            .unwrap();

            let events = doc.amendments().unwrap();
            assert_eq!(events.len(), 2);
            // sorted by date
            assert_eq!(events[0].date, date("1993-12-02"));
            assert_eq!(events[0].amending_title.as_deref(), Some("Amendment Act 1993"));
            assert_eq!(events[0].amending_uri.as_deref(), Some("/na/act/1993/8"));
            assert_eq!(events[1].date, date("1998-03-01"));

            assert_eq!(doc.main().attr("contains"), Some("singleVersion"));
        }

        #[test]
        fn test_amendments_create_lifecycle_and_references() {
            let mut doc = act();
            doc.set_amendments(&[amendment("1998-03-01", "Amendment Act", "/na/act/1998/2")])
                .unwrap();

            let meta = doc.main().find("meta").unwrap();
            let lifecycle = meta.find("lifecycle").unwrap();
            assert_eq!(lifecycle.attr("source"), Some("#akn-engine"));

            let references = meta.find("references").unwrap();
            let org = references.find("TLCOrganization").unwrap();
            assert_eq!(org.attr("eId"), Some("akn-engine"));
            assert_eq!(org.attr("showAs"), Some("akn-engine"));

            let passive = references.find("passiveRef").unwrap();
            assert_eq!(passive.attr("eId"), Some("amendment-0-source"));
            assert_eq!(passive.attr("href"), Some("/na/act/1998/2"));
        }

        #[test]
        fn test_replacing_amendments_leaves_no_duplicates() {
            let mut doc = act();
            doc.set_amendments(&[amendment("1998-03-01", "First", "/na/act/1998/2")])
                .unwrap();
            doc.set_amendments(&[amendment("2001-06-15", "Second", "/na/act/2001/5")])
                .unwrap();

            let events = doc.amendments().unwrap();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].amending_title.as_deref(), Some("Second"));

            let references = doc.main().at_path("meta/references").unwrap();
            assert_eq!(references.find_all("passiveRef").count(), 1);
        }

        #[test]
        fn test_clearing_amendments_removes_lifecycle() {
            let mut doc = act();
            doc.set_amendments(&[amendment("1998-03-01", "First", "/na/act/1998/2")])
                .unwrap();
            doc.set_amendments(&[]).unwrap();

            assert!(doc.amendments().unwrap().is_empty());
            assert!(doc.main().at_path("meta/lifecycle").is_none());
            assert_eq!(doc.main().attr("contains"), None);
        }

        #[test]
        fn test_set_and_clear_repeal() {
            let mut doc = act();
            let event = RepealEvent {
                date: date("2010-01-01"),
                repealing_title: Some("Repealing Act".to_string()),
                repealing_uri: Some("/na/act/2010/1".to_string()),
            };

            doc.set_repeal(Some(&event)).unwrap();
            let read = doc.repeal().unwrap().unwrap();
            assert_eq!(read, event);

            doc.set_repeal(None).unwrap();
            assert!(doc.repeal().unwrap().is_none());
            assert!(doc.main().at_path("meta/lifecycle").is_none());
        }

        #[test]
        fn test_repeal_and_amendments_coexist() {
            let mut doc = act();
            doc.set_amendments(&[amendment("1998-03-01", "First", "/na/act/1998/2")])
                .unwrap();
            doc.set_repeal(Some(&RepealEvent {
                date: date("2010-01-01"),
                repealing_title: None,
                repealing_uri: None,
            }))
            .unwrap();

            // clearing the repeal keeps the amendment events
            doc.set_repeal(None).unwrap();
            assert_eq!(doc.amendments().unwrap().len(), 1);
            assert!(doc.main().at_path("meta/lifecycle").is_some());
        }
    }

    mod dates {
        use super::*;

        #[test]
        fn test_datestring() {
            assert_eq!(datestring(None), "");
            assert_eq!(datestring(Some(date("1977-03-23"))), "1977-03-23");
        }

        #[test]
        fn test_parsedate_partials() {
            assert_eq!(parsedate("2009").unwrap(), date("2009-01-01"));
            assert_eq!(parsedate("2009-06").unwrap(), date("2009-06-01"));
            assert_eq!(parsedate("2012-01-02").unwrap(), date("2012-01-02"));
            assert!(parsedate("not-a-date").is_err());
            assert!(parsedate("").is_err());
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn test_to_xml_declares_namespace() {
            let doc = act();
            assert!(doc
                .to_xml()
                .contains("xmlns=\"http://docs.oasis-open.org/legaldocml/ns/akn/3.0\""));
        }

        #[test]
        fn test_to_xml_round_trips() {
            let doc = act();
            let xml = doc.to_xml();
            let again = Document::parse(&xml, DocumentKind::Act).unwrap();
            assert_eq!(again.frbr_uri().unwrap(), doc.frbr_uri().unwrap());
        }
    }
}
