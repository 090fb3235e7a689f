//! Component resolution for Akoma Ntoso documents.
//!
//! A document is made up of a main body plus zero or more named
//! sub-documents (schedules and other attachments), each carrying its own
//! parallel identification metadata. The resolver walks the document tree
//! and produces the ordered set of components that identity propagation
//! operates on.
//!
//! Resolution is always computed fresh: the tree may have been mutated
//! since the last call, so nothing is cached.

use tracing::debug;

use crate::error::{AknError, Result};
use crate::uri::FrbrUri;
use crate::xml::{Element, Node};

/// A resolved component: its name and the node-index path of its document
/// element, relative to the main document element.
///
/// The main document itself is always the first entry, with an empty path.
/// Its name is `None` when its FRBRthis value carries no component suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentEntry {
    /// The component's name, eg. `schedule-A`; `None` for an unnamed main
    /// component.
    pub name: Option<String>,
    /// Node-index path from the main document element to the component's
    /// `doc` element.
    pub path: Vec<usize>,
}

/// Wrapper elements that embed a sub-document one level below the main
/// document element.
const WRAPPERS: [(&str, &str); 2] = [("attachments", "attachment"), ("components", "component")];

/// Resolve the ordered component set of a document.
///
/// The main document is registered first, under the component name from its
/// own `FRBRWork/FRBRthis` value. Then every `attachments/attachment/doc`
/// and `components/component/doc` sub-document is registered in document
/// order, exactly one level deep: wrappers nested inside a component's own
/// sub-document are not traversed.
///
/// # Errors
///
/// Returns `AknError::DuplicateComponent` if two components resolve to the
/// same name.
pub fn resolve_components(main: &Element) -> Result<Vec<ComponentEntry>> {
    let mut entries: Vec<ComponentEntry> = Vec::new();

    entries.push(ComponentEntry {
        name: frbr_this_component(main),
        path: Vec::new(),
    });

    for (wrapper_index, wrapper) in element_nodes(main) {
        let Some((_, item_tag)) = WRAPPERS.iter().find(|(tag, _)| *tag == wrapper.tag()) else {
            continue;
        };

        for (item_index, item) in element_nodes(wrapper) {
            if item.tag() != *item_tag {
                continue;
            }
            for (doc_index, doc) in element_nodes(item) {
                if doc.tag() != "doc" {
                    continue;
                }

                let name = component_name(doc);
                debug!(
                    name = name.as_deref().unwrap_or("(unnamed)"),
                    wrapper = wrapper.tag(),
                    "resolved component"
                );
                entries.push(ComponentEntry {
                    name,
                    path: vec![wrapper_index, item_index, doc_index],
                });
            }
        }
    }

    for (i, entry) in entries.iter().enumerate() {
        if entries[..i].iter().any(|other| other.name == entry.name) {
            return Err(AknError::DuplicateComponent(
                entry.name.clone().unwrap_or_else(|| "(unnamed)".to_string()),
            ));
        }
    }

    Ok(entries)
}

/// The name of a sub-document: the work component of its own
/// `FRBRWork/FRBRthis` value, falling back to the `doc` element's `name`
/// attribute when FRBRthis is absent, unparseable or component-less.
fn component_name(doc: &Element) -> Option<String> {
    frbr_this_component(doc).or_else(|| doc.attr("name").map(str::to_string))
}

/// The work component declared by an element's own `FRBRWork/FRBRthis`
/// value, if any.
fn frbr_this_component(doc: &Element) -> Option<String> {
    doc.at_path("meta/identification/FRBRWork/FRBRthis")
        .and_then(|this| this.attr("value"))
        .and_then(|value| FrbrUri::parse(value).ok())
        .and_then(|uri| uri.work_component)
}

/// Child elements of a node, paired with their raw node indices.
fn element_nodes(parent: &Element) -> impl Iterator<Item = (usize, &Element)> {
    parent.nodes().iter().enumerate().filter_map(|(i, node)| match node {
        Node::Element(el) => Some((i, el)),
        Node::Text(_) => None,
    })
}
