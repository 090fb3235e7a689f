//! Identity propagation across a document's components.
//!
//! Given a new top-level FRBR URI and a resolved component set, rewrites
//! every component's Work/Expression/Manifestation identification metadata
//! so the whole tree is internally consistent. Each component keeps its own
//! identity suffix (its work component name) while sharing the parent's
//! country, doctype, date, number, language and expression date.
//!
//! Writes are direct, field by field, in resolution order. A failure
//! partway through leaves earlier components updated and later ones
//! untouched; callers that need all-or-nothing semantics should snapshot
//! the tree and swap it on success.

use tracing::debug;

use crate::error::{AknError, Result};
use crate::resolver::ComponentEntry;
use crate::uri::FrbrUri;
use crate::xml::{Element, Placement};

/// Rewrite identification metadata for every resolved component of a
/// document.
///
/// For each entry, the component's identifier is the given `uri` with the
/// work component replaced by the entry's own name, or by
/// `default_component` for an unnamed entry. Running the same propagation
/// twice produces byte-identical metadata: existing elements are updated in
/// place and no duplicates are created.
///
/// # Errors
///
/// Returns `AknError::MissingLanguage` if `uri` carries no language, and
/// `AknError::MissingElement` if a component lacks an expected
/// identification container or leaf element.
pub fn propagate_identity(
    main: &mut Element,
    entries: &[ComponentEntry],
    uri: &FrbrUri,
    default_component: &str,
) -> Result<()> {
    for entry in entries {
        let mut component_uri = uri.clone();
        component_uri.work_component = Some(
            entry
                .name
                .clone()
                .unwrap_or_else(|| default_component.to_string()),
        );

        let name = component_uri.work_component.clone().unwrap_or_default();

        // render everything up front so a bad URI fails before any write
        // to this component
        let work_uri = component_uri.uri();
        let work_this = component_uri.work_uri(true);
        let expression_uri = component_uri.expression_uri(false)?;
        let expression_this = component_uri.expression_uri(true)?;

        let doc = main
            .node_at_path_mut(&entry.path)
            .ok_or_else(|| AknError::MissingElement {
                element: "doc".to_string(),
                context: format!("component '{name}'"),
            })?;
        let ident =
            doc.at_path_mut("meta/identification")
                .ok_or_else(|| AknError::MissingElement {
                    element: "meta/identification".to_string(),
                    context: format!("component '{name}'"),
                })?;

        set_value(ident, "FRBRWork/FRBRuri", "value", &work_uri, &name)?;
        set_value(ident, "FRBRWork/FRBRthis", "value", &work_this, &name)?;
        set_value(
            ident,
            "FRBRWork/FRBRcountry",
            "value",
            &component_uri.place(),
            &name,
        )?;
        set_value(ident, "FRBRWork/FRBRdate", "date", &component_uri.date, &name)?;

        let work = ident
            .find_mut("FRBRWork")
            .ok_or_else(|| AknError::MissingElement {
                element: "FRBRWork".to_string(),
                context: format!("component '{name}'"),
            })?;

        // subtype comes directly after the country; it is removed outright
        // when the new identifier has none
        match &component_uri.subtype {
            Some(subtype) => {
                work.ensure_child("FRBRsubtype", Placement::After("FRBRcountry"))
                    .set_attr("value", subtype.clone());
            }
            None => {
                work.remove_child("FRBRsubtype");
            }
        }

        // number follows the subtype when there is one, the country otherwise
        let number_after = if component_uri.subtype.is_some() {
            "FRBRsubtype"
        } else {
            "FRBRcountry"
        };
        work.ensure_child("FRBRnumber", Placement::After(number_after))
            .set_attr("value", component_uri.number.clone());

        set_value(ident, "FRBRExpression/FRBRuri", "value", &expression_uri, &name)?;
        set_value(ident, "FRBRExpression/FRBRthis", "value", &expression_this, &name)?;
        if let Some(language) = &component_uri.language {
            set_value(ident, "FRBRExpression/FRBRlanguage", "language", language, &name)?;
        }

        // the manifestation mirrors the expression; its date and author are
        // not part of this contract and are left untouched
        set_value(ident, "FRBRManifestation/FRBRuri", "value", &expression_uri, &name)?;
        set_value(ident, "FRBRManifestation/FRBRthis", "value", &expression_this, &name)?;

        debug!(component = %name, work_this = %work_this, "propagated identity");
    }

    Ok(())
}

/// Set an attribute on a required leaf element of the identification block.
fn set_value(
    ident: &mut Element,
    path: &str,
    attr: &str,
    value: &str,
    component: &str,
) -> Result<()> {
    let element = ident
        .at_path_mut(path)
        .ok_or_else(|| AknError::MissingElement {
            element: path.to_string(),
            context: format!("component '{component}'"),
        })?;
    element.set_attr(attr, value);
    Ok(())
}
