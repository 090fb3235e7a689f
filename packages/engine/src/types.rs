//! Core types for the AKN engine

use serde::{Deserialize, Serialize};

/// Structural families of Akoma Ntoso documents.
///
/// Every document kind belongs to exactly one structure, which fixes the
/// name of its main content element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StructureType {
    AmendmentStructure,
    CollectionStructure,
    DebateStructure,
    HierarchicalStructure,
    JudgmentStructure,
    OpenStructure,
    PortionStructure,
}

impl StructureType {
    /// Name of the structure's main content element.
    pub fn main_content_tag(&self) -> &'static str {
        match self {
            StructureType::AmendmentStructure => "amendmentBody",
            StructureType::CollectionStructure => "collectionBody",
            StructureType::DebateStructure => "debateBody",
            StructureType::HierarchicalStructure => "body",
            StructureType::JudgmentStructure => "judgmentBody",
            StructureType::OpenStructure => "mainBody",
            StructureType::PortionStructure => "portionBody",
        }
    }
}

/// The known Akoma Ntoso document kinds, keyed by their primary document
/// element name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    Act,
    Amendment,
    AmendmentList,
    Bill,
    Debate,
    DebateReport,
    Doc,
    DocumentCollection,
    Judgment,
    OfficialGazette,
    Portion,
    Statement,
}

impl DocumentKind {
    /// Name of the primary document XML element for this kind.
    pub fn element_name(&self) -> &'static str {
        match self {
            DocumentKind::Act => "act",
            DocumentKind::Amendment => "amendment",
            DocumentKind::AmendmentList => "amendmentList",
            DocumentKind::Bill => "bill",
            DocumentKind::Debate => "debate",
            DocumentKind::DebateReport => "debateReport",
            DocumentKind::Doc => "doc",
            DocumentKind::DocumentCollection => "documentCollection",
            DocumentKind::Judgment => "judgment",
            DocumentKind::OfficialGazette => "officialGazette",
            DocumentKind::Portion => "portion",
            DocumentKind::Statement => "statement",
        }
    }

    /// The structural family this kind belongs to.
    pub fn structure_type(&self) -> StructureType {
        match self {
            DocumentKind::Act | DocumentKind::Bill => StructureType::HierarchicalStructure,
            DocumentKind::Amendment => StructureType::AmendmentStructure,
            DocumentKind::AmendmentList
            | DocumentKind::DocumentCollection
            | DocumentKind::OfficialGazette => StructureType::CollectionStructure,
            DocumentKind::Debate => StructureType::DebateStructure,
            DocumentKind::DebateReport | DocumentKind::Doc | DocumentKind::Statement => {
                StructureType::OpenStructure
            }
            DocumentKind::Judgment => StructureType::JudgmentStructure,
            DocumentKind::Portion => StructureType::PortionStructure,
        }
    }

    /// Name of this kind's main content element.
    pub fn main_content_tag(&self) -> &'static str {
        self.structure_type().main_content_tag()
    }

    /// Look up a kind by its document element name.
    pub fn from_element_name(name: &str) -> Option<Self> {
        match name {
            "act" => Some(DocumentKind::Act),
            "amendment" => Some(DocumentKind::Amendment),
            "amendmentList" => Some(DocumentKind::AmendmentList),
            "bill" => Some(DocumentKind::Bill),
            "debate" => Some(DocumentKind::Debate),
            "debateReport" => Some(DocumentKind::DebateReport),
            "doc" => Some(DocumentKind::Doc),
            "documentCollection" => Some(DocumentKind::DocumentCollection),
            "judgment" => Some(DocumentKind::Judgment),
            "officialGazette" => Some(DocumentKind::OfficialGazette),
            "portion" => Some(DocumentKind::Portion),
            "statement" => Some(DocumentKind::Statement),
            _ => None,
        }
    }
}

/// Attribution for metadata this engine creates or maintains, used as the
/// `source` of identification and lifecycle elements.
///
/// The engine treats this as an opaque (name, id, href) triple and attaches
/// it verbatim where required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Human-readable name, used for `showAs` attributes.
    pub name: String,
    /// Element id referenced as `#id` from `source` attributes.
    pub id: String,
    /// Link to the organisation or tool.
    pub href: String,
}

impl SourceRef {
    /// Create a source reference.
    pub fn new(name: impl Into<String>, id: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            href: href.into(),
        }
    }
}

impl Default for SourceRef {
    fn default() -> Self {
        Self::new(
            "akn-engine",
            "akn-engine",
            "https://github.com/laws-africa/akn-engine",
        )
    }
}
