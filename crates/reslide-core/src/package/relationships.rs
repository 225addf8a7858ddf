use crate::error::{ReslideError, Result};
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData, PKG_REL};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TargetMode {
    #[default]
    Internal,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    #[serde(default)]
    pub target_mode: TargetMode,
}

impl Relationship {
    pub fn new(id: &str, rel_type: &str, target: &str) -> Self {
        Self {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: TargetMode::Internal,
        }
    }

    pub fn external(id: &str, rel_type: &str, target: &str) -> Self {
        Self {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: TargetMode::External,
        }
    }

    pub fn is_external(&self) -> bool {
        self.target_mode == TargetMode::External
    }

    /// Same type, target and mode; the id is ignored.
    pub fn same_link(&self, other: &Relationship) -> bool {
        self.rel_type == other.rel_type
            && self.target == other.target
            && self.target_mode == other.target_mode
    }
}

/// The relationships of one source part, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipSet {
    rels: Vec<Relationship>,
}

impl RelationshipSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let doc = crate::xml::parser::parse_bytes(bytes)?;
        let Some(root) = doc.root() else {
            return Ok(Self::new());
        };

        let mut set = Self::new();
        for node in doc.elements_by_name(root, &PKG_REL::Relationship()) {
            let attr = |name: &str| doc.attribute(node, &XName::local(name));
            let (Some(id), Some(rel_type)) = (attr("Id"), attr("Type")) else {
                return Err(ReslideError::InvalidRelationship {
                    message: "Relationship element without Id or Type".to_string(),
                });
            };
            let target = attr("Target").unwrap_or_default();
            let rel = if attr("TargetMode") == Some("External") {
                Relationship::external(id, rel_type, target)
            } else {
                Relationship::new(id, rel_type, target)
            };
            set.rels.push(rel);
        }
        Ok(set)
    }

    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element_with_attrs(
            PKG_REL::Relationships(),
            vec![XAttribute::new(XName::local("xmlns"), PKG_REL::NS)],
        ));

        for rel in &self.rels {
            let mut attrs = vec![
                XAttribute::new(XName::local("Id"), &rel.id),
                XAttribute::new(XName::local("Type"), &rel.rel_type),
                XAttribute::new(XName::local("Target"), &rel.target),
            ];
            if rel.is_external() {
                attrs.push(XAttribute::new(XName::local("TargetMode"), "External"));
            }
            doc.add_child(
                root,
                XmlNodeData::element_with_attrs(PKG_REL::Relationship(), attrs),
            );
        }

        crate::xml::builder::serialize_bytes(&doc)
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    pub fn first_of_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.rels.iter().find(|r| r.rel_type == rel_type)
    }

    /// Add a relationship under a fresh id and return that id.
    pub fn add(&mut self, rel_type: &str, target: &str, mode: TargetMode) -> String {
        let id = self.next_id();
        self.rels.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: mode,
        });
        id
    }

    /// Id of an existing identical internal relationship, or of a newly added one.
    pub fn get_or_add(&mut self, rel_type: &str, target: &str) -> String {
        self.get_or_add_with_mode(rel_type, target, TargetMode::Internal)
    }

    pub fn get_or_add_external(&mut self, rel_type: &str, target: &str) -> String {
        self.get_or_add_with_mode(rel_type, target, TargetMode::External)
    }

    fn get_or_add_with_mode(&mut self, rel_type: &str, target: &str, mode: TargetMode) -> String {
        let existing = self
            .rels
            .iter()
            .find(|r| r.rel_type == rel_type && r.target == target && r.target_mode == mode);
        match existing {
            Some(rel) => rel.id.clone(),
            None => self.add(rel_type, target, mode),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Relationship> {
        let index = self.rels.iter().position(|r| r.id == id)?;
        Some(self.rels.remove(index))
    }

    /// Lowest unused id of the form `rIdN`, N starting at 1.
    pub fn next_id(&self) -> String {
        let mut used: Vec<u32> = self
            .rels
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId")?.parse().ok())
            .collect();
        used.sort_unstable();

        let mut next = 1u32;
        for n in used {
            match n.cmp(&next) {
                std::cmp::Ordering::Equal => next += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {}
            }
        }
        format!("rId{}", next)
    }
}

pub mod relationship_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const NOTES_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
    pub const COMMENTS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";
    pub const HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const AUDIO: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/audio";
    pub const VIDEO: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/video";
    pub const MEDIA: &str = "http://schemas.microsoft.com/office/2007/relationships/media";
    pub const CHART: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart";
}

/// Image, audio, video and generic media links.
pub fn is_media_relationship(rel_type: &str) -> bool {
    use relationship_types::*;
    matches!(rel_type, IMAGE | AUDIO | VIDEO | MEDIA)
        || rel_type.ends_with("/image")
        || rel_type.ends_with("/media")
}
