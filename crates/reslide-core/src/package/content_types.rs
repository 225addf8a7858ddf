use crate::error::Result;
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData, CT};
use std::collections::HashMap;

use super::parts::extension_of;

/// `[Content_Types].xml`: defaults by extension, overrides by part name.
///
/// Part names are given without the leading slash used on disk.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    pub fn new() -> Self {
        let mut defaults = HashMap::new();
        defaults.insert(
            "rels".to_string(),
            content_type_values::RELATIONSHIPS.to_string(),
        );
        defaults.insert("xml".to_string(), "application/xml".to_string());

        Self {
            defaults,
            overrides: HashMap::new(),
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let doc = crate::xml::parser::parse_bytes(bytes)?;
        let mut types = Self::default();
        let Some(root) = doc.root() else {
            return Ok(types);
        };

        let attr = |node, name: &str| doc.attribute(node, &XName::local(name));
        for node in doc.element_children(root) {
            let Some(content_type) = attr(node, "ContentType") else {
                continue;
            };
            match doc.name(node) {
                Some(name) if *name == CT::Default() => {
                    if let Some(ext) = attr(node, "Extension") {
                        types.add_default(ext, content_type);
                    }
                }
                Some(name) if *name == CT::Override() => {
                    if let Some(part) = attr(node, "PartName") {
                        types.set_override(part, content_type);
                    }
                }
                _ => {}
            }
        }
        Ok(types)
    }

    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element_with_attrs(
            CT::Types(),
            vec![XAttribute::new(XName::local("xmlns"), CT::NS)],
        ));

        let mut defaults: Vec<_> = self.defaults.iter().collect();
        defaults.sort();
        for (ext, content_type) in defaults {
            doc.add_child(
                root,
                XmlNodeData::element_with_attrs(
                    CT::Default(),
                    vec![
                        XAttribute::new(XName::local("Extension"), ext),
                        XAttribute::new(XName::local("ContentType"), content_type),
                    ],
                ),
            );
        }

        let mut overrides: Vec<_> = self.overrides.iter().collect();
        overrides.sort();
        for (part, content_type) in overrides {
            doc.add_child(
                root,
                XmlNodeData::element_with_attrs(
                    CT::Override(),
                    vec![
                        XAttribute::new(XName::local("PartName"), &format!("/{}", part)),
                        XAttribute::new(XName::local("ContentType"), content_type),
                    ],
                ),
            );
        }

        crate::xml::builder::serialize_bytes(&doc)
    }

    pub fn get_content_type(&self, path: &str) -> Option<&str> {
        let path = path.trim_start_matches('/');
        if let Some(ct) = self.overrides.get(path) {
            return Some(ct);
        }

        let ext = extension_of(path)?.to_ascii_lowercase();
        self.defaults.get(&ext).map(String::as_str)
    }

    pub fn has_override(&self, path: &str) -> bool {
        self.overrides.contains_key(path.trim_start_matches('/'))
    }

    pub fn set_override(&mut self, path: &str, content_type: &str) {
        self.overrides.insert(
            path.trim_start_matches('/').to_string(),
            content_type.to_string(),
        );
    }

    pub fn remove_override(&mut self, path: &str) -> Option<String> {
        self.overrides.remove(path.trim_start_matches('/'))
    }

    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        self.defaults
            .insert(extension.to_ascii_lowercase(), content_type.to_string());
    }
}

pub mod content_type_values {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const POWERPOINT_PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const POWERPOINT_SLIDE: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const POWERPOINT_SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const POWERPOINT_SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
}
