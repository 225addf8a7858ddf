use crate::error::{ReslideError, Result};
use crate::xml::XmlDocument;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::io::{Cursor, Read, Write};
use tracing::debug;
use zip::read::ZipArchive;
use zip::write::ZipWriter;
use zip::CompressionMethod;

use super::content_types::ContentTypes;
use super::parts::{rels_part_name, resolve_relative, source_of_rels_part};
use super::relationships::{Relationship, RelationshipSet};

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// An OPC package held entirely in memory.
///
/// Relationship parts and `[Content_Types].xml` are parsed on open and kept
/// as models; everything else stays as raw bytes keyed by part name.
pub struct OoxmlPackage {
    parts: HashMap<String, Vec<u8>>,
    content_types: ContentTypes,
    relationships: HashMap<String, RelationshipSet>,
}

impl OoxmlPackage {
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let cursor = Cursor::new(bytes);
        let mut archive = ZipArchive::new(cursor)?;

        let mut parts = HashMap::new();
        let mut relationships = HashMap::new();
        let mut content_types = None;

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().trim_start_matches('/').to_string();
            let mut content = Vec::new();
            file.read_to_end(&mut content)?;

            if name == CONTENT_TYPES_PART {
                content_types = Some(ContentTypes::parse(&content)?);
            } else if let Some(source) = source_of_rels_part(&name) {
                relationships.insert(source, RelationshipSet::parse(&content)?);
            } else {
                parts.insert(name, content);
            }
        }

        let content_types = content_types.ok_or_else(|| ReslideError::InvalidPackage {
            message: format!("missing {}", CONTENT_TYPES_PART),
        })?;

        debug!(
            parts = parts.len(),
            relationship_parts = relationships.len(),
            "opened package"
        );

        Ok(Self {
            parts,
            content_types,
            relationships,
        })
    }

    /// An empty package with default content types.
    pub fn new() -> Self {
        Self {
            parts: HashMap::new(),
            content_types: ContentTypes::new(),
            relationships: HashMap::new(),
        }
    }

    /// Serialize to zip bytes: content types first, then the package
    /// relationships, then every other part in name order.
    pub fn save(&self) -> Result<Vec<u8>> {
        let mut entries: Vec<(String, Vec<u8>)> = Vec::with_capacity(self.parts.len() + 8);
        for (source, set) in &self.relationships {
            if set.is_empty() {
                continue;
            }
            entries.push((rels_part_name(source), set.to_xml()?));
        }
        for (path, content) in &self.parts {
            entries.push((path.clone(), content.clone()));
        }
        entries.sort_by(|(a, _), (b, _)| {
            let root_rels = rels_part_name("");
            (a != &root_rels, a).cmp(&(b != &root_rels, b))
        });

        let mut buffer = Cursor::new(Vec::new());
        let mut writer = ZipWriter::new(&mut buffer);
        let options: zip::write::FileOptions<'_, ()> =
            zip::write::FileOptions::default().compression_method(CompressionMethod::Deflated);

        writer.start_file(CONTENT_TYPES_PART, options)?;
        writer.write_all(&self.content_types.to_xml()?)?;

        for (path, content) in &entries {
            writer.start_file(path.as_str(), options)?;
            writer.write_all(content)?;
        }

        writer.finish()?;
        Ok(buffer.into_inner())
    }

    pub fn has_part(&self, path: &str) -> bool {
        self.parts.contains_key(path)
    }

    pub fn get_part(&self, path: &str) -> Option<&[u8]> {
        self.parts.get(path).map(|v| v.as_slice())
    }

    pub fn get_xml_part(&self, path: &str) -> Result<XmlDocument> {
        let bytes = self.get_part(path).ok_or_else(|| ReslideError::MissingPart {
            part_path: path.to_string(),
            document_type: "OOXML".to_string(),
        })?;
        crate::xml::parser::parse_bytes(bytes)
    }

    pub fn set_part(&mut self, path: &str, content: Vec<u8>) {
        self.parts.insert(path.to_string(), content);
    }

    pub fn put_xml_part(&mut self, path: &str, doc: &XmlDocument) -> Result<()> {
        let bytes = crate::xml::builder::serialize_bytes(doc)?;
        self.set_part(path, bytes);
        Ok(())
    }

    /// Remove a part together with its relationships and content-type override.
    pub fn delete_part(&mut self, path: &str) {
        self.parts.remove(path);
        self.relationships.remove(path);
        self.content_types.remove_override(path);
    }

    pub fn relationships(&self, source: &str) -> Option<&RelationshipSet> {
        self.relationships.get(source)
    }

    pub fn relationships_mut(&mut self, source: &str) -> &mut RelationshipSet {
        self.relationships.entry(source.to_string()).or_default()
    }

    pub fn set_relationships(&mut self, source: &str, set: RelationshipSet) {
        self.relationships.insert(source.to_string(), set);
    }

    /// Part name an internal relationship of `source` points at; `None` for external links.
    ///
    /// Part names compare without regard to ASCII case, so a target spelled
    /// differently from the zip entry resolves to the stored name.
    pub fn resolve_target(&self, source: &str, rel: &Relationship) -> Option<String> {
        if rel.is_external() {
            return None;
        }
        let name = resolve_relative(source, &rel.target);
        if self.parts.contains_key(&name) {
            return Some(name);
        }
        let stored = self
            .parts
            .keys()
            .find(|part| part.eq_ignore_ascii_case(&name))
            .cloned();
        Some(stored.unwrap_or(name))
    }

    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    pub fn content_types_mut(&mut self) -> &mut ContentTypes {
        &mut self.content_types
    }

    pub fn get_content_type(&self, path: &str) -> Option<&str> {
        self.content_types.get_content_type(path)
    }

    pub fn part_names(&self) -> impl Iterator<Item = &String> {
        self.parts.keys()
    }

    /// Delete every part that can no longer be reached by following
    /// relationships from the package root. Returns the removed names, sorted.
    pub fn remove_unreachable_parts(&mut self) -> Vec<String> {
        let mut reachable: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::from([String::new()]);

        while let Some(source) = queue.pop_front() {
            let Some(set) = self.relationships.get(&source) else {
                continue;
            };
            for rel in set.iter() {
                let Some(target) = self.resolve_target(&source, rel) else {
                    continue;
                };
                if self.parts.contains_key(&target) && reachable.insert(target.clone()) {
                    queue.push_back(target);
                }
            }
        }

        let removed: BTreeSet<String> = self
            .parts
            .keys()
            .filter(|name| !reachable.contains(*name))
            .cloned()
            .collect();

        for name in &removed {
            debug!(part = %name, "removing unreachable part");
            self.delete_part(name);
        }
        self.relationships
            .retain(|source, _| source.is_empty() || reachable.contains(source));

        removed.into_iter().collect()
    }
}

impl Default for OoxmlPackage {
    fn default() -> Self {
        Self::new()
    }
}
