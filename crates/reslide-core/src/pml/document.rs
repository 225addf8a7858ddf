use crate::error::{ReslideError, Result};
use crate::package::parts::relative_target;
use crate::package::relationship_types::{OFFICE_DOCUMENT, SLIDE};
use crate::package::OoxmlPackage;
use crate::types::Diagnostic;
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData, P, P14, R};
use indextree::NodeId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use super::cloner::SlideCloner;
use super::planner::SlideStore;
use super::settings::RearrangeSettings;

const DEFAULT_PRESENTATION_PART: &str = "ppt/presentation.xml";
const FIRST_SLIDE_ID: u32 = 256;
const MAX_SLIDE_ID: u32 = 2_147_483_647;

/// One entry of the presentation's slide list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideEntry {
    pub slide_id: u32,
    pub r_id: String,
    pub part_name: String,
}

/// A PowerPoint deck: the package plus the live, ordered slide list.
///
/// The slide list is the source of truth while editing; `p:sldIdLst` is
/// rewritten from it when the document is serialized.
pub struct PmlDocument {
    package: OoxmlPackage,
    presentation_part: String,
    presentation: XmlDocument,
    slides: Vec<SlideEntry>,
    original_ids: Vec<u32>,
    settings: RearrangeSettings,
    diagnostics: Vec<Diagnostic>,
}

impl PmlDocument {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::with_settings(bytes, RearrangeSettings::default())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn with_settings(bytes: &[u8], settings: RearrangeSettings) -> Result<Self> {
        let package = OoxmlPackage::open(bytes)?;

        let presentation_part = package
            .relationships("")
            .and_then(|rels| rels.first_of_type(OFFICE_DOCUMENT))
            .and_then(|rel| package.resolve_target("", rel))
            .unwrap_or_else(|| DEFAULT_PRESENTATION_PART.to_string());
        if !package.has_part(&presentation_part) {
            return Err(ReslideError::missing_pml_part(&presentation_part));
        }

        let presentation = package.get_xml_part(&presentation_part)?;
        let slides = Self::read_slide_list(&package, &presentation_part, &presentation)?;
        let original_ids = slides.iter().map(|s| s.slide_id).collect();

        debug!(part = %presentation_part, slides = slides.len(), "loaded presentation");

        Ok(Self {
            package,
            presentation_part,
            presentation,
            slides,
            original_ids,
            settings,
            diagnostics: Vec::new(),
        })
    }

    fn read_slide_list(
        package: &OoxmlPackage,
        presentation_part: &str,
        presentation: &XmlDocument,
    ) -> Result<Vec<SlideEntry>> {
        let root = presentation.root().ok_or_else(|| ReslideError::InvalidPackage {
            message: format!("{} has no root element", presentation_part),
        })?;
        let Some(list) = presentation.first_child_named(root, &P::sldIdLst()) else {
            return Ok(Vec::new());
        };

        let rels = package.relationships(presentation_part);
        let mut slides = Vec::new();
        for node in presentation.elements_by_name(list, &P::sldId()) {
            let r_id = presentation.attribute(node, &R::id()).unwrap_or_default();
            let slide_id = presentation
                .attribute(node, &XName::local("id"))
                .and_then(|id| id.parse().ok())
                .ok_or_else(|| ReslideError::InvalidPackage {
                    message: format!("slide entry '{}' has no numeric id", r_id),
                })?;

            let rel = rels.and_then(|rels| rels.get(r_id)).ok_or_else(|| {
                ReslideError::UnresolvedRelationship {
                    part: presentation_part.to_string(),
                    relationship_id: r_id.to_string(),
                }
            })?;
            let part_name = package
                .resolve_target(presentation_part, rel)
                .unwrap_or_else(|| rel.target.clone());
            if !package.has_part(&part_name) {
                return Err(ReslideError::missing_pml_part(&part_name));
            }

            slides.push(SlideEntry {
                slide_id,
                r_id: r_id.to_string(),
                part_name,
            });
        }
        Ok(slides)
    }

    /// Serialize the deck, rewriting the slide list and dropping parts
    /// that became unreachable when orphan removal is enabled.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.write_slide_list()?;
        self.drop_stale_sections();
        self.package
            .put_xml_part(&self.presentation_part, &self.presentation)?;

        if self.settings.remove_orphaned_parts {
            let removed = self.package.remove_unreachable_parts();
            if !removed.is_empty() {
                debug!(count = removed.len(), "removed orphaned parts");
            }
        }

        self.package.save()
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[SlideEntry] {
        &self.slides
    }

    pub fn slide_part_name(&self, position: usize) -> Option<&str> {
        self.slides.get(position).map(|s| s.part_name.as_str())
    }

    pub fn presentation_part(&self) -> &str {
        &self.presentation_part
    }

    pub fn presentation(&self) -> &XmlDocument {
        &self.presentation
    }

    pub fn package(&self) -> &OoxmlPackage {
        &self.package
    }

    pub fn settings(&self) -> &RearrangeSettings {
        &self.settings
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.diagnostics.push(Diagnostic::warning(message));
    }

    fn check_position(&self, position: usize) -> Result<()> {
        if position < self.slides.len() {
            Ok(())
        } else {
            Err(ReslideError::IndexOutOfRange {
                index: position as i64,
                slide_count: self.slides.len(),
            })
        }
    }

    fn next_slide_id(&self) -> Result<u32> {
        let Some(max) = self.slides.iter().map(|s| s.slide_id).max() else {
            return Ok(FIRST_SLIDE_ID);
        };
        max.checked_add(1)
            .filter(|&id| id <= MAX_SLIDE_ID)
            .map(|id| id.max(FIRST_SLIDE_ID))
            .ok_or_else(|| ReslideError::InvalidPackage {
                message: format!("no slide id left above {}", max),
            })
    }

    fn write_slide_list(&mut self) -> Result<()> {
        let root = self.presentation.root().ok_or_else(|| ReslideError::InvalidPackage {
            message: format!("{} has no root element", self.presentation_part),
        })?;

        let list = match self.presentation.first_child_named(root, &P::sldIdLst()) {
            Some(list) => list,
            None if self.slides.is_empty() => return Ok(()),
            None => match self.presentation.first_child_named(root, &P::sldSz()) {
                Some(size) => self
                    .presentation
                    .add_before(size, XmlNodeData::element(P::sldIdLst())),
                None => self
                    .presentation
                    .add_child(root, XmlNodeData::element(P::sldIdLst())),
            },
        };

        let stale: Vec<NodeId> = self.presentation.children(list).collect();
        for node in stale {
            self.presentation.remove(node);
        }
        for slide in &self.slides {
            self.presentation.add_child(
                list,
                XmlNodeData::element_with_attrs(
                    P::sldId(),
                    vec![
                        XAttribute::new(XName::local("id"), &slide.slide_id.to_string()),
                        XAttribute::new(R::id(), &slide.r_id),
                    ],
                ),
            );
        }
        Ok(())
    }

    /// Sections name slides by id; once the id order changed they no longer
    /// describe the deck, so the whole section list goes.
    fn drop_stale_sections(&mut self) {
        let current: Vec<u32> = self.slides.iter().map(|s| s.slide_id).collect();
        if current == self.original_ids {
            return;
        }
        let Some(root) = self.presentation.root() else {
            return;
        };
        let Some(sections) = self.presentation.find_descendant(root, &P14::sectionLst()) else {
            return;
        };

        // the list sits inside a <p:ext uri="..."> wrapper
        let target = match self.presentation.parent(sections) {
            Some(parent) if self.presentation.name(parent) == Some(&P::ext()) => parent,
            _ => sections,
        };
        self.presentation.remove(target);
        self.original_ids = current;
        self.warn("Slide order changed; removed the presentation's section list".to_string());
    }

    /// Drop custom-show references to a presentation relationship.
    fn remove_custom_show_refs(&mut self, r_id: &str) {
        let Some(root) = self.presentation.root() else {
            return;
        };
        let Some(shows) = self.presentation.first_child_named(root, &P::custShowLst()) else {
            return;
        };

        let refs: Vec<(NodeId, String)> = self
            .presentation
            .descendants(shows)
            .filter(|&node| {
                self.presentation.name(node) == Some(&P::sld())
                    && self.presentation.attribute(node, &R::id()) == Some(r_id)
            })
            .map(|node| {
                let show = self
                    .presentation
                    .ancestors(node)
                    .find(|&a| self.presentation.name(a) == Some(&P::custShow()))
                    .and_then(|a| self.presentation.attribute(a, &XName::local("name")))
                    .unwrap_or_default()
                    .to_string();
                (node, show)
            })
            .collect();

        for (node, show) in refs {
            self.presentation.remove(node);
            self.warn(format!(
                "Removed a deleted slide from custom show '{}'",
                show
            ));
        }
    }
}

impl SlideStore for PmlDocument {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn clone_slide(&mut self, position: usize) -> Result<usize> {
        self.check_position(position)?;
        let source = self.slides[position].part_name.clone();
        let slide_id = self.next_slide_id()?;

        let new_part = SlideCloner::clone_slide_part(&mut self.package, &source, &self.settings)?;
        let target = relative_target(&self.presentation_part, &new_part);
        let r_id = self
            .package
            .relationships_mut(&self.presentation_part)
            .get_or_add(SLIDE, &target);

        debug!(source = %source, part = %new_part, slide_id, r_id = %r_id, "appended slide");
        self.slides.push(SlideEntry {
            slide_id,
            r_id,
            part_name: new_part,
        });
        Ok(self.slides.len() - 1)
    }

    fn remove_slide(&mut self, position: usize) -> Result<()> {
        self.check_position(position)?;
        let entry = self.slides.remove(position);

        self.package
            .relationships_mut(&self.presentation_part)
            .remove(&entry.r_id);
        self.remove_custom_show_refs(&entry.r_id);

        debug!(part = %entry.part_name, slide_id = entry.slide_id, "dropped slide");
        Ok(())
    }

    fn move_slide(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_position(from)?;
        self.check_position(to)?;
        let entry = self.slides.remove(from);
        self.slides.insert(to, entry);
        Ok(())
    }
}
