use crate::error::{ReslideError, Result};
use crate::package::content_type_values::POWERPOINT_SLIDE;
use crate::package::parts::directory_of;
use crate::package::relationship_types::{NOTES_SLIDE, SLIDE_LAYOUT};
use crate::package::relationships::is_media_relationship;
use crate::package::{OoxmlPackage, Relationship, RelationshipSet};
use crate::xml::{XName, XmlDocument, R};
use tracing::debug;

use super::settings::RearrangeSettings;

/// Copies slide parts inside a package.
///
/// The copy gets its own part, its own relationship table and a content-type
/// override. Registering it in the presentation is the caller's business.
pub struct SlideCloner;

impl SlideCloner {
    /// Duplicate `source_part`, returning the new part's name.
    pub fn clone_slide_part(
        package: &mut OoxmlPackage,
        source_part: &str,
        settings: &RearrangeSettings,
    ) -> Result<String> {
        // a fresh parse is already a deep copy
        let mut slide_doc = package.get_xml_part(source_part)?;
        let source_rels = package
            .relationships(source_part)
            .cloned()
            .unwrap_or_default();

        let new_part = Self::next_slide_part_name(package, source_part);
        let mut new_rels = RelationshipSet::new();

        let layout = source_rels.first_of_type(SLIDE_LAYOUT).ok_or_else(|| {
            ReslideError::missing_pml_part(&format!("slideLayout relationship of {}", source_part))
        })?;
        new_rels.get_or_add(SLIDE_LAYOUT, &layout.target);

        Self::repoint_references(&mut slide_doc, source_part, &source_rels, &mut new_rels)?;

        if settings.carry_unreferenced_media {
            for rel in source_rels.iter().filter(|r| is_media_relationship(&r.rel_type)) {
                Self::register(&mut new_rels, rel);
            }
        }

        package.put_xml_part(&new_part, &slide_doc)?;
        package.set_relationships(&new_part, new_rels);
        package
            .content_types_mut()
            .set_override(&new_part, POWERPOINT_SLIDE);

        debug!(source = %source_part, copy = %new_part, "cloned slide part");
        Ok(new_part)
    }

    /// Rewrite every `r:*` attribute of the copy to an id in `new_rels`.
    fn repoint_references(
        doc: &mut XmlDocument,
        source_part: &str,
        source_rels: &RelationshipSet,
        new_rels: &mut RelationshipSet,
    ) -> Result<()> {
        let Some(root) = doc.root() else {
            return Ok(());
        };

        let references: Vec<(indextree::NodeId, XName, String)> = doc
            .descendants(root)
            .filter_map(|node| Some((node, doc.get(node)?.attributes()?)))
            .flat_map(|(node, attrs)| {
                attrs
                    .iter()
                    .filter(|a| a.name.in_namespace(R::NS) && !a.value.is_empty())
                    .map(move |a| (node, a.name.clone(), a.value.clone()))
            })
            .collect();

        for (node, name, old_id) in references {
            let rel = source_rels.get(&old_id).ok_or_else(|| {
                ReslideError::UnresolvedRelationship {
                    part: source_part.to_string(),
                    relationship_id: old_id.clone(),
                }
            })?;
            if rel.rel_type == NOTES_SLIDE {
                doc.remove_attribute(node, &name);
                continue;
            }
            let new_id = Self::register(new_rels, rel);
            debug!(attribute = %name.local_name, from = %old_id, to = %new_id, "re-pointed reference");
            doc.set_attribute(node, &name, &new_id);
        }
        Ok(())
    }

    /// The copy lives in the source's directory, so relative targets carry over unchanged.
    fn register(new_rels: &mut RelationshipSet, rel: &Relationship) -> String {
        if rel.is_external() {
            new_rels.get_or_add_external(&rel.rel_type, &rel.target)
        } else {
            new_rels.get_or_add(&rel.rel_type, &rel.target)
        }
    }

    /// First free `slideN.xml` next to the source part.
    fn next_slide_part_name(package: &OoxmlPackage, source_part: &str) -> String {
        let dir = directory_of(source_part);
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir)
        };
        (1..)
            .map(|n| format!("{}slide{}.xml", prefix, n))
            .find(|name| !package.has_part(name))
            .unwrap_or_else(|| format!("{}slide0.xml", prefix))
    }
}
