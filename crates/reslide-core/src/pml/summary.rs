// Read-only view of a deck: what each slide holds, used by `info` and to
// compare slides across a rearrangement.

use crate::error::Result;
use crate::hash::sha256_hash_bytes;
use crate::package::relationship_types::SLIDE_LAYOUT;
use crate::package::OoxmlPackage;
use crate::xml::{XName, XmlDocument, A, P, R};
use indextree::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::document::PmlDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Shape,
    Picture,
    GraphicFrame,
    Group,
    Connector,
    ContentPart,
}

impl ShapeKind {
    fn from_name(name: &XName) -> Option<Self> {
        if !name.in_namespace(P::NS) {
            return None;
        }
        match name.local_name.as_str() {
            "sp" => Some(Self::Shape),
            "pic" => Some(Self::Picture),
            "graphicFrame" => Some(Self::GraphicFrame),
            "grpSp" => Some(Self::Group),
            "cxnSp" => Some(Self::Connector),
            "contentPart" => Some(Self::ContentPart),
            _ => None,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Shape => "shape",
            Self::Picture => "picture",
            Self::GraphicFrame => "graphic frame",
            Self::Group => "group",
            Self::Connector => "connector",
            Self::ContentPart => "content part",
        };
        f.write_str(name)
    }
}

/// Position and size in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transform {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeSummary {
    pub kind: ShapeKind,
    pub name: String,
    pub transform: Option<Transform>,
    /// Paragraphs joined by newlines.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaReference {
    pub relationship_id: String,
    pub target: String,
    pub external: bool,
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSummary {
    pub position: usize,
    pub slide_id: u32,
    pub part_name: String,
    pub layout: Option<String>,
    pub title: Option<String>,
    pub shapes: Vec<ShapeSummary>,
    pub media: Vec<MediaReference>,
}

impl SlideSummary {
    /// Same shapes and same media bytes, regardless of part names and ids.
    pub fn same_content(&self, other: &SlideSummary) -> bool {
        let digests = |s: &SlideSummary| -> Vec<Option<String>> {
            s.media.iter().map(|m| m.sha256.clone()).collect()
        };
        self.shapes == other.shapes && self.layout == other.layout && digests(self) == digests(other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSummary {
    pub slide_width: Option<i64>,
    pub slide_height: Option<i64>,
    pub slides: Vec<SlideSummary>,
}

impl DeckSummary {
    pub fn from_document(doc: &PmlDocument) -> Result<Self> {
        let presentation = doc.presentation();
        let size = presentation
            .root()
            .and_then(|root| presentation.first_child_named(root, &P::sldSz()));
        let dimension = |name: &str| -> Option<i64> {
            size.and_then(|node| presentation.attribute(node, &XName::local(name)))
                .and_then(|v| v.parse().ok())
        };

        let slides = doc
            .slides()
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                let mut slide = summarize_slide(doc.package(), &entry.part_name)?;
                slide.position = position;
                slide.slide_id = entry.slide_id;
                Ok(slide)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            slide_width: dimension("cx"),
            slide_height: dimension("cy"),
            slides,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for DeckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(w), Some(h)) = (self.slide_width, self.slide_height) {
            writeln!(f, "Slide size: {} x {} EMU", w, h)?;
        }
        write!(f, "{} slide(s)", self.slides.len())?;
        for slide in &self.slides {
            writeln!(f)?;
            write!(
                f,
                "\n[{}] {} (id {})",
                slide.position, slide.part_name, slide.slide_id
            )?;
            if let Some(title) = &slide.title {
                write!(f, " \"{}\"", title)?;
            }
            if let Some(layout) = &slide.layout {
                write!(f, "\n    layout: {}", layout)?;
            }
            for shape in &slide.shapes {
                write!(f, "\n    {} '{}'", shape.kind, shape.name)?;
                if let Some(t) = shape.transform {
                    write!(f, " at ({}, {}) size {}x{}", t.x, t.y, t.cx, t.cy)?;
                }
                if !shape.text.is_empty() {
                    write!(f, ": {}", shape.text.replace('\n', " / "))?;
                }
            }
            for media in &slide.media {
                write!(f, "\n    media {} -> {}", media.relationship_id, media.target)?;
                if let Some(digest) = &media.sha256 {
                    write!(f, " sha256:{}", &digest[..digest.len().min(12)])?;
                }
            }
        }
        Ok(())
    }
}

fn summarize_slide(package: &OoxmlPackage, part_name: &str) -> Result<SlideSummary> {
    let doc = package.get_xml_part(part_name)?;
    let rels = package.relationships(part_name);

    let layout = rels
        .and_then(|r| r.first_of_type(SLIDE_LAYOUT))
        .and_then(|rel| package.resolve_target(part_name, rel));

    let mut summary = SlideSummary {
        position: 0,
        slide_id: 0,
        part_name: part_name.to_string(),
        layout,
        title: None,
        shapes: Vec::new(),
        media: Vec::new(),
    };
    let Some(root) = doc.root() else {
        return Ok(summary);
    };

    if let Some(tree) = doc.find_descendant(root, &P::spTree()) {
        for node in doc.element_children(tree) {
            let Some(kind) = doc.name(node).and_then(ShapeKind::from_name) else {
                continue;
            };
            let shape = summarize_shape(&doc, node, kind);
            if summary.title.is_none() && is_title(&doc, node) {
                summary.title = Some(shape.text.clone());
            }
            summary.shapes.push(shape);
        }
    }

    let media_attrs = [R::embed(), R::link()];
    for node in doc.descendants(root) {
        for name in &media_attrs {
            let Some(id) = doc.attribute(node, name).filter(|id| !id.is_empty()) else {
                continue;
            };
            if summary.media.iter().any(|m| m.relationship_id == id) {
                continue;
            }
            let Some(rel) = rels.and_then(|r| r.get(id)) else {
                continue;
            };
            let sha256 = package
                .resolve_target(part_name, rel)
                .and_then(|target| package.get_part(&target))
                .map(sha256_hash_bytes);
            summary.media.push(MediaReference {
                relationship_id: id.to_string(),
                target: rel.target.clone(),
                external: rel.is_external(),
                sha256,
            });
        }
    }

    Ok(summary)
}

fn summarize_shape(doc: &XmlDocument, node: NodeId, kind: ShapeKind) -> ShapeSummary {
    let name = doc
        .find_descendant(node, &P::cNvPr())
        .and_then(|c| doc.attribute(c, &XName::local("name")))
        .unwrap_or_default()
        .to_string();

    let transform = doc.find_descendant(node, &A::xfrm()).map(|xfrm| {
        let value = |child: Option<NodeId>, attr: &str| -> i64 {
            child
                .and_then(|c| doc.attribute(c, &XName::local(attr)))
                .and_then(|v| v.parse().ok())
                .unwrap_or(0)
        };
        let off = doc.first_child_named(xfrm, &A::off());
        let ext = doc.first_child_named(xfrm, &A::ext());
        Transform {
            x: value(off, "x"),
            y: value(off, "y"),
            cx: value(ext, "cx"),
            cy: value(ext, "cy"),
        }
    });

    let text = doc
        .descendants(node)
        .filter(|&d| doc.name(d) == Some(&A::p()))
        .map(|p| doc.text_of(p))
        .collect::<Vec<_>>()
        .join("\n");

    ShapeSummary {
        kind,
        name,
        transform,
        text,
    }
}

fn is_title(doc: &XmlDocument, node: NodeId) -> bool {
    doc.find_descendant(node, &P::ph())
        .and_then(|ph| doc.attribute(ph, &XName::local("type")))
        .is_some_and(|t| t == "title" || t == "ctrTitle")
}
