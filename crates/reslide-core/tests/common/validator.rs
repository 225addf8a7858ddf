//! Structural checks for PPTX packages.
//!
//! Enforced rules:
//!
//! 1. `[Content_Types].xml` and `_rels/.rels` exist.
//! 2. Every XML part is well-formed.
//! 3. Every internal relationship target exists.
//! 4. Every part has a content type, and every override names an existing part.
//! 5. Every non-empty `r:*` attribute of a slide resolves in that slide's own relationships.
//! 6. Slide ids are unique, at least 256, and point at slide relationships.

use roxmltree::Document;
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read};

const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const P_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    pub error_type: ValidationErrorType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErrorType {
    MissingPart,
    InvalidXml,
    BrokenRelationship,
    InvalidContentType,
    SlideList,
}

struct Rel {
    id: String,
    rel_type: String,
    target: String,
    external: bool,
}

pub fn validate_pptx(bytes: &[u8]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut error = |path: &str, message: String, error_type: ValidationErrorType| {
        errors.push(ValidationError {
            path: path.to_string(),
            message,
            error_type,
        });
    };

    let mut archive = match zip::ZipArchive::new(Cursor::new(bytes)) {
        Ok(a) => a,
        Err(e) => {
            error("", format!("Invalid ZIP archive: {}", e), ValidationErrorType::InvalidXml);
            return finish(errors);
        }
    };

    let mut parts: HashMap<String, Vec<u8>> = HashMap::new();
    for i in 0..archive.len() {
        let Ok(mut file) = archive.by_index(i) else {
            continue;
        };
        let mut content = Vec::new();
        if file.read_to_end(&mut content).is_ok() {
            parts.insert(file.name().to_string(), content);
        }
    }

    for required in ["[Content_Types].xml", "_rels/.rels"] {
        if !parts.contains_key(required) {
            error(required, format!("Missing {}", required), ValidationErrorType::MissingPart);
        }
    }

    for (name, content) in &parts {
        if name.ends_with(".xml") || name.ends_with(".rels") {
            let text = String::from_utf8_lossy(content);
            if let Err(e) = Document::parse(&text) {
                error(name, format!("Malformed XML: {}", e), ValidationErrorType::InvalidXml);
            }
        }
    }

    // relationships
    let mut all_rels: HashMap<String, Vec<Rel>> = HashMap::new();
    for (name, content) in &parts {
        let Some(source) = source_of_rels(name) else {
            continue;
        };
        let text = String::from_utf8_lossy(content);
        let Ok(doc) = Document::parse(&text) else {
            continue;
        };
        let rels: Vec<Rel> = doc
            .descendants()
            .filter(|n| n.has_tag_name("Relationship"))
            .map(|n| Rel {
                id: n.attribute("Id").unwrap_or_default().to_string(),
                rel_type: n.attribute("Type").unwrap_or_default().to_string(),
                target: n.attribute("Target").unwrap_or_default().to_string(),
                external: n.attribute("TargetMode") == Some("External"),
            })
            .collect();

        for rel in rels.iter().filter(|r| !r.external) {
            let target = resolve(&source, &rel.target);
            if !parts.contains_key(&target) {
                error(
                    name,
                    format!("{} points at missing part {}", rel.id, target),
                    ValidationErrorType::BrokenRelationship,
                );
            }
        }
        let mut seen = HashSet::new();
        for rel in &rels {
            if !seen.insert(rel.id.as_str()) {
                error(name, format!("Duplicate id {}", rel.id), ValidationErrorType::BrokenRelationship);
            }
        }
        all_rels.insert(source, rels);
    }

    // content types
    if let Some(content) = parts.get("[Content_Types].xml") {
        let text = String::from_utf8_lossy(content);
        if let Ok(doc) = Document::parse(&text) {
            let defaults: HashSet<String> = doc
                .descendants()
                .filter(|n| n.has_tag_name("Default"))
                .filter_map(|n| n.attribute("Extension"))
                .map(|e| e.to_ascii_lowercase())
                .collect();
            let overrides: HashSet<String> = doc
                .descendants()
                .filter(|n| n.has_tag_name("Override"))
                .filter_map(|n| n.attribute("PartName"))
                .map(|p| p.trim_start_matches('/').to_string())
                .collect();

            for part in &overrides {
                if !parts.contains_key(part) {
                    error(
                        part,
                        "Content-type override for a missing part".to_string(),
                        ValidationErrorType::InvalidContentType,
                    );
                }
            }
            for name in parts.keys().filter(|n| *n != "[Content_Types].xml") {
                let ext = name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
                let typed = overrides.contains(name)
                    || ext.is_some_and(|e| defaults.contains(&e));
                if !typed {
                    error(
                        name,
                        "Part has no content type".to_string(),
                        ValidationErrorType::InvalidContentType,
                    );
                }
            }
        }
    }

    // slide references
    for (name, content) in parts.iter().filter(|(n, _)| is_slide_part(n)) {
        let text = String::from_utf8_lossy(content);
        let Ok(doc) = Document::parse(&text) else {
            continue;
        };
        let ids: HashSet<&str> = all_rels
            .get(name)
            .map(|rels| rels.iter().map(|r| r.id.as_str()).collect())
            .unwrap_or_default();
        for node in doc.descendants().filter(|n| n.is_element()) {
            for attr in node.attributes() {
                if attr.namespace() == Some(R_NS) && !attr.value().is_empty() && !ids.contains(attr.value()) {
                    error(
                        name,
                        format!("r:{}=\"{}\" does not resolve", attr.name(), attr.value()),
                        ValidationErrorType::BrokenRelationship,
                    );
                }
            }
        }
    }

    // slide list
    if let Some(content) = parts.get("ppt/presentation.xml") {
        let text = String::from_utf8_lossy(content);
        if let Ok(doc) = Document::parse(&text) {
            let rels = all_rels.get("ppt/presentation.xml");
            let mut ids = HashSet::new();
            for node in doc.descendants().filter(|n| n.has_tag_name((P_NS, "sldId"))) {
                let id: u32 = node.attribute("id").and_then(|v| v.parse().ok()).unwrap_or(0);
                if id < 256 || !ids.insert(id) {
                    error("ppt/presentation.xml", format!("Bad slide id {}", id), ValidationErrorType::SlideList);
                }
                let r_id = node.attribute((R_NS, "id")).unwrap_or_default();
                let is_slide = rels
                    .and_then(|rels| rels.iter().find(|r| r.id == r_id))
                    .is_some_and(|r| r.rel_type == REL_SLIDE);
                if !is_slide {
                    error(
                        "ppt/presentation.xml",
                        format!("Slide entry {} does not point at a slide", r_id),
                        ValidationErrorType::SlideList,
                    );
                }
            }
        }
    }

    finish(errors)
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn assert_valid(bytes: &[u8]) {
    let result = validate_pptx(bytes);
    assert!(result.is_valid, "invalid package: {:#?}", result.errors);
}

fn is_slide_part(name: &str) -> bool {
    name.starts_with("ppt/slides/") && name.ends_with(".xml") && !name.contains("/_rels/")
}

fn source_of_rels(name: &str) -> Option<String> {
    if name == "_rels/.rels" {
        return Some(String::new());
    }
    let (dir, file) = name.rsplit_once("/_rels/")?;
    Some(format!("{}/{}", dir, file.strip_suffix(".rels")?))
}

fn resolve(source: &str, target: &str) -> String {
    let decoded = urlencoding::decode(target).map(|t| t.into_owned());
    let target = decoded.as_deref().unwrap_or(target);
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let base = source.rsplit_once('/').map(|(d, _)| d).unwrap_or("");
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for piece in target.split('/') {
        match piece {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
