//! Part-name arithmetic for OPC packages.
//!
//! Part names are zip entry names without a leading slash
//! (`ppt/slides/slide1.xml`). The package itself is the source `""`.

use std::borrow::Cow;

/// Name of the relationships part that belongs to `source`.
pub fn rels_part_name(source: &str) -> String {
    if source.is_empty() {
        return "_rels/.rels".to_string();
    }
    let dir = directory_of(source);
    let file = file_name_of(source);
    if dir.is_empty() {
        format!("_rels/{}.rels", file)
    } else {
        format!("{}/_rels/{}.rels", dir, file)
    }
}

/// Inverse of [`rels_part_name`]; `None` when `rels_part` is not a relationships part.
pub fn source_of_rels_part(rels_part: &str) -> Option<String> {
    let file = file_name_of(rels_part);
    let source_file = file.strip_suffix(".rels")?;
    let dir = directory_of(rels_part);

    let parent = if dir == "_rels" {
        ""
    } else {
        dir.strip_suffix("/_rels")?
    };

    if source_file.is_empty() {
        return parent.is_empty().then(String::new);
    }

    Some(if parent.is_empty() {
        source_file.to_string()
    } else {
        format!("{}/{}", parent, source_file)
    })
}

pub fn directory_of(part: &str) -> &str {
    part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

pub fn file_name_of(part: &str) -> &str {
    part.rsplit_once('/').map(|(_, file)| file).unwrap_or(part)
}

pub fn extension_of(part: &str) -> Option<&str> {
    file_name_of(part).rsplit_once('.').map(|(_, ext)| ext)
}

/// Resolve a relationship target written relative to `source` into a part name.
///
/// Targets are URIs, so `%20` and friends are decoded; zip entry names are not encoded.
pub fn resolve_relative(source: &str, target: &str) -> String {
    let target = target.split('#').next().unwrap_or(target);
    let target = urlencoding::decode(target).unwrap_or(Cow::Borrowed(target));
    if let Some(absolute) = target.strip_prefix('/') {
        return normalize(absolute);
    }

    let base = directory_of(source);
    if base.is_empty() {
        normalize(&target)
    } else {
        normalize(&format!("{}/{}", base, target))
    }
}

/// Relative reference from `source` to `target_part`, percent-encoded as written in `.rels` files.
pub fn relative_target(source: &str, target_part: &str) -> String {
    let from: Vec<&str> = directory_of(source)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let to: Vec<&str> = target_part.split('/').filter(|s| !s.is_empty()).collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<Cow<'_, str>> = std::iter::repeat(Cow::Borrowed(".."))
        .take(from.len() - common)
        .collect();
    segments.extend(to[common..].iter().map(|s| urlencoding::encode(s)));
    segments.join("/")
}

fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}
