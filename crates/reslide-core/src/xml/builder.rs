use super::arena::XmlDocument;
use super::namespaces::XMLNS;
use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use crate::error::{ReslideError, Result};
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Cursor;

pub fn serialize(doc: &XmlDocument) -> Result<String> {
    let bytes = serialize_bytes(doc)?;
    String::from_utf8(bytes).map_err(|e| ReslideError::XmlWrite(e.to_string()))
}

pub fn serialize_bytes(doc: &XmlDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(write_error)?;

    if let Some(root_id) = doc.root() {
        let namespace_map = NamespaceMap::new();
        write_node(doc, root_id, &mut writer, &namespace_map)?;
    }

    Ok(writer.into_inner().into_inner())
}

/// Namespace URI to prefix, as declared by the enclosing elements.
type NamespaceMap = HashMap<String, String>;

fn write_error(e: impl std::fmt::Display) -> ReslideError {
    ReslideError::XmlWrite(e.to_string())
}

fn extend_namespace_map(namespace_map: &mut NamespaceMap, attributes: &[XAttribute]) {
    for attr in attributes.iter().filter(|a| a.is_namespace_declaration()) {
        if attr.name.namespace.is_none() {
            namespace_map.insert(attr.value.clone(), String::new());
        } else {
            namespace_map.insert(attr.value.clone(), attr.name.local_name.clone());
        }
    }
}

fn prefix_for_namespace<'a>(namespace: &str, namespace_map: &'a NamespaceMap) -> &'a str {
    if let Some(prefix) = namespace_map.get(namespace) {
        return prefix.as_str();
    }

    get_prefix(namespace)
}

fn prefix_for_attribute<'a>(namespace: &str, namespace_map: &'a NamespaceMap) -> &'a str {
    if namespace == XMLNS::NS {
        return "xmlns";
    }

    // Unprefixed attributes never take the default namespace.
    match namespace_map.get(namespace) {
        Some(prefix) if !prefix.is_empty() => prefix.as_str(),
        _ => get_prefix(namespace),
    }
}

fn qualified(prefix: &str, name: &XName) -> String {
    if prefix.is_empty() {
        name.local_name.clone()
    } else {
        format!("{}:{}", prefix, name.local_name)
    }
}

fn write_node<W: std::io::Write>(
    doc: &XmlDocument,
    node_id: indextree::NodeId,
    writer: &mut Writer<W>,
    namespace_map: &NamespaceMap,
) -> Result<()> {
    let Some(node_data) = doc.get(node_id) else {
        return Ok(());
    };

    match node_data {
        XmlNodeData::Element { name, attributes } => {
            write_element(doc, node_id, name, attributes, writer, namespace_map)?;
        }
        XmlNodeData::Text(text) => {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(write_error)?;
        }
        XmlNodeData::CData(text) => {
            writer
                .write_event(Event::CData(BytesCData::new(text)))
                .map_err(write_error)?;
        }
        XmlNodeData::Comment(text) => {
            writer
                .write_event(Event::Comment(BytesText::from_escaped(text)))
                .map_err(write_error)?;
        }
        XmlNodeData::ProcessingInstruction { target, data } => {
            let pi_content = if data.is_empty() {
                target.clone()
            } else {
                format!("{} {}", target, data)
            };
            writer
                .write_event(Event::PI(BytesPI::new(&pi_content)))
                .map_err(write_error)?;
        }
    }

    Ok(())
}

fn write_element<W: std::io::Write>(
    doc: &XmlDocument,
    node_id: indextree::NodeId,
    name: &XName,
    attributes: &[XAttribute],
    writer: &mut Writer<W>,
    namespace_map: &NamespaceMap,
) -> Result<()> {
    let mut scoped_map = namespace_map.clone();
    extend_namespace_map(&mut scoped_map, attributes);

    let tag_name = match &name.namespace {
        Some(ns) => qualified(prefix_for_namespace(ns, &scoped_map), name),
        None => name.local_name.clone(),
    };

    let mut elem = BytesStart::new(tag_name.as_str());

    for attr in attributes {
        let attr_name = match &attr.name.namespace {
            Some(ns) => qualified(prefix_for_attribute(ns, &scoped_map), &attr.name),
            None => attr.name.local_name.clone(),
        };
        elem.push_attribute(Attribute {
            key: QName(attr_name.as_bytes()),
            value: Cow::Owned(escape_attribute(&attr.value).into_owned().into_bytes()),
        });
    }

    let children: Vec<_> = doc.children(node_id).collect();

    if children.is_empty() {
        writer.write_event(Event::Empty(elem)).map_err(write_error)?;
    } else {
        writer.write_event(Event::Start(elem)).map_err(write_error)?;

        for child_id in children {
            write_node(doc, child_id, writer, &scoped_map)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(tag_name.as_str())))
            .map_err(write_error)?;
    }

    Ok(())
}

/// Markup escapes plus character references for whitespace, which a parser
/// would otherwise normalize to spaces inside attribute values.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\n', '\r', '\t']) {
        return escaped;
    }
    Cow::Owned(
        escaped
            .replace('\n', "&#xA;")
            .replace('\r', "&#xD;")
            .replace('\t', "&#x9;"),
    )
}

fn get_prefix(namespace: &str) -> &'static str {
    match namespace {
        // PresentationML
        "http://schemas.openxmlformats.org/presentationml/2006/main" => "p",
        "http://schemas.microsoft.com/office/powerpoint/2010/main" => "p14",
        "http://schemas.microsoft.com/office/powerpoint/2012/main" => "p15",
        // DrawingML
        "http://schemas.openxmlformats.org/drawingml/2006/main" => "a",
        "http://schemas.openxmlformats.org/drawingml/2006/picture" => "pic",
        "http://schemas.openxmlformats.org/drawingml/2006/chart" => "c",
        "http://schemas.openxmlformats.org/drawingml/2006/diagram" => "dgm",
        // Relationships
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships" => "r",
        // Markup Compatibility
        "http://schemas.openxmlformats.org/markup-compatibility/2006" => "mc",
        // xmlns namespace for namespace declarations (xmlns:mc="...", etc.)
        "http://www.w3.org/2000/xmlns/" => "xmlns",
        // xml namespace for xml:space, xml:lang, etc.
        "http://www.w3.org/XML/1998/namespace" => "xml",
        _ => "ns",
    }
}
