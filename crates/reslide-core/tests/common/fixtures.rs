//! Synthetic PPTX decks for tests and benches.
//!
//! Every slide carries a title placeholder whose text is the slide's label,
//! so slide order can be read back through `DeckSummary`.

use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use reslide_core::{DeckSummary, PmlDocument};

const NS_DECL: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument.presentationml";

/// Bytes of the shared picture; any content works, nothing decodes it.
pub const IMAGE_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3, 4];

#[derive(Debug, Clone, Default)]
pub struct FixtureSlide {
    pub label: String,
    pub picture: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DeckBuilder {
    slides: Vec<FixtureSlide>,
    sections: bool,
    custom_show: Option<Vec<usize>>,
}

impl DeckBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slide(mut self, label: &str) -> Self {
        self.slides.push(FixtureSlide {
            label: label.to_string(),
            ..Default::default()
        });
        self
    }

    pub fn picture_slide(mut self, label: &str) -> Self {
        self.slides.push(FixtureSlide {
            label: label.to_string(),
            picture: true,
            ..Default::default()
        });
        self
    }

    pub fn slide_with_notes(mut self, label: &str, notes: &str) -> Self {
        self.slides.push(FixtureSlide {
            label: label.to_string(),
            notes: Some(notes.to_string()),
            ..Default::default()
        });
        self
    }

    /// One section holding every slide.
    pub fn with_sections(mut self) -> Self {
        self.sections = true;
        self
    }

    /// A custom show listing the slides at `positions`.
    pub fn with_custom_show(mut self, positions: &[usize]) -> Self {
        self.custom_show = Some(positions.to_vec());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut parts: Vec<(String, String)> = Vec::new();
        let has_notes = self.slides.iter().any(|s| s.notes.is_some());
        let has_picture = self.slides.iter().any(|s| s.picture);

        parts.push(("[Content_Types].xml".into(), self.content_types(has_picture)));
        parts.push((
            "_rels/.rels".into(),
            rels(&[("rId1", "officeDocument", "ppt/presentation.xml")]),
        ));
        parts.push(("ppt/presentation.xml".into(), self.presentation(has_notes)));
        parts.push((
            "ppt/_rels/presentation.xml.rels".into(),
            self.presentation_rels(has_notes),
        ));

        parts.push(("ppt/slideMasters/slideMaster1.xml".into(), slide_master()));
        parts.push((
            "ppt/slideMasters/_rels/slideMaster1.xml.rels".into(),
            rels(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
        ));
        parts.push(("ppt/slideLayouts/slideLayout1.xml".into(), slide_layout()));
        parts.push((
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels".into(),
            rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
        ));
        if has_notes {
            parts.push((
                "ppt/notesMasters/notesMaster1.xml".into(),
                format!(
                    r#"<p:notesMaster {}><p:cSld><p:spTree>{}</p:spTree></p:cSld><p:clrMap {}/></p:notesMaster>"#,
                    NS_DECL,
                    group_props(),
                    CLR_MAP
                ),
            ));
        }

        for (i, fixture) in self.slides.iter().enumerate() {
            let n = i + 1;
            parts.push((format!("ppt/slides/slide{}.xml", n), slide_xml(i, fixture)));

            let mut slide_rels = vec![(
                "rId1".to_string(),
                "slideLayout",
                "../slideLayouts/slideLayout1.xml".to_string(),
            )];
            if fixture.picture {
                slide_rels.push(("rId2".into(), "image", "../media/image1.png".into()));
            }
            if let Some(notes) = &fixture.notes {
                slide_rels.push((
                    "rId3".into(),
                    "notesSlide",
                    format!("../notesSlides/notesSlide{}.xml", n),
                ));
                parts.push((
                    format!("ppt/notesSlides/notesSlide{}.xml", n),
                    notes_xml(notes),
                ));
                parts.push((
                    format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", n),
                    rels(&[
                        ("rId1", "notesMaster", "../notesMasters/notesMaster1.xml"),
                        ("rId2", "slide", &format!("../slides/slide{}.xml", n)),
                    ]),
                ));
            }
            let slide_rels: Vec<(&str, &str, &str)> = slide_rels
                .iter()
                .map(|(id, ty, target)| (id.as_str(), *ty, target.as_str()))
                .collect();
            parts.push((
                format!("ppt/slides/_rels/slide{}.xml.rels", n),
                rels(&slide_rels),
            ));
        }

        let mut buffer = Cursor::new(Vec::new());
        let mut writer = ZipWriter::new(&mut buffer);
        let options: FileOptions<'_, ()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, content) in &parts {
            writer.start_file(name.as_str(), options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        if has_picture {
            writer.start_file("ppt/media/image1.png", options).unwrap();
            writer.write_all(IMAGE_BYTES).unwrap();
        }
        writer.finish().unwrap();
        buffer.into_inner()
    }

    fn content_types(&self, has_picture: bool) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#,
        );
        if has_picture {
            xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
        }
        let mut overrides = vec![
            ("/ppt/presentation.xml".to_string(), "presentation.main"),
            ("/ppt/slideMasters/slideMaster1.xml".to_string(), "slideMaster"),
            ("/ppt/slideLayouts/slideLayout1.xml".to_string(), "slideLayout"),
        ];
        if self.slides.iter().any(|s| s.notes.is_some()) {
            overrides.push(("/ppt/notesMasters/notesMaster1.xml".into(), "notesMaster"));
        }
        for (i, fixture) in self.slides.iter().enumerate() {
            overrides.push((format!("/ppt/slides/slide{}.xml", i + 1), "slide"));
            if fixture.notes.is_some() {
                overrides.push((format!("/ppt/notesSlides/notesSlide{}.xml", i + 1), "notesSlide"));
            }
        }
        for (part, kind) in overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}.{}+xml"/>"#,
                part, CT_BASE, kind
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn presentation(&self, has_notes: bool) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
            NS_DECL
        );
        if has_notes {
            xml.push_str(&format!(
                r#"<p:notesMasterIdLst><p:notesMasterId r:id="rId{}"/></p:notesMasterIdLst>"#,
                self.slides.len() + 2
            ));
        }
        xml.push_str("<p:sldIdLst>");
        for i in 0..self.slides.len() {
            xml.push_str(&format!(
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                256 + i,
                i + 2
            ));
        }
        xml.push_str("</p:sldIdLst>");
        xml.push_str(
            r#"<p:sldSz cx="9144000" cy="6858000" type="screen4x3"/><p:notesSz cx="6858000" cy="9144000"/>"#,
        );
        if let Some(positions) = &self.custom_show {
            xml.push_str(r#"<p:custShowLst><p:custShow name="Highlights" id="0"><p:sldLst>"#);
            for p in positions {
                xml.push_str(&format!(r#"<p:sld r:id="rId{}"/>"#, p + 2));
            }
            xml.push_str("</p:sldLst></p:custShow></p:custShowLst>");
        }
        if self.sections {
            xml.push_str(r#"<p:extLst><p:ext uri="{521415D9-36F7-43E2-AB2F-B90AF26B5E84}"><p14:sectionLst xmlns:p14="http://schemas.microsoft.com/office/powerpoint/2010/main"><p14:section name="Default Section" id="{6F4B8E3A-2F8C-4A59-9D0B-1C2D3E4F5A6B}"><p14:sldIdLst>"#);
            for i in 0..self.slides.len() {
                xml.push_str(&format!(r#"<p14:sldId id="{}"/>"#, 256 + i));
            }
            xml.push_str("</p14:sldIdLst></p14:section></p14:sectionLst></p:ext></p:extLst>");
        }
        xml.push_str("</p:presentation>");
        xml
    }

    fn presentation_rels(&self, has_notes: bool) -> String {
        let mut entries = vec![(
            "rId1".to_string(),
            "slideMaster",
            "slideMasters/slideMaster1.xml".to_string(),
        )];
        for i in 0..self.slides.len() {
            entries.push((
                format!("rId{}", i + 2),
                "slide",
                format!("slides/slide{}.xml", i + 1),
            ));
        }
        if has_notes {
            entries.push((
                format!("rId{}", self.slides.len() + 2),
                "notesMaster",
                "notesMasters/notesMaster1.xml".to_string(),
            ));
        }
        let entries: Vec<(&str, &str, &str)> = entries
            .iter()
            .map(|(id, ty, target)| (id.as_str(), *ty, target.as_str()))
            .collect();
        rels(&entries)
    }
}

/// A plain deck with one titled slide per label.
pub fn labeled_deck(labels: &[&str]) -> Vec<u8> {
    labels
        .iter()
        .fold(DeckBuilder::new(), |b, label| b.slide(label))
        .build()
}

/// Slide titles in deck order.
pub fn slide_titles(bytes: &[u8]) -> Vec<String> {
    let doc = PmlDocument::from_bytes(bytes).unwrap();
    DeckSummary::from_document(&doc)
        .unwrap()
        .slides
        .into_iter()
        .map(|s| s.title.unwrap_or_default())
        .collect()
}

pub fn summary(bytes: &[u8]) -> DeckSummary {
    let doc = PmlDocument::from_bytes(bytes).unwrap();
    DeckSummary::from_document(&doc).unwrap()
}

const CLR_MAP: &str = r#"bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink""#;

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, kind, target) in entries {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
            id, REL_BASE, kind, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn group_props() -> &'static str {
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#
}

fn slide_master() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster {}><p:cSld><p:spTree>{}</p:spTree></p:cSld><p:clrMap {}/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#,
        NS_DECL,
        group_props(),
        CLR_MAP
    )
}

fn slide_layout() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout {} type="title" preserve="1"><p:cSld name="Title Slide"><p:spTree>{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        NS_DECL,
        group_props()
    )
}

fn slide_xml(index: usize, fixture: &FixtureSlide) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {}><p:cSld><p:spTree>{}"#,
        NS_DECL,
        group_props()
    );
    xml.push_str(&format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="{}" y="457200"/><a:ext cx="8229600" cy="1143000"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        457200 + index * 1000,
        fixture.label
    ));
    xml.push_str(&format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="4" name="TextBox 3"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="457200" y="5029200"/><a:ext cx="4572000" cy="369332"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr wrap="square"/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>Body of {}</a:t></a:r></a:p><a:p><a:r><a:rPr lang="en-US"/><a:t>Second line</a:t></a:r></a:p></p:txBody></p:sp>"#,
        fixture.label
    ));
    if fixture.picture {
        xml.push_str(r#"<p:pic><p:nvPicPr><p:cNvPr id="3" name="Picture 2"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="1524000" y="1981200"/><a:ext cx="3048000" cy="2286000"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
    }
    xml.push_str(r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#);
    xml
}

fn notes_xml(text: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:notes {}><p:cSld><p:spTree>{}<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>"#,
        NS_DECL,
        group_props(),
        text
    )
}
