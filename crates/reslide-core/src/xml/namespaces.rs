#![allow(non_snake_case)]

use super::xname::XName;

pub mod P {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

    pub fn presentation() -> XName { XName::new(NS, "presentation") }
    pub fn sldIdLst() -> XName { XName::new(NS, "sldIdLst") }
    pub fn sldId() -> XName { XName::new(NS, "sldId") }
    pub fn sldSz() -> XName { XName::new(NS, "sldSz") }
    pub fn notesSz() -> XName { XName::new(NS, "notesSz") }
    pub fn custShowLst() -> XName { XName::new(NS, "custShowLst") }
    pub fn custShow() -> XName { XName::new(NS, "custShow") }
    pub fn sldLst() -> XName { XName::new(NS, "sldLst") }
    pub fn sld() -> XName { XName::new(NS, "sld") }
    pub fn cSld() -> XName { XName::new(NS, "cSld") }
    pub fn spTree() -> XName { XName::new(NS, "spTree") }
    pub fn sp() -> XName { XName::new(NS, "sp") }
    pub fn pic() -> XName { XName::new(NS, "pic") }
    pub fn graphicFrame() -> XName { XName::new(NS, "graphicFrame") }
    pub fn grpSp() -> XName { XName::new(NS, "grpSp") }
    pub fn cxnSp() -> XName { XName::new(NS, "cxnSp") }
    pub fn contentPart() -> XName { XName::new(NS, "contentPart") }
    pub fn cNvPr() -> XName { XName::new(NS, "cNvPr") }
    pub fn ph() -> XName { XName::new(NS, "ph") }
    pub fn txBody() -> XName { XName::new(NS, "txBody") }
    pub fn extLst() -> XName { XName::new(NS, "extLst") }
    pub fn ext() -> XName { XName::new(NS, "ext") }
}

pub mod A {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    pub fn p() -> XName { XName::new(NS, "p") }
    pub fn r() -> XName { XName::new(NS, "r") }
    pub fn t() -> XName { XName::new(NS, "t") }
    pub fn off() -> XName { XName::new(NS, "off") }
    pub fn ext() -> XName { XName::new(NS, "ext") }
    pub fn xfrm() -> XName { XName::new(NS, "xfrm") }
    pub fn blip() -> XName { XName::new(NS, "blip") }
}

pub mod R {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    pub fn id() -> XName { XName::new(NS, "id") }
    pub fn embed() -> XName { XName::new(NS, "embed") }
    pub fn link() -> XName { XName::new(NS, "link") }
}

/// `p14` extension namespace, home of the slide section list.
pub mod P14 {
    use super::XName;
    pub const NS: &str = "http://schemas.microsoft.com/office/powerpoint/2010/main";

    pub fn sectionLst() -> XName { XName::new(NS, "sectionLst") }
}

/// Namespace of `.rels` parts.
pub mod PKG_REL {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

    pub fn Relationships() -> XName { XName::new(NS, "Relationships") }
    pub fn Relationship() -> XName { XName::new(NS, "Relationship") }
}

/// Namespace of `[Content_Types].xml`.
pub mod CT {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

    pub fn Types() -> XName { XName::new(NS, "Types") }
    pub fn Default() -> XName { XName::new(NS, "Default") }
    pub fn Override() -> XName { XName::new(NS, "Override") }
}

pub mod MC {
    pub const NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";
}

pub mod XMLNS {
    pub const NS: &str = "http://www.w3.org/2000/xmlns/";
}
