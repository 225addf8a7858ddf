use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReslideError {
    #[error("Invalid OOXML package: {message}")]
    InvalidPackage { message: String },

    #[error("Missing required part '{part_path}' in {document_type} document")]
    MissingPart { part_path: String, document_type: String },

    #[error("XML parsing error at {location}: {message}")]
    XmlParse { message: String, location: String },

    #[error("XML serialization error: {0}")]
    XmlWrite(String),

    #[error("Invalid relationship: {message}")]
    InvalidRelationship { message: String },

    #[error("Relationship '{relationship_id}' referenced in '{part}' does not resolve")]
    UnresolvedRelationship { part: String, relationship_id: String },

    #[error("Slide index {index} out of range for a deck of {slide_count} slide(s)")]
    IndexOutOfRange { index: i64, slide_count: usize },

    #[error("Invalid sequence format: '{token}' is not an integer (expected e.g. 0,34,34,50,52)")]
    InvalidSequence { token: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReslideError {
    /// True for errors caused by the caller's request rather than the document.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. } | Self::InvalidSequence { .. }
        )
    }

    pub(crate) fn missing_pml_part(part_path: &str) -> Self {
        Self::MissingPart {
            part_path: part_path.to_string(),
            document_type: "PowerPoint".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReslideError>;
