pub mod error;
pub mod hash;
pub mod package;
pub mod pml;
pub mod types;
pub mod xml;

pub use error::{ReslideError, Result};
pub use types::{Diagnostic, DiagnosticLevel};

pub use pml::{
    DeckSummary, PmlDocument, RearrangeReport, RearrangeSettings, RearrangeStep, Rearranger,
    SequencePlanner, SlideSequence, SlideStore,
};
