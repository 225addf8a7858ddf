mod cloner;
mod document;
mod planner;
mod rearranger;
mod report;
mod sequence;
mod settings;
mod summary;

pub use cloner::SlideCloner;
pub use document::{PmlDocument, SlideEntry};
pub use planner::{SequencePlanner, SlideStore, SlotMap};
pub use rearranger::Rearranger;
pub use report::{RearrangeReport, RearrangeStep};
pub use sequence::SlideSequence;
pub use settings::RearrangeSettings;
pub use summary::{DeckSummary, MediaReference, ShapeKind, ShapeSummary, SlideSummary, Transform};
