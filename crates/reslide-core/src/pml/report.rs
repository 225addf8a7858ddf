use crate::error::Result;
use crate::types::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One decision or structural mutation made while rearranging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum RearrangeStep {
    /// Slot `slot` is served by the original slide `source`; `duplicates`
    /// copies of it were created for later slots.
    UseOriginal {
        slot: usize,
        source: usize,
        duplicates: usize,
    },
    /// Slot `slot` is served by a copy of `source` living at `position`.
    UseDuplicate {
        slot: usize,
        source: usize,
        position: usize,
    },
    Cloned { source: usize, position: usize },
    Removed { position: usize },
    Moved { from: usize, to: usize },
}

/// What a rearrangement did, returned to the caller instead of printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RearrangeReport {
    pub sequence: Vec<usize>,
    pub slide_count_before: usize,
    pub slide_count_after: usize,
    pub steps: Vec<RearrangeStep>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RearrangeReport {
    pub fn new(slide_count_before: usize, sequence: Vec<usize>) -> Self {
        Self {
            sequence,
            slide_count_before,
            slide_count_after: slide_count_before,
            steps: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn push_step(&mut self, step: RearrangeStep) {
        self.steps.push(step);
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn clone_count(&self) -> usize {
        self.count(|s| matches!(s, RearrangeStep::Cloned { .. }))
    }

    pub fn removal_count(&self) -> usize {
        self.count(|s| matches!(s, RearrangeStep::Removed { .. }))
    }

    pub fn move_count(&self) -> usize {
        self.count(|s| matches!(s, RearrangeStep::Moved { .. }))
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn count(&self, predicate: impl Fn(&RearrangeStep) -> bool) -> usize {
        self.steps.iter().filter(|s| predicate(s)).count()
    }
}

impl fmt::Display for RearrangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Processing {} slides from template...",
            self.sequence.len()
        )?;
        for step in &self.steps {
            match step {
                RearrangeStep::UseOriginal {
                    slot,
                    source,
                    duplicates: 0,
                } => writeln!(f, "  [{}] Using original slide {}", slot, source)?,
                RearrangeStep::UseOriginal {
                    slot,
                    source,
                    duplicates,
                } => writeln!(
                    f,
                    "  [{}] Using original slide {}, creating {} duplicate(s)",
                    slot, source, duplicates
                )?,
                RearrangeStep::UseDuplicate { slot, source, .. } => {
                    writeln!(f, "  [{}] Using duplicate of slide {}", slot, source)?
                }
                _ => {}
            }
        }
        writeln!(f)?;
        writeln!(f, "Deleting {} unused slides...", self.removal_count())?;
        writeln!(
            f,
            "Reordering {} slides to final sequence...",
            self.sequence.len()
        )?;
        for diagnostic in &self.diagnostics {
            writeln!(f, "{}", diagnostic)?;
        }
        write!(f, "Final presentation has {} slides", self.slide_count_after)
    }
}
