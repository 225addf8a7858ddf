use crate::error::Result;
use std::path::Path;
use tracing::info;

use super::document::PmlDocument;
use super::planner::SequencePlanner;
use super::report::RearrangeReport;
use super::sequence::SlideSequence;
use super::settings::RearrangeSettings;

/// Builds a deck whose slides follow a requested sequence of source indices.
///
/// All work happens on an in-memory copy; nothing is written unless the
/// whole transformation succeeds.
#[derive(Debug, Clone, Default)]
pub struct Rearranger {
    settings: RearrangeSettings,
}

impl Rearranger {
    pub fn new(settings: RearrangeSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RearrangeSettings {
        &self.settings
    }

    pub fn rearrange_bytes(
        &self,
        template: &[u8],
        sequence: &SlideSequence,
    ) -> Result<(Vec<u8>, RearrangeReport)> {
        let mut doc = PmlDocument::with_settings(template, self.settings.clone())?;

        let mut report = SequencePlanner::apply(&mut doc, sequence)?;
        let bytes = doc.to_bytes()?;
        for diagnostic in doc.take_diagnostics() {
            report.push_diagnostic(diagnostic);
        }

        info!(
            before = report.slide_count_before,
            after = report.slide_count_after,
            clones = report.clone_count(),
            removals = report.removal_count(),
            moves = report.move_count(),
            "rearranged deck"
        );
        Ok((bytes, report))
    }

    /// Rearrange `template` into `output`. The output's parent directory is
    /// created as needed; `template` and `output` may be the same file.
    pub fn rearrange_file(
        &self,
        template: impl AsRef<Path>,
        output: impl AsRef<Path>,
        sequence: &SlideSequence,
    ) -> Result<RearrangeReport> {
        let template_bytes = std::fs::read(template.as_ref())?;
        let (bytes, report) = self.rearrange_bytes(&template_bytes, sequence)?;

        let output = output.as_ref();
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output, bytes)?;
        info!(path = %output.display(), "saved rearranged presentation");
        Ok(report)
    }
}
