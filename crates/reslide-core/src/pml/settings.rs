use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RearrangeSettings {
    /// Delete parts no longer reachable from the package root before saving
    /// (removed slides, their notes, media nobody links to any more).
    pub remove_orphaned_parts: bool,
    /// Register every image/media relationship of a cloned slide in the copy,
    /// including those no shape references.
    pub carry_unreferenced_media: bool,
}

impl Default for RearrangeSettings {
    fn default() -> Self {
        Self {
            remove_orphaned_parts: true,
            carry_unreferenced_media: true,
        }
    }
}

impl RearrangeSettings {
    pub fn new() -> Self {
        Self::default()
    }
}
