use crate::error::Result;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, info};

use super::report::{RearrangeReport, RearrangeStep};
use super::sequence::SlideSequence;

/// Position-addressed slide storage. A slide has no identity beyond its
/// current index, so every mutation shifts the positions of others.
pub trait SlideStore {
    fn slide_count(&self) -> usize;

    /// Append a copy of the slide at `position`; returns the new slide's position.
    fn clone_slide(&mut self, position: usize) -> Result<usize>;

    fn remove_slide(&mut self, position: usize) -> Result<()>;

    /// Take the slide at `from` out and reinsert it at `to`.
    fn move_slide(&mut self, from: usize, to: usize) -> Result<()>;
}

/// Logical slot to physical position, one entry per requested slot.
///
/// Must be updated right after every structural mutation of the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotMap {
    positions: Vec<usize>,
}

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, position: usize) {
        self.positions.push(position);
    }

    pub fn get(&self, slot: usize) -> Option<usize> {
        self.positions.get(slot).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.positions
    }

    /// The slide at `removed` is gone; everything above it slid down by one.
    pub fn on_removed(&mut self, removed: usize) {
        for position in &mut self.positions {
            if *position > removed {
                *position -= 1;
            }
        }
    }

    /// The slide at `from` now sits at `to`; slides in between shifted
    /// by one toward `from`.
    pub fn on_moved(&mut self, from: usize, to: usize) {
        for position in &mut self.positions {
            if *position == from {
                *position = to;
            } else if from > to && (to..from).contains(position) {
                *position += 1;
            } else if from < to && (from + 1..=to).contains(position) {
                *position -= 1;
            }
        }
    }
}

impl From<Vec<usize>> for SlotMap {
    fn from(positions: Vec<usize>) -> Self {
        Self { positions }
    }
}

/// Turns a deck into the requested sequence using only clone, remove and move.
pub struct SequencePlanner;

impl SequencePlanner {
    pub fn apply<S: SlideStore + ?Sized>(
        store: &mut S,
        sequence: &SlideSequence,
    ) -> Result<RearrangeReport> {
        let original_count = store.slide_count();
        let requested = sequence.validate(original_count)?;

        let mut report = RearrangeReport::new(original_count, requested.clone());

        info!(
            slots = requested.len(),
            slides = original_count,
            "materializing duplicates"
        );
        let mut map = Self::materialize(store, &requested, &mut report)?;

        info!(
            unused = store.slide_count().saturating_sub(map.len()),
            "pruning unused slides"
        );
        Self::prune(store, &mut map, &mut report)?;

        info!(slots = map.len(), "reordering slides");
        Self::reorder(store, &mut map, &mut report)?;

        report.slide_count_after = store.slide_count();
        Ok(report)
    }

    /// First use of an index is the original; each later use takes the next
    /// duplicate in creation order.
    fn materialize<S: SlideStore + ?Sized>(
        store: &mut S,
        requested: &[usize],
        report: &mut RearrangeReport,
    ) -> Result<SlotMap> {
        let mut occurrences: HashMap<usize, usize> = HashMap::new();
        for &source in requested {
            *occurrences.entry(source).or_insert(0) += 1;
        }

        let mut duplicates: HashMap<usize, VecDeque<usize>> = HashMap::new();
        let mut map = SlotMap::new();

        for (slot, &source) in requested.iter().enumerate() {
            if let Some(position) = duplicates.get_mut(&source).and_then(VecDeque::pop_front) {
                map.push(position);
                report.push_step(RearrangeStep::UseDuplicate {
                    slot,
                    source,
                    position,
                });
                continue;
            }

            let count = occurrences.get(&source).copied().unwrap_or(0);
            if count > 1 && !duplicates.contains_key(&source) {
                map.push(source);
                report.push_step(RearrangeStep::UseOriginal {
                    slot,
                    source,
                    duplicates: count - 1,
                });

                let mut queue = VecDeque::with_capacity(count - 1);
                for _ in 1..count {
                    let position = store.clone_slide(source)?;
                    debug!(source, position, "cloned slide");
                    report.push_step(RearrangeStep::Cloned { source, position });
                    queue.push_back(position);
                }
                duplicates.insert(source, queue);
            } else {
                map.push(source);
                report.push_step(RearrangeStep::UseOriginal {
                    slot,
                    source,
                    duplicates: 0,
                });
            }
        }

        Ok(map)
    }

    /// Remove every physical slide no slot uses, highest position first.
    fn prune<S: SlideStore + ?Sized>(
        store: &mut S,
        map: &mut SlotMap,
        report: &mut RearrangeReport,
    ) -> Result<()> {
        let used: HashSet<usize> = map.as_slice().iter().copied().collect();

        for position in (0..store.slide_count()).rev() {
            if used.contains(&position) {
                continue;
            }
            store.remove_slide(position)?;
            map.on_removed(position);
            debug!(position, "removed slide");
            report.push_step(RearrangeStep::Removed { position });
        }
        Ok(())
    }

    fn reorder<S: SlideStore + ?Sized>(
        store: &mut S,
        map: &mut SlotMap,
        report: &mut RearrangeReport,
    ) -> Result<()> {
        for target in 0..map.len() {
            let Some(current) = map.get(target) else {
                break;
            };
            if current == target {
                continue;
            }
            store.move_slide(current, target)?;
            map.on_moved(current, target);
            debug!(from = current, to = target, "moved slide");
            report.push_step(RearrangeStep::Moved {
                from: current,
                to: target,
            });
        }
        Ok(())
    }
}
