//! In-memory label store.

use super::range::RangeIndex;
use super::watchers::{WatcherRegistration, Watchers};
use super::{DeleteWatcher, LabelStore, SaveWatcher};
use crate::common::{Error, Result};
use crate::reference::{
    CellRange, CellReference, CellReferenceOrRange, LabelMapping, LabelName, LabelTarget,
};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

/// Forward and reverse indices, always mutated together.
#[derive(Debug, Default)]
struct Indices {
    mappings: BTreeMap<LabelName, LabelMapping>,
    cells: BTreeMap<CellReference, BTreeSet<LabelName>>,
    ranges: RangeIndex<LabelName>,
}

impl Indices {
    fn link(&mut self, mapping: &LabelMapping) {
        let label = mapping.label().clone();
        match mapping.target() {
            LabelTarget::Cell(cell) => {
                self.cells.entry(cell.to_relative()).or_default().insert(label);
            },
            LabelTarget::Range(range) => {
                self.ranges.insert(range.to_relative(), label);
            },
            // Aliases are resolved on read and not reverse-indexed.
            LabelTarget::Label(_) => {},
        }
    }

    fn unlink(&mut self, mapping: &LabelMapping) {
        match mapping.target() {
            LabelTarget::Cell(cell) => {
                let cell = cell.to_relative();
                if let Some(labels) = self.cells.get_mut(&cell) {
                    labels.remove(mapping.label());
                    if labels.is_empty() {
                        self.cells.remove(&cell);
                    }
                }
            },
            LabelTarget::Range(range) => {
                self.ranges.remove(&range.to_relative(), mapping.label());
            },
            LabelTarget::Label(_) => {},
        }
    }

    fn resolve(&self, label: &LabelName) -> Result<Option<CellReferenceOrRange>> {
        let mut seen = BTreeSet::new();
        let mut current = label;
        loop {
            if !seen.insert(current) {
                return Err(Error::illegal_state(format!(
                    "label {} is part of an alias cycle",
                    label
                )));
            }
            let Some(mapping) = self.mappings.get(current) else {
                return Ok(None);
            };
            match mapping.target() {
                LabelTarget::Cell(cell) => return Ok(Some(CellReferenceOrRange::Cell(*cell))),
                LabelTarget::Range(range) => return Ok(Some(CellReferenceOrRange::Range(*range))),
                LabelTarget::Label(next) => current = next,
            }
        }
    }
}

/// [`LabelStore`] held entirely in memory.
///
/// A single [`RwLock`] guards the label map together with both reverse
/// indices, so readers never see one updated without the other.
#[derive(Debug, Default)]
pub struct MemoryLabelStore {
    indices: RwLock<Indices>,
    save_watchers: Watchers<LabelMapping>,
    delete_watchers: Watchers<LabelName>,
}

impl MemoryLabelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing mappings. Later duplicates win.
    pub fn with_mappings(mappings: impl IntoIterator<Item = LabelMapping>) -> Self {
        let store = Self::new();
        {
            let mut indices = store.indices.write();
            for mapping in mappings {
                if let Some(previous) = indices.mappings.insert(mapping.label().clone(), mapping.clone()) {
                    indices.unlink(&previous);
                }
                indices.link(&mapping);
            }
        }
        store
    }

    /// Labels with a range target overlapping `range` or a cell target
    /// inside it.
    pub fn labels_overlapping(&self, range: &CellRange) -> BTreeSet<LabelName> {
        let indices = self.indices.read();
        let mut labels: BTreeSet<LabelName> = indices
            .ranges
            .overlapping(&range.to_relative())
            .into_iter()
            .flat_map(|(_, labels)| labels.iter().cloned())
            .collect();
        // Cell keys sort row-major, so only the rows of `range` are scanned.
        let (first, last) = (range.begin().to_relative(), range.end().to_relative());
        for (cell, names) in indices.cells.range(first..=last) {
            if range.contains(cell) {
                labels.extend(names.iter().cloned());
            }
        }
        labels
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let indices = self.indices.read();
        for (cell, labels) in &indices.cells {
            for label in labels {
                let mapping = indices.mappings.get(label).expect("reverse entry without mapping");
                assert!(
                    matches!(mapping.target(), LabelTarget::Cell(c) if c.to_relative() == *cell),
                    "cell index disagrees for {}",
                    label
                );
            }
        }
        for (range, labels) in indices.ranges.iter() {
            for label in labels {
                let mapping = indices.mappings.get(label).expect("reverse entry without mapping");
                assert!(
                    matches!(mapping.target(), LabelTarget::Range(r) if r.to_relative() == *range),
                    "range index disagrees for {}",
                    label
                );
            }
        }
        for mapping in indices.mappings.values() {
            let indexed = match mapping.target() {
                LabelTarget::Cell(cell) => indices
                    .cells
                    .get(&cell.to_relative())
                    .is_some_and(|labels| labels.contains(mapping.label())),
                LabelTarget::Range(range) => indices
                    .ranges
                    .get(&range.to_relative())
                    .is_some_and(|labels| labels.contains(mapping.label())),
                LabelTarget::Label(_) => true,
            };
            assert!(indexed, "mapping {} missing from reverse index", mapping);
        }
    }
}

impl LabelStore for MemoryLabelStore {
    fn load(&self, label: &LabelName) -> Option<LabelMapping> {
        self.indices.read().mappings.get(label).cloned()
    }

    fn save(&self, mapping: LabelMapping) -> Result<LabelMapping> {
        {
            let mut indices = self.indices.write();
            if let Some(previous) = indices.mappings.insert(mapping.label().clone(), mapping.clone()) {
                indices.unlink(&previous);
            }
            indices.link(&mapping);
        }
        log::debug!(
            "event=label_save module=store label={} target={}",
            mapping.label(),
            mapping.target()
        );
        self.save_watchers.accept(&mapping);
        Ok(mapping)
    }

    fn delete(&self, label: &LabelName) -> Result<()> {
        let removed = {
            let mut indices = self.indices.write();
            let removed = indices.mappings.remove(label);
            if let Some(mapping) = &removed {
                indices.unlink(mapping);
            }
            removed
        };
        log::debug!(
            "event=label_delete module=store label={} found={}",
            label,
            removed.is_some()
        );
        if removed.is_some() {
            self.delete_watchers.accept(label);
        }
        Ok(())
    }

    fn count(&self) -> usize {
        self.indices.read().mappings.len()
    }

    fn ids(&self, from: usize, count: usize) -> BTreeSet<LabelName> {
        self.indices
            .read()
            .mappings
            .keys()
            .skip(from)
            .take(count)
            .cloned()
            .collect()
    }

    fn values(&self, from: usize, count: usize) -> Vec<LabelMapping> {
        self.indices
            .read()
            .mappings
            .values()
            .skip(from)
            .take(count)
            .cloned()
            .collect()
    }

    fn load_cell_references_or_ranges(
        &self,
        label: &LabelName,
    ) -> Result<BTreeSet<CellReferenceOrRange>> {
        let resolved = self.indices.read().resolve(label)?;
        log::trace!(
            "event=label_resolve module=store label={} found={}",
            label,
            resolved.is_some()
        );
        Ok(resolved.into_iter().collect())
    }

    fn labels(&self, cell: &CellReference) -> BTreeSet<LabelName> {
        let indices = self.indices.read();
        let cell = cell.to_relative();
        let mut labels = indices.cells.get(&cell).cloned().unwrap_or_default();
        labels.extend(
            indices
                .ranges
                .containing(&cell)
                .into_iter()
                .flat_map(|(_, names)| names.iter().cloned()),
        );
        labels
    }

    fn find_similar(&self, text: &str, count: usize) -> Vec<LabelMapping> {
        let needle = text.to_lowercase();
        let indices = self.indices.read();
        let exact = indices.mappings.get(text);
        exact
            .into_iter()
            .chain(
                indices
                    .mappings
                    .values()
                    .filter(|m| m.label().as_str() != text)
                    .filter(|m| m.label().as_str().to_lowercase().contains(&needle)),
            )
            .take(count)
            .cloned()
            .collect()
    }

    fn add_save_watcher(&self, watcher: SaveWatcher) -> Result<WatcherRegistration> {
        Ok(self.save_watchers.add(watcher))
    }

    fn add_delete_watcher(&self, watcher: DeleteWatcher) -> Result<WatcherRegistration> {
        Ok(self.delete_watchers.add(watcher))
    }
}
