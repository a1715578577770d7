//! Label resolution stores.
//!
//! A [`LabelStore`] maps label names to cells, ranges or other labels and
//! answers the reverse question of which labels cover a given cell. The
//! forward map and the reverse indices are updated as one unit: no reader
//! ever observes a mapping without its reverse entry or the other way round.
//!
//! ```
//! use spreadsheet_core::reference::{CellRange, LabelMapping, LabelName};
//! use spreadsheet_core::store::{LabelStore, MemoryLabelStore};
//!
//! let store = MemoryLabelStore::new();
//! let total = LabelName::new("Total").unwrap();
//! let column: CellRange = "B2:B9".parse().unwrap();
//! store.save(LabelMapping::new(total.clone(), column).unwrap()).unwrap();
//!
//! let labels = store.labels(&"B5".parse().unwrap());
//! assert!(labels.contains(&total));
//! ```

mod label;
mod range;
mod read_only;
mod watchers;

pub use label::MemoryLabelStore;
pub use range::{RangeIndex, RangeValueStore};
pub use read_only::ReadOnlyLabelStore;
pub use watchers::{WatcherRegistration, Watchers};

use crate::common::Result;
use crate::reference::{CellReference, CellReferenceOrRange, LabelMapping, LabelName};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Callback run after a mapping is saved.
pub type SaveWatcher = Box<dyn Fn(&LabelMapping) + Send + Sync>;

/// Callback run after a label is deleted.
pub type DeleteWatcher = Box<dyn Fn(&LabelName) + Send + Sync>;

/// Store of label mappings with reverse lookups.
///
/// Paged views (`ids`, `values`) are ordered by label name. Watchers run
/// synchronously on the mutating thread after the change is visible to
/// readers; a panic in a watcher reaches the caller but leaves the store
/// consistent.
pub trait LabelStore: Send + Sync {
    /// The mapping for `label`, if any.
    fn load(&self, label: &LabelName) -> Option<LabelMapping>;

    /// Insert or overwrite the mapping for its label.
    fn save(&self, mapping: LabelMapping) -> Result<LabelMapping>;

    /// Remove the mapping for `label`. Removing an absent label is a no-op.
    fn delete(&self, label: &LabelName) -> Result<()>;

    fn count(&self) -> usize;

    fn ids(&self, from: usize, count: usize) -> BTreeSet<LabelName>;

    fn values(&self, from: usize, count: usize) -> Vec<LabelMapping>;

    /// Resolve a label to its concrete target, following aliases.
    ///
    /// An unknown label, or an alias chain ending at one, resolves to the
    /// empty set. An alias cycle is an [`IllegalState`](crate::Error::IllegalState).
    fn load_cell_references_or_ranges(
        &self,
        label: &LabelName,
    ) -> Result<BTreeSet<CellReferenceOrRange>>;

    /// Labels targeting `cell` directly or through a containing range.
    /// Aliases are not expanded.
    fn labels(&self, cell: &CellReference) -> BTreeSet<LabelName>;

    /// Up to `count` mappings whose label contains `text`, ignoring case.
    /// An exact match comes first; the rest follow in label order.
    fn find_similar(&self, text: &str, count: usize) -> Vec<LabelMapping>;

    fn add_save_watcher(&self, watcher: SaveWatcher) -> Result<WatcherRegistration>;

    fn add_delete_watcher(&self, watcher: DeleteWatcher) -> Result<WatcherRegistration>;
}

impl<S: LabelStore + ?Sized> LabelStore for Arc<S> {
    fn load(&self, label: &LabelName) -> Option<LabelMapping> {
        (**self).load(label)
    }

    fn save(&self, mapping: LabelMapping) -> Result<LabelMapping> {
        (**self).save(mapping)
    }

    fn delete(&self, label: &LabelName) -> Result<()> {
        (**self).delete(label)
    }

    fn count(&self) -> usize {
        (**self).count()
    }

    fn ids(&self, from: usize, count: usize) -> BTreeSet<LabelName> {
        (**self).ids(from, count)
    }

    fn values(&self, from: usize, count: usize) -> Vec<LabelMapping> {
        (**self).values(from, count)
    }

    fn load_cell_references_or_ranges(
        &self,
        label: &LabelName,
    ) -> Result<BTreeSet<CellReferenceOrRange>> {
        (**self).load_cell_references_or_ranges(label)
    }

    fn labels(&self, cell: &CellReference) -> BTreeSet<LabelName> {
        (**self).labels(cell)
    }

    fn find_similar(&self, text: &str, count: usize) -> Vec<LabelMapping> {
        (**self).find_similar(text, count)
    }

    fn add_save_watcher(&self, watcher: SaveWatcher) -> Result<WatcherRegistration> {
        (**self).add_save_watcher(watcher)
    }

    fn add_delete_watcher(&self, watcher: DeleteWatcher) -> Result<WatcherRegistration> {
        (**self).add_delete_watcher(watcher)
    }
}

#[cfg(test)]
mod tests;
