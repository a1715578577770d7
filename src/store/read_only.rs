use super::watchers::WatcherRegistration;
use super::{DeleteWatcher, LabelStore, SaveWatcher};
use crate::common::{Error, Result};
use crate::reference::{CellReference, CellReferenceOrRange, LabelMapping, LabelName};
use std::collections::BTreeSet;

/// Wraps a store so that reads pass through and every mutation fails with
/// [`Error::UnsupportedOperation`].
#[derive(Debug, Clone)]
pub struct ReadOnlyLabelStore<S> {
    inner: S,
}

impl<S: LabelStore> ReadOnlyLabelStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: LabelStore> LabelStore for ReadOnlyLabelStore<S> {
    fn load(&self, label: &LabelName) -> Option<LabelMapping> {
        self.inner.load(label)
    }

    fn save(&self, mapping: LabelMapping) -> Result<LabelMapping> {
        Err(Error::unsupported(format!("save {} on a read-only store", mapping.label())))
    }

    fn delete(&self, label: &LabelName) -> Result<()> {
        Err(Error::unsupported(format!("delete {} on a read-only store", label)))
    }

    fn count(&self) -> usize {
        self.inner.count()
    }

    fn ids(&self, from: usize, count: usize) -> BTreeSet<LabelName> {
        self.inner.ids(from, count)
    }

    fn values(&self, from: usize, count: usize) -> Vec<LabelMapping> {
        self.inner.values(from, count)
    }

    fn load_cell_references_or_ranges(
        &self,
        label: &LabelName,
    ) -> Result<BTreeSet<CellReferenceOrRange>> {
        self.inner.load_cell_references_or_ranges(label)
    }

    fn labels(&self, cell: &CellReference) -> BTreeSet<LabelName> {
        self.inner.labels(cell)
    }

    fn find_similar(&self, text: &str, count: usize) -> Vec<LabelMapping> {
        self.inner.find_similar(text, count)
    }

    fn add_save_watcher(&self, _watcher: SaveWatcher) -> Result<WatcherRegistration> {
        Err(Error::unsupported("save watchers on a read-only store"))
    }

    fn add_delete_watcher(&self, _watcher: DeleteWatcher) -> Result<WatcherRegistration> {
        Err(Error::unsupported("delete watchers on a read-only store"))
    }
}
