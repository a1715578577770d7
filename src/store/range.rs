//! Range-keyed storage with point and overlap queries.
//!
//! [`RangeIndex`] groups ranges into height classes, class `k` holding the
//! ranges whose height lies in `2^(k-1) + 1 ..= 2^k`, and within a class
//! buckets them by top row. A range of class `k` can only contain row `r`
//! if its top lies in `r - 2^k + 1 ..= r`, so a query scans one short
//! window per class. A few full-column ranges do not widen the window of
//! the single-cell ranges around them.

use crate::reference::{CellRange, CellReference};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

/// Height class of a range: the smallest `k` with `height <= 2^k`.
#[inline]
fn height_class(height: u32) -> u32 {
    height.next_power_of_two().trailing_zeros()
}

/// Interval index from ranges to value lists.
#[derive(Debug, Clone)]
pub struct RangeIndex<V> {
    entries: BTreeMap<CellRange, Vec<V>>,
    // height class -> top row -> ranges starting on that row
    starts: BTreeMap<u32, BTreeMap<u32, BTreeSet<CellRange>>>,
}

impl<V> Default for RangeIndex<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            starts: BTreeMap::new(),
        }
    }
}

impl<V: PartialEq> RangeIndex<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct ranges.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values stored under exactly this range.
    pub fn get(&self, range: &CellRange) -> Option<&[V]> {
        self.entries.get(range).map(Vec::as_slice)
    }

    /// Add a value under `range`. Returns `false` if it was already there.
    pub fn insert(&mut self, range: CellRange, value: V) -> bool {
        match self.entries.get_mut(&range) {
            Some(values) => {
                if values.contains(&value) {
                    return false;
                }
                values.push(value);
            },
            None => {
                self.entries.insert(range, vec![value]);
                self.starts
                    .entry(height_class(range.height()))
                    .or_default()
                    .entry(range.top())
                    .or_default()
                    .insert(range);
            },
        }
        true
    }

    /// Remove one value from `range`. The range disappears with its last
    /// value.
    pub fn remove(&mut self, range: &CellRange, value: &V) -> bool {
        let Some(values) = self.entries.get_mut(range) else {
            return false;
        };
        let Some(position) = values.iter().position(|v| v == value) else {
            return false;
        };
        values.remove(position);
        if values.is_empty() {
            self.remove_range(range);
        }
        true
    }

    /// Remove a range and everything stored under it.
    pub fn remove_range(&mut self, range: &CellRange) -> Option<Vec<V>> {
        let values = self.entries.remove(range)?;
        let class = height_class(range.height());
        if let Some(by_top) = self.starts.get_mut(&class) {
            if let Some(ranges) = by_top.get_mut(&range.top()) {
                ranges.remove(range);
                if ranges.is_empty() {
                    by_top.remove(&range.top());
                }
            }
            if by_top.is_empty() {
                self.starts.remove(&class);
            }
        }
        Some(values)
    }

    /// Replace `old` with `new` in place. Returns `false` if `old` is absent.
    pub fn replace(&mut self, range: &CellRange, new: V, old: &V) -> bool {
        let Some(values) = self.entries.get_mut(range) else {
            return false;
        };
        let Some(position) = values.iter().position(|v| v == old) else {
            return false;
        };
        if values.contains(&new) {
            values.remove(position);
        } else {
            values[position] = new;
        }
        true
    }

    /// All ranges and their values, in range order.
    pub fn iter(&self) -> impl Iterator<Item = (&CellRange, &Vec<V>)> {
        self.entries.iter()
    }

    /// Ranges containing the cell, in range order.
    pub fn containing(&self, cell: &CellReference) -> Vec<(&CellRange, &Vec<V>)> {
        self.collect(self.candidates(cell.row(), cell.row()).filter(|range| range.contains(cell)))
    }

    /// Ranges sharing at least one cell with `query`, in range order.
    pub fn overlapping(&self, query: &CellRange) -> Vec<(&CellRange, &Vec<V>)> {
        self.collect(
            self.candidates(query.top(), query.bottom())
                .filter(|range| range.overlaps(query)),
        )
    }

    fn collect<'a>(
        &'a self,
        ranges: impl Iterator<Item = &'a CellRange>,
    ) -> Vec<(&'a CellRange, &'a Vec<V>)> {
        let mut found: Vec<_> = ranges
            .filter_map(|range| self.entries.get_key_value(range))
            .collect();
        found.sort_unstable_by(|a, b| a.0.cmp(b.0));
        found
    }

    /// Ranges whose rows may intersect `top..=bottom`: per height class,
    /// those starting at most one class height above `top`.
    fn candidates(&self, top: u32, bottom: u32) -> impl Iterator<Item = &CellRange> {
        self.starts.iter().flat_map(move |(class, by_top)| {
            let reach = (1u32 << class) - 1;
            by_top
                .range(top.saturating_sub(reach)..=bottom)
                .flat_map(|(_, ranges)| ranges.iter())
        })
    }

    #[cfg(test)]
    pub(crate) fn scanned(&self, top: u32, bottom: u32) -> usize {
        self.candidates(top, bottom).count()
    }
}

/// Thread-safe store mapping ranges to value lists.
///
/// Keys are normalised to relative references, so `$A$1:B2` and `A1:B2`
/// are the same key.
#[derive(Debug)]
pub struct RangeValueStore<V> {
    index: RwLock<RangeIndex<V>>,
}

impl<V> Default for RangeValueStore<V> {
    fn default() -> Self {
        Self {
            index: RwLock::new(RangeIndex::default()),
        }
    }
}

impl<V: Clone + PartialEq> RangeValueStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values stored under exactly this range.
    pub fn load(&self, range: &CellRange) -> Option<Vec<V>> {
        self.index.read().get(&range.to_relative()).map(<[V]>::to_vec)
    }

    /// Add a value; returns `false` if it was already stored for the range.
    pub fn add_value(&self, range: CellRange, value: V) -> bool {
        let added = self.index.write().insert(range.to_relative(), value);
        log::trace!("event=range_add module=store range={} added={}", range, added);
        added
    }

    /// Remove one value; returns `false` if it was not stored for the range.
    pub fn remove_value(&self, range: &CellRange, value: &V) -> bool {
        let removed = self.index.write().remove(&range.to_relative(), value);
        log::trace!("event=range_remove module=store range={} removed={}", range, removed);
        removed
    }

    /// Swap `old` for `new` under one lock.
    pub fn replace_value(&self, range: &CellRange, new: V, old: &V) -> bool {
        self.index.write().replace(&range.to_relative(), new, old)
    }

    /// Remove a range with all its values.
    pub fn delete(&self, range: &CellRange) -> Option<Vec<V>> {
        let removed = self.index.write().remove_range(&range.to_relative());
        log::debug!(
            "event=range_delete module=store range={} found={}",
            range,
            removed.is_some()
        );
        removed
    }

    /// Number of distinct ranges.
    pub fn count(&self) -> usize {
        self.index.read().len()
    }

    /// Page of stored ranges, in key order.
    pub fn ids(&self, from: usize, count: usize) -> BTreeSet<CellRange> {
        self.index
            .read()
            .iter()
            .skip(from)
            .take(count)
            .map(|(range, _)| *range)
            .collect()
    }

    /// Page of value lists, in key order.
    pub fn values(&self, from: usize, count: usize) -> Vec<Vec<V>> {
        self.index
            .read()
            .iter()
            .skip(from)
            .take(count)
            .map(|(_, values)| values.clone())
            .collect()
    }

    /// Every stored range containing the cell.
    pub fn ranges_containing(&self, cell: &CellReference) -> BTreeSet<CellRange> {
        self.index
            .read()
            .containing(cell)
            .into_iter()
            .map(|(range, _)| *range)
            .collect()
    }

    /// Values of every range containing the cell, in key order.
    pub fn values_containing(&self, cell: &CellReference) -> Vec<V> {
        self.index
            .read()
            .containing(cell)
            .into_iter()
            .flat_map(|(_, values)| values.iter().cloned())
            .collect()
    }

    /// Values of every range overlapping `range`, in key order.
    pub fn values_overlapping(&self, range: &CellRange) -> Vec<V> {
        self.index
            .read()
            .overlapping(range)
            .into_iter()
            .flat_map(|(_, values)| values.iter().cloned())
            .collect()
    }

    /// The value of the smallest range containing the cell. Ties go to the
    /// first range in key order, and within a range to its first value.
    pub fn find_value_containing(&self, cell: &CellReference) -> Option<V> {
        let index = self.index.read();
        let mut best: Option<(&CellRange, &Vec<V>)> = None;
        for (range, values) in index.containing(cell) {
            if best.is_none_or(|(b, _)| range.cell_count() < b.cell_count()) {
                best = Some((range, values));
            }
        }
        best.and_then(|(_, values)| values.first().cloned())
    }
}
