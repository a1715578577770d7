//! Tests for label stores

use super::*;
use crate::common::Error;
use crate::reference::{CellRange, LabelTarget};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

fn name(s: &str) -> LabelName {
    LabelName::new(s).unwrap()
}

fn cell(s: &str) -> CellReference {
    s.parse().unwrap()
}

fn range(s: &str) -> CellRange {
    s.parse().unwrap()
}

fn mapping(label: &str, target: impl Into<LabelTarget>) -> LabelMapping {
    LabelMapping::new(name(label), target).unwrap()
}

fn populated() -> MemoryLabelStore {
    let store = MemoryLabelStore::new();
    store
        .save(mapping("a", CellReference::new(1, 2).unwrap()))
        .unwrap();
    store
        .save(mapping("b", CellReference::new(4, 8).unwrap()))
        .unwrap();
    store
        .save(mapping("c", CellReference::new(88, 99).unwrap()))
        .unwrap();
    store
}

#[test]
fn test_save_load_delete() {
    let store = MemoryLabelStore::new();
    let saved = store.save(mapping("Total", range("B2:B9"))).unwrap();
    assert_eq!(store.load(&name("Total")), Some(saved.clone()));
    assert_eq!(store.count(), 1);

    store.delete(&name("Total")).unwrap();
    assert_eq!(store.load(&name("Total")), None);
    assert_eq!(store.count(), 0);

    // Absent label is a no-op.
    store.delete(&name("Total")).unwrap();
    store.assert_consistent();
}

#[test]
fn test_labels_by_cell() {
    let store = populated();
    let a = store.labels(&CellReference::new(1, 2).unwrap());
    let b = store.labels(&CellReference::new(4, 8).unwrap());
    assert_eq!(a, [name("a")].into_iter().collect());
    assert_eq!(b, [name("b")].into_iter().collect());
    assert!(store.labels(&CellReference::new(2, 2).unwrap()).is_empty());
    store.assert_consistent();
}

#[test]
fn test_labels_include_containing_ranges() {
    let store = MemoryLabelStore::new();
    store.save(mapping("Column", range("B1:B100"))).unwrap();
    store.save(mapping("Block", range("A5:C6"))).unwrap();
    store.save(mapping("Corner", cell("B5"))).unwrap();

    let labels: Vec<String> = store
        .labels(&cell("B5"))
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(labels, vec!["Block", "Column", "Corner"]);
    assert_eq!(store.labels(&cell("B50")), [name("Column")].into_iter().collect());
    assert!(store.labels(&cell("D5")).is_empty());

    assert_eq!(
        store.labels_overlapping(&range("A4:B5")),
        [name("Block"), name("Column"), name("Corner")].into_iter().collect()
    );
}

#[test]
fn test_absolute_and_relative_share_index() {
    let store = MemoryLabelStore::new();
    store.save(mapping("Fixed", cell("$A$1"))).unwrap();
    store.save(mapping("Area", range("$A$1:$B$2"))).unwrap();

    let labels = store.labels(&cell("A1"));
    assert_eq!(labels, [name("Area"), name("Fixed")].into_iter().collect());
    assert_eq!(store.labels(&cell("$B$2")), [name("Area")].into_iter().collect());
    // The stored mapping keeps its original kinds.
    assert_eq!(
        store.load(&name("Fixed")).unwrap().target(),
        &LabelTarget::Cell(cell("$A$1"))
    );
}

#[test]
fn test_overwrite_moves_reverse_entries() {
    let store = MemoryLabelStore::new();
    store.save(mapping("Moving", cell("A1"))).unwrap();
    store.save(mapping("Moving", range("C3:D4"))).unwrap();

    assert_eq!(store.count(), 1);
    assert!(store.labels(&cell("A1")).is_empty());
    assert_eq!(store.labels(&cell("D4")), [name("Moving")].into_iter().collect());

    store.delete(&name("Moving")).unwrap();
    assert!(store.labels(&cell("D4")).is_empty());
    store.assert_consistent();
}

#[test]
fn test_paging_ordered_by_label() {
    let store = MemoryLabelStore::new();
    for label in ["delta", "alpha", "charlie", "bravo", "echo"] {
        store.save(mapping(label, cell("A1"))).unwrap();
    }

    let first: Vec<String> = store.ids(0, 2).into_iter().map(String::from).collect();
    assert_eq!(first, vec!["alpha", "bravo"]);

    let rest: Vec<String> = store
        .values(2, 10)
        .iter()
        .map(|m| m.label().to_string())
        .collect();
    assert_eq!(rest, vec!["charlie", "delta", "echo"]);

    assert!(store.ids(5, 3).is_empty());
    assert!(store.values(0, 0).is_empty());
}

#[test]
fn test_alias_resolution() {
    let store = MemoryLabelStore::new();
    store.save(mapping("Revenue", range("C2:C13"))).unwrap();
    store.save(mapping("Sales", name("Revenue"))).unwrap();
    store.save(mapping("Income", name("Sales"))).unwrap();

    let expected: BTreeSet<_> = [CellReferenceOrRange::Range(range("C2:C13"))]
        .into_iter()
        .collect();
    assert_eq!(store.load_cell_references_or_ranges(&name("Income")).unwrap(), expected);
    assert_eq!(store.load_cell_references_or_ranges(&name("Revenue")).unwrap(), expected);

    // Aliases are not reverse-indexed.
    assert_eq!(store.labels(&cell("C5")), [name("Revenue")].into_iter().collect());

    assert!(
        store
            .load_cell_references_or_ranges(&name("Unknown"))
            .unwrap()
            .is_empty()
    );
    store.save(mapping("Dangling", name("Unknown"))).unwrap();
    assert!(
        store
            .load_cell_references_or_ranges(&name("Dangling"))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_alias_cycle_is_illegal_state() {
    let store = MemoryLabelStore::new();
    store.save(mapping("Ping", name("Pong"))).unwrap();
    store.save(mapping("Pong", name("Ping"))).unwrap();

    let result = store.load_cell_references_or_ranges(&name("Ping"));
    assert!(matches!(result, Err(Error::IllegalState(_))));
}

#[test]
fn test_find_similar() {
    let store = MemoryLabelStore::new();
    for label in ["TaxRate", "tax", "Subtotal", "Taxes", "Total"] {
        store.save(mapping(label, cell("A1"))).unwrap();
    }

    let found: Vec<String> = store
        .find_similar("tax", 10)
        .iter()
        .map(|m| m.label().to_string())
        .collect();
    assert_eq!(found, vec!["tax", "TaxRate", "Taxes"]);

    let limited = store.find_similar("TOT", 1);
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].label().as_str(), "Subtotal");

    assert!(store.find_similar("zzz", 5).is_empty());
}

#[test]
fn test_read_only_passthrough() {
    let inner = Arc::new(populated());
    let read_only = ReadOnlyLabelStore::new(Arc::clone(&inner));

    assert_eq!(read_only.load(&name("a")), inner.load(&name("a")));
    assert_eq!(read_only.count(), inner.count());
    assert_eq!(read_only.ids(0, 10), inner.ids(0, 10));
    assert_eq!(read_only.values(0, 10), inner.values(0, 10));
    assert_eq!(
        read_only.labels(&CellReference::new(4, 8).unwrap()),
        inner.labels(&CellReference::new(4, 8).unwrap())
    );
    assert_eq!(
        read_only.load_cell_references_or_ranges(&name("c")).unwrap(),
        inner.load_cell_references_or_ranges(&name("c")).unwrap()
    );
}

#[test]
fn test_read_only_rejects_mutation() {
    let inner = Arc::new(populated());
    let read_only = ReadOnlyLabelStore::new(Arc::clone(&inner));
    let before = inner.values(0, usize::MAX);

    assert!(matches!(
        read_only.save(mapping("d", cell("Z9"))),
        Err(Error::UnsupportedOperation(_))
    ));
    assert!(matches!(
        read_only.delete(&name("a")),
        Err(Error::UnsupportedOperation(_))
    ));
    assert!(matches!(
        read_only.add_save_watcher(Box::new(|_| {})),
        Err(Error::UnsupportedOperation(_))
    ));
    assert!(matches!(
        read_only.add_delete_watcher(Box::new(|_| {})),
        Err(Error::UnsupportedOperation(_))
    ));

    assert_eq!(inner.values(0, usize::MAX), before);
}

#[test]
fn test_watchers() {
    let store = MemoryLabelStore::new();
    let saved = Arc::new(Mutex::new(Vec::new()));
    let deleted = Arc::new(Mutex::new(Vec::new()));

    let save_registration = {
        let saved = Arc::clone(&saved);
        store
            .add_save_watcher(Box::new(move |m| saved.lock().push(m.to_string())))
            .unwrap()
    };
    let _delete_registration = {
        let deleted = Arc::clone(&deleted);
        store
            .add_delete_watcher(Box::new(move |l| deleted.lock().push(l.to_string())))
            .unwrap()
    };

    store.save(mapping("x", cell("B2"))).unwrap();
    store.delete(&name("x")).unwrap();
    // Nothing removed, nothing notified.
    store.delete(&name("x")).unwrap();

    save_registration.unregister();
    store.save(mapping("y", cell("C3"))).unwrap();

    assert_eq!(*saved.lock(), vec!["x=B2"]);
    assert_eq!(*deleted.lock(), vec!["x"]);
}

#[test]
fn test_watcher_sees_committed_state() {
    let store = Arc::new(MemoryLabelStore::new());
    let observed = Arc::new(Mutex::new(None));

    let _registration = {
        let weak = Arc::downgrade(&store);
        let observed = Arc::clone(&observed);
        store
            .add_save_watcher(Box::new(move |m| {
                // Re-entering the store must not deadlock.
                if let Some(store) = weak.upgrade() {
                    *observed.lock() = Some(store.labels(&cell("D4")).contains(m.label()));
                }
            }))
            .unwrap()
    };

    store.save(mapping("Seen", cell("D4"))).unwrap();
    assert_eq!(*observed.lock(), Some(true));
}

#[test]
fn test_panicking_watcher_leaves_store_consistent() {
    let store = Arc::new(MemoryLabelStore::new());
    let _registration = store
        .add_save_watcher(Box::new(|_| panic!("watcher failure")))
        .unwrap();

    let worker = {
        let store = Arc::clone(&store);
        thread::spawn(move || store.save(mapping("Boom", cell("E5"))))
    };
    assert!(worker.join().is_err());

    assert!(store.load(&name("Boom")).is_some());
    assert_eq!(store.labels(&cell("E5")), [name("Boom")].into_iter().collect());
    store.assert_consistent();
}

#[test]
fn test_concurrent_mutation_stays_consistent() {
    let store = Arc::new(MemoryLabelStore::new());
    let reads = Arc::new(AtomicUsize::new(0));

    // Labels keep moving between cell and range targets, so a half-applied
    // save would leave a stale entry in one of the reverse indices.
    let writers: Vec<_> = (0..4u32)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 1..=50u32 {
                    let label = name(&format!("w{}_{}", t, i % 7));
                    let corner = CellReference::new(t + 1, i).unwrap();
                    let target = if i % 2 == 0 {
                        let far = CellReference::new(t + 2, i + 3).unwrap();
                        LabelTarget::Range(CellRange::new(corner, far).unwrap())
                    } else {
                        LabelTarget::Cell(corner)
                    };
                    store.save(LabelMapping::new(label.clone(), target).unwrap()).unwrap();
                    if i % 3 == 0 {
                        store.delete(&label).unwrap();
                    }
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let store = Arc::clone(&store);
            let reads = Arc::clone(&reads);
            thread::spawn(move || {
                for _ in 0..200 {
                    store.assert_consistent();
                    reads.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    assert_eq!(reads.load(Ordering::Relaxed), 400);
    store.assert_consistent();
    for mapping in store.values(0, usize::MAX) {
        let covered = match mapping.target() {
            LabelTarget::Cell(cell) => *cell,
            LabelTarget::Range(range) => range.begin(),
            LabelTarget::Label(_) => continue,
        };
        assert!(store.labels(&covered).contains(mapping.label()));
    }
}

#[test]
fn test_preloaded_store() {
    let store = MemoryLabelStore::with_mappings([
        mapping("a", cell("A1")),
        mapping("b", range("A1:C3")),
        mapping("a", cell("B2")),
    ]);
    assert_eq!(store.count(), 2);
    assert_eq!(store.labels(&cell("A1")), [name("b")].into_iter().collect());
    assert_eq!(
        store.labels(&cell("B2")),
        [name("a"), name("b")].into_iter().collect()
    );
    store.assert_consistent();
}
