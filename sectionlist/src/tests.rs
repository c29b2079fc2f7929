use crate::*;

use alloc::collections::BTreeSet;
use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() >> 33) as usize % (end_exclusive - start)
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() >> 40) & 1 == 1
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.gen_range_usize(0, i + 1);
            items.swap(i, j);
        }
    }
}

/// Builds a snapshot from `(section_id, [(item_id, value)])`.
fn snap(sections: &[(u32, &[(u64, u64)])]) -> Snapshot<u32> {
    Snapshot::from_sections(
        sections
            .iter()
            .map(|(id, items)| SectionSnapshot::with_items(*id, items.iter().copied()))
            .collect(),
    )
}

fn key(section: u32, item: u64) -> ItemUniqueKey {
    ItemUniqueKey::new(&section, &item)
}

/// Fills `len` slots: `fixed` entries are pinned, the rest take `remaining` in order.
fn place<T: Clone>(len: usize, fixed: &[(usize, T)], remaining: &[T]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = vec![None; len];
    for (at, v) in fixed {
        slots[*at] = Some(v.clone());
    }
    let mut rest = remaining.iter();
    slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| rest.next().cloned().expect("slot left empty")))
        .collect()
}

/// Replays a changeset with batch-update semantics and returns the resulting item keys.
///
/// Inserted sections take their contents from `new`, the way a view would ask for cells.
fn replay(old: &Snapshot<u32>, changes: &Changeset, new: &Snapshot<u32>) -> Vec<Vec<ItemUniqueKey>> {
    let mut removed_sections = BTreeSet::new();
    let mut fixed_sections: Vec<(usize, Option<usize>)> = Vec::new();
    for change in &changes.sections {
        match *change {
            SectionChange::Delete { index } => {
                removed_sections.insert(index);
            }
            SectionChange::Insert { index } => fixed_sections.push((index, None)),
            SectionChange::Move { from, to } => {
                removed_sections.insert(from);
                fixed_sections.push((to, Some(from)));
            }
        }
    }
    let remaining: Vec<Option<usize>> = (0..old.section_count())
        .filter(|i| !removed_sections.contains(i))
        .map(Some)
        .collect();
    let section_sources = place(new.section_count(), &fixed_sections, &remaining);

    section_sources
        .into_iter()
        .enumerate()
        .map(|(new_section, source)| {
            let Some(old_section) = source else {
                return new.section(new_section).unwrap().keys();
            };
            let before = old.section(old_section).unwrap();
            let mut removed = BTreeSet::new();
            let mut fixed = Vec::new();
            let mut inserted = 0usize;
            for change in &changes.items {
                match *change {
                    ItemChange::Delete { at, .. } if at.section == old_section => {
                        removed.insert(at.item);
                    }
                    ItemChange::Insert { key, at } if at.section == new_section => {
                        fixed.push((at.item, key));
                        inserted += 1;
                    }
                    ItemChange::Move { key, from, to } if to.section == new_section => {
                        assert_eq!(from.section, old_section);
                        assert_eq!(before.key(from.item), Some(key));
                        removed.insert(from.item);
                        fixed.push((to.item, key));
                    }
                    _ => {}
                }
            }
            let remaining: Vec<ItemUniqueKey> = (0..before.len())
                .filter(|i| !removed.contains(i))
                .map(|i| before.key(i).unwrap())
                .collect();
            let moved = fixed.len() - inserted;
            place(remaining.len() + inserted + moved, &fixed, &remaining)
        })
        .collect()
}

fn expected_keys(s: &Snapshot<u32>) -> Vec<Vec<ItemUniqueKey>> {
    s.sections().iter().map(|s| s.keys()).collect()
}

#[test]
fn identity_lookups_are_partial() {
    let s = snap(&[(7, &[(1, 10), (2, 20)]), (9, &[(1, 30)])]);
    assert_eq!(s.section_id(0), Some(&7));
    assert_eq!(s.section_id(2), None);
    assert_eq!(s.item_key(0, 1), Some(key(7, 2)));
    assert_eq!(s.item_key(0, 2), None);
    assert_eq!(s.item_key(5, 0), None);
    // Same item id in two sections yields two distinct keys.
    assert_ne!(s.item_key(0, 0), s.item_key(1, 0));
    assert_eq!(s.position_of(&key(9, 1)), Some(Position::new(1, 0)));
}

#[test]
fn stale_keys_resolve_to_nothing() {
    let s = snap(&[(7, &[(1, 10)])]);
    assert_eq!(s.resolve_section(&key(7, 99)), Some(0));
    assert_eq!(s.position_of(&key(7, 99)), None);
    assert_eq!(s.resolve_section(&key(8, 1)), None);
    assert!(!s.contains(&key(8, 1)));
}

#[test]
fn validate_reports_duplicates() {
    let ok = snap(&[(1, &[(1, 0), (2, 0)]), (2, &[(1, 0)])]);
    assert_eq!(ok.validate(), Ok(()));

    let dup_item = snap(&[(1, &[(1, 0), (2, 0), (1, 5)])]);
    assert_eq!(
        dup_item.validate(),
        Err(SnapshotError::DuplicateItem {
            section: 0,
            index: 2
        })
    );

    let dup_section = snap(&[(1, &[]), (2, &[]), (1, &[])]);
    assert_eq!(
        dup_section.validate(),
        Err(SnapshotError::DuplicateSection { index: 2 })
    );
}

#[test]
fn first_pass_inserts_everything() {
    let mut r = Reconciler::new();
    let changes = r.apply(snap(&[(1, &[(1, 0), (2, 0)]), (2, &[(3, 0)])]));
    assert_eq!(
        changes.sections,
        vec![
            SectionChange::Insert { index: 0 },
            SectionChange::Insert { index: 1 }
        ]
    );
    // Items of inserted sections travel with their section.
    assert!(changes.items.is_empty());
    assert_eq!(r.passes(), 1);
}

#[test]
fn reapplying_same_snapshot_is_a_no_op() {
    let s = snap(&[(1, &[(1, 0), (2, 0), (3, 0)]), (2, &[(4, 1)])]);
    let mut r = Reconciler::new();
    assert!(!r.apply(s.clone()).is_empty());
    let second = r.apply(s);
    assert!(second.is_empty());
    assert_eq!(second.counts(), ChangeCounts::default());
}

#[test]
fn reorder_produces_only_moves() {
    let a = snap(&[(1, &[(1, 0), (2, 0), (3, 0), (4, 0), (5, 0)])]);
    let b = snap(&[(1, &[(5, 0), (1, 0), (2, 0), (4, 0), (3, 0)])]);
    let changes = diff(&a, &b);
    let counts = changes.counts();
    assert_eq!(counts.inserts, 0);
    assert_eq!(counts.deletes, 0);
    assert_eq!(counts.reloads, 0);
    // 1,2,4 (or 1,2,3) stay; two keys move.
    assert_eq!(counts.moves, 2);
    assert_eq!(replay(&a, &changes, &b), expected_keys(&b));
}

#[test]
fn random_permutations_never_insert_or_delete() {
    let mut rng = Lcg::new(7);
    for _ in 0..50 {
        let len = rng.gen_range_usize(1, 40);
        let items: Vec<(u64, u64)> = (0..len as u64).map(|i| (i, 0)).collect();
        let mut shuffled = items.clone();
        rng.shuffle(&mut shuffled);

        let a = snap(&[(3, &items)]);
        let b = snap(&[(3, &shuffled)]);
        let changes = diff(&a, &b);
        assert!(
            changes
                .items
                .iter()
                .all(|c| matches!(c, ItemChange::Move { .. }))
        );
        assert_eq!(replay(&a, &changes, &b), expected_keys(&b));
    }
}

#[test]
fn value_change_in_place_is_a_reload() {
    let a = snap(&[(1, &[(1, 10), (2, 20), (3, 30)])]);
    let b = snap(&[(1, &[(1, 10), (2, 21), (3, 30)])]);
    let changes = diff(&a, &b);
    assert_eq!(
        changes.items,
        vec![ItemChange::Reload {
            key: key(1, 2),
            at: Position::new(0, 1)
        }]
    );
    assert!(changes.is_reload_only());
    assert_eq!(changes.reloaded_keys().collect::<Vec<_>>(), vec![key(1, 2)]);
}

#[test]
fn moved_and_changed_item_moves_and_reloads() {
    let a = snap(&[(1, &[(1, 10), (2, 20), (3, 30)])]);
    let b = snap(&[(1, &[(3, 31), (1, 10), (2, 20)])]);
    let changes = diff(&a, &b);
    assert_eq!(
        changes.items,
        vec![
            ItemChange::Move {
                key: key(1, 3),
                from: Position::new(0, 2),
                to: Position::new(0, 0)
            },
            ItemChange::Reload {
                key: key(1, 3),
                at: Position::new(0, 0)
            },
        ]
    );
}

#[test]
fn inserts_and_deletes_use_new_and_old_indexes() {
    let a = snap(&[(1, &[(1, 0), (2, 0), (3, 0), (4, 0)])]);
    let b = snap(&[(1, &[(1, 0), (9, 0), (3, 0), (8, 0)])]);
    let changes = diff(&a, &b);
    assert_eq!(
        changes.items,
        vec![
            ItemChange::Delete {
                key: key(1, 4),
                at: Position::new(0, 3)
            },
            ItemChange::Delete {
                key: key(1, 2),
                at: Position::new(0, 1)
            },
            ItemChange::Insert {
                key: key(1, 9),
                at: Position::new(0, 1)
            },
            ItemChange::Insert {
                key: key(1, 8),
                at: Position::new(0, 3)
            },
        ]
    );
    assert_eq!(replay(&a, &changes, &b), expected_keys(&b));
}

#[test]
fn item_moving_between_sections_is_delete_plus_insert() {
    let a = snap(&[(1, &[(1, 0), (2, 0)]), (2, &[(3, 0)])]);
    let b = snap(&[(1, &[(1, 0)]), (2, &[(2, 0), (3, 0)])]);
    let changes = diff(&a, &b);
    assert_eq!(
        changes.items,
        vec![
            ItemChange::Delete {
                key: key(1, 2),
                at: Position::new(0, 1)
            },
            ItemChange::Insert {
                key: key(2, 2),
                at: Position::new(1, 0)
            },
        ]
    );
}

#[test]
fn section_changes_are_diffed_by_identifier() {
    let a = snap(&[(1, &[(1, 0)]), (2, &[(1, 0)]), (3, &[(1, 0), (2, 0)])]);
    let b = snap(&[(3, &[(2, 0), (1, 0)]), (1, &[(1, 0)]), (4, &[(5, 0)])]);
    let changes = diff(&a, &b);
    assert_eq!(
        changes.sections,
        vec![
            SectionChange::Delete { index: 1 },
            SectionChange::Insert { index: 2 },
            SectionChange::Move { from: 2, to: 0 },
        ]
    );
    // Items inside the moved section are still diffed, with old/new section indexes.
    assert_eq!(
        changes.items,
        vec![ItemChange::Move {
            key: key(3, 2),
            from: Position::new(2, 1),
            to: Position::new(0, 0)
        }]
    );
    assert_eq!(replay(&a, &changes, &b), expected_keys(&b));
}

#[test]
fn randomized_diffs_replay_to_new_snapshot() {
    let mut rng = Lcg::new(0x5eed);
    for round in 0..200u64 {
        let mut old_sections: Vec<(u32, Vec<(u64, u64)>)> = Vec::new();
        for id in 0..rng.gen_range_usize(0, 5) as u32 {
            let len = rng.gen_range_usize(0, 12);
            old_sections.push((id, (0..len as u64).map(|i| (i, i)).collect()));
        }

        let mut new_sections = Vec::new();
        for (id, items) in &old_sections {
            if rng.gen_range_usize(0, 6) == 0 {
                continue;
            }
            let mut kept: Vec<(u64, u64)> = Vec::new();
            for &(i, v) in items {
                if rng.gen_range_usize(0, 4) == 0 {
                    continue;
                }
                kept.push((i, if rng.gen_bool() { v } else { v + 100 }));
            }
            let mut items = kept;
            for extra in 0..rng.gen_range_usize(0, 4) as u64 {
                items.push((1000 + extra + round, 0));
            }
            rng.shuffle(&mut items);
            new_sections.push((*id, items));
        }
        if rng.gen_bool() {
            new_sections.push((100 + round as u32, vec![(1, 1), (2, 2)]));
        }
        rng.shuffle(&mut new_sections);

        let old: Vec<(u32, &[(u64, u64)])> =
            old_sections.iter().map(|(id, v)| (*id, v.as_slice())).collect();
        let new: Vec<(u32, &[(u64, u64)])> =
            new_sections.iter().map(|(id, v)| (*id, v.as_slice())).collect();
        let a = snap(&old);
        let b = snap(&new);

        let changes = diff(&a, &b);
        assert_eq!(replay(&a, &changes, &b), expected_keys(&b), "round {round}");
        assert!(diff(&b, &b).is_empty());
    }
}

#[test]
fn cache_keeps_instance_across_reload_only_pass() {
    let a = snap(&[(1, &[(1, 10), (2, 20)])]);
    let b = snap(&[(1, &[(1, 11), (2, 20)])]);
    let mut r = Reconciler::new();
    let mut cache = ControllerCache::new();
    r.apply(a);

    let controller = Rc::new("row 1");
    cache.put(key(1, 1), Rc::clone(&controller));

    let changes = r.apply(b);
    assert!(changes.is_reload_only());
    let evicted = cache.sync(r.applied(), CacheEviction::Eager, |_, _| true);
    assert_eq!(evicted, 0);
    assert!(Rc::ptr_eq(cache.get(&key(1, 1)).unwrap(), &controller));
}

#[test]
fn cache_drops_entries_of_sections_without_caching() {
    let s = snap(&[(1, &[(1, 0)]), (2, &[(1, 0)])]);
    let mut cache = ControllerCache::new();
    cache.put(key(1, 1), Rc::new(1));
    cache.put(key(2, 1), Rc::new(2));

    let evicted = cache.sync(&s, CacheEviction::Eager, |_, section| *section.id() == 1);
    assert_eq!(evicted, 1);
    assert!(cache.contains(&key(1, 1)));
    assert!(!cache.contains(&key(2, 1)));
}

#[test]
fn cache_eviction_policy_for_removed_items() {
    let after = snap(&[(1, &[(1, 0)])]);

    let mut eager = ControllerCache::new();
    eager.put(key(1, 1), 'a');
    eager.put(key(1, 2), 'b');
    eager.put(key(5, 1), 'c');
    assert_eq!(eager.sync(&after, CacheEviction::Eager, |_, _| true), 2);
    assert_eq!(eager.len(), 1);

    let mut retain = ControllerCache::new();
    retain.put(key(1, 1), 'a');
    retain.put(key(1, 2), 'b');
    retain.put(key(5, 1), 'c');
    assert_eq!(retain.sync(&after, CacheEviction::Retain, |_, _| true), 0);
    assert_eq!(retain.len(), 3);
    assert_eq!(retain.sync(&after, CacheEviction::Retain, |_, _| false), 2);
    assert_eq!(retain.get(&key(5, 1)), Some(&'c'));
}

#[test]
fn cache_invalidation() {
    let mut cache = ControllerCache::new();
    cache.put(key(1, 1), 1);
    cache.put(key(1, 2), 2);
    cache.put(key(2, 1), 3);
    assert_eq!(cache.invalidate(&key(1, 1)), Some(1));
    assert_eq!(cache.invalidate(&key(1, 1)), None);
    assert_eq!(cache.invalidate_section(&2u32), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.invalidate_section_hash(hash_id(&1u32)), 1);
    assert!(cache.is_empty());
    cache.put(key(3, 3), 4);
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn nested_configuration_of_same_key_is_refused() {
    let mut cache: ControllerCache<()> = ControllerCache::new();
    assert!(cache.begin_configure(key(1, 1)));
    assert!(!cache.begin_configure(key(1, 1)));
    assert!(cache.begin_configure(key(1, 2)));
    cache.finish_configure(&key(1, 1));
    assert!(!cache.is_configuring(&key(1, 1)));
    assert!(cache.begin_configure(key(1, 1)));
}

#[test]
fn selection_projection_round_trip() {
    let s = snap(&[(7, &[(1, 0), (2, 0), (3, 0)]), (8, &[(1, 0)])]);
    let selected = SelectionSet::from_positions([Position::new(0, 0), Position::new(0, 2)], &s);
    assert_eq!(selected.rows_in(&7), Some(&BTreeSet::from([0, 2])));
    assert_eq!(selected.section_count(), 1);

    let selected = SelectionSet::from_positions([Position::new(0, 2)], &s);
    assert_eq!(selected.rows_in(&7), Some(&BTreeSet::from([2])));
    assert_eq!(selected.len(), 1);
}

#[test]
fn selection_drops_stale_sections() {
    let s = snap(&[(7, &[(1, 0)])]);
    let selected = SelectionSet::from_positions([Position::new(0, 0), Position::new(4, 1)], &s);
    assert_eq!(selected.len(), 1);
    assert!(selected.contains(&7, 0));
}

#[test]
fn selection_converts_back_to_positions() {
    let before = snap(&[(7, &[(1, 0), (2, 0)]), (8, &[(1, 0), (2, 0), (3, 0)])]);
    let selected = SelectionSet::from_positions(
        [Position::new(0, 1), Position::new(1, 0), Position::new(1, 2)],
        &before,
    );

    // Section 8 moved to the front and lost its last item; section 7 is gone.
    let after = snap(&[(8, &[(1, 0), (2, 0)]), (9, &[(1, 0)])]);
    assert_eq!(selected.to_positions(&after), vec![Position::new(0, 0)]);
}

#[test]
fn selection_insert_and_remove() {
    let mut selected = SelectionSet::new();
    assert!(selected.insert("a", 1));
    assert!(!selected.insert("a", 1));
    assert!(selected.remove(&"a", 1));
    assert!(!selected.remove(&"a", 1));
    assert!(selected.is_empty());
}

#[test]
fn prefetch_groups_by_section() {
    let groups = group_by_section(&[
        Position::new(1, 4),
        Position::new(0, 2),
        Position::new(1, 5),
    ]);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[&0], vec![Position::new(0, 2)]);
    assert_eq!(groups[&1], vec![Position::new(1, 4), Position::new(1, 5)]);
}

#[test]
fn bottom_latch_fires_once_per_approach() {
    let mut latch = BottomEdgeLatch::new();
    let at = |offset: f32| ScrollMetrics::new(100.0, 500.0, offset);

    assert!(!latch.check(at(350.0)));
    assert!(latch.check(at(401.0)));
    assert!(!latch.check(at(420.0)));
    assert!(!latch.check(at(420.0)));

    assert!(!latch.check(at(300.0)));
    assert!(!latch.is_reached());
    assert!(latch.check(at(401.0)));
}

#[test]
fn short_content_is_at_bottom_immediately() {
    let mut latch = BottomEdgeLatch::new();
    assert!(latch.check(ScrollMetrics::new(600.0, 200.0, 0.0)));
    latch.reset();
    assert!(latch.check(ScrollMetrics::new(600.0, 200.0, 0.0)));
}
