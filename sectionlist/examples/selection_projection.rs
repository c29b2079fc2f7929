// Example: keep a selection keyed by section identifier across section reorders.
use sectionlist::{Position, SectionSnapshot, SelectionSet, Snapshot};

fn main() {
    let before = Snapshot::from_sections(vec![
        SectionSnapshot::with_items("fruit", [(1, "apple"), (2, "pear")]),
        SectionSnapshot::with_items("veg", [(3, "leek"), (4, "kale"), (5, "okra")]),
    ]);
    let selection =
        SelectionSet::from_positions([Position::new(1, 2), Position::new(0, 0)], &before);
    println!("veg rows: {:?}", selection.rows_in(&"veg"));

    // Sections swap places; the projection still names the same rows.
    let after = Snapshot::from_sections(vec![
        SectionSnapshot::with_items("veg", [(3, "leek"), (4, "kale"), (5, "okra")]),
        SectionSnapshot::with_items("fruit", [(1, "apple"), (2, "pear")]),
    ]);
    println!("positions now: {:?}", selection.to_positions(&after));
}
