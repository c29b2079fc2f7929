// Example: diff two snapshots of a sectioned list.
use sectionlist::{Reconciler, SectionSnapshot, Snapshot};

fn inbox(unread: &[(u32, &str)], archived: &[(u32, &str)]) -> Snapshot<&'static str> {
    Snapshot::from_sections(vec![
        SectionSnapshot::with_items("unread", unread.iter().copied()),
        SectionSnapshot::with_items("archived", archived.iter().copied()),
    ])
}

fn main() {
    let mut reconciler = Reconciler::new();

    let first = reconciler.apply(inbox(&[(1, "hi"), (2, "lunch?")], &[(3, "invoice")]));
    println!("first pass: {:?}", first.sections);

    // Message 2 is edited, message 4 arrives and message 1 moves to the end.
    let next = reconciler.apply(inbox(
        &[(4, "deploy done"), (2, "lunch at 1?"), (1, "hi")],
        &[(3, "invoice")],
    ));
    for change in &next.items {
        println!("{change:?}");
    }
    println!("counts: {:?}", next.counts());

    // Applying the same data again changes nothing.
    let again = reconciler.apply(inbox(
        &[(4, "deploy done"), (2, "lunch at 1?"), (1, "hi")],
        &[(3, "invoice")],
    ));
    assert!(again.is_empty());
}
