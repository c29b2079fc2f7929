// Example: drive a ListCoordinator against a view that prints what it is asked to do.
use sectionlist::{Align, Changeset, Position, ScrollMetrics};
use sectionlist_adapter::{
    CellId, DataSection, ListCommand, ListCoordinator, ListOptions, ListView, MessageBus,
    Scheduler, Section, ViewEventSink, ViewSettings,
};

#[derive(Default)]
struct PrintView {
    selected: Vec<Position>,
}

impl ListView for PrintView {
    fn perform_updates(&mut self, changes: &Changeset, animated: bool) {
        println!("batch (animated={animated}): {:?}", changes.counts());
    }

    fn selected_positions(&self) -> Vec<Position> {
        self.selected.clone()
    }

    fn set_selected(&mut self, position: Position, selected: bool) {
        self.selected.retain(|p| *p != position);
        if selected {
            self.selected.push(position);
        }
    }

    fn visible_cells(&self) -> Vec<CellId> {
        Vec::new()
    }

    fn cell_at(&self, _position: Position) -> Option<CellId> {
        None
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(600.0, 2400.0, 0.0)
    }

    fn scroll_to_position(&mut self, position: Position, align: Align, animated: bool) {
        println!("scroll to {position:?} ({align:?}, animated={animated})");
    }

    fn scroll_to_section(&mut self, section: usize, align: Align, animated: bool) {
        println!("scroll to section {section} ({align:?}, animated={animated})");
    }

    fn apply_settings(&mut self, settings: &ViewSettings) {
        println!("settings: editing={}", settings.editing);
    }

    fn set_refresh_control(&mut self, installed: bool) {
        println!("refresh control installed={installed}");
    }

    fn end_refreshing(&mut self) {}

    fn relayout(&mut self) {}
}

fn section(id: &'static str, items: &[&'static str]) -> Section<&'static str, String> {
    let data: Vec<&'static str> = items.to_vec();
    Section::new(
        id,
        DataSection::new(data, |s: &&'static str| *s, |s, _cached, selected| {
            format!("{s}{}", if selected { " *" } else { "" })
        }),
    )
}

fn main() {
    let scheduler = Scheduler::new();
    let bus = MessageBus::new();
    let options = ListOptions::default()
        .with_initial_position(Some(Position::new(1, 0)))
        .with_on_selection_change(Some(|sel: &sectionlist::SelectionSet<&'static str>| {
            println!("selection: {} rows", sel.len());
        }));
    let mut list = ListCoordinator::new(options, scheduler.clone());
    list.listen(&bus);

    let mut view = PrintView::default();
    list.update(&mut view, vec![section("todo", &["a", "b"]), section("done", &["c"])]);
    list.attached(&mut view);

    if let Some(cell) = list.cell_for_row(&mut view, Position::new(0, 1)) {
        println!("cell 0/1 hosts {:?}", list.cells().get(cell).and_then(|c| c.controller()));
    }

    // "b" is done now.
    list.update(&mut view, vec![section("todo", &["a"]), section("done", &["b", "c"])]);

    bus.send(ListCommand::scroll_to_section(1));
    list.poll(&mut view);

    view.selected.push(Position::new(1, 0));
    list.did_select(&mut view, Position::new(1, 0));
    scheduler.run_pending();
}
