use alloc::vec::Vec;

use sectionlist::{Align, BottomEdgeLatch, ListKey, Position, ScrollMetrics, Snapshot};

use crate::bus::{SCROLL_TO_POSITION, SCROLL_TO_SECTION};
use crate::{ListCommand, ListId, ListView, MessageBus, Subscription};

/// Scroll-side state of one list: initial setup, the bottom latch and bus commands.
#[derive(Debug, Default)]
pub struct ScrollController {
    list_id: Option<ListId>,
    did_initial_setup: bool,
    bottom: BottomEdgeLatch,
    subscriptions: Vec<Subscription<ListCommand>>,
}

impl ScrollController {
    pub fn new(list_id: Option<ListId>) -> Self {
        Self {
            list_id,
            ..Self::default()
        }
    }

    pub fn list_id(&self) -> Option<ListId> {
        self.list_id
    }

    pub fn set_list_id(&mut self, list_id: Option<ListId>) {
        self.list_id = list_id;
    }

    /// Starts receiving scroll commands from `bus`, replacing any previous subscription.
    pub fn listen(&mut self, bus: &MessageBus<ListCommand>) {
        self.subscriptions = alloc::vec![
            bus.subscribe(SCROLL_TO_SECTION),
            bus.subscribe(SCROLL_TO_POSITION),
        ];
    }

    pub fn is_listening(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    pub fn has_done_initial_setup(&self) -> bool {
        self.did_initial_setup
    }

    /// Marks initial setup as done. Returns `false` if it already was.
    pub fn begin_initial_setup(&mut self) -> bool {
        if self.did_initial_setup {
            return false;
        }
        self.did_initial_setup = true;
        true
    }

    /// Called when the view leaves the hierarchy; the next attachment sets up again.
    pub fn detach(&mut self) {
        self.did_initial_setup = false;
    }

    pub fn scroll_to_initial(&self, view: &mut dyn ListView, position: Position) {
        vdebug!(
            section = position.section,
            item = position.item,
            "ScrollController::scroll_to_initial"
        );
        view.scroll_to_position(position, Align::Center, false);
    }

    /// Returns `true` when the list just reached its bottom edge.
    pub fn check_reached_bottom(&mut self, metrics: ScrollMetrics) -> bool {
        self.bottom.check(metrics)
    }

    /// Takes the queued commands addressed to this list, oldest first per topic.
    pub fn take_commands(&self) -> Vec<ListCommand> {
        let mut out = Vec::new();
        for subscription in &self.subscriptions {
            for command in subscription.drain() {
                if command.addresses(self.list_id) {
                    out.push(command);
                }
            }
        }
        out
    }

    /// Performs `command` against `snapshot`. Out-of-range targets are ignored.
    ///
    /// Returns `true` if the view was asked to scroll.
    pub fn execute<S: ListKey>(
        &self,
        view: &mut dyn ListView,
        command: &ListCommand,
        snapshot: &Snapshot<S>,
    ) -> bool {
        match *command {
            ListCommand::ScrollToSection {
                section, animated, ..
            } => {
                if section >= snapshot.section_count() {
                    vwarn!(
                        section,
                        sections = snapshot.section_count(),
                        "ScrollController: section out of range"
                    );
                    return false;
                }
                view.scroll_to_section(section, Align::Start, animated);
                true
            }
            ListCommand::ScrollToPosition {
                position,
                align,
                animated,
                ..
            } => {
                if snapshot.item_key_at(position).is_none() {
                    vwarn!(
                        section = position.section,
                        item = position.item,
                        "ScrollController: position out of range"
                    );
                    return false;
                }
                view.scroll_to_position(position, align, animated);
                true
            }
        }
    }
}
