use alloc::collections::VecDeque;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use sectionlist::{Align, Position};
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    struct SubscriptionId;
}

/// A named channel on a [`MessageBus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Topic(&'static str);

impl Topic {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

pub const SCROLL_TO_SECTION: Topic = Topic::new("sectionlist.scroll_to_section");
pub const SCROLL_TO_POSITION: Topic = Topic::new("sectionlist.scroll_to_position");

/// Identifies one list among several listening on the same bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListId(pub u64);

/// Scroll requests published on the bus.
///
/// A command with `target: None` is handled by every listening list; otherwise only by the list
/// whose [`ListId`] matches.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListCommand {
    ScrollToSection {
        target: Option<ListId>,
        section: usize,
        animated: bool,
    },
    ScrollToPosition {
        target: Option<ListId>,
        position: Position,
        align: Align,
        animated: bool,
    },
}

impl ListCommand {
    /// Scrolls to the top of `section`, animated.
    pub fn scroll_to_section(section: usize) -> Self {
        Self::ScrollToSection {
            target: None,
            section,
            animated: true,
        }
    }

    pub fn scroll_to_position(position: Position, align: Align, animated: bool) -> Self {
        Self::ScrollToPosition {
            target: None,
            position,
            align,
            animated,
        }
    }

    pub fn for_list(mut self, id: ListId) -> Self {
        match &mut self {
            Self::ScrollToSection { target, .. } | Self::ScrollToPosition { target, .. } => {
                *target = Some(id)
            }
        }
        self
    }

    pub fn animated(mut self, value: bool) -> Self {
        match &mut self {
            Self::ScrollToSection { animated, .. } | Self::ScrollToPosition { animated, .. } => {
                *animated = value
            }
        }
        self
    }

    pub fn target(&self) -> Option<ListId> {
        match *self {
            Self::ScrollToSection { target, .. } | Self::ScrollToPosition { target, .. } => target,
        }
    }

    pub fn topic(&self) -> Topic {
        match self {
            Self::ScrollToSection { .. } => SCROLL_TO_SECTION,
            Self::ScrollToPosition { .. } => SCROLL_TO_POSITION,
        }
    }

    /// Returns `true` if a list with identifier `id` should handle this command.
    pub fn addresses(&self, id: Option<ListId>) -> bool {
        match self.target() {
            None => true,
            Some(target) => id == Some(target),
        }
    }
}

type Mailbox<M> = Rc<RefCell<VecDeque<M>>>;

struct Subscriber<M> {
    topic: Topic,
    mailbox: Mailbox<M>,
}

struct BusInner<M> {
    subscribers: SlotMap<SubscriptionId, Subscriber<M>>,
}

/// A single-threaded publish/subscribe bus.
///
/// Publishing copies the message into the mailbox of every live subscription on the topic;
/// subscribers drain their mailbox when convenient. Clones share the same subscriber set.
pub struct MessageBus<M> {
    inner: Rc<RefCell<BusInner<M>>>,
}

impl<M> Clone for MessageBus<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<M> Default for MessageBus<M> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                subscribers: SlotMap::with_key(),
            })),
        }
    }
}

impl<M> fmt::Debug for MessageBus<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBus")
            .field("subscribers", &self.inner.borrow().subscribers.len())
            .finish()
    }
}

impl<M: Clone> MessageBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `topic`. The subscription is removed when the handle is dropped.
    pub fn subscribe(&self, topic: Topic) -> Subscription<M> {
        let mailbox: Mailbox<M> = Rc::new(RefCell::new(VecDeque::new()));
        let id = self.inner.borrow_mut().subscribers.insert(Subscriber {
            topic,
            mailbox: Rc::clone(&mailbox),
        });
        vtrace!(topic = topic.name(), "subscribed");
        Subscription {
            id,
            topic,
            mailbox,
            bus: Rc::downgrade(&self.inner),
        }
    }

    /// Delivers `message` to every subscription on `topic` and returns how many received it.
    pub fn publish(&self, topic: Topic, message: M) -> usize {
        let inner = self.inner.borrow();
        let mut delivered = 0;
        for (_, subscriber) in inner.subscribers.iter() {
            if subscriber.topic == topic {
                subscriber.mailbox.borrow_mut().push_back(message.clone());
                delivered += 1;
            }
        }
        vtrace!(topic = topic.name(), delivered, "published");
        delivered
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.inner
            .borrow()
            .subscribers
            .values()
            .filter(|s| s.topic == topic)
            .count()
    }
}

impl MessageBus<ListCommand> {
    /// Publishes `command` on its own topic.
    pub fn send(&self, command: ListCommand) -> usize {
        self.publish(command.topic(), command)
    }
}

/// A live subscription to one topic.
pub struct Subscription<M> {
    id: SubscriptionId,
    topic: Topic,
    mailbox: Mailbox<M>,
    bus: Weak<RefCell<BusInner<M>>>,
}

impl<M> fmt::Debug for Subscription<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("pending", &self.pending())
            .finish()
    }
}

impl<M> Subscription<M> {
    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn pending(&self) -> usize {
        self.mailbox.borrow().len()
    }

    pub fn try_recv(&self) -> Option<M> {
        self.mailbox.borrow_mut().pop_front()
    }

    /// Takes every queued message, oldest first.
    pub fn drain(&self) -> Vec<M> {
        self.mailbox.borrow_mut().drain(..).collect()
    }
}

impl<M> Drop for Subscription<M> {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.borrow_mut().subscribers.remove(self.id);
        }
    }
}
