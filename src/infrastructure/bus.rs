//! Page-scoped publish/subscribe mediator.
//!
//! Widgets on one page coordinate through a shared [`PageBus`] instead of global
//! broadcasts. Each subscriber owns a mailbox; publishing appends to every live
//! mailbox and subscribers drain theirs on their own event turn. Dropping or
//! unsubscribing a [`Subscription`] detaches the mailbox immediately, so nothing
//! is delivered to a torn-down widget.
//!
//! # Example
//!
//! ```rust
//! use collection_viewer::infrastructure::{PageBus, PageEvent};
//!
//! let bus = PageBus::new();
//! let subscription = bus.subscribe();
//! bus.publish(PageEvent::TagManagerStateChanged { open: true });
//! assert_eq!(subscription.drain(), vec![PageEvent::TagManagerStateChanged { open: true }]);
//! ```

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Typed cross-widget notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PageEvent {
    /// The page's tag manager overlay opened or closed.
    TagManagerStateChanged { open: bool },
    /// Tags changed on the given record keys.
    TagsChanged { keys: Vec<String> },
    /// Widgets should refresh; `widget_id` restricts it to one container.
    #[serde(rename_all = "camelCase")]
    RefreshRequested { widget_id: Option<String> },
}

#[derive(Debug, Default)]
struct BusInner {
    next_id: u64,
    mailboxes: BTreeMap<u64, Vec<PageEvent>>,
}

/// Shared mediator for one page. Clones refer to the same bus.
#[derive(Debug, Clone, Default)]
pub struct PageBus {
    inner: Rc<RefCell<BusInner>>,
}

impl PageBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a mailbox.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.mailboxes.insert(id, Vec::new());
        tracing::debug!(subscriber = id, "page bus subscription opened");

        Subscription {
            id,
            bus: Rc::clone(&self.inner),
            active: true,
        }
    }

    /// Delivers an event to every open mailbox.
    pub fn publish(&self, event: PageEvent) {
        let mut inner = self.inner.borrow_mut();
        tracing::debug!(event = ?event, subscribers = inner.mailboxes.len(), "page bus publish");
        for mailbox in inner.mailboxes.values_mut() {
            mailbox.push(event.clone());
        }
    }

    /// Number of open mailboxes.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().mailboxes.len()
    }
}

/// A mailbox on a [`PageBus`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    bus: Rc<RefCell<BusInner>>,
    active: bool,
}

impl Subscription {
    /// Takes all pending events, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<PageEvent> {
        if !self.active {
            return Vec::new();
        }
        self.bus
            .borrow_mut()
            .mailboxes
            .get_mut(&self.id)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// Closes the mailbox, discarding undelivered events.
    pub fn unsubscribe(&mut self) {
        if self.active {
            self.bus.borrow_mut().mailboxes.remove(&self.id);
            self.active = false;
            tracing::debug!(subscriber = self.id, "page bus subscription closed");
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mailbox_receives_in_order() {
        let bus = PageBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.publish(PageEvent::TagsChanged { keys: vec!["1".into()] });
        bus.publish(PageEvent::RefreshRequested { widget_id: None });

        assert_eq!(a.drain().len(), 2);
        assert_eq!(b.drain()[1], PageEvent::RefreshRequested { widget_id: None });
        assert!(a.drain().is_empty());
    }

    #[test]
    fn unsubscribe_and_drop_detach_mailboxes() {
        let bus = PageBus::new();
        let mut a = bus.subscribe();
        {
            let _b = bus.subscribe();
            assert_eq!(bus.subscriber_count(), 2);
        }
        assert_eq!(bus.subscriber_count(), 1);

        a.unsubscribe();
        bus.publish(PageEvent::TagManagerStateChanged { open: false });
        assert!(a.drain().is_empty());
        assert_eq!(bus.subscriber_count(), 0);
    }
}
