//! Surface change notifications with explicit subscription handles.

use primestudio_core::HighlightReport;
use std::ops::Range;
use tracing::trace;

#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    TextChanged { revision: u64 },
    Highlighted { revision: u64, report: HighlightReport },
    SelectionChanged { cursor: usize, selection: Option<Range<usize>> },
    ThemeChanged { name: String },
    GrammarChanged { name: String },
    ScrollChanged { first_visible_char: usize },
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&EditorEvent) + Send>;

/// Synchronous fan-out to subscribers, in subscription order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&EditorEvent) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener.
    ///
    /// # Returns
    /// `false` when `id` was already unsubscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(candidate, _)| *candidate != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn publish(&mut self, event: &EditorEvent) {
        trace!(?event, listeners = self.listeners.len(), "publishing editor event");
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}
