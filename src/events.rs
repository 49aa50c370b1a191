//! Events a node publishes to its editor.
//!
//! Listeners are plain closures registered with [`EventBus::subscribe`]. An
//! event is delivered after the state change it reports and before the
//! mutating call returns, so a listener always observes the new state.

use slint::{LogicalPosition, LogicalSize};

/// Something that happened to a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeEvent {
    /// The node wants to be drawn above its siblings.
    RaiseRequest,
    /// The close button was clicked.
    CloseRequest,
    /// An interactive resize wants the node at this size.
    ResizeRequest(LogicalSize),
    /// The slot at this index was created, changed or removed.
    SlotUpdated(i32),
    /// A drag ended. Carries the offset before and after, for undo/redo.
    Dragged {
        from: LogicalPosition,
        to: LogicalPosition,
    },
    OffsetChanged,
    PositionOffsetChanged,
    NodeSelected,
    NodeDeselected,
}

/// Identifies a listener for [`EventBus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&NodeEvent)>;

/// Ordered list of event listeners.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners run in registration order.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&NodeEvent) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver `event` to every listener.
    pub fn emit(&mut self, event: NodeEvent) {
        tracing::trace!(?event, "node event");
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
