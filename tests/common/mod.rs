//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use slint::{LogicalPosition, LogicalSize};
use slint_node_box::NodeEvent;
use std::cell::RefCell;
use std::rc::Rc;

/// Records the events a node publishes, grouped by kind.
#[derive(Default, Clone)]
pub struct EventTracker {
    /// Every event in delivery order
    pub all: Rc<RefCell<Vec<NodeEvent>>>,
    /// Count of raise requests
    pub raise_requests: Rc<RefCell<usize>>,
    /// Count of close requests
    pub close_requests: Rc<RefCell<usize>>,
    /// Requested sizes
    pub resize_requests: Rc<RefCell<Vec<LogicalSize>>>,
    /// Slot indices
    pub slot_updates: Rc<RefCell<Vec<i32>>>,
    /// (from, to)
    pub drags: Rc<RefCell<Vec<(LogicalPosition, LogicalPosition)>>>,
}

impl EventTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener closure that records into this tracker.
    pub fn listener(&self) -> impl FnMut(&NodeEvent) + 'static {
        let tracker = self.clone();
        move |event| tracker.record(event)
    }

    fn record(&self, event: &NodeEvent) {
        self.all.borrow_mut().push(*event);
        match *event {
            NodeEvent::RaiseRequest => *self.raise_requests.borrow_mut() += 1,
            NodeEvent::CloseRequest => *self.close_requests.borrow_mut() += 1,
            NodeEvent::ResizeRequest(size) => self.resize_requests.borrow_mut().push(size),
            NodeEvent::SlotUpdated(idx) => self.slot_updates.borrow_mut().push(idx),
            NodeEvent::Dragged { from, to } => self.drags.borrow_mut().push((from, to)),
            _ => {}
        }
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.all.borrow_mut().clear();
        *self.raise_requests.borrow_mut() = 0;
        *self.close_requests.borrow_mut() = 0;
        self.resize_requests.borrow_mut().clear();
        self.slot_updates.borrow_mut().clear();
        self.drags.borrow_mut().clear();
    }
}
