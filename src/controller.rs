//! Shared handle that wires a [`NodeWidget`] into a Slint UI.
//!
//! The [`NodeBoxController`] owns the node behind `Rc<RefCell<_>>` so it can be
//! cloned into every callback closure of a window.
//!
//! # Example
//!
//! ```ignore
//! use slint_node_box::{NodeBoxController, NodeEvent};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = NodeBoxController::new("Multiply");
//!     ctrl.set_auto_resize(true);
//!     let w = window.as_weak();
//!
//!     window.on_node_pointer_pressed(ctrl.pointer_pressed_callback());
//!     window.on_node_pointer_moved(ctrl.pointer_moved_callback());
//!     window.on_node_pointer_released(ctrl.pointer_released_callback());
//!
//!     ctrl.subscribe(move |event| {
//!         if let NodeEvent::ResizeRequest(size) = event {
//!             if let Some(w) = w.upgrade() {
//!                 w.set_node_width(size.width);
//!                 w.set_node_height(size.height);
//!             }
//!         }
//!     });
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::connections::Connection;
use crate::error::NodeError;
use crate::events::{ListenerId, NodeEvent};
use crate::interaction::{InputResponse, NodeIntent};
use crate::layout::LayoutChild;
use crate::node::NodeWidget;
use slint::platform::{PointerEventButton, WindowEvent};
use slint::{LogicalPosition, LogicalSize};
use std::cell::RefCell;
use std::rc::Rc;

/// Cloneable handle to one node box.
///
/// Event listeners run while the node is borrowed, so they must not call back
/// into the controller. Forward what they need to the UI instead.
#[derive(Clone)]
pub struct NodeBoxController {
    node: Rc<RefCell<NodeWidget>>,
    auto_resize: Rc<RefCell<bool>>,
    min_size: Rc<RefCell<LogicalSize>>,
}

impl Default for NodeBoxController {
    fn default() -> Self {
        Self::new("")
    }
}

impl NodeBoxController {
    /// Create a controller for a new node attached to a graph container.
    pub fn new(title: impl Into<String>) -> Self {
        let mut node = NodeWidget::new(title);
        node.set_host_attached(true);
        Self::from_node(node)
    }

    /// Wrap an existing node.
    pub fn from_node(node: NodeWidget) -> Self {
        Self {
            node: Rc::new(RefCell::new(node)),
            auto_resize: Rc::new(RefCell::new(false)),
            min_size: Rc::new(RefCell::new(LogicalSize::default())),
        }
    }

    /// Get access to the node.
    pub fn node(&self) -> Rc<RefCell<NodeWidget>> {
        self.node.clone()
    }

    /// Run `f` with the node borrowed mutably.
    pub fn with_node<R>(&self, f: impl FnOnce(&mut NodeWidget) -> R) -> R {
        f(&mut self.node.borrow_mut())
    }

    /// Apply resize requests directly instead of leaving it to the editor
    /// (default: false). Applied sizes never go below the last computed
    /// minimum size.
    pub fn set_auto_resize(&self, enabled: bool) {
        *self.auto_resize.borrow_mut() = enabled;
    }

    pub fn auto_resize(&self) -> bool {
        *self.auto_resize.borrow()
    }

    /// Minimum size recorded by the last [`perform_layout`](Self::perform_layout).
    pub fn minimum_size(&self) -> LogicalSize {
        *self.min_size.borrow()
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: FnMut(&NodeEvent) + 'static,
    {
        self.node.borrow_mut().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.node.borrow_mut().unsubscribe(id)
    }

    /// Lay out `children` and remember their minimum size.
    pub fn perform_layout<C: LayoutChild>(&self, children: &mut [C]) -> usize {
        let mut node = self.node.borrow_mut();
        *self.min_size.borrow_mut() = node.minimum_size(children);
        node.perform_layout(children)
    }

    /// Set the viewport zoom. Connection positions are scaled by it.
    pub fn set_zoom(&self, zoom: f32) {
        self.node.borrow_mut().set_scale(zoom, zoom);
    }

    // === Direct handlers ===

    /// Feed one pointer event in node-local coordinates.
    pub fn handle_pointer_event(&self, event: &WindowEvent) -> Result<InputResponse, NodeError> {
        let response = self.node.borrow_mut().gui_input(event)?;

        if let Some(NodeIntent::Resize(size)) = response.intent {
            if self.auto_resize() {
                let min = self.minimum_size();
                let clamped = LogicalSize::new(size.width.max(min.width), size.height.max(min.height));
                tracing::trace!(width = clamped.width, height = clamped.height, "applied resize");
                self.node.borrow_mut().set_size(clamped);
            }
        }
        Ok(response)
    }

    /// Slint callbacks can only return the consumed flag. A rejected event
    /// (detached node) is already logged and reported as not consumed; use
    /// [`handle_pointer_event`](Self::handle_pointer_event) to see the error.
    fn dispatch(&self, event: WindowEvent) -> bool {
        match self.handle_pointer_event(&event) {
            Ok(response) => response.consumed,
            Err(_) => false,
        }
    }

    /// Handle a primary-button press. Returns whether it was consumed.
    pub fn handle_pressed(&self, x: f32, y: f32) -> bool {
        self.dispatch(WindowEvent::PointerPressed {
            position: LogicalPosition::new(x, y),
            button: PointerEventButton::Left,
        })
    }

    /// Handle pointer motion. Returns whether it was consumed.
    pub fn handle_moved(&self, x: f32, y: f32) -> bool {
        self.dispatch(WindowEvent::PointerMoved {
            position: LogicalPosition::new(x, y),
        })
    }

    /// Handle a primary-button release. Returns whether it was consumed.
    pub fn handle_released(&self, x: f32, y: f32) -> bool {
        self.dispatch(WindowEvent::PointerReleased {
            position: LogicalPosition::new(x, y),
            button: PointerEventButton::Left,
        })
    }

    /// Handle drag start/end reported by the editor.
    pub fn handle_drag(&self, dragging: bool) {
        self.node.borrow_mut().set_drag(dragging);
    }

    // === Callback factories ===

    /// Returns a callback for a node pointer-pressed handler.
    pub fn pointer_pressed_callback(&self) -> impl Fn(f32, f32) -> bool {
        let ctrl = self.clone();
        move |x, y| ctrl.handle_pressed(x, y)
    }

    /// Returns a callback for a node pointer-moved handler.
    pub fn pointer_moved_callback(&self) -> impl Fn(f32, f32) -> bool {
        let ctrl = self.clone();
        move |x, y| ctrl.handle_moved(x, y)
    }

    /// Returns a callback for a node pointer-released handler.
    pub fn pointer_released_callback(&self) -> impl Fn(f32, f32) -> bool {
        let ctrl = self.clone();
        move |x, y| ctrl.handle_released(x, y)
    }

    /// Returns a callback for drag start/end notifications.
    pub fn drag_callback(&self) -> impl Fn(bool) {
        let ctrl = self.clone();
        move |dragging| ctrl.handle_drag(dragging)
    }

    // === Queries ===

    /// Scaled connection points, in slot order.
    pub fn connection_points(&self) -> Vec<Connection> {
        self.node.borrow_mut().connections()
    }

    pub fn size(&self) -> LogicalSize {
        self.node.borrow().size()
    }

    pub fn is_resizing(&self) -> bool {
        self.node.borrow().is_resizing()
    }
}
