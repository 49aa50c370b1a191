//! Test harness hosting one node box in a Slint window.
//!
//! Pointer events are dispatched to the window; the window's touch area
//! forwards them to a [`NodeBoxController`] in node-local coordinates.

#![allow(dead_code)]

use super::EventTracker;
use slint::{
    platform::{PointerEventButton, WindowEvent},
    Color, ComponentHandle, LogicalPosition, LogicalSize, Model, ModelRc, SharedString, VecModel,
};
use slint_node_box::{NodeBoxController, NodeStyle, SimpleChild, StyleMargins};
use std::rc::Rc;

// Include the compiled UI from build.rs
slint::include_modules!();

/// Initialize the testing backend for this thread.
/// With init_no_event_loop(), each test thread can have its own backend instance.
fn init_testing_backend() {
    use std::cell::Cell;
    thread_local! {
        static INITIALIZED: Cell<bool> = const { Cell::new(false) };
    }

    INITIALIZED.with(|init| {
        if !init.get() {
            i_slint_backend_testing::init_no_event_loop();
            init.set(true);
        }
    });
}

/// Frame used by the harness: a 24px title band, no side margins.
pub fn harness_style() -> NodeStyle {
    NodeStyle::default()
        .with_frame(StyleMargins::new(0.0, 24.0, 0.0, 0.0))
        .with_port_size(LogicalSize::new(10.0, 10.0))
        .with_resizer_size(LogicalSize::new(12.0, 12.0))
}

pub struct NodeBoxHarness {
    pub window: TestWindow,
    pub ctrl: NodeBoxController,
    pub tracker: EventTracker,
    pub children: Vec<SimpleChild>,
    pub ports: Rc<VecModel<PortData>>,
}

impl NodeBoxHarness {
    /// A resizable 200x120 node at (50, 50) with two children.
    pub fn new() -> Self {
        Self::with_children(vec![
            SimpleChild::fixed(120.0, 20.0),
            SimpleChild::stretching(120.0, 30.0, 1.0),
        ])
    }

    pub fn with_children(children: Vec<SimpleChild>) -> Self {
        init_testing_backend();
        let window = TestWindow::new().unwrap();
        window.show().unwrap();
        let ctrl = NodeBoxController::new("Node");
        let tracker = EventTracker::new();

        ctrl.with_node(|node| {
            node.set_style(harness_style());
            node.set_resizable(true);
            node.set_size(LogicalSize::new(200.0, 120.0));
        });
        ctrl.subscribe(tracker.listener());

        window.on_node_pointer_pressed(ctrl.pointer_pressed_callback());
        window.on_node_pointer_moved(ctrl.pointer_moved_callback());
        window.on_node_pointer_released(ctrl.pointer_released_callback());

        let ports = Rc::new(VecModel::default());
        window.set_ports(ModelRc::from(ports.clone()));

        let mut harness = Self {
            window,
            ctrl,
            tracker,
            children,
            ports,
        };
        harness.layout();
        harness
    }

    /// Run a layout pass and push node state into the window.
    pub fn layout(&mut self) {
        self.ctrl.perform_layout(&mut self.children);
        self.sync();
    }

    /// Push node state into the window.
    pub fn sync(&self) {
        let node = self.ctrl.node();
        let node = node.borrow();
        let size = node.size();
        self.window.set_node_width(size.width);
        self.window.set_node_height(size.height);
        self.window.set_node_title(SharedString::from(node.title()));
        drop(node);

        let points: Vec<PortData> = self
            .ctrl
            .connection_points()
            .into_iter()
            .map(|c| PortData {
                x: c.position.x,
                y: c.position.y,
                color: c.color,
            })
            .collect();
        self.ports.set_vec(points);
    }

    /// Process pending timers and animations.
    pub fn pump_events(&self) {
        slint::platform::update_timers_and_animations();
    }

    /// Window position of a node-local point.
    pub fn to_window(&self, x: f32, y: f32) -> (f32, f32) {
        (self.window.get_node_x() + x, self.window.get_node_y() + y)
    }

    pub fn port_count(&self) -> usize {
        self.ports.row_count()
    }

    pub fn port(&self, idx: usize) -> Option<PortData> {
        self.ports.row_data(idx)
    }

    pub fn slot_color() -> Color {
        Color::from_argb_u8(255, 100, 180, 255)
    }

    // === Mouse event helpers ===
    //
    // Coordinates are node-local; they are converted to window space before
    // dispatching.

    pub fn mouse_down(&self, x: f32, y: f32) {
        let (wx, wy) = self.to_window(x, y);
        self.window.window().dispatch_event(WindowEvent::PointerPressed {
            position: LogicalPosition::new(wx, wy),
            button: PointerEventButton::Left,
        });
        self.pump_events();
        self.sync();
    }

    pub fn mouse_move(&self, x: f32, y: f32) {
        let (wx, wy) = self.to_window(x, y);
        self.window.window().dispatch_event(WindowEvent::PointerMoved {
            position: LogicalPosition::new(wx, wy),
        });
        self.pump_events();
        self.sync();
    }

    pub fn mouse_up(&self, x: f32, y: f32) {
        let (wx, wy) = self.to_window(x, y);
        self.window.window().dispatch_event(WindowEvent::PointerReleased {
            position: LogicalPosition::new(wx, wy),
            button: PointerEventButton::Left,
        });
        self.pump_events();
        self.sync();
    }

    /// Press on `from`, move to `to`, release at `to`.
    pub fn drag(&self, from: (f32, f32), to: (f32, f32)) {
        self.mouse_down(from.0, from.1);
        self.mouse_move(to.0, to.1);
        self.mouse_up(to.0, to.1);
    }
}
