//! # Slint Node Box
//!
//! The node widget of a visual graph editor: a titled, resizable box that
//! stacks child widgets vertically and exposes numbered connector slots on
//! its edges.
//!
//! ## Features
//!
//! - **Vertical layout** - Children keep their minimum height or share the
//!   leftover space by stretch ratio
//! - **Connector slots** - Sparse, index-addressed ports with type, colour,
//!   anchor offset and optional icon
//! - **Connection cache** - Anchors for enabled slots are rebuilt lazily and
//!   scaled at query time
//! - **Interactive resize** - Dragging the bottom-right handle emits resize
//!   requests; the owner decides whether to apply them
//! - **Comment nodes** - Only the title band and resize handle are hit, so
//!   nodes placed on top stay clickable
//!
//! ## Quick Start
//!
//! ```ignore
//! use slint_node_box::{NodeWidget, NodeEvent, SimpleChild};
//! use slint::{Color, LogicalPosition, LogicalSize};
//!
//! let mut node = NodeWidget::new("Add");
//! node.set_host_attached(true);
//! node.set_slot_count(1);
//! node.set_slot(0, true, 1, Color::from_rgb_u8(255, 180, 0), LogicalPosition::new(-5.0, 0.0), None)?;
//! node.subscribe(|event| println!("{event:?}"));
//!
//! let mut children = vec![SimpleChild::fixed(100.0, 24.0)];
//! node.perform_layout(&mut children);
//! ```
//!
//! ## Core Types
//!
//! - [`NodeWidget`] - The node itself
//! - [`NodeBoxController`] - Shared handle with Slint callback factories
//! - [`SlotTable`] / [`Slot`] - Connector storage
//! - [`NodeStyle`] - Theme metrics
//! - [`NodeEvent`] - Notifications published by a node

pub mod connections;
pub mod controller;
pub mod error;
pub mod events;
pub mod frame;
pub mod interaction;
pub mod layout;
pub mod node;
pub mod slots;
pub mod style;

pub use connections::{Connection, ConnectionCache};
pub use controller::NodeBoxController;
pub use error::NodeError;
pub use events::{EventBus, ListenerId, NodeEvent};
pub use frame::{FrameGeometry, FrameStyle, Overlay, PortDecoration};
pub use hit_test::Rect;
pub use interaction::{DragTracker, GestureState, InputResponse, InteractionController, NodeIntent};
pub use layout::{layout_children, minimum_size, solve, ChildHint, LayoutChild, LayoutParams, SimpleChild};
pub use node::NodeWidget;
pub use slots::{default_slot_color, Slot, SlotChange, SlotField, SlotTable, SlotValue};
pub use style::{FontMetrics, NodeStyle, StyleMargins};
