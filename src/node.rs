//! The node box widget.
//!
//! [`NodeWidget`] ties the pieces together: it owns the slot table and the
//! connection cache, runs the vertical layout over children handed in by the
//! host, feeds pointer events through the gesture controller, and publishes
//! [`NodeEvent`]s.
//!
//! # Example
//!
//! ```ignore
//! use slint_node_box::{NodeWidget, NodeEvent, SimpleChild};
//! use slint::{Color, LogicalPosition, LogicalSize};
//!
//! let mut node = NodeWidget::new("Add");
//! node.set_host_attached(true);
//! node.set_resizable(true);
//! node.set_slot_count(2);
//! node.set_slot(0, true, 1, Color::from_rgb_u8(100, 180, 255), LogicalPosition::new(-5.0, 4.0), None)?;
//! node.set_slot(1, true, 1, Color::from_rgb_u8(100, 180, 255), LogicalPosition::new(145.0, 4.0), None)?;
//!
//! node.subscribe(|event| {
//!     if let NodeEvent::ResizeRequest(size) = event {
//!         println!("resize to {}x{}", size.width, size.height);
//!     }
//! });
//!
//! let mut children = vec![SimpleChild::fixed(120.0, 20.0), SimpleChild::stretching(120.0, 40.0, 1.0)];
//! node.set_size(LogicalSize::new(160.0, 120.0));
//! node.perform_layout(&mut children);
//!
//! for i in 0..node.connection_count() {
//!     let anchor = node.connection_position(i);
//! }
//! ```

use slint::platform::WindowEvent;
use slint::{Color, Image, LogicalPosition, LogicalSize};

use crate::connections::{scaled, Connection, ConnectionCache};
use crate::error::NodeError;
use crate::events::{EventBus, ListenerId, NodeEvent};
use crate::frame::{close_button_rect, frame_geometry, FrameGeometry, FrameInputs, FrameStyle, Overlay};
use crate::hit_test::{comment_has_point, is_outside_drag_band, Rect};
use crate::interaction::{DragTracker, HitContext, InputResponse, InteractionController, NodeIntent};
use crate::layout::{self, LayoutChild, LayoutParams};
use crate::slots::{Slot, SlotChange, SlotField, SlotTable, SlotValue};
use crate::style::NodeStyle;

fn reject(err: NodeError) -> NodeError {
    tracing::warn!(%err, "rejected node operation");
    err
}

/// A titled, resizable container with connector slots.
#[derive(Debug)]
pub struct NodeWidget {
    title: String,
    offset: LogicalPosition,
    position_offset: LogicalPosition,
    size: LogicalSize,
    scale: (f32, f32),
    selected: bool,
    selectable: bool,
    resizable: bool,
    draggable: bool,
    comment: bool,
    overlay: Overlay,
    show_close: bool,
    always_on_top: bool,
    visible: bool,
    host_attached: bool,
    custom_drag_height: f32,
    style: NodeStyle,
    slots: SlotTable,
    connections: ConnectionCache,
    interaction: InteractionController,
    drag: DragTracker,
    events: EventBus,
}

impl Default for NodeWidget {
    fn default() -> Self {
        Self::new("")
    }
}

impl NodeWidget {
    /// Create a detached node with the default style.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            offset: LogicalPosition::default(),
            position_offset: LogicalPosition::default(),
            size: LogicalSize::default(),
            scale: (1.0, 1.0),
            selected: false,
            selectable: true,
            resizable: false,
            draggable: true,
            comment: false,
            overlay: Overlay::None,
            show_close: false,
            always_on_top: false,
            visible: true,
            host_attached: false,
            custom_drag_height: 0.0,
            style: NodeStyle::default(),
            slots: SlotTable::new(),
            connections: ConnectionCache::new(),
            interaction: InteractionController::new(),
            drag: DragTracker::new(),
            events: EventBus::new(),
        }
    }

    // === Events ===

    /// Register an event listener.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&NodeEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    // === Style ===

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    /// Replace the theme metrics. Connection anchors are rebuilt on next read;
    /// the host should run a layout pass afterwards.
    pub fn set_style(&mut self, style: NodeStyle) {
        self.style = style;
        self.connections.invalidate();
    }

    // === Geometry ===

    pub fn size(&self) -> LogicalSize {
        self.size
    }

    /// Set the node size. Negative components clamp to zero.
    pub fn set_size(&mut self, size: LogicalSize) {
        self.size = LogicalSize::new(size.width.max(0.0), size.height.max(0.0));
    }

    pub fn scale(&self) -> (f32, f32) {
        self.scale
    }

    /// Scale applied to connection positions when they are read.
    pub fn set_scale(&mut self, x: f32, y: f32) {
        self.scale = (x, y);
    }

    /// Width the title row needs, including the close button.
    pub fn header_width(&self) -> f32 {
        let mut width = self.style.title_font.string_width(&self.title);
        if self.show_close {
            width += self.style.separation + self.style.close_size.width;
        }
        width
    }

    /// Smallest size that fits the title row and `children`, frame included.
    pub fn minimum_size<C: LayoutChild>(&self, children: &[C]) -> LogicalSize {
        layout::minimum_size(
            children,
            self.header_width(),
            self.style.separation,
            &self.style.frame,
        )
    }

    /// Lay out `children` inside the node.
    ///
    /// A node that is not resizable takes exactly its minimum size; a
    /// resizable node grows to at least its minimum size. Returns the number
    /// of children that received a rectangle.
    pub fn perform_layout<C: LayoutChild>(&mut self, children: &mut [C]) -> usize {
        let min = self.minimum_size(children);
        self.size = if self.resizable {
            LogicalSize::new(self.size.width.max(min.width), self.size.height.max(min.height))
        } else {
            min
        };

        let params = LayoutParams {
            size: self.size,
            separation: self.style.separation,
            margins: self.style.frame,
        };
        let laid_out = layout::layout_children(children, &params);
        self.connections.invalidate();
        laid_out
    }

    // === Node properties ===

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn offset(&self) -> LogicalPosition {
        self.offset
    }

    /// Move the node. Always emits [`NodeEvent::OffsetChanged`].
    pub fn set_offset(&mut self, offset: LogicalPosition) {
        self.offset = offset;
        self.events.emit(NodeEvent::OffsetChanged);
    }

    pub fn position_offset(&self) -> LogicalPosition {
        self.position_offset
    }

    /// Set the graph-space position. Emits [`NodeEvent::PositionOffsetChanged`]
    /// only when the value changes.
    pub fn set_position_offset(&mut self, offset: LogicalPosition) {
        if self.position_offset == offset {
            return;
        }
        self.position_offset = offset;
        self.events.emit(NodeEvent::PositionOffsetChanged);
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Select or deselect. Ignored for non-selectable nodes and when nothing
    /// changes.
    pub fn set_selected(&mut self, selected: bool) {
        if !self.selectable || self.selected == selected {
            return;
        }
        self.selected = selected;
        self.events.emit(if selected {
            NodeEvent::NodeSelected
        } else {
            NodeEvent::NodeDeselected
        });
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    /// Making a node non-selectable deselects it first.
    pub fn set_selectable(&mut self, selectable: bool) {
        if !selectable {
            self.set_selected(false);
        }
        self.selectable = selectable;
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn set_resizable(&mut self, resizable: bool) {
        self.resizable = resizable;
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
    }

    pub fn is_comment(&self) -> bool {
        self.comment
    }

    pub fn set_comment(&mut self, comment: bool) {
        self.comment = comment;
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn set_overlay(&mut self, overlay: Overlay) {
        self.overlay = overlay;
    }

    pub fn is_close_button_visible(&self) -> bool {
        self.show_close
    }

    pub fn set_show_close_button(&mut self, show: bool) {
        self.show_close = show;
    }

    pub fn is_always_on_top(&self) -> bool {
        self.always_on_top
    }

    pub fn set_always_on_top(&mut self, on_top: bool) {
        self.always_on_top = on_top;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hidden nodes ignore all input.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.interaction.cancel();
        }
    }

    pub fn is_host_attached(&self) -> bool {
        self.host_attached
    }

    /// Mark whether the node lives inside a graph container. Button input is
    /// rejected while detached.
    pub fn set_host_attached(&mut self, attached: bool) {
        self.host_attached = attached;
        if !attached {
            self.interaction.cancel();
        }
    }

    pub fn custom_drag_height(&self) -> f32 {
        self.custom_drag_height
    }

    /// Restrict drag starts to the top `height` pixels. Zero disables.
    pub fn set_custom_drag_height(&mut self, height: f32) {
        self.custom_drag_height = height;
    }

    // === Slots ===

    /// Read-only view of the slot table.
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    pub fn slot_count(&self) -> i32 {
        self.slots.slot_count()
    }

    /// Number of slot indices exposed for connections and field listing.
    pub fn set_slot_count(&mut self, count: i32) {
        self.slots.set_slot_count(count);
        self.connections.invalidate();
    }

    /// Create or overwrite slot `idx`.
    ///
    /// Writing the empty combination (disabled, type 0, opaque white) removes
    /// the slot instead. Emits [`NodeEvent::SlotUpdated`] either way.
    pub fn set_slot(
        &mut self,
        idx: i32,
        enabled: bool,
        slot_type: i32,
        color: Color,
        offset: LogicalPosition,
        icon: Option<Image>,
    ) -> Result<(), NodeError> {
        let slot = Slot {
            enabled,
            slot_type,
            color,
            offset,
            icon,
        };
        let change = self.slots.set(idx, slot).map_err(reject)?;
        self.slot_changed(idx, change);
        Ok(())
    }

    /// Remove slot `idx`. Emits [`NodeEvent::SlotUpdated`] if it existed.
    pub fn clear_slot(&mut self, idx: i32) {
        if self.slots.remove(idx).is_some() {
            self.slot_changed(idx, SlotChange::Evicted);
        }
    }

    /// Remove every slot, emitting [`NodeEvent::SlotUpdated`] per removed index.
    pub fn clear_all_slots(&mut self) {
        let removed = self.slots.clear();
        self.connections.invalidate();
        for idx in removed {
            self.events.emit(NodeEvent::SlotUpdated(idx));
        }
    }

    pub fn is_slot_enabled(&self, idx: i32) -> bool {
        self.slots.is_enabled(idx)
    }

    /// Enable or disable slot `idx`, creating it when absent.
    pub fn set_slot_enabled(&mut self, idx: i32, enabled: bool) -> Result<(), NodeError> {
        let change = self.slots.set_enabled(idx, enabled).map_err(reject)?;
        self.slot_changed(idx, change);
        Ok(())
    }

    pub fn slot_type(&self, idx: i32) -> i32 {
        self.slots.slot_type(idx)
    }

    /// Change the type of an existing slot.
    pub fn set_slot_type(&mut self, idx: i32, slot_type: i32) -> Result<(), NodeError> {
        let change = self.slots.set_type(idx, slot_type).map_err(reject)?;
        self.slot_changed(idx, change);
        Ok(())
    }

    pub fn slot_color(&self, idx: i32) -> Color {
        self.slots.color(idx)
    }

    /// Change the colour of an existing slot.
    pub fn set_slot_color(&mut self, idx: i32, color: Color) -> Result<(), NodeError> {
        let change = self.slots.set_color(idx, color).map_err(reject)?;
        self.slot_changed(idx, change);
        Ok(())
    }

    pub fn slot_offset(&self, idx: i32) -> LogicalPosition {
        self.slots.offset(idx)
    }

    /// Move the anchor of an existing slot.
    pub fn set_slot_offset(&mut self, idx: i32, offset: LogicalPosition) -> Result<(), NodeError> {
        let change = self.slots.set_offset(idx, offset).map_err(reject)?;
        self.slot_changed(idx, change);
        Ok(())
    }

    pub fn slot_icon(&self, idx: i32) -> Option<&Image> {
        self.slots.icon(idx)
    }

    /// Read one slot field by name.
    pub fn slot_field(&self, idx: i32, field: SlotField) -> SlotValue {
        self.slots.field(idx, field)
    }

    /// Write one slot field, creating the slot from defaults when absent.
    pub fn set_slot_field(&mut self, idx: i32, value: SlotValue) -> Result<(), NodeError> {
        let change = self.slots.set_field(idx, value).map_err(reject)?;
        self.slot_changed(idx, change);
        Ok(())
    }

    /// Every editable `(index, field)` pair, for inspectors.
    pub fn slot_fields(&self) -> impl Iterator<Item = (i32, SlotField)> {
        self.slots.fields()
    }

    fn slot_changed(&mut self, idx: i32, change: SlotChange) {
        if change == SlotChange::Evicted {
            tracing::debug!(idx, "slot removed");
        }
        self.connections.invalidate();
        self.events.emit(NodeEvent::SlotUpdated(idx));
    }

    // === Connections ===

    fn refresh_connections(&mut self) {
        self.connections.refresh(&self.slots, &self.style);
    }

    /// Number of connection points (enabled slots below the slot count).
    pub fn connection_count(&mut self) -> usize {
        self.refresh_connections();
        self.connections.count()
    }

    /// Scaled anchor of connection `idx`, or the origin when out of range.
    pub fn connection_position(&mut self, idx: usize) -> LogicalPosition {
        self.refresh_connections();
        self.connections.position(idx, self.scale)
    }

    /// Type of connection `idx`, or 0 when out of range.
    pub fn connection_type(&mut self, idx: usize) -> i32 {
        self.refresh_connections();
        self.connections.connection_type(idx)
    }

    /// Colour of connection `idx`, or `Color::default()` when out of range.
    pub fn connection_color(&mut self, idx: usize) -> Color {
        self.refresh_connections();
        self.connections.color(idx)
    }

    /// All connection points with scaled positions.
    pub fn connections(&mut self) -> Vec<Connection> {
        self.refresh_connections();
        let scale = self.scale;
        self.connections
            .entries()
            .iter()
            .map(|c| Connection {
                position: scaled(c.position, scale),
                ..*c
            })
            .collect()
    }

    // === Decorations and hit testing ===

    /// Frame decorations for the current state.
    pub fn decorations(&self) -> FrameGeometry {
        frame_geometry(&FrameInputs {
            size: self.size,
            selected: self.selected,
            comment: self.comment,
            overlay: self.overlay,
            show_close: self.show_close,
            resizable: self.resizable,
            style: &self.style,
            slots: &self.slots,
        })
    }

    fn close_rect(&self) -> Option<Rect> {
        let margins = FrameStyle::select(self.comment, self.selected).margins(&self.style);
        close_button_rect(self.size, &margins, &self.style, self.show_close)
    }

    /// Whether `point` (node-local) belongs to the node.
    ///
    /// Comment nodes only claim their title band and resize handle.
    pub fn has_point(&self, point: LogicalPosition) -> bool {
        if self.comment {
            let band = FrameStyle::select(true, self.selected).margins(&self.style).top;
            return comment_has_point(point, self.size, band, self.style.resizer_size);
        }
        Rect::from_origin_size(LogicalPosition::default(), self.size).contains(point)
    }

    /// Whether a press at `point` falls outside the custom drag band.
    pub fn is_outside_drag_band(&self, point: LogicalPosition) -> bool {
        is_outside_drag_band(point, self.size, self.custom_drag_height)
    }

    // === Input ===

    pub fn is_resizing(&self) -> bool {
        self.interaction.is_resizing()
    }

    /// Handle one pointer event in node-local coordinates.
    ///
    /// Intents are published as events before this returns. Button events
    /// are rejected while the node is not attached to a graph container.
    pub fn gui_input(&mut self, event: &WindowEvent) -> Result<InputResponse, NodeError> {
        if !self.visible {
            return Ok(InputResponse::ignored());
        }

        let is_button = matches!(
            event,
            WindowEvent::PointerPressed { .. } | WindowEvent::PointerReleased { .. }
        );
        if is_button && !self.host_attached {
            return Err(reject(NodeError::DetachedFromHost));
        }

        let ctx = HitContext {
            size: self.size,
            resizable: self.resizable,
            resizer_size: self.style.resizer_size,
            close_rect: self.close_rect(),
        };
        let response = self.interaction.handle_event(event, &ctx);

        match response.intent {
            Some(NodeIntent::Raise) => self.events.emit(NodeEvent::RaiseRequest),
            Some(NodeIntent::Close) => self.events.emit(NodeEvent::CloseRequest),
            Some(NodeIntent::Resize(size)) => self.events.emit(NodeEvent::ResizeRequest(size)),
            None => {}
        }
        Ok(response)
    }

    /// Start (`true`) or finish (`false`) a drag.
    ///
    /// Finishing emits [`NodeEvent::Dragged`] with the offset captured at the
    /// start and the current offset.
    pub fn set_drag(&mut self, dragging: bool) {
        if dragging {
            self.drag.begin(self.offset);
        } else {
            let (from, to) = self.drag.end(self.offset);
            self.events.emit(NodeEvent::Dragged { from, to });
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Offset captured when the current (or last) drag started.
    pub fn drag_from(&self) -> LogicalPosition {
        self.drag.origin()
    }
}
