//! Lazily rebuilt connection anchors.
//!
//! The editor draws links between connection points, not between slots.
//! [`ConnectionCache`] derives one [`Connection`] per enabled slot (in
//! ascending slot order) and keeps it until something marks it dirty. Every
//! read rebuilds a dirty cache first, so a stale list can never be observed.
//!
//! Positions are stored unscaled. The node's scale is applied when a position
//! is read, so zooming never invalidates the cache.

use slint::{Color, LogicalPosition};

use crate::slots::SlotTable;
use crate::style::NodeStyle;

/// A connection point derived from an enabled slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Index of the slot this point was derived from.
    pub slot: i32,
    /// Centre of the port icon in node-local, unscaled coordinates.
    pub position: LogicalPosition,
    pub connection_type: i32,
    pub color: Color,
}

/// Derived list of connection points with dirty tracking.
#[derive(Debug, Clone)]
pub struct ConnectionCache {
    entries: Vec<Connection>,
    dirty: bool,
}

impl Default for ConnectionCache {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            dirty: true,
        }
    }
}

impl ConnectionCache {
    /// Create an empty cache that rebuilds on first read.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a rebuild on the next read.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuild from `slots` and `style` if the cache is dirty.
    pub fn refresh(&mut self, slots: &SlotTable, style: &NodeStyle) {
        if self.dirty {
            self.rebuild(slots, style);
        }
    }

    fn rebuild(&mut self, slots: &SlotTable, style: &NodeStyle) {
        let top = style.frame.top;
        let (half_w, half_h) = style.port_half_extent();

        self.entries.clear();
        self.entries.extend(slots.enabled_slots().map(|(idx, slot)| Connection {
            slot: idx,
            position: LogicalPosition::new(
                slot.offset.x + half_w,
                top + slot.offset.y + half_h,
            ),
            connection_type: slot.slot_type,
            color: slot.color,
        }));
        self.dirty = false;

        tracing::trace!(count = self.entries.len(), "rebuilt connection cache");
    }

    /// Entries as of the last rebuild. Call [`refresh`](Self::refresh) first.
    pub fn entries(&self) -> &[Connection] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Scaled position of connection `idx`, or the origin when out of range.
    pub fn position(&self, idx: usize, scale: (f32, f32)) -> LogicalPosition {
        self.entries
            .get(idx)
            .map(|c| scaled(c.position, scale))
            .unwrap_or_default()
    }

    /// Type of connection `idx`, or 0 when out of range.
    pub fn connection_type(&self, idx: usize) -> i32 {
        self.entries.get(idx).map_or(0, |c| c.connection_type)
    }

    /// Colour of connection `idx`, or `Color::default()` when out of range.
    pub fn color(&self, idx: usize) -> Color {
        self.entries.get(idx).map(|c| c.color).unwrap_or_default()
    }
}

/// Apply a per-axis scale factor to a node-local point.
pub fn scaled(position: LogicalPosition, scale: (f32, f32)) -> LogicalPosition {
    LogicalPosition::new(position.x * scale.0, position.y * scale.1)
}
