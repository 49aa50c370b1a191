//! Sparse storage for connector slots.
//!
//! A slot is keyed by a non-negative index. Indices are sparse: a node with
//! slots 0 and 5 stores exactly two entries. A slot that is disabled, has
//! type 0 and the default colour (opaque white) is indistinguishable from an
//! absent slot, so the table never stores one. Writing that combination
//! removes the entry instead.
//!
//! Fields can be addressed generically through [`SlotField`] and
//! [`SlotValue`], which is what editors and inspectors use to list and edit
//! the slots of a node without knowing its layout.

use std::collections::BTreeMap;

use slint::{Color, Image, LogicalPosition};

use crate::error::NodeError;

/// The colour an absent slot reports: opaque white.
pub fn default_slot_color() -> Color {
    Color::from_argb_u8(255, 255, 255, 255)
}

/// A connector descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub enabled: bool,
    /// Caller-defined type tag, used by the editor to decide compatibility.
    pub slot_type: i32,
    pub color: Color,
    /// Top-left corner of the port icon, relative to the frame's content top.
    pub offset: LogicalPosition,
    /// Replaces the theme's port icon when drawing this slot.
    pub icon: Option<Image>,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            enabled: false,
            slot_type: 0,
            color: default_slot_color(),
            offset: LogicalPosition::default(),
            icon: None,
        }
    }
}

impl Slot {
    pub fn new(enabled: bool, slot_type: i32, color: Color, offset: LogicalPosition) -> Self {
        Self {
            enabled,
            slot_type,
            color,
            offset,
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: Image) -> Self {
        self.icon = Some(icon);
        self
    }

    /// True for the canonical empty combination: disabled, type 0, default colour.
    ///
    /// The offset and icon are not part of the check.
    pub fn is_empty(&self) -> bool {
        !self.enabled && self.slot_type == 0 && self.color == default_slot_color()
    }
}

/// Addressable fields of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotField {
    Enabled,
    Type,
    Color,
    Offset,
}

impl SlotField {
    /// All fields, in listing order.
    pub const ALL: [SlotField; 4] = [
        SlotField::Enabled,
        SlotField::Type,
        SlotField::Color,
        SlotField::Offset,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SlotField::Enabled => "enable",
            SlotField::Type => "type",
            SlotField::Color => "color",
            SlotField::Offset => "offset",
        }
    }
}

/// A typed value for one [`SlotField`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotValue {
    Enabled(bool),
    Type(i32),
    Color(Color),
    Offset(LogicalPosition),
}

impl SlotValue {
    pub fn field(&self) -> SlotField {
        match self {
            SlotValue::Enabled(_) => SlotField::Enabled,
            SlotValue::Type(_) => SlotField::Type,
            SlotValue::Color(_) => SlotField::Color,
            SlotValue::Offset(_) => SlotField::Offset,
        }
    }
}

/// What a write did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotChange {
    /// The slot was inserted or overwritten.
    Stored,
    /// The written value was empty, so the index is now absent.
    Evicted,
}

/// Index → slot map plus the number of indices the node exposes.
#[derive(Debug, Clone, Default)]
pub struct SlotTable {
    slots: BTreeMap<i32, Slot>,
    slot_count: i32,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slot indices considered when building connections and
    /// listing fields. Stored slots at or above this index are kept but unused.
    pub fn slot_count(&self) -> i32 {
        self.slot_count
    }

    /// Set the number of exposed slot indices. Negative values clamp to zero.
    pub fn set_slot_count(&mut self, count: i32) {
        self.slot_count = count.max(0);
    }

    /// Number of stored (non-empty) slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, idx: i32) -> Option<&Slot> {
        self.slots.get(&idx)
    }

    pub fn contains(&self, idx: i32) -> bool {
        self.slots.contains_key(&idx)
    }

    /// Stored slots in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &Slot)> + '_ {
        self.slots.iter().map(|(&idx, slot)| (idx, slot))
    }

    /// Enabled slots below [`slot_count`](Self::slot_count), ascending.
    pub fn enabled_slots(&self) -> impl Iterator<Item = (i32, &Slot)> + '_ {
        self.slots
            .range(0..self.slot_count)
            .filter(|(_, slot)| slot.enabled)
            .map(|(&idx, slot)| (idx, slot))
    }

    /// Store `slot` at `idx`, or evict the index when `slot` is empty.
    pub fn set(&mut self, idx: i32, slot: Slot) -> Result<SlotChange, NodeError> {
        if idx < 0 {
            return Err(NodeError::NegativeSlotIndex(idx));
        }
        if slot.is_empty() {
            self.slots.remove(&idx);
            return Ok(SlotChange::Evicted);
        }
        self.slots.insert(idx, slot);
        Ok(SlotChange::Stored)
    }

    /// Remove `idx`. Returns the removed slot, if there was one.
    pub fn remove(&mut self, idx: i32) -> Option<Slot> {
        self.slots.remove(&idx)
    }

    /// Remove every slot, returning the removed indices in ascending order.
    pub fn clear(&mut self) -> Vec<i32> {
        let removed = self.slots.keys().copied().collect();
        self.slots.clear();
        removed
    }

    // === Field accessors ===

    pub fn is_enabled(&self, idx: i32) -> bool {
        self.slots.get(&idx).is_some_and(|s| s.enabled)
    }

    pub fn slot_type(&self, idx: i32) -> i32 {
        self.slots.get(&idx).map_or(0, |s| s.slot_type)
    }

    pub fn color(&self, idx: i32) -> Color {
        self.slots.get(&idx).map_or_else(default_slot_color, |s| s.color)
    }

    pub fn offset(&self, idx: i32) -> LogicalPosition {
        self.slots.get(&idx).map_or_else(LogicalPosition::default, |s| s.offset)
    }

    pub fn icon(&self, idx: i32) -> Option<&Image> {
        self.slots.get(&idx).and_then(|s| s.icon.as_ref())
    }

    /// Enable or disable `idx`, creating a default slot when absent.
    pub fn set_enabled(&mut self, idx: i32, enabled: bool) -> Result<SlotChange, NodeError> {
        let mut slot = self.existing_or_default(idx)?;
        slot.enabled = enabled;
        self.set(idx, slot)
    }

    /// Change the type of an existing slot.
    pub fn set_type(&mut self, idx: i32, slot_type: i32) -> Result<SlotChange, NodeError> {
        let mut slot = self.existing(idx)?;
        slot.slot_type = slot_type;
        self.set(idx, slot)
    }

    /// Change the colour of an existing slot.
    pub fn set_color(&mut self, idx: i32, color: Color) -> Result<SlotChange, NodeError> {
        let mut slot = self.existing(idx)?;
        slot.color = color;
        self.set(idx, slot)
    }

    /// Move the anchor of an existing slot.
    pub fn set_offset(
        &mut self,
        idx: i32,
        offset: LogicalPosition,
    ) -> Result<SlotChange, NodeError> {
        let mut slot = self.existing(idx)?;
        slot.offset = offset;
        self.set(idx, slot)
    }

    // === Generic field access ===

    /// Read one field. Absent slots report default values.
    pub fn field(&self, idx: i32, field: SlotField) -> SlotValue {
        match field {
            SlotField::Enabled => SlotValue::Enabled(self.is_enabled(idx)),
            SlotField::Type => SlotValue::Type(self.slot_type(idx)),
            SlotField::Color => SlotValue::Color(self.color(idx)),
            SlotField::Offset => SlotValue::Offset(self.offset(idx)),
        }
    }

    /// Write one field. Absent slots start from defaults, so any field can
    /// create a slot through this path.
    pub fn set_field(&mut self, idx: i32, value: SlotValue) -> Result<SlotChange, NodeError> {
        let mut slot = self.existing_or_default(idx)?;
        match value {
            SlotValue::Enabled(enabled) => slot.enabled = enabled,
            SlotValue::Type(slot_type) => slot.slot_type = slot_type,
            SlotValue::Color(color) => slot.color = color,
            SlotValue::Offset(offset) => slot.offset = offset,
        }
        self.set(idx, slot)
    }

    /// Every `(index, field)` pair below [`slot_count`](Self::slot_count).
    pub fn fields(&self) -> impl Iterator<Item = (i32, SlotField)> {
        (0..self.slot_count)
            .flat_map(|idx| SlotField::ALL.into_iter().map(move |field| (idx, field)))
    }

    fn existing(&self, idx: i32) -> Result<Slot, NodeError> {
        if idx < 0 {
            return Err(NodeError::NegativeSlotIndex(idx));
        }
        self.slots.get(&idx).cloned().ok_or(NodeError::SlotNotFound(idx))
    }

    fn existing_or_default(&self, idx: i32) -> Result<Slot, NodeError> {
        if idx < 0 {
            return Err(NodeError::NegativeSlotIndex(idx));
        }
        Ok(self.slots.get(&idx).cloned().unwrap_or_default())
    }
}
