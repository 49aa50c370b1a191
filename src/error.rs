//! Error types for node box operations.

use thiserror::Error;

/// Caller-contract violations rejected by [`NodeWidget`](crate::NodeWidget).
///
/// A rejected call leaves the node untouched. Out-of-range reads are not
/// errors; they return default values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// Slot indices must be zero or positive.
    #[error("slot index {0} is negative")]
    NegativeSlotIndex(i32),

    /// A field setter was used on a slot that does not exist yet.
    #[error("slot {0} does not exist; create it with set_slot or set_slot_enabled first")]
    SlotNotFound(i32),

    /// Button input arrived while the node is not attached to a graph container.
    #[error("node must be attached to a graph container to handle pointer input")]
    DetachedFromHost,
}
