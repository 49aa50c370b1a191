//! Pointer gestures of a node box.
//!
//! [`InteractionController`] turns raw Slint window events into intents. It
//! never changes the node itself: a press on the resize handle starts a
//! resize gesture, and every following motion reports the size the node
//! *should* have. The owner decides whether to apply it.
//!
//! Press priority, highest first:
//!
//! 1. close button (when shown) → [`NodeIntent::Close`], consumed
//! 2. resize handle (when resizable) → enter resizing, consumed
//! 3. anywhere else → [`NodeIntent::Raise`], not consumed
//!
//! Releasing the primary button always ends a resize.
//!
//! Dragging is driven by the editor, not by hit testing: it calls
//! [`DragTracker::begin`] when a node starts moving and
//! [`DragTracker::end`] when it stops, and gets back the two endpoints for its
//! undo history.

use slint::platform::{PointerEventButton, WindowEvent};
use slint::{LogicalPosition, LogicalSize};

use crate::hit_test::{is_on_resize_handle, Rect};

/// Something the node asks its owner to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeIntent {
    /// Bring the node to the front.
    Raise,
    /// The close button was clicked.
    Close,
    /// Resize the node to this size.
    Resize(LogicalSize),
}

/// Result of feeding one event to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputResponse {
    pub intent: Option<NodeIntent>,
    /// When true the event must not propagate to the editor underneath.
    pub consumed: bool,
}

impl InputResponse {
    pub fn ignored() -> Self {
        Self::default()
    }

    fn consumed(intent: Option<NodeIntent>) -> Self {
        Self { intent, consumed: true }
    }

    fn passed(intent: NodeIntent) -> Self {
        Self {
            intent: Some(intent),
            consumed: false,
        }
    }
}

/// Gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// A resize is in progress, anchored at the press position and the size
    /// the node had at that moment.
    Resizing {
        from: LogicalPosition,
        from_size: LogicalSize,
    },
}

/// Node state the controller needs to hit-test a press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitContext {
    pub size: LogicalSize,
    pub resizable: bool,
    pub resizer_size: LogicalSize,
    /// Close button rectangle, `None` when the button is hidden.
    pub close_rect: Option<Rect>,
}

/// Resize/raise/close state machine.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: GestureState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.state, GestureState::Resizing { .. })
    }

    /// Drop any gesture in progress, e.g. when the node loses the pointer grab.
    pub fn cancel(&mut self) {
        if self.is_resizing() {
            tracing::debug!("resize gesture cancelled");
        }
        self.state = GestureState::Idle;
    }

    /// Feed one window event, in node-local coordinates.
    pub fn handle_event(&mut self, event: &WindowEvent, ctx: &HitContext) -> InputResponse {
        match event {
            WindowEvent::PointerPressed { position, button: PointerEventButton::Left, .. } => {
                self.press(*position, ctx)
            }
            WindowEvent::PointerReleased { button: PointerEventButton::Left, .. } => {
                self.release()
            }
            WindowEvent::PointerMoved { position, .. } => self.motion(*position),
            // Leaving the node does not end a resize; only the release does.
            WindowEvent::PointerExited => InputResponse::ignored(),
            _ => InputResponse::ignored(),
        }
    }

    fn press(&mut self, position: LogicalPosition, ctx: &HitContext) -> InputResponse {
        if let Some(close) = ctx.close_rect {
            if !close.is_empty() && close.contains(position) {
                return InputResponse::consumed(Some(NodeIntent::Close));
            }
        }

        if ctx.resizable && is_on_resize_handle(position, ctx.size, ctx.resizer_size) {
            self.state = GestureState::Resizing {
                from: position,
                from_size: ctx.size,
            };
            tracing::debug!(x = position.x, y = position.y, "resize gesture started");
            return InputResponse::consumed(None);
        }

        InputResponse::passed(NodeIntent::Raise)
    }

    fn release(&mut self) -> InputResponse {
        let was_resizing = self.is_resizing();
        self.state = GestureState::Idle;
        if was_resizing {
            tracing::debug!("resize gesture finished");
            return InputResponse::consumed(None);
        }
        InputResponse::ignored()
    }

    fn motion(&mut self, position: LogicalPosition) -> InputResponse {
        match self.state {
            GestureState::Resizing { from, from_size } => {
                let size = LogicalSize::new(
                    from_size.width + (position.x - from.x),
                    from_size.height + (position.y - from.y),
                );
                InputResponse::consumed(Some(NodeIntent::Resize(size)))
            }
            GestureState::Idle => InputResponse::ignored(),
        }
    }
}

/// Two-point capture of a drag, for undo/redo.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragTracker {
    origin: LogicalPosition,
    active: bool,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `offset` as the drag origin.
    pub fn begin(&mut self, offset: LogicalPosition) {
        self.origin = offset;
        self.active = true;
    }

    /// Finish the drag at `offset`, returning `(origin, offset)`.
    ///
    /// Ending a drag that never began reports the last known origin (the
    /// default origin before any drag).
    pub fn end(&mut self, offset: LogicalPosition) -> (LogicalPosition, LogicalPosition) {
        self.active = false;
        (self.origin, offset)
    }

    pub fn origin(&self) -> LogicalPosition {
        self.origin
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
