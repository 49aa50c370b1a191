//! Decoration geometry of a node box.
//!
//! Everything a renderer needs to draw the frame around the children: which
//! frame variant to use, the overlay, where the title goes and how wide it may
//! get, the close button and resize handle rectangles, and one icon per
//! enabled slot. The close button rectangle is also what the interaction
//! controller hit-tests, so drawing and clicking always agree.

use slint::{Color, Image, LogicalPosition, LogicalSize};

use crate::hit_test::{resize_handle_rect, Rect};
use crate::slots::SlotTable;
use crate::style::{NodeStyle, StyleMargins};

/// Visual annotation layered on top of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    /// The node holds a breakpoint.
    Breakpoint,
    /// Execution is currently at this node.
    Position,
}

/// Which frame variant to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStyle {
    Frame,
    SelectedFrame,
    Comment,
    CommentFocus,
}

impl FrameStyle {
    pub fn select(comment: bool, selected: bool) -> Self {
        match (comment, selected) {
            (false, false) => FrameStyle::Frame,
            (false, true) => FrameStyle::SelectedFrame,
            (true, false) => FrameStyle::Comment,
            (true, true) => FrameStyle::CommentFocus,
        }
    }

    pub fn margins(self, style: &NodeStyle) -> StyleMargins {
        match self {
            FrameStyle::Frame => style.frame,
            FrameStyle::SelectedFrame => style.selected_frame,
            FrameStyle::Comment => style.comment,
            FrameStyle::CommentFocus => style.comment_focus,
        }
    }
}

/// A slot icon to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PortDecoration {
    pub slot: i32,
    /// Top-left corner of the icon.
    pub position: LogicalPosition,
    pub color: Color,
    /// Custom icon, `None` for the theme's port icon.
    pub icon: Option<Image>,
}

/// Node state that affects decorations.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub size: LogicalSize,
    pub selected: bool,
    pub comment: bool,
    pub overlay: Overlay,
    pub show_close: bool,
    pub resizable: bool,
    pub style: &'a NodeStyle,
    pub slots: &'a SlotTable,
}

/// Computed decorations.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGeometry {
    pub frame_style: FrameStyle,
    pub overlay: Overlay,
    /// Baseline-adjusted origin of the title text.
    pub title_origin: LogicalPosition,
    /// Width the title is clipped to.
    pub title_width: f32,
    pub close_rect: Option<Rect>,
    pub resizer_rect: Option<Rect>,
    pub ports: Vec<PortDecoration>,
    pub title_color: Color,
    pub close_color: Color,
    pub resizer_color: Color,
}

/// Rectangle of the close button, or `None` when it is hidden.
///
/// The button sits right of the title, above the frame's content area.
pub fn close_button_rect(
    size: LogicalSize,
    margins: &StyleMargins,
    style: &NodeStyle,
    show_close: bool,
) -> Option<Rect> {
    if !show_close {
        return None;
    }
    let title_width = size.width - margins.left - margins.right - style.close_size.width;
    let origin = LogicalPosition::new(
        title_width + margins.left + style.close_h_offset,
        -style.close_size.height + style.close_offset,
    );
    Some(Rect::from_origin_size(origin, style.close_size))
}

/// Compute all decorations for the current node state.
pub fn frame_geometry(inputs: &FrameInputs<'_>) -> FrameGeometry {
    let style = inputs.style;
    let frame_style = FrameStyle::select(inputs.comment, inputs.selected);
    let margins = frame_style.margins(style);

    let mut title_width = inputs.size.width - margins.left - margins.right;
    if inputs.show_close {
        title_width -= style.close_size.width;
    }

    let font = &style.title_font;
    let title_origin = LogicalPosition::new(
        margins.left + style.title_h_offset,
        -font.height + font.ascent + style.title_offset,
    );

    let resizer_rect = inputs
        .resizable
        .then(|| resize_handle_rect(inputs.size, style.resizer_size));

    let ports = inputs
        .slots
        .enabled_slots()
        .map(|(idx, slot)| PortDecoration {
            slot: idx,
            position: slot.offset,
            color: slot.color,
            icon: slot.icon.clone(),
        })
        .collect();

    FrameGeometry {
        frame_style,
        overlay: inputs.overlay,
        title_origin,
        title_width: title_width.max(0.0),
        close_rect: close_button_rect(inputs.size, &margins, style, inputs.show_close),
        resizer_rect,
        ports,
        title_color: style.title_color,
        close_color: style.close_color,
        resizer_color: style.resizer_color,
    }
}
