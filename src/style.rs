//! Theme metrics consumed by the node box.
//!
//! The node never computes any of these values. A host reads them from its
//! theme, hands them over with [`NodeWidget::set_style`](crate::NodeWidget::set_style),
//! and the node re-runs layout and rebuilds its connection anchors.
//!
//! # Example
//!
//! ```ignore
//! use slint_node_box::{NodeStyle, StyleMargins};
//! use slint::LogicalSize;
//!
//! let style = NodeStyle::default()
//!     .with_frame(StyleMargins::new(16.0, 24.0, 16.0, 6.0))
//!     .with_separation(2.0)
//!     .with_port_size(LogicalSize::new(10.0, 10.0));
//! node.set_style(style);
//! ```

use slint::{Color, LogicalSize};
use unicode_width::UnicodeWidthStr;

/// Content margins of a frame style box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StyleMargins {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl StyleMargins {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Same margin on every side.
    pub fn uniform(margin: f32) -> Self {
        Self::new(margin, margin, margin, margin)
    }

    /// Total space consumed by the margins: (left + right, top + bottom).
    pub fn minimum_size(&self) -> LogicalSize {
        LogicalSize::new(self.left + self.right, self.top + self.bottom)
    }
}

/// Metrics of the title font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Line height.
    pub height: f32,
    /// Distance from the top of the line to the baseline.
    pub ascent: f32,
    /// Horizontal advance of one display column.
    pub advance: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            height: 16.0,
            ascent: 12.0,
            advance: 7.0,
        }
    }
}

impl FontMetrics {
    /// Width of `text` measured in display columns.
    pub fn string_width(&self, text: &str) -> f32 {
        UnicodeWidthStr::width(text) as f32 * self.advance
    }
}

/// Read-only theme configuration of a node box.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    /// Margins of the regular frame. Layout always uses these.
    pub frame: StyleMargins,
    pub selected_frame: StyleMargins,
    /// Margins of the comment frame. The top band is the comment's grab area.
    pub comment: StyleMargins,
    pub comment_focus: StyleMargins,
    /// Vertical gap between consecutive children.
    pub separation: f32,
    pub port_size: LogicalSize,
    pub close_size: LogicalSize,
    /// Hit zone of the resize handle in the bottom-right corner.
    pub resizer_size: LogicalSize,
    pub title_font: FontMetrics,
    pub close_offset: f32,
    pub close_h_offset: f32,
    pub title_offset: f32,
    pub title_h_offset: f32,
    pub title_color: Color,
    pub close_color: Color,
    pub resizer_color: Color,
}

impl Default for NodeStyle {
    fn default() -> Self {
        let frame = StyleMargins::new(16.0, 24.0, 16.0, 5.0);
        Self {
            frame,
            selected_frame: frame,
            comment: StyleMargins::new(16.0, 24.0, 16.0, 5.0),
            comment_focus: StyleMargins::new(16.0, 24.0, 16.0, 5.0),
            separation: 1.0,
            port_size: LogicalSize::new(10.0, 10.0),
            close_size: LogicalSize::new(16.0, 16.0),
            resizer_size: LogicalSize::new(12.0, 12.0),
            title_font: FontMetrics::default(),
            close_offset: 18.0,
            close_h_offset: 12.0,
            title_offset: 20.0,
            title_h_offset: 0.0,
            title_color: Color::from_argb_u8(255, 0, 0, 0),
            close_color: Color::from_argb_u8(255, 0, 0, 0),
            resizer_color: Color::from_argb_u8(255, 0, 0, 0),
        }
    }
}

impl NodeStyle {
    /// Set the regular frame margins.
    pub fn with_frame(mut self, margins: StyleMargins) -> Self {
        self.frame = margins;
        self
    }

    pub fn with_selected_frame(mut self, margins: StyleMargins) -> Self {
        self.selected_frame = margins;
        self
    }

    /// Set the comment frame margins (both plain and focused).
    pub fn with_comment(mut self, margins: StyleMargins) -> Self {
        self.comment = margins;
        self.comment_focus = margins;
        self
    }

    /// Set the vertical separation between children (default: 1.0).
    pub fn with_separation(mut self, separation: f32) -> Self {
        self.separation = separation;
        self
    }

    pub fn with_port_size(mut self, size: LogicalSize) -> Self {
        self.port_size = size;
        self
    }

    pub fn with_close_size(mut self, size: LogicalSize) -> Self {
        self.close_size = size;
        self
    }

    /// Set the resize handle size (default: 12x12).
    pub fn with_resizer_size(mut self, size: LogicalSize) -> Self {
        self.resizer_size = size;
        self
    }

    pub fn with_title_font(mut self, font: FontMetrics) -> Self {
        self.title_font = font;
        self
    }

    /// Offset from the port icon's top-left corner to its centre.
    ///
    /// Truncated to whole pixels so anchors land on the pixel grid.
    pub fn port_half_extent(&self) -> (f32, f32) {
        (
            (self.port_size.width * 0.5).trunc(),
            (self.port_size.height * 0.5).trunc(),
        )
    }
}
