//! Vertical box layout of a node's children.
//!
//! Children are stacked top to bottom inside the frame margins, separated by
//! a fixed gap. Children that do not stretch get exactly their minimum
//! height. Whatever height is left is shared among stretching children in
//! proportion to their stretch ratios.
//!
//! Sharing is iterative. A stretching child whose share would be smaller than
//! its minimum is demoted to a fixed child at its minimum height, its minimum
//! is taken out of the pool, and the distribution starts over. This repeats
//! until every remaining stretching child fits or none are left.
//!
//! Shares are truncated to whole pixels. When the last child stretches, it
//! ends exactly at the bottom margin and absorbs the truncation remainder.
//! A node too small for its children never cuts that child below its
//! resolved height; the children overflow the bottom margin instead.
//!
//! The solver only talks to children through [`LayoutChild`], so any toolkit
//! adapter can take part in a layout pass.

use slint::LogicalSize;

use crate::hit_test::Rect;
use crate::style::StyleMargins;

/// A child that takes part in a node's vertical layout.
pub trait LayoutChild {
    /// Smallest size the child can be laid out at.
    fn minimum_size(&self) -> LogicalSize;

    /// Whether the child wants a share of the leftover vertical space.
    fn wants_vertical_stretch(&self) -> bool {
        false
    }

    /// Weight of this child's share relative to other stretching siblings.
    fn stretch_ratio(&self) -> f32 {
        1.0
    }

    fn is_visible(&self) -> bool {
        true
    }

    /// Top-level children are positioned by the host, never by the node.
    fn is_top_level(&self) -> bool {
        false
    }

    /// Receive the rectangle assigned by the layout pass.
    fn set_rect(&mut self, rect: Rect);
}

impl<T: LayoutChild + ?Sized> LayoutChild for Box<T> {
    fn minimum_size(&self) -> LogicalSize {
        (**self).minimum_size()
    }
    fn wants_vertical_stretch(&self) -> bool {
        (**self).wants_vertical_stretch()
    }
    fn stretch_ratio(&self) -> f32 {
        (**self).stretch_ratio()
    }
    fn is_visible(&self) -> bool {
        (**self).is_visible()
    }
    fn is_top_level(&self) -> bool {
        (**self).is_top_level()
    }
    fn set_rect(&mut self, rect: Rect) {
        (**self).set_rect(rect)
    }
}

/// Plain data implementation of [`LayoutChild`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleChild {
    pub min_size: LogicalSize,
    pub stretch: bool,
    pub ratio: f32,
    pub visible: bool,
    pub top_level: bool,
    /// Rectangle assigned by the last layout pass.
    pub rect: Rect,
}

impl SimpleChild {
    /// A visible child that keeps its minimum height.
    pub fn fixed(width: f32, height: f32) -> Self {
        Self {
            min_size: LogicalSize::new(width, height),
            stretch: false,
            ratio: 1.0,
            visible: true,
            top_level: false,
            rect: Rect::default(),
        }
    }

    /// A visible child that stretches vertically with the given ratio.
    pub fn stretching(width: f32, height: f32, ratio: f32) -> Self {
        Self {
            stretch: true,
            ratio,
            ..Self::fixed(width, height)
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn top_level(mut self) -> Self {
        self.top_level = true;
        self
    }
}

impl LayoutChild for SimpleChild {
    fn minimum_size(&self) -> LogicalSize {
        self.min_size
    }
    fn wants_vertical_stretch(&self) -> bool {
        self.stretch
    }
    fn stretch_ratio(&self) -> f32 {
        self.ratio
    }
    fn is_visible(&self) -> bool {
        self.visible
    }
    fn is_top_level(&self) -> bool {
        self.top_level
    }
    fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }
}

/// Layout input for one child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildHint {
    pub min_height: f32,
    pub stretch: bool,
    pub ratio: f32,
}

impl ChildHint {
    fn of<C: LayoutChild + ?Sized>(child: &C) -> Self {
        Self {
            min_height: child.minimum_size().height,
            stretch: child.wants_vertical_stretch(),
            ratio: child.stretch_ratio(),
        }
    }
}

/// Node-level layout parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Full size of the node, frame included.
    pub size: LogicalSize,
    pub separation: f32,
    pub margins: StyleMargins,
}

/// Whether `child` is laid out by the node at all.
pub fn is_eligible<C: LayoutChild + ?Sized>(child: &C) -> bool {
    child.is_visible() && !child.is_top_level()
}

struct Entry {
    min: f32,
    stretch: bool,
    ratio: f32,
    size: f32,
}

/// Compute one rectangle per hint, in order.
///
/// Returns an empty list when there are no hints.
pub fn solve(hints: &[ChildHint], params: &LayoutParams) -> Vec<Rect> {
    if hints.is_empty() {
        return Vec::new();
    }

    let count = hints.len();
    let margins = params.margins;
    let height = params.size.height;

    // First pass: minimums and stretch totals
    let mut entries: Vec<Entry> = hints
        .iter()
        .map(|hint| {
            let min = hint.min_height.max(0.0);
            Entry {
                min,
                stretch: hint.stretch,
                ratio: hint.ratio.max(0.0),
                size: min,
            }
        })
        .collect();

    let stretch_min: f32 = entries.iter().map(|e| e.min).sum();
    let mut stretch_avail: f32 = entries.iter().filter(|e| e.stretch).map(|e| e.min).sum();
    let mut ratio_total: f32 = entries.iter().filter(|e| e.stretch).map(|e| e.ratio).sum();

    let stretch_max = height - (count - 1) as f32 * params.separation;
    let stretch_diff = (stretch_max - stretch_min).max(0.0);
    stretch_avail += stretch_diff - margins.bottom - margins.top;

    // Second pass: demote stretching children that cannot get their minimum
    while ratio_total > 0.0 {
        let mut refit_successful = true;

        for entry in entries.iter_mut().filter(|e| e.stretch) {
            let share = (stretch_avail * entry.ratio / ratio_total).trunc();
            if share < entry.min {
                entry.stretch = false;
                entry.size = entry.min;
                ratio_total -= entry.ratio;
                stretch_avail -= entry.min;
                refit_successful = false;
                break;
            }
            entry.size = share;
        }

        if refit_successful {
            break;
        }
    }

    // Final pass: place children
    let width = (params.size.width - margins.left - margins.right).max(0.0);
    let bottom = height - margins.bottom;
    let mut ofs = margins.top;
    let mut rects = Vec::with_capacity(count);

    for (idx, entry) in entries.iter().enumerate() {
        if idx > 0 {
            ofs += params.separation;
        }

        let from = ofs;
        let mut to = ofs + entry.size;
        if entry.stretch && idx == count - 1 {
            to = bottom.max(to);
        }

        rects.push(Rect::new(margins.left, from, width, to - from));
        ofs = to;
    }

    tracing::trace!(children = count, "solved node layout");
    rects
}

/// Lay out `children`, skipping hidden and top-level ones.
///
/// Returns the number of children that received a rectangle.
pub fn layout_children<C: LayoutChild>(children: &mut [C], params: &LayoutParams) -> usize {
    let hints: Vec<ChildHint> = children
        .iter()
        .filter(|c| is_eligible(*c))
        .map(|c| ChildHint::of(c))
        .collect();

    let rects = solve(&hints, params);
    let mut rects = rects.into_iter();
    for child in children.iter_mut().filter(|c| is_eligible(&**c)) {
        if let Some(rect) = rects.next() {
            child.set_rect(rect);
        }
    }
    hints.len()
}

/// Minimum size of a node holding `children`.
///
/// `header_width` is the width the title row needs. The result includes the
/// frame margins.
pub fn minimum_size<C: LayoutChild>(
    children: &[C],
    header_width: f32,
    separation: f32,
    margins: &StyleMargins,
) -> LogicalSize {
    let mut width = header_width;
    let mut height = 0.0;

    for (idx, child) in children.iter().filter(|c| is_eligible(*c)).enumerate() {
        let size = child.minimum_size();
        height += size.height;
        width = f32::max(width, size.width);
        if idx > 0 {
            height += separation;
        }
    }

    let frame = margins.minimum_size();
    LogicalSize::new(width + frame.width, height + frame.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(width: f32, height: f32, separation: f32, margins: StyleMargins) -> LayoutParams {
        LayoutParams {
            size: LogicalSize::new(width, height),
            separation,
            margins,
        }
    }

    fn fixed(min_height: f32) -> ChildHint {
        ChildHint { min_height, stretch: false, ratio: 1.0 }
    }

    fn stretch(min_height: f32, ratio: f32) -> ChildHint {
        ChildHint { min_height, stretch: true, ratio }
    }

    fn heights(rects: &[Rect]) -> Vec<f32> {
        rects.iter().map(|r| r.height).collect()
    }

    // ========================================================================
    // solve() - distribution
    // ========================================================================

    #[test]
    fn test_empty_children_produce_no_geometry() {
        let rects = solve(&[], &params(100.0, 100.0, 5.0, StyleMargins::default()));
        assert!(rects.is_empty());
    }

    #[test]
    fn test_fixed_and_stretch_child_share_height() {
        let rects = solve(
            &[fixed(20.0), stretch(10.0, 1.0)],
            &params(100.0, 100.0, 5.0, StyleMargins::default()),
        );

        assert_eq!(rects[0], Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(rects[1], Rect::new(0.0, 25.0, 100.0, 75.0));
        assert_eq!(rects[1].bottom(), 100.0);
    }

    #[test]
    fn test_stretch_ratios_split_proportionally() {
        let rects = solve(
            &[stretch(0.0, 1.0), stretch(0.0, 3.0)],
            &params(50.0, 100.0, 0.0, StyleMargins::default()),
        );
        assert_eq!(heights(&rects), vec![25.0, 75.0]);
    }

    #[test]
    fn test_margins_offset_and_shrink_children() {
        let margins = StyleMargins::new(4.0, 20.0, 6.0, 10.0);
        let rects = solve(&[fixed(10.0), stretch(5.0, 1.0)], &params(100.0, 100.0, 2.0, margins));

        assert_eq!(rects[0], Rect::new(4.0, 20.0, 90.0, 10.0));
        assert_eq!(rects[1].y, 32.0);
        assert_eq!(rects[1].bottom(), 90.0);
        assert_eq!(rects[1].width, 90.0);
    }

    #[test]
    fn test_child_below_its_share_is_demoted() {
        // Equal ratios would give 40 each, but the first child needs 60
        let rects = solve(
            &[stretch(60.0, 1.0), stretch(10.0, 1.0)],
            &params(80.0, 80.0, 0.0, StyleMargins::default()),
        );
        assert_eq!(heights(&rects), vec![60.0, 20.0]);
    }

    #[test]
    fn test_zero_ratio_total_keeps_minimums() {
        let rects = solve(
            &[stretch(10.0, 0.0), fixed(10.0)],
            &params(100.0, 100.0, 0.0, StyleMargins::default()),
        );
        assert_eq!(heights(&rects), vec![10.0, 10.0]);
    }

    #[test]
    fn test_only_fixed_children_keep_minimums() {
        let rects = solve(
            &[fixed(10.0), fixed(15.0)],
            &params(100.0, 100.0, 3.0, StyleMargins::default()),
        );
        assert_eq!(heights(&rects), vec![10.0, 15.0]);
        assert_eq!(rects[1].y, 13.0);
    }

    #[test]
    fn test_last_stretch_child_absorbs_truncation() {
        // 100 / 3 truncates to 33 per child; the last one takes 34
        let rects = solve(
            &[stretch(0.0, 1.0), stretch(0.0, 1.0), stretch(0.0, 1.0)],
            &params(10.0, 100.0, 0.0, StyleMargins::default()),
        );
        assert_eq!(heights(&rects), vec![33.0, 33.0, 34.0]);
    }

    #[test]
    fn test_heights_fill_content_when_space_suffices() {
        let margins = StyleMargins::new(3.0, 17.0, 3.0, 7.0);
        let sep = 4.0;
        let cases: Vec<Vec<ChildHint>> = vec![
            vec![fixed(12.0), stretch(8.0, 1.0)],
            vec![stretch(5.0, 2.0), fixed(30.0), stretch(1.0, 0.5)],
            vec![stretch(40.0, 1.0), stretch(3.0, 1.0), stretch(3.0, 7.0)],
            vec![fixed(1.0), fixed(2.0), fixed(3.0), stretch(0.0, 1.0)],
        ];

        for hints in cases {
            let required: f32 = hints.iter().map(|h| h.min_height).sum::<f32>()
                + (hints.len() - 1) as f32 * sep
                + margins.top
                + margins.bottom;
            for height in [required, required + 1.0, required + 37.0, required + 501.0] {
                let rects = solve(&hints, &params(120.0, height, sep, margins));
                let total: f32 = heights(&rects).iter().sum();
                let expected = height - margins.top - margins.bottom - (hints.len() - 1) as f32 * sep;
                assert!(
                    (total - expected).abs() < 0.01,
                    "height {height}: total {total} != {expected}"
                );
                assert_eq!(rects.last().unwrap().bottom(), height - margins.bottom);
                for (rect, hint) in rects.iter().zip(&hints) {
                    assert!(rect.height >= hint.min_height);
                }
            }
        }
    }

    // ========================================================================
    // solve() - degenerate input
    // ========================================================================

    #[test]
    fn test_too_small_content_overflows_without_negative_sizes() {
        let margins = StyleMargins::new(0.0, 10.0, 0.0, 10.0);
        let rects = solve(
            &[fixed(30.0), stretch(20.0, 1.0), stretch(0.0, 1.0)],
            &params(50.0, 20.0, 5.0, margins),
        );

        assert_eq!(rects.len(), 3);
        for rect in &rects {
            assert!(rect.height >= 0.0, "negative height in {rect:?}");
        }
        assert_eq!(rects[0].height, 30.0);
        assert_eq!(rects[1].height, 20.0);
        assert!(rects[2].bottom() > 20.0, "overflow is expected");
    }

    #[test]
    fn test_too_small_content_keeps_last_stretch_child_minimum() {
        let rects = solve(
            &[fixed(30.0), stretch(20.0, 1.0)],
            &params(50.0, 20.0, 0.0, StyleMargins::default()),
        );

        assert_eq!(rects[0], Rect::new(0.0, 0.0, 50.0, 30.0));
        assert_eq!(rects[1], Rect::new(0.0, 30.0, 50.0, 20.0));
    }

    #[test]
    fn test_negative_min_height_is_clamped() {
        let rects = solve(&[fixed(-5.0)], &params(10.0, 10.0, 0.0, StyleMargins::default()));
        assert_eq!(rects[0].height, 0.0);
    }

    #[test]
    fn test_narrow_node_gives_zero_width() {
        let rects = solve(&[fixed(5.0)], &params(4.0, 10.0, 0.0, StyleMargins::uniform(3.0)));
        assert_eq!(rects[0].width, 0.0);
    }

    // ========================================================================
    // layout_children() / minimum_size()
    // ========================================================================

    #[test]
    fn test_layout_children_skips_hidden_and_top_level() {
        let mut children = vec![
            SimpleChild::fixed(10.0, 20.0),
            SimpleChild::fixed(10.0, 500.0).hidden(),
            SimpleChild::fixed(10.0, 500.0).top_level(),
            SimpleChild::stretching(10.0, 10.0, 1.0),
        ];
        let laid_out = layout_children(
            &mut children,
            &params(100.0, 100.0, 5.0, StyleMargins::default()),
        );

        assert_eq!(laid_out, 2);
        assert_eq!(children[0].rect, Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(children[1].rect, Rect::default());
        assert_eq!(children[2].rect, Rect::default());
        assert_eq!(children[3].rect, Rect::new(0.0, 25.0, 100.0, 75.0));
    }

    #[test]
    fn test_layout_children_accepts_boxed_children() {
        let mut children: Vec<Box<dyn LayoutChild>> = vec![
            Box::new(SimpleChild::fixed(10.0, 10.0)),
            Box::new(SimpleChild::stretching(10.0, 10.0, 1.0)),
        ];
        let laid_out = layout_children(
            &mut children,
            &params(50.0, 50.0, 0.0, StyleMargins::default()),
        );
        assert_eq!(laid_out, 2);
    }

    #[test]
    fn test_minimum_size_sums_heights_and_takes_widest() {
        let children = vec![
            SimpleChild::fixed(40.0, 10.0),
            SimpleChild::fixed(70.0, 20.0),
            SimpleChild::fixed(500.0, 500.0).hidden(),
        ];
        let margins = StyleMargins::new(2.0, 8.0, 2.0, 4.0);
        let size = minimum_size(&children, 30.0, 5.0, &margins);
        assert_eq!(size, LogicalSize::new(74.0, 47.0));
    }

    #[test]
    fn test_minimum_size_header_can_dominate_width() {
        let children = vec![SimpleChild::fixed(10.0, 10.0)];
        let size = minimum_size(&children, 90.0, 0.0, &StyleMargins::default());
        assert_eq!(size.width, 90.0);
    }

    #[test]
    fn test_minimum_size_without_children_is_header_plus_frame() {
        let children: Vec<SimpleChild> = Vec::new();
        let size = minimum_size(&children, 20.0, 5.0, &StyleMargins::uniform(1.0));
        assert_eq!(size, LogicalSize::new(22.0, 2.0));
    }
}
