//! Fixed-height virtual scrolling window

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Height of one directory row
pub const ROW_HEIGHT: u32 = 96;
/// Rows rendered beyond each edge of the viewport
pub const OVERSCAN: usize = 5;
/// Viewport assumed when the client does not report one
pub const DEFAULT_VIEWPORT_HEIGHT: u64 = 960;

/// Scroll position and visible height reported by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Viewport {
    pub scroll_offset: u64,
    pub height: u64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_offset: 0,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

/// Index range of rows to render, `start..end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VirtualWindow {
    pub start: usize,
    pub end: usize,
    /// Height of the full scrollable content
    pub total_height: u64,
    /// Offset of the first rendered row
    pub offset_top: u64,
    pub row_height: u32,
    pub overscan: usize,
}

impl VirtualWindow {
    pub fn compute(item_count: usize, item_height: u32, overscan: usize, viewport: Viewport) -> Self {
        let height = u64::from(item_height.max(1));
        let count = item_count as u64;

        let first = (viewport.scroll_offset / height).min(count);
        let last = viewport
            .scroll_offset
            .saturating_add(viewport.height)
            .div_ceil(height)
            .clamp(first, count);

        let start = (first as usize).saturating_sub(overscan);
        let end = (last as usize).saturating_add(overscan).min(item_count);

        Self {
            start,
            end,
            total_height: count.saturating_mul(height),
            offset_top: (start as u64).saturating_mul(height),
            row_height: item_height,
            overscan,
        }
    }

    /// Window with the directory's row height and overscan
    pub fn for_directory(item_count: usize, viewport: Viewport) -> Self {
        Self::compute(item_count, ROW_HEIGHT, OVERSCAN, viewport)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(scroll_offset: u64, height: u64) -> Viewport {
        Viewport {
            scroll_offset,
            height,
        }
    }

    #[test]
    fn top_of_list_renders_visible_plus_trailing_overscan() {
        let window = VirtualWindow::for_directory(100, viewport(0, 480));
        assert_eq!(window.range(), 0..10);
        assert_eq!(window.total_height, 9600);
        assert_eq!(window.offset_top, 0);
    }

    #[test]
    fn middle_of_list_has_overscan_on_both_sides() {
        let window = VirtualWindow::for_directory(100, viewport(960, 480));
        assert_eq!(window.range(), 5..20);
        assert_eq!(window.offset_top, 5 * 96);
    }

    #[test]
    fn end_of_list_is_clamped() {
        let window = VirtualWindow::for_directory(12, viewport(96 * 10, 480));
        assert_eq!(window.range(), 5..12);
    }

    #[test]
    fn scroll_past_end_still_renders_tail_overscan() {
        let window = VirtualWindow::for_directory(12, viewport(100_000, 480));
        assert_eq!(window.range(), 7..12);
    }

    #[test]
    fn empty_list_has_empty_window() {
        let window = VirtualWindow::for_directory(0, Viewport::default());
        assert!(window.is_empty());
        assert_eq!(window.total_height, 0);
    }

    #[test]
    fn extreme_offsets_stay_in_bounds() {
        let window = VirtualWindow::for_directory(100, viewport(u64::MAX, 960));
        assert_eq!(window.range(), 95..100);

        let window = VirtualWindow::for_directory(100, viewport(0, u64::MAX));
        assert_eq!(window.range(), 0..100);

        let window = VirtualWindow::for_directory(100, viewport(u64::MAX, u64::MAX));
        assert!(window.start <= window.end);
        assert!(window.end <= 100);
    }

    #[test]
    fn partially_visible_row_counts_as_visible() {
        let window = VirtualWindow::compute(50, 96, 0, viewport(50, 100));
        assert_eq!(window.range(), 0..2);
    }
}
