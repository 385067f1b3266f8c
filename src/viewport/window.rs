use std::ops::Range;

use tracing::trace;

use crate::rows::{RowKey, VirtualRow};
use crate::viewport::{visible_range, RowLayout, RowMetrics, ScrollAnchor};

#[derive(Debug, Clone, PartialEq)]
pub struct WindowRow {
    pub index: usize,
    pub key: RowKey,
    /// Offset from the top of the scrollable body, below the sticky header.
    pub top: u32,
    pub height: u32
}

/// The slice of rows to draw for the current scroll position.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderWindow {
    pub range: Range<usize>,
    pub rows: Vec<WindowRow>,
    pub scroll_top: u32,
    pub content_height: u32,
    pub container_height: u32,
    pub header_height: u32,
    pub total_rows: usize
}

/// Scroll state over a flattened row list.
#[derive(Debug, Clone)]
pub struct Viewport {
    metrics: RowMetrics,
    overscan: usize,
    layout: RowLayout,
    scroll_top: u32
}

impl Viewport {
    pub fn new(metrics: RowMetrics, overscan: usize) -> Self {
        Self {
            metrics,
            overscan,
            layout: RowLayout::default(),
            scroll_top: 0
        }
    }

    pub fn layout(&self) -> &RowLayout {
        &self.layout
    }

    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    pub fn container_height(&self) -> u32 {
        self.metrics.container_height(self.layout.content_height())
    }

    pub fn body_height(&self) -> u32 {
        self.metrics.body_height(self.layout.content_height())
    }

    pub fn max_scroll(&self) -> u32 {
        self.layout.max_scroll(self.body_height())
    }

    /// Re-measures after the row list changed shape, keeping the row that was
    /// at the top of the viewport in place when it still exists.
    pub fn update(&mut self, rows: &[VirtualRow<'_>]) {
        let anchor = ScrollAnchor::capture(&self.layout, self.scroll_top);

        self.layout = RowLayout::measure(rows, &self.metrics);

        let restored = anchor.as_ref()
            .and_then(|anchor| anchor.resolve(&self.layout))
            .unwrap_or(self.scroll_top);

        self.scroll_top = restored.min(self.max_scroll());

        trace!("Viewport re-measured [{}] rows, content [{}]px, scroll [{}]px", self.layout.len(), self.layout.content_height(), self.scroll_top);
    }

    pub fn scroll_to(&mut self, scroll_top: u32) {
        self.scroll_top = scroll_top.min(self.max_scroll());
    }

    pub fn scroll_by(&mut self, delta: i64) {
        let target = i64::from(self.scroll_top).saturating_add(delta).max(0);
        self.scroll_to(u32::try_from(target).unwrap_or(u32::MAX));
    }

    /// Scrolls so the given row sits at the top. Returns false when it is not in the list.
    pub fn scroll_to_key(&mut self, key: &RowKey) -> bool {
        let Some(top) = self.layout.position_of(key).and_then(|index| self.layout.row_top(index)) else {
            return false;
        };

        self.scroll_to(top);
        true
    }

    pub fn window(&self) -> RenderWindow {
        let range = visible_range(&self.layout, self.scroll_top, self.body_height(), self.overscan);

        let rows = range.clone()
            .filter_map(|index| {
                Some(WindowRow {
                    index,
                    key: self.layout.key(index)?.clone(),
                    top: self.layout.row_top(index)?,
                    height: self.layout.row_height(index)?
                })
            })
            .collect();

        RenderWindow {
            range,
            rows,
            scroll_top: self.scroll_top,
            content_height: self.layout.content_height(),
            container_height: self.container_height(),
            header_height: self.metrics.header_height,
            total_rows: self.layout.len()
        }
    }
}
