use std::ops::Range;

use crate::rows::{RowKey, RowKind, VirtualRow};
use crate::viewport::RowMetrics;

/// Estimated vertical positions of every row in the flattened list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowLayout {
    keys: Vec<RowKey>,
    kinds: Vec<RowKind>,
    /// `offsets[i]` is the top of row `i`; the final entry is the content height.
    offsets: Vec<u32>
}

impl RowLayout {
    pub fn measure(rows: &[VirtualRow<'_>], metrics: &RowMetrics) -> Self {
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        let mut top = 0u32;

        offsets.push(top);

        for row in rows {
            top = top.saturating_add(metrics.estimate(row.kind()));
            offsets.push(top);
        }

        Self {
            keys: rows.iter().map(VirtualRow::key).collect(),
            kinds: rows.iter().map(VirtualRow::kind).collect(),
            offsets
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn content_height(&self) -> u32 {
        self.offsets.last().copied().unwrap_or(0)
    }

    pub fn key(&self, index: usize) -> Option<&RowKey> {
        self.keys.get(index)
    }

    pub fn kind(&self, index: usize) -> Option<RowKind> {
        self.kinds.get(index).copied()
    }

    pub fn row_top(&self, index: usize) -> Option<u32> {
        if index < self.len() { self.offsets.get(index).copied() } else { None }
    }

    pub fn row_height(&self, index: usize) -> Option<u32> {
        let top = self.row_top(index)?;
        let bottom = self.offsets.get(index + 1)?;

        Some(bottom - top)
    }

    pub fn position_of(&self, key: &RowKey) -> Option<usize> {
        self.keys.iter().position(|candidate| candidate == key)
    }

    /// Index of the row covering `offset`, clamped to the last row.
    pub fn index_at(&self, offset: u32) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        let starts = &self.offsets[..self.len()];
        let index = starts.partition_point(|&top| top <= offset).saturating_sub(1);

        Some(index.min(self.len() - 1))
    }

    pub fn max_scroll(&self, viewport_height: u32) -> u32 {
        self.content_height().saturating_sub(viewport_height)
    }
}

/// Rows intersecting `[scroll_top, scroll_top + viewport_height)` plus `overscan`
/// rows on either side.
///
/// Out-of-range scroll offsets are clamped rather than rejected.
pub fn visible_range(layout: &RowLayout, scroll_top: u32, viewport_height: u32, overscan: usize) -> Range<usize> {
    if layout.is_empty() || viewport_height == 0 {
        return 0..0;
    }

    let scroll_top = scroll_top.min(layout.max_scroll(viewport_height));
    let bottom = scroll_top.saturating_add(viewport_height);

    let first = layout.index_at(scroll_top).unwrap_or(0);
    let starts = &layout.offsets[..layout.len()];
    let end = starts.partition_point(|&top| top < bottom).max(first + 1);

    first.saturating_sub(overscan)..end.saturating_add(overscan).min(layout.len())
}
