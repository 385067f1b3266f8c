use crate::rows::RowKind;

/// Fixed per-row-type height estimates, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMetrics {
    /// Sticky column header, always rendered above the rows.
    pub header_height: u32,
    /// Group headers and account rows.
    pub row_height: u32,
    /// Expanded transaction panel.
    pub detail_height: u32,
    pub min_container_height: u32,
    pub max_container_height: u32
}

impl Default for RowMetrics {
    fn default() -> Self {
        Self {
            header_height: 40,
            row_height: 52,
            detail_height: 320,
            min_container_height: 240,
            max_container_height: 720
        }
    }
}

impl RowMetrics {
    pub fn estimate(&self, kind: RowKind) -> u32 {
        match kind {
            RowKind::Group | RowKind::Account => self.row_height,
            RowKind::Detail => self.detail_height
        }
    }

    /// Header plus content, clamped to the container bounds.
    pub fn container_height(&self, content_height: u32) -> u32 {
        let minimum = self.min_container_height.min(self.max_container_height);

        self.header_height.saturating_add(content_height).clamp(minimum, self.max_container_height)
    }

    /// Space left for rows once the sticky header is drawn.
    pub fn body_height(&self, content_height: u32) -> u32 {
        self.container_height(content_height).saturating_sub(self.header_height)
    }
}
