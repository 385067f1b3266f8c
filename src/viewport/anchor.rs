use crate::rows::{RowKey, RowKind};
use crate::viewport::RowLayout;

const NEIGHBOUR_ROWS: usize = 8;

/// Scroll position expressed by row identity rather than raw index.
///
/// The first candidate is the row at the top of the viewport; the rest are the
/// nearest rows above it and its group header, used when the top row
/// disappears (detail closed, group collapsed, account filtered out).
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnchor {
    candidates: Vec<RowKey>,
    offset_within: u32
}

impl ScrollAnchor {
    pub fn capture(layout: &RowLayout, scroll_top: u32) -> Option<Self> {
        let index = layout.index_at(scroll_top)?;
        let top = layout.row_top(index)?;
        let mut candidates = Vec::new();
        // Grouped layouts always start with a header.
        let grouped = layout.kind(0) == Some(RowKind::Group);

        for position in (0..=index).rev() {
            let within = index - position <= NEIGHBOUR_ROWS;

            if !within && !grouped {
                break;
            }

            let Some(key) = layout.key(position) else { break };
            let is_group = layout.kind(position) == Some(RowKind::Group);

            if is_group || within {
                candidates.push(key.clone());

                if let RowKey::Detail(account_id) = key {
                    candidates.push(RowKey::Account(*account_id));
                }
            }

            if is_group {
                break;
            }
        }

        Some(Self {
            candidates,
            offset_within: scroll_top.saturating_sub(top)
        })
    }

    pub fn key(&self) -> Option<&RowKey> {
        self.candidates.first()
    }

    #[cfg(test)]
    pub(crate) fn candidates(&self) -> &[RowKey] {
        &self.candidates
    }

    /// Scroll offset in `layout` that keeps the anchored row in place.
    pub fn resolve(&self, layout: &RowLayout) -> Option<u32> {
        self.candidates.iter().enumerate().find_map(|(rank, key)| {
            let index = layout.position_of(key)?;
            let top = layout.row_top(index)?;

            if rank == 0 {
                let height = layout.row_height(index)?;
                Some(top + self.offset_within.min(height.saturating_sub(1)))
            } else {
                Some(top)
            }
        })
    }
}
