use crate::pipeline::SortField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerColumn {
    Account,
    Institution,
    Type,
    Balance,
    Change,
    Status
}

impl LedgerColumn {
    pub fn title(self) -> &'static str {
        match self {
            LedgerColumn::Account => "Account",
            LedgerColumn::Institution => "Institution",
            LedgerColumn::Type => "Type",
            LedgerColumn::Balance => "Balance",
            LedgerColumn::Change => "30d",
            LedgerColumn::Status => "Status"
        }
    }

    /// Sort applied when this column's header is clicked.
    pub fn sort_field(self) -> Option<SortField> {
        match self {
            LedgerColumn::Account => Some(SortField::Name),
            LedgerColumn::Balance => Some(SortField::Balance),
            LedgerColumn::Change => Some(SortField::Change),
            LedgerColumn::Institution | LedgerColumn::Type | LedgerColumn::Status => None
        }
    }
}

/// Fixed proportional column shares. Widths never depend on row content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    columns: Vec<(LedgerColumn, u32)>
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::new(vec![
            (LedgerColumn::Account, 30),
            (LedgerColumn::Institution, 18),
            (LedgerColumn::Type, 14),
            (LedgerColumn::Balance, 14),
            (LedgerColumn::Change, 10),
            (LedgerColumn::Status, 14)
        ])
    }
}

impl ColumnLayout {
    pub fn new(columns: Vec<(LedgerColumn, u32)>) -> Self {
        Self { columns }
    }

    /// Splits `container_width` by share; rounding slack goes to the last column.
    pub fn widths(&self, container_width: u32) -> Vec<(LedgerColumn, u32)> {
        let total_share: u64 = self.columns.iter().map(|(_, share)| u64::from(*share)).sum();

        if total_share == 0 {
            return self.columns.iter().map(|(column, _)| (*column, 0)).collect();
        }

        let mut widths: Vec<_> = self.columns.iter()
            .map(|(column, share)| {
                let width = u64::from(container_width) * u64::from(*share) / total_share;
                (*column, u32::try_from(width).unwrap_or(u32::MAX))
            })
            .collect();

        let assigned: u32 = widths.iter().map(|(_, width)| *width).sum();

        if let Some((_, last)) = widths.last_mut() {
            *last += container_width.saturating_sub(assigned);
        }

        widths
    }
}
