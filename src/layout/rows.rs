use serde::Serialize;

/// Resolved vertical geometry of one arc row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowInfo {
    pub y: f32,
    pub height: f32,
}

/// Tracks per-row `{y, height}` while rows are laid out in strictly
/// increasing index order. Rows that have not been committed yet answer
/// with a reproducible default derived from the row index alone, so
/// look-ahead reads (inline expressions) stay order-independent.
#[derive(Debug)]
pub struct RowLedger {
    rows: Vec<Option<RowInfo>>,
    entity_height: f32,
    arc_row_height: f32,
}

impl RowLedger {
    pub fn new(entity_height: f32, arc_row_height: f32) -> Self {
        Self {
            rows: Vec::new(),
            entity_height,
            arc_row_height,
        }
    }

    fn default_info(&self, row: isize) -> RowInfo {
        RowInfo {
            y: self.entity_height
                + 1.5 * self.arc_row_height
                + row as f32 * self.arc_row_height,
            height: self.arc_row_height,
        }
    }

    /// Recorded info for `row`, or the synthesized default. Accepts -1
    /// for the lifeline band above the first row.
    pub fn get(&self, row: isize) -> RowInfo {
        if row >= 0 {
            if let Some(Some(info)) = self.rows.get(row as usize) {
                return *info;
            }
        }
        self.default_info(row)
    }

    /// Commits `row`. A missing or sub-base height is clamped to the
    /// arc row height; a missing y is derived by packing against the
    /// previous row, falling back to the default formula when the
    /// previous row is unresolved or non-positive.
    pub fn set(&mut self, row: usize, height: Option<f32>, y: Option<f32>) {
        let height = match height {
            Some(h) if h >= self.arc_row_height => h,
            _ => self.arc_row_height,
        };
        let y = y.unwrap_or_else(|| {
            let previous = self.get(row as isize - 1);
            if previous.y > 0.0 {
                previous.y + (previous.height + height) / 2.0
            } else {
                self.default_info(row as isize).y
            }
        });
        if self.rows.len() <= row {
            self.rows.resize(row + 1, None);
        }
        self.rows[row] = Some(RowInfo { y, height });
    }

    /// Raises the row's height to at least `height`, recomputing its y
    /// against the previous row.
    pub fn raise(&mut self, row: usize, height: f32) {
        let current = self.get(row as isize).height;
        self.set(row, Some(current.max(height)), None);
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
