// Visible sub-range (brush) over the merged table
use crate::domain::chart::ViewportRange;
use crate::domain::error::StatsError;
use crate::domain::metric::Resolution;

/// Number of most recent rows shown by default at daily resolution.
pub const DAILY_WINDOW: usize = 90;

pub fn compute_default_range(table_len: usize, resolution: Resolution) -> Option<ViewportRange> {
    if table_len == 0 {
        return None;
    }
    let end_index = table_len - 1;
    let start_index = match resolution {
        Resolution::D => table_len.saturating_sub(DAILY_WINDOW),
        _ => 0,
    };
    Some(ViewportRange::new(start_index, end_index))
}

#[derive(Debug, Clone, Default)]
pub struct ViewportController {
    range: Option<ViewportRange>,
    table_len: usize,
    resolution: Resolution,
    // set once the user brushes; until then the default follows the table
    user_range: bool,
}

impl ViewportController {
    pub fn range(&self) -> Option<ViewportRange> {
        self.range
    }

    /// Track the table after a recompute. Until the user picks a range the
    /// default is recomputed on every sync. A resolution change or an empty
    /// table drops the user's range; otherwise it is clamped to the new length.
    pub fn sync(&mut self, table_len: usize, resolution: Resolution) {
        if resolution != self.resolution || table_len == 0 {
            self.user_range = false;
        }
        self.table_len = table_len;
        self.resolution = resolution;

        self.range = match self.range {
            Some(range) if self.user_range => {
                Some(clamp(range.start_index, range.end_index, table_len))
            }
            _ => compute_default_range(table_len, resolution),
        };
    }

    pub fn set_range(&mut self, start: usize, end: usize) -> Result<ViewportRange, StatsError> {
        if self.table_len == 0 {
            return Err(StatsError::EmptyTable);
        }
        let range = clamp(start, end, self.table_len);
        self.range = Some(range);
        self.user_range = true;
        Ok(range)
    }
}

fn clamp(start: usize, end: usize, table_len: usize) -> ViewportRange {
    let last = table_len - 1;
    let start = start.min(last);
    let end = end.min(last);
    if start <= end {
        ViewportRange::new(start, end)
    } else {
        ViewportRange::new(end, start)
    }
}
