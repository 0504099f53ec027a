use std::fmt;

use crate::error::{Result, SelpgError};

/// Inclusive, 1-based range of pages to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u64,
    pub end: u64,
}

impl PageRange {
    /// Build a range from raw command-line values; both bounds must be >= 1 and ordered.
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start <= 0 || end <= 0 || end < start {
            return Err(SelpgError::InvalidRange);
        }

        let start = u64::try_from(start).map_err(|_| SelpgError::InvalidRange)?;
        let end = u64::try_from(end).map_err(|_| SelpgError::InvalidRange)?;

        Ok(PageRange { start, end })
    }

    pub fn contains(&self, page: u64) -> bool {
        self.start <= page && page <= self.end
    }

    /// Compare the range against the number of pages the input actually had.
    pub fn check(&self, total_pages: u64) -> SelectionResult {
        let shortfall = if total_pages < self.start {
            Some(Shortfall::StartBeyondTotal {
                start: self.start,
                total: total_pages,
            })
        } else if total_pages < self.end {
            Some(Shortfall::EndBeyondTotal {
                end: self.end,
                total: total_pages,
            })
        } else {
            None
        };

        SelectionResult {
            total_pages,
            shortfall,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionResult {
    pub total_pages: u64,
    pub shortfall: Option<Shortfall>,
}

/// The requested range ran past the end of the input. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortfall {
    StartBeyondTotal { start: u64, total: u64 },
    EndBeyondTotal { end: u64, total: u64 },
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shortfall::StartBeyondTotal { start, total } => write!(
                f,
                "start_page ({}) greater than total pages ({}), less output than expected",
                start, total
            ),
            Shortfall::EndBeyondTotal { end, total } => write!(
                f,
                "end_page ({}) greater than total pages ({}), less output than expected",
                end, total
            ),
        }
    }
}
