use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{RentalError, RentalResult};

/// Half-open rental interval `[start, end)` on calendar dates.
///
/// A rental ending on day D and another starting on day D do not
/// overlap: vehicles turn over same-day. `end > start` is enforced at
/// construction, so an invalid range is unrepresentable downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl RentalPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> RentalResult<Self> {
        if end <= start {
            return Err(RentalError::Validation(format!(
                "end date {} must be after start date {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Interval intersection test: `[s1,e1)` and `[s2,e2)` overlap iff
    /// `s1 < e2 && s2 < e1`.
    pub fn overlaps(&self, other: &RentalPeriod) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `date` falls inside the interval (start inclusive, end
    /// exclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Number of billable nights.
    pub fn nights(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days()
    }
}
