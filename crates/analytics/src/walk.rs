use crate::types::WalkOutcome;
use chrono::NaiveDate;

/// Iterates calendar days from `first` to `last` inclusive, giving up after `max_days`.
///
/// Bucket boundaries such as week numbers are irregular, so the curve is built
/// by visiting every day rather than jumping from bucket to bucket.
#[derive(Debug, Clone)]
pub struct CalendarWalk {
    next: Option<NaiveDate>,
    last: NaiveDate,
    max_days: usize,
    days: usize,
    truncated: bool,
}

impl CalendarWalk {
    pub fn new(first: NaiveDate, last: NaiveDate, max_days: usize) -> Self {
        Self {
            next: Some(first),
            last,
            max_days,
            days: 0,
            truncated: false,
        }
    }

    /// Days visited so far and whether the cap cut the walk short.
    pub fn outcome(&self) -> WalkOutcome {
        if self.truncated {
            WalkOutcome::Truncated { days: self.days }
        } else {
            WalkOutcome::Complete { days: self.days }
        }
    }
}

impl Iterator for CalendarWalk {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let day = self.next?;
        if day > self.last {
            self.next = None;
            return None;
        }
        if self.days >= self.max_days {
            self.truncated = true;
            self.next = None;
            return None;
        }
        self.days += 1;
        self.next = day.succ_opt();
        Some(day)
    }
}
