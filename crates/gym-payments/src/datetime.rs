
use chrono::{Datelike, Local, NaiveDateTime};

/// Current local time. Payments are recorded without timezone.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Do both timestamps fall into the same calendar month?
pub trait SameMonth {
    fn same_month(&self, other: &Self) -> bool;
}

impl SameMonth for NaiveDateTime {
    fn same_month(&self, other: &Self) -> bool {
        self.year() == other.year() && self.month() == other.month()
    }
}

/// Number of whole days from `earlier` to `later`.
/// Partial days are dropped.
pub fn whole_days(earlier: NaiveDateTime, later: NaiveDateTime) -> i64 {
    (later - earlier).num_days()
}
