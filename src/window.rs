use chrono::{Days, NaiveDate};

/// Optional caller-supplied date bounds, e.g. parsed from query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowBounds {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Resolved inclusive date range the aggregator computes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Fills missing bounds: start defaults to the account-creation date,
    /// end defaults to today.
    pub fn resolve(bounds: WindowBounds, account_created: NaiveDate, today: NaiveDate) -> Self {
        Self {
            start: bounds.start.unwrap_or(account_created),
            end: bounds.end.unwrap_or(today),
        }
    }

    /// The trailing `n`-day window ending today (inclusive on both ends).
    pub fn last_days(n: u32, today: NaiveDate) -> Self {
        let back = n.saturating_sub(1) as u64;
        Self {
            start: today.checked_sub_days(Days::new(back)).unwrap_or(today),
            end: today,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Inclusive day count, floored at 1 so it is always a safe divisor.
    pub fn days_inclusive(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_resolve_defaults() {
        let window = DateWindow::resolve(
            WindowBounds::default(),
            d("2021-06-15"),
            d("2022-01-08"),
        );
        assert_eq!(window.start, d("2021-06-15"));
        assert_eq!(window.end, d("2022-01-08"));
    }

    #[test]
    fn test_resolve_explicit_bounds_win() {
        let bounds = WindowBounds {
            start: Some(d("2022-01-01")),
            end: Some(d("2022-01-31")),
        };
        let window = DateWindow::resolve(bounds, d("2021-06-15"), d("2022-02-10"));
        assert_eq!(window, DateWindow::new(d("2022-01-01"), d("2022-01-31")));
    }

    #[test]
    fn test_last_days() {
        let window = DateWindow::last_days(7, d("2022-01-08"));
        assert_eq!(window.start, d("2022-01-02"));
        assert_eq!(window.end, d("2022-01-08"));
        assert_eq!(window.days_inclusive(), 7);

        let single = DateWindow::last_days(1, d("2022-01-08"));
        assert_eq!(single.start, single.end);
    }

    #[test]
    fn test_days_inclusive_never_zero() {
        let window = DateWindow::new(d("2022-01-08"), d("2022-01-08"));
        assert_eq!(window.days_inclusive(), 1);

        // A backwards window still yields a usable divisor.
        let backwards = DateWindow::new(d("2022-01-08"), d("2022-01-01"));
        assert_eq!(backwards.days_inclusive(), 1);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let window = DateWindow::new(d("2022-01-01"), d("2022-01-31"));
        assert!(window.contains(d("2022-01-01")));
        assert!(window.contains(d("2022-01-31")));
        assert!(!window.contains(d("2022-02-01")));
    }
}
