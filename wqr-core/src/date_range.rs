use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::mem::replace;

/// The reporting period: an inclusive date range that yields each date from
/// the start date through the end date when iterated.
#[derive(Clone, Eq, PartialEq, Copy, Debug, Serialize, Deserialize)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    pub fn start(&self) -> NaiveDate {
        self.0
    }

    pub fn end(&self) -> NaiveDate {
        self.1
    }

    /// Number of calendar days covered, both endpoints included.
    /// Zero when the end precedes the start.
    pub fn day_count(&self) -> usize {
        let days = (self.1 - self.0).num_days() + 1;
        if days > 0 {
            days as usize
        } else {
            0
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0 <= date && date <= self.1
    }

    /// The date at `offset` days past the start of the range.
    pub fn date_at(&self, offset: usize) -> NaiveDate {
        self.0 + TimeDelta::try_days(offset as i64).unwrap_or_default()
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let next = self.0 + TimeDelta::try_days(1).unwrap();
            Some(replace(&mut self.0, next))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DateRange;
    use chrono::NaiveDate;

    #[test]
    fn test_date_range_iteration() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let range = DateRange(start, end);
        let dates: Vec<NaiveDate> = range.collect();
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[0], start);
        assert_eq!(dates[4], end);
    }

    #[test]
    fn test_day_count_matches_iteration() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let range = DateRange(start, end);
        assert_eq!(range.day_count(), 30); // leap February plus March 1
        assert_eq!(range.count(), 30);
    }

    #[test]
    fn test_day_count_single_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let range = DateRange(day, day);
        assert_eq!(range.day_count(), 1);
    }

    #[test]
    fn test_day_count_inverted_is_zero() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let range = DateRange(start, end);
        assert_eq!(range.day_count(), 0);
        assert_eq!(range.count(), 0);
    }

    #[test]
    fn test_date_at_offset() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let range = DateRange(start, end);
        assert_eq!(range.date_at(0), start);
        assert_eq!(
            range.date_at(6),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
        );
    }
}
