//! Time series normalization and volume delta computation.
//!
//! This crate turns sparse, timestamped readings into the gap-free daily
//! series the report pages are built from.

/// Daily normalization: one value per calendar day of the period.
pub mod normalize {
    use chrono::NaiveDateTime;
    use wqr_core::date_range::DateRange;
    use wqr_core::round2;

    /// Normalize timestamped readings into a daily series over `range`.
    ///
    /// Every calendar day of the period gets exactly one entry: the
    /// arithmetic mean of that day's readings rounded to 2 decimals, or 0.0
    /// when the day has none. The output length always equals the inclusive
    /// day count of the period, however sparse the input.
    pub fn normalize_daily(readings: &[(NaiveDateTime, f64)], range: DateRange) -> Vec<f64> {
        let day_count = range.day_count();
        let mut sums = vec![0.0f64; day_count];
        let mut counts = vec![0u32; day_count];

        for (timestamp, value) in readings {
            let date = timestamp.date();
            if !range.contains(date) {
                continue;
            }
            let index = (date - range.start()).num_days() as usize;
            sums[index] += value;
            counts[index] += 1;
        }

        sums.iter()
            .zip(counts.iter())
            .map(|(sum, count)| {
                if *count == 0 {
                    0.0
                } else {
                    round2(sum / *count as f64)
                }
            })
            .collect()
    }

}

/// Cumulative meter readings to daily consumption.
pub mod volume {
    use chrono::{Datelike, NaiveDate, Weekday};
    use log::warn;
    use wqr_core::date_range::DateRange;
    use wqr_core::round2;

    /// Total consumption over the period: last nonzero cumulative reading
    /// minus the first nonzero one. Zero when fewer than two readings
    /// exist. Assumes a single monotonically increasing meter; resets and
    /// rollover are a known limitation, not handled here.
    pub fn total_consumption(cumulative: &[f64]) -> f64 {
        let mut nonzero = cumulative.iter().filter(|v| **v != 0.0);
        let first = nonzero.next();
        let last = nonzero.last();
        match (first, last) {
            (Some(first), Some(last)) => round2(last - first),
            _ => 0.0,
        }
    }

    /// Convert a daily cumulative series (0.0 encodes "no reading") into
    /// daily consumption deltas. A day with no reading yields 0.0, as does
    /// the day a baseline is first established. A negative difference
    /// (meter reset) yields 0.0 and re-baselines from the new reading.
    pub fn daily_deltas(cumulative: &[f64]) -> Vec<f64> {
        let mut deltas = vec![0.0f64; cumulative.len()];
        let mut baseline: Option<f64> = None;
        for (index, reading) in cumulative.iter().enumerate() {
            if *reading == 0.0 {
                continue;
            }
            if let Some(previous) = baseline {
                let delta = reading - previous;
                if delta >= 0.0 {
                    deltas[index] = round2(delta);
                } else {
                    warn!(
                        "cumulative reading decreased at day offset {} ({} -> {}); treating as meter reset",
                        index, previous, reading
                    );
                }
            }
            baseline = Some(*reading);
        }
        deltas
    }

    /// Sunday/Monday redistribution.
    ///
    /// Meters are often read on Monday after an unread Sunday, which lumps
    /// two days of consumption into one. For each Sunday whose delta is
    /// exactly zero followed by a Monday with a nonzero delta, the Monday
    /// delta is split evenly across both days (each half rounded to 2
    /// decimals, pair sum preserved within 0.01). Every other shape is
    /// left untouched: a nonzero Sunday, a zero Monday, and any other
    /// weekday pair never trigger the rule.
    pub fn redistribute_weekends(deltas: &mut [f64], start: NaiveDate) {
        for index in 1..deltas.len() {
            let day = start + chrono::TimeDelta::try_days(index as i64).unwrap_or_default();
            if day.weekday() != Weekday::Mon {
                continue;
            }
            if deltas[index] == 0.0 || deltas[index - 1] != 0.0 {
                // Rule not applicable: a no-op, not an error.
                continue;
            }
            let half = round2(deltas[index] / 2.0);
            deltas[index - 1] = half;
            deltas[index] = half;
        }
    }

    /// Full volume pipeline for one point: deltas from the normalized
    /// cumulative series, then the weekend redistribution aligned to the
    /// period start.
    pub fn consumption_series(cumulative: &[f64], range: DateRange) -> Vec<f64> {
        let mut deltas = daily_deltas(cumulative);
        redistribute_weekends(&mut deltas, range.start());
        deltas
    }

}
