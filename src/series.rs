//! Daily time series - cleaning, alignment, and window math

use chrono::NaiveDate;

/// An ordered daily time series of (date, value) points.
///
/// Dates are strictly increasing and values are finite; both are enforced
/// at construction so downstream math never sees NaN or duplicates.
/// Gaps (missing dates) are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    points: Vec<(NaiveDate, f64)>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Build a cleaned series: non-finite values are dropped, points are
    /// sorted by date, and for duplicate dates the last value wins.
    pub fn from_points(points: Vec<(NaiveDate, f64)>) -> Self {
        let mut pts: Vec<(NaiveDate, f64)> =
            points.into_iter().filter(|(_, v)| v.is_finite()).collect();
        pts.sort_by_key(|(d, _)| *d);
        pts.dedup_by(|a, b| {
            // dedup_by removes `a` when true; keep the later point
            if a.0 == b.0 {
                b.1 = a.1;
                true
            } else {
                false
            }
        });
        Self { points: pts }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }

    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|(_, v)| *v)
    }

    /// Arithmetic mean of the last `n` values. None if the series holds
    /// fewer than `n` points or `n` is zero.
    pub fn tail_mean(&self, n: usize) -> Option<f64> {
        if n == 0 || self.points.len() < n {
            return None;
        }
        let tail = &self.points[self.points.len() - n..];
        Some(tail.iter().map(|(_, v)| v).sum::<f64>() / n as f64)
    }

    /// Inner join with another series on shared dates.
    pub fn align_inner(&self, other: &TimeSeries) -> Vec<(NaiveDate, f64, f64)> {
        let mut out = Vec::new();
        let (mut i, mut j) = (0usize, 0usize);
        while i < self.points.len() && j < other.points.len() {
            let (da, va) = self.points[i];
            let (db, vb) = other.points[j];
            match da.cmp(&db) {
                std::cmp::Ordering::Equal => {
                    out.push((da, va, vb));
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
            }
        }
        out
    }

    /// Daily percent changes between consecutive points. Points with a
    /// zero previous value are skipped.
    pub fn pct_changes(&self) -> Vec<(NaiveDate, f64)> {
        self.points
            .windows(2)
            .filter(|w| w[0].1 != 0.0)
            .map(|w| (w[1].0, w[1].1 / w[0].1 - 1.0))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use chrono::Days;

    /// Daily series starting 2024-01-01 with the given values.
    pub fn daily(values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        TimeSeries::from_points(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start.checked_add_days(Days::new(i as u64)).unwrap(), *v))
                .collect(),
        )
    }
}
