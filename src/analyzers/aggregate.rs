use chrono::NaiveDate;
use clap::ValueEnum;

use crate::analyzers::types::{AlignedDay, PeriodBucket};
use crate::analyzers::utility::ratio_percent;
use crate::dates::add_days;
use crate::error::{Error, Result};

/// How a bucket opened after the first one picks its start date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Anchor {
    /// The new bucket starts on the first day that crossed the previous
    /// boundary. Buckets after a gap in the data drift off the `start` grid.
    #[default]
    FirstDay,
    /// Bucket starts stay on `start + k * period_days`; empty periods are skipped.
    Fixed,
}

/// End of the period starting at `from`; saturates at the last representable date.
fn boundary_after(from: NaiveDate, period: i64) -> NaiveDate {
    add_days(from, period).unwrap_or(NaiveDate::MAX)
}

struct Fold {
    closed: Vec<PeriodBucket>,
    open: PeriodBucket,
    boundary: NaiveDate,
}

/// Folds aligned days into consecutive buckets of `period_days` days.
///
/// The first bucket starts at `start`. Days are expected in ascending order.
/// The trailing bucket is always emitted, even when partial or empty, so empty
/// input yields one zero bucket at `start`.
pub fn aggregate(
    days: &[AlignedDay],
    start: NaiveDate,
    period_days: u32,
    anchor: Anchor,
) -> Result<Vec<PeriodBucket>> {
    if period_days == 0 {
        return Err(Error::InvalidArgument(
            "period_days must be a positive number of days".into(),
        ));
    }
    let period = i64::from(period_days);

    let initial = Fold {
        closed: Vec::new(),
        open: PeriodBucket::empty(start),
        boundary: boundary_after(start, period),
    };

    let fold = days.iter().try_fold(initial, |mut fold, day| -> Result<Fold> {
        if day.day >= fold.boundary {
            let period_start = match anchor {
                Anchor::FirstDay => day.day,
                Anchor::Fixed => {
                    let elapsed = (day.day - start).num_days();
                    add_days(start, elapsed - elapsed.rem_euclid(period))?
                }
            };
            let finished = std::mem::replace(&mut fold.open, PeriodBucket::empty(period_start));
            fold.closed.push(finished);
            fold.boundary = boundary_after(period_start, period);
        }

        let bucket = &mut fold.open;
        bucket.sum_a += day.count_a;
        bucket.sum_b += day.count_b;
        bucket.days += 1;
        bucket.ratio = ratio_percent(bucket.sum_b, bucket.sum_a);
        Ok(fold)
    })?;

    let mut buckets = fold.closed;
    buckets.push(fold.open);
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn run_of(start: NaiveDate, n: i64, a: u64, b: u64) -> Vec<AlignedDay> {
        (0..n)
            .map(|i| AlignedDay {
                day: add_days(start, i).unwrap(),
                count_a: a,
                count_b: b,
            })
            .collect()
    }

    #[test]
    fn test_ten_days_in_two_periods() {
        let start = d(2024, 1, 1);
        let days = run_of(start, 10, 100, 10);

        let buckets = aggregate(&days, start, 5, Anchor::FirstDay).unwrap();

        assert_eq!(buckets.len(), 2);
        for bucket in &buckets {
            assert_eq!(bucket.sum_a, 500);
            assert_eq!(bucket.sum_b, 50);
            assert_eq!(bucket.days, 5);
            assert_eq!(bucket.ratio, Some(10.0));
        }
        assert_eq!(buckets[1].period_start, d(2024, 1, 6));
    }

    #[test]
    fn test_partial_trailing_bucket() {
        let start = d(2024, 1, 1);
        let days = run_of(start, 12, 1, 1);

        let buckets = aggregate(&days, start, 5, Anchor::FirstDay).unwrap();

        let sizes: Vec<u32> = buckets.iter().map(|b| b.days).collect();
        assert_eq!(sizes, vec![5, 5, 2]);
    }

    #[test]
    fn test_ratio_uses_bucket_sums() {
        let start = d(2024, 1, 1);
        let days = vec![
            AlignedDay { day: start, count_a: 150, count_b: 10 },
            AlignedDay { day: d(2024, 1, 2), count_a: 50, count_b: 40 },
        ];

        let buckets = aggregate(&days, start, 7, Anchor::FirstDay).unwrap();

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].sum_a, 200);
        assert_eq!(buckets[0].sum_b, 50);
        assert_eq!(buckets[0].ratio, Some(25.0));
    }

    #[test]
    fn test_zero_sum_a_has_no_ratio() {
        let start = d(2024, 1, 1);
        let days = run_of(start, 3, 0, 7);

        let buckets = aggregate(&days, start, 7, Anchor::FirstDay).unwrap();

        assert_eq!(buckets[0].sum_b, 21);
        assert_eq!(buckets[0].ratio, None);
    }

    #[test]
    fn test_empty_input_yields_single_zero_bucket() {
        let start = d(2024, 1, 1);

        let buckets = aggregate(&[], start, 30, Anchor::FirstDay).unwrap();

        assert_eq!(buckets, vec![PeriodBucket::empty(start)]);
    }

    #[test]
    fn test_zero_period_rejected() {
        let err = aggregate(&[], d(2024, 1, 1), 0, Anchor::FirstDay).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_huge_period_yields_single_bucket() {
        let start = d(2024, 1, 1);
        let days = run_of(start, 400, 2, 1);

        let buckets = aggregate(&days, start, u32::MAX, Anchor::FirstDay).unwrap();

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].days, 400);
        assert_eq!(buckets[0].ratio, Some(50.0));
        assert_eq!(aggregate(&[], start, u32::MAX, Anchor::Fixed).unwrap().len(), 1);
    }

    #[test]
    fn test_first_day_anchor_follows_gap() {
        // Jan 1-3, then nothing until Jan 9: the second bucket starts on Jan 9,
        // not on the Jan 6 grid point.
        let start = d(2024, 1, 1);
        let mut days = run_of(start, 3, 1, 1);
        days.extend(run_of(d(2024, 1, 9), 6, 1, 1));

        let buckets = aggregate(&days, start, 5, Anchor::FirstDay).unwrap();

        let starts: Vec<NaiveDate> = buckets.iter().map(|b| b.period_start).collect();
        assert_eq!(starts, vec![d(2024, 1, 1), d(2024, 1, 9), d(2024, 1, 14)]);
    }

    #[test]
    fn test_fixed_anchor_stays_on_grid() {
        let start = d(2024, 1, 1);
        let mut days = run_of(start, 3, 1, 1);
        days.extend(run_of(d(2024, 1, 9), 6, 1, 1));

        let buckets = aggregate(&days, start, 5, Anchor::Fixed).unwrap();

        let starts: Vec<NaiveDate> = buckets.iter().map(|b| b.period_start).collect();
        assert_eq!(starts, vec![d(2024, 1, 1), d(2024, 1, 6), d(2024, 1, 11)]);
        let sizes: Vec<u32> = buckets.iter().map(|b| b.days).collect();
        assert_eq!(sizes, vec![3, 2, 4]);
    }

    #[test]
    fn test_anchors_agree_on_contiguous_days() {
        let start = d(2023, 12, 20);
        let days = run_of(start, 40, 3, 1);

        let first_day = aggregate(&days, start, 7, Anchor::FirstDay).unwrap();
        let fixed = aggregate(&days, start, 7, Anchor::Fixed).unwrap();

        assert_eq!(first_day, fixed);
    }

    #[test]
    fn test_every_day_counted_once() {
        let start = d(2024, 2, 1);
        let days = run_of(start, 97, 1, 0);

        let buckets = aggregate(&days, start, 30, Anchor::FirstDay).unwrap();

        assert_eq!(buckets.iter().map(|b| b.days).sum::<u32>(), 97);
        assert_eq!(buckets.iter().map(|b| b.sum_a).sum::<u64>(), 97);
        for pair in buckets.windows(2) {
            assert_eq!(
                pair[1].period_start,
                add_days(pair[0].period_start, 30).unwrap()
            );
        }
    }
}
