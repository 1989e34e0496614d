use crate::types::Streaks;
use rust_decimal::Decimal;

/// Counts runs of consecutive profitable days.
///
/// `daily_totals` must be in chronological order. Any non-positive day breaks a
/// run; the current streak is 0 when the most recent day was not profitable.
pub fn streaks<I>(daily_totals: I) -> Streaks
where
    I: IntoIterator<Item = Decimal>,
{
    let mut best = 0;
    let mut run = 0;
    for total in daily_totals {
        if total > Decimal::ZERO {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    // After a forward scan the open run is exactly the backward count from the latest day.
    Streaks { best, current: run }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn best_and_current_runs() {
        let s = streaks([dec!(10), dec!(5), dec!(-3), dec!(2), dec!(1)]);
        assert_eq!(s, Streaks { best: 2, current: 2 });
    }

    #[test]
    fn losing_latest_day_resets_current() {
        let s = streaks([dec!(1), dec!(1), dec!(1), dec!(-1)]);
        assert_eq!(s, Streaks { best: 3, current: 0 });
    }

    #[test]
    fn flat_days_break_a_run() {
        let s = streaks([dec!(4), dec!(0), dec!(4), dec!(4)]);
        assert_eq!(s, Streaks { best: 2, current: 2 });
    }

    #[test]
    fn no_days_no_streak() {
        assert_eq!(streaks(Vec::<Decimal>::new()), Streaks::default());
    }
}
