// In crates/analytics/src/curve.rs

use crate::daily::DailyBucket;
use crate::period::START_PERIOD_KEY;
use crate::stats::percent_of;
use crate::types::{CurvePoint, DrawdownPoint};
use chrono::NaiveDate;
use core_types::DateWindow;
use rust_decimal::prelude::*;
use std::collections::BTreeMap;

/// PnL gathered for the bucket currently being walked.
#[derive(Debug)]
struct OpenBucket {
    key: String,
    last_day: NaiveDate,
    pnl: Decimal,
    by_account: BTreeMap<String, Decimal>,
}

/// Builds the equity curve one calendar day at a time.
///
/// A point is emitted whenever the bucket key changes between consecutive days,
/// and once more for the final bucket in [`EquityCurveBuilder::finish`].
pub struct EquityCurveBuilder<L> {
    label_for: L,
    equity: Decimal,
    peak: Decimal,
    previous_equity: Decimal,
    points: Vec<CurvePoint>,
    returns: Vec<f64>,
    bucket: Option<OpenBucket>,
}

impl<L> EquityCurveBuilder<L>
where
    L: Fn(NaiveDate) -> String,
{
    /// Starts a curve at `baseline` with the synthetic Start point already in place.
    pub fn new(baseline: Decimal, start_label: &str, label_for: L) -> Self {
        let start = CurvePoint {
            label: start_label.to_string(),
            period_key: START_PERIOD_KEY.to_string(),
            full_date: None,
            equity: baseline,
            peak: baseline,
            drawdown: Decimal::ZERO,
            drawdown_pct: 0.0,
            is_new_peak: false,
            period_pnl: Decimal::ZERO,
            account_pnl: BTreeMap::new(),
        };
        Self {
            label_for,
            equity: baseline,
            peak: baseline,
            previous_equity: baseline,
            points: vec![start],
            returns: Vec::new(),
            bucket: None,
        }
    }

    /// Records one walked day. `activity` is `None` on days without trades.
    pub fn record_day(&mut self, day: NaiveDate, key: String, activity: Option<&DailyBucket>) {
        let changed = self.bucket.as_ref().is_some_and(|b| b.key != key);
        if changed {
            self.close_bucket();
        }

        let bucket = self.bucket.get_or_insert_with(|| OpenBucket {
            key,
            last_day: day,
            pnl: Decimal::ZERO,
            by_account: BTreeMap::new(),
        });
        bucket.last_day = day;

        if let Some(activity) = activity {
            self.equity = self.equity.saturating_add(activity.total);
            bucket.pnl = bucket.pnl.saturating_add(activity.total);
            for (account, pnl) in &activity.by_account {
                let total = bucket.by_account.entry(account.clone()).or_default();
                *total = total.saturating_add(*pnl);
            }
        }
    }

    /// Emits the last open bucket and returns the points and the period returns.
    pub fn finish(mut self) -> (Vec<CurvePoint>, Vec<f64>) {
        self.close_bucket();
        (self.points, self.returns)
    }

    fn close_bucket(&mut self) {
        let Some(bucket) = self.bucket.take() else {
            return;
        };

        let is_new_peak = self.equity > self.peak;
        self.peak = self.peak.max(self.equity);
        let drawdown = self.equity.saturating_sub(self.peak);
        let drawdown_pct = percent_of(drawdown, self.peak);

        if self.previous_equity > Decimal::ZERO {
            // A return too large to represent is left out of the series.
            let period_return = self
                .equity
                .saturating_sub(self.previous_equity)
                .checked_div(self.previous_equity);
            if let Some(period_return) = period_return {
                self.returns.push(period_return.to_f64().unwrap_or(0.0));
            }
        }
        self.previous_equity = self.equity;

        self.points.push(CurvePoint {
            label: (self.label_for)(bucket.last_day),
            period_key: bucket.key,
            full_date: Some(bucket.last_day),
            equity: self.equity,
            peak: self.peak,
            drawdown,
            drawdown_pct,
            is_new_peak,
            period_pnl: bucket.pnl,
            account_pnl: bucket.by_account,
        });
    }
}

/// Keeps the Start point plus the points whose bucket ended inside `window`.
///
/// Peaks and drawdowns are left exactly as the full walk produced them.
pub fn apply_window(points: &[CurvePoint], window: &DateWindow) -> Vec<CurvePoint> {
    if !window.is_active() {
        return points.to_vec();
    }
    points
        .iter()
        .filter(|p| p.full_date.is_none_or(|date| window.contains(date)))
        .cloned()
        .collect()
}

pub fn drawdown_series(points: &[CurvePoint]) -> Vec<DrawdownPoint> {
    points
        .iter()
        .map(|p| DrawdownPoint {
            label: p.label.clone(),
            drawdown_pct: p.drawdown_pct,
            full_date: p.full_date,
        })
        .collect()
}
