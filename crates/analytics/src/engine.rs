use crate::curve::{apply_window, drawdown_series, EquityCurveBuilder};
use crate::daily::{aggregate_daily, daily_totals};
use crate::period::{period_key_for, period_label, start_label};
use crate::stats::{percent_of, sharpe_ratio, TradeSummary};
use crate::strategy::{emotion_stats, strategy_stats};
use crate::streak::streaks;
use crate::types::{CurvePoint, EngineSettings, MetricsQuery, MetricsResult, WalkOutcome};
use crate::walk::CalendarWalk;
use chrono::NaiveDate;
use core_types::{Account, JournalSnapshot, TradeEvent, DATE_FORMAT};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Drawdown magnitude (in percent) below which the account counts as sitting at its peak.
const AT_PEAK_TOLERANCE_PCT: f64 = 0.001;

/// A stateless calculator turning a journal snapshot into dashboard metrics.
///
/// Every call recomputes from scratch; nothing is cached between snapshots, so
/// concurrent calls over the same snapshot need no coordination.
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    settings: EngineSettings,
}

impl MetricsEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The main entry point: computes the equity curve and every statistic for one view.
    ///
    /// Never fails. Bad dates, empty input and zero denominators all degrade to
    /// well-defined numbers.
    pub fn calculate(&self, snapshot: &JournalSnapshot, query: &MetricsQuery) -> MetricsResult {
        let baseline = self.baseline_capital(&snapshot.accounts, &query.active_accounts);
        let trades = scoped_trades(&snapshot.trades, &query.active_accounts);

        debug!(
            trades = trades.len(),
            accounts = query.active_accounts.len(),
            granularity = %query.granularity,
            %baseline,
            "Calculating journal metrics."
        );

        if trades.is_empty() {
            return MetricsResult::empty(baseline);
        }

        let mut result = MetricsResult::empty(baseline);
        let returns = self.calculate_curve(&trades, baseline, query, &mut result);
        calculate_profitability(&trades, &mut result);
        result.sharpe_ratio = sharpe_ratio(&returns, query.granularity);
        result.per_strategy = strategy_stats(&trades, baseline);
        result.per_emotion = emotion_stats(&trades);
        result.streaks = streaks(daily_totals(trades.iter().copied()).into_values());

        debug!(
            points = result.equity_curve.len(),
            current_equity = %result.current_equity,
            max_drawdown_pct = result.max_drawdown_pct,
            "Journal metrics ready."
        );
        result
    }

    /// Sum of the active accounts' initial capital, or the configured fallback
    /// when that is not positive.
    pub fn baseline_capital(&self, accounts: &[Account], active: &BTreeSet<String>) -> Decimal {
        let total: Decimal = accounts
            .iter()
            .filter(|a| active.contains(&a.id))
            .map(|a| a.initial_capital)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        if total > Decimal::ZERO {
            total
        } else {
            self.settings.fallback_capital
        }
    }

    /// Walks the calendar and fills in the curve and equity figures.
    /// Returns the period returns for the Sharpe ratio.
    fn calculate_curve(
        &self,
        trades: &[&TradeEvent],
        baseline: Decimal,
        query: &MetricsQuery,
        result: &mut MetricsResult,
    ) -> Vec<f64> {
        let (granularity, locale) = (query.granularity, query.locale);
        let mut builder = EquityCurveBuilder::new(baseline, start_label(locale), |day: NaiveDate| {
            period_label(day, granularity, locale)
        });

        let mut walk_outcome = WalkOutcome::Complete { days: 0 };
        if let Some((first, last)) = date_span(trades) {
            let daily = aggregate_daily(trades.iter().copied());
            let last = last.max(query.as_of);
            let mut walk = CalendarWalk::new(first, last, self.settings.max_walk_days);
            for day in walk.by_ref() {
                let activity = daily.get(&day.format(DATE_FORMAT).to_string());
                builder.record_day(day, period_key_for(day, granularity), activity);
            }
            walk_outcome = walk.outcome();
            if walk_outcome.is_truncated() {
                warn!(
                    ?walk_outcome,
                    %first,
                    max_days = self.settings.max_walk_days,
                    "Equity walk hit its day cap; the curve is truncated."
                );
            }
        } else {
            warn!(
                trades = trades.len(),
                "No trade carries a parseable date; the curve only has its start point."
            );
        }

        let (curve, returns) = builder.finish();
        let windowed = apply_window(&curve, &query.window);
        // The full curve always ends with the latest state, whatever the window shows.
        let latest = curve.last().map(|p| (p.equity, p.drawdown_pct));

        if let Some((equity, drawdown_pct)) = latest {
            result.current_equity = equity;
            result.current_drawdown_pct = drawdown_pct;
        }
        result.equity_change = result.current_equity.saturating_sub(baseline);
        result.equity_change_pct = percent_of(result.equity_change, baseline);
        result.max_drawdown_pct = max_drawdown_pct(&windowed);
        result.is_peak = result.current_drawdown_pct.abs() < AT_PEAK_TOLERANCE_PCT;
        result.drawdown_series = drawdown_series(&windowed);
        result.equity_curve = windowed;
        result.walk = walk_outcome;

        returns
    }
}

/// Trades booked to an active account, in chronological order; undated trades go last.
fn scoped_trades<'a>(trades: &'a [TradeEvent], active: &BTreeSet<String>) -> Vec<&'a TradeEvent> {
    let mut scoped: Vec<&TradeEvent> = trades
        .iter()
        .filter(|t| active.contains(&t.account_id))
        .collect();
    scoped.sort_by_cached_key(|t| match t.parsed_date() {
        Some(date) => (false, date),
        None => (true, NaiveDate::MAX),
    });
    scoped
}

/// Earliest and latest parseable trade dates.
fn date_span(trades: &[&TradeEvent]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = trades.iter().filter_map(|t| t.parsed_date());
    let first = dates.next()?;
    let last = dates.fold(first, NaiveDate::max);
    Some((first, last))
}

fn max_drawdown_pct(points: &[CurvePoint]) -> f64 {
    points.iter().map(|p| p.drawdown_pct).fold(0.0, f64::min)
}

/// Fills in the trade-level profitability figures.
fn calculate_profitability(trades: &[&TradeEvent], result: &mut MetricsResult) {
    let summary = TradeSummary::from_trades(trades.iter().copied());
    result.total_trades = summary.total_trades;
    result.winning_trades = summary.winning_trades;
    result.losing_trades = summary.losing_trades;
    result.net_pnl = summary.net_pnl;
    result.gross_profit = summary.gross_profit;
    result.gross_loss = summary.gross_loss;
    result.win_rate = summary.win_rate();
    result.profit_factor = summary.profit_factor();
    result.avg_win = summary.avg_win();
    result.avg_loss = summary.avg_loss();
    result.risk_reward = summary.risk_reward();
}
