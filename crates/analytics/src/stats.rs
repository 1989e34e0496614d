// In crates/analytics/src/stats.rs

use core_types::{Granularity, TradeEvent};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// Value reported for a ratio whose denominator is zero but whose numerator is positive.
pub const SATURATED_RATIO: f64 = 999.0;

/// `amount / base * 100` as a float, or 0 when `base` is not positive.
///
/// Quotients beyond the `Decimal` range are computed in `f64` instead and
/// clamped to a finite value.
pub(crate) fn percent_of(amount: Decimal, base: Decimal) -> f64 {
    if base <= Decimal::ZERO {
        return 0.0;
    }
    match amount.checked_div(base).and_then(|q| q.checked_mul(dec!(100))) {
        Some(pct) => pct.to_f64().unwrap_or(0.0),
        None => {
            let amount = amount.to_f64().unwrap_or(0.0);
            let base = base.to_f64().unwrap_or(f64::MIN_POSITIVE).max(f64::MIN_POSITIVE);
            let pct = amount / base * 100.0;
            if pct.is_nan() {
                0.0
            } else {
                pct.clamp(-f64::MAX, f64::MAX)
            }
        }
    }
}

/// Divides without ever producing infinity or NaN.
///
/// A zero denominator gives [`SATURATED_RATIO`] when the numerator is positive and 0 otherwise.
pub fn saturating_ratio(numerator: Decimal, denominator: Decimal) -> f64 {
    if denominator.is_zero() {
        return if numerator > Decimal::ZERO { SATURATED_RATIO } else { 0.0 };
    }
    match numerator.checked_div(denominator) {
        Some(ratio) => ratio.to_f64().unwrap_or(0.0),
        None if numerator.is_sign_negative() == denominator.is_sign_negative() => SATURATED_RATIO,
        None => -SATURATED_RATIO,
    }
}

/// Trade-level profitability figures for a set of trades.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeSummary {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub net_pnl: Decimal,
    pub gross_profit: Decimal,
    /// Magnitude of the summed losses.
    pub gross_loss: Decimal,
}

impl TradeSummary {
    pub fn from_trades<'a, I>(trades: I) -> Self
    where
        I: IntoIterator<Item = &'a TradeEvent>,
    {
        let mut summary = Self::default();
        for trade in trades {
            summary.total_trades += 1;
            summary.net_pnl = summary.net_pnl.saturating_add(trade.pnl);
            if trade.pnl > Decimal::ZERO {
                summary.winning_trades += 1;
                summary.gross_profit = summary.gross_profit.saturating_add(trade.pnl);
            } else if trade.pnl < Decimal::ZERO {
                summary.losing_trades += 1;
                summary.gross_loss = summary.gross_loss.saturating_add(trade.pnl.abs());
            }
        }
        summary
    }

    pub fn win_rate(&self) -> f64 {
        if self.total_trades == 0 {
            return 0.0;
        }
        self.winning_trades as f64 / self.total_trades as f64 * 100.0
    }

    pub fn profit_factor(&self) -> f64 {
        saturating_ratio(self.gross_profit, self.gross_loss)
    }

    pub fn avg_win(&self) -> Decimal {
        if self.winning_trades == 0 {
            return Decimal::ZERO;
        }
        self.gross_profit / Decimal::from(self.winning_trades)
    }

    /// Average loss as a positive magnitude.
    pub fn avg_loss(&self) -> Decimal {
        if self.losing_trades == 0 {
            return Decimal::ZERO;
        }
        self.gross_loss / Decimal::from(self.losing_trades)
    }

    pub fn risk_reward(&self) -> f64 {
        saturating_ratio(self.avg_win(), self.avg_loss())
    }
}

/// Annualized Sharpe-like ratio of period returns, assuming a zero risk-free rate.
///
/// Uses the sample standard deviation (n - 1). Needs at least two returns; a
/// flat series has no dispersion and scores 0.
pub fn sharpe_ratio(returns: &[f64], granularity: Granularity) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();
    if std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }
    mean / std_dev * granularity.periods_per_year().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(pnl: Decimal) -> TradeEvent {
        TradeEvent {
            id: pnl.to_string(),
            date: "2024-01-05".to_string(),
            pnl,
            strategy_tag: None,
            emotion_tag: None,
            account_id: "main".to_string(),
        }
    }

    #[test]
    fn summary_counts_wins_losses_and_flat_trades() {
        let trades = vec![
            trade(dec!(100)),
            trade(dec!(-40)),
            trade(dec!(0)),
            trade(dec!(60)),
            trade(dec!(-10)),
        ];
        let s = TradeSummary::from_trades(&trades);

        assert_eq!(s.total_trades, 5);
        assert_eq!(s.winning_trades, 2);
        assert_eq!(s.losing_trades, 2);
        assert_eq!(s.net_pnl, dec!(110));
        assert_eq!(s.gross_profit, dec!(160));
        assert_eq!(s.gross_loss, dec!(50));
        assert!((s.win_rate() - 40.0).abs() < 1e-12);
        assert!((s.profit_factor() - 3.2).abs() < 1e-12);
        assert_eq!(s.avg_win(), dec!(80));
        assert_eq!(s.avg_loss(), dec!(25));
        assert!((s.risk_reward() - 3.2).abs() < 1e-12);
    }

    #[test]
    fn ratios_saturate_instead_of_dividing_by_zero() {
        assert_eq!(saturating_ratio(dec!(100), Decimal::ZERO), SATURATED_RATIO);
        assert_eq!(saturating_ratio(Decimal::ZERO, Decimal::ZERO), 0.0);

        let only_wins = TradeSummary::from_trades(&[trade(dec!(100))]);
        assert_eq!(only_wins.profit_factor(), 999.0);
        assert_eq!(only_wins.risk_reward(), 999.0);

        let only_losses = TradeSummary::from_trades(&[trade(dec!(-100))]);
        assert_eq!(only_losses.profit_factor(), 0.0);
        assert_eq!(only_losses.risk_reward(), 0.0);
    }

    #[test]
    fn empty_summary_is_zeroed() {
        let s = TradeSummary::from_trades(std::iter::empty::<&TradeEvent>());
        assert_eq!(s.win_rate(), 0.0);
        assert_eq!(s.profit_factor(), 0.0);
        assert_eq!(s.avg_win(), Decimal::ZERO);
    }

    #[test]
    fn sharpe_uses_sample_deviation_and_annualizes() {
        let returns = [0.01, 0.03];
        // mean 0.02, sample sd = sqrt(0.0002) ≈ 0.0141421
        let expected = 0.02 / 0.0002f64.sqrt() * 12f64.sqrt();
        assert!((sharpe_ratio(&returns, Granularity::Monthly) - expected).abs() < 1e-9);

        let yearly = sharpe_ratio(&returns, Granularity::Yearly);
        assert!((yearly - 0.02 / 0.0002f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn sharpe_needs_two_returns_and_dispersion() {
        assert_eq!(sharpe_ratio(&[], Granularity::Daily), 0.0);
        assert_eq!(sharpe_ratio(&[0.05], Granularity::Daily), 0.0);
        assert_eq!(sharpe_ratio(&[0.25, 0.25, 0.25], Granularity::Daily), 0.0);
    }

    #[test]
    fn percent_of_guards_non_positive_base() {
        assert_eq!(percent_of(dec!(-500), dec!(100000)), -0.5);
        assert_eq!(percent_of(dec!(-5), Decimal::ZERO), 0.0);
        assert_eq!(percent_of(dec!(-5), dec!(-10)), 0.0);
    }

    #[test]
    fn percent_of_survives_quotients_beyond_decimal_range() {
        let tiny = dec!(0.0000000000000000001);
        let pct = percent_of(dec!(-1000000000), tiny);
        assert!(pct.is_finite());
        assert!(pct < -1e29);

        assert!(percent_of(Decimal::MAX, tiny).is_finite());
    }

    #[test]
    fn ratios_beyond_decimal_range_saturate() {
        let tiny = dec!(0.0000000000000000001);
        assert_eq!(saturating_ratio(Decimal::MAX, tiny), SATURATED_RATIO);
        assert_eq!(saturating_ratio(Decimal::MIN, tiny), -SATURATED_RATIO);
    }

    #[test]
    fn summary_sums_saturate() {
        let half = Decimal::MAX / dec!(2) + Decimal::ONE;
        let s = TradeSummary::from_trades(&[trade(half), trade(half)]);
        assert_eq!(s.gross_profit, Decimal::MAX);
        assert_eq!(s.net_pnl, Decimal::MAX);
        assert_eq!(s.avg_win(), Decimal::MAX / dec!(2));
    }
}
