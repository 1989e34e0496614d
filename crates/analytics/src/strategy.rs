// In crates/analytics/src/strategy.rs

use crate::stats::{percent_of, TradeSummary};
use crate::types::{EmotionStats, StrategyStats};
use core_types::TradeEvent;
use itertools::Itertools;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// Tolerance under which a strategy's cumulative PnL counts as sitting at its high.
const NEW_HIGH_TOLERANCE: Decimal = dec!(0.01);

/// Computes drawdown statistics for every non-blank strategy tag.
///
/// `trades` must already be in chronological order. Drawdown percentages are
/// taken against `baseline_capital` so that strategies are comparable to the
/// total capital at risk.
pub fn strategy_stats(
    trades: &[&TradeEvent],
    baseline_capital: Decimal,
) -> BTreeMap<String, StrategyStats> {
    trades
        .iter()
        .filter_map(|t| t.strategy().map(|tag| (tag, *t)))
        .into_group_map()
        .into_iter()
        .map(|(tag, tagged)| (tag.to_string(), single_strategy(&tagged, baseline_capital)))
        .collect()
}

fn single_strategy(trades: &[&TradeEvent], baseline_capital: Decimal) -> StrategyStats {
    let mut cumulative = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut max_drawdown = Decimal::ZERO;

    for trade in trades {
        cumulative = cumulative.saturating_add(trade.pnl);
        peak = peak.max(cumulative);
        max_drawdown = max_drawdown.min(cumulative.saturating_sub(peak));
    }

    let summary = TradeSummary::from_trades(trades.iter().copied());
    let current_drawdown = cumulative.saturating_sub(peak);

    StrategyStats {
        pnl: cumulative,
        trades: summary.total_trades,
        wins: summary.winning_trades,
        win_rate: summary.win_rate(),
        peak,
        max_drawdown,
        max_drawdown_pct: percent_of(max_drawdown, baseline_capital),
        current_drawdown,
        current_drawdown_pct: percent_of(current_drawdown, baseline_capital),
        is_new_high: !trades.is_empty() && current_drawdown.abs() < NEW_HIGH_TOLERANCE,
    }
}

/// Groups outcomes by emotion tag.
pub fn emotion_stats(trades: &[&TradeEvent]) -> BTreeMap<String, EmotionStats> {
    trades
        .iter()
        .filter_map(|t| t.emotion().map(|tag| (tag, *t)))
        .into_group_map()
        .into_iter()
        .map(|(tag, tagged)| {
            let summary = TradeSummary::from_trades(tagged.iter().copied());
            let avg_pnl = if summary.total_trades > 0 {
                summary.net_pnl / Decimal::from(summary.total_trades)
            } else {
                Decimal::ZERO
            };
            let stats = EmotionStats {
                pnl: summary.net_pnl,
                trades: summary.total_trades,
                wins: summary.winning_trades,
                win_rate: summary.win_rate(),
                avg_pnl,
            };
            (tag.to_string(), stats)
        })
        .collect()
}
