// In app/src/report.rs

use analytics::{MetricsQuery, MetricsResult, Streaks};
use chrono::NaiveDate;
use core_types::{DateWindow, Granularity, JournalSnapshot, Locale};
use itertools::Itertools;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Number of strategies listed in the text report.
const TOP_STRATEGIES: usize = 10;

/// The view selection taken from the command line.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub accounts: Option<Vec<String>>,
    pub granularity: Granularity,
    pub locale: Locale,
    pub window: DateWindow,
    pub as_of: NaiveDate,
}

impl ReportOptions {
    pub fn query(&self, snapshot: &JournalSnapshot) -> MetricsQuery {
        let active = snapshot.select_accounts(self.accounts.as_deref());
        let mut query = MetricsQuery::new(active, self.as_of);
        query.granularity = self.granularity;
        query.locale = self.locale;
        query.window = self.window;
        query
    }
}

fn signed_pct(value: f64) -> String {
    format!("{value:+.2}%")
}

/// Helper function to print the full metrics report for one view.
pub fn print_report(result: &MetricsResult, query: &MetricsQuery) {
    println!("\n--- Journal Metrics ({}) ---", query.granularity);
    println!("Accounts: {}", query.active_accounts.iter().join(", "));
    println!("---------------------------------");
    println!(
        "  - Equity: ${:.2} (baseline ${:.2}, change ${:.2} / {})",
        result.current_equity,
        result.baseline_capital,
        result.equity_change,
        signed_pct(result.equity_change_pct)
    );
    println!(
        "  - Drawdown: {:.2}% | Max Drawdown: {:.2}% | At Peak: {}",
        result.current_drawdown_pct,
        result.max_drawdown_pct,
        if result.is_peak { "yes" } else { "no" }
    );
    println!(
        "  - Trades: {} (won {} / lost {}) | Win Rate: {:.2}% | Net P&L: ${:.2}",
        result.total_trades,
        result.winning_trades,
        result.losing_trades,
        result.win_rate,
        result.net_pnl
    );
    println!(
        "  - Profit Factor: {:.2} | Avg Win: ${:.2} | Avg Loss: ${:.2} | Risk/Reward: {:.2} | Sharpe: {:.2}",
        result.profit_factor,
        result.avg_win,
        result.avg_loss,
        result.risk_reward,
        result.sharpe_ratio
    );
    println!(
        "  - Streaks: best {} | current {}",
        result.streaks.best, result.streaks.current
    );
    if result.walk.is_truncated() {
        println!("  - Note: the equity curve was truncated ({:?}).", result.walk);
    }

    println!("\nEquity Curve:");
    for point in &result.equity_curve {
        println!(
            "  {:<14} ${:>12.2}  {:>8.2}%  {:>+10.2}{}",
            point.label,
            point.equity,
            point.drawdown_pct,
            point.period_pnl,
            if point.is_new_peak { "  *" } else { "" }
        );
    }

    if !result.per_strategy.is_empty() {
        println!("\nStrategies (by P&L):");
        let ranked = result
            .per_strategy
            .iter()
            .sorted_by(|a, b| b.1.pnl.cmp(&a.1.pnl))
            .take(TOP_STRATEGIES);
        for (tag, stats) in ranked {
            println!(
                "  {:<16} P&L ${:.2} | Trades {} | Win {:.1}% | DD {:.2}% (max {:.2}%){}",
                tag,
                stats.pnl,
                stats.trades,
                stats.win_rate,
                stats.current_drawdown_pct,
                stats.max_drawdown_pct,
                if stats.is_new_high { " | new high" } else { "" }
            );
        }
    }

    if !result.per_emotion.is_empty() {
        println!("\nEmotions:");
        for (tag, stats) in &result.per_emotion {
            println!(
                "  {:<16} P&L ${:.2} | Trades {} | Win {:.1}% | Avg ${:.2}",
                tag, stats.pnl, stats.trades, stats.win_rate, stats.avg_pnl
            );
        }
    }
    println!("\n---------------------------------");
}

/// One summary line per granularity.
pub fn print_granularity_summary(rows: &[(Granularity, MetricsResult)]) {
    println!("\n--- Metrics by Granularity ---");
    for (granularity, result) in rows {
        println!(
            "  {:<10} points {:>5} | Max Drawdown: {:>8.2}% | Sharpe: {:>6.2} | Equity: ${:.2}",
            granularity.as_str(),
            result.equity_curve.len(),
            result.max_drawdown_pct,
            result.sharpe_ratio,
            result.current_equity
        );
    }
    println!("---------------------------------");
}

/// Prints the per-day totals behind the calendar heatmap.
pub fn print_calendar(days: &BTreeMap<String, Decimal>, streaks: Streaks) {
    println!("\n--- Trading Calendar ---");
    for (date, total) in days {
        let marker = if *total > Decimal::ZERO {
            "+"
        } else if *total < Decimal::ZERO {
            "-"
        } else {
            "="
        };
        println!("  {date}  {marker} {total:>12.2}");
    }
    println!("---------------------------------");
    println!("Winning streak: best {} days | current {} days", streaks.best, streaks.current);
}
