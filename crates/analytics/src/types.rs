// In crates/analytics/src/types.rs

use chrono::NaiveDate;
use core_types::{DateWindow, Granularity, Locale};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Baseline equity used when the active accounts hold no capital at all.
pub const DEFAULT_FALLBACK_CAPITAL: Decimal = dec!(100_000);

/// Upper bound on the number of calendar days a single equity walk may visit.
pub const DEFAULT_MAX_WALK_DAYS: usize = 5_000;

fn default_fallback_capital() -> Decimal {
    DEFAULT_FALLBACK_CAPITAL
}

fn default_max_walk_days() -> usize {
    DEFAULT_MAX_WALK_DAYS
}

/// Tunables for the `MetricsEngine`. Loaded from the `[metrics]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Substituted for the baseline when the active accounts' capital sums to zero or less.
    #[serde(default = "default_fallback_capital")]
    pub fallback_capital: Decimal,
    #[serde(default = "default_max_walk_days")]
    pub max_walk_days: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fallback_capital: DEFAULT_FALLBACK_CAPITAL,
            max_walk_days: DEFAULT_MAX_WALK_DAYS,
        }
    }
}

/// The caller's view selection for one metrics computation.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsQuery {
    /// Only trades booked to these accounts are in scope; their capital forms the baseline.
    pub active_accounts: BTreeSet<String>,
    pub granularity: Granularity,
    pub locale: Locale,
    pub window: DateWindow,
    /// The observation date ("today"). The curve always extends at least this far.
    pub as_of: NaiveDate,
}

impl MetricsQuery {
    pub fn new(active_accounts: BTreeSet<String>, as_of: NaiveDate) -> Self {
        Self {
            active_accounts,
            granularity: Granularity::default(),
            locale: Locale::default(),
            window: DateWindow::default(),
            as_of,
        }
    }
}

/// One emitted point of the equity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePoint {
    /// Human-readable bucket label in the requested locale.
    pub label: String,
    /// Machine bucket key, e.g. `2024-W11`. `Start` for the synthetic first point.
    pub period_key: String,
    /// Last calendar day covered by the bucket. `None` only for the Start point.
    pub full_date: Option<NaiveDate>,
    pub equity: Decimal,
    pub peak: Decimal,
    /// `equity - peak`, never positive.
    pub drawdown: Decimal,
    /// Drawdown as a percentage of the peak, never positive.
    pub drawdown_pct: f64,
    pub is_new_peak: bool,
    /// PnL realized inside this bucket.
    pub period_pnl: Decimal,
    /// The bucket's PnL broken down by account id.
    pub account_pnl: BTreeMap<String, Decimal>,
}

impl CurvePoint {
    pub fn is_start(&self) -> bool {
        self.full_date.is_none()
    }
}

/// The light-weight projection of a curve point used by drawdown charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownPoint {
    pub label: String,
    pub drawdown_pct: f64,
    pub full_date: Option<NaiveDate>,
}

/// How the calendar walk behind the curve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum WalkOutcome {
    Complete { days: usize },
    /// The day cap was hit; the curve stops at the last visited day.
    Truncated { days: usize },
}

impl WalkOutcome {
    pub fn is_truncated(&self) -> bool {
        matches!(self, WalkOutcome::Truncated { .. })
    }
}

/// Performance of one strategy tag, measured on its own cumulative PnL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyStats {
    pub pnl: Decimal,
    pub trades: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub peak: Decimal,
    pub max_drawdown: Decimal,
    /// Relative to the account baseline capital, not to the strategy's own peak.
    pub max_drawdown_pct: f64,
    pub current_drawdown: Decimal,
    pub current_drawdown_pct: f64,
    pub is_new_high: bool,
}

/// Outcome statistics for one emotion tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionStats {
    pub pnl: Decimal,
    pub trades: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_pnl: Decimal,
}

/// Consecutive profitable days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    pub best: u32,
    pub current: u32,
}

/// Everything the dashboard shows, recomputed from scratch on every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    pub equity_curve: Vec<CurvePoint>,
    pub drawdown_series: Vec<DrawdownPoint>,

    pub baseline_capital: Decimal,
    pub current_equity: Decimal,
    pub equity_change: Decimal,
    pub equity_change_pct: f64,
    pub current_drawdown_pct: f64,
    /// Minimum drawdown percentage over the (possibly windowed) curve.
    pub max_drawdown_pct: f64,
    pub is_peak: bool,

    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub net_pnl: Decimal,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub avg_win: Decimal,
    pub avg_loss: Decimal,
    pub risk_reward: f64,
    pub sharpe_ratio: f64,

    pub per_strategy: BTreeMap<String, StrategyStats>,
    pub per_emotion: BTreeMap<String, EmotionStats>,
    pub streaks: Streaks,
    pub walk: WalkOutcome,
}

impl MetricsResult {
    /// The well-defined result for a journal with no trades in scope.
    pub fn empty(baseline_capital: Decimal) -> Self {
        Self {
            equity_curve: Vec::new(),
            drawdown_series: Vec::new(),
            baseline_capital,
            current_equity: baseline_capital,
            equity_change: Decimal::ZERO,
            equity_change_pct: 0.0,
            current_drawdown_pct: 0.0,
            max_drawdown_pct: 0.0,
            is_peak: true,
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            net_pnl: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            win_rate: 0.0,
            profit_factor: 0.0,
            avg_win: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            risk_reward: 0.0,
            sharpe_ratio: 0.0,
            per_strategy: BTreeMap::new(),
            per_emotion: BTreeMap::new(),
            streaks: Streaks::default(),
            walk: WalkOutcome::Complete { days: 0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(MetricsResult::empty(dec!(5000))).unwrap();
        assert_eq!(value["baselineCapital"], json!("5000"));
        assert_eq!(value["isPeak"], json!(true));
        assert_eq!(value["walk"], json!({ "status": "complete", "days": 0 }));
        assert_eq!(value["streaks"], json!({ "best": 0, "current": 0 }));
        assert!(value["equityCurve"].as_array().unwrap().is_empty());
    }

    #[test]
    fn engine_settings_fill_missing_fields() {
        let settings: EngineSettings = serde_json::from_str(r#"{ "max_walk_days": 10 }"#).unwrap();
        assert_eq!(settings.max_walk_days, 10);
        assert_eq!(settings.fallback_capital, DEFAULT_FALLBACK_CAPITAL);
    }
}
