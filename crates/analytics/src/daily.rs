//! Per-day PnL aggregation.

use core_types::TradeEvent;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// The PnL booked on one calendar day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyBucket {
    pub total: Decimal,
    pub by_account: BTreeMap<String, Decimal>,
}

impl DailyBucket {
    fn add(&mut self, trade: &TradeEvent) {
        self.total = self.total.saturating_add(trade.pnl);
        let account = self.by_account.entry(trade.account_id.clone()).or_default();
        *account = account.saturating_add(trade.pnl);
    }
}

/// Groups trades by their literal date string.
///
/// `2024-01-05` and `2024-1-5` are different keys; dates are expected to be
/// canonical by the time they reach the engine.
pub fn aggregate_daily<'a, I>(trades: I) -> HashMap<String, DailyBucket>
where
    I: IntoIterator<Item = &'a TradeEvent>,
{
    let mut days: HashMap<String, DailyBucket> = HashMap::new();
    for trade in trades {
        days.entry(trade.date.clone()).or_default().add(trade);
    }
    days
}

/// Signed PnL per date string, ordered by key. Feeds the calendar heatmap and streaks.
///
/// Trades whose date does not parse belong to no calendar day and are skipped.
pub fn daily_totals<'a, I>(trades: I) -> BTreeMap<String, Decimal>
where
    I: IntoIterator<Item = &'a TradeEvent>,
{
    let mut totals = BTreeMap::new();
    for trade in trades.into_iter().filter(|t| t.parsed_date().is_some()) {
        let total = totals.entry(trade.date.clone()).or_insert(Decimal::ZERO);
        *total = total.saturating_add(trade.pnl);
    }
    totals
}
