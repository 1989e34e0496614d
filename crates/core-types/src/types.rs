// In crates/core-types/src/types.rs

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

/// The canonical on-disk spelling of a trade date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The account a trade belongs to when the journal entry does not name one.
pub const DEFAULT_ACCOUNT_ID: &str = "main";

fn default_account_id() -> String {
    DEFAULT_ACCOUNT_ID.to_string()
}

/// Parses a journal date. Accepts `YYYY-MM-DD`, RFC 3339 timestamps and
/// `YYYY-MM-DDTHH:MM:SS`; any time of day is discarded.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// A single realized profit or loss recorded in the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEvent {
    pub id: String,
    /// The trade date as it was persisted. Grouping is done on this literal string.
    pub date: String,
    /// Positive is profit, negative is loss.
    pub pnl: Decimal,
    #[serde(default)]
    pub strategy_tag: Option<String>,
    #[serde(default)]
    pub emotion_tag: Option<String>,
    #[serde(default = "default_account_id")]
    pub account_id: String,
}

impl TradeEvent {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// The strategy tag, or `None` when absent or blank.
    pub fn strategy(&self) -> Option<&str> {
        non_blank(self.strategy_tag.as_deref())
    }

    /// The emotion tag, or `None` when absent or blank.
    pub fn emotion(&self) -> Option<&str> {
        non_blank(self.emotion_tag.as_deref())
    }
}

fn non_blank(tag: Option<&str>) -> Option<&str> {
    tag.map(str::trim).filter(|t| !t.is_empty())
}

/// A capital pool ("portfolio") that trades are booked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub initial_capital: Decimal,
}

/// An immutable copy of everything the journal holds at one moment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalSnapshot {
    #[serde(default)]
    pub trades: Vec<TradeEvent>,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl JournalSnapshot {
    /// Every account id known to the snapshot, including ids that only appear on trades.
    pub fn account_ids(&self) -> BTreeSet<String> {
        self.accounts
            .iter()
            .map(|a| a.id.clone())
            .chain(self.trades.iter().map(|t| t.account_id.clone()))
            .collect()
    }

    /// The accounts a view covers: the explicit selection, or every known
    /// account when there is none.
    pub fn select_accounts(&self, selected: Option<&[String]>) -> BTreeSet<String> {
        match selected {
            Some(ids) => ids.iter().cloned().collect(),
            None => self.account_ids(),
        }
    }

    /// Rewrites every parseable trade date into `YYYY-MM-DD` and returns how many changed.
    ///
    /// Daily grouping is done on the literal string, so loaders call this before
    /// handing a snapshot to the engine. Unparseable dates are left untouched.
    pub fn canonicalize_dates(&mut self) -> usize {
        let mut changed = 0;
        for trade in &mut self.trades {
            if let Some(date) = trade.parsed_date() {
                let canonical = date.format(DATE_FORMAT).to_string();
                if canonical != trade.date {
                    trade.date = canonical;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Checks the invariants the persistence layer is expected to uphold.
    pub fn validate(&self) -> Result<()> {
        if let Some(account) = self.accounts.iter().find(|a| a.initial_capital < Decimal::ZERO) {
            return Err(Error::NegativeCapital {
                id: account.id.clone(),
                capital: account.initial_capital,
            });
        }

        let mut seen = HashSet::new();
        for trade in &self.trades {
            if !seen.insert((trade.account_id.as_str(), trade.id.as_str())) {
                return Err(Error::DuplicateTradeId {
                    account_id: trade.account_id.clone(),
                    id: trade.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// The bucket size used when aggregating PnL for charting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    pub const ALL: [Granularity; 5] = [
        Granularity::Daily,
        Granularity::Weekly,
        Granularity::Monthly,
        Granularity::Quarterly,
        Granularity::Yearly,
    ];

    /// Number of periods per year, used to annualize the Sharpe ratio.
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Granularity::Daily => 252.0,
            Granularity::Weekly => 52.0,
            Granularity::Monthly => 12.0,
            Granularity::Quarterly => 4.0,
            Granularity::Yearly => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
            Granularity::Quarterly => "quarterly",
            Granularity::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" | "d" => Ok(Granularity::Daily),
            "weekly" | "week" | "w" => Ok(Granularity::Weekly),
            "monthly" | "month" | "m" => Ok(Granularity::Monthly),
            "quarterly" | "quarter" | "q" => Ok(Granularity::Quarterly),
            "yearly" | "year" | "y" => Ok(Granularity::Yearly),
            _ => Err(Error::UnknownGranularity(s.to_string())),
        }
    }
}

/// Language of the human-readable bucket labels. Never affects numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Locale::En),
            "zh" | "zh-cn" | "chinese" => Ok(Locale::Zh),
            _ => Err(Error::UnknownLocale(s.to_string())),
        }
    }
}

/// An optional display window over the equity curve.
///
/// The window only takes effect once `start` is set; `end` alone is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Inclusive on both ends; a missing bound is open.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}
