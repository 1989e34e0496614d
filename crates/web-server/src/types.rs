// In crates/web-server/src/types.rs

use analytics::Streaks;
use chrono::NaiveDate;
use core_types::{DateWindow, Granularity, JournalSnapshot, Locale};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /api/metrics`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRequest {
    pub snapshot: JournalSnapshot,
    /// `None` selects every account the snapshot knows about.
    #[serde(default)]
    pub active_account_ids: Option<Vec<String>>,
    // Kept as strings so the aliases accepted by `FromStr` work here too.
    #[serde(default)]
    pub granularity: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub window: DateWindow,
    /// Defaults to today (UTC).
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl MetricsRequest {
    pub fn granularity(&self, default: Granularity) -> core_types::Result<Granularity> {
        self.granularity.as_deref().map_or(Ok(default), str::parse)
    }

    pub fn locale(&self, default: Locale) -> core_types::Result<Locale> {
        self.locale.as_deref().map_or(Ok(default), str::parse)
    }
}

/// Body of `POST /api/calendar`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRequest {
    pub snapshot: JournalSnapshot,
    #[serde(default)]
    pub active_account_ids: Option<Vec<String>>,
}

/// Per-day totals for the calendar heatmap.
#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarResponse {
    pub days: BTreeMap<String, Decimal>,
    pub streaks: Streaks,
}
