//! # Journal Analytics Engine
//!
//! Turns a snapshot of journaled PnL events into the numbers behind the
//! dashboard: a bucketed equity curve, its drawdown series, and summary,
//! per-strategy and per-emotion statistics.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O and no storage coupling. Snapshots go in, a
//!   `MetricsResult` comes out. It depends only on `core-types`.
//! - **Stateless calculation:** every call recomputes from scratch, so it is
//!   safe to re-run on each snapshot change and to run views in parallel.
//! - **No failure path:** bad dates, empty input and zero denominators
//!   degrade to documented fallback values instead of errors.
//!
//! ## Public API
//!
//! - `MetricsEngine`: the calculator.
//! - `MetricsQuery` / `MetricsResult`: the view selection and its output.
//! - `period_key`, `daily_totals`, `streaks`: helpers used by calendar views.

pub mod curve;
pub mod daily;
pub mod engine;
pub mod period;
pub mod stats;
pub mod streak;
pub mod strategy;
pub mod types;
pub mod walk;

// Re-export the key components to create a clean, public-facing API.
pub use daily::daily_totals;
pub use engine::MetricsEngine;
pub use period::period_key;
pub use streak::streaks;
pub use types::{
    CurvePoint, DrawdownPoint, EmotionStats, EngineSettings, MetricsQuery, MetricsResult,
    StrategyStats, Streaks, WalkOutcome,
};
