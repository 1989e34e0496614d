use analytics::strategy::strategy_stats;
use analytics::{streaks, MetricsEngine, MetricsQuery};
use chrono::{Days, NaiveDate};
use core_types::{Account, DateWindow, Granularity, JournalSnapshot, Locale, TradeEvent};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeSet;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn trade(id: &str, date: &str, pnl: Decimal) -> TradeEvent {
    TradeEvent {
        id: id.to_string(),
        date: date.to_string(),
        pnl,
        strategy_tag: None,
        emotion_tag: None,
        account_id: "main".to_string(),
    }
}

fn snapshot(trades: Vec<TradeEvent>, capital: Decimal) -> JournalSnapshot {
    JournalSnapshot {
        trades,
        accounts: vec![Account {
            id: "main".to_string(),
            name: "Main".to_string(),
            initial_capital: capital,
        }],
    }
}

fn main_only() -> BTreeSet<String> {
    BTreeSet::from(["main".to_string()])
}

#[test]
fn empty_journal_reports_the_baseline() {
    let engine = MetricsEngine::default();
    let query = MetricsQuery::new(main_only(), d(2024, 6, 1));

    let funded = engine.calculate(&snapshot(vec![], dec!(25000)), &query);
    assert!(funded.equity_curve.len() <= 1);
    assert_eq!(funded.current_equity, dec!(25000));
    assert_eq!(funded.win_rate, 0.0);
    assert_eq!(funded.profit_factor, 0.0);
    assert_eq!(funded.risk_reward, 0.0);
    assert_eq!(funded.sharpe_ratio, 0.0);
    assert!(funded.is_peak);

    let unfunded = engine.calculate(&snapshot(vec![], Decimal::ZERO), &query);
    assert_eq!(unfunded.current_equity, dec!(100000));
}

#[test]
fn profit_factor_saturates() {
    let engine = MetricsEngine::default();
    let query = MetricsQuery::new(main_only(), d(2024, 1, 1));

    let winner = snapshot(vec![trade("w", "2024-01-01", dec!(100))], dec!(1000));
    let winner = engine.calculate(&winner, &query);
    assert_eq!(winner.profit_factor, 999.0);

    let loser = snapshot(vec![trade("l", "2024-01-01", dec!(-100))], dec!(1000));
    let loser = engine.calculate(&loser, &query);
    assert_eq!(loser.profit_factor, 0.0);
}

#[test]
fn same_day_trades_share_one_bucket() {
    let trades = vec![trade("a", "2024-01-05", dec!(50)), trade("b", "2024-01-05", dec!(-20))];
    let query = MetricsQuery::new(main_only(), d(2024, 1, 5));
    let result = MetricsEngine::default().calculate(&snapshot(trades, dec!(1000)), &query);

    assert_eq!(result.equity_curve.len(), 2);
    let point = &result.equity_curve[1];
    assert_eq!(point.full_date, Some(d(2024, 1, 5)));
    assert_eq!(point.period_pnl, dec!(30));
    assert_eq!(point.account_pnl["main"], dec!(30));
}

#[test]
fn window_keeps_the_start_point() {
    let trades: Vec<_> = (1..=9)
        .map(|day| trade(&day.to_string(), &format!("2024-01-{day:02}"), dec!(10)))
        .collect();
    let journal = snapshot(trades, dec!(1000));
    let engine = MetricsEngine::default();
    let mut query = MetricsQuery::new(main_only(), d(2024, 1, 9));

    let full = engine.calculate(&journal, &query);
    assert_eq!(full.equity_curve.len(), 10);
    let start = full.equity_curve[5].full_date.unwrap();

    query.window = DateWindow::new(Some(start), None);
    let windowed = engine.calculate(&journal, &query);
    assert!(windowed.equity_curve[0].is_start());
    assert!(windowed.equity_curve[1..]
        .iter()
        .all(|p| p.full_date.is_some_and(|date| date >= start)));
    assert_eq!(windowed.equity_curve.len(), 6);
    assert_eq!(windowed.drawdown_series.len(), windowed.equity_curve.len());
}

#[test]
fn streaks_count_profitable_days() {
    let s = streaks([dec!(10), dec!(5), dec!(-3), dec!(2), dec!(1)]);
    assert_eq!((s.best, s.current), (2, 2));
}

#[test]
fn strategy_drawdown_is_normalized_by_baseline() {
    let trades: Vec<TradeEvent> = [dec!(1000), dec!(1000), dec!(-500)]
        .into_iter()
        .enumerate()
        .map(|(i, pnl)| TradeEvent {
            strategy_tag: Some("breakout".to_string()),
            ..trade(&i.to_string(), "2024-02-01", pnl)
        })
        .collect();
    let refs: Vec<&TradeEvent> = trades.iter().collect();
    let stats = strategy_stats(&refs, dec!(100000));
    assert_eq!(stats["breakout"].current_drawdown_pct, -0.5);
}

#[test]
fn calendar_walk_crosses_year_boundaries() {
    let trades = vec![trade("a", "2023-12-30", dec!(5)), trade("b", "2024-01-02", dec!(5))];
    let mut query = MetricsQuery::new(main_only(), d(2024, 1, 2));
    query.granularity = Granularity::Yearly;
    query.locale = Locale::En;
    let result = MetricsEngine::default().calculate(&snapshot(trades, dec!(1000)), &query);

    let keys: Vec<_> = result.equity_curve.iter().map(|p| p.period_key.as_str()).collect();
    assert_eq!(keys, vec!["Start", "2023", "2024"]);
    assert_eq!(result.equity_curve[1].full_date, Some(d(2023, 12, 31)));
}

fn granularity() -> impl Strategy<Value = Granularity> {
    prop::sample::select(Granularity::ALL.to_vec())
}

proptest! {
    #[test]
    fn peaks_never_fall_and_drawdowns_never_rise(
        moves in prop::collection::vec((0u64..120, -500_000i64..500_000), 1..40),
        granularity in granularity(),
    ) {
        let origin = d(2024, 1, 1);
        let trades: Vec<TradeEvent> = moves
            .iter()
            .enumerate()
            .map(|(i, (offset, cents))| {
                let day = origin + Days::new(*offset);
                trade(&i.to_string(), &day.to_string(), Decimal::new(*cents, 2))
            })
            .collect();
        let mut query = MetricsQuery::new(main_only(), d(2024, 5, 1));
        query.granularity = granularity;
        let result = MetricsEngine::default().calculate(&snapshot(trades, dec!(10000)), &query);

        for pair in result.equity_curve.windows(2) {
            prop_assert!(pair[1].peak >= pair[0].peak);
        }
        for point in &result.equity_curve {
            prop_assert!(point.drawdown_pct <= 0.0);
            prop_assert!(point.drawdown <= Decimal::ZERO);
        }
        prop_assert!(result.max_drawdown_pct <= result.current_drawdown_pct);
    }
}

fn extreme_pnl() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::MAX),
        Just(Decimal::MIN),
        Just(Decimal::MAX / dec!(2) + Decimal::ONE),
        Just(dec!(-1000000000)),
        Just(dec!(0.0000000000000000001)),
        (-500_000i64..500_000).prop_map(|cents| Decimal::new(cents, 2)),
    ]
}

fn extreme_capital() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(dec!(0.0000000000000000001)),
        Just(dec!(0.5)),
        Just(Decimal::ZERO),
        Just(Decimal::MAX),
    ]
}

proptest! {
    #[test]
    fn extreme_magnitudes_never_panic(
        moves in prop::collection::vec((0u64..60, extreme_pnl()), 1..20),
        capital in extreme_capital(),
        granularity in granularity(),
    ) {
        let origin = d(2024, 1, 1);
        let trades: Vec<TradeEvent> = moves
            .iter()
            .enumerate()
            .map(|(i, (offset, pnl))| TradeEvent {
                strategy_tag: Some("scalp".to_string()),
                emotion_tag: Some("calm".to_string()),
                ..trade(&i.to_string(), &(origin + Days::new(*offset)).to_string(), *pnl)
            })
            .collect();
        let mut query = MetricsQuery::new(main_only(), d(2024, 3, 1));
        query.granularity = granularity;
        let result = MetricsEngine::default().calculate(&snapshot(trades, capital), &query);

        for pair in result.equity_curve.windows(2) {
            prop_assert!(pair[1].peak >= pair[0].peak);
        }
        for point in &result.equity_curve {
            prop_assert!(point.drawdown_pct.is_finite());
            prop_assert!(point.drawdown_pct <= 0.0);
        }
        for value in [
            result.equity_change_pct,
            result.current_drawdown_pct,
            result.max_drawdown_pct,
            result.profit_factor,
            result.risk_reward,
            result.sharpe_ratio,
        ] {
            prop_assert!(value.is_finite());
        }
        let scalp = &result.per_strategy["scalp"];
        prop_assert!(scalp.max_drawdown_pct.is_finite());
        prop_assert!(scalp.max_drawdown <= scalp.current_drawdown);
    }
}
