// In app/src/snapshot.rs

use anyhow::{Context, Result};
use core_types::JournalSnapshot;
use std::path::Path;

/// Reads and validates a journal snapshot exported as JSON.
pub fn load_snapshot(path: &Path) -> Result<JournalSnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;
    let snapshot = parse_snapshot(&content)
        .with_context(|| format!("Invalid snapshot in {}", path.display()))?;

    tracing::info!(
        trades = snapshot.trades.len(),
        accounts = snapshot.accounts.len(),
        "Loaded journal snapshot."
    );
    Ok(snapshot)
}

pub fn parse_snapshot(content: &str) -> Result<JournalSnapshot> {
    let mut snapshot: JournalSnapshot =
        serde_json::from_str(content).context("Failed to parse snapshot JSON")?;
    snapshot.validate()?;
    let rewritten = snapshot.canonicalize_dates();
    if rewritten > 0 {
        tracing::debug!(rewritten, "Canonicalized trade dates.");
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_camel_case_snapshot() {
        let snapshot = parse_snapshot(
            r#"{
                "trades": [
                    { "id": "a", "date": "2024-03-04", "pnl": "12.50", "strategyTag": "gap" },
                    { "id": "b", "date": "2024-03-05T14:30:00Z", "pnl": -3, "accountId": "swing" }
                ],
                "accounts": [{ "id": "main", "name": "Main", "initialCapital": 5000 }]
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.trades.len(), 2);
        assert_eq!(snapshot.trades[0].pnl, dec!(12.50));
        assert_eq!(snapshot.trades[0].account_id, "main");
        assert_eq!(snapshot.trades[1].account_id, "swing");
        assert_eq!(snapshot.trades[1].date, "2024-03-05");
        assert_eq!(snapshot.accounts[0].initial_capital, dec!(5000));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let snapshot = parse_snapshot("{}").unwrap();
        assert!(snapshot.trades.is_empty());
        assert!(snapshot.accounts.is_empty());
    }

    #[test]
    fn invalid_snapshots_are_rejected() {
        assert!(parse_snapshot("not json").is_err());

        let negative = r#"{ "accounts": [{ "id": "main", "initialCapital": -1 }] }"#;
        let err = parse_snapshot(negative).unwrap_err();
        assert!(err.to_string().contains("negative initial capital"));
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = load_snapshot(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
